use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{Config, API_KEY_VAR};
use crate::error::{CatalogError, ConfigError};
use crate::models::{ApiErrorBody, CatalogPage, MovieDetails};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_PAGE: u32 = 1;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only view of the TMDB movie catalog.
///
/// Every call is an independent round trip: nothing is cached or retried.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn popular(&self, page: u32) -> CatalogResult<CatalogPage>;
    async fn top_rated(&self, page: u32) -> CatalogResult<CatalogPage>;
    async fn now_playing(&self, page: u32) -> CatalogResult<CatalogPage>;
    /// A blank query yields an empty page without touching the network.
    async fn search(&self, query: &str, page: u32) -> CatalogResult<CatalogPage>;
    /// `Ok(None)` when TMDB answers 404 for the id.
    async fn movie_details(&self, id: u64) -> CatalogResult<Option<MovieDetails>>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar(API_KEY_VAR));
        }
        let user_agent = format!("movie-explorer/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            client,
            api_key,
            base_url: TMDB_BASE.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.tmdb_api_key.clone())?.with_base_url(&config.tmdb_base_url))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }

    async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> CatalogResult<(StatusCode, String)> {
        // Logged by path only; the full URL carries the key.
        debug!(path, "TMDB request");
        let res = self
            .client
            .get(self.url(path, params))
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url()))?;
        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url()))?;
        debug!(path, status = status.as_u16(), "TMDB response");
        Ok((status, body))
    }

    async fn get_page(&self, path: &str, page: u32) -> CatalogResult<CatalogPage> {
        let (status, body) = self.get_raw(path, &[("page", page.to_string())]).await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn popular(&self, page: u32) -> CatalogResult<CatalogPage> {
        self.get_page("/movie/popular", page).await
    }

    async fn top_rated(&self, page: u32) -> CatalogResult<CatalogPage> {
        self.get_page("/movie/top_rated", page).await
    }

    async fn now_playing(&self, page: u32) -> CatalogResult<CatalogPage> {
        self.get_page("/movie/now_playing", page).await
    }

    async fn search(&self, query: &str, page: u32) -> CatalogResult<CatalogPage> {
        if query.trim().is_empty() {
            debug!("Blank search query, returning empty page");
            return Ok(CatalogPage::default());
        }
        let params = [
            ("query", urlencoding::encode(query).into_owned()),
            ("page", page.to_string()),
        ];
        let (status, body) = self.get_raw("/search/movie", &params).await?;
        decode_response(status, &body)
    }

    async fn movie_details(&self, id: u64) -> CatalogResult<Option<MovieDetails>> {
        let (status, body) = self.get_raw(&format!("/movie/{id}"), &[]).await?;
        if status == StatusCode::NOT_FOUND {
            debug!(id, "TMDB has no movie with this id");
            return Ok(None);
        }
        decode_response(status, &body).map(Some)
    }
}

fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> CatalogResult<T> {
    if !status.is_success() {
        return Err(classify_failure(status, body));
    }
    serde_json::from_str(body).map_err(|e| {
        warn!(status = status.as_u16(), error = %e, "TMDB response did not decode");
        CatalogError::Decode(e)
    })
}

fn classify_failure(status: StatusCode, body: &str) -> CatalogError {
    let err = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => CatalogError::Upstream {
            status,
            message: err.status_message,
        },
        Err(_) => CatalogError::Protocol {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        },
    };
    warn!(status = status.as_u16(), "TMDB call failed: {}", err);
    err
}
