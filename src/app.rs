use crate::config::Config;
use crate::models::{CatalogPage, MovieSummary};
use crate::tmdb::{CatalogResult, TmdbApi, TmdbClient, DEFAULT_PAGE};
use crate::views::{
    self, AboutView, DetailsView, HomeView, MoviesView, NotFoundView, Pager, PrivacyView,
    SearchView,
};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

/// Pagination UI never goes past this page, whatever TMDB reports.
pub const MAX_DISPLAY_PAGES: u32 = 500;
/// Movies shown per row on the home page.
pub const FEATURED_COUNT: usize = 6;
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static/images");

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Popular,
    TopRated,
    NowPlaying,
}

impl Category {
    /// Unknown or missing values fall back to popular.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("top-rated") => Category::TopRated,
            Some("now-playing") => Category::NowPlaying,
            _ => Category::Popular,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top-rated",
            Category::NowPlaying => "now-playing",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Category::Popular => "Popular Movies",
            Category::TopRated => "Top Rated Movies",
            Category::NowPlaying => "Now Playing",
        }
    }

    async fn fetch(&self, tmdb: &dyn TmdbApi, page: u32) -> CatalogResult<CatalogPage> {
        match self {
            Category::Popular => tmdb.popular(page).await,
            Category::TopRated => tmdb.top_rated(page).await,
            Category::NowPlaying => tmdb.now_playing(page).await,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    category: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    page: Option<String>,
}

/// Anything that is not a positive page number falls back to the first page.
pub fn requested_page(page: Option<&str>) -> u32 {
    page.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

pub fn display_total_pages(total_pages: u32) -> u32 {
    total_pages.min(MAX_DISPLAY_PAGES)
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> =
        Arc::new(TmdbClient::from_config(&config).context("Failed to initialize TMDB client")?);
    let state = AppState { tmdb };

    let app = build_router(state);

    info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/privacy", get(privacy))
        .route("/movies", get(list_movies))
        .route("/movies/search", get(search_movies))
        .route("/movies/:id", get(movie_details))
        .route("/health", get(health))
        .nest_service("/images", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home(State(state): State<AppState>) -> Response {
    let tmdb = state.tmdb.as_ref();
    let featured = tokio::try_join!(
        tmdb.popular(DEFAULT_PAGE),
        tmdb.top_rated(DEFAULT_PAGE),
        tmdb.now_playing(DEFAULT_PAGE),
    );

    let view = match featured {
        Ok((popular, top_rated, now_playing)) => HomeView {
            popular: featured_slice(popular),
            top_rated: featured_slice(top_rated),
            now_playing: featured_slice(now_playing),
            error_message: None,
        },
        Err(e) => {
            error!("Error loading homepage data: {}", e);
            HomeView {
                popular: Vec::new(),
                top_rated: Vec::new(),
                now_playing: Vec::new(),
                error_message: Some("Unable to load featured movies.".to_string()),
            }
        }
    };
    views::render(&view)
}

fn featured_slice(page: CatalogPage) -> Vec<MovieSummary> {
    page.results.into_iter().take(FEATURED_COUNT).collect()
}

async fn list_movies(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let category = Category::parse(params.category.as_deref());
    let page = requested_page(params.page.as_deref());

    let view = match category.fetch(state.tmdb.as_ref(), page).await {
        Ok(movies) => MoviesView {
            category: category.slug().to_string(),
            heading: category.heading().to_string(),
            pager: Pager::new(page, display_total_pages(movies.total_pages)),
            movies: movies.results,
            error_message: None,
        },
        Err(e) => {
            error!(
                "Error loading movies for category {}: {}",
                category.slug(),
                e
            );
            MoviesView {
                category: category.slug().to_string(),
                heading: category.heading().to_string(),
                pager: Pager::new(page, 0),
                movies: Vec::new(),
                error_message: Some("Unable to load movies. Please try again later.".to_string()),
            }
        }
    };
    views::render(&view)
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Redirect::to("/movies").into_response();
    }
    let page = requested_page(params.page.as_deref());
    let query_param = urlencoding::encode(&query).into_owned();

    let view = match state.tmdb.search(&query, page).await {
        Ok(results) => SearchView {
            pager: Pager::new(page, display_total_pages(results.total_pages)),
            total_results: results.total_results,
            movies: results.results,
            query,
            query_param,
            error_message: None,
        },
        Err(e) => {
            error!("Error searching movies with query {:?}: {}", query, e);
            SearchView {
                pager: Pager::new(page, 0),
                total_results: 0,
                movies: Vec::new(),
                query,
                query_param,
                error_message: Some("Unable to search movies. Please try again later.".to_string()),
            }
        }
    };
    views::render(&view)
}

fn movie_not_found() -> Response {
    views::render_with_status(
        StatusCode::NOT_FOUND,
        &NotFoundView {
            message: "Movie not found.".to_string(),
        },
    )
}

async fn movie_details(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Ok(id) = raw_id.trim().parse::<u64>() else {
        info!("Movie id {:?} is not a number", raw_id);
        return movie_not_found();
    };
    match state.tmdb.movie_details(id).await {
        Ok(Some(movie)) => views::render(&DetailsView {
            movie: Some(movie),
            error_message: None,
        }),
        Ok(None) => {
            info!("Movie {} not found", id);
            movie_not_found()
        }
        Err(e) => {
            error!("Error loading movie details for ID {}: {}", id, e);
            views::render(&DetailsView {
                movie: None,
                error_message: Some(
                    "Unable to load movie details. Please try again later.".to_string(),
                ),
            })
        }
    }
}

async fn about() -> Response {
    views::render(&AboutView)
}

async fn privacy() -> Response {
    views::render(&PrivacyView)
}

async fn not_found() -> Response {
    views::render_with_status(
        StatusCode::NOT_FOUND,
        &NotFoundView {
            message: "The page you were looking for does not exist.".to_string(),
        },
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
