use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single catalog call.
///
/// A missing movie is not an error: `movie_details` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Non-2xx response carrying a TMDB error body.
    #[error("TMDB API error: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Non-2xx response whose body is not a TMDB error object.
    #[error("HTTP error: {code} - {reason}", code = .status.as_u16())]
    Protocol { status: StatusCode, reason: String },

    /// Connection, DNS, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// 2xx response that does not match the expected shape.
    #[error("failed to decode TMDB response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Startup configuration problems. These are fatal before the server binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
