//! HTML views. Each page is an askama template rendered into an axum response.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::models::{MovieDetails, MovieSummary};

/// Pagination links for list and search pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub total: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Pager {
    pub fn new(current: u32, total: u32) -> Self {
        Self {
            current,
            total,
            prev: (current > 1).then(|| current - 1),
            next: (current < total).then(|| current + 1),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeView {
    pub popular: Vec<MovieSummary>,
    pub top_rated: Vec<MovieSummary>,
    pub now_playing: Vec<MovieSummary>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "movies.html")]
pub struct MoviesView {
    pub category: String,
    pub heading: String,
    pub movies: Vec<MovieSummary>,
    pub pager: Pager,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchView {
    pub query: String,
    pub query_param: String,
    pub movies: Vec<MovieSummary>,
    pub total_results: u64,
    pub pager: Pager,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "details.html")]
pub struct DetailsView {
    pub movie: Option<MovieDetails>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutView;

#[derive(Template)]
#[template(path = "privacy.html")]
pub struct PrivacyView;

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundView {
    pub message: String,
}

pub fn render<T: Template>(view: &T) -> Response {
    render_with_status(StatusCode::OK, view)
}

pub fn render_with_status<T: Template>(status: StatusCode, view: &T) -> Response {
    match view.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!("Template render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
