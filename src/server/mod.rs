//! JSON server over the post repository

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::{ContentError, PostSummary, PostView};
use crate::generator::{feed, robots, sitemap};
use crate::helpers::url_for;
use crate::Folio;

/// Server state; content is re-read on every request
struct ServerState {
    folio: Folio,
}

/// Failure modes of a request
#[derive(Debug)]
enum ApiError {
    NotFound,
    Content(ContentError),
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        ApiError::Content(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            ApiError::Content(e) => {
                tracing::error!("Failed to read content: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Build the router for a site
pub fn router(folio: &Folio) -> Router {
    let config = &folio.config;
    let blog = url_for(&config.blog_dir);
    let category = url_for(&config.category_dir);
    let tag = url_for(&config.tag_dir);
    let feed_path = url_for(&config.feed.path);

    let state = Arc::new(ServerState {
        folio: folio.clone(),
    });

    let mut app = Router::new()
        .route(&blog, get(list_posts))
        .route(&format!("{}/:slug", blog), get(show_post))
        .route(&format!("{}/:category", category), get(category_posts))
        .route(&format!("{}/:tag", tag), get(tag_posts))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt));

    if config.feed.enable {
        app = app.route(&feed_path, get(atom_feed));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_posts(State(state): State<Arc<ServerState>>) -> Json<Vec<PostSummary>> {
    let posts = state.folio.repository().get_all_posts();
    Json(posts.iter().map(PostSummary::from).collect())
}

async fn show_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostView>, ApiError> {
    state
        .folio
        .repository()
        .get_post_view(&slug)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn category_posts(
    State(state): State<Arc<ServerState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let posts = state.folio.repository().posts_by_category(&category);
    summaries_or_not_found(&posts)
}

async fn tag_posts(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let posts = state.folio.repository().posts_by_tag(&tag);
    summaries_or_not_found(&posts)
}

fn summaries_or_not_found(
    posts: &[crate::content::Post],
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    if posts.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(posts.iter().map(PostSummary::from).collect()))
}

async fn sitemap_xml(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let folio = &state.folio;
    let posts = folio.repository().get_all_posts();
    let entries = sitemap::build_sitemap(&folio.config, &posts, Utc::now());
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap::render_sitemap_xml(&entries),
    )
}

async fn robots_txt(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots::render_robots(&state.folio.config),
    )
}

async fn atom_feed(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let folio = &state.folio;
    let posts = folio.repository().get_all_posts();
    (
        [(header::CONTENT_TYPE, "application/atom+xml; charset=utf-8")],
        feed::render_atom_feed(&folio.config, &posts, Utc::now()),
    )
}
