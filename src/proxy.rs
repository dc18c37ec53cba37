use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use chrono::Local;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::board::{CompetitionFilter, Feed, View, ViewState, build_board, competition_options};
use crate::config::ProxyConfig;
use crate::html;
use crate::upstream::{FixturesApi, UpstreamError, decode_fixtures};

pub const LIVE_FIXTURES_ERROR: &str = "Failed to fetch live fixtures";
pub const SCHEDULED_FIXTURES_ERROR: &str = "Failed to fetch scheduled fixtures";

pub struct ProxyState {
    pub api: FixturesApi,
}

/// Generic 500 body; the underlying cause only goes to the server log.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub fn router(state: Arc<ProxyState>, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/live-fixtures", get(live_fixtures))
        .route("/api/scheduled-fixtures", get(scheduled_fixtures))
        .route("/board", get(board_page))
        .with_state(state);
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(TraceLayer::new_for_http())
}

pub async fn serve(cfg: &ProxyConfig) -> anyhow::Result<()> {
    if cfg.api_key.is_none() {
        tracing::warn!("FOOTBALL_API_KEY is not set; upstream requests will be unauthenticated");
    }
    let api = FixturesApi::from_config(cfg)?;
    let state = Arc::new(ProxyState { api });
    let app = router(state, Some(cfg.static_dir.clone()));

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("proxy listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn live_fixtures(State(state): State<Arc<ProxyState>>) -> Result<Response, ApiError> {
    let body = state.api.live_fixtures_raw().await.map_err(|err| {
        tracing::error!(error = %err, "live fixtures request failed");
        ApiError {
            message: LIVE_FIXTURES_ERROR,
        }
    })?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn scheduled_fixtures(
    State(state): State<Arc<ProxyState>>,
) -> Result<Json<Value>, ApiError> {
    let today = Local::now().date_naive();
    state
        .api
        .scheduled_fixtures(today)
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!(error = %err, "scheduled fixtures request failed");
            ApiError {
                message: SCHEDULED_FIXTURES_ERROR,
            }
        })
}

#[derive(Debug, Default, Deserialize)]
struct BoardQuery {
    view: Option<String>,
    current: Option<String>,
    competition: Option<String>,
}

async fn board_page(
    State(state): State<Arc<ProxyState>>,
    Query(query): Query<BoardQuery>,
) -> Html<String> {
    let view = query
        .view
        .as_deref()
        .or(query.current.as_deref())
        .and_then(View::from_param)
        .unwrap_or_default();
    let requested = query
        .competition
        .as_deref()
        .map(CompetitionFilter::from_param)
        .unwrap_or_default();

    let now = Local::now();
    let (live, scheduled) = tokio::join!(
        state.api.live_fixtures(),
        state.api.scheduled_fixtures(now.date_naive())
    );
    let live = feed_from(live, "Live fixtures");
    let scheduled = feed_from(scheduled, "Scheduled fixtures");

    let options = competition_options(live.fixtures.iter().chain(scheduled.fixtures.iter()));
    // A league that is gone from both feeds falls back to all competitions.
    let competition = if options.contains(&requested) {
        requested
    } else {
        CompetitionFilter::All
    };
    let view_state = ViewState { view, competition };
    let board = build_board(&view_state, &live, &scheduled, &now);
    Html(html::render_page(&view_state, &options, &board))
}

fn feed_from(result: Result<Value, UpstreamError>, label: &str) -> Feed {
    match result {
        Ok(body) => Feed::ready(decode_fixtures(&body)),
        Err(err) => {
            tracing::error!(error = %err, feed = label, "board fetch failed");
            Feed::unavailable(format!("{label} could not be loaded"))
        }
    }
}
