// 🌐 Datasource API - Axum routes for the dashboard's JSON protocol
//
// The ledger and index are built before the router and only ever read here,
// so the state is plain `Arc`s with no lock.

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::index::AccountIndex;
use crate::ledger::Ledger;
use crate::protocol::{QueryRequest, TagKey, TAG_KEYS};
use crate::series::{self, TimeSeries};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub index: Arc<AccountIndex>,
}

impl AppState {
    /// Build the account index once and freeze both structures
    pub fn new(ledger: Ledger) -> Self {
        let index = AccountIndex::build(ledger.transactions());
        AppState {
            ledger: Arc::new(ledger),
            index: Arc::new(index),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - "Test connection" on the datasource config page
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET|POST /search - Metric names offered in the query editor.
/// Always the whole index: the editor sends the current value as `target`,
/// which must not narrow the choices.
async fn search(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.index.search())
}

/// POST /query - One series per requested target
async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<Vec<TimeSeries>> {
    let targets = request.target_names();
    debug!(
        targets = ?targets,
        from = %request.range.from,
        to = %request.range.to,
        "query"
    );

    Json(series::query(
        state.ledger.transactions(),
        &targets[..],
        request.range.from,
        request.range.to,
    ))
}

/// /annotations - Never any annotations
async fn annotations() -> Json<Vec<serde_json::Value>> {
    Json(Vec::new())
}

/// /tag-keys
async fn tag_keys() -> Json<[TagKey; 1]> {
    Json(TAG_KEYS)
}

/// /tag-values - No ad-hoc filter values
async fn tag_values() -> Json<Vec<serde_json::Value>> {
    Json(Vec::new())
}

// ============================================================================
// Router
// ============================================================================

/// CORS policy the dashboard's browser-side proxy expects
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
        ])
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/search", get(search).post(search))
        .route("/query", post(query))
        .route("/annotations", get(annotations).post(annotations))
        .route("/tag-keys", get(tag_keys).post(tag_keys))
        .route("/tag-values", get(tag_values).post(tag_values))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// TESTS
// ============================================================================
