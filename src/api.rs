use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::catalog::{self, Catalog, CatalogEntry, CatalogError};

/// Shared router state. The log is re-read on every request.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub log_path: PathBuf,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Io(_) | CatalogError::Csv(_) => {
                error!("Catalog read failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/years", get(list_years))
        .route("/statements", get(all_statements))
        .route("/statements/:year", get(statements_by_year))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn serve(state: ApiState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving {:?} on http://{}", state.log_path, addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "FOMC Statements API",
        "endpoints": ["/statements", "/statements/{year}", "/years"],
    }))
}

async fn list_years(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<String>>, CatalogError> {
    Ok(Json(catalog::load_catalog(&state.log_path)?.years()))
}

async fn all_statements(State(state): State<Arc<ApiState>>) -> Result<Json<Catalog>, CatalogError> {
    Ok(Json(catalog::load_catalog(&state.log_path)?))
}

async fn statements_by_year(
    State(state): State<Arc<ApiState>>,
    Path(year): Path<String>,
) -> Result<Json<Vec<CatalogEntry>>, CatalogError> {
    let catalog = catalog::load_catalog(&state.log_path)?;
    Ok(Json(catalog.year(&year)?.to_vec()))
}
