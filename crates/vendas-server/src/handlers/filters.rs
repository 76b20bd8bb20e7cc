//! Filter option and health handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::dashboard::resolve_filter;
use crate::{AppError, AppState};
use vendas_core::{aggregate::distinct_sellers, Region};

/// Region selector option
#[derive(Debug, Serialize)]
pub struct RegionOption {
    pub name: &'static str,
    pub query_value: String,
}

/// GET /api/regions - The six region selector options
pub async fn list_regions() -> Json<Vec<RegionOption>> {
    Json(
        Region::all()
            .iter()
            .map(|r| RegionOption {
                name: r.display_name(),
                query_value: r.query_value(),
            })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
pub struct SellersQuery {
    pub regiao: Option<String>,
    pub ano: Option<String>,
}

/// GET /api/sellers - Distinct sellers for a region/year, for the seller multiselect
pub async fn list_sellers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SellersQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let filter = resolve_filter(&state, params.regiao.as_deref(), params.ano.as_deref())?;
    let transactions = state.source.fetch(&filter.api_query()).await?;
    Ok(Json(distinct_sellers(&transactions)))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub source: String,
}

/// GET /api/health - Liveness plus the configured sales source
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: state.source.describe(),
    })
}
