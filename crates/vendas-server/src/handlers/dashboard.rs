//! Dashboard handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use vendas_core::{
    load_dashboard, Dashboard, DashboardOptions, Region, SalesFilter, TopSellers, YearSelection,
};

/// Query parameters for the dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Region name (empty or absent = Brasil)
    pub regiao: Option<String>,
    /// Year (empty or absent = all years)
    pub ano: Option<String>,
    /// Comma-separated seller names
    pub vendedores: Option<String>,
    /// Sellers in the top-N views (2-10)
    pub top: Option<String>,
}

/// GET /api/dashboard - Metrics, tables and charts for the selected filters
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let filter = resolve_filter(&state, params.regiao.as_deref(), params.ano.as_deref())?
        .with_sellers(params.vendedores.as_deref().unwrap_or("").split(','));

    let top_sellers = match params.top.as_deref().map(str::trim) {
        None | Some("") => state.config.dashboard.default_top_sellers(),
        Some(raw) => raw.parse().ok().and_then(TopSellers::new).ok_or_else(|| {
            AppError::bad_request(&format!(
                "top must be between {} and {}",
                TopSellers::MIN,
                TopSellers::MAX
            ))
        })?,
    };

    let options = DashboardOptions {
        top_states: state.config.dashboard.top_states,
        top_sellers,
    };

    let dashboard = load_dashboard(state.source.as_ref(), filter, options).await?;
    Ok(Json(dashboard))
}

/// Region and year parameters shared by the dashboard and seller endpoints
pub(crate) fn resolve_filter(
    state: &AppState,
    regiao: Option<&str>,
    ano: Option<&str>,
) -> Result<SalesFilter, AppError> {
    let region: Region = regiao
        .unwrap_or("")
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let year = match ano.map(str::trim) {
        None | Some("") => YearSelection::All,
        Some(raw) => {
            let year: i32 = raw
                .parse()
                .map_err(|_| AppError::bad_request(&format!("Invalid year: {}", raw)))?;
            state
                .config
                .dashboard
                .year_range()
                .check(YearSelection::Year(year))
                .map_err(|e| AppError::bad_request(&e))?
        }
    };

    Ok(SalesFilter::new(region, year))
}
