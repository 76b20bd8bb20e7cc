//! Test utilities for vendas-core
//!
//! This module provides testing infrastructure including a mock sales API
//! server that speaks the same wire format as the real one.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use tokio::sync::oneshot;

use crate::filter::ApiQuery;
use crate::models::{RawTransaction, Transaction};
use crate::source::{FixtureSource, SalesSource};

/// Mock sales API for testing and development
///
/// Routes:
/// - `GET /produtos`: the dataset, filtered by `regiao`/`ano` like the real API
/// - `GET /broken`: always 500
/// - `GET /malformed`: 200 with a body that is not JSON
/// - `GET /bad-date`: a record whose purchase date is not DD/MM/YYYY
pub struct MockSalesApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<ApiQuery>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Clone)]
struct MockState {
    source: Arc<FixtureSource>,
    requests: Arc<Mutex<Vec<ApiQuery>>>,
}

impl MockSalesApi {
    /// Start the mock server with [`sample_transactions`]
    pub async fn start() -> Self {
        Self::start_with(sample_transactions()).await
    }

    /// Start the mock server on an available port serving `transactions`
    pub async fn start_with(transactions: Vec<Transaction>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            source: Arc::new(FixtureSource::new(transactions)),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/produtos", get(handle_produtos))
            .route("/broken", get(handle_broken))
            .route("/malformed", get(handle_malformed))
            .route("/bad-date", get(handle_bad_date))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of the sales endpoint
    pub fn api_url(&self) -> String {
        format!("{}/produtos", self.url())
    }

    /// Queries received by `/produtos`, in arrival order
    pub fn requests(&self) -> Vec<ApiQuery> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockSalesApi {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_produtos(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = ApiQuery {
        regiao: params.get("regiao").cloned().unwrap_or_default(),
        ano: params.get("ano").cloned().unwrap_or_default(),
    };
    state.requests.lock().unwrap().push(query.clone());

    match state.source.fetch(&query).await {
        Ok(rows) => {
            let raw: Vec<RawTransaction> = rows.iter().map(RawTransaction::from).collect();
            Json(raw).into_response()
        }
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn handle_broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

async fn handle_malformed() -> Response {
    (StatusCode::OK, "<html>not json</html>").into_response()
}

async fn handle_bad_date() -> Response {
    let mut raw: Vec<RawTransaction> = sample_transactions()
        .iter()
        .take(2)
        .map(RawTransaction::from)
        .collect();
    raw[1].purchase_date = "2022-01-20".to_string();
    Json(raw).into_response()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A small national dataset spanning 2021 and 2022
///
/// | year | rows | revenue |
/// |------|------|---------|
/// | 2021 | 4    | 2912.00 |
/// | 2022 | 6    | 3970.00 |
///
/// Sudeste (SP, RJ, MG) has 5 rows, 3 of them in 2022.
pub fn sample_transactions() -> Vec<Transaction> {
    const SP: (f64, f64) = (-22.19, -48.79);
    const RJ: (f64, f64) = (-22.25, -42.66);
    const MG: (f64, f64) = (-18.10, -44.38);
    const BA: (f64, f64) = (-13.29, -41.71);
    const PE: (f64, f64) = (-8.38, -37.86);
    const RS: (f64, f64) = (-30.17, -53.50);
    const AM: (f64, f64) = (-3.47, -65.10);
    const DF: (f64, f64) = (-15.83, -47.86);

    vec![
        Transaction::new(1500.0, date(2022, 1, 5), "SP", SP, "eletronicos", "Ana"),
        Transaction::new(250.0, date(2022, 1, 20), "RJ", RJ, "livros", "Bruno"),
        Transaction::new(800.0, date(2022, 2, 11), "MG", MG, "moveis", "Carla"),
        Transaction::new(1200.0, date(2022, 3, 2), "BA", BA, "eletronicos", "Ana"),
        Transaction::new(90.0, date(2022, 3, 15), "PE", PE, "livros", "Bruno"),
        Transaction::new(130.0, date(2022, 4, 8), "RS", RS, "brinquedos", "Daniel"),
        Transaction::new(600.0, date(2021, 6, 10), "SP", SP, "moveis", "Carla"),
        Transaction::new(2100.0, date(2021, 7, 22), "AM", AM, "eletronicos", "Daniel"),
        Transaction::new(72.0, date(2021, 11, 30), "DF", DF, "livros", "Ana"),
        Transaction::new(140.0, date(2021, 12, 24), "SP", SP, "brinquedos", "Bruno"),
    ]
}
