//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vendas_core::{test_utils::sample_transactions, FixtureSource};

fn setup_test_app() -> Router {
    setup_app_with_source(FixtureSource::new(sample_transactions()))
}

fn setup_app_with_source(source: FixtureSource) -> Router {
    create_router(
        Arc::new(source),
        Config::default(),
        None,
        ServerConfig::default(),
    )
}

async fn send_get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ========== Health & Filter Options ==========

#[tokio::test]
async fn test_health() {
    let response = send_get(setup_test_app(), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["source"], "fixture (10 transactions)");
}

#[tokio::test]
async fn test_list_regions() {
    let response = send_get(setup_test_app(), "/api/regions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let regions = json.as_array().unwrap();
    assert_eq!(regions.len(), 6);
    assert_eq!(regions[0]["name"], "Brasil");
    assert_eq!(regions[0]["query_value"], "");
    assert_eq!(regions[1]["name"], "Centro-Oeste");
    assert_eq!(regions[1]["query_value"], "centro-oeste");
}

#[tokio::test]
async fn test_list_sellers_for_region() {
    let response = send_get(setup_test_app(), "/api/sellers?regiao=Nordeste").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!(["Ana", "Bruno"]));
}

#[tokio::test]
async fn test_list_sellers_empty_region_is_not_an_error() {
    let response = send_get(setup_test_app(), "/api/sellers?regiao=Norte&ano=2022").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

// ========== Dashboard ==========

#[tokio::test]
async fn test_dashboard_defaults() {
    let response = send_get(setup_test_app(), "/api/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["query"]["regiao"], "");
    assert_eq!(json["query"]["ano"], "");
    assert_eq!(json["tables"]["totals"]["sales"], 10);
    assert_eq!(json["tables"]["totals"]["revenue"], 6882.0);
    assert_eq!(json["top_sellers"], 5);

    let tabs = json["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 3);
    assert_eq!(tabs[0]["title"], "Receita");
    assert_eq!(tabs[0]["columns"][0]["metric"]["value"], "R$ 6.88 mil");
    assert_eq!(tabs[0]["columns"][1]["metric"]["value"], "10.00 ");
}

#[tokio::test]
async fn test_dashboard_region_and_year() {
    let response = send_get(setup_test_app(), "/api/dashboard?regiao=Sudeste&ano=2022").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["query"]["regiao"], "sudeste");
    assert_eq!(json["query"]["ano"], "2022");
    assert_eq!(json["tables"]["totals"]["sales"], 3);
    assert_eq!(json["tables"]["revenue_by_state"][0]["state"], "SP");
}

#[tokio::test]
async fn test_dashboard_empty_year_means_all_years() {
    let response = send_get(setup_test_app(), "/api/dashboard?regiao=&ano=").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["tables"]["totals"]["sales"], 10);
}

#[tokio::test]
async fn test_dashboard_seller_filter() {
    let response = send_get(setup_test_app(), "/api/dashboard?vendedores=Ana,Bruno").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["tables"]["totals"]["sales"], 6);
    // Multiselect options come from the unfiltered fetch
    assert_eq!(json["available_sellers"].as_array().unwrap().len(), 4);

    let sellers: Vec<_> = json["tables"]["sellers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["seller"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(sellers, vec!["Ana", "Bruno"]);
}

#[tokio::test]
async fn test_dashboard_top_sellers() {
    let response = send_get(setup_test_app(), "/api/dashboard?top=3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let chart = &json["tabs"][2]["columns"][0]["charts"][0];
    assert_eq!(chart["title"], "Top 3 vendedores (Receita)");
    assert_eq!(chart["points"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_rejects_invalid_top() {
    for uri in ["/api/dashboard?top=1", "/api/dashboard?top=11", "/api/dashboard?top=abc"] {
        let response = send_get(setup_test_app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let json = get_body_json(response).await;
        assert_eq!(json["error"], "top must be between 2 and 10");
    }
}

#[tokio::test]
async fn test_dashboard_rejects_year_out_of_range() {
    let response = send_get(setup_test_app(), "/api/dashboard?ano=2019").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Year 2019 out of range (2020-2023)");

    let response = send_get(setup_test_app(), "/api/dashboard?ano=vinte").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_rejects_unknown_region() {
    let response = send_get(setup_test_app(), "/api/dashboard?regiao=Atlantida").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Unknown region"));
}

#[tokio::test]
async fn test_dashboard_empty_fetch_is_not_found() {
    let response = send_get(setup_test_app(), "/api/dashboard?regiao=Norte&ano=2022").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("No sales found"));
}

#[tokio::test]
async fn test_dashboard_upstream_failure_is_bad_gateway() {
    let app = setup_app_with_source(FixtureSource::failing(503));
    let response = send_get(app, "/api/dashboard").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // Upstream details are logged, not returned
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Sales API request failed");
}

// ========== Security ==========

#[tokio::test]
async fn test_security_headers() {
    let response = send_get(setup_test_app(), "/api/health").await;
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_api_is_read_only() {
    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_without_static_dir() {
    let response = send_get(setup_test_app(), "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
