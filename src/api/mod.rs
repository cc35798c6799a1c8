use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{FireInputs, fire_targets};
use crate::data::DataProvider;
use crate::service;

const DEFAULT_INFLATION_PERCENTAGE: f64 = 6.0;

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn DataProvider>,
}

/// Response envelope shared by every route.
#[derive(Debug, Serialize)]
struct ApiResponse {
    data: Option<Value>,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CommonErrorResponse>,
}

#[derive(Debug, Serialize)]
struct CommonErrorResponse {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FirePayload {
    #[serde(alias = "currentAge")]
    current_age: Option<u32>,
    #[serde(alias = "retirementAge")]
    retirement_age: Option<u32>,
    #[serde(alias = "earlyRetirementAge")]
    early_retirement_age: Option<u32>,
    #[serde(alias = "monthlyExpense")]
    monthly_expense: Option<f64>,
    #[serde(alias = "inflation", alias = "inflationPercentage")]
    inflation_percentage: Option<f64>,
}

/// Validates a FIRE request. Early retirement defaults to the retirement age
/// and inflation to 6%. Age ordering is not checked.
fn build_fire_inputs(payload: FirePayload) -> Result<FireInputs, String> {
    let Some(current_age) = payload.current_age else {
        return Err("current_age is required".to_string());
    };
    let Some(retirement_age) = payload.retirement_age else {
        return Err("retirement_age is required".to_string());
    };
    let Some(monthly_expense) = payload.monthly_expense else {
        return Err("monthly_expense is required".to_string());
    };

    if !monthly_expense.is_finite() || monthly_expense < 0.0 {
        return Err("monthly_expense must be >= 0".to_string());
    }

    let inflation_percentage = payload
        .inflation_percentage
        .unwrap_or(DEFAULT_INFLATION_PERCENTAGE);
    if !inflation_percentage.is_finite() || inflation_percentage <= -100.0 {
        return Err("inflation_percentage must be > -100".to_string());
    }

    Ok(FireInputs {
        current_age,
        retirement_age,
        early_retirement_age: payload.early_retirement_age.unwrap_or(retirement_age),
        monthly_expense,
        inflation_percentage,
    })
}

pub fn router(provider: Arc<dyn DataProvider>) -> Router {
    Router::new()
        .route("/service-health", get(health_handler))
        .route("/get/asset-classes", get(asset_classes_handler))
        .route(
            "/get/allocation/effective-assets",
            get(effective_returns_handler),
        )
        .route("/investing-surplus", get(investing_surplus_handler))
        .route("/net-worth", get(net_worth_handler))
        .route("/sip-allocation", get(sip_allocation_handler))
        .route(
            "/investable-asset-allocation",
            get(investable_allocation_handler),
        )
        .route("/fire", get(fire_get_handler).post(fire_post_handler))
        .fallback(not_found_handler)
        .with_state(AppState { provider })
}

pub async fn run_http_server(
    provider: Arc<dyn DataProvider>,
    host: &str,
    port: u16,
) -> std::io::Result<()> {
    let ip = host
        .parse::<std::net::IpAddr>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let addr = SocketAddr::from((ip, port));
    let app = router(provider);

    let listener = TcpListener::bind(addr).await?;
    info!("goal planner HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    success(json!({ "message": "Working fine" }))
}

async fn asset_classes_handler(State(state): State<AppState>) -> Response {
    match state.provider.asset_classes() {
        Ok(asset_classes) => success(json!({
            "message": "Asset class data fetched successfully",
            "data": asset_classes,
        })),
        Err(e) => failure(e),
    }
}

async fn effective_returns_handler(State(state): State<AppState>) -> Response {
    match service::effective_returns(state.provider.as_ref()) {
        Ok(returns) => success(json!({
            "message": "Effective returns fetched successfully",
            "effective-returns": returns,
        })),
        Err(e) => failure(e),
    }
}

async fn investing_surplus_handler(State(state): State<AppState>) -> Response {
    match state.provider.investing_surplus() {
        Ok(surplus) => success(json!({
            "message": "Investing surplus data fetched successfully",
            "investing-surplus": surplus,
        })),
        Err(e) => failure(e),
    }
}

async fn net_worth_handler(State(state): State<AppState>) -> Response {
    match service::portfolio_net_worth(state.provider.as_ref()) {
        Ok(worth) => success(json!({
            "message": "Net Worth info fetched successfully",
            "total_asset": worth.total_asset,
            "liquid_asset": worth.liquid_asset,
            "net_worth": worth.net_worth,
        })),
        Err(e) => failure(e),
    }
}

async fn sip_allocation_handler(State(state): State<AppState>) -> Response {
    match service::sip_allocation(state.provider.as_ref()) {
        Ok(plan) => success(json!({
            "message": "SIP allocation fetched successfully",
            "sip-allocation": plan.by_asset_class,
            "goals": plan.goals,
        })),
        Err(e) => failure(e),
    }
}

async fn investable_allocation_handler(State(state): State<AppState>) -> Response {
    match service::investable_allocation(state.provider.as_ref()) {
        Ok(rows) => success(json!({
            "message": "Investable asset allocation fetched successfully",
            "investable-allocation": rows,
        })),
        Err(e) => failure(e),
    }
}

async fn fire_get_handler(Query(payload): Query<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

async fn fire_post_handler(Json(payload): Json<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

fn fire_handler_impl(payload: FirePayload) -> Response {
    let inputs = match build_fire_inputs(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    success(json!({
        "message": "FIRE targets calculated successfully",
        "fire-targets": fire_targets(&inputs),
    }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn success(data: Value) -> Response {
    json_response(
        StatusCode::OK,
        ApiResponse {
            data: Some(data),
            success: true,
            error: None,
        },
    )
}

fn failure(err: impl Display) -> Response {
    let msg = err.to_string();
    warn!(error = %msg, "request failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &msg)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ApiResponse {
            data: None,
            success: false,
            error: Some(CommonErrorResponse {
                message: msg.to_string(),
            }),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::data::SnapshotProvider;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn demo_router() -> Router {
        let provider = SnapshotProvider::from_json(include_str!("../../demos/snapshot.json"))
            .expect("demo snapshot");
        router(Arc::new(provider))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        read_json(response).await
    }

    async fn read_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    fn sample_payload() -> FirePayload {
        FirePayload {
            current_age: Some(30),
            retirement_age: Some(60),
            early_retirement_age: Some(45),
            monthly_expense: Some(50_000.0),
            inflation_percentage: Some(6.0),
        }
    }

    #[test]
    fn build_fire_inputs_defaults_optional_fields() {
        let mut payload = sample_payload();
        payload.early_retirement_age = None;
        payload.inflation_percentage = None;

        let inputs = build_fire_inputs(payload).expect("valid inputs");
        assert_eq!(inputs.early_retirement_age, 60);
        assert_approx(inputs.inflation_percentage, DEFAULT_INFLATION_PERCENTAGE);
    }

    #[test]
    fn build_fire_inputs_requires_ages_and_expense() {
        let mut payload = sample_payload();
        payload.current_age = None;
        let err = build_fire_inputs(payload).expect_err("missing age");
        assert!(err.contains("current_age"));

        let mut payload = sample_payload();
        payload.monthly_expense = None;
        let err = build_fire_inputs(payload).expect_err("missing expense");
        assert!(err.contains("monthly_expense"));
    }

    #[test]
    fn build_fire_inputs_rejects_negative_expense() {
        let mut payload = sample_payload();
        payload.monthly_expense = Some(-1.0);
        let err = build_fire_inputs(payload).expect_err("negative expense");
        assert!(err.contains("monthly_expense"));
    }

    #[test]
    fn build_fire_inputs_accepts_unordered_ages() {
        let mut payload = sample_payload();
        payload.early_retirement_age = Some(70);
        let inputs = build_fire_inputs(payload).expect("ordering is not checked");
        assert_eq!(inputs.early_retirement_age, 70);
    }

    #[test]
    fn fire_payload_parses_camel_case_keys() {
        let payload: FirePayload = serde_json::from_str(
            r#"{"currentAge":35,"retirementAge":55,"monthlyExpense":40000,"inflation":5}"#,
        )
        .expect("payload");
        let inputs = build_fire_inputs(payload).expect("inputs");
        assert_eq!(inputs.current_age, 35);
        assert_eq!(inputs.retirement_age, 55);
        assert_approx(inputs.monthly_expense, 40_000.0);
        assert_approx(inputs.inflation_percentage, 5.0);
    }

    #[tokio::test]
    async fn health_reports_working() {
        let (status, body) = get_json(demo_router(), "/service-health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["message"], "Working fine");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn net_worth_route_returns_totals() {
        let (status, body) = get_json(demo_router(), "/net-worth").await;
        assert_eq!(status, StatusCode::OK);
        assert_approx(body["data"]["net_worth"].as_f64().expect("number"), 5_450_000.0);
        assert_approx(body["data"]["liquid_asset"].as_f64().expect("number"), 1_700_000.0);
    }

    #[tokio::test]
    async fn effective_returns_route_blends_medium_term() {
        let (status, body) = get_json(demo_router(), "/get/allocation/effective-assets").await;
        assert_eq!(status, StatusCode::OK);
        let returns = &body["data"]["effective-returns"];
        assert_approx(returns["medium-term"].as_f64().expect("number"), 7.5);
    }

    #[tokio::test]
    async fn sip_allocation_route_lists_asset_classes() {
        let (status, body) = get_json(demo_router(), "/sip-allocation").await;
        assert_eq!(status, StatusCode::OK);
        let by_asset = body["data"]["sip-allocation"].as_object().expect("object");
        assert_eq!(by_asset.len(), 5);
        assert_eq!(body["data"]["goals"].as_array().expect("array").len(), 3);
    }

    #[tokio::test]
    async fn investable_allocation_route_follows_holdings() {
        let (status, body) = get_json(demo_router(), "/investable-asset-allocation").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["data"]["investable-allocation"].as_array().expect("array");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["asset_class_name"], "Large Cap Equity");
        assert!(rows[0]["required"]["value"].as_f64().expect("number") > 0.0);
    }

    #[tokio::test]
    async fn fire_get_uses_query_parameters() {
        let uri = "/fire?current_age=30&retirement_age=60&early_retirement_age=45&monthly_expense=50000&inflation_percentage=6";
        let (status, body) = get_json(demo_router(), uri).await;
        assert_eq!(status, StatusCode::OK);
        let targets = &body["data"]["fire-targets"];
        assert_approx(targets["yearly_expense"].as_f64().expect("number"), 600_000.0);
        let fire = targets["fire"].as_f64().expect("number");
        assert!((fire - 600_000.0 * 1.06f64.powi(30) * 25.0).abs() < 0.1);
    }

    #[tokio::test]
    async fn fire_post_rejects_missing_fields() {
        let request = Request::post("/fire")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"currentAge":30}"#))
            .expect("request");
        let response = demo_router().oneshot(request).await.expect("response");
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert!(
            body["error"]["message"]
                .as_str()
                .expect("message")
                .contains("retirement_age")
        );
    }

    #[tokio::test]
    async fn engine_failures_map_to_server_error() {
        let mut snapshot = SnapshotProvider::from_json(include_str!("../../demos/snapshot.json"))
            .expect("demo snapshot")
            .snapshot()
            .clone();
        snapshot.goals[0].name = "vacation".to_string();
        let app = router(Arc::new(SnapshotProvider::new(snapshot).expect("consistent")));

        let (status, body) = get_json(app, "/sip-allocation").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(
            body["error"]["message"]
                .as_str()
                .expect("message")
                .contains("vacation")
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, body) = get_json(demo_router(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Not found");
    }

    #[tokio::test]
    async fn responses_are_not_cached() {
        let response = demo_router()
            .oneshot(
                Request::get("/service-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).expect("header"),
            "no-store"
        );
    }
}
