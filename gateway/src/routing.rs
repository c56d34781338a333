//! API 路由

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use manymodels_telemetry::HealthStatus;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::service::RoutingService;
use crate::types::ForecastResponse;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RoutingService>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: RoutingService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/score", post(score))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

/// 预测请求入口，请求体原样交给路由服务
async fn score(State(state): State<AppState>, body: String) -> ForecastResponse {
    state.service.handle(body).await
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let routes = state.service.table().len();

    let mut status = HealthStatus::new();
    status.add_check(
        "routing_table",
        routes > 0,
        Some(format!("{routes} routes loaded")),
    );

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::MockModelEndpoint;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use manymodels_registry::RoutingTable;
    use tower::ServiceExt;

    const RAW: &str = r#"{"store":"Store1005","brand":"tropicana","model_type":"lr","forecast_horizon":5,"date_freq":"W-THU","data":{"dates":["2020-04-23","2020-04-30"],"values":[11450,12235]}}"#;

    fn app(table: RoutingTable, endpoint: MockModelEndpoint) -> Router {
        let service = RoutingService::new(Arc::new(table), Arc::new(endpoint));
        api_routes(AppState::new(service))
    }

    fn table() -> RoutingTable {
        RoutingTable::from_entries([("lr_Store1005_tropicana", "http://svc/a")])
    }

    fn score_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_score_relays_downstream_response() {
        let mut endpoint = MockModelEndpoint::new();
        endpoint
            .expect_forward()
            .withf(|url: &str, body: &String| url == "http://svc/a" && body == RAW)
            .times(1)
            .returning(|_, _| {
                Ok(ForecastResponse::new(200, r#"{"forecast":[12001.5]}"#)
                    .with_content_type("application/json"))
            });

        let response = app(table(), endpoint)
            .oneshot(score_request(RAW))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_string(response).await, r#"{"forecast":[12001.5]}"#);
    }

    #[tokio::test]
    async fn test_score_routing_miss() {
        let mut endpoint = MockModelEndpoint::new();
        endpoint.expect_forward().never();

        let body = RAW.replace("Store1005", "Store9999");
        let response = app(table(), endpoint)
            .oneshot(score_request(&body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            "Model not found for store Store9999 and brand tropicana of type lr"
        );
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(table(), MockModelEndpoint::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("healthy"));
    }

    #[tokio::test]
    async fn test_ready_reports_route_count() {
        let response = app(table(), MockModelEndpoint::new())
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("1 routes loaded"));
    }

    #[tokio::test]
    async fn test_not_ready_with_empty_table() {
        let response = app(RoutingTable::default(), MockModelEndpoint::new())
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let response = app(table(), MockModelEndpoint::new())
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
