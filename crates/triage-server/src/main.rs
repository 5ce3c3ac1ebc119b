mod dto;
mod error;
mod handlers;
mod services;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use triage_config::ServerConfig;

use crate::state::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let state = Arc::new(ServerState::from_config(&config)?);
    let app = build_router(state);

    let addr = config.addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/api/metrics/summary", get(handlers::metrics::summary))
        .route("/api/metrics/reset", post(handlers::metrics::reset))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use triage_core::ScoringProfile;

    fn app() -> Router {
        build_router(Arc::new(ServerState::new(ScoringProfile::default())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_predict_normal() {
        let payload = json!({"heart_rate": 80, "systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});
        let (status, body) = send(app(), post_json("/predict", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "normal");
        assert_eq!(body["severity_score"], 0.0);
        assert_eq!(body["contributing_factors"], json!([]));
        assert_eq!(body["early_warning"]["priority"], "standard");
        assert!(body["prediction_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn test_predict_critical() {
        let payload =
            json!({"heart_rate": 160, "systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});
        let (status, body) = send(app(), post_json("/predict", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "critical");
        assert_eq!(body["contributing_factors"], json!(["heart_rate"]));
    }

    #[tokio::test]
    async fn test_predict_warning_with_symptoms() {
        let payload = json!({
            "heart_rate": "80",
            "systolic_bp": "120",
            "diastolic_bp": "80",
            "spo2": "85",
            "respiratory_rate": 18,
            "symptoms": "breathing difficulty"
        });
        let (status, body) = send(app(), post_json("/predict", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "warning");
        assert_eq!(body["early_warning"]["mews_score"], 3);
        assert_eq!(body["early_warning"]["flagged_symptoms"], json!(["breathing difficulty"]));
        assert_eq!(body["early_warning"]["total_risk"], 5);
        assert_eq!(body["early_warning"]["assessment"], "potentially_serious");
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_bad_request() {
        let payload = json!({"systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});
        let (status, body) = send(app(), post_json("/predict", payload.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("heart_rate"));
    }

    #[tokio::test]
    async fn test_predict_non_numeric_is_bad_request() {
        let payload =
            json!({"heart_rate": "fast", "systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});
        let (status, _) = send(app(), post_json("/predict", payload.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_malformed_json_is_bad_request() {
        let (status, body) = send(app(), post_json("/predict", "{ heart_rate: 80")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_metrics_summary() {
        let app = app();
        let normal = json!({"heart_rate": 80, "systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});
        let invalid = json!({"heart_rate": -1, "systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});

        send(app.clone(), post_json("/predict", normal.to_string())).await;
        send(app.clone(), post_json("/predict", invalid.to_string())).await;

        let (status, body) = send(app, get("/api/metrics/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_predictions"], 1);
        assert_eq!(body["by_category"]["normal"], 1);
        assert_eq!(body["rejected"], 1);
    }

    #[tokio::test]
    async fn test_metrics_reset() {
        let app = app();
        let normal = json!({"heart_rate": 80, "systolic_bp": 120, "diastolic_bp": 80, "spo2": 98});
        send(app.clone(), post_json("/predict", normal.to_string())).await;

        let (status, body) = send(app.clone(), post_json("/api/metrics/reset", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = send(app, get("/api/metrics/summary")).await;
        assert_eq!(body["total_predictions"], 0);
        assert_eq!(body["rejected"], 0);
    }
}
