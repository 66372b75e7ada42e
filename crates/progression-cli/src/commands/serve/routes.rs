//! HTTP routes over a shared [`ServiceContext`].

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use progression::serving::{HealthResponse, ServiceContext};
use std::sync::Arc;
use tracing::{debug, warn};

/// Build the router: `GET /health` and `POST /predict`.
pub fn build_router(context: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .with_state(context)
}

async fn health(State(context): State<Arc<ServiceContext>>) -> Json<HealthResponse> {
    Json(context.health())
}

/// Takes raw bytes: any unparsable body, whatever its content type, is a
/// validation error.
async fn predict(State(context): State<Arc<ServiceContext>>, body: Bytes) -> Response {
    match context.predict_json(&body) {
        Ok(prediction) => {
            debug!(prediction = prediction.prediction, "predict ok");
            Json(prediction).into_response()
        }
        Err(e) => {
            warn!(error = e.code(), message = e.message(), "predict rejected");
            let status = StatusCode::from_u16(e.status()).unwrap_or(StatusCode::BAD_REQUEST);
            (status, Json(e.body())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progression::serving::{MetricsSummary, Predictor};
    use progression::{Matrix, ProgressionError, Vector};
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const EXAMPLE: &str = r#"{"age":0.04,"sex":0.05,"bmi":0.06,"bp":0.02,"s1":-0.04,"s2":-0.03,"s3":-0.02,"s4":-0.002,"s5":0.02,"s6":-0.02}"#;

    struct Constant(f32);

    impl Predictor for Constant {
        fn predict_rows(&self, x: &Matrix<f32>) -> progression::Result<Vector<f32>> {
            Ok(Vector::from_vec(vec![self.0; x.n_rows()]))
        }
    }

    struct Broken;

    impl Predictor for Broken {
        fn predict_rows(&self, _x: &Matrix<f32>) -> progression::Result<Vector<f32>> {
            Err(ProgressionError::PredictionFailed("weights missing".to_string()))
        }
    }

    fn context(predictor: impl Predictor + 'static) -> Arc<ServiceContext> {
        Arc::new(ServiceContext::new(
            Arc::new(predictor),
            MetricsSummary {
                model_name: Some("StandardScaler+LinearRegression".to_string()),
                rmse: Some(53.85),
            },
        ))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_startup_metrics() {
        let Json(health) = health(State(context(Constant(1.0)))).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.model_name, "StandardScaler+LinearRegression");
        assert_eq!(health.rmse, Some(53.85));
    }

    #[tokio::test]
    async fn test_predict_ok() {
        let response = predict(State(context(Constant(152.5))), Bytes::from(EXAMPLE)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"prediction": 152.5}));
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_422() {
        let body = EXAMPLE.replace(r#""s6":-0.02"#, r#""s7":-0.02"#);
        let response = predict(State(context(Constant(1.0))), Bytes::from(body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "validation_error");
        assert!(json["detail"]["message"].as_str().unwrap().contains("s6"));
    }

    #[tokio::test]
    async fn test_predict_string_value_is_422() {
        let body = EXAMPLE.replace("0.04,", "\"abc\",");
        let response = predict(State(context(Constant(1.0))), Bytes::from(body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_predict_numeric_string_is_accepted() {
        let body = EXAMPLE.replace("0.04,", "\"0.04\",");
        let response = predict(State(context(Constant(7.0))), Bytes::from(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"prediction": 7.0}));
    }

    #[tokio::test]
    async fn test_predict_model_failure_is_400() {
        let response = predict(State(context(Broken)), Bytes::from(EXAMPLE)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "prediction_failed");
        assert_eq!(json["detail"]["message"], "Prediction failed: weights missing");
    }

    async fn raw_request(addr: std::net::SocketAddr, request: String) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn test_router_over_tcp() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(context(Constant(7.0)));
        tokio::spawn(async move { axum::serve(listener, app).await });

        let health = raw_request(
            addr,
            "GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;
        assert!(health.starts_with("HTTP/1.1 200"), "{health}");
        assert!(health.contains(r#""model_name":"StandardScaler+LinearRegression""#));

        let predict = raw_request(
            addr,
            format!(
                "POST /predict HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{EXAMPLE}",
                EXAMPLE.len()
            ),
        )
        .await;
        assert!(predict.starts_with("HTTP/1.1 200"), "{predict}");
        assert!(predict.ends_with(r#"{"prediction":7.0}"#), "{predict}");
    }
}
