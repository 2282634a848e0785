//! HTTP server for the invoice verification mailer.
//!
//! # API Endpoints
//!
//! | Method | Path                | Description                          |
//! |--------|---------------------|--------------------------------------|
//! | GET    | `/`                 | Service metadata                     |
//! | GET    | `/health`           | Health check                         |
//! | POST   | `/process-invoices` | Run one batch over both tables       |
//! | POST   | `/test-email`       | Send a single test email             |

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use super::types::{error_response, ProcessResponse, TestEmailRequest, TestEmailResponse};
use crate::config::AppConfig;
use crate::mailer::{self, Mailer};
use crate::processor;
use crate::source::{CsvDataSource, DataSource};

/// Shared handler state: the transport and the data source, both built
/// once at startup from the validated configuration.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub source: Arc<dyn DataSource>,
}

/// Build the router over an explicit state. Split out so tests can mount
/// fake collaborators.
pub fn app(state: AppState) -> Router {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/process-invoices", post(process_invoices))
        .route("/test-email", post(test_email))
        .with_state(state)
        .layer(cors)
}

/// Start the HTTP server.
pub async fn start_server(config: AppConfig, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        mailer: mailer::from_config(&config)?,
        source: Arc::new(CsvDataSource::from_config(&config)),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Invomail server running on http://localhost:{}", port);
    println!("   POST /process-invoices - Run one batch");
    println!("   POST /test-email       - Send a test email");
    println!("   GET  /health           - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Health check / service metadata endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invomail",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "process": "POST /process-invoices",
            "test_email": "POST /test-email"
        }
    }))
}

/// Run one batch over the current table snapshot.
///
/// Always 200 with an aggregate body when the batch itself ran, even if
/// every invoice failed; 500 only when the run aborted before the loop
/// (e.g. the source read failed).
async fn process_invoices(
    State(state): State<AppState>,
) -> Result<Json<ProcessResponse>, (StatusCode, Json<Value>)> {
    println!("\n🚀 /process-invoices endpoint hit");

    let report = processor::process_invoices(state.source.as_ref(), state.mailer.as_ref())
        .await
        .map_err(|e| {
            eprintln!("❌ Batch aborted: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_response(&e.to_string())),
            )
        })?;

    Ok(Json(report.into()))
}

/// Send a single fixed test email, no carbon copies.
async fn test_email(
    State(state): State<AppState>,
    Json(request): Json<TestEmailRequest>,
) -> Result<Json<TestEmailResponse>, (StatusCode, Json<Value>)> {
    let to = request.to.trim().to_string();
    if to.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(error_response("Missing recipient address")),
        ));
    }

    processor::send_test_email(state.mailer.as_ref(), &to)
        .await
        .map_err(|e| {
            eprintln!("❌ Test email failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(error_response(&e.to_string())),
            )
        })?;

    Ok(Json(TestEmailResponse {
        message: "Test email sent".to_string(),
        to,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MailError, MailResult, SourceError, SourceResult};
    use crate::mailer::NoopMailer;
    use crate::models::{EmailMessage, Row};
    use crate::source::Snapshot;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    // ------------------------------------------------------------------
    // Stub collaborators
    // ------------------------------------------------------------------

    struct StaticSource(Snapshot);

    impl DataSource for StaticSource {
        fn fetch(&self) -> SourceResult<Snapshot> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl DataSource for BrokenSource {
        fn fetch(&self) -> SourceResult<Snapshot> {
            Err(SourceError::EmptyFile("invoice_validated.csv".into()))
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &EmailMessage) -> MailResult<()> {
            Err(MailError::SendFailed("provider unavailable".into()))
        }
    }

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn small_snapshot() -> Snapshot {
        Snapshot {
            vendors: vec![row(&[
                ("Vendor_ID", "V1"),
                ("Vendor_Email", "v@x.com"),
                ("Vendor_Manager_Email", "m@x.com"),
                ("Treasury_Email", "t@x.com"),
            ])],
            invoices: vec![
                row(&[
                    ("Invoice_No", "INV-001"),
                    ("Vendor_ID", "V1"),
                    ("Status", "PASS"),
                    ("Invoice_Amount", "1000"),
                    ("Bank_Name", "ABC Bank"),
                    ("Invoice_Date", "2024-01-01"),
                ]),
                row(&[
                    ("Invoice_No", "INV-002"),
                    ("Vendor_ID", "V1"),
                    ("Status", "FAIL"),
                    ("Reason_For_Failure", "amount mismatch"),
                    ("Mismatch_Summary", "expected 500 got 600"),
                ]),
            ],
        }
    }

    fn state(source: impl DataSource + 'static, mailer: impl Mailer + 'static) -> AppState {
        AppState {
            mailer: Arc::new(mailer),
            source: Arc::new(source),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_health_reports_ok() {
        let sut = app(state(StaticSource(small_snapshot()), NoopMailer));
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "invomail");
    }

    #[tokio::test]
    async fn test_process_invoices_returns_aggregate() {
        let sut = app(state(StaticSource(small_snapshot()), NoopMailer));

        let response = sut
            .oneshot(post_json("/process-invoices", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total_processed"], 2);
        assert_eq!(body["succeeded"], 2);
        assert_eq!(body["failed"], 0);
        assert_eq!(body["results"][0]["invoice_no"], "INV-001");
        assert_eq!(body["results"][0]["email_sent_to"][0], "v@x.com");
        assert_eq!(body["results"][1]["email_sent_to"][0], "t@x.com");
    }

    #[tokio::test]
    async fn test_process_invoices_is_200_even_when_every_invoice_fails() {
        let sut = app(state(StaticSource(small_snapshot()), FailingMailer));

        let response = sut
            .oneshot(post_json("/process-invoices", "{}"))
            .await
            .unwrap();
        // Per-invoice failure is reported in the body, not the status.
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total_processed"], 2);
        assert_eq!(body["failed"], 2);
        assert_eq!(body["results"][0]["success"], false);
        assert!(body["results"][0]["error"]
            .as_str()
            .unwrap()
            .contains("provider unavailable"));
    }

    #[tokio::test]
    async fn test_process_invoices_source_failure_is_500() {
        let sut = app(state(BrokenSource, NoopMailer));

        let response = sut
            .oneshot(post_json("/process-invoices", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("invoice_validated.csv"));
    }

    #[tokio::test]
    async fn test_test_email_sends_to_recipient() {
        let sut = app(state(StaticSource(small_snapshot()), NoopMailer));

        let response = sut
            .oneshot(post_json("/test-email", r#"{"to": "qa@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["to"], "qa@x.com");
    }

    #[tokio::test]
    async fn test_test_email_blank_recipient_is_400() {
        let sut = app(state(StaticSource(small_snapshot()), NoopMailer));

        let response = sut
            .oneshot(post_json("/test-email", r#"{"to": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_test_email_transport_failure_is_502() {
        let sut = app(state(StaticSource(small_snapshot()), FailingMailer));

        let response = sut
            .oneshot(post_json("/test-email", r#"{"to": "qa@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("provider unavailable"));
    }
}
