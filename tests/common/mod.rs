//! Shared helpers for the integration tests: a wiremock OTP service and a flow
//! controller wired to it.

#![allow(dead_code)]

use otpline::{AuthFlowController, HttpAuthService, ProgressSimulator};
use serde_json::Value;
use std::sync::{Arc, Once};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const NUMBER: &str = "9999999999";
pub const SEND_PATH: &str = "/api/send-otp/";
pub const VERIFY_PATH: &str = "/api/verify-otp/";

static TRACING: Once = Once::new();

/// Log to stderr when OTPLINE_TEST_LOG_LEVEL is set
pub fn init_tracing() {
    TRACING.call_once(|| {
        if let Ok(level) = std::env::var("OTPLINE_TEST_LOG_LEVEL") {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(level))
                .with_writer(std::io::stderr)
                .try_init();
        }
    });
}

pub async fn start_otp_server() -> MockServer {
    init_tracing();
    MockServer::start().await
}

/// Answer every send-code request with `status`
pub async fn mount_send(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answer send-code requests carrying exactly `body` with `status`
pub async fn mount_send_expecting(server: &MockServer, body: Value, status: u16) {
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_json(body))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(serde_json::json!({"message": "OTP sent successfully"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Answer every verify-code request with `status` and a message body
pub async fn mount_verify(server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({"message": message})),
        )
        .mount(server)
        .await;
}

/// Flow controller talking to `server`, without the progress delay
pub fn http_flow(server: &MockServer) -> AuthFlowController {
    let service = HttpAuthService::new(&server.uri()).unwrap();
    AuthFlowController::builder(Arc::new(service))
        .progress(ProgressSimulator::instant())
        .build()
}

/// Bodies of every request the server saw on `request_path`
pub async fn bodies_for(server: &MockServer, request_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}
