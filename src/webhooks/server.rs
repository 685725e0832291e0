//! Admission webhook server.
//!
//! Provides HTTP endpoints for Kubernetes admission webhooks.
//!
//! To enable webhooks:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a MutatingWebhookConfiguration for /mutate-opentelemetrycollector
//!    and a ValidatingWebhookConfiguration for /validate-opentelemetrycollector
//! 3. Mount the TLS certificate secret to the operator pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info, warn};

use crate::health::HealthState;
use crate::webhooks::CollectorWebhook;
use crate::webhooks::error::Warnings;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub webhook: CollectorWebhook,
    pub health: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(health: Option<Arc<HealthState>>) -> Self {
        Self {
            webhook: CollectorWebhook,
            health,
        }
    }

    fn record(&self, operation: &Operation, allowed: bool, warnings: usize) {
        if let Some(health) = &self.health {
            health
                .metrics
                .record_admission(operation_label(operation), allowed, warnings as u64);
        }
    }
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

type ReviewResponse = (StatusCode, Json<AdmissionReview<DynamicObject>>);

/// Extract the admission request from a review body, or build the 400
/// response for a malformed review.
fn parse_request(
    review: AdmissionReview<DynamicObject>,
) -> Result<AdmissionRequest<DynamicObject>, ReviewResponse> {
    match review.try_into() {
        Ok(request) => Ok(request),
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            Err((
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            ))
        }
    }
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/mutate-opentelemetrycollector", post(mutate_collector))
        .route("/validate-opentelemetrycollector", post(validate_collector))
        .with_state(state)
}

/// Defaulting webhook handler for OpenTelemetryCollector
async fn mutate_collector(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let request = match parse_request(review) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing defaulting request"
    );

    let original: DynamicObject = match &request.object {
        Some(obj) => obj.clone(),
        None => {
            warn!(uid = %uid, "Missing object in defaulting request");
            state.record(&request.operation, false, 0);
            return (
                StatusCode::OK,
                Json(
                    AdmissionResponse::from(&request)
                        .deny("Missing object in request")
                        .into_review(),
                ),
            );
        }
    };

    let mut defaulted = original.clone();
    if let Err(e) = state.webhook.default(Some(&mut defaulted)) {
        warn!(uid = %uid, error = %e, "Defaulting request denied");
        state.record(&request.operation, false, 0);
        return (
            StatusCode::OK,
            Json(
                AdmissionResponse::from(&request)
                    .deny(e.to_string())
                    .into_review(),
            ),
        );
    }

    let response = match patched_response(&request, &original, &defaulted) {
        Ok(response) => response,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to build defaulting patch");
            state.record(&request.operation, false, 0);
            return (
                StatusCode::OK,
                Json(AdmissionResponse::invalid(e.to_string()).into_review()),
            );
        }
    };

    info!(uid = %uid, "Defaulting request allowed");
    state.record(&request.operation, true, 0);
    (StatusCode::OK, Json(response.into_review()))
}

/// Build an allowed response carrying the JSON patch from the submitted
/// object to its defaulted form. No patch is attached when defaulting
/// changed nothing.
fn patched_response(
    request: &AdmissionRequest<DynamicObject>,
    original: &DynamicObject,
    defaulted: &DynamicObject,
) -> Result<AdmissionResponse, Box<dyn std::error::Error>> {
    let patch = json_patch::diff(
        &serde_json::to_value(original)?,
        &serde_json::to_value(defaulted)?,
    );
    let response = AdmissionResponse::from(request);
    if patch.0.is_empty() {
        return Ok(response);
    }
    Ok(response.with_patch(patch)?)
}

/// Validating webhook handler for OpenTelemetryCollector
async fn validate_collector(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let request = match parse_request(review) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    // On DELETE the API server carries the deleted object in oldObject.
    let result = match request.operation {
        Operation::Create => state.webhook.validate_create(request.object.as_ref()),
        Operation::Update => state
            .webhook
            .validate_update(request.old_object.as_ref(), request.object.as_ref()),
        Operation::Delete => state.webhook.validate_delete(request.old_object.as_ref()),
        // The webhook is not registered for CONNECT
        Operation::Connect => Ok(Warnings::new()),
    };

    match result {
        Ok(warnings) => {
            info!(uid = %uid, warnings = warnings.len(), "Admission request allowed");
            state.record(&request.operation, true, warnings.len());
            let mut response = AdmissionResponse::from(&request);
            if !warnings.is_empty() {
                response.warnings = Some(warnings);
            }
            (StatusCode::OK, Json(response.into_review()))
        }
        Err(e) => {
            warn!(uid = %uid, error = %e, "Admission request denied");
            state.record(&request.operation, false, 0);
            (
                StatusCode::OK,
                Json(
                    AdmissionResponse::from(&request)
                        .deny(e.to_string())
                        .into_review(),
                ),
            )
        }
    }
}

/// Errors that can occur when running the webhook server
#[derive(Debug)]
pub enum WebhookError {
    /// TLS configuration error
    TlsConfig(String),
    /// Server error
    Server(String),
}

impl std::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookError::TlsConfig(msg) => write!(f, "TLS configuration error: {}", msg),
            WebhookError::Server(msg) => write!(f, "Webhook server error: {}", msg),
        }
    }
}

impl std::error::Error for WebhookError {}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0:9443 and serves the mutating and validating endpoints.
/// TLS certificates are loaded from the paths specified.
///
/// # Arguments
/// * `health` - Shared health state for admission metrics, if any
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
pub async fn run_webhook_server(
    health: Option<Arc<HealthState>>,
    cert_path: &str,
    key_path: &str,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let state = Arc::new(WebhookState::new(health));
    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], WEBHOOK_PORT));
    info!(port = WEBHOOK_PORT, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
