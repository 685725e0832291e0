//! Admission webhooks for the OpenTelemetryCollector resource.
//!
//! The gate runs two operations per admission request:
//! - Defaulting: fills in values the object must carry before validation
//!   and persistence (mutating webhook).
//! - Validation: inspects the proposed configuration on create, update and
//!   delete, returning advisory warnings plus a pass/fail result
//!   (validating webhook).

mod collector;
pub mod defaults;
mod error;
mod server;

pub use collector::CollectorWebhook;
pub use error::{AdmissionError, Warnings};
pub use server::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, WebhookState,
    create_webhook_router, run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
