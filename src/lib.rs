//! otelcol-operator library crate
//!
//! This module exports the CRD definitions and the admission webhooks for
//! the OpenTelemetryCollector resource.

pub mod crd;
pub mod health;
pub mod webhooks;

pub use health::HealthState;
pub use webhooks::{
    CollectorWebhook, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError,
    run_webhook_server,
};
