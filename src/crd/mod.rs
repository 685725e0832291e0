//! Custom Resource Definitions (CRDs) for otelcol-operator.
//!
//! - `OpenTelemetryCollector`: deploy and manage an OpenTelemetry Collector

mod collector;
mod config;

pub use collector::*;
pub use config::*;
