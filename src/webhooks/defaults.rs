//! Defaulting rules for OpenTelemetryCollector objects.
//!
//! Rules run in a fixed order before validation and persistence. Every rule
//! must be idempotent and total: a pure function of the object's current
//! state that never fails and never performs I/O.

use crate::crd::OpenTelemetryCollector;

/// A single defaulting rule.
pub type DefaultRule = fn(&mut OpenTelemetryCollector);

/// Defaulting rules in application order.
///
/// Empty today. Future rules (e.g. filling in unset processor or exporter
/// stanzas) slot in here without changing the call contract.
pub const DEFAULT_RULES: &[DefaultRule] = &[];

/// Run every defaulting rule over the object, in order.
pub fn apply_defaults(collector: &mut OpenTelemetryCollector) {
    for rule in DEFAULT_RULES {
        rule(collector);
    }
}
