//! Admission gate for OpenTelemetryCollector resources.
//!
//! Four hook points mirror the webhook registration: defaulting, and
//! validation on create, update and delete. Every call is a synchronous,
//! single-shot evaluation over its own input object; the gate holds no
//! state across requests and is safe under concurrent invocation.

use kube::Resource;
use kube::core::DynamicObject;

use crate::crd::OpenTelemetryCollector;
use crate::webhooks::defaults::apply_defaults;
use crate::webhooks::error::{AdmissionError, Warnings};

/// Admission webhook for the OpenTelemetryCollector kind.
///
/// Stateless; a single value is shared across concurrent requests.
#[derive(Clone, Copy, Debug)]
pub struct CollectorWebhook;

impl CollectorWebhook {
    /// Apply the defaulting rules to the submitted object, in place.
    ///
    /// The handle is only touched when a rule actually changed the object,
    /// so an empty rule set leaves it byte-identical.
    pub fn default(&self, obj: Option<&mut DynamicObject>) -> Result<(), AdmissionError> {
        let Some(obj) = obj else {
            return Err(Self::nil_handle());
        };
        let mut collector = Self::resolve(Some(&*obj))?;

        let before = serde_json::to_value(&collector.spec)?;
        apply_defaults(&mut collector);
        let after = serde_json::to_value(&collector.spec)?;

        if after != before {
            obj.metadata = collector.metadata;
            if let Some(data) = obj.data.as_object_mut() {
                data.insert("spec".to_owned(), after);
            }
        }
        Ok(())
    }

    /// Validate a proposed object on create.
    pub fn validate_create(&self, obj: Option<&DynamicObject>) -> Result<Warnings, AdmissionError> {
        let collector = Self::resolve(obj)?;
        self.validate(&collector)
    }

    /// Validate a proposed object on update.
    ///
    /// Only the new object is type-checked and validated; the old object is
    /// accepted but unused, reserved for future diff-based rules.
    pub fn validate_update(
        &self,
        _old: Option<&DynamicObject>,
        new: Option<&DynamicObject>,
    ) -> Result<Warnings, AdmissionError> {
        let collector = Self::resolve(new)?;
        self.validate(&collector)
    }

    /// Validate an object on delete, surfacing final-state issues.
    ///
    /// The framework may deliver a delete review without an object; that is
    /// rejected the same way as a wrong kind.
    pub fn validate_delete(&self, obj: Option<&DynamicObject>) -> Result<Warnings, AdmissionError> {
        let collector = Self::resolve(obj)?;
        self.validate(&collector)
    }

    /// Resolve the opaque framework handle into a typed collector.
    ///
    /// Routing should only ever deliver OpenTelemetryCollector objects, but
    /// the kind check stays: the caller is outside this crate's control.
    fn resolve(obj: Option<&DynamicObject>) -> Result<OpenTelemetryCollector, AdmissionError> {
        let Some(obj) = obj else {
            return Err(Self::nil_handle());
        };
        let expected = OpenTelemetryCollector::kind(&());
        let received = obj.types.as_ref().map_or("unknown", |t| t.kind.as_str());
        if expected != received {
            return Err(AdmissionError::type_mismatch(expected, received));
        }
        Ok(serde_json::from_value(serde_json::to_value(obj)?)?)
    }

    fn nil_handle() -> AdmissionError {
        AdmissionError::type_mismatch(OpenTelemetryCollector::kind(&()), "nil")
    }

    /// Run every validation rule over the resolved object.
    ///
    /// Rules are advisory unless they return an error. Independent rules
    /// keep running so a single request surfaces every problem at once.
    fn validate(&self, collector: &OpenTelemetryCollector) -> Result<Warnings, AdmissionError> {
        let mut warnings = Warnings::new();

        let null_objects = collector.spec.config.null_objects();
        if !null_objects.is_empty() {
            warnings.push(format!(
                "Collector config spec.config has null objects: {}. For compatibility tooling (kustomize and kubectl edit) it is recommended to use empty obejects e.g. batch: {{}}.",
                null_objects.join(", ")
            ));
        }

        Ok(warnings)
    }
}
