//! End-to-end admission scenarios driven through AdmissionReview payloads.

use kube::core::DynamicObject;
use serde_json::{Value, json};

use otelcol_operator::CollectorWebhook;
use otelcol_operator::webhooks::{
    AdmissionError, AdmissionRequest, AdmissionResponse, AdmissionReview, Operation, Warnings,
};

use crate::common::fixtures::{CollectorBuilder, admission_review};

const NULL_BATCH_WARNING: &str = "Collector config spec.config has null objects: batch. For compatibility tooling (kustomize and kubectl edit) it is recommended to use empty obejects e.g. batch: {}.";

fn parse(review: Value) -> AdmissionRequest<DynamicObject> {
    let review: AdmissionReview<DynamicObject> = serde_json::from_value(review).unwrap();
    review.try_into().unwrap()
}

/// Route the request the way the validating endpoint does.
fn route(review: Value) -> Result<Warnings, AdmissionError> {
    let request = parse(review);
    let webhook = CollectorWebhook;
    match request.operation {
        Operation::Create => webhook.validate_create(request.object.as_ref()),
        Operation::Update => {
            webhook.validate_update(request.old_object.as_ref(), request.object.as_ref())
        }
        Operation::Delete => webhook.validate_delete(request.old_object.as_ref()),
        Operation::Connect => Ok(Warnings::new()),
    }
}

#[test]
fn test_create_with_empty_mapping_is_clean() {
    let object = CollectorBuilder::new("simplest")
        .config(json!({"batch": {}}))
        .build_value();

    let warnings = route(admission_review("CREATE", Some(object), None)).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_create_with_null_entry_warns() {
    let object = CollectorBuilder::new("simplest")
        .config(json!({"batch": null}))
        .build_value();

    let warnings = route(admission_review("CREATE", Some(object), None)).unwrap();
    assert_eq!(warnings, vec![NULL_BATCH_WARNING]);
}

#[test]
fn test_create_with_two_null_entries_warns_once() {
    let object = CollectorBuilder::new("simplest")
        .config(json!({"batch": null, "memory_limiter": null}))
        .build_value();

    let warnings = route(admission_review("CREATE", Some(object), None)).unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("null objects: batch, memory_limiter."));
}

#[test]
fn test_update_ignores_missing_old_object() {
    let object = CollectorBuilder::new("simplest")
        .config(json!({"receivers": {"otlp": {}}}))
        .build_value();

    let warnings = route(admission_review("UPDATE", Some(object), None)).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_update_checks_only_the_new_object() {
    let old = CollectorBuilder::new("simplest")
        .config(json!({"batch": null}))
        .build_value();
    let new = CollectorBuilder::new("simplest")
        .config(json!({"batch": {}}))
        .build_value();

    let warnings = route(admission_review("UPDATE", Some(new), Some(old))).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_delete_without_object_is_a_type_mismatch() {
    let err = route(admission_review("DELETE", None, None)).unwrap_err();
    assert!(matches!(err, AdmissionError::TypeMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "expected an OpenTelemetryCollector, received nil"
    );
}

#[test]
fn test_delete_surfaces_final_state_warnings() {
    let old = CollectorBuilder::new("simplest")
        .config(json!({"batch": null}))
        .build_value();

    let warnings = route(admission_review("DELETE", None, Some(old))).unwrap();
    assert_eq!(warnings, vec![NULL_BATCH_WARNING]);
}

#[test]
fn test_wrong_kind_is_rejected() {
    let object = CollectorBuilder::new("simplest").kind("Pod").build_value();

    let err = route(admission_review("CREATE", Some(object), None)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected an OpenTelemetryCollector, received Pod"
    );
}

#[test]
fn test_warnings_appear_in_the_review_response() {
    let object = CollectorBuilder::new("simplest")
        .config(json!({"batch": null}))
        .build_value();
    let request = parse(admission_review("CREATE", Some(object), None));

    let warnings = CollectorWebhook
        .validate_create(request.object.as_ref())
        .unwrap();
    let mut response = AdmissionResponse::from(&request);
    response.warnings = Some(warnings);

    let body = serde_json::to_value(response.into_review()).unwrap();
    assert_eq!(body["response"]["allowed"], json!(true));
    assert_eq!(body["response"]["warnings"], json!([NULL_BATCH_WARNING]));
}

#[test]
fn test_defaulting_through_a_review_leaves_the_object_unchanged() {
    let object = CollectorBuilder::new("simplest")
        .config(json!({"receivers": {"otlp": {}}}))
        .build_value();
    let request = parse(admission_review("CREATE", Some(object), None));

    let original = request.object.clone().unwrap();
    let mut defaulted = original.clone();
    CollectorWebhook.default(Some(&mut defaulted)).unwrap();

    assert_eq!(
        serde_json::to_value(&original).unwrap(),
        serde_json::to_value(&defaulted).unwrap()
    );
}
