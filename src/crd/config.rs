//! The schema-less collector configuration document.
//!
//! The collector config carried in `spec.config` has no schema of its own:
//! receivers, processors, exporters and service pipelines are free-form
//! mappings owned by the collector distribution. The operator only needs to
//! traverse the document generically, so it is stored as raw JSON. Mapping
//! keys keep their document order (`serde_json` with `preserve_order`), so
//! traversal output is stable across calls.

use schemars::JsonSchema;
use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator used when reporting the path of a nested null entry.
pub const NULL_PATH_SEPARATOR: &str = "/";

/// The collector configuration document carried in `spec.config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CollectorConfig(pub Value);

impl CollectorConfig {
    /// True when no configuration document was provided.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Paths of all mapping entries whose value is null, in document order.
    ///
    /// An authored key with a null value (`batch:`) is distinct from an
    /// empty mapping (`batch: {}`); only the former is reported. Nested
    /// paths join their segments with [`NULL_PATH_SEPARATOR`]. Sequences
    /// are traversed (a mapping inside a sequence is addressed by the
    /// element index) but a null sequence element is not itself reported.
    pub fn null_objects(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_null_paths(&self.0, &mut Vec::new(), &mut paths);
        paths
    }
}

fn collect_null_paths(node: &Value, trail: &mut Vec<String>, paths: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                trail.push(key.clone());
                if child.is_null() {
                    paths.push(trail.join(NULL_PATH_SEPARATOR));
                } else {
                    collect_null_paths(child, trail, paths);
                }
                trail.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                trail.push(index.to_string());
                collect_null_paths(child, trail, paths);
                trail.pop();
            }
        }
        _ => {}
    }
}

impl JsonSchema for CollectorConfig {
    fn schema_name() -> String {
        "CollectorConfig".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        // Free-form object; the API server must keep unknown fields.
        let mut schema = SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            ..SchemaObject::default()
        };
        schema.extensions.insert(
            "x-kubernetes-preserve-unknown-fields".to_owned(),
            Value::Bool(true),
        );
        Schema::Object(schema)
    }
}
