//! Schema diagnostics for the text surface.
//!
//! Diagnostics are advisory. They are shown next to the text but never stop
//! the store from accepting it. The built-in validator understands the small
//! subset of JSON Schema the split config schema uses: top-level `required`,
//! property `type`, and array `items.type`.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use crate::catalog::SplitCatalog;
use crate::document::{json_kind, SPLIT_IDS_FIELD};

pub const SCHEMA_SOURCE: &str = include_str!("../assets/splits.schema.json");

static SPLITS_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(SCHEMA_SOURCE)
        .expect("Embedded split config schema should parse - it ships with the crate")
});

/// The split config schema shipped with the crate.
pub fn splits_schema() -> &'static Value {
    &SPLITS_SCHEMA
}

/// `$id` of a schema document, if it declares one.
pub fn schema_id(schema: &Value) -> Option<&str> {
    schema.get("$id").and_then(Value::as_str)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// JSON pointer to the offending value; empty for the whole document.
    pub path: String,
    pub message: String,
    /// Set for syntax errors only.
    pub position: Option<(usize, usize)>,
}

impl Diagnostic {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
            position: None,
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
            position: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.position, self.path.is_empty()) {
            (Some((line, column)), _) => write!(
                f,
                "{} (line {}, column {}): {}",
                self.severity, line, column, self.message
            ),
            (None, true) => write!(f, "{}: {}", self.severity, self.message),
            (None, false) => write!(f, "{} at {}: {}", self.severity, self.path, self.message),
        }
    }
}

/// Produces inline diagnostics for candidate text.
pub trait SchemaValidator {
    fn register_schema(&mut self, id: &str, schema: &Value);
    fn diagnose(&self, text: &str) -> Vec<Diagnostic>;
}

#[derive(Debug, Clone, Default)]
struct PropertyRule {
    kind: Option<String>,
    item_kind: Option<String>,
}

#[derive(Debug, Clone)]
struct RegisteredSchema {
    id: String,
    required: Vec<String>,
    properties: IndexMap<String, PropertyRule>,
}

impl RegisteredSchema {
    fn compile(id: &str, schema: &Value) -> Self {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| {
                        let rule = PropertyRule {
                            kind: type_name(prop),
                            item_kind: prop.get("items").and_then(type_name),
                        };
                        (name.clone(), rule)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: id.to_string(),
            required,
            properties,
        }
    }
}

fn type_name(schema: &Value) -> Option<String> {
    schema.get("type").and_then(Value::as_str).map(str::to_string)
}

fn matches_type(value: &Value, kind: &str) -> bool {
    match kind {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        // keywords this validator does not model are not reported
        _ => true,
    }
}

fn pointer_segment(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

/// Structural validator with optional catalog awareness.
#[derive(Debug, Clone, Default)]
pub struct BuiltinValidator<'c> {
    schema: Option<RegisteredSchema>,
    catalog: Option<&'c SplitCatalog>,
}

impl<'c> BuiltinValidator<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report split ids missing from `catalog` as warnings.
    pub fn with_catalog(catalog: &'c SplitCatalog) -> Self {
        Self {
            schema: None,
            catalog: Some(catalog),
        }
    }

    pub fn registered_schema_id(&self) -> Option<&str> {
        self.schema.as_ref().map(|s| s.id.as_str())
    }

    fn check_schema(
        &self,
        schema: &RegisteredSchema,
        root: &serde_json::Map<String, Value>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for name in &schema.required {
            if !root.contains_key(name) {
                diagnostics.push(Diagnostic::error(
                    "",
                    format!("missing required property '{name}'"),
                ));
            }
        }

        for (name, rule) in &schema.properties {
            let Some(value) = root.get(name) else {
                continue;
            };
            let path = format!("/{}", pointer_segment(name));

            if let Some(kind) = &rule.kind {
                if !matches_type(value, kind) {
                    diagnostics.push(Diagnostic::error(
                        path,
                        format!("expected {kind}, found {}", json_kind(value)),
                    ));
                    continue;
                }
            }

            if let (Some(item_kind), Some(items)) = (&rule.item_kind, value.as_array()) {
                for (index, item) in items.iter().enumerate() {
                    if !matches_type(item, item_kind) {
                        diagnostics.push(Diagnostic::error(
                            format!("{path}/{index}"),
                            format!("expected {item_kind}, found {}", json_kind(item)),
                        ));
                    }
                }
            }
        }

        diagnostics
    }

    fn check_catalog(
        &self,
        catalog: &SplitCatalog,
        root: &serde_json::Map<String, Value>,
    ) -> Vec<Diagnostic> {
        let Some(ids) = root.get(SPLIT_IDS_FIELD).and_then(Value::as_array) else {
            return Vec::new();
        };
        ids.iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let id = id.as_str()?;
                (!catalog.contains(id)).then(|| {
                    Diagnostic::warning(
                        format!("/{SPLIT_IDS_FIELD}/{index}"),
                        format!("unknown split id '{id}'"),
                    )
                })
            })
            .collect()
    }
}

impl SchemaValidator for BuiltinValidator<'_> {
    fn register_schema(&mut self, id: &str, schema: &Value) {
        if let Some(existing) = &self.schema {
            debug!("Replacing registered schema '{}' with '{}'", existing.id, id);
        }
        self.schema = Some(RegisteredSchema::compile(id, schema));
    }

    fn diagnose(&self, text: &str) -> Vec<Diagnostic> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                return vec![Diagnostic {
                    severity: Severity::Error,
                    path: String::new(),
                    message: e.to_string(),
                    position: Some((e.line(), e.column())),
                }]
            }
        };

        let Some(root) = value.as_object() else {
            return vec![Diagnostic::error(
                "",
                format!("expected object, found {}", json_kind(&value)),
            )];
        };

        let mut diagnostics = Vec::new();
        if let Some(schema) = &self.schema {
            diagnostics.extend(self.check_schema(schema, root));
        }
        if let Some(catalog) = self.catalog {
            diagnostics.extend(self.check_catalog(catalog, root));
        }
        diagnostics
    }
}
