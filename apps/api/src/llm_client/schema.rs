//! Schema-as-data for structured generation.
//!
//! A single `Schema` value serves two purposes: it serializes into the
//! `responseSchema` field of a generateContent request (constraining what the
//! model may emit), and it validates the parsed response before typed
//! deserialization. One descriptor, both directions — "what we ask for" and
//! "what we accept" can never drift apart.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Primitive kind of a schema node, serialized in the uppercase form the
/// generateContent API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Number,
}

/// One node of a response schema tree.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    /// Object fields, in declaration order.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "properties_as_map"
    )]
    pub properties: Vec<(&'static str, Schema)>,
    /// Element schema for arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Closed set of permitted string values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<&'static str>,
    /// Names of mandatory fields of an object.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<&'static str>,
}

fn properties_as_map<S: Serializer>(
    properties: &[(&'static str, Schema)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for (name, schema) in properties {
        map.serialize_entry(name, schema)?;
    }
    map.end()
}

/// A structural mismatch between a response payload and its schema.
/// Paths are JSON-pointer-ish (`criteria.lexical.score`, `critique[2].type`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{path}`: expected {expected}, got {got}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("field `{path}`: `{value}` is not a permitted value")]
    EnumViolation { path: String, value: String },

    #[error("field `{path}`: {message}")]
    Constraint { path: String, message: String },
}

impl Schema {
    pub fn object(properties: Vec<(&'static str, Schema)>) -> Self {
        let required: Vec<&'static str> = properties.iter().map(|(name, _)| *name).collect();
        Schema {
            kind: SchemaKind::Object,
            properties,
            items: None,
            enum_values: Vec::new(),
            required,
        }
    }

    /// Marks only the given fields as required (objects default to all).
    pub fn required(mut self, fields: Vec<&'static str>) -> Self {
        self.required = fields;
        self
    }

    pub fn array(items: Schema) -> Self {
        Schema {
            kind: SchemaKind::Array,
            properties: Vec::new(),
            items: Some(Box::new(items)),
            enum_values: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Schema {
            kind: SchemaKind::String,
            properties: Vec::new(),
            items: None,
            enum_values: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn string_enum(values: Vec<&'static str>) -> Self {
        Schema {
            kind: SchemaKind::String,
            properties: Vec::new(),
            items: None,
            enum_values: values,
            required: Vec::new(),
        }
    }

    pub fn number() -> Self {
        Schema {
            kind: SchemaKind::Number,
            properties: Vec::new(),
            items: None,
            enum_values: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Walks a parsed payload against this schema, surfacing the first
    /// violation. Unknown extra fields are tolerated; missing required
    /// fields, wrong primitive types, and out-of-enum strings are not.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        self.validate_at(value, "")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaError> {
        match self.kind {
            SchemaKind::Object => {
                let obj = value.as_object().ok_or_else(|| SchemaError::TypeMismatch {
                    path: display_path(path),
                    expected: "object",
                    got: kind_name(value),
                })?;
                for name in &self.required {
                    if !obj.contains_key(*name) {
                        return Err(SchemaError::MissingField(join_path(path, name)));
                    }
                }
                for (name, schema) in &self.properties {
                    if let Some(field) = obj.get(*name) {
                        schema.validate_at(field, &join_path(path, name))?;
                    }
                }
                Ok(())
            }
            SchemaKind::Array => {
                let elements = value.as_array().ok_or_else(|| SchemaError::TypeMismatch {
                    path: display_path(path),
                    expected: "array",
                    got: kind_name(value),
                })?;
                if let Some(items) = &self.items {
                    for (i, element) in elements.iter().enumerate() {
                        items.validate_at(element, &format!("{}[{i}]", display_path(path)))?;
                    }
                }
                Ok(())
            }
            SchemaKind::String => {
                let s = value.as_str().ok_or_else(|| SchemaError::TypeMismatch {
                    path: display_path(path),
                    expected: "string",
                    got: kind_name(value),
                })?;
                if !self.enum_values.is_empty() && !self.enum_values.contains(&s) {
                    return Err(SchemaError::EnumViolation {
                        path: display_path(path),
                        value: s.to_string(),
                    });
                }
                Ok(())
            }
            SchemaKind::Number => {
                if !value.is_number() {
                    return Err(SchemaError::TypeMismatch {
                        path: display_path(path),
                        expected: "number",
                        got: kind_name(value),
                    });
                }
                Ok(())
            }
        }
    }
}

fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
