use serde_json::{Number, Value};

use crate::failure::{PathSegment, ValidationFailure};
use crate::validator::openapi::{OpenApiDocument, SchemaChecker};

/// Kind of a value carried outside of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A path, query or header parameter of a request
    Argument,

    /// A header of a response
    Header,
}

impl ParameterKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Argument => "argument",
            Self::Header => "header",
        }
    }
}

/// Check the raw (textual) values of a parameter against its schema.
///
/// Raw values are converted to the type expected by the schema before being checked, arrays
/// collect every value given for the parameter.
pub fn check_parameter(
    document: &OpenApiDocument,
    checker: &SchemaChecker,
    kind: ParameterKind,
    name: &str,
    schema: &Value,
    raw_values: &[&str],
    subject: &str,
) -> Result<(), ValidationFailure> {
    let schema = document.resolve(schema);
    let value = match schema_type(schema) {
        Some("array") => {
            let items_schema = schema.get("items").map(|items| document.resolve(items));
            Value::Array(
                raw_values
                    .iter()
                    .flat_map(|raw| raw.split(','))
                    .map(|raw| coerce(raw, items_schema))
                    .collect(),
            )
        }
        _ => coerce(raw_values.first().copied().unwrap_or_default(), Some(schema)),
    };

    checker
        .check(schema, &value, &[PathSegment::Key(name.to_string())])
        .map_err(|cause| {
            ValidationFailure::new(format!(
                "Value \"{}\" for {} \"{name}\" is invalid for {subject}",
                raw_values.join(","),
                kind.label()
            ))
            .with_cause(cause)
        })
}

fn schema_type(schema: &Value) -> Option<&str> {
    schema.get("type").and_then(Value::as_str)
}

/// Convert a raw value to the type of the schema, keeping it as a string if it can't be
/// converted so the mismatch is reported by the schema check.
fn coerce(raw: &str, schema: Option<&Value>) -> Value {
    let as_string = || Value::String(raw.to_string());
    match schema.and_then(schema_type) {
        Some("integer") => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| as_string()),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(as_string),
        Some("boolean") => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => as_string(),
        },
        _ => as_string(),
    }
}
