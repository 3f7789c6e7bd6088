use anyhow::anyhow;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use crate::StdResult;
use crate::failure::{Breadcrumb, PathSegment, ValidationFailure};
use crate::validator::openapi::OpenApiDocument;

struct CompiledSchema {
    schema: Value,
    validator: Validator,
}

/// Validate values against the schemas embedded in an [OpenApiDocument].
///
/// Compiled schemas are kept for the lifetime of the checker.
pub struct SchemaChecker {
    document: Arc<OpenApiDocument>,
    compiled_schemas: RwLock<HashMap<String, Arc<CompiledSchema>>>,
}

impl SchemaChecker {
    /// [SchemaChecker] factory
    pub fn new(document: Arc<OpenApiDocument>) -> Self {
        Self {
            document,
            compiled_schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Validate the instance against the schema, reporting the first mismatch.
    ///
    /// The `base` segments prefix the location of the reported failures.
    pub fn check(
        &self,
        schema: &Value,
        instance: &Value,
        base: &[PathSegment],
    ) -> Result<(), ValidationFailure> {
        let compiled = self
            .compile(schema)
            .map_err(|e| ValidationFailure::new(format!("{e:#}")))?;
        let first_error = compiled.validator.iter_errors(instance).next();

        match first_error {
            None => Ok(()),
            Some(error) => Err(self.failure_from_error(&compiled.schema, &error, base)),
        }
    }

    /// Compile the schema ahead of its first check, failing if it is not a valid schema.
    pub fn prepare(&self, schema: &Value) -> StdResult<()> {
        self.compile(schema).map(|_| ())
    }

    fn compile(&self, schema: &Value) -> StdResult<Arc<CompiledSchema>> {
        let key = schema.to_string();
        {
            let compiled_schemas = self
                .compiled_schemas
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(compiled) = compiled_schemas.get(&key) {
                return Ok(compiled.clone());
            }
        }

        let schema = self.document.schema_with_components(schema);
        let validator = jsonschema::options()
            .with_draft(self.document.draft())
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| anyhow!("Schema could not be compiled: {e}"))?;
        let compiled = Arc::new(CompiledSchema { schema, validator });

        self.compiled_schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, compiled.clone());

        Ok(compiled)
    }

    fn failure_from_error(
        &self,
        schema: &Value,
        error: &ValidationError,
        base: &[PathSegment],
    ) -> ValidationFailure {
        let breadcrumb = Breadcrumb::from_pointer(base, &error.instance_path.to_string());

        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let property = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());

                ValidationFailure::new(format!(
                    "Keyword validation failed: Required property '{property}' must be present in the object"
                ))
                .with_breadcrumb(breadcrumb.child(PathSegment::Key(property)))
            }
            ValidationErrorKind::OneOfNotValid { .. } => ValidationFailure::new(
                "Keyword validation failed: Data must match exactly one schema, but matched none",
            )
            .with_inner_failures(self.rejected_alternatives(schema, error, &breadcrumb))
            .with_breadcrumb(breadcrumb),
            ValidationErrorKind::OneOfMultipleValid { .. } => ValidationFailure::new(
                "Keyword validation failed: Data must match exactly one schema, but matched multiple",
            )
            .with_breadcrumb(breadcrumb),
            ValidationErrorKind::AnyOf { .. } => {
                ValidationFailure::new("Keyword validation failed: Data must match at least one schema")
                    .with_inner_failures(self.rejected_alternatives(schema, error, &breadcrumb))
                    .with_breadcrumb(breadcrumb)
            }
            ValidationErrorKind::Format { format } => ValidationFailure::new(format!(
                "Value '{}' does not match format {format} of type {}",
                scalar_text(&error.instance),
                type_name(&error.instance)
            ))
            .with_breadcrumb(breadcrumb),
            _ => ValidationFailure::new(format!("Keyword validation failed: {error}"))
                .with_breadcrumb(breadcrumb),
        }
    }

    /// Validate the failing instance against each alternative of the `oneOf`/`anyOf` keyword
    /// that rejected it.
    fn rejected_alternatives(
        &self,
        schema: &Value,
        error: &ValidationError,
        breadcrumb: &Breadcrumb,
    ) -> BTreeMap<usize, ValidationFailure> {
        let Some(alternatives) =
            locate_keyword(schema, &error.schema_path.to_string()).and_then(Value::as_array)
        else {
            return BTreeMap::new();
        };
        let instance_location: Vec<PathSegment> =
            breadcrumb.segments().into_iter().cloned().collect();

        alternatives
            .iter()
            .enumerate()
            .filter_map(|(index, alternative)| {
                self.check(alternative, &error.instance, &instance_location)
                    .err()
                    .map(|failure| (index, failure))
            })
            .collect()
    }
}

/// Walk a schema location (JSON pointer) from the root schema, following `$ref` segments.
fn locate_keyword<'a>(root: &'a Value, schema_location: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in schema_location.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        current = if segment == "$ref" {
            let reference = current.get("$ref")?.as_str()?;
            root.pointer(reference.strip_prefix('#')?)?
        } else {
            match current {
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => current.get(segment.as_str())?,
            }
        };
    }

    Some(current)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
