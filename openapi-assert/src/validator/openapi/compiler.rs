use anyhow::{Context, anyhow};
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use slog::{Logger, debug, warn};
use std::sync::Arc;

use crate::StdResult;
use crate::cache::ValidatorCache;
use crate::entities::SchemaId;
use crate::logging::LoggerExtensions;
use crate::validator::openapi::{
    OpenApiDocument, OpenApiRequestValidator, OpenApiResponseValidator, SchemaChecker,
};
use crate::validator::{CompiledValidatorSet, SpecificationCompiler};

const DOCUMENT_CACHE_KEY_PREFIX: &str = "openapi-document";

/// [SpecificationCompiler] reading OpenAPI documents from YAML or JSON files.
///
/// When a [ValidatorCache] is given, the parsed document is stored under the digest of the file
/// content so unchanged documents are not parsed again.
pub struct OpenApiSpecificationCompiler {
    logger: Logger,
}

impl OpenApiSpecificationCompiler {
    /// [OpenApiSpecificationCompiler] factory
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    fn load_document(
        &self,
        schema_id: &SchemaId,
        cache: Option<&dyn ValidatorCache>,
    ) -> StdResult<Value> {
        let path = schema_id.to_file_path()?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read OpenAPI document '{schema_id}'"))?;

        let Some(cache) = cache else {
            return parse_document(schema_id, &content);
        };

        let key = document_cache_key(&content);
        match cache.get(&key) {
            Ok(Some(cached)) => match serde_json::from_slice(&cached) {
                Ok(document) => {
                    debug!(self.logger, "Parsed document found in cache"; "schema_id" => schema_id.as_str(), "key" => &key);
                    return Ok(document);
                }
                Err(error) => {
                    warn!(self.logger, "Unusable cached document, parsing it again"; "key" => &key, "error" => ?error);
                }
            },
            Ok(None) => {
                debug!(self.logger, "Parsed document not in cache"; "schema_id" => schema_id.as_str(), "key" => &key);
            }
            Err(error) => {
                warn!(self.logger, "Could not read the validator cache"; "key" => &key, "error" => ?error);
            }
        }

        let document = parse_document(schema_id, &content)?;
        if let Err(error) = serde_json::to_vec(&document)
            .map_err(anyhow::Error::from)
            .and_then(|serialized| cache.set(&key, serialized))
        {
            warn!(self.logger, "Could not store the parsed document in the validator cache"; "key" => &key, "error" => ?error);
        }

        Ok(document)
    }
}

impl SpecificationCompiler for OpenApiSpecificationCompiler {
    fn compile(
        &self,
        schema_id: &SchemaId,
        cache: Option<Arc<dyn ValidatorCache>>,
    ) -> StdResult<CompiledValidatorSet> {
        debug!(self.logger, "Compiling OpenAPI document"; "schema_id" => schema_id.as_str());
        let root = self.load_document(schema_id, cache.as_deref())?;
        let document = Arc::new(
            OpenApiDocument::from_value(root)
                .with_context(|| format!("Invalid OpenAPI document '{schema_id}'"))?,
        );
        let checker = Arc::new(SchemaChecker::new(document.clone()));
        let schemas = document.operation_schemas();
        for (location, schema) in &schemas {
            checker.prepare(schema).with_context(|| {
                format!("Invalid schema for {location} in OpenAPI document '{schema_id}'")
            })?;
        }
        debug!(self.logger, "Compiled operation schemas"; "schema_id" => schema_id.as_str(), "count" => schemas.len());

        Ok(CompiledValidatorSet::new(
            Arc::new(OpenApiRequestValidator::new(
                document.clone(),
                checker.clone(),
                &self.logger,
            )),
            Arc::new(OpenApiResponseValidator::new(document, checker, &self.logger)),
        ))
    }
}

fn document_cache_key(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());

    format!("{DOCUMENT_CACHE_KEY_PREFIX}-{}", hex::encode(hasher.finalize()))
}

fn parse_document(schema_id: &SchemaId, content: &str) -> StdResult<Value> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Could not parse OpenAPI document '{schema_id}'"))?;
    yaml.apply_merge()
        .with_context(|| format!("Could not apply merge keys of OpenAPI document '{schema_id}'"))?;

    yaml_to_json(yaml).with_context(|| format!("Unsupported content in OpenAPI document '{schema_id}'"))
}

/// Convert a YAML value to JSON, scalar mapping keys (ie: unquoted status codes) are converted
/// to strings.
fn yaml_to_json(value: serde_yaml::Value) -> StdResult<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(boolean) => Value::Bool(boolean),
        Yaml::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Value::from(integer)
            } else if let Some(integer) = number.as_u64() {
                Value::from(integer)
            } else {
                number
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| anyhow!("Unsupported number: {number}"))?
            }
        }
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<StdResult<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(text) => text,
                    Yaml::Number(number) => number.to_string(),
                    Yaml::Bool(boolean) => boolean.to_string(),
                    other => return Err(anyhow!("Unsupported mapping key: {other:?}")),
                };
                object.insert(key, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}
