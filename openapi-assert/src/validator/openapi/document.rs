use anyhow::anyhow;
use jsonschema::Draft;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use crate::StdResult;

const MAX_REFERENCE_DEPTH: usize = 32;

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// An operation of the document matched by a method and a path.
#[derive(Debug)]
pub struct OperationLookup<'a> {
    /// Key of the path item in the document `paths`
    pub path_template: &'a str,

    /// Path item holding the operation
    pub path_item: &'a Value,

    /// The operation object
    pub operation: &'a Value,

    /// Values of the templated segments of the path, by parameter name
    pub path_parameters: BTreeMap<String, String>,
}

/// A parsed OpenAPI 3.x document.
#[derive(Debug)]
pub struct OpenApiDocument {
    root: Value,
    base_paths: Vec<String>,
}

impl OpenApiDocument {
    /// Check that the given value looks like an OpenAPI 3.x document and wrap it.
    pub fn from_value(root: Value) -> StdResult<Self> {
        let version = root
            .get("openapi")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Not an OpenAPI document: missing `openapi` version field"))?;
        if !version.starts_with("3.") {
            return Err(anyhow!(
                "Unsupported OpenAPI version '{version}', only 3.x documents are supported"
            ));
        }
        if !root.get("paths").is_some_and(Value::is_object) {
            return Err(anyhow!("Invalid OpenAPI document: `paths` must be an object"));
        }

        let base_paths = root
            .get("servers")
            .and_then(Value::as_array)
            .map(|servers| {
                servers
                    .iter()
                    .filter_map(|server| server.get("url").and_then(Value::as_str))
                    .filter_map(server_base_path)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { root, base_paths })
    }

    /// JSON-Schema draft of the embedded schemas: OpenAPI 3.1 is aligned on 2020-12, previous
    /// versions use an extended subset of draft 4.
    pub fn draft(&self) -> Draft {
        match self.root.get("openapi").and_then(Value::as_str) {
            Some(version) if version.starts_with("3.1") => Draft::Draft202012,
            _ => Draft::Draft4,
        }
    }

    /// Follow the local `$ref` of the given value, if any.
    ///
    /// An unresolvable reference yields the value holding it.
    pub fn resolve<'a>(&'a self, value: &'a Value) -> &'a Value {
        let mut current = value;
        for _ in 0..MAX_REFERENCE_DEPTH {
            let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
                break;
            };
            match reference
                .strip_prefix('#')
                .and_then(|pointer| self.root.pointer(pointer))
            {
                Some(target) => current = target,
                None => break,
            }
        }

        current
    }

    /// Copy of the given schema with the document `components` attached, so the references it
    /// contains can be resolved when compiled on its own.
    ///
    /// For OpenAPI 3.0 documents the `nullable` keyword, unknown to JSON-Schema, is rewritten
    /// into an equivalent schema accepting `null`.
    pub fn schema_with_components(&self, schema: &Value) -> Value {
        let mut schema = match (schema, self.root.get("components")) {
            (Value::Object(object), Some(components)) if !object.contains_key("components") => {
                let mut object = object.clone();
                object.insert("components".to_string(), components.clone());
                Value::Object(object)
            }
            _ => schema.clone(),
        };
        if self.draft() == Draft::Draft4 {
            rewrite_nullable(&mut schema);
        }

        schema
    }

    /// Find the operation handling a concrete request path.
    ///
    /// Server base paths are stripped before matching and templates without parameters
    /// are preferred over templated ones.
    pub fn find_operation(&self, method: &str, path: &str) -> Option<OperationLookup<'_>> {
        let method = method.to_lowercase();
        let mut best: Option<(usize, OperationLookup)> = None;

        for candidate in self.candidate_paths(path) {
            for (template, path_item) in self.paths() {
                let Some(operation) = path_item.get(&method) else {
                    continue;
                };
                let Some(path_parameters) = match_template(template, &candidate) else {
                    continue;
                };
                let templated_segments = path_parameters.len();
                if best
                    .as_ref()
                    .is_none_or(|(best_count, _)| templated_segments < *best_count)
                {
                    best = Some((
                        templated_segments,
                        OperationLookup {
                            path_template: template,
                            path_item,
                            operation,
                            path_parameters,
                        },
                    ));
                }
            }
        }

        best.map(|(_, lookup)| lookup)
    }

    /// Find an operation by its path template, or if none is declared with this exact
    /// template, by matching it as a concrete path.
    pub fn operation(&self, method: &str, path: &str) -> Option<OperationLookup<'_>> {
        let method = method.to_lowercase();
        let exact_match = self
            .paths()
            .filter(|(template, _)| template.as_str() == path)
            .find_map(|(template, path_item)| {
                path_item.get(&method).map(|operation| OperationLookup {
                    path_template: template,
                    path_item,
                    operation,
                    path_parameters: BTreeMap::new(),
                })
            });

        exact_match.or_else(|| self.find_operation(&method, path))
    }

    /// Parameters of an operation: the path item ones overridden by the operation ones, with
    /// references resolved.
    pub fn parameters<'a>(&'a self, lookup: &OperationLookup<'a>) -> Vec<&'a Value> {
        let mut parameters: Vec<&Value> = vec![];
        let declared = [lookup.path_item, lookup.operation]
            .into_iter()
            .filter_map(|holder| holder.get("parameters").and_then(Value::as_array))
            .flatten()
            .map(|parameter| self.resolve(parameter));

        for parameter in declared {
            parameters.retain(|existing| !same_parameter(existing, parameter));
            parameters.push(parameter);
        }

        parameters
    }

    /// Schemas applied to the exchanges of every operation: parameters, request bodies,
    /// response bodies and response headers, with a description of their location.
    pub fn operation_schemas(&self) -> Vec<(String, &Value)> {
        let mut schemas = vec![];
        for (template, path_item) in self.paths() {
            let operations = path_item
                .as_object()
                .into_iter()
                .flat_map(Map::iter)
                .filter(|(method, _)| HTTP_METHODS.contains(&method.as_str()));

            for (method, operation) in operations {
                let location = format!("[{method} {template}]");
                let lookup = OperationLookup {
                    path_template: template,
                    path_item,
                    operation,
                    path_parameters: BTreeMap::new(),
                };

                for parameter in self.parameters(&lookup) {
                    if let Some(schema) = parameter.get("schema") {
                        let name = parameter.get("name").and_then(Value::as_str).unwrap_or_default();
                        schemas.push((format!("parameter \"{name}\" of {location}"), schema));
                    }
                }
                if let Some(request_body) = operation.get("requestBody") {
                    for (media_type, schema) in self.content_schemas(self.resolve(request_body)) {
                        schemas.push((format!("request body \"{media_type}\" of {location}"), schema));
                    }
                }

                let responses = operation
                    .get("responses")
                    .and_then(Value::as_object)
                    .into_iter()
                    .flat_map(Map::iter);
                for (status, response) in responses {
                    let response = self.resolve(response);
                    for (media_type, schema) in self.content_schemas(response) {
                        schemas.push((
                            format!("response {status} body \"{media_type}\" of {location}"),
                            schema,
                        ));
                    }

                    let headers = response
                        .get("headers")
                        .and_then(Value::as_object)
                        .into_iter()
                        .flat_map(Map::iter);
                    for (name, header) in headers {
                        if let Some(schema) = self.resolve(header).get("schema") {
                            schemas.push((
                                format!("response {status} header \"{name}\" of {location}"),
                                schema,
                            ));
                        }
                    }
                }
            }
        }

        schemas
    }

    fn content_schemas<'a>(&'a self, holder: &'a Value) -> Vec<(&'a String, &'a Value)> {
        holder
            .get("content")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(Map::iter)
            .filter_map(|(media_type, media_type_object)| {
                self.resolve(media_type_object)
                    .get("schema")
                    .map(|schema| (media_type, schema))
            })
            .collect()
    }

    fn paths(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(Map::iter)
    }

    fn candidate_paths(&self, path: &str) -> Vec<String> {
        let mut candidates = vec![path.to_string()];
        for base_path in &self.base_paths {
            if let Some(remaining) = path.strip_prefix(base_path.as_str()) {
                if remaining.is_empty() {
                    candidates.push("/".to_string());
                } else if remaining.starts_with('/') {
                    candidates.push(remaining.to_string());
                }
            }
        }

        candidates
    }
}

/// Replace every `nullable` keyword: `nullable: true` schemas are widened to accept `null`.
///
/// The keyword is removed so an already rewritten schema is left unchanged.
fn rewrite_nullable(value: &mut Value) {
    let object = match value {
        Value::Array(items) => {
            items.iter_mut().for_each(rewrite_nullable);
            return;
        }
        Value::Object(object) => object,
        _ => return,
    };
    object.values_mut().for_each(rewrite_nullable);

    let nullable = match object.get("nullable") {
        Some(Value::Bool(nullable)) => *nullable,
        _ => return,
    };
    object.remove("nullable");
    if !nullable {
        return;
    }

    if let Some(Value::Array(values)) = object.get_mut("enum") {
        if !values.contains(&Value::Null) {
            values.push(Value::Null);
        }
    }
    let has_enum = object.contains_key("enum");
    match object.get_mut("type") {
        Some(Value::Array(types)) => {
            if !types.contains(&json!("null")) {
                types.push(json!("null"));
            }
        }
        Some(type_value) if type_value.is_string() => {
            let single_type = type_value.take();
            *type_value = json!([single_type, "null"]);
        }
        _ if has_enum => {}
        _ => {
            let schema = Value::Object(std::mem::take(object));
            *value = json!({"anyOf": [schema, {"type": "null"}]});
        }
    }
}

fn same_parameter(left: &Value, right: &Value) -> bool {
    left.get("name") == right.get("name") && left.get("in") == right.get("in")
}

fn server_base_path(url: &str) -> Option<String> {
    let path = match url.split_once("://") {
        Some((_, after_scheme)) => after_scheme.find('/').map(|index| &after_scheme[index..])?,
        None => url,
    };
    let path = path.trim_end_matches('/');

    path.starts_with('/').then(|| path.to_string())
}

fn match_template(template: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return None;
    }

    let mut parameters = BTreeMap::new();
    for (template_segment, path_segment) in template_segments.iter().zip(path_segments) {
        match template_segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            Some(name) if !path_segment.is_empty() => {
                parameters.insert(name.to_string(), path_segment.to_string());
            }
            Some(_) => return None,
            None if *template_segment == path_segment => {}
            None => return None,
        }
    }

    Some(parameters)
}
