use serde_json::{Map, Value};
use warp::hyper::body::Bytes;

use crate::failure::ValidationFailure;
use crate::validator::openapi::{OpenApiDocument, SchemaChecker};

/// Check a body against the media types declared in an OpenAPI `content` object.
///
/// Only JSON media types are checked against their schema, other declared media types are
/// accepted as is.
pub fn check_body(
    document: &OpenApiDocument,
    checker: &SchemaChecker,
    content: &Map<String, Value>,
    media_type: Option<String>,
    body: &Bytes,
    subject: &str,
) -> Result<(), ValidationFailure> {
    let media_type = media_type.ok_or_else(|| {
        ValidationFailure::new(format!("Content-Type header is missing for {subject}"))
    })?;
    let media_type_object = find_media_type(content, &media_type).ok_or_else(|| {
        ValidationFailure::new(format!(
            "Content-Type \"{media_type}\" is not expected for {subject}"
        ))
    })?;
    let Some(schema) = document.resolve(media_type_object).get("schema") else {
        return Ok(());
    };
    if !is_json(&media_type) {
        return Ok(());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationFailure::new(format!("JSON parsing failed with \"{e}\" for {subject}"))
    })?;

    checker.check(schema, &value, &[]).map_err(|cause| {
        ValidationFailure::new(format!(
            "Body does not match schema for content-type \"{media_type}\" for {subject}"
        ))
        .with_cause(cause)
    })
}

fn find_media_type<'a>(content: &'a Map<String, Value>, media_type: &str) -> Option<&'a Value> {
    let wildcard_subtype = media_type
        .split_once('/')
        .map(|(main_type, _)| format!("{main_type}/*"));

    content
        .get(media_type)
        .or_else(|| wildcard_subtype.and_then(|wildcard| content.get(&wildcard)))
        .or_else(|| content.get("*/*"))
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}
