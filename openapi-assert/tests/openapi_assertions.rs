mod test_extensions;

use serde_json::json;
use warp::http::Request;
use warp::hyper::body::Bytes;

use openapi_assert::{
    AssertionConfiguration, OpenApiAssertionError, OpenApiAssertionsBuilder, OperationMatch,
    SchemaId, Scope, logging::discard_logger,
};
use test_extensions::exchange::{empty_response, get_request, json_request, json_response};
use test_extensions::utilities::{
    fixture, fixtures_dir, get_test_dir, recording_assertions, recording_assertions_from,
};

#[test]
fn undeclared_operation_is_a_request_error() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi-status.json"),
        &get_request("/hello-world"),
        &json_response(200, &json!({"hello": "world"})),
    );

    assert_eq!(
        "OpenAPI request error:\nOpenAPI spec contains no such operation [/hello-world,get]",
        sink.single_message()
    );
}

#[test]
fn missing_required_property_is_located() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &get_request("/hello-world"),
        &json_response(200, &json!({"foo": "bar"})),
    );

    assert_eq!(
        [
            "OpenAPI response error at hello:",
            "Body does not match schema for content-type \"application/json\" for Response [get /hello-world 200]",
            "Keyword validation failed: Required property 'hello' must be present in the object",
        ]
        .join("\n"),
        sink.single_message()
    );
}

#[test]
fn one_of_mismatch_lists_every_rejected_alternative() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &get_request("/match-oneof"),
        &json_response(200, &json!({"foo": "bar"})),
    );

    assert_eq!(
        [
            "OpenAPI response error:",
            "Body does not match schema for content-type \"application/json\" for Response [get /match-oneof 200]",
            "Keyword validation failed: Data must match exactly one schema, but matched none",
            "==> Schema 1: Keyword validation failed: Required property 'hello' must be present in the object (at hello)",
            "==> Schema 2: Keyword validation failed: Required property 'nested' must be present in the object (at nested)",
        ]
        .join("\n"),
        sink.single_message()
    );
}

#[test]
fn nested_property_path_is_dot_joined() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &get_request("/nested-property"),
        &json_response(200, &json!({"nested": {}})),
    );

    assert_eq!(
        [
            "OpenAPI response error at nested.property:",
            "Body does not match schema for content-type \"application/json\" for Response [get /nested-property 200]",
            "Keyword validation failed: Required property 'property' must be present in the object",
        ]
        .join("\n"),
        sink.single_message()
    );
}

#[test]
fn conforming_exchanges_raise_nothing() {
    let (assertions, sink) = recording_assertions();
    let schema_id = fixture("openapi.yaml");

    assertions.assert_schema(
        &schema_id,
        &get_request("/hello-world"),
        &json_response(200, &json!({"hello": "world"})),
    );
    assertions.assert_schema(
        &schema_id,
        &get_request("/match-oneof"),
        &json_response(200, &json!({"nested": {"property": "value"}})),
    );
    assertions.assert_schema(
        &schema_id,
        &get_request("/api/users/12?verbose=true"),
        &json_response(200, &json!({"id": 12, "name": "john"})),
    );
    assertions.assert_schema(
        &schema_id,
        &get_request("/users/404"),
        &empty_response(404),
    );
    assertions.assert_schema(
        &schema_id,
        &json_request("POST", "/input-validation", &json!({"email": "john.doe@example.org"})),
        &empty_response(201),
    );

    assert_eq!(Vec::<String>::new(), sink.messages());
    assert_eq!(1, assertions.registry().compiled_schemas_count());
}

#[test]
fn invalid_request_body_is_a_request_error_and_skips_the_response() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &json_request("POST", "/input-validation", &json!({"email": "john.doe"})),
        // Would fail as well, but is never validated
        &json_response(422, &json!({"unexpected": true})),
    );

    assert_eq!(
        [
            "OpenAPI request error at email:",
            "Body does not match schema for content-type \"application/json\" for Request [post /input-validation]",
            "Value 'john.doe' does not match format email of type string",
        ]
        .join("\n"),
        sink.single_message()
    );
}

#[test]
fn invalid_path_parameter_is_a_request_error() {
    let (assertions, _sink) = recording_assertions();

    let result = assertions.check_schema(
        &fixture("openapi.yaml"),
        &get_request("/users/abc"),
        &json_response(200, &json!({"id": 12, "name": "john"})),
    );

    match result {
        Err(OpenApiAssertionError::Validation(diagnostic)) => {
            assert_eq!(Scope::Request, diagnostic.scope());
            assert_eq!(Some("id"), diagnostic.path());
            assert_eq!(
                "Value \"abc\" for argument \"id\" is invalid for Request [get /users/{id}]",
                diagnostic.lines()[0]
            );
        }
        other => panic!("expected a request validation error, got: {other:?}"),
    }
}

#[test]
fn response_only_accepts_a_conforming_error_response() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_response_only(
        &fixture("openapi.yaml"),
        &json_request("POST", "/input-validation", &json!({"email": "john.doe"})),
        &json_response(422, &json!({"message": "invalid email"})),
        None,
    );

    assert_eq!(Vec::<String>::new(), sink.messages());
}

#[test]
fn response_only_reports_a_non_conforming_error_response() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_response_only(
        &fixture("openapi.yaml"),
        &json_request("POST", "/input-validation", &json!({"email": "john.doe"})),
        &json_response(422, &json!({"error": "invalid email"})),
        None,
    );

    assert_eq!(
        [
            "OpenAPI response error at message:",
            "Body does not match schema for content-type \"application/json\" for Response [post /input-validation 422]",
            "Keyword validation failed: Required property 'message' must be present in the object",
        ]
        .join("\n"),
        sink.single_message()
    );
}

#[test]
fn response_only_with_an_explicit_operation() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_response_only(
        &fixture("openapi.yaml"),
        &get_request("/users/12"),
        &json_response(200, &json!({"id": "12"})),
        Some(OperationMatch::new("GET", "/users/{id}")),
    );

    let message = sink.single_message();
    assert!(
        message.starts_with("OpenAPI response error at ")
            && message.contains("for Response [get /users/{id} 200]"),
        "unexpected message: {message}"
    );
}

#[test]
fn undeclared_response_status_is_a_response_error() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &get_request("/hello-world"),
        &empty_response(500),
    );

    assert_eq!(
        "OpenAPI response error:\nOpenAPI spec contains no such response [500] for Response [get /hello-world]",
        sink.single_message()
    );
}

#[test]
fn openapi_3_1_documents_are_supported() {
    let (assertions, sink) = recording_assertions();

    assertions.assert_schema(
        &fixture("openapi-status.json"),
        &get_request("/status"),
        &json_response(200, &json!({"status": "sideways"})),
    );

    let message = sink.single_message();
    assert!(
        message.starts_with("OpenAPI response error at status:\n")
            && message.contains("Keyword validation failed: "),
        "unexpected message: {message}"
    );
}

#[test]
fn missing_document_is_a_configuration_error() {
    let (assertions, sink) = recording_assertions();
    let schema_id = fixture("not-existing.yaml");

    assertions.assert_schema(
        &schema_id,
        &get_request("/hello-world"),
        &empty_response(200),
    );

    let message = sink.single_message();
    assert!(
        message.starts_with(&format!("OpenAPI configuration error for '{schema_id}'")),
        "unexpected message: {message}"
    );
    assert_eq!(0, assertions.registry().compiled_schemas_count());
}

#[test]
fn unsupported_uri_scheme_is_a_configuration_error() {
    let (assertions, _sink) = recording_assertions();

    let result = assertions.check_schema(
        &SchemaId::new("https://example.org/openapi.yaml"),
        &get_request("/hello-world"),
        &empty_response(200),
    );

    match result {
        Err(error @ OpenApiAssertionError::Configuration { .. }) => {
            assert!(
                error.failure_message().contains("Unsupported scheme 'https'"),
                "unexpected message: {}",
                error.failure_message()
            );
        }
        other => panic!("expected a configuration error, got: {other:?}"),
    }
}

#[test]
fn persistent_cache_stores_the_parsed_document() {
    let cache_dir = get_test_dir("persistent_cache_stores_the_parsed_document");
    let configuration = AssertionConfiguration {
        validator_cache_directory: Some(cache_dir.clone()),
        reset_validator_cache: true,
    };
    let builder =
        OpenApiAssertionsBuilder::from_configuration(&configuration, &discard_logger()).unwrap();
    let (assertions, sink) = recording_assertions_from(builder);

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &get_request("/hello-world"),
        &json_response(200, &json!({"hello": "world"})),
    );

    assert_eq!(Vec::<String>::new(), sink.messages());
    let cached_files: Vec<_> = std::fs::read_dir(&cache_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(1, cached_files.len(), "unexpected cache content: {cached_files:?}");
    assert!(cached_files[0].starts_with("openapi-document-"));
}

#[test]
fn reset_registry_compiles_the_document_again() {
    let (assertions, sink) = recording_assertions();
    let request = Request::builder()
        .method("GET")
        .uri("/hello-world")
        .body(Bytes::new())
        .unwrap();

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &request,
        &json_response(200, &json!({"hello": "world"})),
    );
    assertions.registry().reset();
    assert_eq!(0, assertions.registry().compiled_schemas_count());

    assertions.assert_schema(
        &fixture("openapi.yaml"),
        &request,
        &json_response(200, &json!({"hello": "again"})),
    );
    assert_eq!(1, assertions.registry().compiled_schemas_count());
    assert_eq!(Vec::<String>::new(), sink.messages());
}

#[test]
#[should_panic(expected = "OpenAPI request error:\nOpenAPI spec contains no such operation")]
fn default_failure_sink_panics() {
    let assertions = OpenApiAssertionsBuilder::new().build();

    assertions.assert_schema(
        &fixture("openapi-status.json"),
        &get_request("/hello-world"),
        &empty_response(200),
    );
}

#[test]
fn every_discovered_document_can_be_asserted_against() {
    let schema_ids = SchemaId::discover(&fixtures_dir()).unwrap();
    assert_eq!(
        vec![fixture("openapi-status.json"), fixture("openapi.yaml")],
        schema_ids
    );

    let (assertions, _sink) = recording_assertions();
    for schema_id in &schema_ids {
        assertions.registry().get_validators(schema_id).unwrap();
    }
    assert_eq!(2, assertions.registry().compiled_schemas_count());
}

#[test]
fn nullable_property_accepts_null_values() {
    let (assertions, sink) = recording_assertions();
    let schema_id = fixture("openapi.yaml");

    assertions.assert_schema(
        &schema_id,
        &get_request("/nullable-property"),
        &json_response(200, &json!({"name": null})),
    );
    assertions.assert_schema(
        &schema_id,
        &get_request("/nullable-property"),
        &json_response(200, &json!({"name": "john"})),
    );
    assert_eq!(Vec::<String>::new(), sink.messages());

    assertions.assert_schema(
        &schema_id,
        &get_request("/nullable-property"),
        &json_response(200, &json!({"name": 12})),
    );
    let message = sink.single_message();
    assert!(
        message.starts_with("OpenAPI response error at name:\n"),
        "unexpected message: {message}"
    );
}

#[test]
fn invalid_embedded_schema_is_a_configuration_error() {
    let document = get_test_dir("invalid_embedded_schema_is_a_configuration_error")
        .join("openapi.yaml");
    std::fs::write(
        &document,
        r#"openapi: "3.0.0"
info:
  version: 1.0.0
  title: Invalid schema
paths:
  /thing:
    get:
      responses:
        200:
          description: A thing
          content:
            application/json:
              schema:
                type: 12
"#,
    )
    .unwrap();
    let schema_id = SchemaId::from(document.as_path());
    let (assertions, sink) = recording_assertions();

    let result = assertions.check_schema(
        &schema_id,
        &get_request("/thing"),
        &json_response(200, &json!({"name": "thing"})),
    );
    match result {
        Err(error @ OpenApiAssertionError::Configuration { .. }) => {
            assert!(
                error.failure_message().contains("Schema could not be compiled"),
                "unexpected message: {}",
                error.failure_message()
            );
        }
        other => panic!("expected a configuration error, got: {other:?}"),
    }

    assertions.assert_schema(
        &schema_id,
        &get_request("/thing"),
        &json_response(200, &json!({"name": "thing"})),
    );
    assert!(
        sink.single_message()
            .starts_with(&format!("OpenAPI configuration error for '{schema_id}'")),
        "unexpected message: {}",
        sink.single_message()
    );
    assert_eq!(0, assertions.registry().compiled_schemas_count());
}
