use serde_json::Value;
use slog::{Logger, debug};
use std::sync::Arc;

use crate::entities::{CapturedRequest, OperationMatch};
use crate::failure::ValidationFailure;
use crate::logging::LoggerExtensions;
use crate::validator::RequestValidator;
use crate::validator::openapi::document::OperationLookup;
use crate::validator::openapi::parameter::{ParameterKind, check_parameter};
use crate::validator::openapi::{OpenApiDocument, SchemaChecker, check_body};

/// [RequestValidator] matching requests against the operations of an [OpenApiDocument].
pub struct OpenApiRequestValidator {
    document: Arc<OpenApiDocument>,
    checker: Arc<SchemaChecker>,
    logger: Logger,
}

impl OpenApiRequestValidator {
    /// [OpenApiRequestValidator] factory
    pub fn new(document: Arc<OpenApiDocument>, checker: Arc<SchemaChecker>, logger: &Logger) -> Self {
        Self {
            document,
            checker,
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    fn validate_parameters(
        &self,
        lookup: &OperationLookup,
        request: &CapturedRequest,
        subject: &str,
    ) -> Result<(), ValidationFailure> {
        for parameter in self.document.parameters(lookup) {
            let Some(name) = parameter.get("name").and_then(Value::as_str) else {
                continue;
            };
            let location = parameter.get("in").and_then(Value::as_str).unwrap_or_default();
            let raw_values: Vec<&str> = match location {
                "path" => lookup
                    .path_parameters
                    .get(name)
                    .map(|value| vec![value.as_str()])
                    .unwrap_or_default(),
                "query" => request.query_values(name),
                "header" => request.headers.get(name).into_iter().collect(),
                _ => continue,
            };

            if raw_values.is_empty() {
                let required = location == "path"
                    || parameter
                        .get("required")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                if required {
                    return Err(ValidationFailure::new(format!(
                        "Missing required argument \"{name}\" for {subject}"
                    )));
                }
                continue;
            }

            if let Some(schema) = parameter.get("schema") {
                check_parameter(
                    &self.document,
                    &self.checker,
                    ParameterKind::Argument,
                    name,
                    schema,
                    &raw_values,
                    subject,
                )?;
            }
        }

        Ok(())
    }

    fn validate_body(
        &self,
        lookup: &OperationLookup,
        request: &CapturedRequest,
        subject: &str,
    ) -> Result<(), ValidationFailure> {
        let Some(request_body) = lookup.operation.get("requestBody") else {
            return Ok(());
        };
        let request_body = self.document.resolve(request_body);

        if request.body.is_empty() {
            let required = request_body
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if required {
                return Err(ValidationFailure::new(format!(
                    "Required body is missing for {subject}"
                )));
            }
            return Ok(());
        }

        match request_body.get("content").and_then(Value::as_object) {
            Some(content) => check_body(
                &self.document,
                &self.checker,
                content,
                request.headers.media_type(),
                &request.body,
                subject,
            ),
            None => Ok(()),
        }
    }
}

impl RequestValidator for OpenApiRequestValidator {
    fn validate(&self, request: &CapturedRequest) -> Result<OperationMatch, ValidationFailure> {
        let method = request.method.to_lowercase();
        let lookup = self
            .document
            .find_operation(&method, &request.path)
            .ok_or_else(|| {
                ValidationFailure::new(format!(
                    "OpenAPI spec contains no such operation [{},{method}]",
                    request.path
                ))
            })?;
        let operation = OperationMatch::new(&method, lookup.path_template);
        debug!(
            self.logger, "Request matched an operation";
            "path" => &request.path, "operation" => operation.to_string()
        );

        let subject = format!("Request [{operation}]");
        self.validate_parameters(&lookup, request, &subject)?;
        self.validate_body(&lookup, request, &subject)?;

        Ok(operation)
    }
}
