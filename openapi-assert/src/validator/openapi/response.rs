use serde_json::Value;
use slog::{Logger, debug};
use std::sync::Arc;

use crate::entities::{CapturedResponse, OperationMatch};
use crate::failure::ValidationFailure;
use crate::logging::LoggerExtensions;
use crate::validator::ResponseValidator;
use crate::validator::openapi::parameter::{ParameterKind, check_parameter};
use crate::validator::openapi::{OpenApiDocument, SchemaChecker, check_body};

/// [ResponseValidator] checking responses against the declared responses of an
/// [OpenApiDocument] operation.
pub struct OpenApiResponseValidator {
    document: Arc<OpenApiDocument>,
    checker: Arc<SchemaChecker>,
    logger: Logger,
}

impl OpenApiResponseValidator {
    /// [OpenApiResponseValidator] factory
    pub fn new(document: Arc<OpenApiDocument>, checker: Arc<SchemaChecker>, logger: &Logger) -> Self {
        Self {
            document,
            checker,
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    /// Find the response declared for a status: exact code first, then its range (ie: `2XX`),
    /// then `default`.
    fn find_response<'a>(&'a self, operation: &'a Value, status: u16) -> Option<&'a Value> {
        let responses = operation.get("responses")?.as_object()?;
        let range = format!("{}XX", status / 100);

        responses
            .get(&status.to_string())
            .or_else(|| responses.get(&range))
            .or_else(|| responses.get(&range.to_lowercase()))
            .or_else(|| responses.get("default"))
            .map(|response| self.document.resolve(response))
    }

    fn validate_headers(
        &self,
        response_spec: &Value,
        response: &CapturedResponse,
        subject: &str,
    ) -> Result<(), ValidationFailure> {
        let Some(headers) = response_spec.get("headers").and_then(Value::as_object) else {
            return Ok(());
        };

        for (name, header) in headers {
            if name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            let header = self.document.resolve(header);

            match response.headers.get(name) {
                None if header.get("required").and_then(Value::as_bool).unwrap_or(false) => {
                    return Err(ValidationFailure::new(format!(
                        "Missing required header \"{name}\" for {subject}"
                    )));
                }
                None => {}
                Some(value) => {
                    if let Some(schema) = header.get("schema") {
                        check_parameter(
                            &self.document,
                            &self.checker,
                            ParameterKind::Header,
                            name,
                            schema,
                            &[value],
                            subject,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_body(
        &self,
        response_spec: &Value,
        response: &CapturedResponse,
        subject: &str,
    ) -> Result<(), ValidationFailure> {
        let content = response_spec
            .get("content")
            .and_then(Value::as_object)
            .filter(|content| !content.is_empty());

        match (content, response.body.is_empty()) {
            (None, true) => Ok(()),
            (None, false) => Err(ValidationFailure::new(format!(
                "Expected empty body for {subject}"
            ))),
            (Some(_), true) => Err(ValidationFailure::new(format!(
                "Non empty body expected for {subject}"
            ))),
            (Some(content), false) => check_body(
                &self.document,
                &self.checker,
                content,
                response.headers.media_type(),
                &response.body,
                subject,
            ),
        }
    }
}

impl ResponseValidator for OpenApiResponseValidator {
    fn validate(
        &self,
        operation: &OperationMatch,
        response: &CapturedResponse,
    ) -> Result<(), ValidationFailure> {
        let lookup = self
            .document
            .operation(&operation.method, &operation.path_template)
            .ok_or_else(|| {
                ValidationFailure::new(format!(
                    "OpenAPI spec contains no such operation [{},{}]",
                    operation.path_template, operation.method
                ))
            })?;
        let resolved = OperationMatch::new(&operation.method, lookup.path_template);
        let response_spec = self.find_response(lookup.operation, response.status).ok_or_else(|| {
            ValidationFailure::new(format!(
                "OpenAPI spec contains no such response [{}] for Response [{resolved}]",
                response.status
            ))
        })?;
        debug!(
            self.logger, "Validating response";
            "operation" => resolved.to_string(), "status" => response.status
        );

        let subject = format!("Response [{resolved} {}]", response.status);
        self.validate_headers(response_spec, response, &subject)?;
        self.validate_body(response_spec, response, &subject)
    }
}
