//! Assertion entry points: validate a captured exchange and report its first failure.

use slog::{Logger, debug};
use std::sync::Arc;
use thiserror::Error;
use warp::http::{Request, Response};
use warp::hyper::body::Bytes;

use crate::StdError;
use crate::diagnostic::{Diagnostic, Scope};
use crate::entities::{CapturedRequest, CapturedResponse, OperationMatch, SchemaId};
use crate::failure_sink::FailureSink;
use crate::logging::LoggerExtensions;
use crate::registry::ValidatorRegistry;

/// Error returned by the non raising assertions.
#[derive(Error, Debug)]
pub enum OpenApiAssertionError {
    /// The document could not be turned into validators, or the exchange could not be captured.
    #[error("OpenAPI configuration error for '{schema_id}'")]
    Configuration {
        /// Document being asserted against
        schema_id: SchemaId,

        /// Underlying error
        #[source]
        source: StdError,
    },

    /// The exchange does not conform to the document.
    #[error("{0}")]
    Validation(Diagnostic),
}

impl OpenApiAssertionError {
    /// Message given to the [FailureSink], including the error causes for configuration errors.
    pub fn failure_message(&self) -> String {
        match self {
            Self::Configuration { source, .. } => format!("{self}: {source:#}"),
            Self::Validation(diagnostic) => diagnostic.to_string(),
        }
    }
}

/// Validate http exchanges against OpenAPI documents.
pub struct OpenApiAssertions {
    registry: Arc<ValidatorRegistry>,
    failure_sink: Arc<dyn FailureSink>,
    logger: Logger,
}

impl OpenApiAssertions {
    /// [OpenApiAssertions] factory
    pub fn new(
        registry: Arc<ValidatorRegistry>,
        failure_sink: Arc<dyn FailureSink>,
        logger: &Logger,
    ) -> Self {
        Self {
            registry,
            failure_sink,
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    /// Registry holding the compiled validators
    pub fn registry(&self) -> &Arc<ValidatorRegistry> {
        &self.registry
    }

    /// Assert that both the request and the response conform to the document.
    ///
    /// The first failure is given to the failure sink: a non conforming request is reported
    /// without validating the response.
    pub fn assert_schema(
        &self,
        schema_id: &SchemaId,
        request: &Request<Bytes>,
        response: &Response<Bytes>,
    ) {
        if let Err(error) = self.check_schema(schema_id, request, response) {
            self.raise(&error);
        }
    }

    /// Assert that the response conforms to the document, without validating the request.
    ///
    /// When `operation` is not given, the operation is derived from the request method and
    /// path.
    pub fn assert_response_only(
        &self,
        schema_id: &SchemaId,
        request: &Request<Bytes>,
        response: &Response<Bytes>,
        operation: Option<OperationMatch>,
    ) {
        if let Err(error) = self.check_response_only(schema_id, request, response, operation) {
            self.raise(&error);
        }
    }

    /// Non raising version of [Self::assert_schema].
    pub fn check_schema(
        &self,
        schema_id: &SchemaId,
        request: &Request<Bytes>,
        response: &Response<Bytes>,
    ) -> Result<(), OpenApiAssertionError> {
        let adapter = self.registry.http_adapter();
        let request = adapter
            .adapt_request(request)
            .map_err(|source| configuration_error(schema_id, source))?;
        let response = adapter.adapt_response(response);

        self.check_captured_schema(schema_id, &request, &response)
    }

    /// Non raising version of [Self::assert_response_only].
    pub fn check_response_only(
        &self,
        schema_id: &SchemaId,
        request: &Request<Bytes>,
        response: &Response<Bytes>,
        operation: Option<OperationMatch>,
    ) -> Result<(), OpenApiAssertionError> {
        let adapter = self.registry.http_adapter();
        let request = adapter
            .adapt_request(request)
            .map_err(|source| configuration_error(schema_id, source))?;
        let response = adapter.adapt_response(response);

        self.check_captured_response_only(schema_id, &request, &response, operation)
    }

    /// Validate an already captured exchange, request first.
    pub fn check_captured_schema(
        &self,
        schema_id: &SchemaId,
        request: &CapturedRequest,
        response: &CapturedResponse,
    ) -> Result<(), OpenApiAssertionError> {
        let validators = self
            .registry
            .get_validators(schema_id)
            .map_err(|source| configuration_error(schema_id, source))?;

        let operation = validators.validate_request(request).map_err(|failure| {
            OpenApiAssertionError::Validation(Diagnostic::from_failure(Scope::Request, &failure))
        })?;
        debug!(self.logger, "Request conforms to the document"; "schema_id" => schema_id.as_str(), "operation" => %operation);

        validators
            .validate_response(&operation, response)
            .map_err(|failure| {
                OpenApiAssertionError::Validation(Diagnostic::from_failure(Scope::Response, &failure))
            })
    }

    /// Validate the response of an already captured exchange.
    pub fn check_captured_response_only(
        &self,
        schema_id: &SchemaId,
        request: &CapturedRequest,
        response: &CapturedResponse,
        operation: Option<OperationMatch>,
    ) -> Result<(), OpenApiAssertionError> {
        let validators = self
            .registry
            .get_validators(schema_id)
            .map_err(|source| configuration_error(schema_id, source))?;
        let operation = operation.unwrap_or_else(|| OperationMatch::from_request(request));
        debug!(self.logger, "Validating response only"; "schema_id" => schema_id.as_str(), "operation" => %operation);

        validators
            .validate_response(&operation, response)
            .map_err(|failure| {
                OpenApiAssertionError::Validation(Diagnostic::from_failure(Scope::Response, &failure))
            })
    }

    fn raise(&self, error: &OpenApiAssertionError) {
        let message = error.failure_message();
        debug!(self.logger, "Assertion failed"; "message" => &message);
        self.failure_sink.raise(&message);
    }
}

fn configuration_error(schema_id: &SchemaId, source: StdError) -> OpenApiAssertionError {
    OpenApiAssertionError::Configuration {
        schema_id: schema_id.clone(),
        source,
    }
}
