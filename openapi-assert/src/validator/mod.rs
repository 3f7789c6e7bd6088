//! Compiled validators of an OpenAPI document and the compiler producing them.

pub mod openapi;

use std::sync::Arc;

use crate::StdResult;
use crate::cache::ValidatorCache;
use crate::entities::{CapturedRequest, CapturedResponse, OperationMatch, SchemaId};
use crate::failure::ValidationFailure;

/// Validate captured requests against the operations of a document.
#[cfg_attr(test, mockall::automock)]
pub trait RequestValidator: Send + Sync {
    /// Validate the request and return the operation it matched.
    fn validate(&self, request: &CapturedRequest) -> Result<OperationMatch, ValidationFailure>;
}

/// Validate captured responses against an operation of a document.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseValidator: Send + Sync {
    /// Validate the response as a response of the given operation.
    fn validate(
        &self,
        operation: &OperationMatch,
        response: &CapturedResponse,
    ) -> Result<(), ValidationFailure>;
}

/// Build the validators of the document identified by a [SchemaId].
#[cfg_attr(test, mockall::automock)]
pub trait SpecificationCompiler: Send + Sync {
    /// Compile the document.
    ///
    /// The given cache, if any, can be used to reuse costly artifacts between runs.
    fn compile(
        &self,
        schema_id: &SchemaId,
        cache: Option<Arc<dyn ValidatorCache>>,
    ) -> StdResult<CompiledValidatorSet>;
}

/// Request and response validators of a single document.
#[derive(Clone)]
pub struct CompiledValidatorSet {
    request_validator: Arc<dyn RequestValidator>,
    response_validator: Arc<dyn ResponseValidator>,
}

impl CompiledValidatorSet {
    /// [CompiledValidatorSet] factory
    pub fn new(
        request_validator: Arc<dyn RequestValidator>,
        response_validator: Arc<dyn ResponseValidator>,
    ) -> Self {
        Self {
            request_validator,
            response_validator,
        }
    }

    /// Validate a request, returning the operation it matched
    pub fn validate_request(
        &self,
        request: &CapturedRequest,
    ) -> Result<OperationMatch, ValidationFailure> {
        self.request_validator.validate(request)
    }

    /// Validate a response against an operation
    pub fn validate_response(
        &self,
        operation: &OperationMatch,
        response: &CapturedResponse,
    ) -> Result<(), ValidationFailure> {
        self.response_validator.validate(operation, response)
    }
}
