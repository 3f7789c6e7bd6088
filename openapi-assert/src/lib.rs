#![warn(missing_docs)]

//! Test-time assertions checking that http exchanges conform to an OpenAPI document.
//!
//! Provide:
//! - A [registry][ValidatorRegistry] compiling the validators of each document once and
//!   sharing them for the lifetime of the test process.
//! - The [assertions][OpenApiAssertions] validating a request, then its response against the
//!   operation the request matched, and reporting the first failure to a [FailureSink].
//! - A [diagnostic][Diagnostic] turning a chain of nested [validation failures][ValidationFailure]
//!   into a single message, locating the failure in the validated document.
//! - Default validators for OpenAPI 3.x documents in [validator::openapi], with an optional
//!   persistent [cache] of their parsed documents.
//!
//! ```no_run
//! use openapi_assert::{OpenApiAssertionsBuilder, SchemaId};
//! use warp::http::{Request, Response};
//! use warp::hyper::body::Bytes;
//!
//! let assertions = OpenApiAssertionsBuilder::new().build();
//! let request = Request::get("/hello-world").body(Bytes::new()).unwrap();
//! let response = Response::builder()
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(br#"{"hello":"world"}"#))
//!     .unwrap();
//!
//! assertions.assert_schema(&SchemaId::new("openapi.yaml"), &request, &response);
//! ```

mod assertions;
mod builder;
pub mod cache;
mod configuration;
mod diagnostic;
pub mod entities;
mod failure;
mod failure_sink;
mod http_adapter;
pub mod logging;
mod registry;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_utils;

pub use assertions::{OpenApiAssertionError, OpenApiAssertions};
pub use builder::OpenApiAssertionsBuilder;
pub use configuration::AssertionConfiguration;
pub use diagnostic::{Diagnostic, Scope};
pub use entities::{CapturedRequest, CapturedResponse, HeaderValues, OperationMatch, SchemaId};
pub use failure::{Breadcrumb, Causes, PathSegment, ValidationFailure};
pub use failure_sink::{FailureSink, PanicFailureSink};
pub use http_adapter::HttpMessageAdapter;
pub use registry::ValidatorRegistry;

/// Generic error type
pub type StdError = anyhow::Error;

/// Generic result type
pub type StdResult<T> = anyhow::Result<T, StdError>;
