//! Default validators, built from OpenAPI 3.x documents.
//!
//! JSON-Schema semantics are delegated to the [jsonschema] crate, this module only locates the
//! schemas to apply and translates the reported errors into [ValidationFailure][crate::failure::ValidationFailure].

mod body;
mod compiler;
mod document;
mod parameter;
mod request;
mod response;
mod schema_checker;

use body::check_body;
pub use compiler::OpenApiSpecificationCompiler;
pub use document::{OpenApiDocument, OperationLookup};
pub use request::OpenApiRequestValidator;
pub use response::OpenApiResponseValidator;
pub use schema_checker::SchemaChecker;
