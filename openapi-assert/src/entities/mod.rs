//! Plain data exchanged between the registry, the validators and the assertions.

mod captured_exchange;
mod operation_match;
mod schema_id;

pub use captured_exchange::{CapturedRequest, CapturedResponse, HeaderValues};
pub use operation_match::OperationMatch;
pub use schema_id::SchemaId;
