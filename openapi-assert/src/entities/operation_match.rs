use std::fmt::{Display, Formatter};

use crate::entities::CapturedRequest;

/// Operation of an OpenAPI document against which a response is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationMatch {
    /// Lower-cased http method
    pub method: String,

    /// Path template as declared in the document, ie: `/users/{id}`
    pub path_template: String,
}

impl OperationMatch {
    /// [OperationMatch] factory, the method is lower-cased.
    pub fn new<M: AsRef<str>, P: Into<String>>(method: M, path_template: P) -> Self {
        Self {
            method: method.as_ref().to_lowercase(),
            path_template: path_template.into(),
        }
    }

    /// Derive the operation directly from the observed request path and method, without
    /// resolving any path template.
    pub fn from_request(request: &CapturedRequest) -> Self {
        Self::new(&request.method, request.path.clone())
    }
}

impl Display for OperationMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path_template)
    }
}
