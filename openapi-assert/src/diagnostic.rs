//! Conversion of a chain of [ValidationFailure] into a single human readable message.

use std::fmt::{Display, Formatter};

use crate::failure::ValidationFailure;

/// Part of the http exchange that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The captured request
    Request,

    /// The captured response
    Response,
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Response => write!(f, "response"),
        }
    }
}

/// Flattened view of a validation failure.
///
/// Rendered as:
/// ```text
/// OpenAPI <scope> error[ at <path>]:
/// <outermost message>
/// ...
/// <innermost message>
/// ```
/// with an additional `==> Schema <n>: <message>[ (at <path>)]` line per rejected alternative
/// right after the message of the failure that rejected them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    scope: Scope,
    path: Option<String>,
    lines: Vec<String>,
}

impl Diagnostic {
    /// Walk the causes of the given failure to build its diagnostic.
    ///
    /// The reported path is the first meaningful one found while walking the causes from the
    /// outermost to the innermost, the top level failure itself is not a candidate.
    pub fn from_failure(scope: Scope, failure: &ValidationFailure) -> Self {
        let mut lines = vec![failure.message().to_string()];
        let mut path = None;

        for cause in failure.causes() {
            lines.push(cause.message().to_string());

            if path.is_none() {
                path = cause.path();
            }

            for (alternative, inner_failure) in cause.inner_failures() {
                lines.push(format!(
                    "==> Schema {}: {}{}",
                    alternative + 1,
                    inner_failure.message(),
                    inner_failure
                        .path()
                        .map(|inner_path| format!(" (at {inner_path})"))
                        .unwrap_or_default()
                ));
            }
        }

        Self { scope, path, lines }
    }

    /// Scope of the failure
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Location of the failure in the validated document, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Message lines, without the header
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpenAPI {} error", self.scope)?;
        if let Some(path) = &self.path {
            write!(f, " at {path}")?;
        }
        write!(f, ":\n{}", self.lines.join("\n"))
    }
}
