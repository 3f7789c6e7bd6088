//! Nested validation failures as reported by the validators.
//!
//! A [ValidationFailure] owns its cause, forming an acyclic singly linked chain from the most
//! general reason (ie: "the body does not match") to the most specific one (ie: "this property is
//! required").

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A segment of the location of a failure in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Key of an object
    Key(String),

    /// Index in an array
    Index(usize),
}

impl PathSegment {
    /// Parse a segment of a JSON pointer, numeric segments are array indexes.
    pub fn from_pointer_segment(segment: &str) -> Self {
        let unescaped = segment.replace("~1", "/").replace("~0", "~");
        match unescaped.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Key(unescaped),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Key(key) if key.is_empty())
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a failure from the root of the validated document.
///
/// A `None` segment is a placeholder for a location without field context (ie: a mismatch at
/// the root of a document).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb(Vec<Option<PathSegment>>);

impl Breadcrumb {
    /// [Breadcrumb] factory
    pub fn new(segments: Vec<Option<PathSegment>>) -> Self {
        Self(segments)
    }

    /// Breadcrumb of the root of a document: a single placeholder segment.
    pub fn root() -> Self {
        Self(vec![None])
    }

    /// Build a breadcrumb from base segments followed by the segments of a JSON pointer.
    ///
    /// Yields [Breadcrumb::root] when there's no segment at all.
    pub fn from_pointer(base: &[PathSegment], pointer: &str) -> Self {
        let mut segments: Vec<Option<PathSegment>> = base.iter().cloned().map(Some).collect();
        segments.extend(
            pointer
                .split('/')
                .skip(1)
                .map(|segment| Some(PathSegment::from_pointer_segment(segment))),
        );

        if segments.is_empty() {
            Self::root()
        } else {
            Self(segments)
        }
    }

    /// Copy of this breadcrumb with an additional segment at its end.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments: Vec<_> = self.0.iter().flatten().cloned().map(Some).collect();
        segments.push(Some(segment));
        Self(segments)
    }

    /// Segments of the breadcrumb without the placeholder and empty ones.
    pub fn segments(&self) -> Vec<&PathSegment> {
        self.0
            .iter()
            .flatten()
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Dot joined path of the breadcrumb, `None` if it contains only placeholders.
    pub fn to_path(&self) -> Option<String> {
        let segments = self.segments();
        if segments.is_empty() {
            return None;
        }

        Some(
            segments
                .iter()
                .map(|segment| segment.to_string())
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}

/// A validation failure and its chain of causes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    message: String,
    cause: Option<Box<ValidationFailure>>,
    breadcrumb: Option<Breadcrumb>,
    inner_failures: BTreeMap<usize, ValidationFailure>,
}

impl ValidationFailure {
    /// [ValidationFailure] factory, without cause nor location.
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            cause: None,
            breadcrumb: None,
            inner_failures: BTreeMap::new(),
        }
    }

    /// Set the cause of this failure
    pub fn with_cause(mut self, cause: ValidationFailure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Set the location of this failure
    pub fn with_breadcrumb(mut self, breadcrumb: Breadcrumb) -> Self {
        self.breadcrumb = Some(breadcrumb);
        self
    }

    /// Set the reasons why each alternative schema was rejected, indexed by the 0-based position
    /// of the alternative.
    pub fn with_inner_failures(mut self, inner_failures: BTreeMap<usize, ValidationFailure>) -> Self {
        self.inner_failures = inner_failures;
        self
    }

    /// Message of this failure only
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Direct cause of this failure
    pub fn cause(&self) -> Option<&ValidationFailure> {
        self.cause.as_deref()
    }

    /// Location of this failure
    pub fn breadcrumb(&self) -> Option<&Breadcrumb> {
        self.breadcrumb.as_ref()
    }

    /// Dot joined location of this failure if it has a meaningful one.
    pub fn path(&self) -> Option<String> {
        self.breadcrumb.as_ref().and_then(Breadcrumb::to_path)
    }

    /// Rejection reasons of the alternative schemas, in ascending order of alternative.
    pub fn inner_failures(&self) -> &BTreeMap<usize, ValidationFailure> {
        &self.inner_failures
    }

    /// Iterate over the causes of this failure, from the outermost to the innermost, excluding
    /// this failure.
    pub fn causes(&self) -> Causes<'_> {
        Causes {
            next: self.cause(),
        }
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ValidationFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Iterator over the causes of a [ValidationFailure].
pub struct Causes<'a> {
    next: Option<&'a ValidationFailure>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a ValidationFailure;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}
