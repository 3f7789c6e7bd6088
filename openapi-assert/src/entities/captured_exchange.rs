use std::collections::BTreeMap;
use warp::hyper::body::Bytes;

/// Headers of a captured message, names are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderValues(BTreeMap<String, Vec<String>>);

impl HeaderValues {
    /// Append a value to the given header.
    pub fn append<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        self.0
            .entry(name.as_ref().to_lowercase())
            .or_default()
            .push(value.into());
    }

    /// First value of the given header (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(|v| v.as_str())
    }

    /// Check if the given header (case-insensitive) is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_lowercase())
    }

    /// Media type of the `content-type` header, lower-cased and without its parameters.
    pub fn media_type(&self) -> Option<String> {
        self.get("content-type")
            .and_then(|value| value.split(';').next())
            .map(|media_type| media_type.trim().to_lowercase())
            .filter(|media_type| !media_type.is_empty())
    }
}

/// Canonical form of a request captured from the application under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    /// Http method as sent, ie: `GET`
    pub method: String,

    /// Path without query string
    pub path: String,

    /// Decoded query parameters, in order of appearance
    pub query: Vec<(String, String)>,

    /// Request headers
    pub headers: HeaderValues,

    /// Raw body
    pub body: Bytes,
}

impl CapturedRequest {
    /// [CapturedRequest] factory, without query, headers nor body.
    pub fn new<M: Into<String>, P: Into<String>>(method: M, path: P) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: vec![],
            headers: HeaderValues::default(),
            body: Bytes::new(),
        }
    }

    /// Add a query parameter
    pub fn with_query<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add a header
    pub fn with_header<N: AsRef<str>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the body
    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// All values given for a query parameter
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Canonical form of a response captured from the application under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    /// Http status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderValues,

    /// Raw body
    pub body: Bytes,
}

impl CapturedResponse {
    /// [CapturedResponse] factory, without headers nor body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderValues::default(),
            body: Bytes::new(),
        }
    }

    /// Add a header
    pub fn with_header<N: AsRef<str>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the body
    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Shortcut for a response with an `application/json` body
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }
}
