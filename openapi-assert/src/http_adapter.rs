//! Translation of the http messages of the application under test into captured exchanges.

use anyhow::Context;
use reqwest::Url;
use slog::{Logger, trace};
use warp::http::{HeaderMap, Request, Response};
use warp::hyper::body::Bytes;

use crate::StdResult;
use crate::entities::{CapturedRequest, CapturedResponse, HeaderValues};
use crate::logging::LoggerExtensions;

/// Base used to parse a lone query string.
const QUERY_PARSING_BASE: &str = "http://localhost/";

/// Convert `http` messages into [CapturedRequest] and [CapturedResponse].
///
/// The given messages are only read, never consumed nor modified.
pub struct HttpMessageAdapter {
    logger: Logger,
}

impl HttpMessageAdapter {
    /// [HttpMessageAdapter] factory
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    /// Capture a request, decoding its query string.
    pub fn adapt_request(&self, request: &Request<Bytes>) -> StdResult<CapturedRequest> {
        let uri = request.uri();
        let query = match uri.query() {
            Some(query) if !query.is_empty() => {
                let url = Url::parse(&format!("{QUERY_PARSING_BASE}?{query}"))
                    .with_context(|| format!("Could not parse query string of request '{uri}'"))?;
                url.query_pairs()
                    .map(|(name, value)| (name.into_owned(), value.into_owned()))
                    .collect()
            }
            _ => vec![],
        };
        trace!(self.logger, "Captured request"; "method" => %request.method(), "uri" => %uri);

        Ok(CapturedRequest {
            method: request.method().as_str().to_string(),
            path: uri.path().to_string(),
            query,
            headers: capture_headers(request.headers()),
            body: request.body().clone(),
        })
    }

    /// Capture a response.
    pub fn adapt_response(&self, response: &Response<Bytes>) -> CapturedResponse {
        trace!(self.logger, "Captured response"; "status" => response.status().as_u16());

        CapturedResponse {
            status: response.status().as_u16(),
            headers: capture_headers(response.headers()),
            body: response.body().clone(),
        }
    }
}

fn capture_headers(headers: &HeaderMap) -> HeaderValues {
    let mut captured = HeaderValues::default();
    for (name, value) in headers {
        captured.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
    }

    captured
}
