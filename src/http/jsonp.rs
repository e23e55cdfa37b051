//! JSON responses with optional JSONP wrapping.
//!
//! When the request carries `?callback=name` the JSON body is wrapped
//! in a guarded call to `name` and served as JavaScript. Characters
//! outside `[A-Za-z0-9_$.\[\]]` are stripped from the callback name;
//! if nothing is left the plain JSON body is returned.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Query parameters understood by JSONP-capable endpoints
///
/// Extraction never rejects: a repeated `callback` uses the first
/// value and an unparsable query string means no callback.
#[derive(Debug, Clone, Default)]
pub struct JsonpParams {
    pub callback: Option<String>,
}

impl JsonpParams {
    /// Read the first `callback` pair from a raw query
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let callback = pairs
            .into_iter()
            .find(|(key, _)| key == "callback")
            .map(|(_, value)| value);

        Self { callback }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for JsonpParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => Ok(Self::from_pairs(pairs)),
            Err(e) => {
                tracing::debug!("ignoring malformed query string: {}", e);
                Ok(Self::default())
            }
        }
    }
}

/// A serializable value answered as JSON or JSONP
#[derive(Debug, Clone)]
pub struct Jsonp<T> {
    callback: Option<String>,
    value: T,
}

impl<T> Jsonp<T> {
    pub fn new(params: &JsonpParams, value: T) -> Self {
        Self {
            callback: params.callback.as_deref().and_then(sanitize_callback),
            value,
        }
    }

    /// Plain JSON, never wrapped
    pub fn plain(value: T) -> Self {
        Self {
            callback: None,
            value,
        }
    }
}

/// Strip characters that cannot appear in a callback path
pub fn sanitize_callback(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']'))
        .collect();

    (!cleaned.is_empty()).then_some(cleaned)
}

impl<T: Serialize> IntoResponse for Jsonp<T> {
    fn into_response(self) -> Response {
        let Some(callback) = self.callback else {
            return Json(self.value).into_response();
        };

        let body = match serde_json::to_string(&self.value) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("marshalling error: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        // U+2028/U+2029 are valid in JSON strings but end lines in JavaScript
        let body = body.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029");
        let script = format!("/**/ typeof {callback} === 'function' && {callback}({body});");

        (
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/javascript; charset=utf-8"),
                ),
                (
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ),
            ],
            script,
        )
            .into_response()
    }
}
