//! Outgoing HTTP response type and the [`IntoReply`] conversion trait.
//!
//! A handler either builds a [`Response`] itself, which is sent as-is, or it
//! returns a plain [`Value`] and lets the body-conversion chain decide what
//! the bytes and headers look like.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde_json::{Map, Value};

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values the framework writes itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    Html,  // text/html; charset=utf-8
    Json,  // application/json
    Text,  // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use http::StatusCode;
/// use tsu_json::Response;
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use http::{StatusCode, header::{HeaderValue, LOCATION}};
/// use tsu_json::{ContentType, Response};
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header(LOCATION, HeaderValue::from_static("/users/42"))
///     .json(br#"{"id":42}"#.to_vec());
///
/// Response::builder().bytes(ContentType::Html, b"<p>ok</p>".to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Bytes,
    pub(crate) headers: HeaderMap,
    pub(crate) status: StatusCode,
}

impl Response {
    /// `200 OK`, `application/json`. The bytes are sent untouched.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { body: Bytes::new(), headers: HeaderMap::new(), status: code }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    pub(crate) fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self { body, headers, status }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Converts into the `http` type hyper writes to the wire.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.finish(ContentType::Json, body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text, Bytes::from(body.into()))
    }

    /// Terminate with a typed body.
    pub fn bytes(self, content_type: ContentType, body: impl Into<Bytes>) -> Response {
        self.finish(content_type, body.into())
    }

    fn finish(mut self, content_type: ContentType, body: Bytes) -> Response {
        self.headers.insert(CONTENT_TYPE, content_type.header_value());
        Response { body, headers: self.headers, status: self.status }
    }
}

// ── Reply / IntoReply ─────────────────────────────────────────────────────────

/// What a handler hands back to the framework.
#[derive(Debug)]
pub enum Reply {
    /// A finished response. Skips body conversion entirely.
    Response(Response),
    /// A bare value. Runs through the body-conversion chain, where the JSON
    /// interceptor (if installed) gets first look at it.
    Value(Value),
}

/// Conversion into a handler [`Reply`].
///
/// Implement on your own types to return them directly from handlers:
///
/// ```rust
/// use serde_json::json;
/// use tsu_json::{IntoReply, Reply};
///
/// struct User { id: u64, name: String }
///
/// impl IntoReply for User {
///     fn into_reply(self) -> Reply {
///         Reply::Value(json!({ "id": self.id, "name": self.name }))
///     }
/// }
/// ```
pub trait IntoReply {
    fn into_reply(self) -> Reply;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Reply { self }
}

impl IntoReply for Response {
    fn into_reply(self) -> Reply { Reply::Response(self) }
}

/// Return a status directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoReply for StatusCode {
    fn into_reply(self) -> Reply { Reply::Response(Response::status(self)) }
}

impl IntoReply for Value {
    fn into_reply(self) -> Reply { Reply::Value(self) }
}

impl IntoReply for String {
    fn into_reply(self) -> Reply { Reply::Value(Value::String(self)) }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Reply { Reply::Value(Value::from(self)) }
}

impl IntoReply for Map<String, Value> {
    fn into_reply(self) -> Reply { Reply::Value(Value::Object(self)) }
}

impl<T: Into<Value>> IntoReply for Vec<T> {
    fn into_reply(self) -> Reply { Reply::Value(Value::from(self)) }
}
