//! Body-conversion chain.
//!
//! When a handler returns a bare [`Value`] instead of a finished
//! [`Response`], the value is walked through an ordered list of
//! [`Interceptor`]s. Each one either produces the body itself or hands the
//! value on through [`Next`]:
//!
//! ```text
//! value ─▶ interceptor 0 ──next──▶ interceptor 1 ──next──▶ … ──▶ default body
//!               │                        │
//!               └─ body                  └─ body
//! ```
//!
//! The default body at the end of the chain is what the framework does on
//! its own: strings become `text/plain`, `null` becomes `204 No Content`,
//! anything else is rendered with its JSON text under `text/plain`.

pub mod json;

use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::error::Error;
use crate::response::{ContentType, Response};

// ── ResponseContext ───────────────────────────────────────────────────────────

/// Response state an interceptor may touch while producing a body.
///
/// Created fresh for every converted value and discarded once the
/// [`Response`] is assembled.
#[derive(Debug)]
pub struct ResponseContext {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseContext {
    pub fn new() -> Self {
        Self { status: StatusCode::OK, headers: HeaderMap::new() }
    }
}

impl Default for ResponseContext {
    fn default() -> Self { Self::new() }
}

// ── Interceptor ───────────────────────────────────────────────────────────────

/// One link in the body-conversion chain.
///
/// Return a body to finish, or call `next.run(value, res)` to defer.
pub trait Interceptor: Send + Sync + 'static {
    fn intercept(
        &self,
        value: Value,
        res: &mut ResponseContext,
        next: Next<'_>,
    ) -> Result<Bytes, Error>;
}

/// Turns a closure into an [`Interceptor`].
///
/// ```rust
/// use bytes::Bytes;
/// use tsu_json::middleware::from_fn;
///
/// let shout = from_fn(|value, res, next| {
///     if let Some(s) = value.as_str() {
///         return Ok(Bytes::from(s.to_uppercase()));
///     }
///     next.run(value, res)
/// });
/// ```
pub fn from_fn<F>(f: F) -> FnInterceptor<F>
where
    F: Fn(Value, &mut ResponseContext, Next<'_>) -> Result<Bytes, Error> + Send + Sync + 'static,
{
    FnInterceptor(f)
}

/// Interceptor backed by a closure. See [`from_fn`].
pub struct FnInterceptor<F>(F);

impl<F> Interceptor for FnInterceptor<F>
where
    F: Fn(Value, &mut ResponseContext, Next<'_>) -> Result<Bytes, Error> + Send + Sync + 'static,
{
    fn intercept(
        &self,
        value: Value,
        res: &mut ResponseContext,
        next: Next<'_>,
    ) -> Result<Bytes, Error> {
        (self.0)(value, res, next)
    }
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The remainder of the chain after the current interceptor.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Interceptor>],
}

impl Next<'_> {
    /// Hands `value` to the next interceptor, or to the default body
    /// conversion once the chain is exhausted.
    pub fn run(self, value: Value, res: &mut ResponseContext) -> Result<Bytes, Error> {
        match self.rest.split_first() {
            Some((head, rest)) => head.intercept(value, res, Next { rest }),
            None => Ok(default_body(value, res)),
        }
    }
}

fn default_body(value: Value, res: &mut ResponseContext) -> Bytes {
    let text = match value {
        Value::Null => {
            res.status = StatusCode::NO_CONTENT;
            return Bytes::new();
        }
        Value::String(s) => s,
        other => other.to_string(),
    };
    res.headers.insert(CONTENT_TYPE, ContentType::Text.header_value());
    Bytes::from(text)
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// Ordered list of interceptors, evaluated in registration order.
#[derive(Clone, Default)]
pub struct Chain {
    links: Vec<Arc<dyn Interceptor>>,
}

impl Chain {
    pub fn new(links: Vec<Arc<dyn Interceptor>>) -> Self {
        Self { links }
    }

    pub fn len(&self) -> usize { self.links.len() }
    pub fn is_empty(&self) -> bool { self.links.is_empty() }

    /// Runs `value` through every link and assembles the response.
    pub fn convert(&self, value: Value) -> Result<Response, Error> {
        let mut res = ResponseContext::new();
        let body = Next { rest: &self.links }.run(value, &mut res)?;
        Ok(Response::from_parts(res.status, res.headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tag(label: &'static str) -> Arc<dyn Interceptor> {
        Arc::new(from_fn(move |value, res, next| {
            let inner = next.run(value, res)?;
            Ok(Bytes::from(format!("{label}({})", String::from_utf8_lossy(&inner))))
        }))
    }

    #[test]
    fn empty_chain_uses_default_body() {
        let res = Chain::default().convert(json!("hello")).unwrap();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(res.body(), b"hello");
    }

    #[test]
    fn null_becomes_no_content() {
        let res = Chain::default().convert(Value::Null).unwrap();
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());
    }

    #[test]
    fn non_strings_render_as_text_by_default() {
        let res = Chain::default().convert(json!([1, 2])).unwrap();
        assert_eq!(res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(res.body(), b"[1,2]");
    }

    #[test]
    fn links_run_in_registration_order() {
        let chain = Chain::new(vec![tag("a"), tag("b")]);
        let res = chain.convert(json!("x")).unwrap();
        assert_eq!(res.body(), b"a(b(x))");
    }

    #[test]
    fn a_link_can_finish_without_calling_next() {
        let stop: Arc<dyn Interceptor> = Arc::new(from_fn(|_, res: &mut ResponseContext, _| {
            res.status = StatusCode::ACCEPTED;
            Ok(Bytes::from_static(b"stopped"))
        }));
        let chain = Chain::new(vec![stop, tag("never")]);
        let res = chain.convert(json!("x")).unwrap();
        assert_eq!(res.status_code(), StatusCode::ACCEPTED);
        assert_eq!(res.body(), b"stopped");
    }

    #[test]
    fn errors_propagate_through_earlier_links() {
        let fail: Arc<dyn Interceptor> = Arc::new(from_fn(|_, _, _| {
            Err(Error::Serialize("boom".into()))
        }));
        let chain = Chain::new(vec![tag("a"), fail]);
        assert!(matches!(chain.convert(json!(1)), Err(Error::Serialize(_))));
    }
}
