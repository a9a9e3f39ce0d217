//! Radix-tree request router and the frozen [`App`] it turns into.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is also where
//! body-conversion interceptors are registered, in order, at setup time:
//!
//! ```rust,no_run
//! use http::Method;
//! use serde_json::{Value, json};
//! use tsu_json::{JsonOptions, Request, Router, Server};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let app = Router::new()
//!     .json(JsonOptions::new())
//!     .on(Method::GET, "/users", list_users);
//!
//! Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! # }
//!
//! async fn list_users(_req: Request) -> Value {
//!     json!([{ "id": 1, "name": "alice" }])
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;
use matchit::Router as MatchitRouter;
use tracing::{debug, error};

use crate::config::{JsonOptions, JsonSettings};
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::json::JsonInterceptor;
use crate::middleware::{Chain, Interceptor};
use crate::request::Request;
use crate::response::{Reply, Response};

/// Position of an interceptor in the chain, resolved when the router freezes.
enum Link {
    Json,
    Custom(Arc<dyn Interceptor>),
}

/// The application router.
///
/// Build it once at startup and pass it to
/// [`Server::serve`](crate::Server::serve). Every method returns `self` so
/// registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    links: Vec<Link>,
    json: Option<JsonSettings>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), links: Vec::new(), json: None }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append an interceptor to the body-conversion chain.
    pub fn intercept(mut self, interceptor: impl Interceptor) -> Self {
        self.links.push(Link::Custom(Arc::new(interceptor)));
        self
    }

    /// Enable automatic JSON bodies, or extend the existing configuration.
    ///
    /// The first call places the JSON interceptor at the current end of the
    /// chain. Later calls merge their shapes into the allow-list and replace
    /// the serializer; they do not add a second link.
    pub fn json(mut self, options: JsonOptions) -> Self {
        if self.json.is_none() {
            self.links.push(Link::Json);
        }
        self.json.get_or_insert_with(JsonSettings::new).configure(options);
        self
    }

    /// Freezes the router: JSON settings become read-only and the chain is
    /// fixed. Called by [`Server::serve`](crate::Server::serve).
    pub fn into_app(self) -> App {
        let json = self.json.map(|settings| {
            Arc::new(JsonInterceptor::new(Arc::new(settings.freeze()))) as Arc<dyn Interceptor>
        });
        let links = self.links
            .into_iter()
            .filter_map(|link| match link {
                Link::Custom(i) => Some(i),
                Link::Json => json.clone(),
            })
            .collect::<Vec<_>>();
        debug!(links = links.len(), "body-conversion chain built");
        App { routes: self.routes, chain: Chain::new(links) }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// A frozen router, shared read-only across all connections.
pub struct App {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    chain: Chain,
}

impl App {
    /// Routes one request and produces one response.
    ///
    /// Unknown routes answer `404`. A body-conversion failure answers `500`
    /// and is logged; nothing else can fail here.
    pub async fn call(&self, req: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();

        let Some((handler, params)) = self.lookup(&parts.method, parts.uri.path()) else {
            return Response::status(StatusCode::NOT_FOUND).into_inner();
        };

        let reply = handler.call(Request::new(parts, body, params)).await;
        self.render(reply).into_inner()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    fn render(&self, reply: Reply) -> Response {
        match reply {
            Reply::Response(res) => res,
            Reply::Value(value) => self.chain.convert(value).unwrap_or_else(|e| {
                error!(error = %e, "body conversion failed");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }),
        }
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}
