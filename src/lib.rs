//! # tsu-json
//!
//! Automatic JSON response bodies for a minimal hyper framework.
//!
//! Handlers return a plain [`serde_json::Value`]. If the value's shape is on
//! the application's allow-list (arrays and objects unless configured
//! otherwise) it goes out as `application/json`. Anything else falls through
//! to the next body-conversion step, exactly as if JSON support were off.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::Method;
//! use serde_json::{Value, json};
//! use tsu_json::{JsonOptions, Request, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .json(JsonOptions::new())
//!         .on(Method::GET, "/users/{id}", get_user)
//!         .on(Method::GET, "/ping",       ping);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! // object → application/json
//! async fn get_user(req: Request) -> Value {
//!     json!({ "id": req.param("id"), "name": "alice" })
//! }
//!
//! // string → not eligible, rendered as text/plain
//! async fn ping(_req: Request) -> &'static str {
//!     "pong"
//! }
//! ```
//!
//! ## Configuration
//!
//! [`Router::json`] may be called several times during setup. Shapes are
//! merged (set union, first-seen order). The serializer is replaced:
//!
//! ```rust
//! use tsu_json::{JsonOptions, Router, Shape, config::default_json};
//!
//! let router = Router::new()
//!     .json(JsonOptions::new().classes([Shape::Array]))
//!     .json(JsonOptions::new()
//!         .classes([Shape::custom("number", |v| v.is_number())])
//!         .serializer(|v| Ok(format!("{}\n", default_json(v)?))));
//! ```
//!
//! Once the router is handed to [`Server::serve`] (or [`Router::into_app`])
//! the settings are frozen: the router is consumed, so there is nothing left
//! to configure.

pub mod config;
pub mod middleware;

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub use config::{ConfigStore, EligibleTypes, JsonOptions, JsonSettings, Serializer, Shape};
pub use error::{BoxError, Error};
pub use handler::Handler;
pub use middleware::json::JsonInterceptor;
pub use middleware::{Chain, Interceptor, Next, ResponseContext};
pub use request::Request;
pub use response::{ContentType, IntoReply, Reply, Response, ResponseBuilder};
pub use router::{App, Router};
pub use server::Server;
