//! Minimal tsu-json example: JSON endpoints next to plain-text ones.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/users          # array  → application/json
//!   curl -i http://localhost:3000/users/42       # object → application/json
//!   curl -i http://localhost:3000/users/42/name  # string → text/plain
//!   curl -i -X DELETE http://localhost:3000/users/42

use http::{Method, StatusCode};
use serde_json::{Value, json};
use tsu_json::{JsonOptions, Request, Response, Router, Server, Shape};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .json(JsonOptions::new())
        // Array and Object are already present; only "count" is added.
        .json(JsonOptions::new().classes([
            Shape::Array,
            Shape::Object,
            Shape::custom("count", |v| v.is_u64()),
        ]))
        .on(Method::GET,    "/users",           list_users)
        .on(Method::GET,    "/users/count",     count_users)
        .on(Method::GET,    "/users/{id}",      get_user)
        .on(Method::GET,    "/users/{id}/name", get_user_name)
        .on(Method::DELETE, "/users/{id}",      delete_user);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /users → [{"id":1,…},…]
async fn list_users(_req: Request) -> Value {
    json!([
        { "id": 1, "name": "alice" },
        { "id": 2, "name": "bob" },
    ])
}

// GET /users/count → 2, serialized through the custom "count" shape
async fn count_users(_req: Request) -> Value {
    json!(2)
}

// GET /users/{id}
async fn get_user(req: Request) -> Value {
    json!({ "id": req.param("id"), "name": "alice" })
}

// GET /users/{id}/name → plain text, the JSON layer steps aside
async fn get_user_name(_req: Request) -> String {
    "alice".to_owned()
}

// DELETE /users/{id} → 204, built by hand, never reaches the chain
async fn delete_user(_req: Request) -> Response {
    Response::status(StatusCode::NO_CONTENT)
}
