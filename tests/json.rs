use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::{Value, json};
use tsu_json::config::default_json;
use tsu_json::middleware::from_fn;
use tsu_json::{App, JsonOptions, Request, Response, Router, Shape};

async fn get(app: &App, path: &str) -> (StatusCode, Option<String>, String) {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Bytes::new())
        .unwrap();
    read(app.call(req).await).await
}

async fn read(res: http::Response<Full<Bytes>>) -> (StatusCode, Option<String>, String) {
    let status = res.status();
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let body = res.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn numbers(_req: Request) -> Value {
    json!([1, 2, 3])
}

async fn object(_req: Request) -> Value {
    json!({ "a": "b" })
}

async fn hello(_req: Request) -> &'static str {
    "hello"
}

async fn one(_req: Request) -> Vec<i32> {
    vec![1]
}

fn routes(router: Router) -> Router {
    router
        .on(Method::GET, "/numbers", numbers)
        .on(Method::GET, "/object", object)
        .on(Method::GET, "/hello", hello)
        .on(Method::GET, "/one", one)
}

#[tokio::test]
async fn default_config_serializes_arrays() {
    let app = routes(Router::new().json(JsonOptions::new())).into_app();
    let (status, ct, body) = get(&app, "/numbers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ct.as_deref(), Some("application/json"));
    assert_eq!(body, "[1,2,3]");
}

#[tokio::test]
async fn default_config_serializes_objects() {
    let app = routes(Router::new().json(JsonOptions::new())).into_app();
    let (_, ct, body) = get(&app, "/object").await;
    assert_eq!(ct.as_deref(), Some("application/json"));
    assert_eq!(body, r#"{"a":"b"}"#);
}

#[tokio::test]
async fn strings_fall_through_to_the_default_body() {
    let app = routes(Router::new().json(JsonOptions::new())).into_app();
    let (status, ct, body) = get(&app, "/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ct.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn without_json_arrays_are_plain_text() {
    let app = routes(Router::new()).into_app();
    let (_, ct, body) = get(&app, "/numbers").await;
    assert_eq!(ct.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "[1,2,3]");
}

#[tokio::test]
async fn custom_serializer_wraps_output() {
    let options = JsonOptions::new()
        .serializer(|v| Ok(format!("<wrapped>{}</wrapped>", default_json(v)?)));
    let app = routes(Router::new().json(options)).into_app();
    let (_, ct, body) = get(&app, "/one").await;
    assert_eq!(ct.as_deref(), Some("application/json"));
    assert_eq!(body, "<wrapped>[1]</wrapped>");
}

#[tokio::test]
async fn later_json_calls_merge_classes_and_replace_serializer() {
    let app = routes(
        Router::new()
            .json(JsonOptions::new().classes([Shape::Array]).serializer(|_| Ok("first".into())))
            .json(JsonOptions::new().classes([Shape::Object])),
    )
    .into_app();

    assert_eq!(app.chain().len(), 1);
    let (_, _, body) = get(&app, "/numbers").await;
    assert_eq!(body, "[1,2,3]");
    let (_, ct, body) = get(&app, "/object").await;
    assert_eq!(ct.as_deref(), Some("application/json"));
    assert_eq!(body, r#"{"a":"b"}"#);
}

#[tokio::test]
async fn matched_values_skip_later_interceptors() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let app = routes(
        Router::new()
            .json(JsonOptions::new())
            .intercept(from_fn(move |value, res, next| {
                seen.fetch_add(1, Ordering::SeqCst);
                next.run(value, res)
            })),
    )
    .into_app();

    get(&app, "/numbers").await;
    get(&app, "/object").await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    get(&app, "/hello").await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn earlier_interceptors_see_values_first() {
    let app = routes(
        Router::new()
            .intercept(from_fn(|value, res, next| {
                if value.as_array().is_some_and(Vec::is_empty) {
                    return Ok(Bytes::from_static(b"nothing"));
                }
                next.run(value, res)
            }))
            .json(JsonOptions::new()),
    )
    .on(Method::GET, "/empty", |_req: Request| async { json!([]) })
    .into_app();

    let (_, ct, body) = get(&app, "/empty").await;
    assert_eq!(ct, None);
    assert_eq!(body, "nothing");

    let (_, ct, _) = get(&app, "/numbers").await;
    assert_eq!(ct.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn serializer_failure_becomes_internal_server_error() {
    let options = JsonOptions::new().serializer(|_| Err("unserializable".into()));
    let app = routes(Router::new().json(options)).into_app();

    let (status, _, body) = get(&app, "/numbers").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());

    // Ineligible values never reach the serializer.
    let (status, _, body) = get(&app, "/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn finished_responses_bypass_the_chain() {
    let app = Router::new()
        .json(JsonOptions::new())
        .on(Method::GET, "/raw", |_req: Request| async {
            Response::text("[not json]")
        })
        .into_app();

    let (_, ct, body) = get(&app, "/raw").await;
    assert_eq!(ct.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "[not json]");
}

#[tokio::test]
async fn path_params_reach_the_handler() {
    let app = Router::new()
        .json(JsonOptions::new())
        .on(Method::GET, "/users/{id}", |req: Request| async move {
            json!({ "id": req.param("id") })
        })
        .into_app();

    let (_, _, body) = get(&app, "/users/42").await;
    assert_eq!(body, r#"{"id":"42"}"#);
}

#[tokio::test]
async fn null_is_no_content() {
    let app = Router::new()
        .json(JsonOptions::new())
        .on(Method::GET, "/nothing", |_req: Request| async { Value::Null })
        .into_app();

    let (status, ct, body) = get(&app, "/nothing").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(ct, None);
    assert!(body.is_empty());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = routes(Router::new().json(JsonOptions::new())).into_app();
    let (status, _, _) = get(&app, "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
