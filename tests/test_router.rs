mod common;

use std::sync::Arc;

use common::TempRoot;
use restatic::http::request::{Method, Request, RequestBuilder};
use restatic::http::response::{Response, StatusCode};
use restatic::router::{Handler, RouteMatch, Router};
use restatic::App;

fn handler(body: &'static str) -> Handler {
    Arc::new(move |_: &Request, _: &mut Response| body.to_string())
}

fn demo_router() -> Router {
    let mut router = Router::new("/App");
    router.add(Method::GET, "/hello", handler("get hello"));
    router.add(Method::POST, "/hello", handler("post hello"));
    router
}

fn request(method: Method, target: &str) -> Request {
    RequestBuilder::new().method(method).path(target).build().unwrap()
}

fn handler_body(m: RouteMatch<'_>) -> String {
    match m {
        RouteMatch::Handler(h) => h(&request(Method::GET, "/"), &mut Response::default()),
        other => panic!("expected handler, got {:?}", other),
    }
}

#[test]
fn test_exact_match_per_method() {
    let router = demo_router();

    assert_eq!(handler_body(router.route(Method::GET, "/App/hello")), "get hello");
    assert_eq!(handler_body(router.route(Method::POST, "/App/hello")), "post hello");
    assert_eq!(router.len(), 2);
}

#[test]
fn test_prefixed_without_handler_is_not_found() {
    let router = demo_router();

    assert!(matches!(router.route(Method::GET, "/App/missing"), RouteMatch::NotFound));
    assert!(matches!(router.route(Method::GET, "/App/hello/extra"), RouteMatch::NotFound));
    assert!(matches!(router.route(Method::PUT, "/App/hello"), RouteMatch::NotFound));
}

#[test]
fn test_prefix_index_goes_to_static_index() {
    let router = demo_router();

    for path in ["/App", "/App/", "/App/index.html"] {
        match router.route(Method::GET, path) {
            RouteMatch::Static(p) => assert_eq!(p, "/index.html"),
            other => panic!("{} routed to {:?}", path, other),
        }
    }
}

#[test]
fn test_outside_prefix_is_static() {
    let router = demo_router();

    match router.route(Method::GET, "/hello") {
        RouteMatch::Static(p) => assert_eq!(p, "/hello"),
        other => panic!("routed to {:?}", other),
    }
    assert!(matches!(router.route(Method::GET, "/Apple/x"), RouteMatch::Static("/Apple/x")));
    assert!(matches!(router.route(Method::POST, "/upload"), RouteMatch::NotFound));
}

#[test]
fn test_empty_prefix_routes_at_root() {
    let mut router = Router::new("");
    router.add(Method::GET, "/pi", handler("3.14"));

    assert_eq!(handler_body(router.route(Method::GET, "/pi")), "3.14");
    assert!(matches!(router.route(Method::GET, "/style.css"), RouteMatch::Static(_)));
}

#[tokio::test]
async fn test_app_handler_response() {
    let app = App::builder()
        .get("/hello", |req, _resp| format!("Hello {}", req.query_or("name", "World")))
        .build();

    let resp = app.handle(&request(Method::GET, "/App/hello?name=Maria")).await;
    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.content_type, "text/plain");
    assert_eq!(resp.body, b"Hello Maria".to_vec());

    let resp = app.handle(&request(Method::GET, "/App/hello")).await;
    assert_eq!(resp.body, b"Hello World".to_vec());
}

#[tokio::test]
async fn test_app_handler_can_change_status_and_type() {
    let app = App::builder()
        .get("/gone", |_req, resp| {
            resp.set_status(StatusCode::NotFound).set_content_type("application/json");
            "{}".to_string()
        })
        .build();

    let resp = app.handle(&request(Method::GET, "/App/gone")).await;
    assert_eq!(resp.status, StatusCode::NotFound);
    assert_eq!(resp.content_type, "application/json");
    assert_eq!(resp.body, b"{}".to_vec());
}

#[tokio::test]
async fn test_app_panicking_handler_is_500() {
    let app = App::builder()
        .get("/boom", |_req, _resp| -> String { panic!("handler failure") })
        .build();

    let resp = app.handle(&request(Method::GET, "/App/boom")).await;
    assert_eq!(resp.status, StatusCode::InternalServerError);
}

#[tokio::test]
async fn test_app_prefixed_unknown_skips_filesystem() {
    let root = TempRoot::new("router-skip-fs");
    root.write("missing", b"on disk but under the prefix");
    let app = App::builder().static_files(root.path()).build();

    let resp = app.handle(&request(Method::GET, "/App/missing")).await;
    assert_eq!(resp.status, StatusCode::NotFound);
    assert_eq!(resp.body, b"404 Not Found".to_vec());
}

#[tokio::test]
async fn test_app_static_and_not_found() {
    let root = TempRoot::new("router-static");
    root.write("index.html", b"<html></html>");
    let app = App::builder().static_files(root.path()).build();

    let resp = app.handle(&request(Method::GET, "/index.html")).await;
    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.content_type, "text/html");

    let resp = app.handle(&request(Method::GET, "/App/")).await;
    assert_eq!(resp.body, b"<html></html>".to_vec());

    let resp = app.handle(&request(Method::GET, "/nope.txt")).await;
    assert_eq!(resp.status, StatusCode::NotFound);
    assert_eq!(resp.body, b"404 Not Found".to_vec());
}
