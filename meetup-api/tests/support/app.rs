use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use meetup_api::{create_api_router, ApiConfig};
use meetup_test_utils::TestSite;
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

pub fn test_router(test_site: &TestSite) -> Router {
    create_api_router(test_site.site.clone(), &ApiConfig::default())
}

pub async fn send(
    router: &Router,
    request: Request<Body>,
) -> Result<Response<Body>, Box<dyn std::error::Error>> {
    Ok(router.clone().oneshot(request).await?)
}

pub async fn get(router: &Router, uri: &str) -> Result<Response<Body>, Box<dyn std::error::Error>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    send(router, request).await
}

pub async fn submit(
    router: &Router,
    method: &str,
    body: impl Into<Body>,
) -> Result<Response<Body>, Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method(method)
        .uri("/api/new-meetup")
        .header("content-type", "application/json")
        .body(body.into())?;
    send(router, request).await
}

pub async fn json_body(response: Response<Body>) -> Result<Value, Box<dyn std::error::Error>> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn cache_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("x-page-cache")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
