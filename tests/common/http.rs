use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

/// A decoded response from the router.
pub struct ApiReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl ApiReply {
    /// Asserts the success envelope and returns its `data`.
    pub fn data(&self) -> &Value {
        assert!(
            self.status.is_success(),
            "unexpected status {}: {}",
            self.status,
            self.body
        );
        assert_eq!(self.body["success"], true, "{}", self.body);
        &self.body["data"]
    }

    /// Asserts the error envelope: status, code, a message and the trace id
    /// stamped by the request-id middleware.
    pub fn assert_error(&self, status: StatusCode, code: &str) {
        assert_eq!(self.status, status, "{}", self.body);
        assert_eq!(self.body["success"], false);
        assert_eq!(self.body["code"], code);
        assert!(self.body["message"].is_string());
        assert!(self.body["traceId"].is_string());
    }
}

/// Calls the router as learner `bearer` (a raw token) when given.
pub async fn call(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> ApiReply {
    let mut headers = Vec::new();
    if let Some(token) = bearer {
        headers.push(("authorization", format!("Bearer {token}")));
    }
    call_with_headers(app, method, path, body, &headers).await
}

pub async fn call_with_headers(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
    headers: &[(&str, String)],
) -> ApiReply {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }

    let req = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request body"),
        None => builder.body(Body::empty()).expect("empty body"),
    };

    let resp = app.clone().oneshot(req).await.expect("oneshot response");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body bytes");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse json body")
    };

    ApiReply {
        status,
        headers,
        body,
    }
}

/// Ids of the words in a `data` array, in response order.
pub fn word_ids(data: &Value) -> Vec<String> {
    data.as_array()
        .expect("data array")
        .iter()
        .map(|w| w["id"].as_str().expect("word id").to_string())
        .collect()
}
