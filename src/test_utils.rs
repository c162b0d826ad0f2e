//! Mock HTTP client used by the unit and integration tests.
use crate::client::HttpClient;
use async_trait::async_trait;
use axum::http::StatusCode;
use std::sync::{Arc, Mutex};

/// An [`HttpClient`] that records every forwarded request and replies with a
/// canned response.
pub struct MockHttpClient {
    pub requests: Arc<Mutex<Vec<MockRequest>>>,
    response_builder: Arc<dyn Fn() -> axum::response::Response + Send + Sync>,
}

#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl MockHttpClient {
    pub fn new(status: StatusCode, body: &str) -> Self {
        let body = body.to_string();
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response_builder: Arc::new(move || {
                axum::response::Response::builder()
                    .status(status)
                    .body(axum::body::Body::from(body.clone()))
                    .unwrap()
            }),
        }
    }

    pub fn get_requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("requests", &self.requests)
            .field("response_builder", &"<closure>")
            .finish()
    }
}

impl Clone for MockHttpClient {
    fn clone(&self) -> Self {
        Self {
            requests: Arc::clone(&self.requests),
            response_builder: Arc::clone(&self.response_builder),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn request(
        &self,
        req: axum::extract::Request,
    ) -> Result<axum::response::Response, Box<dyn std::error::Error + Send + Sync>> {
        let method = req.method().to_string();
        let uri = req.uri().to_string();
        let headers = req
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?
            .to_vec();

        self.requests.lock().unwrap().push(MockRequest {
            method,
            uri,
            headers,
            body,
        });

        Ok((self.response_builder)())
    }
}
