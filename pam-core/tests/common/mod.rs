// Shared helpers for integration tests: scripted transport and fixed credentials

#![allow(dead_code)]

use async_trait::async_trait;
use pam_core::error::{PamError, PamResult};
use pam_core::http::{Transport, TransportResponse};
use pam_core::PamConfig;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub const SUBSCRIBE_KEY: &str = "sub-c-demo";
pub const PUBLISH_KEY: &str = "pub-c-demo";
pub const SECRET_KEY: &str = "sec-c-demo";
pub const TIMESTAMP: i64 = 1_700_000_000;

pub fn test_config() -> PamConfig {
    PamConfig::builder()
        .subscribe_key(SUBSCRIBE_KEY)
        .publish_key(PUBLISH_KEY)
        .secret_key(SECRET_KEY)
        .uuid("test-client")
        .build()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Transport that replays queued responses and records requested URLs
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<PamResult<TransportResponse>>>,
    requests: Mutex<Vec<(String, Duration)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(self, status: u16, body: serde_json::Value) -> Self {
        self.push(Ok(TransportResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        }))
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.push(Ok(TransportResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn fail(self, err: PamError) -> Self {
        self.push(Err(err))
    }

    fn push(self, response: PamResult<TransportResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<(String, Duration)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, timeout: Duration) -> PamResult<TransportResponse> {
        self.requests.lock().unwrap().push((url.to_string(), timeout));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PamError::network("no scripted response left")))
    }
}

/// Split a URL's query string into decoded pairs, keeping order
pub fn query_pairs(url: &str) -> Vec<(String, String)> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                name.to_string(),
                urlencoding::decode(value).unwrap().into_owned(),
            )
        })
        .collect()
}
