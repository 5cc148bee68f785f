//! Mock transport for unit testing
//!
//! [`MockTransport`] records every request it receives and answers from a
//! scripted queue of responses, so the resource layer and typed clients can
//! be exercised without a running Melange server. When the queue is empty it
//! answers `200` with an empty body.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::error::MelangeError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Recording mock transport
#[derive(Debug, Default)]
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl MockTransport {
    /// Create a new mock with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, body.to_string());
    }

    /// Queue a response with an empty body
    pub fn respond_empty(&self, status: u16) {
        self.respond_raw(status, String::new());
    }

    /// Queue a response with a raw body
    pub fn respond_raw(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(ApiResponse {
                status,
                body: body.into(),
            });
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// The most recent request body, decoded as JSON
    pub fn last_json_body(&self) -> Option<Value> {
        self.last_request()
            .and_then(|request| request.body)
            .and_then(|body| serde_json::from_str(&body).ok())
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn do_request(&self, request: ApiRequest) -> Result<ApiResponse, MelangeError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(ApiResponse {
                status: 200,
                body: String::new(),
            });

        if response.status >= 400 {
            return Err(MelangeError::ServiceResponse {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}
