//! In-memory transport serving canned responses.
//!
//! Locators without a registered response answer like a missing file on the
//! real host (HTTP 404). Every requested locator is recorded in order.

use async_trait::async_trait;
use std::{collections::HashMap, io::Write, sync::Mutex};

use crate::{
    model::ResourceLocator,
    outcome::{TransportFailure, TransportReport},
};

use super::Transport;

/// A canned answer for one locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// 200 with this body.
    Body(String),
    /// A non-success status with no body.
    Status(u16),
    /// Transport-level failure before any status arrived.
    Failure(String),
    /// The transport's own "remote file not found" signal.
    RemoteFileNotFound,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &ResourceLocator, response: MockResponse) -> Self {
        self.responses.insert(url.as_str().to_string(), response);
        self
    }

    pub fn with_body(self, url: &ResourceLocator, body: impl Into<String>) -> Self {
        self.with_response(url, MockResponse::Body(body.into()))
    }

    /// Locators requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &ResourceLocator, sink: &mut (dyn Write + Send)) -> TransportReport {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.as_str().to_string());
        }

        let protocol = url.protocol();
        let not_found = protocol.not_found_status();

        match self.responses.get(url.as_str()) {
            Some(MockResponse::Body(body)) => match sink.write_all(body.as_bytes()) {
                Ok(()) => TransportReport::completed(protocol, 200),
                Err(err) => TransportReport::failed(
                    protocol,
                    Some(200),
                    TransportFailure::Other(format!("failed writing body: {err}")),
                ),
            },
            Some(MockResponse::Status(status)) => TransportReport::failed(
                protocol,
                Some(*status),
                TransportFailure::Other(format!("HTTP status {status}")),
            ),
            Some(MockResponse::Failure(message)) => {
                TransportReport::failed(protocol, None, TransportFailure::Other(message.clone()))
            }
            Some(MockResponse::RemoteFileNotFound) => {
                TransportReport::failed(protocol, None, TransportFailure::RemoteFileNotFound)
            }
            None => TransportReport::failed(
                protocol,
                Some(not_found),
                TransportFailure::Other(format!("HTTP status {not_found}")),
            ),
        }
    }
}
