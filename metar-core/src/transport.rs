use async_trait::async_trait;
use std::{fmt::Debug, io::Write};

use crate::{model::ResourceLocator, outcome::TransportReport};

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

/// Errors raised while setting up a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportInitError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },
}

/// Blocking-from-the-caller's-view retrieval of one locator.
///
/// Received body bytes are appended to `sink` unchanged as they arrive.
/// Nothing is written when the remote reports a failure status.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn fetch(&self, url: &ResourceLocator, sink: &mut (dyn Write + Send)) -> TransportReport;
}
