//! Classification of a single fetch attempt.

use std::fmt;

use crate::{model::Protocol, station::StationCodeError};

/// A failure the transport reported for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The transport itself says the remote file does not exist.
    RemoteFileNotFound,
    /// Anything else, with the transport's own diagnostic.
    Other(String),
}

/// What the transport observed while retrieving one locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReport {
    pub protocol: Protocol,
    pub status: Option<u16>,
    pub failure: Option<TransportFailure>,
}

impl TransportReport {
    pub fn completed(protocol: Protocol, status: u16) -> Self {
        Self { protocol, status: Some(status), failure: None }
    }

    pub fn failed(protocol: Protocol, status: Option<u16>, failure: TransportFailure) -> Self {
        Self { protocol, status, failure: Some(failure) }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of processing one station for one report kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    NotFound,
    Transport(String),
    Validation(StationCodeError),
}

impl FetchOutcome {
    /// Classify a transport report. First matching rule wins:
    /// a not-found signal (either the transport's own or the protocol's
    /// not-found status), then any other failure, then success.
    pub fn classify(report: &TransportReport) -> Self {
        let not_found_status = report.status == Some(report.protocol.not_found_status());

        match &report.failure {
            Some(TransportFailure::RemoteFileNotFound) => FetchOutcome::NotFound,
            _ if not_found_status => FetchOutcome::NotFound,
            Some(TransportFailure::Other(message)) => FetchOutcome::Transport(message.clone()),
            None => FetchOutcome::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success)
    }
}

impl From<StationCodeError> for FetchOutcome {
    fn from(err: StationCodeError) -> Self {
        FetchOutcome::Validation(err)
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Success => f.write_str("ok"),
            FetchOutcome::NotFound => f.write_str("station report not found"),
            FetchOutcome::Transport(message) => f.write_str(message),
            FetchOutcome::Validation(err) => write!(f, "{err}"),
        }
    }
}
