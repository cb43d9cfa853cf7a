//! Core library for the `metar` CLI.
//!
//! This crate defines:
//! - Station identifier normalization
//! - Report locators on the NOAA data host
//! - Classification of fetch results
//! - The transport abstraction and the sequential fetch session
//! - Transport configuration
//!
//! It is used by `metar-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod outcome;
pub mod session;
pub mod station;
pub mod transport;

pub use config::{Config, TransportConfig};
pub use model::{MAX_LOCATOR_LEN, Protocol, ReportKind, ResourceLocator, resolve};
pub use outcome::{FetchOutcome, TransportFailure, TransportReport};
pub use session::{FetchOptions, PROGRAM_NAME, RunSummary, Session};
pub use station::{StationCode, StationCodeError, normalize};
pub use transport::{HttpTransport, MockTransport, Transport, TransportInitError};
