use async_trait::async_trait;
use reqwest::Client;
use std::{io::Write, time::Duration};
use tracing::debug;

use crate::{
    config::TransportConfig,
    model::ResourceLocator,
    outcome::{TransportFailure, TransportReport},
};

use super::{Transport, TransportInitError};

const DEFAULT_USER_AGENT: &str = concat!("metar/", env!("CARGO_PKG_VERSION"));

/// Transport over HTTP(S), backed by a single reused `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportInitError> {
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let mut builder = Client::builder().user_agent(user_agent);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(non_zero("timeout_secs", secs)?);
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(non_zero("connect_timeout_secs", secs)?);
        }

        Ok(Self { http: builder.build()? })
    }
}

fn non_zero(name: &'static str, secs: u64) -> Result<Duration, TransportInitError> {
    if secs == 0 {
        return Err(TransportInitError::ZeroTimeout { name });
    }
    Ok(Duration::from_secs(secs))
}

/// Full error chain, e.g. "error sending request: ...: connection refused".
fn describe(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &ResourceLocator, sink: &mut (dyn Write + Send)) -> TransportReport {
        let protocol = url.protocol();

        let mut res = match self.http.get(url.as_str()).send().await {
            Ok(res) => res,
            Err(err) => {
                let failure = TransportFailure::Other(describe(err));
                return TransportReport::failed(protocol, None, failure);
            }
        };

        let status = res.status().as_u16();
        debug!(%url, status, "response received");

        if let Err(err) = res.error_for_status_ref() {
            let failure = TransportFailure::Other(describe(err));
            return TransportReport::failed(protocol, Some(status), failure);
        }

        let mut written = 0usize;
        loop {
            match res.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(err) = sink.write_all(&chunk) {
                        return TransportReport::failed(
                            protocol,
                            Some(status),
                            TransportFailure::Other(format!("failed writing body: {err}")),
                        );
                    }
                    written += chunk.len();
                }
                Ok(None) => break,
                Err(err) => {
                    return TransportReport::failed(
                        protocol,
                        Some(status),
                        TransportFailure::Other(describe(err)),
                    );
                }
            }
        }

        if let Err(err) = sink.flush() {
            return TransportReport::failed(
                protocol,
                Some(status),
                TransportFailure::Other(format!("failed writing body: {err}")),
            );
        }

        debug!(%url, written, "body written");
        TransportReport::completed(protocol, status)
    }
}
