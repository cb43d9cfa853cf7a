//! Per-invocation driver: one pass over the station arguments.

use std::{ffi::OsStr, io::Write};
use tracing::{debug, info};

use crate::{
    model::{ReportKind, resolve},
    outcome::FetchOutcome,
    station::StationCode,
    transport::Transport,
};

/// Name used to prefix warnings on the error stream.
pub const PROGRAM_NAME: &str = "metar";

/// What a run should fetch for each station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Decoded text instead of the raw METAR.
    pub decoded: bool,
    /// Also fetch the TAF, best effort.
    pub include_taf: bool,
}

impl FetchOptions {
    pub fn primary_kind(&self) -> ReportKind {
        if self.decoded {
            ReportKind::DecodedMetar
        } else {
            ReportKind::Metar
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs the station list sequentially over one transport handle.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    options: FetchOptions,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, options: FetchOptions) -> Self {
        Self { transport, options }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Process every argument in order. Bodies go to `out`; per-station
    /// failures are reported on `warnings` and never stop the run.
    ///
    /// Arguments are taken as OS strings so one that is not UTF-8 fails
    /// validation on its own instead of aborting the run.
    pub async fn run<S: AsRef<OsStr>>(
        &self,
        args: &[S],
        out: &mut (dyn Write + Send),
        warnings: &mut (dyn Write + Send),
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for arg in args {
            let arg = arg.as_ref();
            summary.processed += 1;

            match self.fetch_station(arg, out).await {
                FetchOutcome::Success => summary.succeeded += 1,
                outcome => {
                    summary.failed += 1;
                    let arg = arg.to_string_lossy();
                    // nowhere left to report a broken error stream
                    let _ = writeln!(warnings, "{PROGRAM_NAME}: {arg}: {outcome}");
                }
            }
        }

        info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "run finished"
        );
        summary
    }

    /// Outcome of the primary report for one argument. The TAF, when
    /// requested, never changes it.
    async fn fetch_station(&self, arg: &OsStr, out: &mut (dyn Write + Send)) -> FetchOutcome {
        let code = match StationCode::normalize_bytes(arg.as_encoded_bytes()) {
            Ok(code) => code,
            Err(err) => return err.into(),
        };

        let primary = self.fetch(self.options.primary_kind(), code, out).await;
        if !primary.is_success() || !self.options.include_taf {
            return primary;
        }

        let taf = self.fetch(ReportKind::Taf, code, out).await;
        if !taf.is_success() {
            debug!(station = %code, outcome = %taf, "taf unavailable, skipping");
        }

        primary
    }

    async fn fetch(
        &self,
        kind: ReportKind,
        code: StationCode,
        out: &mut (dyn Write + Send),
    ) -> FetchOutcome {
        let url = resolve(kind, code);
        debug!(%kind, station = %code, %url, "fetching");

        let report = self.transport.fetch(&url, out).await;
        FetchOutcome::classify(&report)
    }
}
