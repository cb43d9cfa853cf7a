use anyhow::Context;
use clap::Parser;
use metar_core::{Config, FetchOptions, HttpTransport, PROGRAM_NAME, Session, Transport};
use std::{
    ffi::OsString,
    io::{self, Write},
};
use tracing::debug;

use crate::exit;

/// One-line summary printed on any usage error.
pub const USAGE: &str = "usage: metar [-d] [-t] station_id [station_id ...]";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "metar",
    about = "Print METAR and TAF reports from the NOAA data host",
    override_usage = "metar [-d] [-t] station_id [station_id ...]",
    args_override_self = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Fetch the decoded text instead of the raw METAR.
    #[arg(short = 'd')]
    pub decoded: bool,

    /// Also fetch the TAF for each station, best effort.
    #[arg(short = 't')]
    pub taf: bool,

    /// Three- or four-character station ids, e.g. `sfo` or `KSFO`. Kept as
    /// OS strings so a non-UTF-8 id is rejected per station, not at parse time.
    #[arg(value_name = "station_id", required = true)]
    pub stations: Vec<OsString>,
}

impl Cli {
    /// Parse `args`, or return the status the process should exit with.
    ///
    /// Anything clap rejects, a missing station or an unknown flag, prints
    /// the usage line to `stderr`.
    pub fn parse_or_status<I, T>(args: I, stderr: &mut dyn Write) -> Result<Self, u8>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|err| {
            debug!(kind = ?err.kind(), "rejected arguments");
            let _ = writeln!(stderr, "{USAGE}");
            exit::EX_USAGE
        })
    }

    pub fn options(&self) -> FetchOptions {
        FetchOptions { decoded: self.decoded, include_taf: self.taf }
    }

    pub async fn run(self) -> u8 {
        let mut stderr = io::stderr();
        let config = match Config::load().context("Failed to load configuration") {
            Ok(config) => config,
            Err(err) => return init_failed(&err, &mut stderr),
        };

        self.run_with_config(&config, &mut io::stdout(), &mut stderr).await
    }

    /// Build the transport from `config`, then run. A transport that cannot
    /// be built ends the process with `EX_SOFTWARE` before any fetch.
    pub async fn run_with_config(
        self,
        config: &Config,
        out: &mut (dyn Write + Send),
        warnings: &mut (dyn Write + Send),
    ) -> u8 {
        let transport = match HttpTransport::new(&config.transport)
            .context("Failed to initialize transport")
        {
            Ok(transport) => transport,
            Err(err) => return init_failed(&err, warnings),
        };

        self.run_with(transport, out, warnings).await
    }

    /// Run every station through `transport`. Per-station failures are
    /// warnings only, so this always reports success.
    pub async fn run_with<T: Transport>(
        self,
        transport: T,
        out: &mut (dyn Write + Send),
        warnings: &mut (dyn Write + Send),
    ) -> u8 {
        let session = Session::new(transport, self.options());
        let summary = session.run(self.stations.as_slice(), out, warnings).await;
        debug!(?summary, "all stations processed");

        exit::EX_OK
    }
}

fn init_failed(err: &anyhow::Error, stderr: &mut dyn Write) -> u8 {
    let _ = writeln!(stderr, "{PROGRAM_NAME}: {err:#}");
    exit::EX_SOFTWARE
}

#[cfg(test)]
mod tests {
    use super::*;
    use metar_core::{MockTransport, ReportKind, TransportConfig, normalize, resolve};

    fn parse(args: &[&str]) -> (Result<Cli, u8>, String) {
        let mut stderr = Vec::new();
        let parsed = Cli::parse_or_status(args.iter().copied(), &mut stderr);
        (parsed, String::from_utf8(stderr).unwrap())
    }

    #[test]
    fn flags_and_stations_are_parsed() {
        let (parsed, stderr) = parse(&["metar", "-d", "-t", "sfo", "KOAK"]);
        let cli = parsed.expect("valid invocation");

        assert!(stderr.is_empty());
        assert_eq!(cli.stations, vec![OsString::from("sfo"), OsString::from("KOAK")]);
        assert_eq!(cli.options(), FetchOptions { decoded: true, include_taf: true });
    }

    #[test]
    fn combined_short_flags() {
        let (parsed, _) = parse(&["metar", "-dt", "sfo"]);
        assert_eq!(parsed.unwrap().options(), FetchOptions { decoded: true, include_taf: true });
    }

    #[test]
    fn repeated_flags_are_accepted() {
        let (parsed, stderr) = parse(&["metar", "-d", "-d", "sfo"]);
        let cli = parsed.expect("repeating a flag is not a usage error");

        assert!(stderr.is_empty());
        assert_eq!(cli.options(), FetchOptions { decoded: true, include_taf: false });

        let (parsed, _) = parse(&["metar", "-t", "-dt", "-t", "sfo"]);
        assert_eq!(parsed.unwrap().options(), FetchOptions { decoded: true, include_taf: true });
    }

    #[test]
    fn no_flags_means_raw_metar_only() {
        let (parsed, _) = parse(&["metar", "kSFO"]);
        let options = parsed.unwrap().options();
        assert_eq!(options, FetchOptions::default());
        assert_eq!(options.primary_kind(), ReportKind::Metar);
    }

    #[test]
    fn zero_stations_is_a_usage_error() {
        let (parsed, stderr) = parse(&["metar"]);
        assert_eq!(parsed.unwrap_err(), exit::EX_USAGE);
        assert_eq!(stderr, format!("{USAGE}\n"));

        let (parsed, _) = parse(&["metar", "-t"]);
        assert_eq!(parsed.unwrap_err(), exit::EX_USAGE);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let (parsed, stderr) = parse(&["metar", "-x", "sfo"]);
        assert_eq!(parsed.unwrap_err(), exit::EX_USAGE);
        assert_eq!(stderr, format!("{USAGE}\n"));
    }

    #[test]
    fn help_and_version_are_unknown_flags() {
        for flag in ["-h", "--help", "-V", "--version"] {
            let (parsed, stderr) = parse(&["metar", flag, "sfo"]);
            assert_eq!(parsed.unwrap_err(), exit::EX_USAGE, "{flag}");
            assert_eq!(stderr, format!("{USAGE}\n"));
        }
    }

    #[test]
    fn invalid_station_is_not_a_usage_error() {
        let (parsed, stderr) = parse(&["metar", "s!o"]);
        assert!(parsed.is_ok());
        assert!(stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_utf8_station_is_skipped_not_fatal() {
        use std::os::unix::ffi::OsStringExt;

        let args = [
            OsString::from("metar"),
            OsString::from("sfo"),
            OsString::from_vec(b"s\xffo".to_vec()),
        ];
        let mut stderr = Vec::new();
        let cli = Cli::parse_or_status(args, &mut stderr).expect("non-UTF-8 ids still parse");
        assert!(stderr.is_empty());

        let code = normalize("sfo").unwrap();
        let transport =
            MockTransport::new().with_body(&resolve(ReportKind::Metar, code), "KSFO 010056Z\n");
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        let status = cli.run_with(transport, &mut out, &mut warnings).await;

        assert_eq!(status, exit::EX_OK);
        assert_eq!(out, b"KSFO 010056Z\n");
        assert_eq!(
            String::from_utf8(warnings).unwrap(),
            "metar: s\u{FFFD}o: station id must contain only alphanumeric characters\n"
        );
    }

    #[tokio::test]
    async fn transport_init_failure_is_a_software_error() {
        let (parsed, _) = parse(&["metar", "sfo"]);
        let config = Config {
            transport: TransportConfig { timeout_secs: Some(0), ..Default::default() },
        };
        let mut out = Vec::new();
        let mut warnings = Vec::new();

        let status = parsed.unwrap().run_with_config(&config, &mut out, &mut warnings).await;

        assert_eq!(status, exit::EX_SOFTWARE);
        assert!(out.is_empty());
        let warnings = String::from_utf8(warnings).unwrap();
        assert!(
            warnings.starts_with("metar: Failed to initialize transport: "),
            "{warnings}"
        );
        assert!(warnings.contains("timeout_secs must be greater than zero"), "{warnings}");
    }

    #[tokio::test]
    async fn station_failures_still_exit_ok() {
        let (parsed, _) = parse(&["metar", "s!o", "sfoo"]);
        let mut out = Vec::new();
        let mut warnings = Vec::new();

        let status = parsed.unwrap().run_with(MockTransport::new(), &mut out, &mut warnings).await;

        assert_eq!(status, exit::EX_OK);
        assert!(out.is_empty());
        let warnings = String::from_utf8(warnings).unwrap();
        assert!(warnings.contains("metar: s!o: "));
        assert!(warnings.contains("metar: sfoo: station report not found"));
    }

    #[tokio::test]
    async fn taf_flag_with_missing_forecast() {
        let code = normalize("sfo").unwrap();
        let transport =
            MockTransport::new().with_body(&resolve(ReportKind::Metar, code), "KSFO 010056Z\n");

        let (parsed, _) = parse(&["metar", "-t", "sfo"]);
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        let status = parsed.unwrap().run_with(transport, &mut out, &mut warnings).await;

        assert_eq!(status, exit::EX_OK);
        assert_eq!(out, b"KSFO 010056Z\n");
        assert!(warnings.is_empty());
    }
}
