use std::fmt;

use crate::station::StationCode;

const METAR_PREFIX: &str = "https://tgftp.nws.noaa.gov/data/observations/metar/stations/";
const DECODED_METAR_PREFIX: &str = "https://tgftp.nws.noaa.gov/data/observations/metar/decoded/";
const TAF_PREFIX: &str = "https://tgftp.nws.noaa.gov/data/forecasts/taf/stations/";

/// File name suffix shared by every report kind.
pub const SUFFIX: &str = ".TXT";

/// Upper bound on the length of any [`ResourceLocator`].
pub const MAX_LOCATOR_LEN: usize = max_prefix_len() + 4 + SUFFIX.len();

const fn max_prefix_len() -> usize {
    let mut max = 0;
    let mut i = 0;
    let kinds = ReportKind::all();
    while i < kinds.len() {
        let len = kinds[i].prefix().len();
        if len > max {
            max = len;
        }
        i += 1;
    }
    max
}

/// Which remote report family to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Metar,
    DecodedMetar,
    Taf,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Metar => "metar",
            ReportKind::DecodedMetar => "decoded metar",
            ReportKind::Taf => "taf",
        }
    }

    pub const fn all() -> &'static [ReportKind] {
        &[ReportKind::Metar, ReportKind::DecodedMetar, ReportKind::Taf]
    }

    /// Base path the station file lives under, including the trailing slash.
    pub const fn prefix(&self) -> &'static str {
        match self {
            ReportKind::Metar => METAR_PREFIX,
            ReportKind::DecodedMetar => DECODED_METAR_PREFIX,
            ReportKind::Taf => TAF_PREFIX,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transfer protocol a locator is addressed with.
///
/// The data host has been served over both FTP and HTTP; each has its own
/// status code for a missing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Ftp,
}

impl Protocol {
    pub fn not_found_status(&self) -> u16 {
        match self {
            Protocol::Http => 404,
            Protocol::Ftp => 550,
        }
    }
}

/// Fully qualified URL of one station report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    #[cfg(test)]
    pub(crate) fn from_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn protocol(&self) -> Protocol {
        if self.0.starts_with("ftp://") {
            Protocol::Ftp
        } else {
            Protocol::Http
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the locator for `kind` at station `code`.
///
/// Infallible: the code is validated on construction. Each call returns a
/// fresh value; resolve again for every kind needed.
pub fn resolve(kind: ReportKind, code: StationCode) -> ResourceLocator {
    let mut url = String::with_capacity(MAX_LOCATOR_LEN);
    url.push_str(kind.prefix());
    url.push_str(code.as_str());
    url.push_str(SUFFIX);
    debug_assert!(url.len() <= MAX_LOCATOR_LEN);

    ResourceLocator(url)
}
