//! Process exit statuses, as in BSD `sysexits.h`.

/// Successful termination, including runs where individual stations failed.
pub const EX_OK: u8 = 0;

/// The command was used incorrectly.
pub const EX_USAGE: u8 = 64;

/// Internal software error; here, the transport could not be set up.
pub const EX_SOFTWARE: u8 = 70;
