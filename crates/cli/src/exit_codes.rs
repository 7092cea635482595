//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args, missing config file)          |
//! | 3    | A source export could not be read                    |
//! | 4    | The report (or JSON result) could not be written     |
//! | 5    | Config parse/validation failed                       |
//! | 6    | Unsynced serials found (`run --fail-on-mismatch`)    |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required files.
pub const EXIT_USAGE: u8 = 2;

/// Source read failed. Nothing was reconciled and no report was written.
pub const EXIT_SOURCE_READ: u8 = 3;

/// Report or JSON output could not be written.
pub const EXIT_REPORT_WRITE: u8 = 4;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// At least one serial is Not Synced and `--fail-on-mismatch` was given.
pub const EXIT_NOT_SYNCED: u8 = 6;
