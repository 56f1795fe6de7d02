//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Description                                       |
//! |------|---------------------------------------------------|
//! | 0    | Success, every row reconciled                     |
//! | 1    | Run completed but mismatches were found           |
//! | 2    | CLI usage error (bad args, unsupported file type) |
//! | 3    | Config invalid (TOML parse or validation)         |
//! | 4    | Source load error (missing file, bad sheet)       |
//! | 5    | Runtime error (engine failure, output write)      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - both sources reconciled with no mismatches.
pub const EXIT_SUCCESS: u8 = 0;

/// Run completed but at least one row failed reconciliation.
/// Like `diff(1)`, exit 1 means "sources differ."
pub const EXIT_MISMATCH: u8 = 1;

/// Usage error - bad arguments, unsupported source file extension.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A source file could not be read or parsed.
pub const EXIT_LOAD: u8 = 4;

/// Engine failure or report persistence failure.
pub const EXIT_RUNTIME: u8 = 5;
