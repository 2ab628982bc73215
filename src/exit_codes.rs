//! Exit code constants for the revet CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing config, missing API key)
//! - 2: Model API failure
//! - 3: `gh` CLI failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or missing credentials.
pub const USER_ERROR: i32 = 1;

/// Model API failure: HTTP error or unusable response transport.
pub const API_FAILURE: i32 = 2;

/// `gh` CLI failure: command missing, not authenticated, or non-zero exit.
pub const GH_FAILURE: i32 = 3;
