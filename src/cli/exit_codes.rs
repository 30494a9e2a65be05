//! exit codes for lfilter commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error;
//! like grep, a filter that selects nothing is reported with its own code

/// command completed successfully (and matched, where matching applies)
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// the filter matched nothing
pub const NO_MATCH: i32 = 2;

/// the filter expression is malformed
pub const INVALID_FILTER: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// entity input could not be read or parsed
pub const INPUT_ERROR: i32 = 6;
