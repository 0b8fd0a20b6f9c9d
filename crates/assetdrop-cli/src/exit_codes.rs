//! Process exit codes. Part of the public contract.

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1; // Config error, release lookup, no matches, or asset failure
