//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Bad arguments, bad configuration, bad input files and engine failures.
pub const ERROR: i32 = 2;

/// The run was cut short before finishing its work.
pub const INTERRUPTED: i32 = 130;
