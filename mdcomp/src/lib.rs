//! Expose mdcomp's command implementations for use in integration tests and
//! the xtask. The compiler itself lives in `mdcomp-core`, which is the crate
//! to depend on for programmatic use.
pub mod cli;
pub mod commands;
pub mod error;
