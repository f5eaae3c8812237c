//! Command implementations
//!
//! One module per CLI subcommand. Each exposes an
//! `execute(...) -> Result<i32>` whose return value is the subcommand's
//! exit code; errors from the core taxonomy bubble up to `main`.

pub mod create;
pub mod destroy;
pub mod provision;
pub mod run;
pub mod setup;
pub mod verify;
