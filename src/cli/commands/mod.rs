//! Command implementations for the CLI, one module per command group.

pub mod init;
pub mod regenerate;
pub mod resolve;
