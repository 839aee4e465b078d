//! Shared plumbing for llpkgstore commands
//!
//! - **config**: llpkg.cfg package descriptions and llpkgstore.toml repository settings
//! - **context**: Root, settings and ledger location shared by all commands
//! - **error**: Error types with exit codes and contextual help messages
//! - **logging**: `tracing` subscriber setup

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
