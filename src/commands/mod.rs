//! CLI commands for llpkgstore
//!
//! - **verify**: Check a package submission against the version ledger
//! - **record**: Append a released mapping to the ledger
//! - **show**: Print the recorded history of a library
//! - **branch**: Validate a maintenance-branch label
//!
//! All commands take `&StoreContext` and load the ledger themselves.

pub mod branch;
pub mod record;
pub mod show;
pub mod verify;

pub use branch::run_branch;
pub use record::run_record;
pub use show::run_show;
pub use verify::run_verify;
