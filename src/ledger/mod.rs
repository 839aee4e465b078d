//! The version-mapping ledger (`llpkgstore.json`)
//!
//! For each C library the ledger records which upstream C versions were
//! released as which mapped (Go module) versions. It is append-only: entries
//! are never rewritten or removed, which is what gives "latest" queries their
//! meaning as release history.

pub mod model;
pub mod store;

pub use model::VersionMapping;
pub use store::{DEFAULT_LEDGER_FILE, Ledger};
