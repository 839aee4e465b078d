//! Release admission for llpkg submissions
//!
//! A submission proposes a mapped version for one upstream C version of a
//! library. Before it is published, three things are established:
//!
//! - **Directive**: which mapped version is being proposed (`Release-as: clib/vX.Y.Z`)
//! - **Branch**: whether it targets main or a `release-branch.<clib>/<mapped>` maintenance branch
//! - **Policy**: whether the ledger history allows that version on that branch
//!
//! Accepted releases are then appended to the ledger.

pub mod branch;
pub mod directive;
pub mod policy;

pub use branch::{BranchTarget, MaintenanceBranch};
pub use directive::{MappedVersion, find_release_as};
pub use policy::{Acceptance, Submission, check_legacy_version};
