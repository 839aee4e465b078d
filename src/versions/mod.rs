//! Version string handling shared by the ledger and the release checker

pub mod semver;

