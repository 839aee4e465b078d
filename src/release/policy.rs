//! Legacy compatibility checker
//!
//! Decides whether a proposed `C version -> mapped version` release fits the
//! branch maintenance strategy:
//!
//! - the main branch only ever receives the newest C version
//! - maintenance (legacy) branches receive older C versions, but only the
//!   latest patch of a given major.minor line
//! - a mapped version never goes backwards relative to the release it follows,
//!   and is never reused
//!
//! The check is a pure function of the loaded ledger and the submission. Gates
//! are evaluated in order and the first one that applies decides.

use crate::core::error::{LedgerError, PolicyError, StoreResult};
use crate::ledger::Ledger;
use crate::release::branch::BranchTarget;
use crate::versions::semver;
use serde::Serialize;
use std::cmp::Ordering;

/// A proposed release for one library
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
  pub library: &'a str,
  /// Raw upstream version from llpkg.cfg
  pub c_version: &'a str,
  /// Proposed mapped version, `v`-prefixed semver
  pub mapped_version: &'a str,
  pub target: BranchTarget,
}

/// Why a submission was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
  /// Nothing recorded for the library yet
  FirstRelease,
  /// The upstream version is not semver, so ordering rules do not apply
  NotSemver,
  /// Strictly newer than every recorded C version
  Newest,
  /// Older than every recorded C version on a maintenance branch
  Oldest,
  /// Follows its closest recorded predecessor on a maintenance branch
  FollowsPredecessor,
}

/// Check a submission against the ledger history of its library
pub fn check_legacy_version(ledger: &Ledger, submission: &Submission<'_>) -> StoreResult<Acceptance> {
  let library = submission.library;
  let mapped_version = submission.mapped_version;

  if ledger.go_versions(library).iter().any(|v| v == mapped_version) {
    return Err(
      PolicyError::DuplicateMappedVersion {
        library: library.to_string(),
        mapped_version: mapped_version.to_string(),
      }
      .into(),
    );
  }

  let current = semver::to_semver(submission.c_version);
  let mut recorded = ledger.c_versions(library);

  if recorded.is_empty() {
    tracing::debug!(library, "No recorded versions, accepting first release");
    return Ok(Acceptance::FirstRelease);
  }
  if !semver::is_valid(&current) {
    tracing::debug!(library, c_version = submission.c_version, "C version is not semver, skipping policy");
    return Ok(Acceptance::NotSemver);
  }

  semver::sort_descending(&mut recorded);
  let latest = &recorded[0];

  // The newest C version takes this path whichever branch it targets
  if semver::compare(&current, latest) == Ordering::Greater {
    if let Some(latest_mapped) = ledger.latest_go_version(library)
      && semver::compare(latest_mapped, mapped_version) == Ordering::Greater
    {
      return Err(
        PolicyError::RegressionFromLatest {
          library: library.to_string(),
          mapped_version: mapped_version.to_string(),
          latest: latest_mapped.to_string(),
        }
        .into(),
      );
    }
    tracing::debug!(library, current = %current, latest = %latest, "Newest C version");
    return Ok(Acceptance::Newest);
  }

  if !submission.target.is_legacy() {
    return Err(
      PolicyError::LegacyOnMainBranch {
        library: library.to_string(),
        c_version: submission.c_version.to_string(),
      }
      .into(),
    );
  }

  // First recorded version strictly below us; everything before it is >= us
  let i = recorded.partition_point(|v| semver::compare(v, &current) != Ordering::Less);
  if i == recorded.len() {
    tracing::debug!(library, current = %current, "Oldest C version on record");
    return Ok(Acceptance::Oldest);
  }

  // A larger patch of our major.minor line already exists
  if let Some(successor) = i.checked_sub(1).map(|j| &recorded[j])
    && semver::major_minor(successor) == semver::major_minor(&current)
    && semver::compare(successor, &current) == Ordering::Greater
  {
    return Err(
      PolicyError::HistoricalLegacyVersion {
        library: library.to_string(),
        c_version: submission.c_version.to_string(),
        superseded_by: ledger.search_by_semver(library, successor).unwrap_or(successor).to_string(),
      }
      .into(),
    );
  }

  let predecessor = &recorded[i];
  let original = ledger
    .search_by_semver(library, predecessor)
    .ok_or_else(|| LedgerError::Corrupted {
      library: library.to_string(),
      reason: format!("cannot find original C version for {}", predecessor),
    })?;
  let predecessor_mapped = ledger
    .latest_go_version_for(library, original)
    .ok_or_else(|| LedgerError::Corrupted {
      library: library.to_string(),
      reason: format!("no mapped version recorded for C version {}", original),
    })?;

  if semver::compare(predecessor_mapped, mapped_version) == Ordering::Greater {
    return Err(
      PolicyError::RegressionFromPredecessor {
        library: library.to_string(),
        mapped_version: mapped_version.to_string(),
        predecessor: original.to_string(),
        predecessor_mapped: predecessor_mapped.to_string(),
      }
      .into(),
    );
  }

  tracing::debug!(library, predecessor = original, predecessor_mapped, "Follows closest predecessor");
  Ok(Acceptance::FollowsPredecessor)
}
