//! Main line vs maintenance branches
//!
//! Maintenance branches are named `release-branch.<clib>/<mapped version>` and
//! are requested with a `branch:` label carrying that name.

use crate::core::error::{DirectiveError, StoreResult};
use crate::ledger::Ledger;
use crate::release::directive::MappedVersion;
use crate::versions::semver;
use serde::Serialize;

/// Which line of development a submission targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchTarget {
  Main,
  Legacy,
}

fn branch_name(base_ref: &str) -> &str {
  let name = base_ref.trim();
  name.strip_prefix("refs/heads/").unwrap_or(name)
}

impl BranchTarget {
  /// Classify a pull request base ref (`main`, `refs/heads/release-branch.cjson/v1.0.0`, ...)
  pub fn from_base_ref(base_ref: &str, legacy_prefix: &str) -> Self {
    if branch_name(base_ref).starts_with(legacy_prefix) {
      BranchTarget::Legacy
    } else {
      BranchTarget::Main
    }
  }

  /// Classify a base ref that must be either the main branch or a maintenance branch
  pub fn resolve(base_ref: &str, main_branch: &str, legacy_prefix: &str) -> StoreResult<Self> {
    match Self::from_base_ref(base_ref, legacy_prefix) {
      BranchTarget::Main if branch_name(base_ref) != main_branch => Err(
        DirectiveError::UnknownBaseBranch {
          base_ref: base_ref.to_string(),
          main_branch: main_branch.to_string(),
          legacy_prefix: legacy_prefix.to_string(),
        }
        .into(),
      ),
      target => Ok(target),
    }
  }

  pub fn is_legacy(self) -> bool {
    self == BranchTarget::Legacy
  }
}

/// A maintenance branch requested through a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceBranch {
  /// Full branch name, e.g. `release-branch.cjson/v1.0.0`
  pub name: String,
  /// The release the branch is cut from
  pub release: MappedVersion,
}

impl MaintenanceBranch {
  /// Parse `branch:release-branch.<clib>/<mapped>`
  pub fn from_label(label: &str, label_prefix: &str, branch_prefix: &str) -> StoreResult<Self> {
    let invalid = || DirectiveError::InvalidLabel {
      label: label.to_string(),
    };

    let name = label.trim().strip_prefix(label_prefix).ok_or_else(invalid)?;
    let version = name.strip_prefix(branch_prefix).ok_or_else(invalid)?;
    let release = MappedVersion::parse(version)?;

    Ok(Self {
      name: name.to_string(),
      release,
    })
  }

  /// Check the ledger allows maintaining this release line
  ///
  /// The library must have recorded releases, all of its C versions must be
  /// semver (maintenance relies on ordering them), and the release the branch
  /// starts from must exist.
  pub fn ensure_maintainable(&self, ledger: &Ledger) -> StoreResult<()> {
    let library = &self.release.library;
    let not_maintainable = |reason: &str| DirectiveError::NotMaintainable {
      library: library.clone(),
      reason: reason.to_string(),
    };

    let c_versions = ledger.c_versions(library);
    if c_versions.is_empty() {
      return Err(not_maintainable("no releases recorded").into());
    }
    if !semver::all_valid(&c_versions) {
      return Err(not_maintainable("C versions don't follow semver").into());
    }
    if ledger.c_version_for_go(library, &self.release.version).is_none() {
      return Err(not_maintainable(&format!("{} was never released", self.release.version)).into());
    }

    Ok(())
  }
}
