//! Per-invocation store context
//!
//! Built once in main.rs from the working directory and global flags, then
//! passed by reference to every command. The ledger itself is loaded by each
//! command so that it always reflects the file as it is right now.

use crate::core::config::StoreConfig;
use crate::core::error::{ResultExt, StoreResult};
use crate::ledger::Ledger;
use crate::release::BranchTarget;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StoreContext {
  /// Repository settings, defaults when no llpkgstore.toml exists
  pub config: StoreConfig,

  /// Resolved ledger location
  pub ledger_path: PathBuf,
}

impl StoreContext {
  /// `ledger_override` comes from `--ledger` and wins over the config file
  pub fn build(root: &Path, ledger_override: Option<&Path>) -> StoreResult<Self> {
    let config = StoreConfig::load(root)?;
    let ledger_path = match ledger_override {
      Some(path) => path.to_path_buf(),
      None => config.ledger_path(root),
    };

    Ok(Self {
      config,
      ledger_path,
    })
  }

  pub fn load_ledger(&self) -> StoreResult<Ledger> {
    Ledger::load(&self.ledger_path).with_context(|| format!("Failed to open ledger {}", self.ledger_path.display()))
  }

  /// Main when no base ref is given, otherwise the configured main branch or a maintenance branch
  pub fn branch_target(&self, base_ref: Option<&str>) -> StoreResult<BranchTarget> {
    match base_ref {
      Some(base) => BranchTarget::resolve(base, &self.config.main_branch, &self.config.legacy_branch_prefix),
      None => Ok(BranchTarget::Main),
    }
  }
}
