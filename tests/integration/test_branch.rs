//! Integration tests for `llpkgstore branch`

use crate::helpers::{CJSON_HISTORY, TestStore, run_llpkgstore, run_llpkgstore_failing};
use anyhow::Result;

#[test]
fn test_branch_prints_name() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;

  let output = run_llpkgstore(&store.path, &["branch", "branch:release-branch.cjson/v0.1.2"])?;

  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "release-branch.cjson/v0.1.2");
  Ok(())
}

#[test]
fn test_branch_rejects_unreleased_version() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;

  let (code, stderr) = run_llpkgstore_failing(&store.path, &["branch", "branch:release-branch.cjson/v9.0.0"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("never released"));
  Ok(())
}

#[test]
fn test_branch_rejects_malformed_label() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;

  let (code, _) = run_llpkgstore_failing(&store.path, &["branch", "release-branch.cjson/v0.1.2"])?;
  assert_eq!(code, 1);
  Ok(())
}

#[test]
fn test_branch_custom_prefixes() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.write_file(
    "llpkgstore.toml",
    "legacy_branch_prefix = \"maint/\"\nlabel_prefix = \"maintain:\"\n",
  )?;

  let output = run_llpkgstore(&store.path, &["branch", "maintain:maint/cjson/v0.2.0"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "maint/cjson/v0.2.0");
  Ok(())
}
