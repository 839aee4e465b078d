//! Integration tests for `llpkgstore verify`

use crate::helpers::{CJSON_HISTORY, TestStore, run_llpkgstore, run_llpkgstore_failing};
use anyhow::Result;

#[test]
fn test_newest_version_accepted_on_main() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.add_package("cjson", "cjson", "1.9.1")?;

  let output = run_llpkgstore(&store.path, &["verify", "cjson", "--mapped", "cjson/v0.3.0"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("accepted"), "unexpected output: {}", stdout);
  assert!(stdout.contains("v0.3.0"));
  Ok(())
}

#[test]
fn test_regression_from_latest_rejected() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.add_package("cjson", "cjson", "1.9.1")?;

  let (code, stderr) = run_llpkgstore_failing(&store.path, &["verify", "cjson", "--mapped", "v0.0.1"])?;

  assert_eq!(code, 3);
  assert!(stderr.contains("v0.2.1"), "stderr should name the latest release: {}", stderr);
  Ok(())
}

#[test]
fn test_older_version_rejected_on_main() -> Result<()> {
  let store = TestStore::with_ledger(
    r#"{"cjson":{"versions":[{"c":"1.8.18","go":["v0.2.0","v0.2.1"]},{"c":"1.7.18","go":["v0.1.2","v0.1.3"]},{"c":"1.7.16","go":["v0.1.0"]}]}}"#,
  )?;
  store.add_package("cjson", "cjson", "1.7.19")?;

  let (code, _) = run_llpkgstore_failing(&store.path, &["verify", "cjson", "--mapped", "v0.1.1"])?;
  assert_eq!(code, 3);

  let (code, _) = run_llpkgstore_failing(
    &store.path,
    &["verify", "cjson", "--mapped", "v0.1.4", "--base", "main"],
  )?;
  assert_eq!(code, 3);
  Ok(())
}

#[test]
fn test_maintenance_branch_accepts_follow_up() -> Result<()> {
  let store = TestStore::with_ledger(
    r#"{"cjson":{"versions":[{"c":"1.8.18","go":["v0.2.0","v0.2.1"]},{"c":"1.7.18","go":["v0.1.0","v0.1.1"]},{"c":"1.7.16","go":["v1.1.0"]}]}}"#,
  )?;
  store.add_package("cjson", "cjson", "1.7.19")?;

  let output = run_llpkgstore(
    &store.path,
    &[
      "verify",
      "cjson",
      "--mapped",
      "cjson/v0.1.2",
      "--base",
      "release-branch.cjson/v0.1.1",
      "--json",
    ],
  )?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["library"], "cjson");
  assert_eq!(report["target"], "legacy");
  assert_eq!(report["acceptance"], "follows_predecessor");
  Ok(())
}

#[test]
fn test_mapped_version_from_release_as() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.add_package("cjson", "cjson", "1.9.1")?;

  let output = run_llpkgstore(
    &store.path,
    &[
      "verify",
      "cjson",
      "--message",
      "chore: update headers",
      "--message",
      "feat: cjson 1.9.1\n\nRelease-as: cjson/v0.3.0",
      "--json",
    ],
  )?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["mapped_version"], "v0.3.0");
  assert_eq!(report["acceptance"], "newest");
  Ok(())
}

#[test]
fn test_missing_release_as_is_user_error() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.add_package("cjson", "cjson", "1.9.1")?;

  let (code, stderr) = run_llpkgstore_failing(&store.path, &["verify", "cjson", "--message", "Release-as: zlib/v1.0.0"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("Release-as"));
  Ok(())
}

#[test]
fn test_first_release_creates_ledger() -> Result<()> {
  let store = TestStore::new()?;
  store.add_package("zlib", "zlib", "1.3.1")?;

  let output = run_llpkgstore(&store.path, &["verify", "zlib", "--mapped", "v1.0.0", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["acceptance"], "first_release");
  assert!(store.file_exists("llpkgstore.json"));
  Ok(())
}

#[test]
fn test_package_dir_needs_generator_config() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.write_file(
    "cjson/llpkg.cfg",
    r#"{"upstream":{"package":{"name":"cjson","version":"1.9.1"}}}"#,
  )?;

  let (code, stderr) = run_llpkgstore_failing(&store.path, &["verify", "cjson", "--mapped", "v0.3.0"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("llcppg.cfg"));
  Ok(())
}

#[test]
fn test_duplicate_mapped_version_rejected() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.add_package("cjson", "cjson", "1.9.1")?;

  let (code, _) = run_llpkgstore_failing(&store.path, &["verify", "cjson", "--mapped", "v0.2.1"])?;
  assert_eq!(code, 3);
  Ok(())
}

#[test]
fn test_unknown_base_branch_rejected() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;
  store.add_package("cjson", "cjson", "1.9.1")?;

  let (code, stderr) = run_llpkgstore_failing(
    &store.path,
    &["verify", "cjson", "--mapped", "v0.3.0", "--base", "develop"],
  )?;
  assert_eq!(code, 1);
  assert!(stderr.contains("Unknown base branch: develop"), "{}", stderr);

  store.write_file("llpkgstore.toml", "main_branch = \"develop\"\n")?;
  run_llpkgstore(&store.path, &["verify", "cjson", "--mapped", "v0.3.0", "--base", "develop"])?;
  Ok(())
}
