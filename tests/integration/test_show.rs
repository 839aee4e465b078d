//! Integration tests for `llpkgstore show`

use crate::helpers::{CJSON_HISTORY, TestStore, run_llpkgstore, run_llpkgstore_failing};
use anyhow::Result;

#[test]
fn test_show_text() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;

  let output = run_llpkgstore(&store.path, &["show", "cjson"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("1.8.18 -> v0.2.0, v0.2.1"));
  assert!(stdout.contains("latest: v0.2.1"));
  Ok(())
}

#[test]
fn test_show_json() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;

  let output = run_llpkgstore(&store.path, &["show", "cjson", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["latest_c_version"], "1.8.18");
  assert_eq!(report["latest_go_version"], "v0.2.1");
  assert_eq!(report["versions"][2]["c"], "1.7.16");
  assert_eq!(report["versions"][2]["go"][0], "v0.1.0");
  Ok(())
}

#[test]
fn test_show_unknown_library() -> Result<()> {
  let store = TestStore::with_ledger(CJSON_HISTORY)?;

  let (code, stderr) = run_llpkgstore_failing(&store.path, &["show", "zlib"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("Known libraries: cjson"));
  Ok(())
}

#[test]
fn test_show_malformed_ledger() -> Result<()> {
  let store = TestStore::with_ledger("{ not json")?;

  let (code, _) = run_llpkgstore_failing(&store.path, &["show", "cjson"])?;
  assert_eq!(code, 2);
  Ok(())
}
