//! Integration tests for `llpkgstore record`

use crate::helpers::{TestStore, run_llpkgstore, run_llpkgstore_failing};
use anyhow::Result;

#[test]
fn test_record_appends_in_order() -> Result<()> {
  let store = TestStore::new()?;

  run_llpkgstore(&store.path, &["record", "cjson/v1.0.0", "--c-version", "1.7.18"])?;
  run_llpkgstore(&store.path, &["record", "cjson/v1.0.1", "--c-version", "1.7.18"])?;
  run_llpkgstore(&store.path, &["record", "cjson/v1.0.2", "--c-version", "1.7.19"])?;
  run_llpkgstore(&store.path, &["record", "libxml/v1.0.0", "--c-version", "1.45.1.4"])?;

  assert_eq!(
    store.read_file("llpkgstore.json")?,
    r#"{"cjson":{"versions":[{"c":"1.7.18","go":["v1.0.0","v1.0.1"]},{"c":"1.7.19","go":["v1.0.2"]}]},"libxml":{"versions":[{"c":"1.45.1.4","go":["v1.0.0"]}]}}"#
  );
  Ok(())
}

#[test]
fn test_record_twice_fails() -> Result<()> {
  let store = TestStore::new()?;

  run_llpkgstore(&store.path, &["record", "cjson/v1.0.0", "--c-version", "1.7.18"])?;
  let before = store.read_file("llpkgstore.json")?;

  let (code, stderr) = run_llpkgstore_failing(&store.path, &["record", "cjson/v1.0.0", "--c-version", "1.7.19"])?;

  assert_eq!(code, 2);
  assert!(stderr.contains("1.7.18"), "should name the original C version: {}", stderr);
  assert_eq!(store.read_file("llpkgstore.json")?, before);
  Ok(())
}

#[test]
fn test_record_from_package_dir() -> Result<()> {
  let store = TestStore::new()?;
  store.add_package("pkgs/zlib", "zlib", "1.3.1")?;

  run_llpkgstore(&store.path, &["record", "zlib/v0.1.0", "--package-dir", "pkgs/zlib"])?;

  assert_eq!(
    store.read_file("llpkgstore.json")?,
    r#"{"zlib":{"versions":[{"c":"1.3.1","go":["v0.1.0"]}]}}"#
  );
  Ok(())
}

#[test]
fn test_record_rejects_invalid_input() -> Result<()> {
  let store = TestStore::new()?;
  store.add_package("zlib", "zlib", "1.3.1")?;

  let (code, _) = run_llpkgstore_failing(&store.path, &["record", "zlib/1.0.0", "--c-version", "1.3.1"])?;
  assert_eq!(code, 1);

  let (code, _) = run_llpkgstore_failing(&store.path, &["record", "cjson/v1.0.0", "--package-dir", "zlib"])?;
  assert_eq!(code, 1);

  let (code, _) = run_llpkgstore_failing(&store.path, &["record", "zlib/v1.0.0"])?;
  assert_eq!(code, 1);
  Ok(())
}

#[test]
fn test_record_honors_ledger_settings() -> Result<()> {
  let store = TestStore::new()?;
  store.write_file("llpkgstore.toml", "ledger = \"data/ledger.json\"\n")?;
  store.write_file("data/.keep", "")?;

  run_llpkgstore(&store.path, &["record", "cjson/v1.0.0", "--c-version", "1.7.18"])?;
  assert!(store.file_exists("data/ledger.json"));
  assert!(!store.file_exists("llpkgstore.json"));

  run_llpkgstore(
    &store.path,
    &["--ledger", "explicit.json", "record", "cjson/v1.0.0", "--c-version", "1.7.18"],
  )?;
  assert!(store.file_exists("explicit.json"));
  Ok(())
}
