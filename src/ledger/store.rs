//! Version ledger store backed by `llpkgstore.json`
//!
//! The ledger is loaded fresh for every operation. Lookup tables are built
//! once at load time and rebuilt wholesale after each successful write; no
//! query ever mutates them.
//!
//! Writes replace the whole file. To avoid silently losing an append made by
//! another run in between, the ledger remembers a SHA-256 fingerprint of the
//! bytes it loaded and refuses to overwrite a file whose content has changed.
//! The fingerprint check and the replace happen under an exclusive lock on the
//! ledger file, and the new content is renamed into place so readers never see
//! a half-written ledger. A writer that was waiting on the lock sees the renamed
//! file when it re-checks and fails with `ConcurrentModification`.

use crate::core::error::{LedgerError, ResultExt, StoreResult};
use crate::ledger::model::{Metadata, MetadataMap, VersionMapping};
use crate::versions::semver;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default ledger file name, relative to the repository root
pub const DEFAULT_LEDGER_FILE: &str = "llpkgstore.json";

/// SHA-256 of the ledger bytes as last seen on disk
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint(String);

impl Fingerprint {
  fn of(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Self(format!("{:x}", hasher.finalize()))
  }
}

/// Lookup tables for one library
#[derive(Debug, Default)]
struct LibraryIndex {
  /// (raw C version, canonical form) in record order
  c_versions: Vec<(String, String)>,
  /// Raw C version -> mapped versions in release order
  go_by_c: HashMap<String, Vec<String>>,
  /// Mapped version -> first raw C version that released it
  c_by_go: HashMap<String, String>,
  /// Every mapped version in stored order, duplicates across C versions kept
  go_versions: Vec<String>,
}

impl LibraryIndex {
  fn build(metadata: &Metadata) -> Self {
    let mut index = Self::default();

    for mapping in &metadata.version_mappings {
      let raw = &mapping.c_version;
      if !index.go_by_c.contains_key(raw) {
        index.c_versions.push((raw.clone(), semver::to_semver(raw)));
      }
      index
        .go_by_c
        .entry(raw.clone())
        .or_default()
        .extend(mapping.go_versions.iter().cloned());

      for go in &mapping.go_versions {
        index.c_by_go.entry(go.clone()).or_insert_with(|| raw.clone());
        index.go_versions.push(go.clone());
      }
    }

    index
  }
}

/// The version mapping ledger for every library
#[derive(Debug)]
pub struct Ledger {
  path: PathBuf,
  metadata: MetadataMap,
  index: HashMap<String, LibraryIndex>,
  fingerprint: Fingerprint,
}

impl Ledger {
  /// Load the ledger from `path`, creating an empty file if it is absent
  pub fn load(path: &Path) -> StoreResult<Self> {
    let contents = match fs::read(path) {
      Ok(contents) => contents,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        fs::write(path, b"").with_context(|| format!("Failed to create ledger {}", path.display()))?;
        tracing::info!(path = %path.display(), "Created empty ledger");
        Vec::new()
      }
      Err(e) => return Err(e).with_context(|| format!("Failed to read ledger {}", path.display())),
    };

    let metadata = Self::parse(path, &contents)?;
    let mut ledger = Self {
      path: path.to_path_buf(),
      metadata,
      index: HashMap::new(),
      fingerprint: Fingerprint::of(&contents),
    };
    ledger.rebuild_index();

    tracing::debug!(
      path = %ledger.path.display(),
      libraries = ledger.metadata.len(),
      "Loaded ledger"
    );
    Ok(ledger)
  }

  /// Re-read the ledger file and rebuild every index
  pub fn reload(&mut self) -> StoreResult<()> {
    *self = Self::load(&self.path)?;
    Ok(())
  }

  fn parse(path: &Path, contents: &[u8]) -> StoreResult<MetadataMap> {
    if contents.iter().all(u8::is_ascii_whitespace) {
      return Ok(MetadataMap::new());
    }
    serde_json::from_slice(contents).map_err(|e| {
      LedgerError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
      }
      .into()
    })
  }

  fn rebuild_index(&mut self) {
    self.index = self
      .metadata
      .iter()
      .map(|(name, metadata)| (name.clone(), LibraryIndex::build(metadata)))
      .collect();
  }

  fn library(&self, library: &str) -> Option<&LibraryIndex> {
    self.index.get(library)
  }

  /// Path of the backing file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Library names in file order
  pub fn libraries(&self) -> impl Iterator<Item = &str> {
    self.metadata.keys().map(String::as_str)
  }

  /// Whether the library has ever been recorded
  pub fn contains(&self, library: &str) -> bool {
    self.metadata.contains_key(library)
  }

  /// Raw version mappings of a library in record order
  pub fn version_mappings(&self, library: &str) -> &[VersionMapping] {
    self
      .metadata
      .get(library)
      .map(|m| m.version_mappings.as_slice())
      .unwrap_or_default()
  }

  /// Every recorded C version of a library, canonicalized with [`semver::to_semver`]
  ///
  /// Versions that are not semver-shaped are returned as recorded.
  pub fn c_versions(&self, library: &str) -> Vec<String> {
    self
      .library(library)
      .map(|idx| idx.c_versions.iter().map(|(_, canonical)| canonical.clone()).collect())
      .unwrap_or_default()
  }

  /// Every mapped version of a library across all C versions, in stored order
  pub fn go_versions(&self, library: &str) -> &[String] {
    self
      .library(library)
      .map(|idx| idx.go_versions.as_slice())
      .unwrap_or_default()
  }

  /// Mapped versions released from one raw C version
  pub fn go_versions_for(&self, library: &str, c_version: &str) -> &[String] {
    self
      .library(library)
      .and_then(|idx| idx.go_by_c.get(c_version))
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Highest mapped version ever released for a library
  pub fn latest_go_version(&self, library: &str) -> Option<&str> {
    semver::max(self.go_versions(library).iter().map(String::as_str))
  }

  /// Highest mapped version released from exactly this raw C version
  pub fn latest_go_version_for(&self, library: &str, c_version: &str) -> Option<&str> {
    semver::max(self.go_versions_for(library, c_version).iter().map(String::as_str))
  }

  /// Raw C version with the highest semver precedence
  pub fn latest_c_version(&self, library: &str) -> Option<&str> {
    self
      .library(library)?
      .c_versions
      .iter()
      .max_by(|(a_raw, a), (b_raw, b)| semver::compare(a, b).then_with(|| a_raw.cmp(b_raw)))
      .map(|(raw, _)| raw.as_str())
  }

  /// Find the raw C version whose canonical form equals `canonical`
  ///
  /// Scans in record order and returns the first match. [`Ledger::write`]
  /// refuses to record a second raw version with the same canonical form, so
  /// more than one match only happens with hand-edited ledgers.
  pub fn search_by_semver(&self, library: &str, canonical: &str) -> Option<&str> {
    self
      .library(library)?
      .c_versions
      .iter()
      .find(|(_, c)| c == canonical)
      .map(|(raw, _)| raw.as_str())
  }

  /// Raw C version a mapped version was first released from
  pub fn c_version_for_go(&self, library: &str, go_version: &str) -> Option<&str> {
    self
      .library(library)?
      .c_by_go
      .get(go_version)
      .map(String::as_str)
  }

  /// Record `mapped_version` as released from `c_version` and persist the ledger
  ///
  /// Fails if the mapped version is not valid semver, was already released for
  /// any C version of the library, if a new C version collides with a recorded
  /// one after canonicalization, or if the file changed on disk since load.
  /// Nothing is modified when an error is returned.
  pub fn write(&mut self, library: &str, c_version: &str, mapped_version: &str) -> StoreResult<()> {
    if !semver::is_valid(mapped_version) {
      return Err(
        LedgerError::InvalidMappedVersion {
          version: mapped_version.to_string(),
        }
        .into(),
      );
    }

    if let Some(existing) = self.c_version_for_go(library, mapped_version) {
      return Err(
        LedgerError::DuplicateMappedVersion {
          library: library.to_string(),
          c_version: existing.to_string(),
          mapped_version: mapped_version.to_string(),
        }
        .into(),
      );
    }

    let is_new_c_version = !self
      .version_mappings(library)
      .iter()
      .any(|m| m.c_version == c_version);
    if is_new_c_version {
      let canonical = semver::to_semver(c_version);
      if let Some(existing) = self.search_by_semver(library, &canonical) {
        return Err(
          LedgerError::AmbiguousCVersion {
            library: library.to_string(),
            c_version: c_version.to_string(),
            existing: existing.to_string(),
          }
          .into(),
        );
      }
    }

    let mut updated = self.metadata.clone();
    let metadata = updated.entry(library.to_string()).or_default();
    let position = metadata
      .version_mappings
      .iter()
      .position(|m| m.c_version == c_version);
    let mapping = match position {
      Some(i) => &mut metadata.version_mappings[i],
      None => {
        metadata.version_mappings.push(VersionMapping::new(c_version));
        let last = metadata.version_mappings.len() - 1;
        &mut metadata.version_mappings[last]
      }
    };
    mapping.go_versions.push(mapped_version.to_string());

    let contents = serde_json::to_vec(&updated).context("Failed to serialize ledger")?;
    {
      let _lock = self.lock()?;
      self.ensure_unchanged_on_disk()?;
      self.replace(&contents)?;
    }

    self.metadata = updated;
    self.fingerprint = Fingerprint::of(&contents);
    self.rebuild_index();

    tracing::info!(library, c_version, mapped_version, "Recorded version mapping");
    Ok(())
  }

  /// Exclusive lock on the ledger file, held until the handle drops
  fn lock(&self) -> StoreResult<File> {
    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&self.path)
      .with_context(|| format!("Failed to open ledger {}", self.path.display()))?;
    file
      .lock()
      .with_context(|| format!("Failed to lock ledger {}", self.path.display()))?;
    Ok(file)
  }

  /// Write `contents` to a sibling temp file and rename it over the ledger
  fn replace(&self, contents: &[u8]) -> StoreResult<()> {
    let dir = match self.path.parent() {
      Some(dir) if !dir.as_os_str().is_empty() => dir,
      _ => Path::new("."),
    };
    let write_err = || format!("Failed to write ledger {}", self.path.display());

    let mut tmp = NamedTempFile::new_in(dir).with_context(write_err)?;
    tmp.write_all(contents).with_context(write_err)?;
    tmp.as_file().sync_all().with_context(write_err)?;
    let permissions = fs::metadata(&self.path).with_context(write_err)?.permissions();
    fs::set_permissions(tmp.path(), permissions).with_context(write_err)?;
    tmp.persist(&self.path).map_err(|e| e.error).with_context(write_err)?;
    Ok(())
  }

  fn ensure_unchanged_on_disk(&self) -> StoreResult<()> {
    let on_disk = match fs::read(&self.path) {
      Ok(contents) => contents,
      Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
      Err(e) => return Err(e).with_context(|| format!("Failed to read ledger {}", self.path.display())),
    };

    if Fingerprint::of(&on_disk) != self.fingerprint {
      return Err(
        LedgerError::ConcurrentModification {
          path: self.path.clone(),
        }
        .into(),
      );
    }
    Ok(())
  }
}

impl fmt::Display for Ledger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(&self.metadata).map_err(|_| fmt::Error)?;
    write!(f, "{}", json)
  }
}
