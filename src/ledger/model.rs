//! On-disk shape of `llpkgstore.json`
//!
//! ```json
//! {
//!   "cjson": {
//!     "versions": [
//!       { "c": "1.7.18", "go": ["v1.0.0", "v1.0.1"] }
//!     ]
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Every library in the ledger, keyed by name, in file order
pub type MetadataMap = IndexMap<String, Metadata>;

/// All version mappings recorded for one library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
  /// Insertion order is write order, not version order
  #[serde(rename = "versions", default)]
  pub version_mappings: Vec<VersionMapping>,
}

/// One upstream version and the mapped versions released from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMapping {
  /// Raw upstream version, not necessarily semver
  #[serde(rename = "c")]
  pub c_version: String,

  /// Mapped versions in release order
  #[serde(rename = "go", default)]
  pub go_versions: Vec<String>,
}

impl VersionMapping {
  pub fn new(c_version: impl Into<String>) -> Self {
    Self {
      c_version: c_version.into(),
      go_versions: Vec::new(),
    }
  }
}
