//! Semantic version helpers for upstream and mapped versions
//!
//! Upstream C libraries are free to use any version string they like. These
//! helpers canonicalize the ones that look like semantic versions into the
//! `vMAJOR.MINOR.PATCH[-PRERELEASE]` form so they can be ordered, and leave
//! everything else untouched so callers can tell the two apart.
//!
//! Canonicalization accepts the shorthand forms `v1` and `v1.2` (missing
//! components become zero) and drops build metadata, which never takes part
//! in precedence.
//!
//! Numeric components must fit in a `u64`, the width `semver::Version` uses.
//! A version with a larger component is treated as not semver at all, so the
//! release policy skips ordering checks for it.

use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;

/// Prepend the `v` prefix if it is missing
fn with_prefix(version: &str) -> String {
  if version.starts_with('v') {
    version.to_string()
  } else {
    format!("v{}", version)
  }
}

/// Parse a numeric component: ASCII digits, no leading zeros, at most `u64::MAX`
fn parse_number(s: &str) -> Option<u64> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  if s.len() > 1 && s.starts_with('0') {
    return None;
  }
  s.parse().ok()
}

/// Build metadata identifiers: non-empty, `[0-9A-Za-z-]`
fn is_valid_build(build: &str) -> bool {
  build
    .split('.')
    .all(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'))
}

/// Parse a `v`-prefixed version into its precedence-relevant parts
///
/// Returns `None` for anything that is not semver-shaped. Build metadata is
/// validated and then discarded.
pub fn parse(version: &str) -> Option<Version> {
  let rest = version.strip_prefix('v')?;

  let (rest, build) = match rest.split_once('+') {
    Some((rest, build)) => (rest, Some(build)),
    None => (rest, None),
  };
  if let Some(build) = build
    && !is_valid_build(build)
  {
    return None;
  }

  let (core, pre) = match rest.split_once('-') {
    Some((core, pre)) => (core, Some(pre)),
    None => (rest, None),
  };

  let parts: Vec<&str> = core.split('.').collect();
  let (major, minor, patch) = match parts.as_slice() {
    [major] => (parse_number(major)?, 0, 0),
    [major, minor] => (parse_number(major)?, parse_number(minor)?, 0),
    [major, minor, patch] => (parse_number(major)?, parse_number(minor)?, parse_number(patch)?),
    _ => return None,
  };

  // Shorthand forms cannot carry prerelease or build tags
  if parts.len() < 3 && (pre.is_some() || build.is_some()) {
    return None;
  }

  let pre = match pre {
    Some(pre) if !pre.is_empty() => Prerelease::new(pre).ok()?,
    Some(_) => return None,
    None => Prerelease::EMPTY,
  };

  Some(Version {
    major,
    minor,
    patch,
    pre,
    build: BuildMetadata::EMPTY,
  })
}

/// Canonical `v`-prefixed form, or `None` if the input is not a valid semver
pub fn canonical(version: &str) -> Option<String> {
  parse(version).map(|v| format!("v{}", v))
}

/// Convert an arbitrary version string to canonical semver form
///
/// A missing `v` prefix is added first. When the result still is not a valid
/// semantic version the original string is returned unchanged, so callers
/// must check [`is_valid`] on the output before relying on ordering.
pub fn to_semver(version: &str) -> String {
  canonical(&with_prefix(version)).unwrap_or_else(|| version.to_string())
}

/// Check that a `v`-prefixed string is a valid semantic version
pub fn is_valid(version: &str) -> bool {
  parse(version).is_some()
}

/// Check that every version is a valid semantic version once prefixed
pub fn all_valid<S: AsRef<str>>(versions: &[S]) -> bool {
  versions.iter().all(|v| is_valid(&with_prefix(v.as_ref())))
}

/// Compare two versions by semver precedence
///
/// Invalid versions sort below every valid version and compare equal to each
/// other.
pub fn compare(a: &str, b: &str) -> Ordering {
  match (parse(a), parse(b)) {
    (Some(a), Some(b)) => a.cmp(&b),
    (Some(_), None) => Ordering::Greater,
    (None, Some(_)) => Ordering::Less,
    (None, None) => Ordering::Equal,
  }
}

/// Descending order with a strict total order
///
/// Versions of equal precedence (e.g. `v1.0.0` and `v1.0.0+build`) fall back
/// to reverse lexicographic order of the raw strings.
pub fn compare_descending(a: &str, b: &str) -> Ordering {
  compare(b, a).then_with(|| b.cmp(a))
}

/// Sort versions newest first
pub fn sort_descending(versions: &mut [String]) {
  versions.sort_by(|a, b| compare_descending(a, b));
}

/// The semver-maximal version, if any
pub fn max<'a, I>(versions: I) -> Option<&'a str>
where
  I: IntoIterator<Item = &'a str>,
{
  versions.into_iter().max_by(|a, b| compare(a, b).then_with(|| a.cmp(b)))
}

/// Major and minor components of a valid version
pub fn major_minor(version: &str) -> Option<(u64, u64)> {
  parse(version).map(|v| (v.major, v.minor))
}
