//! Per-pass rule cache. Identical style bodies across call sites in one file
//! serialize once and share their extracted rules; the cache lives for a
//! single `transform` call and is never shared between files or passes.

use indexmap::IndexMap;
use tracing::trace;

/// Maps call-site fingerprints to their serialized rule strings, preserving
/// first-seen order for the extracted stylesheet.
#[derive(Debug, Default)]
pub struct StylesheetCache {
  entries: IndexMap<String, Vec<String>>,
}

impl StylesheetCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the rules for `fingerprint`, serializing them on first sight.
  /// The boolean is true when this call inserted the entry, so the caller
  /// appends to the extracted stylesheet exactly once per distinct body.
  pub fn lookup_or_insert(
    &mut self,
    fingerprint: &str,
    serialize: impl FnOnce() -> Vec<String>,
  ) -> (&[String], bool) {
    if self.entries.contains_key(fingerprint) {
      trace!(fingerprint, "stylesheet cache hit");
      // Index lookup rather than entry(): serialize must not run on a hit.
      return (&self.entries[fingerprint], false);
    }
    trace!(fingerprint, "stylesheet cache miss");
    let rules = serialize();
    let entry = self.entries.entry(fingerprint.to_string()).or_insert(rules);
    (entry, true)
  }

  /// All cached rules in first-seen order.
  pub fn all_rules(&self) -> Vec<String> {
    self.entries.values().flatten().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
