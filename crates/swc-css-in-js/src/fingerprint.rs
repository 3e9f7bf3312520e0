//! Stable call-site fingerprints. The fingerprint hashes the normalized token
//! text, so formatting-only edits to the source produce the same class name
//! while any semantic change produces a new one.

use crate::constants::CLASS_NAME_PREFIX;
use crate::tokens::StyleToken;

/// Compute the fingerprint for a normalized token sequence.
pub fn fingerprint(tokens: &[StyleToken]) -> String {
  let mut canonical = String::new();
  for token in tokens {
    match token {
      StyleToken::Static(text) => push_collapsed(&mut canonical, text),
      StyleToken::Dynamic { index, .. } => {
        canonical.push_str(&format!("\u{0}{index}\u{0}"));
      }
    }
  }
  css_in_js_hash::hash(canonical.trim(), 0)
}

/// The scoping class for a fingerprint.
pub fn class_name(fingerprint: &str) -> String {
  format!("{CLASS_NAME_PREFIX}{fingerprint}")
}

fn push_collapsed(out: &mut String, text: &str) {
  let mut pending_space = false;
  for ch in text.chars() {
    if ch.is_whitespace() {
      pending_space = true;
    } else {
      if pending_space && !out.is_empty() {
        out.push(' ');
      }
      pending_space = false;
      out.push(ch);
    }
  }
  if pending_space && !out.is_empty() {
    out.push(' ');
  }
}
