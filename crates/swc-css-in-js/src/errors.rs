use serde::{Deserialize, Serialize};
use swc_core::common::Span;

/// Closed taxonomy of recoverable failures. Every variant is scoped to a
/// single call site; the surrounding compilation keeps going.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
  /// An object-form style contained a value that cannot be statically
  /// classified (for example a function).
  #[error("unsupported style shape")]
  UnsupportedStyleShape,
  /// A dynamic expression appeared in a selector or at-rule prelude, or a
  /// declaration was structurally invalid.
  #[error("malformed declaration")]
  MalformedDeclaration,
  /// The styled call's tag or element target could not be statically
  /// determined.
  #[error("unresolved style target")]
  UnresolvedStyleTarget,
  /// The style body violated the CSS grammar subset understood here.
  #[error("parse error")]
  ParseError,
}

/// A diagnostic surfaced to the host. The offending call site is always left
/// as the original, untransformed source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformError {
  pub kind: ErrorKind,
  pub message: String,
  #[serde(skip)]
  pub span: Option<Span>,
}

impl TransformError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      span: None,
    }
  }

  pub fn with_span(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
    Self {
      kind,
      message: message.into(),
      span: Some(span),
    }
  }

  /// Attach a span if the error does not already carry one. Used by callers
  /// that know the call site but not the exact offending range.
  pub fn at(mut self, span: Span) -> Self {
    if self.span.is_none() {
      self.span = Some(span);
    }
    self
  }
}

impl std::fmt::Display for TransformError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.kind, self.message)
  }
}
