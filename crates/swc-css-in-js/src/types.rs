use serde::{Deserialize, Serialize};
use swc_core::ecma::ast::{Ident, ObjectLit, Program, Tpl};

use crate::constants::DEFAULT_IMPORT_SOURCES;
use crate::interpolations::InterpolationEntry;

/// Options recognized by the transform, mirroring the Babel plugin options
/// shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginOptions {
  /// Source-level identifier forwarded verbatim onto the style-registration
  /// call (`nonce={...}`). Has no effect on class names or hashes.
  pub nonce: Option<String>,
  /// Apply the minification rule set during serialization.
  pub minify: Option<bool>,
  /// Insert a default React import when the module lacks one. Defaults to
  /// `true`; set to `false` with the automatic JSX runtime.
  pub import_react: Option<bool>,
  /// Module origins that trigger the transform, replacing the default list.
  pub import_sources: Option<Vec<String>>,
  /// Accepted for host compatibility; extraction itself is delegated to the
  /// host, which reads the rules from [`TransformMetadata`].
  pub extract_styles_to_separate_file: Option<bool>,
}

impl PluginOptions {
  pub fn minify_enabled(&self) -> bool {
    self.minify.unwrap_or(false)
  }

  pub fn import_react_enabled(&self) -> bool {
    self.import_react.unwrap_or(true)
  }

  pub fn import_sources(&self) -> Vec<String> {
    match &self.import_sources {
      Some(sources) if !sources.is_empty() => sources.clone(),
      _ => DEFAULT_IMPORT_SOURCES
        .iter()
        .map(|source| source.to_string())
        .collect(),
    }
  }
}

/// Build artifacts surfaced to the host alongside the rewritten program.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformMetadata {
  /// Every rule emitted by this pass, in emission order, deduplicated by
  /// fingerprint. Hosts extracting styles to a separate file read these.
  pub style_rules: Vec<String>,
}

/// Result of one `transform` run.
#[derive(Clone, Debug)]
pub struct TransformOutput {
  pub program: Program,
  pub metadata: TransformMetadata,
  /// Per-call-site diagnostics. Offending sites are left untransformed.
  pub errors: Vec<crate::errors::TransformError>,
}

/// The styling declaration attached to a call site, before normalization.
#[derive(Clone, Debug)]
pub enum StyleBody {
  /// Tagged template form: `` styled.div`...` `` or `` css`...` ``.
  Template(Tpl),
  /// Object form: `styled.div({...})` or `css={{...}}`.
  Object(ObjectLit),
  /// Plain string form: `css="font-size: 12px"`.
  Text(String),
}

/// Statically resolved target of a styled call.
#[derive(Clone, Debug)]
pub enum StyledTarget {
  /// An intrinsic element: `styled.div` or `styled('div')`.
  Tag(String),
  /// A user component referenced by name: `styled(Base)`.
  Component(Ident),
}

/// Everything the markup synthesizer needs for one call site. Produced once
/// per site, consumed exactly once.
#[derive(Clone, Debug)]
pub struct CallSiteTransformResult {
  pub class_name: String,
  pub fingerprint: String,
  pub rule_strings: Vec<String>,
  pub interpolations: Vec<InterpolationEntry>,
  pub nonce: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn options_deserialize_from_camel_case() {
    let options: PluginOptions = serde_json::from_str(
      r#"{ "nonce": "__webpack_nonce__", "minify": true, "importReact": false }"#,
    )
    .expect("options should deserialize");
    assert_eq!(options.nonce.as_deref(), Some("__webpack_nonce__"));
    assert!(options.minify_enabled());
    assert!(!options.import_react_enabled());
  }

  #[test]
  fn default_import_sources_apply_when_unset() {
    let options = PluginOptions::default();
    assert_eq!(options.import_sources(), vec!["@compiled/css-in-js"]);
  }

  #[test]
  fn explicit_import_sources_replace_the_default() {
    let options = PluginOptions {
      import_sources: Some(vec!["@acme/styles".into()]),
      ..Default::default()
    };
    assert_eq!(options.import_sources(), vec!["@acme/styles"]);
  }
}
