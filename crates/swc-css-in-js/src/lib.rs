//! Compile-time CSS-in-JS transform for SWC.
//!
//! Styling declarations (`` styled.div`...` ``, the JSX `css` prop, and the
//! `ClassNames` render prop) are compiled away: their CSS is extracted into
//! hashed, scoped rule strings and the call sites are replaced with plain
//! components that reference the generated class names. The extracted rules
//! are surfaced through [`TransformMetadata`] so hosts can write them to a
//! stylesheet instead of shipping a CSS runtime.

pub mod builders;
pub mod cache;
pub mod class_names;
pub mod constants;
pub mod css_prop;
pub mod errors;
pub mod fingerprint;
pub mod imports;
pub mod interpolations;
pub mod minify;
pub mod parser;
pub mod serializer;
pub mod styled;
pub mod tokens;
pub mod transform;
pub mod types;

use swc_core::ecma::visit::VisitMutWith;

pub use errors::{ErrorKind, TransformError};
pub use transform::CssInJsTransform;
pub use types::{PluginOptions, TransformMetadata, TransformOutput};

/// Run the transform over a parsed program.
///
/// Call sites that cannot be compiled are reported in
/// [`TransformOutput::errors`] and left untouched; the rest of the module is
/// still transformed.
pub fn transform(
  program: swc_core::ecma::ast::Program,
  options: PluginOptions,
) -> TransformOutput {
  run(program, CssInJsTransform::new(options))
}

/// Like [`transform`], with a comments store attached so synthesized
/// component calls carry `#__PURE__` annotations. The caller must be running
/// inside `GLOBALS`.
pub fn transform_with_comments(
  program: swc_core::ecma::ast::Program,
  options: PluginOptions,
  comments: &dyn swc_core::common::comments::Comments,
) -> TransformOutput {
  run(program, CssInJsTransform::with_comments(options, comments))
}

fn run(
  mut program: swc_core::ecma::ast::Program,
  mut pass: CssInJsTransform<'_>,
) -> TransformOutput {
  program.visit_mut_with(&mut pass);
  let style_rules = pass.style_rules();
  let errors = pass.take_errors();
  TransformOutput {
    program,
    metadata: TransformMetadata { style_rules },
    errors,
  }
}

/// Cheap pre-parse check: does the source text mention a recognized styling
/// import source at all? Hosts use this to skip parsing unrelated files.
pub fn should_transform(code: &str, options: &PluginOptions) -> bool {
  options
    .import_sources()
    .iter()
    .any(|source| code.contains(source.as_str()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn should_transform_matches_default_source() {
    let options = PluginOptions::default();
    assert!(should_transform(
      "import { styled } from '@compiled/css-in-js';",
      &options
    ));
    assert!(!should_transform(
      "import styled from 'styled-components';",
      &options
    ));
  }

  #[test]
  fn should_transform_honors_custom_sources() {
    let options = PluginOptions {
      import_sources: Some(vec!["@acme/styles".into()]),
      ..Default::default()
    };
    assert!(should_transform("import '@acme/styles';", &options));
    assert!(!should_transform(
      "import { styled } from '@compiled/css-in-js';",
      &options
    ));
  }
}
