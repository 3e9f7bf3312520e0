//! Import bookkeeping: recognizing styling imports (including renames),
//! rewriting them to the runtime components, and inserting the React default
//! import when the synthesized markup needs it.

use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  Ident, ImportDecl, ImportDefaultSpecifier, ImportNamedSpecifier, ImportSpecifier, Module,
  ModuleDecl, ModuleExportName, ModuleItem, Str,
};

use crate::constants::{
  CLASS_NAMES_IMPORT_NAME, STYLED_IMPORT_NAME, STYLE_BOUNDARY_COMPONENT, STYLE_SHEET_COMPONENT,
};

/// What the module imports from recognized styling sources.
#[derive(Debug, Default)]
pub struct ImportAnalysis {
  /// Local binding of `styled`, if imported (honors `as` renames).
  pub styled_local: Option<String>,
  /// Local binding of `ClassNames`, if imported.
  pub class_names_local: Option<String>,
  /// The module already has a React default import.
  pub has_react_default: bool,
  /// Index of the first recognized import declaration in the module body.
  pub first_styling_import: Option<usize>,
}

impl ImportAnalysis {
  pub fn is_styling_module(&self) -> bool {
    self.first_styling_import.is_some()
  }
}

/// Scan the module's imports. `sources` is the recognized origin list.
pub fn analyze_imports(module: &Module, sources: &[String]) -> ImportAnalysis {
  let mut analysis = ImportAnalysis::default();
  for (index, item) in module.body.iter().enumerate() {
    let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
      continue;
    };

    if import.src.value == *"react" {
      analysis.has_react_default |= import
        .specifiers
        .iter()
        .any(|specifier| matches!(specifier, ImportSpecifier::Default(_)));
      continue;
    }

    if !sources.iter().any(|source| import.src.value == **source) {
      continue;
    }
    if analysis.first_styling_import.is_none() {
      analysis.first_styling_import = Some(index);
    }

    for specifier in &import.specifiers {
      let ImportSpecifier::Named(named) = specifier else {
        continue;
      };
      let imported_name = match &named.imported {
        Some(ModuleExportName::Ident(imported)) => imported.sym.to_string(),
        Some(ModuleExportName::Str(imported)) => imported.value.to_string(),
        None => named.local.sym.to_string(),
      };
      let local = named.local.sym.to_string();
      match imported_name.as_str() {
        STYLED_IMPORT_NAME => analysis.styled_local = Some(local),
        CLASS_NAMES_IMPORT_NAME => analysis.class_names_local = Some(local),
        _ => {}
      }
    }
  }
  analysis
}

/// Rewrite the first recognized styling import to pull in the runtime
/// components instead of the compile-time API, and drop any further
/// recognized imports' styling specifiers.
pub fn rewrite_styling_imports(module: &mut Module, sources: &[String]) {
  let mut rewritten = false;
  module.body.retain_mut(|item| {
    let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
      return true;
    };
    if !sources.iter().any(|source| import.src.value == **source) {
      return true;
    }
    if rewritten {
      return false;
    }
    rewritten = true;
    import.specifiers = vec![
      named_specifier(STYLE_BOUNDARY_COMPONENT),
      named_specifier(STYLE_SHEET_COMPONENT),
    ];
    true
  });
}

/// Prepend `import React from "react"` when absent.
pub fn ensure_react_import(module: &mut Module) {
  module.body.insert(
    0,
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
      span: DUMMY_SP,
      specifiers: vec![ImportSpecifier::Default(ImportDefaultSpecifier {
        span: DUMMY_SP,
        local: Ident::new("React".into(), DUMMY_SP, SyntaxContext::empty()),
      })],
      src: Box::new(Str {
        span: DUMMY_SP,
        value: "react".into(),
        raw: None,
      }),
      type_only: false,
      with: None,
      phase: Default::default(),
    })),
  );
}

fn named_specifier(name: &str) -> ImportSpecifier {
  ImportSpecifier::Named(ImportNamedSpecifier {
    span: DUMMY_SP,
    local: Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty()),
    imported: None,
    is_type_only: false,
  })
}

#[cfg(test)]
mod tests {
  use swc_core::common::sync::Lrc;
  use swc_core::common::{FileName, SourceMap};
  use swc_core::ecma::ast::EsVersion;
  use swc_core::ecma::parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax};

  use super::*;

  fn parse_module(code: &str) -> Module {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), code.to_string());
    let lexer = Lexer::new(
      Syntax::Es(EsSyntax {
        jsx: true,
        ..Default::default()
      }),
      EsVersion::Es2022,
      StringInput::from(&*fm),
      None,
    );
    Parser::new_from(lexer)
      .parse_module()
      .expect("test module should parse")
  }

  fn default_sources() -> Vec<String> {
    vec!["@compiled/css-in-js".to_string()]
  }

  #[test]
  fn finds_styled_and_class_names_locals() {
    let module = parse_module(
      "import { styled, ClassNames } from '@compiled/css-in-js';\nimport React from 'react';",
    );
    let analysis = analyze_imports(&module, &default_sources());
    assert_eq!(analysis.styled_local.as_deref(), Some("styled"));
    assert_eq!(analysis.class_names_local.as_deref(), Some("ClassNames"));
    assert!(analysis.has_react_default);
    assert!(analysis.is_styling_module());
  }

  #[test]
  fn honors_renamed_specifiers() {
    let module = parse_module("import { styled as s } from '@compiled/css-in-js';");
    let analysis = analyze_imports(&module, &default_sources());
    assert_eq!(analysis.styled_local.as_deref(), Some("s"));
  }

  #[test]
  fn unrelated_modules_are_not_styling_modules() {
    let module = parse_module("import { styled } from 'other-library';");
    let analysis = analyze_imports(&module, &default_sources());
    assert!(!analysis.is_styling_module());
    assert!(analysis.styled_local.is_none());
  }

  #[test]
  fn custom_sources_replace_the_default() {
    let module = parse_module("import { styled } from '@acme/styles';");
    let sources = vec!["@acme/styles".to_string()];
    assert!(analyze_imports(&module, &sources).is_styling_module());
  }

  #[test]
  fn rewrite_swaps_specifiers_for_runtime_components() {
    let mut module = parse_module("import { styled, css } from '@compiled/css-in-js';");
    rewrite_styling_imports(&mut module, &default_sources());
    let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &module.body[0] else {
      panic!("expected an import");
    };
    let locals: Vec<String> = import
      .specifiers
      .iter()
      .filter_map(|specifier| match specifier {
        ImportSpecifier::Named(named) => Some(named.local.sym.to_string()),
        _ => None,
      })
      .collect();
    assert_eq!(locals, vec!["CC".to_string(), "CS".to_string()]);
  }

  #[test]
  fn duplicate_styling_imports_collapse_into_one() {
    let mut module = parse_module(
      "import { styled } from '@compiled/css-in-js';\nimport { ClassNames } from '@compiled/css-in-js';",
    );
    rewrite_styling_imports(&mut module, &default_sources());
    let import_count = module
      .body
      .iter()
      .filter(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
      .count();
    assert_eq!(import_count, 1);
  }

  #[test]
  fn react_import_is_prepended() {
    let mut module = parse_module("const x = 1;");
    ensure_react_import(&mut module);
    assert!(matches!(
      &module.body[0],
      ModuleItem::ModuleDecl(ModuleDecl::Import(import)) if import.src.value == *"react"
    ));
  }
}
