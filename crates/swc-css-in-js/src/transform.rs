//! The transform pass. One visitor walks the module, rewrites every styled,
//! css-prop, and ClassNames call site through the shared style pipeline, and
//! finishes with the import rewrite and displayName guards.

use swc_core::common::comments::Comments;
use swc_core::common::{Span, Spanned};
use swc_core::ecma::ast::{
  Decl, Expr, JSXElement, JSXElementChild, Module, ModuleDecl, ModuleItem, Pat, Stmt,
  VarDeclarator,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use tracing::debug;

use crate::cache::StylesheetCache;
use crate::class_names::{is_class_names_element, transform_class_names};
use crate::css_prop::{build_css_prop_element, has_css_attribute, take_css_attribute};
use crate::errors::TransformError;
use crate::fingerprint::{class_name, fingerprint};
use crate::imports::{analyze_imports, ensure_react_import, rewrite_styling_imports};
use crate::interpolations;
use crate::parser;
use crate::serializer::serialize;
use crate::styled::{annotate_pure, build_styled_component, display_name_guard, match_styled};
use crate::tokens::{self, NormalizedStyle};
use crate::types::{CallSiteTransformResult, PluginOptions, StyleBody};

pub struct CssInJsTransform<'a> {
  options: PluginOptions,
  comments: Option<&'a dyn Comments>,
  sources: Vec<String>,
  styled_local: Option<String>,
  class_names_local: Option<String>,
  cache: StylesheetCache,
  errors: Vec<TransformError>,
  display_names: Vec<String>,
  transformed: bool,
}

impl<'a> CssInJsTransform<'a> {
  pub fn new(options: PluginOptions) -> Self {
    let sources = options.import_sources();
    Self {
      options,
      comments: None,
      sources,
      styled_local: None,
      class_names_local: None,
      cache: StylesheetCache::new(),
      errors: Vec::new(),
      display_names: Vec::new(),
      transformed: false,
    }
  }

  /// With a comments store attached, synthesized component calls are
  /// annotated `#__PURE__`.
  pub fn with_comments(options: PluginOptions, comments: &'a dyn Comments) -> Self {
    let mut pass = Self::new(options);
    pass.comments = Some(comments);
    pass
  }

  /// Every rule emitted by this pass, deduplicated, in first-seen order.
  pub fn style_rules(&self) -> Vec<String> {
    self.cache.all_rules()
  }

  pub fn take_errors(&mut self) -> Vec<TransformError> {
    std::mem::take(&mut self.errors)
  }

  /// Run one style body through the full pipeline: normalize, parse, resolve
  /// interpolations, serialize (through the cache), fingerprint.
  fn process_body(
    &mut self,
    body: StyleBody,
    span: Span,
  ) -> Result<CallSiteTransformResult, TransformError> {
    let style = self.normalize(body).map_err(|error| error.at(span))?;
    let fp = fingerprint(&style.tokens);
    let class = class_name(&fp);

    let mut nodes = parser::parse(&style.tokens).map_err(|error| error.at(span))?;
    let entries = interpolations::resolve(&mut nodes, &style.expressions, &fp);

    let minify = self.options.minify_enabled();
    let (rules, fresh) = self
      .cache
      .lookup_or_insert(&fp, || serialize(&nodes, &class, minify));
    if fresh {
      debug!(fingerprint = %fp, rules = rules.len(), "extracted style rules");
    }

    Ok(CallSiteTransformResult {
      class_name: class,
      fingerprint: fp,
      rule_strings: rules.to_vec(),
      interpolations: entries,
      nonce: self.options.nonce.clone(),
    })
  }

  fn normalize(&self, body: StyleBody) -> Result<NormalizedStyle, TransformError> {
    match body {
      StyleBody::Template(template) => tokens::from_template(&template),
      StyleBody::Object(object) => tokens::from_object(&object),
      StyleBody::Text(text) => Ok(tokens::from_text(&text)),
    }
  }

  /// Try the styled rewrite on `expr`. A diagnosed site is reported once and
  /// left untouched.
  fn try_styled(&mut self, expr: &mut Expr) -> StyledAttempt {
    let Some(styled_local) = self.styled_local.clone() else {
      return StyledAttempt::NoMatch;
    };
    let site = match match_styled(expr, &styled_local) {
      Ok(Some(site)) => site,
      Ok(None) => return StyledAttempt::NoMatch,
      Err(error) => {
        self.errors.push(error);
        return StyledAttempt::Diagnosed;
      }
    };
    match self.process_body(site.body, expr.span()) {
      Ok(result) => {
        let mut component = build_styled_component(&site.target, &result);
        if let Some(comments) = self.comments {
          annotate_pure(&mut component, comments);
        }
        *expr = component;
        self.transformed = true;
        StyledAttempt::Replaced
      }
      Err(error) => {
        self.errors.push(error);
        StyledAttempt::Diagnosed
      }
    }
  }

  /// Try the ClassNames and css-prop rewrites on an element. Returns the
  /// replacement boundary element when one applies.
  fn try_jsx_element(&mut self, element: &JSXElement) -> Option<JSXElement> {
    if let Some(class_names_local) = self.class_names_local.clone() {
      if is_class_names_element(element, &class_names_local) {
        let nonce = self.options.nonce.clone();
        let mut process =
          |body: StyleBody, span: Span| self.process_body(body, span);
        return match transform_class_names(element, nonce.as_deref(), &mut process) {
          Ok(replacement) => {
            self.transformed = true;
            Some(replacement)
          }
          Err(error) => {
            self.errors.push(error);
            None
          }
        };
      }
    }

    if !has_css_attribute(element) {
      return None;
    }
    let mut stripped = element.clone();
    let body = match take_css_attribute(&mut stripped) {
      Ok(Some(body)) => body,
      Ok(None) => return None,
      Err(error) => {
        self.errors.push(error);
        return None;
      }
    };
    match self.process_body(body, element.span) {
      Ok(result) => {
        self.transformed = true;
        Some(build_css_prop_element(stripped, &result))
      }
      Err(error) => {
        self.errors.push(error);
        None
      }
    }
  }

  fn insert_display_name_guards(&mut self, module: &mut Module) {
    for name in std::mem::take(&mut self.display_names) {
      let Some(index) = module
        .body
        .iter()
        .position(|item| declares_binding(item, &name))
      else {
        continue;
      };
      module
        .body
        .insert(index + 1, ModuleItem::Stmt(display_name_guard(&name)));
    }
  }
}

enum StyledAttempt {
  NoMatch,
  Replaced,
  Diagnosed,
}

fn declares_binding(item: &ModuleItem, name: &str) -> bool {
  let var = match item {
    ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
      Decl::Var(var) => var,
      _ => return false,
    },
    _ => return false,
  };
  var
    .decls
    .iter()
    .any(|decl| matches!(&decl.name, Pat::Ident(binding) if binding.id.sym == *name))
}

impl VisitMut for CssInJsTransform<'_> {
  fn visit_mut_module(&mut self, module: &mut Module) {
    let analysis = analyze_imports(module, &self.sources);
    if !analysis.is_styling_module() {
      return;
    }
    self.styled_local = analysis.styled_local.clone();
    self.class_names_local = analysis.class_names_local.clone();

    module.visit_mut_children_with(self);

    self.insert_display_name_guards(module);
    if self.transformed {
      rewrite_styling_imports(module, &self.sources);
      if self.options.import_react_enabled() && !analysis.has_react_default {
        ensure_react_import(module);
      }
    }
  }

  fn visit_mut_var_declarator(&mut self, declarator: &mut VarDeclarator) {
    if let Some(init) = &mut declarator.init {
      match self.try_styled(init) {
        StyledAttempt::Replaced => {
          if let Pat::Ident(binding) = &declarator.name {
            self.display_names.push(binding.id.sym.to_string());
          }
          // The synthesized component contains no further call sites.
          return;
        }
        StyledAttempt::Diagnosed => return,
        StyledAttempt::NoMatch => {}
      }
    }
    declarator.visit_mut_children_with(self);
  }

  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    match self.try_styled(expr) {
      StyledAttempt::Replaced | StyledAttempt::Diagnosed => return,
      StyledAttempt::NoMatch => {}
    }
    expr.visit_mut_children_with(self);
    let replacement = match &*expr {
      Expr::JSXElement(element) => self.try_jsx_element(element),
      _ => None,
    };
    if let Some(replacement) = replacement {
      *expr = Expr::JSXElement(Box::new(replacement));
    }
  }

  fn visit_mut_jsx_element_child(&mut self, child: &mut JSXElementChild) {
    child.visit_mut_children_with(self);
    let replacement = match &*child {
      JSXElementChild::JSXElement(element) => self.try_jsx_element(element),
      _ => None,
    };
    if let Some(replacement) = replacement {
      *child = JSXElementChild::JSXElement(Box::new(replacement));
    }
  }
}
