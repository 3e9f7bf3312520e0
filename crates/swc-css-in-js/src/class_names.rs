//! The `ClassNames` render-prop component. The wrapper and its render
//! function are erased at compile time: each `css(...)` call inside the
//! function becomes a plain class-name string, and the returned markup is
//! inlined behind the style boundary.

use swc_core::common::{Span, Spanned};
use swc_core::ecma::ast::{
  ArrowExpr, BlockStmtOrExpr, Callee, Expr, ExprOrSpread, JSXElement, JSXElementChild,
  JSXElementName, JSXExpr, JSXExprContainer, Lit, ObjectPat, ObjectPatProp, Pat, PropName,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::builders::{
  ident, jsx_child, jsx_expr_child, string_expr, style_boundary_element, style_sheet_element,
};
use crate::errors::{ErrorKind, TransformError};
use crate::types::{CallSiteTransformResult, StyleBody};

pub type ProcessBody<'a> =
  &'a mut dyn FnMut(StyleBody, Span) -> Result<CallSiteTransformResult, TransformError>;

pub fn is_class_names_element(element: &JSXElement, class_names_local: &str) -> bool {
  matches!(
    &element.opening.name,
    JSXElementName::Ident(name) if name.sym == *class_names_local
  )
}

/// Erase a `<ClassNames>{({ css }) => markup}</ClassNames>` wrapper. Returns
/// the replacement element, or an error when the render function does not
/// have the supported shape; the caller leaves the original untouched then.
pub fn transform_class_names(
  element: &JSXElement,
  nonce: Option<&str>,
  process: ProcessBody,
) -> Result<JSXElement, TransformError> {
  let render = find_render_function(element)?;
  let css_local = css_binding_name(render).ok_or_else(|| {
    TransformError::new(
      ErrorKind::UnsupportedStyleShape,
      "ClassNames render function must destructure `css` from its argument",
    )
    .at(render.span)
  })?;

  let BlockStmtOrExpr::Expr(body) = &*render.body else {
    return Err(
      TransformError::new(
        ErrorKind::UnsupportedStyleShape,
        "ClassNames render function must return its markup as an expression body",
      )
      .at(render.span),
    );
  };

  let mut rewriter = CssCallRewriter {
    css_local,
    process,
    rules: Vec::new(),
    error: None,
  };
  let mut markup = body.clone();
  markup.visit_mut_with(&mut rewriter);
  if let Some(error) = rewriter.error {
    return Err(error);
  }

  // One style sheet covers every css() call in the render function; its
  // identity is the identity of the combined rules.
  let sheet_hash = css_in_js_hash::hash(&rewriter.rules.join(""), 0);
  let nonce_expr = nonce.map(|value| Expr::Ident(ident(value)));
  let sheet = style_sheet_element(&sheet_hash, nonce_expr.as_ref(), &rewriter.rules);
  // Element markup inlines as a direct child; anything else stays in an
  // expression container.
  let markup_child = match *markup {
    Expr::JSXElement(inline) => JSXElementChild::JSXElement(inline),
    other => jsx_expr_child(other),
  };
  Ok(style_boundary_element(vec![jsx_child(sheet), markup_child]))
}

fn find_render_function(element: &JSXElement) -> Result<&ArrowExpr, TransformError> {
  for child in &element.children {
    if let JSXElementChild::JSXExprContainer(JSXExprContainer {
      expr: JSXExpr::Expr(expr),
      ..
    }) = child
    {
      if let Expr::Arrow(arrow) = &**expr {
        return Ok(arrow);
      }
    }
  }
  Err(
    TransformError::new(
      ErrorKind::UnsupportedStyleShape,
      "ClassNames expects a single render function child",
    )
    .at(element.span),
  )
}

/// The local name `css` is bound to, honoring `{ css }` and `{ css: cx }`.
fn css_binding_name(render: &ArrowExpr) -> Option<String> {
  let Some(Pat::Object(ObjectPat { props, .. })) = render.params.first() else {
    return None;
  };
  for prop in props {
    match prop {
      ObjectPatProp::Assign(assign) if assign.key.sym == *"css" => {
        return Some(assign.key.sym.to_string());
      }
      ObjectPatProp::KeyValue(kv) => {
        if let PropName::Ident(key) = &kv.key {
          if key.sym == *"css" {
            if let Pat::Ident(binding) = &*kv.value {
              return Some(binding.id.sym.to_string());
            }
          }
        }
      }
      _ => {}
    }
  }
  None
}

struct CssCallRewriter<'a> {
  css_local: String,
  process: ProcessBody<'a>,
  rules: Vec<String>,
  error: Option<TransformError>,
}

impl CssCallRewriter<'_> {
  fn try_rewrite(&mut self, expr: &Expr) -> Option<Result<Expr, TransformError>> {
    let (body, span) = match expr {
      Expr::TaggedTpl(tagged) => {
        let Expr::Ident(tag) = &*tagged.tag else {
          return None;
        };
        if tag.sym != *self.css_local.as_str() {
          return None;
        }
        (StyleBody::Template((*tagged.tpl).clone()), tagged.span)
      }
      Expr::Call(call) => {
        let Callee::Expr(callee) = &call.callee else {
          return None;
        };
        let Expr::Ident(callee_ident) = &**callee else {
          return None;
        };
        if callee_ident.sym != *self.css_local.as_str() {
          return None;
        }
        let [ExprOrSpread { spread: None, expr }] = call.args.as_slice() else {
          return Some(Err(
            TransformError::new(
              ErrorKind::UnsupportedStyleShape,
              "css() takes exactly one style argument",
            )
            .at(call.span),
          ));
        };
        let body = match &**expr {
          Expr::Tpl(template) => StyleBody::Template(template.clone()),
          Expr::Object(object) => StyleBody::Object(object.clone()),
          Expr::Lit(Lit::Str(text)) => StyleBody::Text(text.value.to_string()),
          other => {
            return Some(Err(
              TransformError::new(
                ErrorKind::UnsupportedStyleShape,
                "css() accepts a template literal, object, or string",
              )
              .at(other.span()),
            ));
          }
        };
        (body, call.span)
      }
      _ => return None,
    };

    let result = match (self.process)(body, span) {
      Ok(result) => result,
      Err(error) => return Some(Err(error)),
    };
    if !result.interpolations.is_empty() {
      return Some(Err(
        TransformError::new(
          ErrorKind::UnsupportedStyleShape,
          "dynamic interpolations are not supported inside ClassNames",
        )
        .at(span),
      ));
    }
    self.rules.extend(result.rule_strings);
    Some(Ok(string_expr(&result.class_name)))
  }
}

impl VisitMut for CssCallRewriter<'_> {
  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    if self.error.is_some() {
      return;
    }
    match self.try_rewrite(expr) {
      Some(Ok(replacement)) => *expr = replacement,
      Some(Err(error)) => self.error = Some(error),
      None => expr.visit_mut_children_with(self),
    }
  }
}

#[cfg(test)]
mod tests {
  use swc_core::common::{SyntaxContext, DUMMY_SP};
  use swc_core::ecma::ast::{BindingIdent, KeyValuePatProp, Tpl, TplElement};

  use super::*;
  use crate::builders::{jsx_element, jsx_expr_attribute, member};

  fn render_arrow(css_local: &str, body: Expr) -> Expr {
    Expr::Arrow(ArrowExpr {
      span: DUMMY_SP,
      ctxt: SyntaxContext::empty(),
      params: vec![Pat::Object(ObjectPat {
        span: DUMMY_SP,
        optional: false,
        type_ann: None,
        props: vec![ObjectPatProp::KeyValue(KeyValuePatProp {
          key: PropName::Ident(ident("css").into()),
          value: Box::new(Pat::Ident(BindingIdent {
            id: ident(css_local),
            type_ann: None,
          })),
        })],
      })],
      body: Box::new(BlockStmtOrExpr::Expr(Box::new(body))),
      is_async: false,
      is_generator: false,
      type_params: None,
      return_type: None,
    })
  }

  fn css_tagged(css_local: &str, text: &str) -> Expr {
    Expr::TaggedTpl(swc_core::ecma::ast::TaggedTpl {
      span: DUMMY_SP,
      ctxt: SyntaxContext::empty(),
      tag: Box::new(Expr::Ident(ident(css_local))),
      type_params: None,
      tpl: Box::new(Tpl {
        span: DUMMY_SP,
        exprs: Vec::new(),
        quasis: vec![TplElement {
          span: DUMMY_SP,
          tail: true,
          cooked: Some(text.into()),
          raw: text.into(),
        }],
      }),
    })
  }

  fn fake_process(body: StyleBody, _span: Span) -> Result<CallSiteTransformResult, TransformError> {
    let StyleBody::Template(_) = body else {
      panic!("test only feeds templates");
    };
    Ok(CallSiteTransformResult {
      class_name: "cc-test".into(),
      fingerprint: "test".into(),
      rule_strings: vec![".cc-test{color:#00f}".into()],
      interpolations: Vec::new(),
      nonce: None,
    })
  }

  fn wrapper(render: Expr) -> JSXElement {
    jsx_element(
      "ClassNames",
      Vec::new(),
      vec![jsx_expr_child(render)],
    )
  }

  #[test]
  fn css_calls_become_class_name_strings() {
    let markup = Expr::JSXElement(Box::new(jsx_element(
      "div",
      vec![jsx_expr_attribute(
        "className",
        css_tagged("css", "color: blue;"),
      )],
      Vec::new(),
    )));
    let element = wrapper(render_arrow("css", markup));
    let mut process = fake_process;
    let result = transform_class_names(&element, None, &mut process).expect("should transform");
    // CC wraps CS plus the inlined markup.
    assert_eq!(result.children.len(), 2);
  }

  #[test]
  fn element_markup_inlines_as_a_direct_child() {
    let markup = Expr::JSXElement(Box::new(jsx_element("div", Vec::new(), Vec::new())));
    let element = wrapper(render_arrow("css", markup));
    let mut process = fake_process;
    let result = transform_class_names(&element, None, &mut process).expect("should transform");
    assert!(matches!(
      result.children[1],
      JSXElementChild::JSXElement(_)
    ));
  }

  #[test]
  fn renamed_css_binding_is_honored() {
    let markup = Expr::JSXElement(Box::new(jsx_element(
      "div",
      vec![jsx_expr_attribute("className", css_tagged("cx", "color: blue;"))],
      Vec::new(),
    )));
    let element = wrapper(render_arrow("cx", markup));
    let mut process = fake_process;
    assert!(transform_class_names(&element, None, &mut process).is_ok());
  }

  #[test]
  fn missing_render_function_is_rejected() {
    let element = jsx_element("ClassNames", Vec::new(), Vec::new());
    let mut process = fake_process;
    let err = transform_class_names(&element, None, &mut process).expect_err("no render child");
    assert_eq!(err.kind, ErrorKind::UnsupportedStyleShape);
  }

  #[test]
  fn non_destructured_parameter_is_rejected() {
    let markup = string_expr("markup");
    let arrow = Expr::Arrow(ArrowExpr {
      span: DUMMY_SP,
      ctxt: SyntaxContext::empty(),
      params: vec![Pat::Ident(BindingIdent {
        id: ident("api"),
        type_ann: None,
      })],
      body: Box::new(BlockStmtOrExpr::Expr(Box::new(markup))),
      is_async: false,
      is_generator: false,
      type_params: None,
      return_type: None,
    });
    let element = wrapper(arrow);
    let mut process = fake_process;
    let err = transform_class_names(&element, None, &mut process).expect_err("unsupported param");
    assert_eq!(err.kind, ErrorKind::UnsupportedStyleShape);
  }

  #[test]
  fn dynamic_interpolations_are_rejected() {
    let markup = Expr::JSXElement(Box::new(jsx_element(
      "div",
      vec![jsx_expr_attribute("className", css_tagged("css", "w: ${x};"))],
      Vec::new(),
    )));
    let element = wrapper(render_arrow("css", markup));
    let mut process = |_body: StyleBody, span: Span| {
      Ok(CallSiteTransformResult {
        class_name: "cc-test".into(),
        fingerprint: "test".into(),
        rule_strings: Vec::new(),
        interpolations: vec![crate::interpolations::InterpolationEntry {
          name: "--var-x".into(),
          expression: Box::new(member(Expr::Ident(ident("props")), "x")),
          unit: None,
        }],
        nonce: None,
      })
      .map_err(|e: TransformError| e.at(span))
    };
    let err = transform_class_names(&element, None, &mut process).expect_err("dynamic css");
    assert_eq!(err.kind, ErrorKind::UnsupportedStyleShape);
  }
}
