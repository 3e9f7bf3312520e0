//! The `css` prop on JSX elements. The attribute is removed at compile time;
//! the element keeps its other props and gains the scoping class, and the
//! whole element is wrapped in the style boundary with its style sheet.

use swc_core::common::Spanned;
use swc_core::ecma::ast::{
  Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXExpr, Lit,
};

use crate::builders::{
  class_name_concat, ident, jsx_child, jsx_expr_attribute, jsx_string_attribute,
  style_boundary_element, style_object, style_sheet_element,
};
use crate::errors::{ErrorKind, TransformError};
use crate::types::{CallSiteTransformResult, StyleBody};

const CSS_ATTRIBUTE: &str = "css";

/// Find the `css` attribute without consuming it. Used to decide whether an
/// element participates before committing to the transform.
pub fn has_css_attribute(element: &JSXElement) -> bool {
  element.opening.attrs.iter().any(|attr| {
    matches!(
      attr,
      JSXAttrOrSpread::JSXAttr(JSXAttr {
        name: JSXAttrName::Ident(name),
        ..
      }) if name.sym == *CSS_ATTRIBUTE
    )
  })
}

/// Remove the `css` attribute and return its style body. `Err` leaves the
/// attribute list unchanged apart from the removal being rolled back by the
/// caller dropping the element clone.
pub fn take_css_attribute(element: &mut JSXElement) -> Result<Option<StyleBody>, TransformError> {
  let index = element.opening.attrs.iter().position(|attr| {
    matches!(
      attr,
      JSXAttrOrSpread::JSXAttr(JSXAttr {
        name: JSXAttrName::Ident(name),
        ..
      }) if name.sym == *CSS_ATTRIBUTE
    )
  });
  let Some(index) = index else {
    return Ok(None);
  };

  let attr = element.opening.attrs.remove(index);
  let JSXAttrOrSpread::JSXAttr(attr) = attr else {
    return Ok(None);
  };

  match attr.value {
    Some(JSXAttrValue::Lit(Lit::Str(text))) => Ok(Some(StyleBody::Text(text.value.to_string()))),
    Some(JSXAttrValue::JSXExprContainer(container)) => match container.expr {
      JSXExpr::Expr(expr) => match *expr {
        Expr::Tpl(template) => Ok(Some(StyleBody::Template(template))),
        Expr::Object(object) => Ok(Some(StyleBody::Object(object))),
        Expr::TaggedTpl(tagged) => Ok(Some(StyleBody::Template(*tagged.tpl))),
        Expr::Lit(Lit::Str(text)) => Ok(Some(StyleBody::Text(text.value.to_string()))),
        other => Err(
          TransformError::new(
            ErrorKind::UnsupportedStyleShape,
            "css prop accepts a template literal, object, or string",
          )
          .at(other.span()),
        ),
      },
      JSXExpr::JSXEmptyExpr(empty) => Err(
        TransformError::new(ErrorKind::UnsupportedStyleShape, "css prop has no value")
          .at(empty.span),
      ),
    },
    _ => Err(
      TransformError::new(
        ErrorKind::UnsupportedStyleShape,
        "css prop accepts a template literal, object, or string",
      )
      .at(attr.span),
    ),
  }
}

/// Attach the scoping class and style bindings to the element, then wrap it
/// in `<CC><CS ...>{rules}</CS>{element}</CC>`.
pub fn build_css_prop_element(
  mut element: JSXElement,
  result: &CallSiteTransformResult,
) -> JSXElement {
  merge_class_name(&mut element, &result.class_name);
  if !result.interpolations.is_empty() {
    merge_style(&mut element, result);
  }

  let nonce_expr = result.nonce.as_ref().map(|nonce| Expr::Ident(ident(nonce)));
  let sheet = style_sheet_element(&result.fingerprint, nonce_expr.as_ref(), &result.rule_strings);
  style_boundary_element(vec![jsx_child(sheet), jsx_child(element)])
}

fn find_attribute(element: &mut JSXElement, name: &str) -> Option<usize> {
  element.opening.attrs.iter().position(|attr| {
    matches!(
      attr,
      JSXAttrOrSpread::JSXAttr(JSXAttr {
        name: JSXAttrName::Ident(attr_name),
        ..
      }) if attr_name.sym == *name
    )
  })
}

fn merge_class_name(element: &mut JSXElement, class_name: &str) {
  let Some(index) = find_attribute(element, "className") else {
    element
      .opening
      .attrs
      .push(jsx_string_attribute("className", class_name));
    return;
  };

  let existing = element.opening.attrs.remove(index);
  let merged = match existing {
    JSXAttrOrSpread::JSXAttr(JSXAttr {
      value: Some(JSXAttrValue::Lit(Lit::Str(text))),
      ..
    }) => jsx_string_attribute("className", &format!("{class_name} {}", text.value)),
    JSXAttrOrSpread::JSXAttr(JSXAttr {
      value: Some(JSXAttrValue::JSXExprContainer(container)),
      ..
    }) => match container.expr {
      JSXExpr::Expr(expr) => {
        jsx_expr_attribute("className", class_name_concat(class_name, *expr))
      }
      JSXExpr::JSXEmptyExpr(_) => jsx_string_attribute("className", class_name),
    },
    _ => jsx_string_attribute("className", class_name),
  };
  element.opening.attrs.insert(index, merged);
}

fn merge_style(element: &mut JSXElement, result: &CallSiteTransformResult) {
  let existing = find_attribute(element, "style").map(|index| element.opening.attrs.remove(index));
  let spread = existing.and_then(|attr| match attr {
    JSXAttrOrSpread::JSXAttr(JSXAttr {
      value: Some(JSXAttrValue::JSXExprContainer(container)),
      ..
    }) => match container.expr {
      JSXExpr::Expr(expr) => Some(*expr),
      JSXExpr::JSXEmptyExpr(_) => None,
    },
    _ => None,
  });
  element.opening.attrs.push(jsx_expr_attribute(
    "style",
    Expr::Object(style_object(spread, &result.interpolations)),
  ));
}

#[cfg(test)]
mod tests {
  use swc_core::common::DUMMY_SP;
  use swc_core::ecma::ast::{JSXAttrValue, JSXExprContainer, Tpl, TplElement};

  use super::*;
  use crate::builders::{jsx_element, jsx_string_attribute};

  fn css_template_attr(text: &str) -> JSXAttrOrSpread {
    jsx_expr_attribute(
      "css",
      Expr::Tpl(Tpl {
        span: DUMMY_SP,
        exprs: Vec::new(),
        quasis: vec![TplElement {
          span: DUMMY_SP,
          tail: true,
          cooked: Some(text.into()),
          raw: text.into(),
        }],
      }),
    )
  }

  #[test]
  fn css_attribute_is_detected_and_taken() {
    let mut element = jsx_element("div", vec![css_template_attr("color: blue;")], Vec::new());
    assert!(has_css_attribute(&element));
    let body = take_css_attribute(&mut element)
      .expect("should extract")
      .expect("attribute present");
    assert!(matches!(body, StyleBody::Template(_)));
    assert!(element.opening.attrs.is_empty());
  }

  #[test]
  fn string_css_attribute_is_supported() {
    let mut element = jsx_element(
      "div",
      vec![jsx_string_attribute("css", "font-size: 12px;")],
      Vec::new(),
    );
    let body = take_css_attribute(&mut element)
      .expect("should extract")
      .expect("attribute present");
    assert!(matches!(body, StyleBody::Text(text) if text == "font-size: 12px;"));
  }

  #[test]
  fn valueless_css_attribute_is_rejected() {
    let mut element = jsx_element(
      "div",
      vec![JSXAttrOrSpread::JSXAttr(JSXAttr {
        span: DUMMY_SP,
        name: JSXAttrName::Ident(swc_core::ecma::ast::IdentName::new("css".into(), DUMMY_SP)),
        value: None,
      })],
      Vec::new(),
    );
    let err = take_css_attribute(&mut element).expect_err("no value");
    assert_eq!(err.kind, ErrorKind::UnsupportedStyleShape);
  }

  #[test]
  fn literal_class_names_merge_into_one_string() {
    let mut element = jsx_element(
      "div",
      vec![jsx_string_attribute("className", "existing")],
      Vec::new(),
    );
    merge_class_name(&mut element, "cc-abc");
    match &element.opening.attrs[0] {
      JSXAttrOrSpread::JSXAttr(JSXAttr {
        value: Some(JSXAttrValue::Lit(Lit::Str(text))),
        ..
      }) => assert_eq!(&*text.value, "cc-abc existing"),
      other => panic!("expected merged string attribute, got {other:?}"),
    }
  }

  #[test]
  fn expression_class_names_merge_with_a_guard() {
    let mut element = jsx_element(
      "div",
      vec![jsx_expr_attribute(
        "css",
        Expr::Ident(ident("unused")),
      )],
      Vec::new(),
    );
    element.opening.attrs[0] = jsx_expr_attribute("className", Expr::Ident(ident("dynamic")));
    merge_class_name(&mut element, "cc-abc");
    match &element.opening.attrs[0] {
      JSXAttrOrSpread::JSXAttr(JSXAttr {
        value: Some(JSXAttrValue::JSXExprContainer(JSXExprContainer { expr, .. })),
        ..
      }) => assert!(matches!(expr, JSXExpr::Expr(_))),
      other => panic!("expected expression attribute, got {other:?}"),
    }
  }
}
