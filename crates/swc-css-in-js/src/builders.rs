//! Shared AST construction helpers for the synthesized runtime markup. All
//! generated nodes carry `DUMMY_SP` so downstream source maps attribute them
//! to the transform rather than to user code.

use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  ArrayLit, BinExpr, BinaryOp, CondExpr, Expr, ExprOrSpread, Ident, IdentName, JSXAttr,
  JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXClosingElement, JSXElement, JSXElementChild,
  JSXElementName, JSXExpr, JSXExprContainer, KeyValueProp, Lit, MemberExpr, MemberProp, ObjectLit,
  ParenExpr, Prop, PropName, PropOrSpread, SpreadElement, Str,
};

use crate::constants::{STYLE_BOUNDARY_COMPONENT, STYLE_SHEET_COMPONENT};
use crate::interpolations::InterpolationEntry;

pub fn ident(name: &str) -> Ident {
  Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

pub fn string_lit(value: &str) -> Str {
  Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }
}

pub fn string_expr(value: &str) -> Expr {
  Expr::Lit(Lit::Str(string_lit(value)))
}

pub fn member(obj: Expr, prop: &str) -> Expr {
  Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(obj),
    prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
  })
}

pub fn paren(expr: Expr) -> Expr {
  Expr::Paren(ParenExpr {
    span: DUMMY_SP,
    expr: Box::new(expr),
  })
}

pub fn jsx_attribute(name: &str, value: Option<JSXAttrValue>) -> JSXAttrOrSpread {
  JSXAttrOrSpread::JSXAttr(JSXAttr {
    span: DUMMY_SP,
    name: JSXAttrName::Ident(IdentName::new(name.into(), DUMMY_SP)),
    value,
  })
}

pub fn jsx_string_attribute(name: &str, value: &str) -> JSXAttrOrSpread {
  jsx_attribute(name, Some(JSXAttrValue::Lit(Lit::Str(string_lit(value)))))
}

pub fn jsx_expr_attribute(name: &str, expr: Expr) -> JSXAttrOrSpread {
  jsx_attribute(
    name,
    Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
      span: DUMMY_SP,
      expr: JSXExpr::Expr(Box::new(expr)),
    })),
  )
}

pub fn jsx_element(
  name: &str,
  attrs: Vec<JSXAttrOrSpread>,
  children: Vec<JSXElementChild>,
) -> JSXElement {
  let self_closing = children.is_empty();
  JSXElement {
    span: DUMMY_SP,
    opening: swc_core::ecma::ast::JSXOpeningElement {
      span: DUMMY_SP,
      name: JSXElementName::Ident(ident(name)),
      attrs,
      self_closing,
      type_args: None,
    },
    children,
    closing: if self_closing {
      None
    } else {
      Some(JSXClosingElement {
        span: DUMMY_SP,
        name: JSXElementName::Ident(ident(name)),
      })
    },
  }
}

pub fn jsx_child(element: JSXElement) -> JSXElementChild {
  JSXElementChild::JSXElement(Box::new(element))
}

pub fn jsx_expr_child(expr: Expr) -> JSXElementChild {
  JSXElementChild::JSXExprContainer(JSXExprContainer {
    span: DUMMY_SP,
    expr: JSXExpr::Expr(Box::new(expr)),
  })
}

/// `<CS hash="..." nonce={...}>{["rule", ...]}</CS>`
pub fn style_sheet_element(hash: &str, nonce: Option<&Expr>, rules: &[String]) -> JSXElement {
  let mut attrs = vec![jsx_string_attribute("hash", hash)];
  if let Some(nonce) = nonce {
    attrs.push(jsx_expr_attribute("nonce", nonce.clone()));
  }
  let elems = rules
    .iter()
    .map(|rule| {
      Some(ExprOrSpread {
        spread: None,
        expr: Box::new(string_expr(rule)),
      })
    })
    .collect();
  let rules_array = Expr::Array(ArrayLit {
    span: DUMMY_SP,
    elems,
  });
  jsx_element(
    STYLE_SHEET_COMPONENT,
    attrs,
    vec![jsx_expr_child(rules_array)],
  )
}

/// `<CC>{children}</CC>`
pub fn style_boundary_element(children: Vec<JSXElementChild>) -> JSXElement {
  jsx_element(STYLE_BOUNDARY_COMPONENT, Vec::new(), children)
}

/// `"cc-..." + (incoming ? " " + incoming : "")`
pub fn class_name_concat(class_name: &str, incoming: Expr) -> Expr {
  let with_space = Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::Add,
    left: Box::new(string_expr(" ")),
    right: Box::new(incoming.clone()),
  });
  let conditional = Expr::Cond(CondExpr {
    span: DUMMY_SP,
    test: Box::new(incoming),
    cons: Box::new(with_space),
    alt: Box::new(string_expr("")),
  });
  Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::Add,
    left: Box::new(string_expr(class_name)),
    right: Box::new(paren(conditional)),
  })
}

/// `(expr || "") + "unit"`, or the bare expression when no unit applies.
pub fn interpolation_value(entry: &InterpolationEntry) -> Expr {
  let Some(unit) = &entry.unit else {
    return (*entry.expression).clone();
  };
  let fallback = paren(Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::LogicalOr,
    left: entry.expression.clone(),
    right: Box::new(string_expr("")),
  }));
  Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::Add,
    left: Box::new(fallback),
    right: Box::new(string_expr(unit)),
  })
}

/// `{ ...existing, "--var-a": valueA, ... }` for the element's style prop.
/// Duplicate names keep their first binding.
pub fn style_object(existing: Option<Expr>, entries: &[InterpolationEntry]) -> ObjectLit {
  let mut props: Vec<PropOrSpread> = Vec::new();
  if let Some(existing) = existing {
    props.push(PropOrSpread::Spread(SpreadElement {
      dot3_token: DUMMY_SP,
      expr: Box::new(existing),
    }));
  }
  let mut seen: Vec<&str> = Vec::new();
  for entry in entries {
    if seen.contains(&entry.name.as_str()) {
      continue;
    }
    seen.push(&entry.name);
    props.push(PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
      key: PropName::Str(string_lit(&entry.name)),
      value: Box::new(interpolation_value(entry)),
    }))));
  }
  ObjectLit {
    span: DUMMY_SP,
    props,
  }
}
