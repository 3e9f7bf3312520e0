//! Resolves dynamic value parts to CSS custom properties. Each placeholder in
//! a declaration value becomes a `--var-*` reference in the emitted rule and a
//! runtime style entry binding that property to the original expression.

use swc_core::ecma::ast::Expr;

use crate::constants::CUSTOM_PROPERTY_PREFIX;
use crate::parser::{CssNode, ValuePart};

/// One runtime binding produced for a dynamic value part.
#[derive(Clone, Debug)]
pub struct InterpolationEntry {
  /// Custom property name including the `--var-` prefix.
  pub name: String,
  /// The user expression whose value feeds the custom property.
  pub expression: Box<Expr>,
  /// Static suffix that followed the placeholder, e.g. `px` in `${n}px`.
  /// Appended at runtime so the fallback law `(expr || "") + unit` holds.
  pub unit: Option<String>,
}

/// Walk the tree, replacing each placeholder with a `var(--var-*)` reference
/// and recording the runtime binding it requires. `salt` is the call-site
/// fingerprint, so identical expressions in different rules stay distinct
/// while repeated builds stay stable.
pub fn resolve(nodes: &mut [CssNode], expressions: &[Box<Expr>], salt: &str) -> Vec<InterpolationEntry> {
  let mut entries = Vec::new();
  resolve_nodes(nodes, expressions, salt, &mut entries);
  entries
}

fn resolve_nodes(
  nodes: &mut [CssNode],
  expressions: &[Box<Expr>],
  salt: &str,
  entries: &mut Vec<InterpolationEntry>,
) {
  for node in nodes {
    match node {
      CssNode::Declaration { property, value } => {
        resolve_value(property, value, expressions, salt, entries);
      }
      CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => {
        resolve_nodes(nodes, expressions, salt, entries);
      }
    }
  }
}

fn resolve_value(
  property: &str,
  value: &mut Vec<ValuePart>,
  expressions: &[Box<Expr>],
  salt: &str,
  entries: &mut Vec<InterpolationEntry>,
) {
  let mut index = 0;
  while index < value.len() {
    let ValuePart::Placeholder(expr_index) = value[index] else {
      index += 1;
      continue;
    };
    let Some(expression) = expressions.get(expr_index) else {
      index += 1;
      continue;
    };

    let unit = take_unit(value, index + 1);
    let name = property_name(salt, property, expr_index);
    value[index] = ValuePart::Literal(format!("var({name})"));
    entries.push(InterpolationEntry {
      name,
      expression: expression.clone(),
      unit,
    });
    index += 1;
  }
}

/// A unit suffix immediately after a placeholder (letters or `%`) moves into
/// the runtime binding so the serialized rule reads `var(--var-*)` alone.
fn take_unit(value: &mut Vec<ValuePart>, index: usize) -> Option<String> {
  let ValuePart::Literal(text) = value.get_mut(index)? else {
    return None;
  };
  let unit_len = text
    .chars()
    .take_while(|ch| ch.is_ascii_alphabetic() || *ch == '%')
    .map(char::len_utf8)
    .sum::<usize>();
  if unit_len == 0 {
    return None;
  }
  let rest = text[unit_len..].to_string();
  let unit = text[..unit_len].to_string();
  if rest.is_empty() {
    value.remove(index);
  } else {
    *text = rest;
  }
  Some(unit)
}

fn property_name(salt: &str, property: &str, expr_index: usize) -> String {
  let hashed = css_in_js_hash::hash(&format!("{salt}&{property}&{expr_index}"), 0);
  format!("{CUSTOM_PROPERTY_PREFIX}{hashed}")
}
