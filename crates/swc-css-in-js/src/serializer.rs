//! Flattens a call site's CSS tree into the final rule strings. Nesting is
//! resolved against the call site's class selector, conditional at-rules are
//! re-rooted around their flattened children, and declarations are emitted in
//! compact form with optional minification.

use crate::minify::minify_value;
use crate::parser::{CssNode, ValuePart};

/// At-rules whose body nests style rules rather than raw declarations.
fn is_conditional_at_rule(name: &str) -> bool {
  matches!(name, "media" | "supports" | "container")
}

/// Serialize the tree into one rule string per top-level group. The order is
/// root declarations first, then nested rules and at-rules in source order.
pub fn serialize(nodes: &[CssNode], class_name: &str, minify: bool) -> Vec<String> {
  let root_selector = format!(".{class_name}");
  let mut rules = Vec::new();

  let root_decls = collect_declarations(nodes, minify);
  if !root_decls.is_empty() {
    rules.push(format!("{root_selector}{{{root_decls}}}"));
  }

  for node in nodes {
    match node {
      CssNode::Declaration { .. } => {}
      CssNode::Rule { selector, nodes } => {
        serialize_rule(selector, nodes, &root_selector, minify, &mut rules);
      }
      CssNode::AtRule {
        name,
        prelude,
        nodes,
      } => {
        serialize_at_rule(name, prelude, nodes, &root_selector, minify, &mut rules);
      }
    }
  }

  rules
}

fn serialize_rule(
  selector: &str,
  nodes: &[CssNode],
  parent_selector: &str,
  minify: bool,
  out: &mut Vec<String>,
) {
  let resolved = resolve_selector(selector, parent_selector);
  let decls = collect_declarations(nodes, minify);
  if !decls.is_empty() {
    out.push(format!("{resolved}{{{decls}}}"));
  }
  for node in nodes {
    match node {
      CssNode::Declaration { .. } => {}
      CssNode::Rule {
        selector: inner,
        nodes,
      } => serialize_rule(inner, nodes, &resolved, minify, out),
      CssNode::AtRule {
        name,
        prelude,
        nodes,
      } => serialize_at_rule(name, prelude, nodes, &resolved, minify, out),
    }
  }
}

fn serialize_at_rule(
  name: &str,
  prelude: &str,
  nodes: &[CssNode],
  parent_selector: &str,
  minify: bool,
  out: &mut Vec<String>,
) {
  let header = if prelude.is_empty() {
    format!("@{name}")
  } else {
    format!("@{name} {prelude}")
  };

  if is_conditional_at_rule(name) {
    // Children flatten as if at the rule's parent, then the whole group is
    // wrapped so the at-rule stays a single cache entry.
    let mut inner = Vec::new();
    let decls = collect_declarations(nodes, minify);
    if !decls.is_empty() {
      inner.push(format!("{parent_selector}{{{decls}}}"));
    }
    for node in nodes {
      match node {
        CssNode::Declaration { .. } => {}
        CssNode::Rule { selector, nodes } => {
          serialize_rule(selector, nodes, parent_selector, minify, &mut inner);
        }
        CssNode::AtRule {
          name,
          prelude,
          nodes,
        } => serialize_at_rule(name, prelude, nodes, parent_selector, minify, &mut inner),
      }
    }
    out.push(format!("{header}{{{}}}", inner.join("")));
    return;
  }

  // keyframes, font-face and friends carry their body verbatim, unscoped.
  out.push(format!("{header}{{{}}}", serialize_verbatim(nodes, minify)));
}

fn serialize_verbatim(nodes: &[CssNode], minify: bool) -> String {
  let mut body = String::new();
  for (index, node) in nodes.iter().enumerate() {
    match node {
      CssNode::Declaration { property, value } => {
        body.push_str(&format_declaration(property, value, minify));
        if index + 1 < nodes.len() {
          body.push(';');
        }
      }
      CssNode::Rule { selector, nodes } => {
        body.push_str(&format!("{selector}{{{}}}", serialize_verbatim(nodes, minify)));
      }
      CssNode::AtRule {
        name,
        prelude,
        nodes,
      } => {
        let header = if prelude.is_empty() {
          format!("@{name}")
        } else {
          format!("@{name} {prelude}")
        };
        body.push_str(&format!("{header}{{{}}}", serialize_verbatim(nodes, minify)));
      }
    }
  }
  body
}

// Declarations are separated by `;` with no terminator before the closing
// brace. Minified rules additionally carry their declarations in property
// order.
fn collect_declarations(nodes: &[CssNode], minify: bool) -> String {
  let mut decls: Vec<(&str, String)> = nodes
    .iter()
    .filter_map(|node| match node {
      CssNode::Declaration { property, value } => {
        Some((property.as_str(), format_declaration(property, value, minify)))
      }
      _ => None,
    })
    .collect();
  if minify {
    decls.sort_by(|a, b| a.0.cmp(b.0));
  }
  decls
    .into_iter()
    .map(|(_, text)| text)
    .collect::<Vec<_>>()
    .join(";")
}

fn format_declaration(property: &str, value: &[ValuePart], minify: bool) -> String {
  let text = value
    .iter()
    .map(|part| match part {
      ValuePart::Literal(text) => normalize_whitespace(text),
      // Unresolved placeholders never reach serialization; declarations go
      // through interpolation resolution first.
      ValuePart::Placeholder(_) => String::new(),
    })
    .collect::<String>();
  let text = text.trim();
  let text = if minify {
    minify_value(property, text)
  } else {
    text.to_string()
  };
  format!("{property}:{text}")
}

fn normalize_whitespace(text: &str) -> String {
  let mut out = String::new();
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
  if pending_space {
    out.push(' ');
  }
  out
}

/// Resolve a nested selector against its parent. `&` substitutes the parent;
/// a bare pseudo selector concatenates; anything else becomes a descendant.
fn resolve_selector(selector: &str, parent: &str) -> String {
  selector
    .split(',')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .map(|part| {
      if part.contains('&') {
        part.replace('&', parent)
      } else if part.starts_with(':') {
        format!("{parent}{part}")
      } else {
        format!("{parent} {part}")
      }
    })
    .collect::<Vec<_>>()
    .join(",")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decl(property: &str, value: &str) -> CssNode {
    CssNode::Declaration {
      property: property.to_string(),
      value: vec![ValuePart::Literal(value.to_string())],
    }
  }

  #[test]
  fn root_declarations_come_first() {
    let nodes = vec![
      CssNode::Rule {
        selector: "&:hover".into(),
        nodes: vec![decl("color", "red")],
      },
      decl("font-size", "12px"),
    ];
    let rules = serialize(&nodes, "cc-abc", false);
    assert_eq!(
      rules,
      vec![
        ".cc-abc{font-size:12px}".to_string(),
        ".cc-abc:hover{color:red}".to_string(),
      ]
    );
  }

  #[test]
  fn declarations_separate_without_a_terminator() {
    let nodes = vec![decl("font-size", "12px"), decl("width", "100%")];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc{font-size:12px;width:100%}".to_string()]
    );
  }

  #[test]
  fn ampersand_substitutes_the_parent() {
    let nodes = vec![CssNode::Rule {
      selector: "& > span".into(),
      nodes: vec![decl("margin", "0")],
    }];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc > span{margin:0}".to_string()]
    );
  }

  #[test]
  fn bare_pseudo_concatenates() {
    let nodes = vec![CssNode::Rule {
      selector: ":focus".into(),
      nodes: vec![decl("outline", "none")],
    }];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc:focus{outline:none}".to_string()]
    );
  }

  #[test]
  fn element_selector_becomes_descendant() {
    let nodes = vec![CssNode::Rule {
      selector: "div".into(),
      nodes: vec![decl("color", "blue")],
    }];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc div{color:blue}".to_string()]
    );
  }

  #[test]
  fn media_query_re_roots_its_children() {
    let nodes = vec![CssNode::AtRule {
      name: "media".into(),
      prelude: "(min-width: 30rem)".into(),
      nodes: vec![
        decl("user-select", "none"),
        CssNode::Rule {
          selector: "&:hover".into(),
          nodes: vec![decl("color", "red")],
        },
      ],
    }];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![
        "@media (min-width: 30rem){.cc-abc{user-select:none}.cc-abc:hover{color:red}}"
          .to_string()
      ]
    );
  }

  #[test]
  fn keyframes_body_is_not_scoped() {
    let nodes = vec![CssNode::AtRule {
      name: "keyframes".into(),
      prelude: "fade".into(),
      nodes: vec![
        CssNode::Rule {
          selector: "from".into(),
          nodes: vec![decl("opacity", "0")],
        },
        CssNode::Rule {
          selector: "to".into(),
          nodes: vec![decl("opacity", "1")],
        },
      ],
    }];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec!["@keyframes fade{from{opacity:0}to{opacity:1}}".to_string()]
    );
  }

  #[test]
  fn minify_flag_rewrites_values_and_sorts_declarations() {
    let nodes = vec![decl("font-size", "12px"), decl("color", "blue")];
    assert_eq!(
      serialize(&nodes, "cc-abc", true),
      vec![".cc-abc{color:#00f;font-size:9pt}".to_string()]
    );
  }

  #[test]
  fn unminified_declarations_keep_source_order() {
    let nodes = vec![decl("font-size", "12px"), decl("color", "blue")];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc{font-size:12px;color:blue}".to_string()]
    );
  }

  #[test]
  fn selector_lists_resolve_each_part() {
    let nodes = vec![CssNode::Rule {
      selector: "&:hover, &:focus".into(),
      nodes: vec![decl("color", "red")],
    }];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc:hover,.cc-abc:focus{color:red}".to_string()]
    );
  }

  #[test]
  fn whitespace_in_values_collapses() {
    let nodes = vec![decl("margin", "  0   auto ")];
    assert_eq!(
      serialize(&nodes, "cc-abc", false),
      vec![".cc-abc{margin:0 auto}".to_string()]
    );
  }
}
