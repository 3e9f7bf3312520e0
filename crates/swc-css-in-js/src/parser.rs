//! Incremental parser for the styling DSL's CSS subset. Consumes the
//! normalized token stream and produces a tree of rules, declarations, and
//! at-rules. Dynamic tokens survive as placeholder value parts at their exact
//! textual position; a dynamic token outside a declaration value is a
//! compile-time diagnostic.

use crate::errors::{ErrorKind, TransformError};
use crate::tokens::StyleToken;

// Control characters mark placeholder positions while the stream is in flat
// text form. They cannot occur in source-level CSS text.
const PLACEHOLDER_OPEN: char = '\u{1}';
const PLACEHOLDER_CLOSE: char = '\u{2}';

/// One fragment of a declaration value.
#[derive(Clone, Debug, PartialEq)]
pub enum ValuePart {
  Literal(String),
  /// Index into the call site's dynamic expression table.
  Placeholder(usize),
}

/// The CSS tree for one call site. Owned exclusively by that compilation
/// unit; never shared across call sites.
#[derive(Clone, Debug, PartialEq)]
pub enum CssNode {
  Rule {
    selector: String,
    nodes: Vec<CssNode>,
  },
  Declaration {
    property: String,
    value: Vec<ValuePart>,
  },
  AtRule {
    name: String,
    prelude: String,
    nodes: Vec<CssNode>,
  },
}

/// Parse a normalized token sequence into a CSS tree.
pub fn parse(tokens: &[StyleToken]) -> Result<Vec<CssNode>, TransformError> {
  let source = flatten(tokens);
  let chars: Vec<char> = source.chars().collect();
  let mut pos = 0usize;
  let nodes = parse_block(&chars, &mut pos, false)?;
  if pos < chars.len() {
    return Err(TransformError::new(
      ErrorKind::ParseError,
      "unbalanced `}` in style body",
    ));
  }
  Ok(nodes)
}

/// Render the token stream as flat text with placeholder markers, preserving
/// each dynamic token's exact position.
fn flatten(tokens: &[StyleToken]) -> String {
  let mut out = String::new();
  for token in tokens {
    match token {
      StyleToken::Static(text) => out.push_str(text),
      StyleToken::Dynamic { index, .. } => {
        out.push(PLACEHOLDER_OPEN);
        out.push_str(&index.to_string());
        out.push(PLACEHOLDER_CLOSE);
      }
    }
  }
  out
}

fn contains_placeholder(text: &str) -> bool {
  text.contains(PLACEHOLDER_OPEN)
}

fn parse_block(chars: &[char], pos: &mut usize, nested: bool) -> Result<Vec<CssNode>, TransformError> {
  let mut nodes = Vec::new();
  loop {
    skip_trivia(chars, pos);
    let Some(&ch) = chars.get(*pos) else {
      if nested {
        return Err(TransformError::new(
          ErrorKind::ParseError,
          "unexpected end of style body inside a block",
        ));
      }
      return Ok(nodes);
    };

    if ch == '}' {
      if nested {
        *pos += 1;
        return Ok(nodes);
      }
      return Err(TransformError::new(
        ErrorKind::ParseError,
        "unbalanced `}` in style body",
      ));
    }

    if ch == '@' {
      nodes.push(parse_at_rule(chars, pos)?);
      continue;
    }

    let (text, delimiter) = scan_to_delimiter(chars, pos);
    match delimiter {
      Some('{') => {
        let selector = text.trim().to_string();
        if contains_placeholder(&selector) {
          return Err(TransformError::new(
            ErrorKind::MalformedDeclaration,
            "dynamic expressions are not supported in selector position",
          ));
        }
        *pos += 1;
        let children = parse_block(chars, pos, true)?;
        nodes.push(CssNode::Rule {
          selector,
          nodes: children,
        });
      }
      Some(';') => {
        if let Some(node) = parse_declaration(&text)? {
          nodes.push(node);
        }
        *pos += 1;
      }
      // `}` or end of input terminates a trailing declaration without `;`.
      _ => {
        if let Some(node) = parse_declaration(&text)? {
          nodes.push(node);
        }
      }
    }
  }
}

fn parse_at_rule(chars: &[char], pos: &mut usize) -> Result<CssNode, TransformError> {
  *pos += 1; // consume `@`
  let mut name = String::new();
  while let Some(&ch) = chars.get(*pos) {
    if ch.is_ascii_alphanumeric() || ch == '-' {
      name.push(ch);
      *pos += 1;
    } else {
      break;
    }
  }
  if name.is_empty() {
    return Err(TransformError::new(
      ErrorKind::ParseError,
      "expected an at-rule name after `@`",
    ));
  }

  let (prelude, delimiter) = scan_to_delimiter(chars, pos);
  let prelude = prelude.trim().to_string();
  if contains_placeholder(&prelude) {
    return Err(TransformError::new(
      ErrorKind::MalformedDeclaration,
      format!("dynamic expressions are not supported in the `@{name}` prelude"),
    ));
  }

  match delimiter {
    Some('{') => {
      *pos += 1;
      let nodes = parse_block(chars, pos, true)?;
      Ok(CssNode::AtRule {
        name,
        prelude,
        nodes,
      })
    }
    Some(';') => {
      *pos += 1;
      Ok(CssNode::AtRule {
        name,
        prelude,
        nodes: Vec::new(),
      })
    }
    _ => Ok(CssNode::AtRule {
      name,
      prelude,
      nodes: Vec::new(),
    }),
  }
}

fn parse_declaration(text: &str) -> Result<Option<CssNode>, TransformError> {
  if text.trim().is_empty() {
    return Ok(None);
  }

  let Some(colon) = text.find(':') else {
    return Err(TransformError::new(
      ErrorKind::ParseError,
      format!("expected `:` in declaration `{}`", text.trim()),
    ));
  };

  let property = text[..colon].trim().to_string();
  if property.is_empty() {
    return Err(TransformError::new(
      ErrorKind::ParseError,
      "declaration is missing a property name",
    ));
  }
  if contains_placeholder(&property) {
    return Err(TransformError::new(
      ErrorKind::MalformedDeclaration,
      "dynamic expressions are not supported in property position",
    ));
  }

  let value = parse_value_parts(text[colon + 1..].trim());
  Ok(Some(CssNode::Declaration { property, value }))
}

fn parse_value_parts(text: &str) -> Vec<ValuePart> {
  let mut parts = Vec::new();
  let mut literal = String::new();
  let mut chars = text.chars().peekable();
  while let Some(ch) = chars.next() {
    if ch == PLACEHOLDER_OPEN {
      if !literal.is_empty() {
        parts.push(ValuePart::Literal(std::mem::take(&mut literal)));
      }
      let mut digits = String::new();
      for digit in chars.by_ref() {
        if digit == PLACEHOLDER_CLOSE {
          break;
        }
        digits.push(digit);
      }
      if let Ok(index) = digits.parse::<usize>() {
        parts.push(ValuePart::Placeholder(index));
      }
    } else {
      literal.push(ch);
    }
  }
  if !literal.is_empty() {
    parts.push(ValuePart::Literal(literal));
  }
  parts
}

/// Scan forward to the next top-level `{`, `;`, or `}`, respecting quotes,
/// parentheses, brackets, and comments. Leaves `pos` on the delimiter.
fn scan_to_delimiter(chars: &[char], pos: &mut usize) -> (String, Option<char>) {
  let mut text = String::new();
  let mut paren_depth = 0usize;
  let mut bracket_depth = 0usize;
  let mut quote: Option<char> = None;

  while let Some(&ch) = chars.get(*pos) {
    if let Some(open) = quote {
      text.push(ch);
      *pos += 1;
      if ch == '\\' {
        if let Some(&escaped) = chars.get(*pos) {
          text.push(escaped);
          *pos += 1;
        }
      } else if ch == open {
        quote = None;
      }
      continue;
    }

    match ch {
      '\'' | '"' => {
        quote = Some(ch);
        text.push(ch);
        *pos += 1;
      }
      '/' if chars.get(*pos + 1) == Some(&'*') => {
        skip_comment(chars, pos);
      }
      '(' => {
        paren_depth += 1;
        text.push(ch);
        *pos += 1;
      }
      ')' => {
        paren_depth = paren_depth.saturating_sub(1);
        text.push(ch);
        *pos += 1;
      }
      '[' => {
        bracket_depth += 1;
        text.push(ch);
        *pos += 1;
      }
      ']' => {
        bracket_depth = bracket_depth.saturating_sub(1);
        text.push(ch);
        *pos += 1;
      }
      '{' | ';' | '}' if paren_depth == 0 && bracket_depth == 0 => {
        return (text, Some(ch));
      }
      _ => {
        text.push(ch);
        *pos += 1;
      }
    }
  }

  (text, None)
}

fn skip_trivia(chars: &[char], pos: &mut usize) {
  loop {
    while chars.get(*pos).is_some_and(|ch| ch.is_whitespace()) {
      *pos += 1;
    }
    if chars.get(*pos) == Some(&'/') && chars.get(*pos + 1) == Some(&'*') {
      skip_comment(chars, pos);
      continue;
    }
    return;
  }
}

fn skip_comment(chars: &[char], pos: &mut usize) {
  *pos += 2;
  while let Some(&ch) = chars.get(*pos) {
    if ch == '*' && chars.get(*pos + 1) == Some(&'/') {
      *pos += 2;
      return;
    }
    *pos += 1;
  }
}
