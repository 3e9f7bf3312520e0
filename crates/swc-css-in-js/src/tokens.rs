//! Normalizes the two source-level style shapes (template literals with
//! interpolations, and nested style objects) into one ordered token stream the
//! CSS parser consumes.

use swc_core::common::{Span, Spanned};
use swc_core::ecma::ast::{Expr, Lit, ObjectLit, Prop, PropName, PropOrSpread, Tpl};

use crate::constants::is_unitless_property;
use crate::errors::{ErrorKind, TransformError};

/// One element of the normalized style body. Insertion order is source order;
/// the sequence is immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleToken {
  Static(String),
  /// A dynamic expression at this textual position. `index` points into
  /// [`NormalizedStyle::expressions`].
  Dynamic { index: usize, span: Span },
}

/// A normalized style body: the token stream plus the side table of captured
/// dynamic expressions referenced by index.
#[derive(Clone, Debug, Default)]
pub struct NormalizedStyle {
  pub tokens: Vec<StyleToken>,
  pub expressions: Vec<Box<Expr>>,
}

impl NormalizedStyle {
  fn push_static(&mut self, text: impl Into<String>) {
    let text = text.into();
    if text.is_empty() {
      return;
    }
    // Merge adjacent static chunks so the parser sees contiguous text.
    if let Some(StyleToken::Static(existing)) = self.tokens.last_mut() {
      existing.push_str(&text);
      return;
    }
    self.tokens.push(StyleToken::Static(text));
  }

  fn push_dynamic(&mut self, expr: &Expr) -> Result<(), TransformError> {
    if matches!(expr, Expr::Arrow(_) | Expr::Fn(_)) {
      return Err(TransformError::with_span(
        ErrorKind::UnsupportedStyleShape,
        "function-valued styles cannot be statically classified",
        expr.span(),
      ));
    }
    self.tokens.push(StyleToken::Dynamic {
      index: self.expressions.len(),
      span: expr.span(),
    });
    self.expressions.push(Box::new(expr.clone()));
    Ok(())
  }
}

/// Normalize a tagged template body: quasis become static chunks and each
/// interpolation becomes a dynamic token at its exact position.
pub fn from_template(tpl: &Tpl) -> Result<NormalizedStyle, TransformError> {
  let mut out = NormalizedStyle::default();
  for (idx, quasi) in tpl.quasis.iter().enumerate() {
    let text = quasi
      .cooked
      .as_ref()
      .map(|cooked| cooked.to_string())
      .unwrap_or_else(|| quasi.raw.to_string());
    out.push_static(text);
    if let Some(expr) = tpl.exprs.get(idx) {
      out.push_dynamic(expr)?;
    }
  }
  Ok(out)
}

/// Normalize a plain string body.
pub fn from_text(text: &str) -> NormalizedStyle {
  let mut out = NormalizedStyle::default();
  out.push_static(text);
  out
}

/// Normalize an object-form body. Nested objects become selector text
/// reconstructed from the nesting path; camelCase keys are kebab-cased and
/// bare numbers receive `px` unless the property is unitless.
pub fn from_object(object: &ObjectLit) -> Result<NormalizedStyle, TransformError> {
  let mut out = NormalizedStyle::default();
  walk_object(object, &mut out)?;
  Ok(out)
}

fn walk_object(object: &ObjectLit, out: &mut NormalizedStyle) -> Result<(), TransformError> {
  for prop in &object.props {
    let prop = match prop {
      PropOrSpread::Prop(prop) => prop.as_ref(),
      PropOrSpread::Spread(spread) => {
        return Err(TransformError::with_span(
          ErrorKind::UnsupportedStyleShape,
          "spread entries in style objects cannot be statically classified",
          spread.expr.span(),
        ));
      }
    };

    match prop {
      Prop::KeyValue(entry) => {
        let key = prop_name_text(&entry.key)?;
        write_entry(&key, &entry.value, out)?;
      }
      Prop::Shorthand(ident) => {
        // `{ color }` is a dynamic value referencing the binding.
        let property = to_kebab_case(&ident.sym);
        out.push_static(format!("{property}:"));
        out.push_dynamic(&Expr::Ident(ident.clone()))?;
        out.push_static(";");
      }
      other => {
        return Err(TransformError::with_span(
          ErrorKind::UnsupportedStyleShape,
          "style objects support only plain key/value entries",
          other.span(),
        ));
      }
    }
  }
  Ok(())
}

fn write_entry(key: &str, value: &Expr, out: &mut NormalizedStyle) -> Result<(), TransformError> {
  match value {
    // Nested object: the key is selector (or at-rule) text, not a property.
    Expr::Object(nested) => {
      out.push_static(format!("{key}{{"));
      walk_object(nested, out)?;
      out.push_static("}");
      Ok(())
    }
    Expr::Lit(Lit::Str(text)) => {
      let property = to_kebab_case(key);
      out.push_static(format!("{property}:{};", text.value));
      Ok(())
    }
    Expr::Lit(Lit::Num(number)) => {
      let property = to_kebab_case(key);
      out.push_static(format!(
        "{property}:{};",
        format_numeric_value(&property, number.value)
      ));
      Ok(())
    }
    Expr::Lit(other) => Err(TransformError::with_span(
      ErrorKind::UnsupportedStyleShape,
      "style values must be strings, numbers, nested objects, or expressions",
      other.span(),
    )),
    Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
      let property = to_kebab_case(key);
      let text = tpl
        .quasis
        .first()
        .and_then(|quasi| quasi.cooked.as_ref())
        .map(|cooked| cooked.to_string())
        .unwrap_or_default();
      out.push_static(format!("{property}:{text};"));
      Ok(())
    }
    expr => {
      let property = to_kebab_case(key);
      out.push_static(format!("{property}:"));
      out.push_dynamic(expr)?;
      out.push_static(";");
      Ok(())
    }
  }
}

fn prop_name_text(name: &PropName) -> Result<String, TransformError> {
  match name {
    PropName::Ident(ident) => Ok(ident.sym.to_string()),
    PropName::Str(text) => Ok(text.value.to_string()),
    PropName::Num(number) => Ok(format_number(number.value)),
    other => Err(TransformError::with_span(
      ErrorKind::UnsupportedStyleShape,
      "computed style object keys cannot be statically classified",
      other.span(),
    )),
  }
}

/// `fontSize` -> `font-size`. Keys that are already kebab-case, custom
/// properties, or selectors pass through unchanged.
pub fn to_kebab_case(input: &str) -> String {
  let mut out = String::with_capacity(input.len() + 4);
  for (idx, ch) in input.chars().enumerate() {
    if ch.is_ascii_uppercase() {
      if idx != 0 {
        out.push('-');
      }
      out.push(ch.to_ascii_lowercase());
    } else {
      out.push(ch);
    }
  }
  out
}

fn format_numeric_value(property: &str, value: f64) -> String {
  let number = format_number(value);
  if value == 0.0 || is_unitless_property(property) {
    number
  } else {
    format!("{number}px")
  }
}

fn format_number(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{}", value as i64)
  } else {
    format!("{value}")
  }
}
