//! Size-reduction rewrites applied to individual declaration values when the
//! `minify` option is on. Every rewrite only fires when the replacement is
//! strictly shorter or equal, so minification is idempotent.

/// Minify one declaration value. The input is the serialized value text with
/// `var(...)` references already in place.
pub fn minify_value(property: &str, value: &str) -> String {
  // `--custom-property: value` pairs and quoted content pass through whole.
  if property.starts_with("--") {
    return value.to_string();
  }
  split_value_tokens(value)
    .into_iter()
    .map(|token| match token {
      ValueToken::Word(word) => minify_word(&word),
      ValueToken::Verbatim(text) => text,
    })
    .collect()
}

enum ValueToken {
  /// A bare word eligible for rewriting.
  Word(String),
  /// Whitespace, strings, or function tokens, carried through untouched.
  Verbatim(String),
}

fn split_value_tokens(value: &str) -> Vec<ValueToken> {
  let mut tokens = Vec::new();
  let mut word = String::new();
  let mut chars = value.chars().peekable();

  let flush = |word: &mut String, tokens: &mut Vec<ValueToken>| {
    if !word.is_empty() {
      tokens.push(ValueToken::Word(std::mem::take(word)));
    }
  };

  while let Some(ch) = chars.next() {
    match ch {
      '"' | '\'' => {
        flush(&mut word, &mut tokens);
        let mut text = String::from(ch);
        for inner in chars.by_ref() {
          text.push(inner);
          if inner == ch {
            break;
          }
        }
        tokens.push(ValueToken::Verbatim(text));
      }
      '(' => {
        // The word so far is a function name; swallow through the matching
        // close so `var(--var-x)` and `url(...)` are never rewritten.
        word.push(ch);
        let mut depth = 1usize;
        for inner in chars.by_ref() {
          word.push(inner);
          match inner {
            '(' => depth += 1,
            ')' => {
              depth -= 1;
              if depth == 0 {
                break;
              }
            }
            _ => {}
          }
        }
        tokens.push(ValueToken::Verbatim(std::mem::take(&mut word)));
      }
      ch if ch.is_whitespace() || ch == ',' || ch == '/' => {
        flush(&mut word, &mut tokens);
        tokens.push(ValueToken::Verbatim(ch.to_string()));
      }
      _ => word.push(ch),
    }
  }
  flush(&mut word, &mut tokens);
  tokens
}

fn minify_word(word: &str) -> String {
  if let Some(hex) = named_color_hex(word) {
    if hex.len() <= word.len() {
      return hex.to_string();
    }
  }
  if let Some(short) = shorten_hex(word) {
    return short;
  }
  if let Some(shorter) = rewrite_numeric(word) {
    return shorter;
  }
  word.to_string()
}

/// Named colors with a hex form at most as long as the name.
fn named_color_hex(word: &str) -> Option<&'static str> {
  let hex = match word.to_ascii_lowercase().as_str() {
    "black" => "#000",
    "white" => "#fff",
    "blue" => "#00f",
    "aqua" | "cyan" => "#0ff",
    "lime" => "#0f0",
    "red" => "#f00",
    "yellow" => "#ff0",
    "fuchsia" | "magenta" => "#f0f",
    "rebeccapurple" => "#639",
    _ => return None,
  };
  Some(hex)
}

/// `#rrggbb` collapses to `#rgb` when each channel repeats its nibble.
fn shorten_hex(word: &str) -> Option<String> {
  let digits = word.strip_prefix('#')?;
  if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
    return None;
  }
  let bytes = digits.as_bytes();
  if bytes[0].eq_ignore_ascii_case(&bytes[1])
    && bytes[2].eq_ignore_ascii_case(&bytes[3])
    && bytes[4].eq_ignore_ascii_case(&bytes[5])
  {
    let lower = digits.to_ascii_lowercase().into_bytes();
    return Some(format!(
      "#{}{}{}",
      lower[0] as char, lower[2] as char, lower[4] as char
    ));
  }
  None
}

fn rewrite_numeric(word: &str) -> Option<String> {
  let split = word
    .char_indices()
    .find(|(_, ch)| !(ch.is_ascii_digit() || *ch == '.' || *ch == '-' || *ch == '+'))
    .map(|(index, _)| index)
    .unwrap_or(word.len());
  let (number_text, unit) = word.split_at(split);
  if number_text.is_empty() || !unit.chars().all(|ch| ch.is_ascii_alphabetic() || ch == '%') {
    return None;
  }
  let number: f64 = number_text.parse().ok()?;

  // A zero length needs no unit; percentages keep theirs (`0%` is not `0`
  // inside e.g. flex shorthands, but for lengths the unit is dead weight).
  if number == 0.0 && !unit.is_empty() && unit != "%" && unit != "s" && unit != "ms" {
    return Some("0".to_string());
  }

  // px converts to pt when the result is integral and strictly shorter.
  if unit == "px" {
    let pt = number * 0.75;
    if pt.fract() == 0.0 {
      let candidate = format!("{}pt", pt as i64);
      if candidate.len() < word.len() {
        return Some(candidate);
      }
    }
  }

  // Drop a leading zero before the decimal point.
  if let Some(stripped) = number_text.strip_prefix("0.") {
    return Some(format!(".{stripped}{unit}"));
  }
  if let Some(stripped) = number_text.strip_prefix("-0.") {
    return Some(format!("-.{stripped}{unit}"));
  }

  None
}
