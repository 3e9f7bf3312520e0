//! murmurhash2 (the `gc` JavaScript variant) rendered as base36, matching the
//! output of the hash the JavaScript CSS-in-JS packages use for class names and
//! custom property names. Keeping it bit-compatible means styles hashed at
//! build time agree with anything hashed by the runtime.

const M: u32 = 0x5bd1e995;

/// Hash `input` with the given seed and render the result as a base36 string,
/// equivalent to JavaScript's `(h >>> 0).toString(36)`.
pub fn hash(input: &str, seed: u32) -> String {
  to_base36(murmur2_gc(input, seed))
}

/// The JavaScript implementation iterates UTF-16 code units and masks each to
/// its low byte, so this does the same rather than hashing UTF-8 bytes.
fn murmur2_gc(input: &str, seed: u32) -> u32 {
  let units: Vec<u32> = input.encode_utf16().map(|u| u32::from(u) & 0xff).collect();
  let mut h = seed ^ (units.len() as u32);
  let mut rest = units.as_slice();

  while let &[a, b, c, d, ref tail @ ..] = rest {
    let mut k = a | (b << 8) | (c << 16) | (d << 24);
    k = k.wrapping_mul(M);
    k ^= k >> 24;
    k = k.wrapping_mul(M);
    h = h.wrapping_mul(M) ^ k;
    rest = tail;
  }

  match *rest {
    [a, b, c] => {
      h ^= c << 16;
      h ^= b << 8;
      h ^= a;
      h = h.wrapping_mul(M);
    }
    [a, b] => {
      h ^= b << 8;
      h ^= a;
      h = h.wrapping_mul(M);
    }
    [a] => {
      h ^= a;
      h = h.wrapping_mul(M);
    }
    _ => {}
  }

  h ^= h >> 13;
  h = h.wrapping_mul(M);
  h ^ (h >> 15)
}

fn to_base36(mut value: u32) -> String {
  const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

  if value == 0 {
    return "0".to_string();
  }

  let mut buf = [0u8; 7];
  let mut idx = buf.len();
  while value > 0 {
    idx -= 1;
    buf[idx] = DIGITS[(value % 36) as usize];
    value /= 36;
  }

  buf[idx..].iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
  use super::hash;

  // Known answers produced by the JavaScript murmurhash2_gc implementation.
  #[test]
  fn matches_javascript_output() {
    assert_eq!(hash("blue", 0), "13q2bts");
    assert_eq!(hash("block", 0), "1ulexfb");
    assert_eq!(hash("12px", 0), "1fwxnve");
    assert_eq!(hash("none", 0), "glywfm");
    assert_eq!(hash("center", 0), "1h6ojuz");
  }

  #[test]
  fn seed_changes_output() {
    assert_eq!(hash("compiled", 0), "3mvezc");
    assert_eq!(hash("compiled", 1), "yzbs45");
  }

  #[test]
  fn empty_input_hashes_to_seed_mix() {
    // Deterministic, and stable across runs.
    assert_eq!(hash("", 0), hash("", 0));
    assert_ne!(hash("", 0), hash("", 1));
  }

  #[test]
  fn remainder_lengths_are_covered() {
    // 1 through 4 trailing code units all take distinct tail paths.
    let outputs: Vec<String> = ["a", "ab", "abc", "abcd", "abcde"]
      .iter()
      .map(|s| hash(s, 0))
      .collect();
    for (i, left) in outputs.iter().enumerate() {
      for right in outputs.iter().skip(i + 1) {
        assert_ne!(left, right);
      }
    }
  }
}
