//! Locating JSON objects embedded in script source by brace counting.
//!
//! A regex cannot find where an object literal ends once it contains
//! nested objects or is followed by more code on the same line, so the
//! scan tracks brace depth and skips over string literals.

/// Bytes scanned for a single object before giving up.
const MAX_SCAN_BYTES: usize = 8 * 1024 * 1024;
/// Nesting beyond this is not a data payload we care about.
const MAX_DEPTH: usize = 512;
/// Start positions tried by [`top_level_objects`] per script.
const MAX_CANDIDATES: usize = 256;

/// Given text beginning with `{`, returns the slice up to and including
/// the matching `}`.
pub fn balanced_object(text: &str) -> Option<&str> {
  let bytes = text.as_bytes();
  if bytes.first() != Some(&b'{') {
    return None;
  }

  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (i, &b) in bytes.iter().enumerate().take(MAX_SCAN_BYTES) {
    if in_string {
      if escaped {
        escaped = false;
      } else if b == b'\\' {
        escaped = true;
      } else if b == b'"' {
        in_string = false;
      }
      continue;
    }

    match b {
      b'"' => in_string = true,
      b'{' => {
        depth += 1;
        if depth > MAX_DEPTH {
          return None;
        }
      }
      b'}' => {
        depth -= 1;
        if depth == 0 {
          // `}` is ASCII, so i + 1 is a char boundary
          return Some(&text[..=i]);
        }
      }
      _ => {}
    }
  }

  None
}

/// Every balanced object that is not nested inside another one, in
/// source order.
pub fn top_level_objects(text: &str) -> Vec<&str> {
  let mut objects = vec![];
  let mut offset = 0;

  for _ in 0..MAX_CANDIDATES {
    let Some(pos) = text[offset..].find('{') else {
      break;
    };
    let start = offset + pos;

    match balanced_object(&text[start..]) {
      Some(object) => {
        objects.push(object);
        offset = start + object.len();
      }
      None => offset = start + 1,
    }
  }

  objects
}
