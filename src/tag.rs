use regex::Regex;

lazy_static::lazy_static! {
  static ref PROGRAMMING_SUFFIX: Regex =
    Regex::new(r"(?i)(\s+programming)+$").expect("bad suffix regex");

  /// Canonical tag and the spellings that collapse into it.
  static ref SYNONYMS: Vec<(&'static str, Regex)> = [
    ("backend", r"(?i)back[\s-]end"),
    ("frontend", r"(?i)front[\s-]end"),
    ("fullstack", r"(?i)full[\s-]stack"),
  ]
  .into_iter()
  .map(|(canonical, pattern)| {
    (canonical, Regex::new(pattern).expect("bad synonym regex"))
  })
  .collect();
}

/// Canonicalizes a free-text category so keyword filtering can rely on
/// a small vocabulary.
///
/// Lowercases, strips a trailing " programming", rewrites the
/// back end/front end/full stack spellings to their single-token form
/// and trims. Never fails; an empty input gives an empty output.
pub fn normalize_tag(raw: &str) -> String {
  let lowered = raw.trim().to_lowercase();
  let mut normalized = PROGRAMMING_SUFFIX.replace(&lowered, "").into_owned();

  for (canonical, pattern) in SYNONYMS.iter() {
    if pattern.is_match(&normalized) {
      normalized = pattern.replace_all(&normalized, *canonical).into_owned();
    }
  }

  normalized.trim().to_string()
}

/// Normalizes each tag, dropping the ones that are or become empty.
/// Order is kept and duplicates are not merged.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  raw
    .into_iter()
    .filter(|tag| !tag.as_ref().trim().is_empty())
    .map(|tag| normalize_tag(tag.as_ref()))
    .filter(|tag| !tag.is_empty())
    .collect()
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_lowercase_and_suffix() {
    assert_eq!(normalize_tag("Rust Programming"), "rust");
    assert_eq!(normalize_tag("  DevOps  "), "devops");
    assert_eq!(normalize_tag("Programming"), "programming");
    assert_eq!(normalize_tag("go programming programming"), "go");
  }

  #[test]
  fn test_synonym_groups() {
    for raw in ["Back End", "back-end", "BACKEND", "Back-End Programming"] {
      assert_eq!(normalize_tag(raw), "backend", "input: {raw}");
    }
    for raw in ["Front End", "front-end", "Frontend"] {
      assert_eq!(normalize_tag(raw), "frontend", "input: {raw}");
    }
    for raw in ["Full Stack", "full-stack", "Fullstack Programming"] {
      assert_eq!(normalize_tag(raw), "fullstack", "input: {raw}");
    }

    assert_eq!(normalize_tag("Senior Back-End Engineer"), "senior backend engineer");
  }

  #[test]
  fn test_backend_variants_never_survive() {
    let inputs = [
      "back end",
      "Back-end dev",
      "senior BACK END",
      "backend programming",
      "ex-back-end, now front end",
    ];

    for raw in inputs {
      let normalized = normalize_tag(raw);
      assert!(normalized.contains("backend"), "{raw} -> {normalized}");
      assert!(!normalized.contains("back end"), "{raw} -> {normalized}");
      assert!(!normalized.contains("back-end"), "{raw} -> {normalized}");
    }
  }

  #[test]
  fn test_idempotent() {
    let inputs = [
      "",
      "   ",
      "Rust Programming ",
      "x programming programming",
      "Back  End",
      "front-end\tprogramming",
      "Full Stack Programming",
      "Ünïcödé Tag",
      "programming",
      " programming",
    ];

    for raw in inputs {
      let once = normalize_tag(raw);
      assert_eq!(normalize_tag(&once), once, "input: {raw:?}");
    }
  }

  #[test]
  fn test_empty_input() {
    assert_eq!(normalize_tag(""), "");
    assert_eq!(normalize_tag("   "), "");
  }

  #[test]
  fn test_normalize_tags_drops_empties_and_keeps_order() {
    let raw = ["Back End", "", "  ", "Remote", "remote", "Senior"];
    let normalized = normalize_tags(raw);

    assert_eq!(normalized, ["backend", "remote", "remote", "senior"]);
    assert!(normalized.len() <= raw.len());
    assert!(normalized.iter().all(|tag| !tag.is_empty()));
  }
}
