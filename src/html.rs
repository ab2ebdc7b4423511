use scraper::{Html, Selector};

lazy_static::lazy_static! {
  static ref SCRIPT: Selector = Selector::parse("script").expect("bad selector");
}

/// Body of an inline `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineScript {
  pub id: Option<String>,
  pub text: String,
}

/// Inline scripts in document order. Scripts loaded through `src` have
/// no body and are skipped.
pub fn inline_scripts(doc: &Html) -> Vec<InlineScript> {
  doc
    .select(&SCRIPT)
    .filter_map(|elem| {
      let text: String = elem.text().collect();
      if text.trim().is_empty() {
        return None;
      }

      Some(InlineScript {
        id: elem.value().id().map(str::to_string),
        text,
      })
    })
    .collect()
}

/// Text content of a markup fragment with entities decoded and
/// whitespace collapsed.
pub fn strip_markup(fragment: &str) -> String {
  let html = Html::parse_fragment(fragment);
  // text nodes of sibling elements would otherwise run together
  let text = html.root_element().text().collect::<Vec<_>>().join(" ");
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}
