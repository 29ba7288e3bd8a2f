//! ATX heading scanning and rewriting.
//!
//! Only single-line `#` headings are recognized. A heading may carry a
//! trailing `{...}` annotation which is treated as its anchor id and kept
//! verbatim, e.g. `## Install {#install}`.
use std::sync::LazyLock;

use regex::Regex;

use crate::{
  types::{Heading, HeadingMatch},
  utils::{builtin_regex, line_spans, slugify},
};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  builtin_regex(
    "HEADING_RE",
    r"^(#+)[ \t]+(.*?)(?:[ \t]*\{([^{}]*)\})?[ \t]*$",
  )
});

/// Parse a single line as a heading.
///
/// Returns `None` for lines that are not headings, including lines whose text
/// is empty once the annotation is removed (`"# {#x}"`).
#[must_use]
pub fn parse_heading(line: &str) -> Option<Heading> {
  let caps = HEADING_RE.captures(line)?;
  let text = caps.get(2)?.as_str().trim();
  if text.is_empty() {
    return None;
  }

  Some(Heading {
    level:  caps.get(1)?.as_str().len(),
    text:   text.to_string(),
    anchor: caps.get(3).map(|m| m.as_str().to_string()),
  })
}

/// Find every heading line in `text`, in document order.
#[must_use]
pub fn scan_headings(text: &str) -> Vec<HeadingMatch> {
  line_spans(text)
    .filter_map(|(span, line)| {
      parse_heading(line).map(|heading| HeadingMatch { span, heading })
    })
    .collect()
}

/// Anchor id generated for a heading without an explicit annotation.
///
/// Returns `None` when the heading text has no sluggable characters.
#[must_use]
pub fn generated_anchor(text: &str) -> Option<String> {
  let slug = slugify(text);
  (!slug.is_empty()).then(|| format!("#{slug}"))
}

/// Rewrite every heading line in `text`.
///
/// With `shift_levels`, each heading moves one level down (`#` becomes
/// `##`). With `assign_ids`, headings without an annotation get a generated
/// `{#slug}` anchor. Existing annotations are always preserved. Each heading
/// line is replaced in place, so identical lines are rewritten independently.
///
/// The result is trimmed.
#[must_use]
pub fn rewrite_headings(
  text: &str,
  shift_levels: bool,
  assign_ids: bool,
) -> String {
  let mut output = String::with_capacity(text.len() + text.len() / 8);
  let mut cursor = 0;

  for HeadingMatch { span, mut heading } in scan_headings(text) {
    if shift_levels {
      heading.level += 1;
    }
    if heading.anchor.is_none() && assign_ids {
      heading.anchor = generated_anchor(&heading.text);
    }

    output.push_str(&text[cursor..span.start]);
    output.push_str(&heading.to_string());
    cursor = span.end;
  }
  output.push_str(&text[cursor..]);

  output.trim().to_string()
}
