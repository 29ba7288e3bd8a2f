//! Table of contents generation and placement.
//!
//! The TOC is a nested bullet list of every heading except the first, which
//! is taken to be the document title. It can be placed at a placeholder:
//!
//! ```markdown
//! [[_TOC_]]
//! ```
//!
//! or, equivalently, an empty fenced block with the `toc` info string. Without
//! a placeholder it goes directly below the first heading.
use std::sync::LazyLock;

use regex::Regex;

use crate::{headings::scan_headings, utils::builtin_regex};

/// Spaces of indentation per nesting level.
pub const TOC_INDENT: usize = 4;

/// Placeholder line marking where the TOC is inserted.
pub const TOC_PLACEHOLDER: &str = "[[_TOC_]]";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
  builtin_regex(
    "PLACEHOLDER_RE",
    &format!(
      r"(?m)\n*^[ \t]*(?:{}|```toc\s*```)[ \t]*$\n*",
      regex::escape(TOC_PLACEHOLDER)
    ),
  )
});

/// Build the table of contents for a fully assembled document.
///
/// Headings are indented relative to an indent base: level 1 when the
/// document has several top-level headings, level 2 when it has at most one.
/// Anchored headings become links, others are listed as plain text.
///
/// # Examples
///
/// ```
/// use mdcomp_core::toc::build_toc;
///
/// let doc = "# Guide {#guide}\n\n## Setup {#setup}\n\n### Nix {#nix}";
/// assert_eq!(build_toc(doc), "- [Setup](#setup)\n    - [Nix](#nix)");
/// ```
#[must_use]
pub fn build_toc(text: &str) -> String {
  let headings = scan_headings(text);
  let Some((_title, rest)) = headings.split_first() else {
    return String::new();
  };

  let top_level = headings.iter().filter(|m| m.heading.level == 1).count();
  let indent_base = if top_level > 1 { 1 } else { 2 };

  let mut toc = String::new();
  for entry in rest {
    let heading = &entry.heading;
    let indent = heading.level.saturating_sub(indent_base) * TOC_INDENT;
    toc.push_str(&" ".repeat(indent));
    toc.push_str("- ");
    match &heading.anchor {
      Some(anchor) => {
        toc.push('[');
        toc.push_str(&heading.text);
        toc.push_str("](");
        toc.push_str(anchor);
        toc.push(')');
      },
      None => toc.push_str(&heading.text),
    }
    toc.push('\n');
  }

  toc.trim_end().to_string()
}

/// Whether `text` contains a TOC placeholder.
#[must_use]
pub fn has_placeholder(text: &str) -> bool {
  PLACEHOLDER_RE.is_match(text)
}

/// Insert `toc` into `text`.
///
/// The first placeholder is replaced with the TOC. Without a placeholder the
/// TOC is placed right after the first heading line. The TOC is always
/// surrounded by blank lines. Other placeholders are left for
/// [`strip_placeholders`].
#[must_use]
pub fn insert_toc(text: &str, toc: &str) -> String {
  let block = if toc.is_empty() {
    "\n\n".to_string()
  } else {
    format!("\n\n{toc}\n\n")
  };

  if let Some(found) = PLACEHOLDER_RE.find(text) {
    return format!("{}{block}{}", &text[..found.start()], &text[found.end()..]);
  }

  if toc.is_empty() {
    return text.to_string();
  }

  match scan_headings(text).first() {
    Some(first) => {
      let rest = text[first.span.end..].trim_start_matches(['\r', '\n']);
      format!("{}{block}{rest}", &text[..first.span.end])
    },
    None => text.to_string(),
  }
}

/// Remove every remaining placeholder, leaving a blank line in its place.
///
/// The result is trimmed.
#[must_use]
pub fn strip_placeholders(text: &str) -> String {
  PLACEHOLDER_RE.replace_all(text, "\n\n").trim().to_string()
}
