//! Include directive scanning and splicing.
//!
//! An include directive occupies a whole line:
//!
//! ```markdown
//! :[Installation](chapters/install.md)
//! ```
//!
//! The splicing logic here is independent of where included content comes
//! from. [`crate::Compiler`] supplies a callback that compiles the target, or
//! declines when the target is missing or already being expanded.
use std::{
  path::{Path, PathBuf},
  sync::LazyLock,
};

use regex::Regex;

use crate::{
  error::CompileResult,
  types::IncludeDirective,
  utils::{builtin_regex, line_spans},
};

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
  builtin_regex("INCLUDE_RE", r"^:\[([^\]]+)\]\(([^)\s]+)\)[ \t]*$")
});

/// Files currently being expanded within one top-level compile.
///
/// A file is pushed while its own includes are resolved and popped
/// afterwards, so it may be included again from a sibling branch but never
/// from inside itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OpenFiles {
  stack: Vec<PathBuf>,
}

impl OpenFiles {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn contains(&self, file: &Path) -> bool {
    self.stack.iter().any(|open| open == file)
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.stack.is_empty()
  }

  /// Number of files currently open.
  #[must_use]
  pub fn depth(&self) -> usize {
    self.stack.len()
  }

  /// Mark `file` as being expanded.
  ///
  /// Returns `false` without modifying the stack if it is already open.
  pub fn push(&mut self, file: &Path) -> bool {
    if self.contains(file) {
      return false;
    }
    self.stack.push(file.to_path_buf());
    true
  }

  pub fn pop(&mut self) -> Option<PathBuf> {
    self.stack.pop()
  }

  /// Iterate over open files, outermost first.
  pub fn iter(&self) -> impl Iterator<Item = &Path> {
    self.stack.iter().map(PathBuf::as_path)
  }
}

/// Parse a single line as an include directive.
#[must_use]
pub fn parse_include(line: &str) -> Option<(String, String)> {
  let caps = INCLUDE_RE.captures(line)?;
  Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
}

/// Find every include directive in `text`, in document order.
#[must_use]
pub fn scan_includes(text: &str) -> Vec<IncludeDirective> {
  line_spans(text)
    .filter_map(|(span, line)| {
      parse_include(line).map(|(label, target)| {
        IncludeDirective {
          span,
          literal: line.to_string(),
          label,
          target,
        }
      })
    })
    .collect()
}

/// Resolve the include directives in `text`.
///
/// If `text` contains no directives it is returned trimmed. Otherwise
/// `current` is pushed onto `open` for the duration of the expansion and
/// `expand` is called once per directive, in order. `Some(content)` splices
/// the content in place of the directive, separated from its surroundings by
/// single blank lines; `None` removes the directive line.
///
/// # Errors
///
/// Returns the first error produced by `expand`. `current` is popped from
/// `open` before the error is returned.
pub fn resolve_includes<F>(
  text: &str,
  current: &Path,
  open: &mut OpenFiles,
  mut expand: F,
) -> CompileResult<String>
where
  F: FnMut(&IncludeDirective, &mut OpenFiles) -> CompileResult<Option<String>>,
{
  let directives = scan_includes(text);
  if directives.is_empty() {
    return Ok(text.trim().to_string());
  }

  let pushed = open.push(current);
  let spliced = splice(text, &directives, |directive| expand(directive, open));
  if pushed {
    open.pop();
  }

  Ok(spliced?.trim().to_string())
}

/// How the next segment joins the output after a directive was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
  /// Copy the segment as is.
  Verbatim,
  /// Content was spliced in: leading newlines become one blank line.
  Blank,
  /// A directive was dropped: a run of blank lines becomes one blank line, a
  /// plain line break stays a line break.
  Collapse,
}

/// Replace each directive span with the result of `expand`.
///
/// Blank lines directly before a directive are consumed. The blank lines that
/// follow it collapse into at most a single blank-line separator before the
/// next text, whether the directive was expanded or dropped.
fn splice<F>(
  text: &str,
  directives: &[IncludeDirective],
  mut expand: F,
) -> CompileResult<String>
where
  F: FnMut(&IncludeDirective) -> CompileResult<Option<String>>,
{
  let mut output = String::with_capacity(text.len());
  let mut cursor = 0;
  let mut pending = Separator::Verbatim;

  for directive in directives {
    push_segment(&mut output, &text[cursor..directive.span.start], &mut pending);
    let kept = output.trim_end_matches('\n').len();
    output.truncate(kept);

    if let Some(content) = expand(directive)? {
      let content = content.trim();
      if !content.is_empty() {
        output.push_str("\n\n");
        output.push_str(content);
      }
      pending = Separator::Blank;
    } else if pending == Separator::Verbatim && !output.is_empty() {
      pending = Separator::Collapse;
    }

    cursor = directive.span.end;
  }
  push_segment(&mut output, &text[cursor..], &mut pending);

  Ok(output)
}

fn push_segment(output: &mut String, segment: &str, pending: &mut Separator) {
  if *pending == Separator::Verbatim {
    output.push_str(segment);
    return;
  }

  let rest = segment.trim_start_matches('\n');
  if rest.is_empty() {
    return;
  }

  let newlines = segment.len() - rest.len();
  if *pending == Separator::Blank || newlines > 1 {
    output.push_str("\n\n");
  } else {
    output.push('\n');
  }
  output.push_str(rest);
  *pending = Separator::Verbatim;
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use std::collections::HashMap;

  use super::*;

  fn resolve_with(text: &str, parts: &HashMap<&str, &str>) -> String {
    let mut open = OpenFiles::new();
    resolve_includes(text, Path::new("root.md"), &mut open, |d, _| {
      Ok(parts.get(d.target.as_str()).map(ToString::to_string))
    })
    .unwrap()
  }

  #[test]
  fn test_parse_include() {
    assert_eq!(
      parse_include(":[Intro](intro.md)  "),
      Some(("Intro".to_string(), "intro.md".to_string()))
    );
    assert_eq!(parse_include(":[](intro.md)"), None);
    assert_eq!(parse_include(":[Intro](two words.md)"), None);
    assert_eq!(parse_include("see :[Intro](intro.md)"), None);
    assert_eq!(parse_include(":[Intro](intro.md) trailing"), None);
    assert_eq!(parse_include("[Intro](intro.md)"), None);
  }

  #[test]
  fn test_scan_includes_keeps_order_and_literal() {
    let text = "# T\n:[a](a.md)\t\ntext\n:[b](b.md)";
    let found = scan_includes(text);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].target, "a.md");
    assert_eq!(found[0].literal, ":[a](a.md)\t");
    assert_eq!(found[1].label, "b");
    assert_eq!(&text[found[1].span.clone()], ":[b](b.md)");
  }

  #[test]
  fn test_no_directives_returns_trimmed_text() {
    let mut open = OpenFiles::new();
    let out =
      resolve_includes("\n\ntext\n\n", Path::new("a.md"), &mut open, |_, _| {
        unreachable!("no directives to expand")
      })
      .unwrap();
    assert_eq!(out, "text");
    assert!(open.is_empty());
  }

  #[test]
  fn test_splices_content_between_blank_lines() {
    let parts = HashMap::from([("b.md", "B body")]);
    let out = resolve_with("A\n\n:[b](b.md)\n\nC\n", &parts);
    assert_eq!(out, "A\n\nB body\n\nC");
  }

  #[test]
  fn test_adjacent_includes_do_not_pile_up_blank_lines() {
    let parts = HashMap::from([("a.md", "A"), ("b.md", "B")]);
    let out = resolve_with("Top\n:[a](a.md)\n:[b](b.md)\n\n\n\nEnd", &parts);
    assert_eq!(out, "Top\n\nA\n\nB\n\nEnd");
  }

  #[test]
  fn test_dropped_directive_leaves_single_blank_line() {
    let parts = HashMap::new();
    let out = resolve_with("A\n\n:[x](missing.md)\n\nB", &parts);
    assert_eq!(out, "A\n\nB");

    let out = resolve_with("A\n:[x](missing.md)\nB", &parts);
    assert_eq!(out, "A\nB");
  }

  #[test]
  fn test_dropped_directive_collapses_following_blank_lines() {
    let parts = HashMap::from([("a.md", "X")]);
    let dropped = resolve_with("A\n\n:[x](missing.md)\n\n\n\nB", &parts);
    let spliced = resolve_with("A\n\n:[x](a.md)\n\n\n\nB", &parts);

    assert_eq!(dropped, "A\n\nB");
    assert_eq!(spliced, "A\n\nX\n\nB");
    assert!(!dropped.contains("\n\n\n"));
  }

  #[test]
  fn test_consecutive_dropped_directives() {
    let parts = HashMap::new();
    let out = resolve_with("A\n\n:[x](x.md)\n\n\n:[y](y.md)\n\n\nB", &parts);
    assert_eq!(out, "A\n\nB");

    let out = resolve_with("A\n:[x](x.md)\n:[y](y.md)\nB", &parts);
    assert_eq!(out, "A\nB");
  }

  #[test]
  fn test_dropped_directive_after_splice() {
    let parts = HashMap::from([("a.md", "A")]);
    let out = resolve_with("Top\n\n:[a](a.md)\n:[x](x.md)\n\nEnd", &parts);
    assert_eq!(out, "Top\n\nA\n\nEnd");
  }

  #[test]
  fn test_empty_included_content() {
    let parts = HashMap::from([("empty.md", "")]);
    let out = resolve_with("A\n\n:[e](empty.md)\n\nB", &parts);
    assert_eq!(out, "A\n\nB");
  }

  #[test]
  fn test_identical_directives_are_expanded_separately() {
    let mut calls = 0;
    let mut open = OpenFiles::new();
    let out = resolve_includes(
      ":[a](a.md)\n\nmid\n\n:[a](a.md)",
      Path::new("root.md"),
      &mut open,
      |_, _| {
        calls += 1;
        Ok(Some(format!("A{calls}")))
      },
    )
    .unwrap();
    assert_eq!(out, "A1\n\nmid\n\nA2");
    assert_eq!(calls, 2);
  }

  #[test]
  fn test_current_file_is_open_during_expansion() {
    let mut open = OpenFiles::new();
    resolve_includes(
      ":[a](a.md)",
      Path::new("root.md"),
      &mut open,
      |_, open| {
        assert!(open.contains(Path::new("root.md")));
        assert_eq!(open.depth(), 1);
        Ok(None)
      },
    )
    .unwrap();
    assert!(open.is_empty());
  }

  #[test]
  fn test_open_file_is_popped_on_error() {
    let mut open = OpenFiles::new();
    let result = resolve_includes(
      ":[a](a.md)",
      Path::new("root.md"),
      &mut open,
      |_, _| {
        Err(crate::CompileError::NotFound(PathBuf::from("a.md")))
      },
    );
    assert!(result.is_err());
    assert!(open.is_empty());
  }

  #[test]
  fn test_open_files_rejects_duplicates() {
    let mut open = OpenFiles::new();
    assert!(open.push(Path::new("a.md")));
    assert!(!open.push(Path::new("a.md")));
    assert!(open.push(Path::new("b.md")));
    assert_eq!(
      open.iter().collect::<Vec<_>>(),
      vec![Path::new("a.md"), Path::new("b.md")]
    );
    assert_eq!(open.pop(), Some(PathBuf::from("b.md")));
  }
}
