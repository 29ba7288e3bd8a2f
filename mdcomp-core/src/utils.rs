//! Small text and path helpers shared by the compiler stages.
use std::{
  ops::Range,
  path::{Component, Path, PathBuf},
};

use regex::Regex;

/// Number of spaces a horizontal tab expands to.
pub const TAB_WIDTH: usize = 4;

/// Slugify heading text for use as an anchor id.
///
/// Lowercases the text, drops every character outside `[a-z0-9 -]` and turns
/// the remaining spaces into dashes. Runs of spaces are kept as runs of
/// dashes, so `"A  B"` becomes `"a--b"`.
#[must_use]
pub fn slugify(text: &str) -> String {
  text
    .to_lowercase()
    .chars()
    .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | ' ' | '-'))
    .map(|c| if c == ' ' { '-' } else { c })
    .collect()
}

/// Normalize line endings to `\n` and expand tabs to [`TAB_WIDTH`] spaces.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
  text
    .replace("\r\n", "\n")
    .replace('\r', "\n")
    .replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Iterate over the lines of `text` along with their byte spans.
///
/// Spans exclude the line terminator (`\n` or `\r\n`), so replacing a span
/// keeps the surrounding line structure intact.
pub fn line_spans(text: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
  let mut offset = 0;
  text.split_inclusive('\n').map(move |raw| {
    let start = offset;
    offset += raw.len();
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    let line = line.strip_suffix('\r').unwrap_or(line);
    (start..start + line.len(), line)
  })
}

/// Lexically clean a path: drop `.` components and fold `..` into the
/// preceding component where there is one. The filesystem is not consulted.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
  let mut cleaned = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        if matches!(cleaned.components().next_back(), Some(Component::Normal(_)))
        {
          cleaned.pop();
        } else {
          cleaned.push("..");
        }
      },
      other => cleaned.push(other),
    }
  }
  cleaned
}

/// Compile a built-in pattern, falling back to a regex that never matches.
///
/// Built-in patterns are constants, so the fallback only exists to keep the
/// library free of panics.
pub(crate) fn builtin_regex(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// # Panics
///
/// Never in practice: the pattern `[^\s\S]` is valid.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}
