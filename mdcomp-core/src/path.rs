//! Path normalization for include targets and command line paths.
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Shortcut that expands to the configured root directory.
pub const ROOT_TOKEN: &str = "$ROOT/";

/// Normalize a path string.
///
/// Platform separators become `/`, surrounding whitespace and trailing
/// slashes are removed, and a leading `$ROOT/` (matched case-insensitively)
/// is replaced with `root_dir`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use mdcomp_core::path::normalize_path;
///
/// let root = Path::new("/opt/mdcomp");
/// assert_eq!(normalize_path(" docs/intro.md/ ", root), "docs/intro.md");
/// assert_eq!(
///   normalize_path("$root/shared/footer.md", root),
///   "/opt/mdcomp/shared/footer.md"
/// );
/// ```
#[must_use]
pub fn normalize_path(path: &str, root_dir: &Path) -> String {
  let normalized = to_forward_slashes(path.trim());
  let normalized = normalized.trim_end_matches('/');

  match strip_root_token(normalized) {
    Some(rest) => {
      let root = to_forward_slashes(&root_dir.to_string_lossy());
      format!("{}/{rest}", root.trim_end_matches('/'))
    },
    None => normalized.to_string(),
  }
}

/// Default root directory: the parent of the directory holding the running
/// executable.
///
/// Returns `None` when the executable path cannot be determined or has no
/// grandparent.
#[must_use]
pub fn default_root_dir() -> Option<PathBuf> {
  let exe = std::env::current_exe().ok()?;
  exe.parent()?.parent().map(Path::to_path_buf)
}

fn to_forward_slashes(path: &str) -> String {
  if MAIN_SEPARATOR == '/' {
    path.to_string()
  } else {
    path.replace(MAIN_SEPARATOR, "/")
  }
}

fn strip_root_token(path: &str) -> Option<&str> {
  let prefix = path.get(..ROOT_TOKEN.len())?;
  prefix
    .eq_ignore_ascii_case(ROOT_TOKEN)
    .then(|| &path[ROOT_TOKEN.len()..])
}
