// 📂 Ledger Source Reader
// Assembles the full ledger text from the root file and everything it includes

use std::fs;
use std::path::{Path, PathBuf};

use crate::ledger::LedgerError;

/// Read `path` and inline every `include <file>` / `!include <file>` directive.
///
/// Relative include paths resolve against the directory of the file that
/// contains the directive. Each file lands in the output at the position of
/// its directive, so transaction order follows the include order.
pub fn read_with_includes(path: &Path) -> Result<String, LedgerError> {
    let mut stack = Vec::new();
    let mut out = String::new();
    inline_file(path, &mut stack, &mut out)?;
    Ok(out)
}

fn inline_file(path: &Path, stack: &mut Vec<PathBuf>, out: &mut String) -> Result<(), LedgerError> {
    let canonical = fs::canonicalize(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if stack.contains(&canonical) {
        return Err(LedgerError::IncludeCycle(canonical));
    }

    let text = fs::read_to_string(&canonical).map_err(|source| LedgerError::Io {
        path: canonical.clone(),
        source,
    })?;

    let base = canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    stack.push(canonical);
    for line in text.lines() {
        match include_target(line) {
            Some(target) => inline_file(&base.join(target), stack, out)?,
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    stack.pop();

    Ok(())
}

/// The file named by an include directive, if `line` is one.
/// Directives must start at column 0; indented lines are postings.
fn include_target(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("!include")
        .or_else(|| line.strip_prefix("include"))?;

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let target = rest.trim();
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_include_target() {
        assert_eq!(include_target("include 2023.ledger"), Some("2023.ledger"));
        assert_eq!(include_target("!include  sub/2024.ledger "), Some("sub/2024.ledger"));
        assert_eq!(include_target("include"), None);
        assert_eq!(include_target("includes.ledger"), None);
        assert_eq!(include_target("    include x"), None);
        assert_eq!(include_target("2023-01-05 include"), None);
    }

    #[test]
    fn test_plain_file_is_returned_as_is() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "main.ledger", "2023-01-05 A\n    Assets:Cash  $1\n    Income\n");

        let text = read_with_includes(&root).unwrap();

        assert_eq!(text, "2023-01-05 A\n    Assets:Cash  $1\n    Income\n");
    }

    #[test]
    fn test_includes_are_inlined_in_place() {
        let dir = TempDir::new().unwrap();
        write(&dir, "years/2023.ledger", "; 2023\n");
        write(&dir, "years/2024.ledger", "; 2024\ninclude nested.ledger\n");
        write(&dir, "years/nested.ledger", "; nested\n");
        let root = write(
            &dir,
            "main.ledger",
            "; head\ninclude years/2023.ledger\n!include years/2024.ledger\n; tail\n",
        );

        let text = read_with_includes(&root).unwrap();

        assert_eq!(text, "; head\n; 2023\n; 2024\n; nested\n; tail\n");
    }

    #[test]
    fn test_missing_include_is_io_error() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "main.ledger", "include missing.ledger\n");

        let result = read_with_includes(&root);

        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }

    #[test]
    fn test_include_cycle_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.ledger", "include b.ledger\n");
        write(&dir, "b.ledger", "include a.ledger\n");

        let result = read_with_includes(&dir.path().join("a.ledger"));

        assert!(matches!(result, Err(LedgerError::IncludeCycle(_))));
    }

    #[test]
    fn test_same_file_twice_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        write(&dir, "common.ledger", "; common\n");
        let root = write(&dir, "main.ledger", "include common.ledger\ninclude common.ledger\n");

        let text = read_with_includes(&root).unwrap();

        assert_eq!(text, "; common\n; common\n");
    }
}
