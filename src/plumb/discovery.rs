//! Source file discovery
//!
//!     A path naming a file is checked as is, whatever its name. A directory is walked with
//!     `.gitignore` and hidden-file rules applied, keeping only files whose name looks like
//!     source of the checked language. Results are sorted so reports are stable.

use crate::plumb::checker::CheckError;
use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// File names picked up when walking a directory.
static SOURCE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\.(?:rb|rake|gemspec|ru)|^(?:Rakefile|Gemfile))$").unwrap()
});

pub fn is_source_name(name: &str) -> bool {
    SOURCE_NAME_REGEX.is_match(name)
}

pub fn discover(path: &Path) -> Result<Vec<PathBuf>, CheckError> {
    let metadata = path.metadata().map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let walker = WalkBuilder::new(path)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == Some(0) => {
                return Err(CheckError::Discovery {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let keep = entry
            .file_name()
            .to_str()
            .is_some_and(is_source_name);
        trace!(path = %entry.path().display(), keep, "discovered");
        if keep {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo.rb", true)]
    #[case("tasks.rake", true)]
    #[case("plumb.gemspec", true)]
    #[case("config.ru", true)]
    #[case("Rakefile", true)]
    #[case("Gemfile", true)]
    #[case("Gemfile.lock", false)]
    #[case("foo.rbx", false)]
    #[case("notes.md", false)]
    #[case("MyRakefile", false)]
    fn test_source_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_source_name(name), expected);
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            discover(Path::new("/definitely/not/here")),
            Err(CheckError::Io { .. })
        ));
    }
}
