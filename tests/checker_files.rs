//! Checking files and directory trees on disk.

use plumb::plumb::discovery::discover;
use plumb::plumb::{Checker, Level, StyleConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "lib/clean.rb", "def foo\n  true\nend\n");
    write(root, "lib/messy.rb", "def foo\n    true\nend\n");
    write(root, "Rakefile", "task :default do\n  run\nend\n");
    write(root, "README.md", "    not checked\n");
    write(root, "vendor/skipped.rb", "def x\n      y\nend\n");
    write(root, ".gitignore", "vendor/\n");
    dir
}

#[test]
fn test_discovery_filters_and_sorts() {
    let dir = project();
    let files = discover(dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|path| {
            path.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, vec!["Rakefile", "lib/clean.rb", "lib/messy.rb"]);
}

#[test]
fn test_single_file_is_checked_whatever_its_name() {
    let dir = project();
    let readme = dir.path().join("README.md");
    assert_eq!(discover(&readme).unwrap(), vec![readme]);
}

#[test]
fn test_check_style_on_a_tree() {
    let dir = project();
    let checker = Checker::new(StyleConfig::default()).unwrap();
    let report = checker.check_style(dir.path()).unwrap();

    assert_eq!(report.file_count(), 3);
    assert_eq!(report.problem_count(), 1);
    assert_eq!(report.error_count(), 1);

    let messy = report
        .problems_for(&dir.path().join("lib/messy.rb"))
        .unwrap();
    assert_eq!(messy.len(), 1);
    assert_eq!(messy[0].line(), 2);
    assert_eq!(messy[0].level(), Level::Error);
    assert!(report
        .problems_for(&dir.path().join("lib/clean.rb"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_project_config_file_is_discovered() {
    let dir = project();
    write(
        dir.path(),
        ".plumb.yml",
        "indentation_spaces:\n  spaces: 4\n",
    );
    let config = StyleConfig::discover(None, dir.path()).unwrap();
    assert_eq!(config.indentation_spaces.spaces, 4);

    let report = Checker::new(config)
        .unwrap()
        .check_style(dir.path())
        .unwrap();
    // only the messy file uses 4 spaces
    assert_eq!(report.problem_count(), 2);
}

#[test]
fn test_check_file_reports_lex_errors() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.rb", "x = 'never closed\n");
    let checker = Checker::new(StyleConfig::default()).unwrap();
    let problems = checker.check_file(dir.path().join("broken.rb")).unwrap();
    assert_eq!(problems.len(), 1);
}
