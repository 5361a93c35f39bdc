//! Command-line interface for plumb
//!
//! Usage:
//!   plumb [PATHS]...                    - Check files or directories (default: current directory)
//!   plumb --config `<file>` [PATHS]...  - Check with an explicit configuration file
//!   plumb --format json [PATHS]...      - Print the report as JSON
//!   plumb --print-default-config        - Print the built in configuration
//!
//! Exit codes: 0 when no error-level problem was found, 1 when one was, 2 when the
//! configuration or a path could not be used.

use clap::{Arg, ArgAction, Command};
use plumb::plumb::checker::{Checker, Report};
use plumb::plumb::config::{StyleConfig, DEFAULT_YAML};
use plumb::plumb::formats::FormatRegistry;
use plumb::plumb::logging;
use std::path::{Path, PathBuf};

fn main() {
    let matches = Command::new("plumb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check indentation and style of keyword/end delimited source files")
        .arg(
            Arg::new("paths")
                .help("Files or directories to check")
                .num_args(0..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file (default: ./.plumb.yml if present)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log output (repeatable)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("print-default-config")
                .long("print-default-config")
                .help("Print the built in configuration and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    logging::init(matches.get_count("verbose"));

    if matches.get_flag("print-default-config") {
        print!("{}", DEFAULT_YAML);
        return;
    }

    let config_path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = StyleConfig::discover(config_path, Path::new(".")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(2);
    });
    let checker = Checker::new(config).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(2);
    });

    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_else(|| vec![PathBuf::from(".")]);

    let mut report = Report::new();
    for path in &paths {
        let checked = checker.check_style(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        });
        report.merge(checked);
    }

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let output = FormatRegistry::with_defaults()
        .render(&report, format)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        });
    print!("{}", output);
    if format == "json" {
        println!();
    }

    if report.error_count() > 0 {
        std::process::exit(1);
    }
}
