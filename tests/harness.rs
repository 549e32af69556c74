//! Golden-file test harness for luacube.
//!
//! Discovers `.input.lua` files under `tests/fixtures/format/` and
//! `tests/fixtures/compat/`, runs the formatter or the compatibility rewriter
//! over each, and compares the output against the matching `.expected.lua`.
//! Files under `tests/fixtures/invalid/` must come back byte for byte from
//! both passes.
//!
//! Set `LC_UPDATE_FIXTURES=1` to overwrite expected files with actual output.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use lc_compat::{compatify, CompatOptions};
use lc_format::{format_source, FormatOptions};
use lc_syntax::{ExprKind, PassOutput, SyntaxKind, SyntaxNode, TokenKind};

fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/lc_test/, so go up two levels to workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn collect_files(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut files: Vec<_> = walkdir(dir)
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
        })
        .collect();
    files.sort();
    files
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                result.extend(walkdir(&path));
            } else {
                result.push(path);
            }
        }
    }
    result
}

#[derive(Clone, Copy, Debug)]
enum Pass {
    Format,
    Compat,
}

impl Pass {
    fn dir(self) -> &'static str {
        match self {
            Pass::Format => "format",
            Pass::Compat => "compat",
        }
    }

    fn run(self, source: &str) -> Result<String> {
        let output = match self {
            Pass::Format => format_source(source, &FormatOptions::default()),
            Pass::Compat => compatify(source, &CompatOptions::default())?,
        };
        match output {
            PassOutput::Rewritten(text) => Ok(text),
            PassOutput::Unchanged { reason, .. } => bail!("input left unchanged: {reason:?}"),
        }
    }
}

fn run_golden(pass: Pass) {
    let fixtures = fixtures_dir();
    let dir = fixtures.join(pass.dir());
    let input_files = collect_files(&dir, ".input.lua");

    assert!(
        !input_files.is_empty(),
        "No test fixtures found in {}",
        dir.display()
    );

    let update_mode = std::env::var("LC_UPDATE_FIXTURES").is_ok();
    let mut failures = Vec::new();

    for input_path in &input_files {
        let expected_path = PathBuf::from(
            input_path
                .to_str()
                .unwrap()
                .replace(".input.lua", ".expected.lua"),
        );
        let test_name = input_path
            .strip_prefix(&fixtures)
            .unwrap()
            .display()
            .to_string();

        let source = match std::fs::read_to_string(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: failed to read input: {e}"));
                continue;
            }
        };

        let actual = match pass.run(&source) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: {pass:?} failed: {e}"));
                continue;
            }
        };

        if update_mode {
            if let Err(e) = std::fs::write(&expected_path, &actual) {
                failures.push(format!("{test_name}: failed to write expected: {e}"));
            }
            continue;
        }

        let expected = match std::fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!(
                    "{test_name}: failed to read expected file {}: {e}",
                    expected_path.display()
                ));
                continue;
            }
        };
        if actual != expected {
            failures.push(format!(
                "{test_name}: output mismatch\n--- expected ---\n{expected}--- actual ---\n{actual}"
            ));
            continue;
        }

        match pass.run(&actual) {
            Ok(again) if again == actual => {}
            Ok(again) => failures.push(format!(
                "{test_name}: second run changed the output\n--- first ---\n{actual}--- second ---\n{again}"
            )),
            Err(e) => failures.push(format!("{test_name}: second run failed: {e}")),
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

#[test]
fn format_golden_files() {
    run_golden(Pass::Format);
}

#[test]
fn compat_golden_files() {
    run_golden(Pass::Compat);
}

/// Luau-only constructs left anywhere under `node`.
fn luau_only(node: SyntaxNode<'_>, found: &mut Vec<String>) {
    let luau = match node.kind() {
        SyntaxKind::Expr(ExprKind::IfExp) => true,
        SyntaxKind::Token(TokenKind::DoubleSlash | TokenKind::DoubleSlashAssign) => true,
        _ => false,
    };
    if luau {
        found.push(format!("`{}` at byte {}", node.kind(), node.start()));
    }
    for child in node.children() {
        luau_only(child, found);
    }
}

#[test]
fn compat_output_is_plain_lua() {
    let dir = fixtures_dir().join("compat");
    let mut failures = Vec::new();

    for path in collect_files(&dir, ".expected.lua") {
        let text = std::fs::read_to_string(&path).unwrap();
        let tree = lc_parser::parse(&text);
        if tree.has_error() {
            failures.push(format!("{}: does not parse: {:?}", path.display(), tree.errors()));
            continue;
        }
        let mut found = Vec::new();
        luau_only(tree.root(), &mut found);
        if !found.is_empty() {
            failures.push(format!("{}: still contains {}", path.display(), found.join(", ")));
        }
    }

    assert!(failures.is_empty(), "\n{}", failures.join("\n"));
}

#[test]
fn invalid_sources_pass_through() {
    let dir = fixtures_dir().join("invalid");
    let files = collect_files(&dir, ".lua");
    assert!(!files.is_empty(), "No test fixtures found in {}", dir.display());

    for path in files {
        let source = std::fs::read_to_string(&path).unwrap();
        assert!(lc_parser::parse(&source).has_error(), "{} parses", path.display());

        let formatted = format_source(&source, &FormatOptions::default());
        assert!(formatted.unchanged_reason().is_some(), "{}", path.display());
        assert_eq!(formatted.text(), source, "{}", path.display());

        let lowered = compatify(&source, &CompatOptions::default()).unwrap();
        assert!(lowered.unchanged_reason().is_some(), "{}", path.display());
        assert_eq!(lowered.text(), source, "{}", path.display());
    }
}
