//! Canonical pretty-printer for Luau source.
//!
//! Output uses tab indentation, one statement per line and spaced binary
//! operators. String literals are re-delimited to need the fewest escapes.
//! Comments between statements and between table fields are kept, and
//! comments that shared a line with the code before them still do.
//!
//! Files that do not parse, or that carry comments inside expressions, are
//! handed back byte for byte.

mod format;
mod options;
mod string;

use lc_syntax::{with_single_trailing_newline, PassOutput, SyntaxTree, UnchangedReason};

use crate::format::Formatter;

pub use options::{CallParens, FormatOptions};
pub use string::normalize_quotes;

/// Parse and format `source`.
pub fn format_source(source: &str, options: &FormatOptions) -> PassOutput {
    format_tree(&lc_parser::parse(source), options)
}

/// Format an already parsed tree.
pub fn format_tree(tree: &SyntaxTree, options: &FormatOptions) -> PassOutput {
    if tree.has_error() {
        tracing::warn!(errors = tree.errors().len(), "source does not parse; leaving file unformatted");
        return PassOutput::Unchanged {
            text: tree.text().to_string(),
            reason: UnchangedReason::ParseError,
        };
    }
    if let Some(first) = tree.stray_comments().first() {
        tracing::warn!(
            offset = first.start,
            count = tree.stray_comments().len(),
            "comment inside an expression; leaving file unformatted"
        );
        return PassOutput::Unchanged {
            text: tree.text().to_string(),
            reason: UnchangedReason::StrayComment,
        };
    }

    let mut formatter = Formatter::new(tree.text(), options);
    formatter.statements(tree.root());
    PassOutput::Rewritten(with_single_trailing_newline(&formatter.output))
}
