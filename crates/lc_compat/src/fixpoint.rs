//! Rewrite until nothing changes.

use lc_syntax::{PassOutput, SyntaxError, SyntaxTree, UnchangedReason};

use crate::options::CompatOptions;
use crate::rewrite::rewrite_tree;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompatError {
    #[error("no fixpoint reached after {iterations} rewrite passes")]
    NoFixpoint { iterations: usize },
    #[error("rewrite pass {iteration} produced source that does not parse: {error}")]
    InvalidRewrite {
        iteration: usize,
        error: SyntaxError,
        /// The unparseable output, for diagnostics.
        text: String,
    },
}

/// Lower `source` to plain Lua.
///
/// Each pass re-parses the previous pass's output, so constructs nested
/// inside a lowered one are handled on a later pass. Source that does not
/// parse to begin with is returned unchanged.
pub fn compatify(source: &str, options: &CompatOptions) -> Result<PassOutput, CompatError> {
    run_to_fixpoint(source, options.max_iterations, |tree| {
        rewrite_tree(tree, options).into_text()
    })
}

fn run_to_fixpoint(
    source: &str,
    max_iterations: usize,
    mut pass: impl FnMut(&SyntaxTree) -> String,
) -> Result<PassOutput, CompatError> {
    let mut code = source.to_string();
    for iteration in 1..=max_iterations {
        let tree = lc_parser::parse(&code);
        if let Some(error) = tree.errors().first() {
            if iteration == 1 {
                tracing::warn!(%error, "source does not parse; leaving it unchanged");
                return Ok(PassOutput::Unchanged {
                    text: code,
                    reason: UnchangedReason::ParseError,
                });
            }
            return Err(CompatError::InvalidRewrite {
                iteration: iteration - 1,
                error: error.clone(),
                text: code,
            });
        }

        let next = pass(&tree);
        tracing::debug!(iteration, changed = next != code, "rewrite pass");
        if next == code {
            return Ok(PassOutput::Rewritten(next));
        }
        code = next;
    }
    Err(CompatError::NoFixpoint {
        iterations: max_iterations,
    })
}
