//! Syntax tree for Luau sources.
//!
//! Shared by the parser, the formatter and the compatibility rewriter:
//! - [`kind`]: the closed node-kind vocabulary
//! - [`tree`]: the arena tree, node views and the builder the parser uses
//! - [`output`]: the result type every pass returns
//! - [`dump`]: outline and JSON renderings for debugging

pub mod dump;
pub mod kind;
pub mod output;
pub mod tree;

pub use dump::SyntaxTreeDump;
pub use kind::{AuxKind, ExprKind, StmtKind, SyntaxKind, TokenKind};
pub use output::{with_single_trailing_newline, PassOutput, UnchangedReason};
pub use tree::{Checkpoint, NodeId, SyntaxError, SyntaxNode, SyntaxTree, TreeBuilder};
