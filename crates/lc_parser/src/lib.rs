//! Recursive-descent parser for Luau.
//!
//! Turns a source buffer into an [`lc_syntax::SyntaxTree`] whose node shapes
//! follow the Luau tree-sitter grammar the formatter and the compatibility
//! rewriter are written against:
//!
//! - `binexp` = `[lhs, op, rhs]`, `ifexp` = `[if, cond, then, expr, (elseif, cond, then, expr)*, else, expr]`
//! - `var_stmt` = `[var, compound-op, expr]`, `assign_stmt` = `[varlist, =, explist]`
//! - `call_stmt` / `call` = `[callee, (:, name)?, arglist]`
//!
//! Comments between statements and between table fields are kept as
//! `comment` nodes. Comments anywhere else are recorded on the tree as stray.
//!
//! Type annotations, type declarations and attributes are not part of this
//! grammar; sources using them come back with the error flag set.

mod expr;
mod parse;
mod stmt;

pub use parse::parse;
