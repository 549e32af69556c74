//! Lowers Luau-only syntax to plain Lua 5.1.
//!
//! Transforms:
//! - `a // b`                → `math.floor(a/b)`
//! - `a //= b`               → `a = math.floor(a/b)`
//! - `if c then 1 else b`    → `c and 1 or b`
//! - `if c then a else b`    → `(function() if c then return a else return b end end)()`
//!
//! A pass replaces every outermost match with a placeholder of the same
//! byte length, so the byte ranges of the remaining matches stay valid,
//! then substitutes each placeholder with its lowered text. [`compatify`]
//! repeats passes until the output stops changing.

mod fixpoint;
mod floor_div;
mod if_expr;
mod options;
mod placeholder;
mod rewrite;

pub use fixpoint::{compatify, CompatError};
pub use options::CompatOptions;
pub use rewrite::rewrite_tree;
