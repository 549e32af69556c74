//! Lowering for floor division (`//`, `//=`).
//!
//! `a // b`  → `math.floor(a/b)`
//! `a //= b` → `a = math.floor(a/b)`

use lc_syntax::{ExprKind, SyntaxNode};

/// Rewrite a `binexp` whose operator is `//`.
///
/// The right operand of `//` binds tighter than `/`, and the left operand
/// is left-associative at the same level, so both can be copied without
/// parentheses.
pub(crate) fn floor_div(node: SyntaxNode<'_>) -> String {
    let left = node.expect_child(0).text();
    let right = node.expect_child(2).text();
    format!("math.floor({left}/{right})")
}

/// Rewrite a `var_stmt` whose operator is `//=`.
///
/// The target is written on both sides, so an index expression with side
/// effects (`t[next()] //= 2`) runs them twice.
pub(crate) fn compound_floor_div(node: SyntaxNode<'_>) -> String {
    let target = node.expect_child(0).text();
    let value = node.expect_child(2);
    let needs_parens = matches!(
        value.kind().expr(),
        Some(ExprKind::BinExp | ExprKind::IfExp)
    );
    if needs_parens {
        format!("{target} = math.floor({target}/({}))", value.text())
    } else {
        format!("{target} = math.floor({target}/{})", value.text())
    }
}
