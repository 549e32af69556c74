//! Lowering for conditional expressions.
//!
//! When the value of the only `then` branch is a literal that can never be
//! falsy, `if c then a else b` is exactly `c and a or b`. Everything else
//! becomes an immediately called closure:
//!
//! `if c then a elseif d then b else e`
//! → `(function() if c then return a elseif d then return b else return e end end)()`

use lc_syntax::{ExprKind, SyntaxKind, SyntaxNode, TokenKind};

pub(crate) fn if_expr(node: SyntaxNode<'_>) -> String {
    if let Some(rewritten) = and_or(node) {
        return rewritten;
    }
    closure(node)
}

/// `c and a or b`, for `[if, c, then, a, else, b]` with an always-truthy `a`.
fn and_or(node: SyntaxNode<'_>) -> Option<String> {
    if node.child_count() != 6 || !node.expect_child(4).is_token(TokenKind::Else) {
        return None;
    }
    let value = node.expect_child(3);
    let truthy = matches!(
        value.kind().expr(),
        Some(ExprKind::Number | ExprKind::String | ExprKind::StringInterp | ExprKind::True)
    );
    if !truthy {
        return None;
    }

    let cond = node.expect_child(1);
    let cond_text = if binds_looser_than_and(cond) {
        format!("({})", cond.text())
    } else {
        cond.text().to_string()
    };
    let mut out = format!("{cond_text} and {} or {}", value.text(), node.expect_child(5).text());

    let in_operator = node.parent().is_some_and(|p| {
        matches!(
            p.kind(),
            SyntaxKind::Expr(ExprKind::BinExp | ExprKind::UnExp)
        )
    });
    if in_operator {
        out = format!("({out})");
    }
    Some(out)
}

fn binds_looser_than_and(cond: SyntaxNode<'_>) -> bool {
    match cond.kind().expr() {
        Some(ExprKind::IfExp) => true,
        Some(ExprKind::BinExp) => cond.expect_child(1).is_token(TokenKind::Or),
        _ => false,
    }
}

fn closure(node: SyntaxNode<'_>) -> String {
    let mut out = String::from("(function()");
    for child in node.children() {
        match child.kind() {
            SyntaxKind::Token(TokenKind::If) => out.push_str(" if"),
            SyntaxKind::Token(TokenKind::Then) => out.push_str(" then return"),
            SyntaxKind::Token(TokenKind::Elseif) => out.push_str(" elseif"),
            SyntaxKind::Token(TokenKind::Else) => out.push_str(" else return"),
            SyntaxKind::Expr(_) => {
                out.push(' ');
                out.push_str(child.text());
            }
            other => panic!(
                "unexpected `{other}` inside `ifexp` at byte {}",
                child.start()
            ),
        }
    }
    out.push_str(" end end)()");
    out
}
