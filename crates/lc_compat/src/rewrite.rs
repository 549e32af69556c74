//! One rewrite pass: find, isolate, substitute.

use lc_syntax::{
    with_single_trailing_newline, ExprKind, PassOutput, StmtKind, SyntaxKind, SyntaxNode, SyntaxTree, TokenKind,
    UnchangedReason,
};
use rand::Rng;

use crate::floor_div::{compound_floor_div, floor_div};
use crate::if_expr::if_expr;
use crate::options::CompatOptions;
use crate::placeholder::Fillers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    IfExp,
    FloorDiv,
    CompoundFloorDiv,
}

impl Construct {
    fn of(node: SyntaxNode<'_>, options: &CompatOptions) -> Option<Construct> {
        let operator = || node.child(1).and_then(|op| op.token_kind());
        match node.kind() {
            SyntaxKind::Expr(ExprKind::IfExp) if options.if_expressions => Some(Construct::IfExp),
            SyntaxKind::Expr(ExprKind::BinExp)
                if options.floor_division && operator() == Some(TokenKind::DoubleSlash) =>
            {
                Some(Construct::FloorDiv)
            }
            SyntaxKind::Stmt(StmtKind::Var)
                if options.compound_floor_division && operator() == Some(TokenKind::DoubleSlashAssign) =>
            {
                Some(Construct::CompoundFloorDiv)
            }
            _ => None,
        }
    }

    fn rewrite(self, node: SyntaxNode<'_>) -> String {
        match self {
            Construct::IfExp => if_expr(node),
            Construct::FloorDiv => floor_div(node),
            Construct::CompoundFloorDiv => compound_floor_div(node),
        }
    }
}

/// Outermost nodes that need lowering, in source order. Matches nested in
/// another match are left for the next pass, which sees them after their
/// ancestor has been rewritten.
fn find_matches<'t>(node: SyntaxNode<'t>, options: &CompatOptions, out: &mut Vec<(SyntaxNode<'t>, Construct)>) {
    if let Some(construct) = Construct::of(node, options) {
        out.push((node, construct));
        return;
    }
    for child in node.children() {
        find_matches(child, options, out);
    }
}

/// Run one rewrite pass over `tree`.
///
/// Trees that failed to parse come back unchanged. Otherwise the result is
/// the source with every outermost match lowered, ending in one newline.
pub fn rewrite_tree(tree: &SyntaxTree, options: &CompatOptions) -> PassOutput {
    rewrite_tree_with(tree, options, rand::thread_rng())
}

pub(crate) fn rewrite_tree_with<R: Rng>(tree: &SyntaxTree, options: &CompatOptions, rng: R) -> PassOutput {
    if tree.has_error() {
        tracing::warn!(errors = tree.errors().len(), "source does not parse; leaving it unchanged");
        return PassOutput::Unchanged {
            text: tree.text().to_string(),
            reason: UnchangedReason::ParseError,
        };
    }

    let mut matches = Vec::new();
    find_matches(tree.root(), options, &mut matches);

    let source = tree.text();
    let mut fillers = Fillers::new(source, rng);
    let mut filled = source.to_string();
    let mut substitutions = Vec::with_capacity(matches.len());
    for (node, construct) in matches {
        let filler = fillers.next(node.end() - node.start());
        filled.replace_range(node.range(), &filler);
        substitutions.push((filler, node, construct));
    }

    for (filler, node, construct) in substitutions {
        let replacement = construct.rewrite(node);
        tracing::debug!(?construct, offset = node.start(), %replacement, "lowered");
        filled = filled.replacen(&filler, &replacement, 1);
    }

    PassOutput::Rewritten(with_single_trailing_newline(&filled))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pass(source: &str) -> String {
        let tree = lc_parser::parse(source);
        rewrite_tree_with(&tree, &CompatOptions::default(), StdRng::seed_from_u64(11)).into_text()
    }

    #[test]
    fn lowers_every_outermost_match() {
        assert_eq!(
            pass("local t = {a // 2, if c then 1 else 2}\nt.n //= 3\n"),
            "local t = {math.floor(a/2), c and 1 or 2}\nt.n = math.floor(t.n/3)\n"
        );
    }

    #[test]
    fn nested_matches_wait_for_the_next_pass() {
        let once = pass("x = a // b // c");
        assert_eq!(once, "x = math.floor(a // b/c)\n");
        assert_eq!(pass(&once), "x = math.floor(math.floor(a/b)/c)\n");
    }

    #[test]
    fn untouched_text_is_kept_verbatim() {
        assert_eq!(
            pass("local   s = '$x' -- a // b\nprint( s )\n\n\n"),
            "local   s = '$x' -- a // b\nprint( s )\n"
        );
    }

    #[test]
    fn rules_can_be_switched_off() {
        let tree = lc_parser::parse("x = if c then a // 2 else 0");
        let options = CompatOptions {
            if_expressions: false,
            ..CompatOptions::default()
        };
        assert_eq!(
            rewrite_tree(&tree, &options).into_text(),
            "x = if c then math.floor(a/2) else 0\n"
        );
    }

    #[test]
    fn parse_errors_are_returned_unchanged() {
        let source = "x = if c then 1\n\n";
        let out = rewrite_tree(&lc_parser::parse(source), &CompatOptions::default());
        assert_eq!(out.unchanged_reason(), Some(UnchangedReason::ParseError));
        assert_eq!(out.text(), source);
    }

    #[test]
    fn multibyte_text_around_matches() {
        assert_eq!(
            pass("local s = 'héllo' x = 7 // 2 print('✓')"),
            "local s = 'héllo' x = math.floor(7/2) print('✓')\n"
        );
    }
}
