//! Statements and blocks.

use lc_lexer::Tok;
use lc_syntax::{AuxKind, ExprKind, StmtKind, TokenKind};

use crate::parse::{PResult, Parser};

impl Parser<'_> {
    /// True at a token that closes the current block.
    fn at_block_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Tok::Token(
                TokenKind::End | TokenKind::Else | TokenKind::Elseif | TokenKind::Until
            ))
        )
    }

    /// Statements (and the comments between them) up to the end of the
    /// current block, added to the open node.
    pub(crate) fn block_items(&mut self) -> PResult {
        loop {
            self.comments();
            if self.at_block_end() {
                return Ok(());
            }
            let is_return = self.at(TokenKind::Return);
            self.statement()?;
            while self.at(TokenKind::Semi) {
                self.skip();
            }
            if is_return {
                self.comments();
                if !self.at_block_end() {
                    return Err(self.unexpected("end of block after `return`"));
                }
                return Ok(());
            }
        }
    }

    pub(crate) fn block(&mut self) -> PResult {
        self.builder.start_node(AuxKind::Block, self.last_end());
        self.block_items()?;
        self.builder.finish_node();
        Ok(())
    }

    fn statement(&mut self) -> PResult {
        match self.peek_token() {
            Some(TokenKind::Local) => self.local_stmt(),
            Some(TokenKind::Function) => self.fn_stmt(),
            Some(TokenKind::If) => self.if_stmt(),
            Some(TokenKind::While) => self.while_stmt(),
            Some(TokenKind::Do) => self.do_stmt(),
            Some(TokenKind::For) => self.for_stmt(),
            Some(TokenKind::Repeat) => self.repeat_stmt(),
            Some(TokenKind::Return) => self.return_stmt(),
            Some(TokenKind::Break) => {
                self.builder.start_node(StmtKind::Break, self.offset());
                self.bump();
                self.builder.finish_node();
                Ok(())
            }
            Some(TokenKind::Name) if self.at_continue() => {
                self.builder.start_node(StmtKind::Continue, self.offset());
                self.bump_as(TokenKind::Continue);
                self.builder.finish_node();
                Ok(())
            }
            _ => self.expr_stmt(),
        }
    }

    /// `continue` is only a keyword when it cannot start an expression
    /// statement (`continue = 1`, `continue()` are plain variable uses).
    fn at_continue(&self) -> bool {
        if self.peek_text() != "continue" {
            return false;
        }
        match self.nth(1) {
            Some(Tok::Token(kind)) => !(kind.is_compound_assign()
                || matches!(
                    kind,
                    TokenKind::LParen
                        | TokenKind::Dot
                        | TokenKind::LBracket
                        | TokenKind::Colon
                        | TokenKind::Assign
                        | TokenKind::Comma
                        | TokenKind::LBrace
                )),
            Some(Tok::Literal(ExprKind::String)) => false,
            _ => true,
        }
    }

    fn local_stmt(&mut self) -> PResult {
        if self.nth(1) == Some(Tok::Token(TokenKind::Function)) {
            self.builder.start_node(StmtKind::LocalFn, self.offset());
            self.bump();
            self.bump();
            self.expect_name()?;
            self.func_body()?;
        } else {
            self.builder.start_node(StmtKind::LocalVar, self.offset());
            self.bump();
            self.binding()?;
            while self.eat(TokenKind::Comma) {
                self.binding()?;
            }
            if self.eat(TokenKind::Assign) {
                self.expr()?;
                while self.eat(TokenKind::Comma) {
                    self.expr()?;
                }
            }
        }
        self.builder.finish_node();
        Ok(())
    }

    fn binding(&mut self) -> PResult {
        self.builder.start_node(AuxKind::Binding, self.offset());
        self.expect_name()?;
        self.builder.finish_node();
        Ok(())
    }

    fn fn_stmt(&mut self) -> PResult {
        self.builder.start_node(StmtKind::Fn, self.offset());
        self.bump();
        self.builder.start_node(AuxKind::FuncName, self.offset());
        self.expect_name()?;
        while self.eat(TokenKind::Dot) {
            self.expect_name()?;
        }
        if self.eat(TokenKind::Colon) {
            self.expect_name()?;
        }
        self.builder.finish_node();
        self.func_body()?;
        self.builder.finish_node();
        Ok(())
    }

    /// `(params) block end`, shared by every function form.
    pub(crate) fn func_body(&mut self) -> PResult {
        self.builder.start_node(AuxKind::FuncBody, self.offset());
        self.expect(TokenKind::LParen)?;
        if !self.at(TokenKind::RParen) {
            self.builder.start_node(AuxKind::ParamList, self.offset());
            loop {
                if self.peek() == Some(Tok::Literal(ExprKind::Vararg)) {
                    self.bump();
                    break;
                }
                self.expect_name()?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.builder.finish_node();
        }
        self.expect(TokenKind::RParen)?;
        self.block()?;
        self.expect(TokenKind::End)?;
        self.builder.finish_node();
        Ok(())
    }

    fn if_stmt(&mut self) -> PResult {
        self.builder.start_node(StmtKind::If, self.offset());
        self.bump();
        self.expr()?;
        self.expect(TokenKind::Then)?;
        self.block()?;
        while self.at(TokenKind::Elseif) {
            self.bump();
            self.expr()?;
            self.expect(TokenKind::Then)?;
            self.block()?;
        }
        if self.eat(TokenKind::Else) {
            self.block()?;
        }
        self.expect(TokenKind::End)?;
        self.builder.finish_node();
        Ok(())
    }

    fn while_stmt(&mut self) -> PResult {
        self.builder.start_node(StmtKind::While, self.offset());
        self.bump();
        self.expr()?;
        self.expect(TokenKind::Do)?;
        self.block()?;
        self.expect(TokenKind::End)?;
        self.builder.finish_node();
        Ok(())
    }

    fn do_stmt(&mut self) -> PResult {
        self.builder.start_node(StmtKind::Do, self.offset());
        self.bump();
        self.block()?;
        self.expect(TokenKind::End)?;
        self.builder.finish_node();
        Ok(())
    }

    fn repeat_stmt(&mut self) -> PResult {
        self.builder.start_node(StmtKind::Repeat, self.offset());
        self.bump();
        self.block()?;
        self.expect(TokenKind::Until)?;
        self.expr()?;
        self.builder.finish_node();
        Ok(())
    }

    fn for_stmt(&mut self) -> PResult {
        let numeric = self.nth(2) == Some(Tok::Token(TokenKind::Assign));
        let kind = if numeric {
            StmtKind::ForRange
        } else {
            StmtKind::ForIn
        };
        self.builder.start_node(kind, self.offset());
        self.bump();
        self.binding()?;
        if numeric {
            self.expect(TokenKind::Assign)?;
            self.expr()?;
            self.expect(TokenKind::Comma)?;
            self.expr()?;
            if self.eat(TokenKind::Comma) {
                self.expr()?;
            }
        } else {
            while self.eat(TokenKind::Comma) {
                self.binding()?;
            }
            self.expect(TokenKind::In)?;
            self.expr()?;
            while self.eat(TokenKind::Comma) {
                self.expr()?;
            }
        }
        self.expect(TokenKind::Do)?;
        self.block()?;
        self.expect(TokenKind::End)?;
        self.builder.finish_node();
        Ok(())
    }

    fn return_stmt(&mut self) -> PResult {
        self.builder.start_node(StmtKind::Return, self.offset());
        self.bump();
        if !self.at_block_end() && !self.at(TokenKind::Semi) {
            self.expr()?;
            while self.eat(TokenKind::Comma) {
                self.expr()?;
            }
        }
        self.builder.finish_node();
        Ok(())
    }

    /// Assignment, compound assignment or call, all of which start with a
    /// suffixed expression.
    fn expr_stmt(&mut self) -> PResult {
        let checkpoint = self.builder.checkpoint();
        let offset = self.offset();
        let target = self.suffixed_expr()?;
        let target_kind = self.builder.kind_of(target).expr();

        match self.peek_token() {
            Some(TokenKind::Assign | TokenKind::Comma) => {
                if target_kind != Some(ExprKind::Var) {
                    return Err(lc_syntax::SyntaxError::new("cannot assign to this expression", offset));
                }
                self.builder.start_node_at(checkpoint, AuxKind::VarList);
                while self.eat(TokenKind::Comma) {
                    let at = self.offset();
                    let var = self.suffixed_expr()?;
                    if self.builder.kind_of(var).expr() != Some(ExprKind::Var) {
                        return Err(lc_syntax::SyntaxError::new("cannot assign to this expression", at));
                    }
                }
                self.builder.finish_node();
                self.builder.start_node_at(checkpoint, StmtKind::Assign);
                self.expect(TokenKind::Assign)?;
                self.builder.start_node(AuxKind::ExpList, self.offset());
                self.expr()?;
                while self.eat(TokenKind::Comma) {
                    self.expr()?;
                }
                self.builder.finish_node();
                self.builder.finish_node();
            }
            Some(op) if op.is_compound_assign() => {
                if target_kind != Some(ExprKind::Var) {
                    return Err(lc_syntax::SyntaxError::new("cannot assign to this expression", offset));
                }
                self.builder.start_node_at(checkpoint, StmtKind::Var);
                self.bump();
                self.expr()?;
                self.builder.finish_node();
            }
            _ => {
                if target_kind != Some(ExprKind::Call) {
                    return Err(lc_syntax::SyntaxError::new(
                        "expected a statement, found an expression",
                        offset,
                    ));
                }
                self.builder.retag(target, StmtKind::Call);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lc_syntax::{SyntaxKind, SyntaxNode};

    use crate::parse;

    fn kinds(node: SyntaxNode<'_>) -> Vec<&'static str> {
        node.children().map(|c| c.kind().as_str()).collect()
    }

    #[test]
    fn local_and_assign_shapes() {
        let tree = parse("local a, b = 1, 2\na.x, b = 3, 4");
        let root = tree.root();
        assert_eq!(kinds(root), vec!["local_var_stmt", "assign_stmt"]);
        assert_eq!(
            kinds(root.expect_child(0)),
            vec!["local", "binding", ",", "binding", "=", "number", ",", "number"]
        );
        let assign = root.expect_child(1);
        assert_eq!(kinds(assign), vec!["varlist", "=", "explist"]);
        assert_eq!(kinds(assign.expect_child(0)), vec!["var", ",", "var"]);
    }

    #[test]
    fn compound_assignment_is_var_stmt() {
        let tree = parse("t.n //= 2");
        let stmt = tree.root().expect_child(0);
        assert_eq!(kinds(stmt), vec!["var", "//=", "number"]);
    }

    #[test]
    fn call_statement_is_retagged() {
        let tree = parse("print 'hi'\nobj:method(1)");
        let root = tree.root();
        assert_eq!(kinds(root), vec!["call_stmt", "call_stmt"]);
        assert_eq!(kinds(root.expect_child(0)), vec!["var", "arglist"]);
        assert_eq!(kinds(root.expect_child(1)), vec!["var", ":", "name", "arglist"]);
    }

    #[test]
    fn bare_expression_is_rejected() {
        assert!(parse("x").has_error());
        assert!(parse("(f)").has_error());
        assert!(parse("f() = 1").has_error());
    }

    #[test]
    fn if_statement_with_branches() {
        let tree = parse("if a then\nelseif b then x() else y() end");
        let stmt = tree.root().expect_child(0);
        assert_eq!(
            kinds(stmt),
            vec!["if", "var", "then", "block", "elseif", "var", "then", "block", "else", "block", "end"]
        );
        assert_eq!(stmt.expect_child(3).child_count(), 0);
    }

    #[test]
    fn loops_and_functions() {
        let src = "for i = 1, 10, 2 do end\nfor k, v in pairs(t) do end\nwhile x do break end\nrepeat continue until y\nlocal function f(a, ...) return a end\nfunction m.n:o() end";
        let tree = parse(src);
        assert!(!tree.has_error(), "{:?}", tree.errors());
        assert_eq!(
            kinds(tree.root()),
            vec!["for_range_stmt", "for_in_stmt", "while_stmt", "repeat_stmt", "local_fn_stmt", "fn_stmt"]
        );
        let repeat = tree.root().expect_child(3);
        let body = repeat.expect_child(1);
        assert_eq!(kinds(body), vec!["continue_stmt"]);
        let local_fn = tree.root().expect_child(4);
        assert_eq!(kinds(local_fn), vec!["local", "function", "name", "funcbody"]);
        assert_eq!(
            kinds(local_fn.expect_child(3)),
            vec!["(", "paramlist", ")", "block", "end"]
        );
        let fn_name = tree.root().expect_child(5).expect_child(1);
        assert_eq!(kinds(fn_name), vec!["name", ".", "name", ":", "name"]);
    }

    #[test]
    fn continue_as_a_variable() {
        let tree = parse("continue = 1\ncontinue()");
        assert_eq!(kinds(tree.root()), vec!["assign_stmt", "call_stmt"]);
    }

    #[test]
    fn return_must_end_the_block() {
        assert!(!parse("return 1; -- done").has_error());
        assert!(parse("return 1 x = 2").has_error());
    }

    #[test]
    fn comments_become_statements() {
        let tree = parse("-- a\nx = 1 -- b\nif y then\n\t-- c\nend");
        let root = tree.root();
        assert_eq!(kinds(root), vec!["comment", "assign_stmt", "comment", "if_stmt"]);
        let block = root.expect_child(3).expect_child(3);
        assert_eq!(block.expect_child(0).kind(), SyntaxKind::Stmt(lc_syntax::StmtKind::Comment));
        assert!(tree.stray_comments().is_empty());
    }

    #[test]
    fn comments_inside_expressions_are_stray() {
        let tree = parse("x = 1 + -- one\n 2");
        assert!(!tree.has_error());
        assert_eq!(tree.stray_comments().len(), 1);
    }

    #[test]
    fn semicolons_are_dropped() {
        let tree = parse("a = 1; b = 2;");
        assert_eq!(kinds(tree.root()), vec!["assign_stmt", "assign_stmt"]);
    }
}
