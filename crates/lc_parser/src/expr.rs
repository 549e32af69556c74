//! Expressions, tables and interpolated strings.

use lc_lexer::Tok;
use lc_syntax::{AuxKind, ExprKind, NodeId, TokenKind};

use crate::parse::{PResult, Parser};

/// Binding power of unary operators: tighter than `*`, looser than `^`.
const UNARY_PRIORITY: u8 = 8;

/// Left and right binding power of a binary operator. A right power below
/// the left one makes the operator right-associative.
fn binary_priority(kind: TokenKind) -> Option<(u8, u8)> {
    let priority = match kind {
        TokenKind::Or => (1, 1),
        TokenKind::And => (2, 2),
        TokenKind::Eq
        | TokenKind::Ne
        | TokenKind::Lt
        | TokenKind::Le
        | TokenKind::Gt
        | TokenKind::Ge => (3, 3),
        TokenKind::Concat => (5, 4),
        TokenKind::Plus | TokenKind::Minus => (6, 6),
        TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent => (7, 7),
        TokenKind::Caret => (10, 9),
        _ => return None,
    };
    Some(priority)
}

fn is_unary(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Not | TokenKind::Minus | TokenKind::Hash)
}

impl Parser<'_> {
    pub(crate) fn expr(&mut self) -> PResult<NodeId> {
        self.sub_expr(0)
    }

    /// Precedence climbing: parses operators binding tighter than `limit`.
    fn sub_expr(&mut self, limit: u8) -> PResult<NodeId> {
        let checkpoint = self.builder.checkpoint();
        let mut node = match self.peek_token() {
            Some(op) if is_unary(op) => {
                self.builder.start_node(ExprKind::UnExp, self.offset());
                self.bump();
                self.sub_expr(UNARY_PRIORITY)?;
                self.builder.finish_node()
            }
            _ => self.simple_expr()?,
        };
        while let Some((left, right)) = self.peek_token().and_then(binary_priority) {
            if left <= limit {
                break;
            }
            self.builder.start_node_at(checkpoint, ExprKind::BinExp);
            self.bump();
            self.sub_expr(right)?;
            node = self.builder.finish_node();
        }
        Ok(node)
    }

    fn simple_expr(&mut self) -> PResult<NodeId> {
        match self.peek() {
            Some(Tok::Literal(_)) => Ok(self.bump()),
            Some(Tok::Token(TokenKind::InterpStart)) => self.interp_string(),
            Some(Tok::Token(TokenKind::LBrace)) => self.table(),
            Some(Tok::Token(TokenKind::Function)) => {
                self.builder.start_node(ExprKind::AnonFn, self.offset());
                self.bump();
                self.func_body()?;
                Ok(self.builder.finish_node())
            }
            Some(Tok::Token(TokenKind::If)) => self.if_expr(),
            _ => self.suffixed_expr(),
        }
    }

    /// A name or parenthesized expression followed by any number of field
    /// accesses, index operations and calls.
    pub(crate) fn suffixed_expr(&mut self) -> PResult<NodeId> {
        let checkpoint = self.builder.checkpoint();
        let mut node = match self.peek_token() {
            Some(TokenKind::Name) => {
                self.builder.start_node(ExprKind::Var, self.offset());
                self.bump();
                self.builder.finish_node()
            }
            Some(TokenKind::LParen) => {
                self.builder.start_node(ExprKind::Wrap, self.offset());
                self.bump();
                self.expr()?;
                self.expect(TokenKind::RParen)?;
                self.builder.finish_node()
            }
            _ => return Err(self.unexpected("an expression")),
        };
        loop {
            match self.peek() {
                Some(Tok::Token(TokenKind::Dot)) => {
                    self.builder.start_node_at(checkpoint, ExprKind::Var);
                    self.bump();
                    self.expect_name()?;
                }
                Some(Tok::Token(TokenKind::LBracket)) => {
                    self.builder.start_node_at(checkpoint, ExprKind::Var);
                    self.bump();
                    self.expr()?;
                    self.expect(TokenKind::RBracket)?;
                }
                Some(Tok::Token(TokenKind::Colon)) => {
                    self.builder.start_node_at(checkpoint, ExprKind::Call);
                    self.bump();
                    self.expect_name()?;
                    self.arg_list()?;
                }
                Some(Tok::Token(TokenKind::LParen | TokenKind::LBrace))
                | Some(Tok::Literal(ExprKind::String)) => {
                    self.builder.start_node_at(checkpoint, ExprKind::Call);
                    self.arg_list()?;
                }
                _ => return Ok(node),
            }
            node = self.builder.finish_node();
        }
    }

    fn arg_list(&mut self) -> PResult {
        self.builder.start_node(AuxKind::ArgList, self.offset());
        match self.peek() {
            Some(Tok::Token(TokenKind::LParen)) => {
                self.bump();
                if !self.at(TokenKind::RParen) {
                    self.expr()?;
                    while self.eat(TokenKind::Comma) {
                        self.expr()?;
                    }
                }
                self.expect(TokenKind::RParen)?;
            }
            Some(Tok::Literal(ExprKind::String)) => {
                self.bump();
            }
            Some(Tok::Token(TokenKind::LBrace)) => {
                self.table()?;
            }
            _ => return Err(self.unexpected("call arguments")),
        }
        self.builder.finish_node();
        Ok(())
    }

    fn if_expr(&mut self) -> PResult<NodeId> {
        self.builder.start_node(ExprKind::IfExp, self.offset());
        self.bump();
        self.expr()?;
        self.expect(TokenKind::Then)?;
        self.expr()?;
        while self.eat(TokenKind::Elseif) {
            self.expr()?;
            self.expect(TokenKind::Then)?;
            self.expr()?;
        }
        self.expect(TokenKind::Else)?;
        self.expr()?;
        Ok(self.builder.finish_node())
    }

    fn table(&mut self) -> PResult<NodeId> {
        self.builder.start_node(ExprKind::Table, self.offset());
        self.expect(TokenKind::LBrace)?;
        if !self.at_raw(TokenKind::RBrace) {
            self.builder.start_node(AuxKind::FieldList, self.offset());
            loop {
                self.comments();
                if self.at(TokenKind::RBrace) {
                    break;
                }
                self.field()?;
                self.comments();
                if self.at(TokenKind::Comma) || self.at(TokenKind::Semi) {
                    self.bump();
                } else {
                    break;
                }
            }
            self.builder.finish_node();
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self.builder.finish_node())
    }

    fn field(&mut self) -> PResult {
        self.builder.start_node(AuxKind::Field, self.offset());
        if self.at(TokenKind::LBracket) {
            self.bump();
            self.expr()?;
            self.expect(TokenKind::RBracket)?;
            self.expect(TokenKind::Assign)?;
            self.expr()?;
        } else if self.at(TokenKind::Name) && self.nth(1) == Some(Tok::Token(TokenKind::Assign)) {
            self.bump();
            self.bump();
            self.expr()?;
        } else {
            self.expr()?;
        }
        self.builder.finish_node();
        Ok(())
    }

    fn interp_string(&mut self) -> PResult<NodeId> {
        self.builder.start_node(ExprKind::StringInterp, self.offset());
        self.bump();
        loop {
            match self.peek_token() {
                Some(TokenKind::InterpContent) => {
                    self.bump();
                }
                Some(TokenKind::InterpBraceOpen) => {
                    self.builder.start_node(AuxKind::InterpExp, self.offset());
                    self.bump();
                    self.expr()?;
                    self.expect(TokenKind::InterpBraceClose)?;
                    self.builder.finish_node();
                }
                Some(TokenKind::InterpEnd) => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected("the rest of the interpolated string")),
            }
        }
        Ok(self.builder.finish_node())
    }
}
