//! Tree walk that rebuilds canonical source text.

use lc_syntax::{AuxKind, ExprKind, StmtKind, SyntaxKind, SyntaxNode, TokenKind};

use crate::options::{CallParens, FormatOptions};
use crate::string::normalize_quotes;

pub(crate) struct Formatter<'a> {
    source: &'a str,
    options: &'a FormatOptions,
    pub(crate) output: String,
    indent: usize,
}

/// Panic for a child the grammar does not allow in `parent`.
fn malformed(parent: SyntaxNode<'_>, child: SyntaxNode<'_>) -> ! {
    panic!(
        "no formatting rule for `{}` inside `{}` at byte {}",
        child.kind(),
        parent.kind(),
        child.start()
    )
}

impl<'a> Formatter<'a> {
    pub(crate) fn new(source: &'a str, options: &'a FormatOptions) -> Self {
        Self {
            source,
            options,
            output: String::with_capacity(source.len()),
            indent: 0,
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// True when nothing but spaces separates `from` and `to` in the source,
    /// i.e. a comment at `to` shares a line with whatever ended at `from`.
    fn same_line(&self, from: usize, to: usize) -> bool {
        !self.source[from..to].contains('\n')
    }

    /// Append a comment to the line just written.
    fn trailing_comment(&mut self, comment: SyntaxNode<'_>) {
        if self.output.ends_with('\n') {
            self.output.pop();
        }
        self.write(" ");
        self.write(comment.text());
        self.newline();
    }

    fn comma_sep<'t>(&mut self, items: impl Iterator<Item = SyntaxNode<'t>>) {
        for (i, item) in items.enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(item);
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Statements of a chunk or block, one per line.
    pub(crate) fn statements(&mut self, block: SyntaxNode<'_>) {
        // `then`, `do`, `)` and friends; a comment on their line stays there.
        let opener_end = block.prev_sibling().map(|opener| opener.end());
        let mut prev: Option<(SyntaxNode<'_>, StmtKind)> = None;
        // Kind of the last statement that started its own line.
        let mut line_kind: Option<StmtKind> = None;
        for stmt in block.children() {
            let Some(kind) = stmt.kind().stmt() else {
                malformed(block, stmt)
            };
            let line_end = prev.map(|(p, _)| p.end()).or(opener_end);
            if kind == StmtKind::Comment && line_end.is_some_and(|end| self.same_line(end, stmt.start())) {
                self.trailing_comment(stmt);
                prev = Some((stmt, kind));
                continue;
            }
            match (prev, line_kind, kind) {
                (Some((_, prev_kind)), _, StmtKind::Comment) if prev_kind != StmtKind::Comment => {
                    self.newline();
                }
                (_, Some(StmtKind::LocalVar), StmtKind::Call | StmtKind::Assign | StmtKind::Var) => {
                    self.newline();
                }
                _ => {}
            }
            self.statement(stmt, kind);
            prev = Some((stmt, kind));
            line_kind = Some(kind);
        }
    }

    fn statement(&mut self, stmt: SyntaxNode<'_>, kind: StmtKind) {
        match kind {
            StmtKind::LocalVar => {
                self.write_indent();
                for child in stmt.children() {
                    match child.kind() {
                        SyntaxKind::Token(TokenKind::Local) => self.write("local "),
                        SyntaxKind::Token(TokenKind::Comma) => self.write(", "),
                        SyntaxKind::Token(TokenKind::Assign) => self.write(" = "),
                        SyntaxKind::Aux(AuxKind::Binding) => self.write(child.text()),
                        SyntaxKind::Expr(_) => self.expr(child),
                        _ => malformed(stmt, child),
                    }
                }
                self.newline();
            }
            StmtKind::LocalFn => {
                self.write_indent();
                self.write("local function ");
                self.write(stmt.expect_child(2).text());
                self.func_body(stmt.expect_child(3));
                self.newline();
            }
            StmtKind::Fn => {
                self.write_indent();
                self.write("function ");
                for part in stmt.expect_child(1).children() {
                    self.write(part.text());
                }
                self.func_body(stmt.expect_child(2));
                self.newline();
            }
            StmtKind::Assign => {
                self.write_indent();
                let vars = stmt.expect_child(0);
                self.comma_sep(vars.children().filter(|c| c.kind().expr().is_some()));
                self.write(" = ");
                let values = stmt.expect_child(2);
                self.comma_sep(values.children().filter(|c| c.kind().expr().is_some()));
                self.newline();
            }
            StmtKind::Var => {
                self.write_indent();
                self.expr(stmt.expect_child(0));
                self.write(" ");
                self.write(stmt.expect_child(1).text());
                self.write(" ");
                self.expr(stmt.expect_child(2));
                self.newline();
            }
            StmtKind::Call => {
                self.write_indent();
                self.call(stmt);
                self.newline();
            }
            StmtKind::If
            | StmtKind::While
            | StmtKind::Repeat
            | StmtKind::ForRange
            | StmtKind::ForIn
            | StmtKind::Do => self.block_statement(stmt),
            StmtKind::Return => {
                self.write_indent();
                self.write("return");
                if stmt.child_count() > 1 {
                    self.write(" ");
                    self.comma_sep(stmt.children().filter(|c| c.kind().expr().is_some()));
                }
                self.newline();
            }
            StmtKind::Break => {
                self.write_indent();
                self.write("break\n");
            }
            StmtKind::Continue => {
                self.write_indent();
                self.write("continue\n");
            }
            StmtKind::Comment => {
                self.write_indent();
                self.write(stmt.text());
                self.newline();
            }
        }
    }

    /// Statements built from keywords and nested blocks. Block-opening
    /// keywords end their line and indent what follows; block-closing
    /// keywords dedent before starting theirs.
    fn block_statement(&mut self, stmt: SyntaxNode<'_>) {
        for (index, child) in stmt.children().enumerate() {
            match child.kind() {
                SyntaxKind::Token(TokenKind::If | TokenKind::While | TokenKind::For) => {
                    self.write_indent();
                    self.write(child.text());
                    self.write(" ");
                }
                SyntaxKind::Token(TokenKind::Repeat) => {
                    self.write_indent();
                    self.write("repeat\n");
                    self.indent += 1;
                }
                SyntaxKind::Token(TokenKind::Do) => {
                    if index == 0 {
                        self.write_indent();
                        self.write("do\n");
                    } else {
                        self.write(" do\n");
                    }
                    self.indent += 1;
                }
                SyntaxKind::Token(TokenKind::Then) => {
                    self.write(" then\n");
                    self.indent += 1;
                }
                SyntaxKind::Token(TokenKind::Elseif) => {
                    self.dedent();
                    self.write_indent();
                    self.write("elseif ");
                }
                SyntaxKind::Token(TokenKind::Else) => {
                    self.dedent();
                    self.write_indent();
                    self.write("else\n");
                    self.indent += 1;
                }
                SyntaxKind::Token(TokenKind::End) => {
                    self.dedent();
                    self.write_indent();
                    self.write("end\n");
                }
                SyntaxKind::Token(TokenKind::Until) => {
                    self.dedent();
                    self.write_indent();
                    self.write("until ");
                }
                SyntaxKind::Token(TokenKind::Assign) => self.write(" = "),
                SyntaxKind::Token(TokenKind::Comma) => self.write(", "),
                SyntaxKind::Token(TokenKind::In) => self.write(" in "),
                SyntaxKind::Aux(AuxKind::Binding) => self.write(child.text()),
                SyntaxKind::Aux(AuxKind::Block) => self.statements(child),
                SyntaxKind::Expr(_) => self.expr(child),
                _ => malformed(stmt, child),
            }
        }
        // `until cond` is the only form that ends on an expression.
        if !self.output.ends_with('\n') {
            self.newline();
        }
    }

    /// `(params)`, the indented body and `end`, leaving the cursor after `end`.
    fn func_body(&mut self, body: SyntaxNode<'_>) {
        for child in body.children() {
            match child.kind() {
                SyntaxKind::Token(TokenKind::LParen) => self.write("("),
                SyntaxKind::Aux(AuxKind::ParamList) => {
                    for (i, param) in child
                        .children()
                        .filter(|p| !p.is_token(TokenKind::Comma))
                        .enumerate()
                    {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.write(param.text());
                    }
                }
                SyntaxKind::Token(TokenKind::RParen) => {
                    self.write(")\n");
                    self.indent += 1;
                }
                SyntaxKind::Aux(AuxKind::Block) => self.statements(child),
                SyntaxKind::Token(TokenKind::End) => {
                    self.dedent();
                    self.write_indent();
                    self.write("end");
                }
                _ => malformed(body, child),
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, node: SyntaxNode<'_>) {
        let Some(kind) = node.kind().expr() else {
            panic!(
                "expected an expression, found `{}` at byte {}",
                node.kind(),
                node.start()
            )
        };
        match kind {
            ExprKind::Nil
            | ExprKind::True
            | ExprKind::False
            | ExprKind::Number
            | ExprKind::Vararg => self.write(node.text()),
            ExprKind::String => {
                let literal = normalize_quotes(node.text());
                self.write(&literal);
            }
            ExprKind::StringInterp => self.interp_string(node),
            ExprKind::Table => self.table(node),
            ExprKind::AnonFn => {
                self.write("function");
                self.func_body(node.expect_child(1));
            }
            ExprKind::Var => {
                for child in node.children() {
                    match child.kind() {
                        SyntaxKind::Token(TokenKind::Name) => self.write(child.text()),
                        SyntaxKind::Token(TokenKind::Dot) => self.write("."),
                        SyntaxKind::Token(TokenKind::LBracket) => self.write("["),
                        SyntaxKind::Token(TokenKind::RBracket) => self.write("]"),
                        SyntaxKind::Expr(_) => self.expr(child),
                        _ => malformed(node, child),
                    }
                }
            }
            ExprKind::Call => self.call(node),
            ExprKind::Wrap => {
                self.write("(");
                self.expr(node.expect_child(1));
                self.write(")");
            }
            ExprKind::BinExp => {
                self.expr(node.expect_child(0));
                self.write(" ");
                self.write(node.expect_child(1).text());
                self.write(" ");
                self.expr(node.expect_child(2));
            }
            ExprKind::UnExp => {
                let op = node.expect_child(0);
                let operand = node.expect_child(1);
                match op.token_kind() {
                    Some(TokenKind::Not) => self.write("not "),
                    Some(TokenKind::Hash) => self.write("#"),
                    Some(TokenKind::Minus) => {
                        self.write("-");
                        // `- -x` must not collapse into a `--` comment.
                        let nested_minus = operand.kind() == SyntaxKind::Expr(ExprKind::UnExp)
                            && operand.child(0).is_some_and(|c| c.is_token(TokenKind::Minus));
                        if nested_minus {
                            self.write(" ");
                        }
                    }
                    _ => malformed(node, op),
                }
                self.expr(operand);
            }
            ExprKind::IfExp => {
                for child in node.children() {
                    match child.kind() {
                        SyntaxKind::Token(TokenKind::If) => self.write("if "),
                        SyntaxKind::Token(TokenKind::Then) => self.write(" then "),
                        SyntaxKind::Token(TokenKind::Elseif) => self.write(" elseif "),
                        SyntaxKind::Token(TokenKind::Else) => self.write(" else "),
                        SyntaxKind::Expr(_) => self.expr(child),
                        _ => malformed(node, child),
                    }
                }
            }
        }
    }

    fn interp_string(&mut self, node: SyntaxNode<'_>) {
        for child in node.children() {
            match child.kind() {
                SyntaxKind::Token(TokenKind::InterpStart | TokenKind::InterpEnd) => self.write("`"),
                SyntaxKind::Token(TokenKind::InterpContent) => self.write(child.text()),
                SyntaxKind::Aux(AuxKind::InterpExp) => {
                    self.write("{");
                    let at = self.output.len();
                    self.expr(child.expect_child(1));
                    // Luau rejects doubled braces inside an interpolated string.
                    if self.output[at..].starts_with('{') {
                        self.output.insert(at, ' ');
                    }
                    if self.output.ends_with('}') {
                        self.write(" ");
                    }
                    self.write("}");
                }
                _ => malformed(node, child),
            }
        }
    }

    /// Calls in statement and expression position share one shape:
    /// `[callee, (:, name)?, arglist]`.
    fn call(&mut self, node: SyntaxNode<'_>) {
        for child in node.children() {
            match child.kind() {
                SyntaxKind::Expr(_) => self.expr(child),
                SyntaxKind::Token(TokenKind::Colon) => self.write(":"),
                SyntaxKind::Token(TokenKind::Name) => self.write(child.text()),
                SyntaxKind::Aux(AuxKind::ArgList) => self.args(child),
                _ => malformed(node, child),
            }
        }
    }

    fn args(&mut self, arglist: SyntaxNode<'_>) {
        let args: Vec<_> = arglist
            .children()
            .filter(|c| c.kind().expr().is_some())
            .collect();
        let sugar = matches!(
            args.as_slice(),
            [only] if matches!(only.kind().expr(), Some(ExprKind::String | ExprKind::Table))
        );
        if sugar && self.options.call_parens == CallParens::Omit {
            self.write(" ");
            self.expr(args[0]);
        } else {
            self.write("(");
            self.comma_sep(args.into_iter());
            self.write(")");
        }
    }

    /// Tables with two or more fields, or with comments, get one field per
    /// line and a trailing comma; the rest stay inline.
    fn table(&mut self, node: SyntaxNode<'_>) {
        let Some(fields) = node.children().find(|c| c.kind() == SyntaxKind::Aux(AuxKind::FieldList)) else {
            self.write("{}");
            return;
        };
        let field_count = fields
            .children()
            .filter(|c| c.kind() == SyntaxKind::Aux(AuxKind::Field))
            .count();
        let has_comments = fields.children().any(|c| c.is_stmt(StmtKind::Comment));

        if field_count <= 1 && !has_comments {
            let at = self.output.len();
            self.write("{");
            if let Some(field) = fields.children().find(|c| c.kind() == SyntaxKind::Aux(AuxKind::Field)) {
                self.field(field);
            }
            self.write("}");
            // A lone field that spans lines gets the multiline layout too.
            if !self.output[at..].contains('\n') {
                return;
            }
            self.output.truncate(at);
        }

        self.write("{\n");
        self.indent += 1;
        let mut prev_end: Option<usize> = None;
        for child in fields.children() {
            match child.kind() {
                SyntaxKind::Aux(AuxKind::Field) => {
                    self.write_indent();
                    self.field(child);
                    self.write(",\n");
                    prev_end = Some(child.end());
                }
                SyntaxKind::Token(TokenKind::Comma | TokenKind::Semi) => prev_end = Some(child.end()),
                SyntaxKind::Stmt(StmtKind::Comment) => {
                    match prev_end {
                        Some(end) if self.same_line(end, child.start()) => self.trailing_comment(child),
                        _ => {
                            self.write_indent();
                            self.write(child.text());
                            self.newline();
                        }
                    }
                    prev_end = Some(child.end());
                }
                _ => malformed(fields, child),
            }
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn field(&mut self, field: SyntaxNode<'_>) {
        for child in field.children() {
            match child.kind() {
                SyntaxKind::Token(TokenKind::Name) => self.write(child.text()),
                SyntaxKind::Token(TokenKind::Assign) => self.write(" = "),
                SyntaxKind::Token(TokenKind::LBracket) => self.write("["),
                SyntaxKind::Token(TokenKind::RBracket) => self.write("]"),
                SyntaxKind::Expr(_) => self.expr(child),
                _ => malformed(field, child),
            }
        }
    }
}
