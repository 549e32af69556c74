//! Node-kind vocabulary.
//!
//! Every node carries a [`SyntaxKind`], which is one of four closed
//! categories. Formatting and rewriting match on the category they expect
//! (a statement list only ever holds [`StmtKind`]s, an operand slot only
//! ever holds an [`ExprKind`]), so a missing rule is a compile error rather
//! than a runtime surprise.
//!
//! The string names follow the Luau tree-sitter grammar (`ifexp`, `binexp`,
//! `var_stmt`, ...), which keeps tree dumps readable next to other tooling.

use std::fmt;

macro_rules! kind_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// Grammar name of this kind.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

kind_enum! {
    /// Leaf tokens: keywords, punctuation, operators, names and the pieces
    /// of an interpolated string.
    pub enum TokenKind {
        And => "and",
        Break => "break",
        Continue => "continue",
        Do => "do",
        Else => "else",
        Elseif => "elseif",
        End => "end",
        For => "for",
        Function => "function",
        If => "if",
        In => "in",
        Local => "local",
        Not => "not",
        Or => "or",
        Repeat => "repeat",
        Return => "return",
        Then => "then",
        Until => "until",
        While => "while",

        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LBracket => "[",
        RBracket => "]",
        Comma => ",",
        Semi => ";",
        Dot => ".",
        Colon => ":",
        Assign => "=",

        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        DoubleSlash => "//",
        Percent => "%",
        Caret => "^",
        Concat => "..",
        Eq => "==",
        Ne => "~=",
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
        Hash => "#",

        PlusAssign => "+=",
        MinusAssign => "-=",
        StarAssign => "*=",
        SlashAssign => "/=",
        DoubleSlashAssign => "//=",
        PercentAssign => "%=",
        CaretAssign => "^=",
        ConcatAssign => "..=",

        Name => "name",

        InterpStart => "interp_start",
        InterpContent => "interp_content",
        InterpBraceOpen => "interp_brace_open",
        InterpBraceClose => "interp_brace_close",
        InterpEnd => "interp_end",
    }
}

impl TokenKind {
    /// Keyword for an identifier-shaped word, if it is reserved.
    ///
    /// `continue` is contextual in Luau and is not listed; the
    /// parser decides whether a `continue` name is a statement.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "and" => TokenKind::And,
            "break" => TokenKind::Break,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::Elseif,
            "end" => TokenKind::End,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "in" => TokenKind::In,
            "local" => TokenKind::Local,
            "not" => TokenKind::Not,
            "or" => TokenKind::Or,
            "repeat" => TokenKind::Repeat,
            "return" => TokenKind::Return,
            "then" => TokenKind::Then,
            "until" => TokenKind::Until,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
                | TokenKind::DoubleSlashAssign
                | TokenKind::PercentAssign
                | TokenKind::CaretAssign
                | TokenKind::ConcatAssign
        )
    }
}

kind_enum! {
    /// Statement nodes. Comments sit in statement lists, so they live here.
    pub enum StmtKind {
        LocalVar => "local_var_stmt",
        LocalFn => "local_fn_stmt",
        Fn => "fn_stmt",
        Assign => "assign_stmt",
        /// Compound assignment (`a += b`, `a //= b`, ...).
        Var => "var_stmt",
        Call => "call_stmt",
        If => "if_stmt",
        While => "while_stmt",
        Repeat => "repeat_stmt",
        ForRange => "for_range_stmt",
        ForIn => "for_in_stmt",
        Do => "do_stmt",
        Return => "ret_stmt",
        Break => "break_stmt",
        Continue => "continue_stmt",
        Comment => "comment",
    }
}

kind_enum! {
    /// Expression nodes. Literals are leaves.
    pub enum ExprKind {
        Nil => "nil",
        True => "true",
        False => "false",
        Number => "number",
        String => "string",
        StringInterp => "string_interp",
        Vararg => "vararg",
        Table => "table",
        AnonFn => "anon_fn",
        Var => "var",
        Call => "call",
        Wrap => "exp_wrap",
        BinExp => "binexp",
        UnExp => "unexp",
        IfExp => "ifexp",
    }
}

kind_enum! {
    /// Structural nodes that are neither statements nor expressions.
    pub enum AuxKind {
        Chunk => "chunk",
        Block => "block",
        Binding => "binding",
        VarList => "varlist",
        ExpList => "explist",
        ArgList => "arglist",
        FieldList => "fieldlist",
        Field => "field",
        ParamList => "paramlist",
        FuncName => "funcname",
        FuncBody => "funcbody",
        InterpExp => "interp_exp",
    }
}

/// Kind tag of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Token(TokenKind),
    Stmt(StmtKind),
    Expr(ExprKind),
    Aux(AuxKind),
}

impl SyntaxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::Token(k) => k.as_str(),
            SyntaxKind::Stmt(k) => k.as_str(),
            SyntaxKind::Expr(k) => k.as_str(),
            SyntaxKind::Aux(k) => k.as_str(),
        }
    }

    pub fn token(self) -> Option<TokenKind> {
        match self {
            SyntaxKind::Token(k) => Some(k),
            _ => None,
        }
    }

    pub fn stmt(self) -> Option<StmtKind> {
        match self {
            SyntaxKind::Stmt(k) => Some(k),
            _ => None,
        }
    }

    pub fn expr(self) -> Option<ExprKind> {
        match self {
            SyntaxKind::Expr(k) => Some(k),
            _ => None,
        }
    }

    pub fn aux(self) -> Option<AuxKind> {
        match self {
            SyntaxKind::Aux(k) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        SyntaxKind::Token(kind)
    }
}

impl From<StmtKind> for SyntaxKind {
    fn from(kind: StmtKind) -> Self {
        SyntaxKind::Stmt(kind)
    }
}

impl From<ExprKind> for SyntaxKind {
    fn from(kind: ExprKind) -> Self {
        SyntaxKind::Expr(kind)
    }
}

impl From<AuxKind> for SyntaxKind {
    fn from(kind: AuxKind) -> Self {
        SyntaxKind::Aux(kind)
    }
}
