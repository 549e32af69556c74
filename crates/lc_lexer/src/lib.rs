//! Tokenizer for Luau sources.
//!
//! Produces a flat token stream with byte ranges. Beyond plain Lua it
//! recognises:
//!
//! - floor division `//` and the compound assignments (`+=`, `//=`, `..=`, ...)
//! - interpolated strings (`` `a {b} c` ``), split into start / content /
//!   brace / end pieces with the embedded expressions tokenized normally
//! - `0b` binary literals and `_` digit separators
//!
//! Lexing never fails outright: anything it cannot make sense of becomes a
//! [`Tok::Error`] token and the parser reports it.

mod interp;

use interp::{InterpState, Mode};
use lc_syntax::{ExprKind, TokenKind};

/// What a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok {
    /// Keyword, punctuation, operator, name or interpolation piece.
    Token(TokenKind),
    /// Literal that becomes an expression leaf: `nil`, `true`, `false`,
    /// numbers, strings and `...`.
    Literal(ExprKind),
    Comment,
    Error(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Tok,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Tokenize a whole buffer.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        text: source,
        bytes: source.as_bytes(),
        pos: 0,
        interp: InterpState::new(),
        tokens: Vec::new(),
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    interp: InterpState,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            match self.interp.mode() {
                Mode::Literal => self.interp_literal(),
                Mode::Code => self.code(),
            }
        }
        if self.interp.in_string() {
            self.push(Tok::Error("unterminated interpolated string"), self.pos);
        }
    }

    fn peek(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn push(&mut self, kind: Tok, start: usize) {
        // A trailing backslash can step past the end.
        self.pos = self.pos.min(self.bytes.len());
        self.tokens.push(Token {
            kind,
            start,
            end: self.pos,
        });
    }

    fn token(&mut self, kind: TokenKind, len: usize) {
        let start = self.pos;
        self.pos += len;
        self.push(Tok::Token(kind), start);
    }

    fn code(&mut self) {
        let c = self.peek(0);
        let start = self.pos;
        match c {
            b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => self.pos += 1,
            b'-' if self.peek(1) == b'-' => self.comment(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.word(),
            b'0'..=b'9' => self.number(),
            b'.' if self.peek(1).is_ascii_digit() => self.number(),
            b'"' | b'\'' => self.short_string(c),
            b'[' if self.long_bracket_level(self.pos).is_some() => {
                match self.long_bracket(self.pos) {
                    Some(end) => {
                        self.pos = end;
                        self.push(Tok::Literal(ExprKind::String), start);
                    }
                    None => {
                        self.pos = self.bytes.len();
                        self.push(Tok::Error("unterminated long string"), start);
                    }
                }
            }
            b'`' => {
                self.interp.open();
                self.token(TokenKind::InterpStart, 1);
            }
            b'{' => {
                self.interp.open_brace();
                self.token(TokenKind::LBrace, 1);
            }
            b'}' => {
                if self.interp.close_brace() {
                    self.token(TokenKind::InterpBraceClose, 1);
                } else {
                    self.token(TokenKind::RBrace, 1);
                }
            }
            _ => self.operator(),
        }
    }

    fn operator(&mut self) {
        let (c0, c1, c2) = (self.peek(0), self.peek(1), self.peek(2));
        let (kind, len) = match (c0, c1, c2) {
            (b'.', b'.', b'.') => {
                let start = self.pos;
                self.pos += 3;
                self.push(Tok::Literal(ExprKind::Vararg), start);
                return;
            }
            (b'.', b'.', b'=') => (TokenKind::ConcatAssign, 3),
            (b'.', b'.', _) => (TokenKind::Concat, 2),
            (b'.', _, _) => (TokenKind::Dot, 1),
            (b'/', b'/', b'=') => (TokenKind::DoubleSlashAssign, 3),
            (b'/', b'/', _) => (TokenKind::DoubleSlash, 2),
            (b'/', b'=', _) => (TokenKind::SlashAssign, 2),
            (b'/', _, _) => (TokenKind::Slash, 1),
            (b'=', b'=', _) => (TokenKind::Eq, 2),
            (b'=', _, _) => (TokenKind::Assign, 1),
            (b'~', b'=', _) => (TokenKind::Ne, 2),
            (b'<', b'=', _) => (TokenKind::Le, 2),
            (b'<', _, _) => (TokenKind::Lt, 1),
            (b'>', b'=', _) => (TokenKind::Ge, 2),
            (b'>', _, _) => (TokenKind::Gt, 1),
            (b'+', b'=', _) => (TokenKind::PlusAssign, 2),
            (b'+', _, _) => (TokenKind::Plus, 1),
            (b'-', b'=', _) => (TokenKind::MinusAssign, 2),
            (b'-', _, _) => (TokenKind::Minus, 1),
            (b'*', b'=', _) => (TokenKind::StarAssign, 2),
            (b'*', _, _) => (TokenKind::Star, 1),
            (b'%', b'=', _) => (TokenKind::PercentAssign, 2),
            (b'%', _, _) => (TokenKind::Percent, 1),
            (b'^', b'=', _) => (TokenKind::CaretAssign, 2),
            (b'^', _, _) => (TokenKind::Caret, 1),
            (b'#', _, _) => (TokenKind::Hash, 1),
            (b'(', _, _) => (TokenKind::LParen, 1),
            (b')', _, _) => (TokenKind::RParen, 1),
            (b'[', _, _) => (TokenKind::LBracket, 1),
            (b']', _, _) => (TokenKind::RBracket, 1),
            (b';', _, _) => (TokenKind::Semi, 1),
            (b':', _, _) => (TokenKind::Colon, 1),
            (b',', _, _) => (TokenKind::Comma, 1),
            _ => {
                let start = self.pos;
                // Step over a whole character so ranges stay on char boundaries.
                let width = self.text[start..].chars().next().map_or(1, char::len_utf8);
                self.pos += width;
                self.push(Tok::Error("unexpected character"), start);
                return;
            }
        };
        self.token(kind, len);
    }

    fn word(&mut self) {
        let start = self.pos;
        while matches!(self.peek(0), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.pos += 1;
        }
        let kind = match &self.text[start..self.pos] {
            "nil" => Tok::Literal(ExprKind::Nil),
            "true" => Tok::Literal(ExprKind::True),
            "false" => Tok::Literal(ExprKind::False),
            word => Tok::Token(TokenKind::keyword(word).unwrap_or(TokenKind::Name)),
        };
        self.push(kind, start);
    }

    fn number(&mut self) {
        let start = self.pos;
        let radix_prefix = self.peek(0) == b'0' && matches!(self.peek(1), b'x' | b'X' | b'b' | b'B');
        if radix_prefix {
            self.pos += 2;
            while self.peek(0).is_ascii_hexdigit() || self.peek(0) == b'_' {
                self.pos += 1;
            }
        } else {
            self.digits();
            if self.peek(0) == b'.' && self.peek(1) != b'.' {
                self.pos += 1;
                self.digits();
            }
            if matches!(self.peek(0), b'e' | b'E') {
                self.pos += 1;
                if matches!(self.peek(0), b'+' | b'-') {
                    self.pos += 1;
                }
                self.digits();
            }
        }
        if self.peek(0).is_ascii_alphabetic() || self.peek(0) == b'_' {
            while self.peek(0).is_ascii_alphanumeric() || self.peek(0) == b'_' {
                self.pos += 1;
            }
            self.push(Tok::Error("malformed number"), start);
            return;
        }
        self.push(Tok::Literal(ExprKind::Number), start);
    }

    fn digits(&mut self) {
        while self.peek(0).is_ascii_digit() || self.peek(0) == b'_' {
            self.pos += 1;
        }
    }

    fn short_string(&mut self, quote: u8) {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek(0) {
                0 if self.pos >= self.bytes.len() => {
                    self.push(Tok::Error("unterminated string"), start);
                    return;
                }
                b'\n' => {
                    self.push(Tok::Error("unterminated string"), start);
                    return;
                }
                b'\\' => match (self.peek(1), self.peek(2)) {
                    // `\z` skips the whitespace after it, line breaks included.
                    (b'z', _) => {
                        self.pos += 2;
                        while self.peek(0).is_ascii_whitespace() {
                            self.pos += 1;
                        }
                    }
                    // An escaped CR LF pair is one line break.
                    (b'\r', b'\n') => self.pos += 3,
                    _ => self.pos += 2,
                },
                c if c == quote => {
                    self.pos += 1;
                    self.push(Tok::Literal(ExprKind::String), start);
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        if self.peek(0) == b'[' && self.long_bracket_level(self.pos).is_some() {
            match self.long_bracket(self.pos) {
                Some(end) => self.pos = end,
                None => {
                    self.pos = self.bytes.len();
                    self.push(Tok::Error("unterminated long comment"), start);
                    return;
                }
            }
        } else {
            while self.pos < self.bytes.len() && self.peek(0) != b'\n' {
                self.pos += 1;
            }
            // A CR before the newline is line-ending, not comment text.
            if self.pos > start + 2 && self.bytes[self.pos - 1] == b'\r' {
                self.pos -= 1;
                self.push(Tok::Comment, start);
                self.pos += 1;
                return;
            }
        }
        self.push(Tok::Comment, start);
    }

    /// Level of a long-bracket opener (`[[`, `[=[`, ...) starting at `at`.
    fn long_bracket_level(&self, at: usize) -> Option<usize> {
        let mut i = at + 1;
        while self.bytes.get(i) == Some(&b'=') {
            i += 1;
        }
        (self.bytes.get(i) == Some(&b'[')).then_some(i - at - 1)
    }

    /// End offset of the long-bracket literal opening at `at`.
    fn long_bracket(&self, at: usize) -> Option<usize> {
        let level = self.long_bracket_level(at)?;
        let closer = format!("]{}]", "=".repeat(level));
        let body = at + level + 2;
        self.text[body..]
            .find(&closer)
            .map(|off| body + off + closer.len())
    }

    /// Literal text of an interpolated string, up to the next `{` or the
    /// closing backtick.
    fn interp_literal(&mut self) {
        let start = self.pos;
        loop {
            match self.peek(0) {
                _ if self.pos >= self.bytes.len() => {
                    if self.pos > start {
                        self.push(Tok::Token(TokenKind::InterpContent), start);
                    }
                    return;
                }
                b'\\' => self.pos += 2,
                b'\n' => {
                    self.pos += 1;
                    self.push(Tok::Error("unterminated interpolated string"), start);
                    self.interp.abort();
                    return;
                }
                b'`' | b'{' => break,
                _ => self.pos += 1,
            }
        }
        if self.pos > start {
            self.push(Tok::Token(TokenKind::InterpContent), start);
        }
        if self.peek(0) == b'`' {
            self.interp.close();
            self.token(TokenKind::InterpEnd, 1);
        } else {
            self.interp.enter_code();
            self.token(TokenKind::InterpBraceOpen, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Tok> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        tokenize(source)
            .into_iter()
            .map(|t| t.text(source))
            .collect()
    }

    #[test]
    fn floor_division_operators() {
        assert_eq!(
            kinds("a //= b // c / d"),
            vec![
                Tok::Token(TokenKind::Name),
                Tok::Token(TokenKind::DoubleSlashAssign),
                Tok::Token(TokenKind::Name),
                Tok::Token(TokenKind::DoubleSlash),
                Tok::Token(TokenKind::Name),
                Tok::Token(TokenKind::Slash),
                Tok::Token(TokenKind::Name),
            ]
        );
    }

    #[test]
    fn concat_vararg_and_dot() {
        assert_eq!(texts("a..b ... c.d ..= 1.5"), vec!["a", "..", "b", "...", "c", ".", "d", "..=", "1.5"]);
        assert_eq!(kinds("...")[0], Tok::Literal(ExprKind::Vararg));
    }

    #[test]
    fn strings_with_escapes() {
        let src = r#"'don\'t' "say \"hi\"" [==[raw ]] still]==]"#;
        assert_eq!(texts(src), vec![r#"'don\'t'"#, r#""say \"hi\"""#, "[==[raw ]] still]==]"]);
        assert!(kinds(src)
            .iter()
            .all(|k| *k == Tok::Literal(ExprKind::String)));
    }

    #[test]
    fn skip_whitespace_escape_spans_lines() {
        let src = "s = \"a\\z\n   b\" .. 'c\\z\r\n\td'";
        assert_eq!(texts(src), vec!["s", "=", "\"a\\z\n   b\"", "..", "'c\\z\r\n\td'"]);
        assert_eq!(kinds(src)[2], Tok::Literal(ExprKind::String));
        assert_eq!(kinds(src)[4], Tok::Literal(ExprKind::String));
        assert_eq!(kinds("'a\\z\n\nb\nc'")[0], Tok::Error("unterminated string"));
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        assert_eq!(kinds("'abc\nx")[0], Tok::Error("unterminated string"));
    }

    #[test]
    fn comments_short_and_long() {
        let src = "-- line\nx --[[ block\n ]] y";
        assert_eq!(texts(src), vec!["-- line", "x", "--[[ block\n ]]", "y"]);
        assert_eq!(kinds(src)[0], Tok::Comment);
    }

    #[test]
    fn numbers() {
        assert_eq!(texts("0x1F 0b1010 1_000 3.25e-2 .5"), vec!["0x1F", "0b1010", "1_000", "3.25e-2", ".5"]);
        assert_eq!(kinds("12abc")[0], Tok::Error("malformed number"));
    }

    #[test]
    fn keywords_and_literals() {
        assert_eq!(
            kinds("if nil then true else false end"),
            vec![
                Tok::Token(TokenKind::If),
                Tok::Literal(ExprKind::Nil),
                Tok::Token(TokenKind::Then),
                Tok::Literal(ExprKind::True),
                Tok::Token(TokenKind::Else),
                Tok::Literal(ExprKind::False),
                Tok::Token(TokenKind::End),
            ]
        );
    }

    #[test]
    fn interpolated_string_pieces() {
        let src = "`a {b + {1}[1]} c`";
        assert_eq!(
            kinds(src),
            vec![
                Tok::Token(TokenKind::InterpStart),
                Tok::Token(TokenKind::InterpContent),
                Tok::Token(TokenKind::InterpBraceOpen),
                Tok::Token(TokenKind::Name),
                Tok::Token(TokenKind::Plus),
                Tok::Token(TokenKind::LBrace),
                Tok::Literal(ExprKind::Number),
                Tok::Token(TokenKind::RBrace),
                Tok::Token(TokenKind::LBracket),
                Tok::Literal(ExprKind::Number),
                Tok::Token(TokenKind::RBracket),
                Tok::Token(TokenKind::InterpBraceClose),
                Tok::Token(TokenKind::InterpContent),
                Tok::Token(TokenKind::InterpEnd),
            ]
        );
    }

    #[test]
    fn nested_interpolated_strings() {
        let src = "`x{`y{z}`}`";
        assert_eq!(
            texts(src),
            vec!["`", "x", "{", "`", "y", "{", "z", "}", "`", "}", "`"]
        );
    }

    #[test]
    fn unexpected_character() {
        assert!(kinds("a $ b").contains(&Tok::Error("unexpected character")));
        assert_eq!(texts("é"), vec!["é"]);
    }
}
