use lc_lexer::{tokenize, Tok, Token};
use lc_syntax::{AuxKind, NodeId, StmtKind, SyntaxError, SyntaxKind, SyntaxTree, TokenKind, TreeBuilder};

pub(crate) type PResult<T = ()> = Result<T, SyntaxError>;

/// Parse a Luau source buffer.
///
/// Never fails: on invalid input the returned tree has its error flag set
/// and an empty root, and consumers hand the text back unchanged.
pub fn parse(source: &str) -> SyntaxTree {
    let mut parser = Parser::new(source);
    match parser.chunk() {
        Ok(root) => parser.builder.finish(root),
        Err(error) => {
            tracing::debug!(%error, "source does not parse");
            parser.builder.abandon(AuxKind::Chunk, error)
        }
    }
}

pub(crate) struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    /// Index of the next unconsumed token, comments included.
    pos: usize,
    /// End of the last consumed token; where empty nodes are placed.
    last_end: usize,
    pub(crate) builder: TreeBuilder,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            last_end: 0,
            builder: TreeBuilder::new(source),
        }
    }

    fn chunk(&mut self) -> PResult<NodeId> {
        self.builder.start_node(AuxKind::Chunk, 0);
        self.block_items()?;
        if self.peek().is_some() {
            return Err(self.unexpected("end of file"));
        }
        Ok(self.builder.finish_node())
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    /// Kind of the `n`th upcoming token, skipping comments.
    pub(crate) fn nth(&self, n: usize) -> Option<Tok> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| t.kind != Tok::Comment)
            .nth(n)
            .map(|t| t.kind)
    }

    pub(crate) fn peek(&self) -> Option<Tok> {
        self.nth(0)
    }

    pub(crate) fn peek_token(&self) -> Option<TokenKind> {
        match self.peek() {
            Some(Tok::Token(kind)) => Some(kind),
            _ => None,
        }
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(Tok::Token(kind))
    }

    /// Text of the next non-comment token.
    pub(crate) fn peek_text(&self) -> &'a str {
        self.tokens[self.pos..]
            .iter()
            .find(|t| t.kind != Tok::Comment)
            .map_or("", |t| t.text(self.source))
    }

    /// Byte offset of the next non-comment token.
    pub(crate) fn offset(&self) -> usize {
        self.tokens[self.pos..]
            .iter()
            .find(|t| t.kind != Tok::Comment)
            .map_or(self.source.len(), |t| t.start)
    }

    pub(crate) fn last_end(&self) -> usize {
        self.last_end
    }

    /// Consume the next token as a leaf of its natural kind.
    pub(crate) fn bump(&mut self) -> NodeId {
        let token = self.advance();
        let kind: SyntaxKind = match token.kind {
            Tok::Token(kind) => kind.into(),
            Tok::Literal(kind) => kind.into(),
            Tok::Comment | Tok::Error(_) => {
                unreachable!("bump over {:?} at byte {}", token.kind, token.start)
            }
        };
        self.builder.leaf(kind, token.start, token.end)
    }

    /// Consume the next token as a leaf of `kind`.
    pub(crate) fn bump_as(&mut self, kind: impl Into<SyntaxKind>) -> NodeId {
        let token = self.advance();
        self.builder.leaf(kind, token.start, token.end)
    }

    /// Consume the next token without adding it to the tree.
    pub(crate) fn skip(&mut self) {
        self.advance();
    }

    fn advance(&mut self) -> Token {
        while self.tokens[self.pos].kind == Tok::Comment {
            let comment = self.tokens[self.pos];
            self.builder.stray_comment(comment.start..comment.end);
            self.pos += 1;
        }
        let token = self.tokens[self.pos];
        self.pos += 1;
        self.last_end = token.end;
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<NodeId> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&format!("`{kind}`")))
        }
    }

    pub(crate) fn expect_name(&mut self) -> PResult<NodeId> {
        if self.at(TokenKind::Name) {
            Ok(self.bump())
        } else {
            Err(self.unexpected("a name"))
        }
    }

    /// Move comments sitting at the cursor into the open node as comment
    /// statements. Returns how many were moved.
    pub(crate) fn comments(&mut self) -> usize {
        let mut moved = 0;
        while let Some(token) = self.tokens.get(self.pos).copied() {
            if token.kind != Tok::Comment {
                break;
            }
            self.builder.leaf(StmtKind::Comment, token.start, token.end);
            self.pos += 1;
            moved += 1;
        }
        moved
    }

    /// True when the raw next token (comments included) is `kind`.
    pub(crate) fn at_raw(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos).map(|t| t.kind) == Some(Tok::Token(kind))
    }

    pub(crate) fn unexpected(&self, expected: &str) -> SyntaxError {
        let found = match self.peek() {
            None => "end of file".to_string(),
            Some(Tok::Error(message)) => return SyntaxError::new(message, self.offset()),
            Some(_) => format!("`{}`", self.peek_text()),
        };
        SyntaxError::new(format!("expected {expected}, found {found}"), self.offset())
    }
}
