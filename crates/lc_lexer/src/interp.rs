//! Nesting state for interpolated strings.

/// Which lexer routine handles the next byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Ordinary code, possibly inside an interpolation's `{...}`.
    Code,
    /// Literal text of an interpolated string.
    Literal,
}

/// One entry per interpolated string currently open, innermost last:
/// - `None` = in the literal part (between `` ` `` and `{`, or `}` and `` ` ``)
/// - `Some(depth)` = inside an interpolation, `depth` unmatched `{` deep
#[derive(Debug, Default)]
pub(crate) struct InterpState {
    stack: Vec<Option<u32>>,
}

impl InterpState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        match self.stack.last() {
            Some(None) => Mode::Literal,
            _ => Mode::Code,
        }
    }

    pub fn in_string(&self) -> bool {
        !self.stack.is_empty()
    }

    /// An opening backtick.
    pub fn open(&mut self) {
        self.stack.push(None);
    }

    /// The closing backtick of the innermost string.
    pub fn close(&mut self) {
        self.stack.pop();
    }

    /// Drop the innermost string after a lexing error inside it.
    pub fn abort(&mut self) {
        self.stack.pop();
    }

    /// The `{` that starts an interpolation.
    pub fn enter_code(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            *top = Some(0);
        }
    }

    /// A `{` in code.
    pub fn open_brace(&mut self) {
        if let Some(Some(depth)) = self.stack.last_mut() {
            *depth += 1;
        }
    }

    /// A `}` in code. Returns true when it closes an interpolation, in which
    /// case the lexer is back in the string's literal part.
    pub fn close_brace(&mut self) -> bool {
        match self.stack.last_mut() {
            Some(slot @ Some(0)) => {
                *slot = None;
                true
            }
            Some(Some(depth)) => {
                *depth -= 1;
                false
            }
            _ => false,
        }
    }
}
