//! What a pass hands back to its caller.

/// Why a pass returned its input untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// The source did not parse.
    ParseError,
    /// The source has comments the formatter has nowhere to put.
    StrayComment,
}

/// Result of running the formatter or the rewriter over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutput {
    /// The pass ran. The text ends with exactly one newline.
    Rewritten(String),
    /// The pass refused to touch the file; `text` is the input, byte for byte.
    Unchanged {
        text: String,
        reason: UnchangedReason,
    },
}

impl PassOutput {
    pub fn text(&self) -> &str {
        match self {
            PassOutput::Rewritten(text) | PassOutput::Unchanged { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            PassOutput::Rewritten(text) | PassOutput::Unchanged { text, .. } => text,
        }
    }

    pub fn unchanged_reason(&self) -> Option<UnchangedReason> {
        match self {
            PassOutput::Rewritten(_) => None,
            PassOutput::Unchanged { reason, .. } => Some(*reason),
        }
    }
}

/// Strip every trailing newline and append exactly one.
pub fn with_single_trailing_newline(text: &str) -> String {
    let mut out = text.trim_end_matches(['\n', '\r']).to_string();
    out.push('\n');
    out
}
