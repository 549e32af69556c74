use serde::{Deserialize, Serialize};

/// How calls with a single string or table argument are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallParens {
    /// `print "hi"`, `setup {debug = true}`
    #[default]
    Omit,
    /// `print("hi")`, `setup({debug = true})`
    Always,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub call_parens: CallParens,
}
