use serde::{Deserialize, Serialize};

/// Which constructs the rewriter lowers, and how long it may iterate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatOptions {
    /// `if c then a else b` in expression position.
    pub if_expressions: bool,
    /// `a // b`
    pub floor_division: bool,
    /// `a //= b`
    pub compound_floor_division: bool,
    /// Upper bound on rewrite passes before giving up.
    pub max_iterations: usize,
}

impl Default for CompatOptions {
    fn default() -> Self {
        Self {
            if_expressions: true,
            floor_division: true,
            compound_floor_division: true,
            max_iterations: 64,
        }
    }
}
