//! Debug renderings of a syntax tree: an indented outline and a serde-able
//! structure for `lc parse --json`.

use std::fmt;

use serde::Serialize;

use crate::tree::{SyntaxNode, SyntaxTree};

/// Owned, serializable copy of a node and its subtree.
#[derive(Debug, Serialize)]
pub struct TreeDump<'t> {
    pub kind: &'static str,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'t str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeDump<'t>>,
}

impl<'t> TreeDump<'t> {
    pub fn new(node: SyntaxNode<'t>) -> Self {
        Self {
            kind: node.kind().as_str(),
            start: node.start(),
            end: node.end(),
            text: node.is_leaf().then(|| node.text()),
            children: node.children().map(TreeDump::new).collect(),
        }
    }
}

/// Serializable view of a whole tree, errors included.
#[derive(Debug, Serialize)]
pub struct SyntaxTreeDump<'t> {
    pub has_error: bool,
    pub errors: Vec<String>,
    pub root: TreeDump<'t>,
}

impl<'t> From<&'t SyntaxTree> for SyntaxTreeDump<'t> {
    fn from(tree: &'t SyntaxTree) -> Self {
        Self {
            has_error: tree.has_error(),
            errors: tree.errors().iter().map(ToString::to_string).collect(),
            root: TreeDump::new(tree.root()),
        }
    }
}

pub(crate) fn write_outline(
    f: &mut fmt::Formatter<'_>,
    node: SyntaxNode<'_>,
    depth: usize,
) -> fmt::Result {
    write!(f, "{:indent$}{:?}", "", node, indent = depth * 2)?;
    if node.is_leaf() {
        write!(f, " {:?}", node.text())?;
    }
    writeln!(f)?;
    for child in node.children() {
        write_outline(f, child, depth + 1)?;
    }
    Ok(())
}
