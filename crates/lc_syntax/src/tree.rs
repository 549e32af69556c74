//! Arena-held syntax tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. The
//! tree owns its nodes top-down through the child lists; the parent index is
//! a lookup aid only. Trees are immutable once [`TreeBuilder::finish`] has
//! run: a rewrite produces new text, which is parsed into a new tree.

use std::fmt;
use std::ops::Range;

use crate::kind::{StmtKind, SyntaxKind, TokenKind};

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: SyntaxKind,
    start: usize,
    end: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parse diagnostic. Any diagnostic sets the tree's error flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// A parsed source buffer.
#[derive(Clone)]
pub struct SyntaxTree {
    text: Box<str>,
    nodes: Vec<NodeData>,
    root: NodeId,
    errors: Vec<SyntaxError>,
    stray_comments: Vec<Range<usize>>,
}

impl SyntaxTree {
    pub fn root(&self) -> SyntaxNode<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    /// The text this tree was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the text did not fully match the grammar.
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Comments found where the tree has no slot for them (for instance
    /// between the operands of a binary expression).
    pub fn stray_comments(&self) -> &[Range<usize>] {
        &self.stray_comments
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::dump::write_outline(f, self.root(), 0)?;
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        Ok(())
    }
}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> SyntaxNode<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        self.tree.data(self.id).kind
    }

    pub fn start(&self) -> usize {
        self.tree.data(self.id).start
    }

    pub fn end(&self) -> usize {
        self.tree.data(self.id).end
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'t str {
        &self.tree.text[self.range()]
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.data(self.id).children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    pub fn child(&self, index: usize) -> Option<SyntaxNode<'t>> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .get(index)
            .map(|&id| SyntaxNode { tree, id })
    }

    /// Child at `index`, panicking with a shape diagnostic when absent.
    ///
    /// Callers use this where the grammar guarantees the child exists, so a
    /// miss means the parser and the consumer disagree about a node's shape.
    pub fn expect_child(&self, index: usize) -> SyntaxNode<'t> {
        self.child(index).unwrap_or_else(|| {
            panic!(
                "malformed `{}` node at byte {}: expected a child at index {}, found {}",
                self.kind(),
                self.start(),
                index,
                self.child_count()
            )
        })
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = SyntaxNode<'t>> + ExactSizeIterator {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| SyntaxNode { tree, id })
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        let tree = self.tree;
        tree.data(self.id).parent.map(|id| SyntaxNode { tree, id })
    }

    /// Token kind of this node if it is a leaf token.
    pub fn token_kind(&self) -> Option<TokenKind> {
        self.kind().token()
    }

    pub fn is_token(&self, kind: TokenKind) -> bool {
        self.kind() == SyntaxKind::Token(kind)
    }

    pub fn is_stmt(&self, kind: StmtKind) -> bool {
        self.kind() == SyntaxKind::Stmt(kind)
    }

    /// Sibling immediately before this node.
    pub fn prev_sibling(&self) -> Option<SyntaxNode<'t>> {
        let parent = self.parent()?;
        let siblings = &self.tree.data(parent.id).children;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        pos.checked_sub(1).map(|i| SyntaxNode {
            tree: self.tree,
            id: siblings[i],
        })
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.kind(), self.start(), self.end())
    }
}

/// Marks a position in the children of the innermost open node, so a node
/// can later be opened *around* everything parsed since.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    depth: usize,
    len: usize,
}

struct OpenNode {
    kind: SyntaxKind,
    start: usize,
    children: Vec<NodeId>,
}

/// Bottom-up tree construction with checkpoints, in the style of a rowan
/// `GreenNodeBuilder`.
pub struct TreeBuilder {
    text: Box<str>,
    nodes: Vec<NodeData>,
    stack: Vec<OpenNode>,
    errors: Vec<SyntaxError>,
    stray_comments: Vec<Range<usize>>,
}

impl TreeBuilder {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            nodes: Vec::new(),
            stack: Vec::new(),
            errors: Vec::new(),
            stray_comments: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Add a leaf covering `start..end` to the innermost open node.
    pub fn leaf(&mut self, kind: impl Into<SyntaxKind>, start: usize, end: usize) -> NodeId {
        let id = self.alloc(NodeData {
            kind: kind.into(),
            start,
            end,
            parent: None,
            children: Vec::new(),
        });
        self.attach(id);
        id
    }

    /// Open a node. `at` is its position if it ends up with no children.
    pub fn start_node(&mut self, kind: impl Into<SyntaxKind>, at: usize) {
        self.stack.push(OpenNode {
            kind: kind.into(),
            start: at,
            children: Vec::new(),
        });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            depth: self.stack.len(),
            len: self.stack.last().map_or(0, |open| open.children.len()),
        }
    }

    /// Open a node that adopts every child added since `checkpoint`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: impl Into<SyntaxKind>) {
        assert_eq!(
            checkpoint.depth,
            self.stack.len(),
            "checkpoint used at a different nesting depth"
        );
        let parent = self
            .stack
            .last_mut()
            .expect("start_node_at called without an open node");
        let adopted = parent.children.split_off(checkpoint.len);
        let start = adopted
            .first()
            .map_or(self.text.len(), |&id| self.nodes[id.index()].start);
        self.stack.push(OpenNode {
            kind: kind.into(),
            start,
            children: adopted,
        });
    }

    pub fn finish_node(&mut self) -> NodeId {
        let open = self
            .stack
            .pop()
            .expect("finish_node called without an open node");
        let (start, end) = match (open.children.first(), open.children.last()) {
            (Some(first), Some(last)) => (
                self.nodes[first.index()].start,
                self.nodes[last.index()].end,
            ),
            _ => (open.start, open.start),
        };
        let id = self.alloc(NodeData {
            kind: open.kind,
            start,
            end,
            parent: None,
            children: open.children,
        });
        self.attach(id);
        id
    }

    /// Change the kind of an already finished node.
    pub fn retag(&mut self, id: NodeId, kind: impl Into<SyntaxKind>) {
        self.nodes[id.index()].kind = kind.into();
    }

    pub fn kind_of(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].kind
    }

    pub fn error(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    pub fn stray_comment(&mut self, range: Range<usize>) {
        self.stray_comments.push(range);
    }

    /// Seal the tree with `root` (the last finished node) as its root.
    pub fn finish(mut self, root: NodeId) -> SyntaxTree {
        debug_assert!(self.stack.is_empty(), "unfinished nodes left on the stack");
        let len = self.text.len();
        let data = &mut self.nodes[root.index()];
        data.start = 0;
        data.end = len;
        for index in 0..self.nodes.len() {
            let id = NodeId(index as u32);
            for child in self.nodes[index].children.clone() {
                self.nodes[child.index()].parent = Some(id);
            }
        }
        SyntaxTree {
            text: self.text,
            nodes: self.nodes,
            root,
            errors: self.errors,
            stray_comments: self.stray_comments,
        }
    }

    /// Give up on the partial tree: the result is an empty `root_kind` node
    /// spanning the text, carrying every error recorded so far plus `error`.
    pub fn abandon(self, root_kind: impl Into<SyntaxKind>, error: SyntaxError) -> SyntaxTree {
        let mut errors = self.errors;
        errors.push(error);
        let len = self.text.len();
        SyntaxTree {
            text: self.text,
            nodes: vec![NodeData {
                kind: root_kind.into(),
                start: 0,
                end: len,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            errors,
            stray_comments: self.stray_comments,
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    fn attach(&mut self, id: NodeId) {
        if let Some(open) = self.stack.last_mut() {
            open.children.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{AuxKind, ExprKind};

    /// `a // b` built by hand: a binexp wrapped around an already-added var.
    fn floor_div_tree() -> SyntaxTree {
        let mut b = TreeBuilder::new("a // b");
        b.start_node(AuxKind::Chunk, 0);
        let cp = b.checkpoint();
        b.start_node(ExprKind::Var, 0);
        b.leaf(TokenKind::Name, 0, 1);
        b.finish_node();
        b.start_node_at(cp, ExprKind::BinExp);
        b.leaf(TokenKind::DoubleSlash, 2, 4);
        b.start_node(ExprKind::Var, 5);
        b.leaf(TokenKind::Name, 5, 6);
        b.finish_node();
        b.finish_node();
        let root = b.finish_node();
        b.finish(root)
    }

    #[test]
    fn checkpoint_wraps_earlier_children() {
        let tree = floor_div_tree();
        let bin = tree.root().expect_child(0);
        assert_eq!(bin.kind(), SyntaxKind::Expr(ExprKind::BinExp));
        assert_eq!(bin.range(), 0..6);
        assert_eq!(bin.child_count(), 3);
        assert_eq!(bin.expect_child(1).text(), "//");
        assert!(!tree.has_error());
    }

    #[test]
    fn parents_are_linked() {
        let tree = floor_div_tree();
        let bin = tree.root().expect_child(0);
        let rhs = bin.expect_child(2);
        assert_eq!(rhs.parent().map(|p| p.id()), Some(bin.id()));
        assert_eq!(rhs.prev_sibling().map(|s| s.text()), Some("//"));
        assert!(tree.root().parent().is_none());
    }

    #[test]
    fn abandoned_tree_keeps_text_and_error() {
        let b = TreeBuilder::new("local = 1");
        let tree = b.abandon(AuxKind::Chunk, SyntaxError::new("expected name", 6));
        assert!(tree.has_error());
        assert_eq!(tree.text(), "local = 1");
        assert_eq!(tree.root().child_count(), 0);
        assert_eq!(tree.errors()[0].to_string(), "expected name at byte 6");
    }

    #[test]
    #[should_panic(expected = "malformed `binexp` node")]
    fn missing_child_is_a_shape_defect() {
        let tree = floor_div_tree();
        tree.root().expect_child(0).expect_child(7);
    }
}
