use grove_tree::{Forest, NodeId, TokenKind, TreeAdaptor};

/// One element of a linearized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavSymbol {
    Node(NodeId),
    /// Opens the children of the preceding node.
    Down,
    /// Closes the innermost open child list.
    Up,
    Eof,
}

impl NavSymbol {
    pub fn kind<A: TreeAdaptor>(self, adaptor: &A) -> TokenKind {
        match self {
            Self::Node(node) => adaptor.kind(node),
            Self::Down => TokenKind::DOWN,
            Self::Up => TokenKind::UP,
            Self::Eof => TokenKind::EOF,
        }
    }

    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(node) => Some(node),
            Self::Down | Self::Up | Self::Eof => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    node: NodeId,
    next_child: usize,
    down_pending: bool,
    /// A nil root whose children are emitted without DOWN/UP around them.
    transparent: bool,
}

/// Produces the symbols of a tree one at a time, ending with a single EOF.
#[derive(Debug, Clone)]
pub(crate) struct Linearizer {
    root: NodeId,
    skip_nil_root: bool,
    pending_root: Option<NodeId>,
    stack: Vec<Frame>,
    finished: bool,
}

impl Linearizer {
    pub(crate) fn new(forest: &Forest, root: NodeId, skip_nil_root: bool) -> Self {
        let mut linearizer = Self {
            root,
            skip_nil_root,
            pending_root: None,
            stack: Vec::new(),
            finished: false,
        };
        linearizer.restart(forest);
        linearizer
    }

    pub(crate) fn restart(&mut self, forest: &Forest) {
        self.stack.clear();
        self.finished = false;
        self.pending_root = None;
        if self.skip_nil_root && forest.is_nil(self.root) {
            self.stack.push(Frame {
                node: self.root,
                next_child: 0,
                down_pending: false,
                transparent: true,
            });
        } else {
            self.pending_root = Some(self.root);
        }
    }

    fn enter(&mut self, forest: &Forest, node: NodeId) -> NavSymbol {
        if forest.child_count(node) > 0 {
            self.stack.push(Frame { node, next_child: 0, down_pending: true, transparent: false });
        }
        NavSymbol::Node(node)
    }

    pub(crate) fn next(&mut self, forest: &Forest) -> Option<NavSymbol> {
        if let Some(root) = self.pending_root.take() {
            return Some(self.enter(forest, root));
        }
        loop {
            let Some(frame) = self.stack.last_mut() else {
                if self.finished {
                    return None;
                }
                self.finished = true;
                return Some(NavSymbol::Eof);
            };
            if frame.down_pending {
                frame.down_pending = false;
                return Some(NavSymbol::Down);
            }
            if let Some(child) = forest.child(frame.node, frame.next_child) {
                frame.next_child += 1;
                return Some(self.enter(forest, child));
            }
            let closed = self.stack.pop();
            if closed.is_some_and(|frame| !frame.transparent) {
                return Some(NavSymbol::Up);
            }
        }
    }
}
