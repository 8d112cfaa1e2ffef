use crate::{Forest, NodeId, NodeShape, Token, TokenKind, TreeError};

/// The only sanctioned way to create and restructure tree nodes.
///
/// Implementors provide the backing [`Forest`] and may override the token
/// policy hooks; node allocation and structural operations are provided.
pub trait TreeAdaptor {
    fn forest(&self) -> &Forest;

    fn forest_mut(&mut self) -> &mut Forest;

    /// Token carried by an imaginary node built from a type and text alone.
    fn create_token(&self, kind: TokenKind, text: &str) -> Token {
        Token::synthetic(kind, text)
    }

    /// Token carried by an imaginary node attributed to `from`: keeps the
    /// position of `from`, overrides the kind and optionally the text.
    fn create_token_from(&self, kind: TokenKind, from: &Token, text: Option<&str>) -> Token {
        let mut token = from.clone();
        token.kind = kind;
        if let Some(text) = text {
            token.text = Some(text.into());
        }
        token
    }

    /// Payload copy used by [`TreeAdaptor::dup_node`].
    fn copy_token(&self, token: &Token) -> Token {
        token.clone()
    }

    /// A leaf wrapping `token`.
    fn create(&mut self, token: Token) -> NodeId {
        self.forest_mut().alloc(Some(token))
    }

    fn create_from_type(&mut self, kind: TokenKind, text: &str) -> NodeId {
        let token = self.create_token(kind, text);
        self.create(token)
    }

    fn create_from_token(&mut self, kind: TokenKind, from: &Token, text: Option<&str>) -> NodeId {
        let token = self.create_token_from(kind, from, text);
        self.create(token)
    }

    /// A fresh, empty list root.
    fn nil(&mut self) -> NodeId {
        self.forest_mut().alloc(None)
    }

    fn is_nil(&self, node: NodeId) -> bool {
        self.forest().is_nil(node)
    }

    fn shape(&self, node: NodeId) -> NodeShape {
        self.forest().shape(node)
    }

    /// Copies the payload of `node` into a new detached node without children.
    fn dup_node(&mut self, node: NodeId) -> NodeId {
        let token = self.forest().token(node).map(|token| self.copy_token(token));
        let start = self.forest().token_start_index(node);
        let stop = self.forest().token_stop_index(node);
        let forest = self.forest_mut();
        let copy = forest.alloc(token);
        forest.set_token_boundaries(copy, start, stop);
        copy
    }

    /// Deep copy of the subtree rooted at `node`; shares no nodes with it.
    fn dup_tree(&mut self, node: NodeId) -> NodeId {
        match self.shape(node) {
            NodeShape::Leaf => self.dup_node(node),
            NodeShape::Nil | NodeShape::Subtree => {
                let copy = self.dup_node(node);
                let children = self.forest().children(node).to_vec();
                for child in children {
                    let child_copy = self.dup_tree(child);
                    self.forest_mut().add_child(copy, child_copy);
                }
                copy
            }
        }
    }

    #[track_caller]
    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.forest_mut().add_child(parent, child);
    }

    /// Makes `new_root` the root of `old_root` and returns the resulting root.
    ///
    /// A nil `old_root` hands its children to `new_root`; otherwise `old_root`
    /// is appended as a child. A nil `new_root` holding exactly one node is
    /// replaced by that node.
    fn become_root(&mut self, new_root: NodeId, old_root: NodeId) -> Result<NodeId, TreeError> {
        let new_root = match self.shape(new_root) {
            NodeShape::Nil => match self.forest().children(new_root) {
                [] => new_root,
                &[only] => {
                    self.forest_mut().detach(only);
                    only
                }
                many => return Err(TreeError::MultipleRoots { count: many.len() }),
            },
            NodeShape::Leaf | NodeShape::Subtree => new_root,
        };
        self.forest_mut().add_child(new_root, old_root);
        Ok(new_root)
    }

    fn become_root_token(
        &mut self,
        new_root: Token,
        old_root: NodeId,
    ) -> Result<NodeId, TreeError> {
        let new_root = self.create(new_root);
        self.become_root(new_root, old_root)
    }

    /// Normalizes the tree a rule built: a list of one tree becomes that
    /// tree, an empty list becomes no result.
    fn rule_post_processing(&mut self, root: NodeId) -> Option<NodeId> {
        match self.shape(root) {
            NodeShape::Nil => match *self.forest().children(root) {
                [] => None,
                [only] => {
                    self.forest_mut().detach(only);
                    Some(only)
                }
                _ => Some(root),
            },
            NodeShape::Leaf | NodeShape::Subtree => Some(root),
        }
    }

    fn replace_children(
        &mut self,
        parent: NodeId,
        start: usize,
        stop: usize,
        replacement: NodeId,
    ) -> Result<(), TreeError> {
        self.forest_mut().replace_children(parent, start, stop, replacement)
    }

    fn set_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), TreeError> {
        self.forest_mut().set_child(parent, index, child)
    }

    fn delete_child(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.forest_mut().delete_child(parent, index)
    }

    fn kind(&self, node: NodeId) -> TokenKind {
        self.forest().kind(node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.forest().text(node)
    }

    fn token(&self, node: NodeId) -> Option<&Token> {
        self.forest().token(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.forest().parent(node)
    }

    fn child_index(&self, node: NodeId) -> Option<usize> {
        self.forest().child_index(node)
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.forest().child(node, index)
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.forest().child_count(node)
    }

    /// Records the token range a rule matched on the node it produced.
    fn set_token_boundaries(&mut self, node: NodeId, start: Option<&Token>, stop: Option<&Token>) {
        let start = start.and_then(|token| token.index);
        let stop = stop.and_then(|token| token.index);
        self.forest_mut().set_token_boundaries(node, start, stop);
    }

    fn to_string_tree(&self, node: NodeId) -> String {
        self.forest().to_string_tree(node)
    }
}

/// Adaptor building plain token-carrying nodes.
#[derive(Debug, Default)]
pub struct CommonTreeAdaptor {
    forest: Forest,
}

impl CommonTreeAdaptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }
}

impl TreeAdaptor for CommonTreeAdaptor {
    fn forest(&self) -> &Forest {
        &self.forest
    }

    fn forest_mut(&mut self) -> &mut Forest {
        &mut self.forest
    }
}
