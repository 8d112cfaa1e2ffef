//! Arena storage for mutable trees.
//!
//! A node owns its children through the child list; the parent link and the
//! cached child index are plain ids kept in sync by every mutation here.

use la_arena::{Arena, Idx};
use tracing::trace;

use crate::{Token, TokenKind, TreeError};

pub type NodeId = Idx<NodeData>;

/// Raw node stored in the forest arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    token: Option<Token>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    child_index: Option<usize>,
    token_start: Option<usize>,
    token_stop: Option<usize>,
}

/// The closed set of node shapes every tree operation distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// Payload-less aggregator standing for a list of sibling trees.
    Nil,
    /// A token without children.
    Leaf,
    /// A token with at least one child.
    Subtree,
}

/// Owning storage for every node created by an adaptor.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: Arena<NodeData>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, token: Option<Token>) -> NodeId {
        self.nodes.alloc(NodeData {
            token,
            children: Vec::new(),
            parent: None,
            child_index: None,
            token_start: None,
            token_stop: None,
        })
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn token(&self, node: NodeId) -> Option<&Token> {
        self.nodes[node].token.as_ref()
    }

    /// Token kind of `node`; nil nodes report [`TokenKind::INVALID`].
    #[inline]
    pub fn kind(&self, node: NodeId) -> TokenKind {
        self.token(node).map_or(TokenKind::INVALID, |token| token.kind)
    }

    #[inline]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.token(node).and_then(Token::text)
    }

    #[inline]
    pub fn is_nil(&self, node: NodeId) -> bool {
        self.nodes[node].token.is_none()
    }

    pub fn shape(&self, node: NodeId) -> NodeShape {
        let data = &self.nodes[node];
        match (&data.token, data.children.is_empty()) {
            (None, _) => NodeShape::Nil,
            (Some(_), true) => NodeShape::Leaf,
            (Some(_), false) => NodeShape::Subtree,
        }
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    /// Position of `node` in its parent's child list; `None` for roots.
    #[inline]
    pub fn child_index(&self, node: NodeId) -> Option<usize> {
        self.nodes[node].child_index
    }

    #[inline]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    #[inline]
    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).get(index).copied()
    }

    #[inline]
    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        self.child(parent, self.child_index(node)? + 1)
    }

    /// Ancestors of `node`, innermost first, excluding `node` itself.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors { forest: self, next: self.parent(node) }
    }

    pub fn has_ancestor(&self, node: NodeId, kind: TokenKind) -> bool {
        self.ancestor_of_kind(node, kind).is_some()
    }

    pub fn ancestor_of_kind(&self, node: NodeId, kind: TokenKind) -> Option<NodeId> {
        self.ancestors(node).find(|&ancestor| self.kind(ancestor) == kind)
    }

    fn is_self_or_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        candidate == node || self.ancestors(node).any(|ancestor| ancestor == candidate)
    }

    pub fn set_token_boundaries(
        &mut self,
        node: NodeId,
        start: Option<usize>,
        stop: Option<usize>,
    ) {
        let data = &mut self.nodes[node];
        data.token_start = start;
        data.token_stop = stop;
    }

    /// First token-stream index covered by `node`, falling back to its own token.
    pub fn token_start_index(&self, node: NodeId) -> Option<usize> {
        let data = &self.nodes[node];
        data.token_start.or_else(|| data.token.as_ref()?.index)
    }

    pub fn token_stop_index(&self, node: NodeId) -> Option<usize> {
        let data = &self.nodes[node];
        data.token_stop.or_else(|| data.token.as_ref()?.index)
    }

    /// Appends `child` to `parent`.
    ///
    /// A nil `child` is flattened: its children move to the end of `parent`
    /// and the nil node is left empty. A child attached elsewhere is detached
    /// from its previous parent first.
    #[track_caller]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if self.is_nil(child) {
            let adopted = std::mem::take(&mut self.nodes[child].children);
            for &grandchild in &adopted {
                self.assert_acyclic(parent, grandchild);
            }
            for grandchild in adopted {
                self.release(grandchild);
                self.append(parent, grandchild);
            }
        } else {
            self.assert_acyclic(parent, child);
            self.detach(child);
            self.append(parent, child);
        }
    }

    /// Replaces the child at `index` with `child`, flattening a nil `child`.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.replace_children(parent, index, index, child)
    }

    /// Removes and returns the child at `index`, renumbering later siblings.
    pub fn delete_child(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.child(parent, index)?;
        self.detach(child);
        Some(child)
    }

    /// Splices `replacement` over the children `start..=stop` of `parent`.
    ///
    /// A nil `replacement` contributes its children in order. The range is
    /// validated before anything is mutated; replaced children become
    /// detached roots.
    #[track_caller]
    pub fn replace_children(
        &mut self,
        parent: NodeId,
        start: usize,
        stop: usize,
        replacement: NodeId,
    ) -> Result<(), TreeError> {
        let len = self.child_count(parent);
        if len == 0 {
            return Err(TreeError::NoChildren);
        }
        if start > stop || stop >= len {
            return Err(TreeError::ChildIndexOutOfRange { start, stop, len });
        }

        let incoming = if self.is_nil(replacement) {
            self.children(replacement).to_vec()
        } else {
            vec![replacement]
        };
        for &node in &incoming {
            self.assert_acyclic(parent, node);
        }
        trace!(?parent, start, stop, incoming = incoming.len(), "replacing children");

        if self.is_nil(replacement) {
            self.nodes[replacement].children.clear();
            for &node in &incoming {
                self.release(node);
            }
        }
        for &node in &incoming {
            if self.parent(node) != Some(parent) {
                self.detach(node);
            }
        }

        let old = std::mem::take(&mut self.nodes[parent].children);
        let mut children = Vec::with_capacity(old.len() - (stop - start + 1) + incoming.len());
        for (index, &child) in old.iter().enumerate() {
            if index == start {
                children.extend_from_slice(&incoming);
            }
            if (start..=stop).contains(&index) || incoming.contains(&child) {
                continue;
            }
            children.push(child);
        }
        for &removed in &old[start..=stop] {
            if !incoming.contains(&removed) {
                self.release(removed);
            }
        }

        self.nodes[parent].children = children;
        self.freshen_parent_and_child_indexes(parent, 0);
        Ok(())
    }

    /// Rewrites the parent link and index of every child of `node` from `offset` on.
    pub fn freshen_parent_and_child_indexes(&mut self, node: NodeId, offset: usize) {
        for index in offset..self.child_count(node) {
            let child = self.nodes[node].children[index];
            let data = &mut self.nodes[child];
            data.parent = Some(node);
            data.child_index = Some(index);
        }
    }

    /// Removes `node` from its parent, if any, leaving it a root.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let index = match self.child_index(node) {
            Some(index) if self.child(parent, index) == Some(node) => index,
            _ => match self.children(parent).iter().position(|&child| child == node) {
                Some(index) => index,
                None => {
                    self.release(node);
                    return;
                }
            },
        };
        self.nodes[parent].children.remove(index);
        self.freshen_parent_and_child_indexes(parent, index);
        self.release(node);
    }

    fn release(&mut self, node: NodeId) {
        let data = &mut self.nodes[node];
        data.parent = None;
        data.child_index = None;
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent].children;
        let index = children.len();
        children.push(child);
        let data = &mut self.nodes[child];
        data.parent = Some(parent);
        data.child_index = Some(index);
    }

    #[track_caller]
    fn assert_acyclic(&self, parent: NodeId, child: NodeId) {
        assert!(
            !self.is_self_or_ancestor(child, parent),
            "attempt to add {child:?} below itself (parent {parent:?})"
        );
    }

    /// Verifies parent links and child indexes of `node` and all its descendants.
    ///
    /// Reports the first inconsistency in preorder.
    pub fn sanity_check(&self, node: NodeId) -> Result<(), TreeError> {
        match self.parent(node) {
            Some(parent) => {
                let expected = self.children(parent).iter().position(|&child| child == node);
                if expected.is_none() {
                    return Err(TreeError::ParentMismatch {
                        node,
                        expected: None,
                        found: Some(parent),
                    });
                }
                if expected != self.child_index(node) {
                    return Err(TreeError::ChildIndexMismatch {
                        node,
                        expected,
                        found: self.child_index(node),
                    });
                }
            }
            None if self.child_index(node).is_some() => {
                return Err(TreeError::ChildIndexMismatch {
                    node,
                    expected: None,
                    found: self.child_index(node),
                });
            }
            None => {}
        }

        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            for (index, &child) in self.children(current).iter().enumerate() {
                if self.parent(child) != Some(current) {
                    return Err(TreeError::ParentMismatch {
                        node: child,
                        expected: Some(current),
                        found: self.parent(child),
                    });
                }
                if self.child_index(child) != Some(index) {
                    return Err(TreeError::ChildIndexMismatch {
                        node: child,
                        expected: Some(index),
                        found: self.child_index(child),
                    });
                }
            }
            stack.extend(self.children(current).iter().rev());
        }
        Ok(())
    }

    /// Text of a single node: `nil` for lists, else the token text or kind.
    pub fn node_text(&self, node: NodeId) -> String {
        match self.token(node) {
            None => "nil".to_owned(),
            Some(Token { text: Some(text), .. }) => text.to_string(),
            Some(token) => token.kind.to_string(),
        }
    }

    /// LISP-style rendering: `(root child child)`, lists as space-separated trees.
    pub fn to_string_tree(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_tree(node, &mut out);
        out
    }

    fn write_tree(&self, node: NodeId, out: &mut String) {
        let children = self.children(node);
        if children.is_empty() {
            out.push_str(&self.node_text(node));
            return;
        }

        let nil = self.is_nil(node);
        if !nil {
            out.push('(');
            out.push_str(&self.node_text(node));
            out.push(' ');
        }
        for (index, &child) in children.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            self.write_tree(child, out);
        }
        if !nil {
            out.push(')');
        }
    }
}

/// Iterator over the ancestors of a node, innermost first.
pub struct Ancestors<'a> {
    forest: &'a Forest,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.forest.parent(current);
        Some(current)
    }
}
