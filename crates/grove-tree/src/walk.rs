use crate::{Forest, NodeId, TreeAdaptor};

/// Depth-first enter/leave walk over a subtree.
///
/// Each event is derived from the previous one through the forest's
/// first-child, next-sibling and parent links, so the walk holds no stack.
/// Siblings of the start node are never visited.
pub struct Preorder<'a> {
    forest: &'a Forest,
    start: NodeId,
    last: Option<WalkEvent>,
    finished: bool,
    skip_subtree: bool,
}

impl<'a> Preorder<'a> {
    pub fn new(forest: &'a Forest, start: NodeId) -> Self {
        Self { forest, start, last: None, finished: false, skip_subtree: false }
    }

    /// Called right after `Enter(node)`: the next event is `Leave(node)`,
    /// without entering any of its children. Has no effect after a `Leave`.
    pub fn skip_subtree(&mut self) {
        self.skip_subtree = true;
    }
}

impl Iterator for Preorder<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let skip = std::mem::take(&mut self.skip_subtree);
        let event = match self.last {
            None => WalkEvent::Enter(self.start),
            Some(WalkEvent::Enter(node)) => match self.forest.first_child(node) {
                Some(child) if !skip => WalkEvent::Enter(child),
                _ => WalkEvent::Leave(node),
            },
            Some(WalkEvent::Leave(node)) => match self.forest.next_sibling(node) {
                Some(sibling) => WalkEvent::Enter(sibling),
                None => WalkEvent::Leave(self.forest.parent(node)?),
            },
        };
        self.finished = event == WalkEvent::Leave(self.start);
        self.last = Some(event);
        Some(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent {
    Enter(NodeId),
    Leave(NodeId),
}

/// Calls back on entry to and exit from every non-nil node of a tree.
pub struct TreeVisitor<'a, A> {
    adaptor: &'a mut A,
}

impl<'a, A: TreeAdaptor> TreeVisitor<'a, A> {
    pub fn new(adaptor: &'a mut A) -> Self {
        Self { adaptor }
    }

    /// Visits `tree` depth first.
    ///
    /// The node returned by `pre` is the one whose children are walked; the
    /// node returned by `post` is the result of the visit.
    pub fn visit<P, Q>(&mut self, tree: NodeId, mut pre: P, mut post: Q) -> NodeId
    where
        P: FnMut(&mut A, NodeId) -> NodeId,
        Q: FnMut(&mut A, NodeId) -> NodeId,
    {
        self.visit_node(tree, &mut pre, &mut post)
    }

    fn visit_node<P, Q>(&mut self, mut tree: NodeId, pre: &mut P, post: &mut Q) -> NodeId
    where
        P: FnMut(&mut A, NodeId) -> NodeId,
        Q: FnMut(&mut A, NodeId) -> NodeId,
    {
        let nil = self.adaptor.is_nil(tree);
        if !nil {
            tree = pre(self.adaptor, tree);
        }

        let mut index = 0;
        while let Some(child) = self.adaptor.child(tree, index) {
            self.visit_node(child, pre, post);
            index += 1;
        }

        if !nil {
            tree = post(self.adaptor, tree);
        }
        tree
    }
}
