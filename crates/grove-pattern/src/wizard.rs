use grove_tree::{NodeId, Preorder, TokenKind, TreeAdaptor, Vocabulary, WalkEvent};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{PatternError, PatternNode, TreePattern};

/// Nodes bound by `%label:` prefixes during a match.
pub type Labels = FxHashMap<Box<str>, NodeId>;

/// Builds and queries trees through textual patterns such as
/// `(ASSIGN %lhs:ID INT[3])`.
#[derive(Debug, Clone, Copy)]
pub struct TreeWizard<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> TreeWizard<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    pub fn compile(&self, pattern: &str) -> Result<TreePattern, PatternError> {
        TreePattern::parse(self.vocabulary, pattern)
    }

    /// Builds the tree described by `pattern`. A name without bracketed text
    /// gets the name itself as text; labels are ignored.
    pub fn create<A: TreeAdaptor>(
        &self,
        adaptor: &mut A,
        pattern: &str,
    ) -> Result<NodeId, PatternError> {
        let pattern = self.compile(pattern)?;
        self.build(adaptor, &pattern)
    }

    fn build<A: TreeAdaptor>(
        &self,
        adaptor: &mut A,
        pattern: &TreePattern,
    ) -> Result<NodeId, PatternError> {
        let root = match &pattern.node {
            PatternNode::Wildcard => return Err(PatternError::WildcardInCreate),
            PatternNode::Nil => adaptor.nil(),
            PatternNode::Token { kind, text: Some(text) } => adaptor.create_from_type(*kind, text),
            PatternNode::Token { kind, text: None } => {
                let name = self.vocabulary.name(*kind).unwrap_or_default().to_owned();
                adaptor.create_from_type(*kind, &name)
            }
        };
        for child in &pattern.children {
            let child = self.build(adaptor, child)?;
            adaptor.add_child(root, child);
        }
        Ok(root)
    }

    /// Whether `tree` has the shape of `pattern`, recording labelled nodes
    /// in `labels`. Labels bound before a mismatch stay in the map.
    pub fn parse<A: TreeAdaptor>(
        &self,
        adaptor: &A,
        tree: NodeId,
        pattern: &str,
        labels: &mut Labels,
    ) -> Result<bool, PatternError> {
        let pattern = self.compile(pattern)?;
        Ok(matches(adaptor, tree, &pattern, Some(labels)))
    }

    /// Every subtree of `tree`, in preorder, that matches `pattern`.
    pub fn find<A: TreeAdaptor>(
        &self,
        adaptor: &A,
        tree: NodeId,
        pattern: &str,
    ) -> Result<Vec<NodeId>, PatternError> {
        let mut found = Vec::new();
        self.visit(adaptor, tree, pattern, |node, _, _, _| found.push(node))?;
        Ok(found)
    }

    /// Every node of `tree`, in preorder, whose kind is `kind`.
    pub fn find_kind<A: TreeAdaptor>(adaptor: &A, tree: NodeId, kind: TokenKind) -> Vec<NodeId> {
        preorder(adaptor, tree).filter(|&node| adaptor.kind(node) == kind).collect()
    }

    /// All nodes of `tree` grouped by kind, each group in preorder.
    pub fn index<A: TreeAdaptor>(adaptor: &A, tree: NodeId) -> FxHashMap<TokenKind, Vec<NodeId>> {
        let mut index: FxHashMap<TokenKind, Vec<NodeId>> = FxHashMap::default();
        for node in preorder(adaptor, tree) {
            index.entry(adaptor.kind(node)).or_default().push(node);
        }
        index
    }

    /// Calls `f` with every matching subtree, its parent, its index in the
    /// parent, and the labels bound by that match.
    pub fn visit<A, F>(
        &self,
        adaptor: &A,
        tree: NodeId,
        pattern: &str,
        mut f: F,
    ) -> Result<(), PatternError>
    where
        A: TreeAdaptor,
        F: FnMut(NodeId, Option<NodeId>, Option<usize>, &Labels),
    {
        let pattern = self.compile(pattern)?;
        let root_kind = pattern.root_kind();
        let mut hits = 0;
        for node in preorder(adaptor, tree) {
            if root_kind.is_some_and(|kind| adaptor.kind(node) != kind) {
                continue;
            }
            let mut labels = Labels::default();
            if matches(adaptor, node, &pattern, Some(&mut labels)) {
                hits += 1;
                f(node, adaptor.parent(node), adaptor.child_index(node), &labels);
            }
        }
        debug!(hits, "pattern visit finished");
        Ok(())
    }

    /// Structural equality: same kinds and texts, same shape.
    pub fn equals<A: TreeAdaptor>(adaptor: &A, left: NodeId, right: NodeId) -> bool {
        if adaptor.kind(left) != adaptor.kind(right) || adaptor.text(left) != adaptor.text(right) {
            return false;
        }
        let count = adaptor.child_count(left);
        count == adaptor.child_count(right)
            && (0..count).all(|index| {
                match (adaptor.child(left, index), adaptor.child(right, index)) {
                    (Some(left), Some(right)) => Self::equals(adaptor, left, right),
                    _ => false,
                }
            })
    }
}

/// Matches `tree` against a compiled pattern.
///
/// A wildcard accepts any node but its children are still compared; a
/// token name checks the text only when the pattern bracketed one.
pub fn matches<A: TreeAdaptor>(
    adaptor: &A,
    tree: NodeId,
    pattern: &TreePattern,
    mut labels: Option<&mut Labels>,
) -> bool {
    let root_matches = match &pattern.node {
        PatternNode::Wildcard => true,
        PatternNode::Nil => adaptor.is_nil(tree),
        PatternNode::Token { kind, text } => {
            adaptor.kind(tree) == *kind
                && text.as_deref().is_none_or(|text| adaptor.text(tree) == Some(text))
        }
    };
    if !root_matches {
        return false;
    }
    if let (Some(label), Some(labels)) = (&pattern.label, labels.as_deref_mut()) {
        labels.insert(label.clone(), tree);
    }

    if adaptor.child_count(tree) != pattern.children.len() {
        return false;
    }
    pattern.children.iter().enumerate().all(|(index, child)| match adaptor.child(tree, index) {
        Some(node) => matches(adaptor, node, child, labels.as_deref_mut()),
        None => false,
    })
}

fn preorder<A: TreeAdaptor>(adaptor: &A, tree: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    Preorder::new(adaptor.forest(), tree).filter_map(|event| match event {
        WalkEvent::Enter(node) => Some(node),
        WalkEvent::Leave(_) => None,
    })
}
