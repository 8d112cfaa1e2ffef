//! Per-label buffers of matched elements consumed by rewrite templates.

use std::hash::BuildHasherDefault;

use grove_tree::{NodeId, Token, TreeAdaptor};
use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::RewriteError;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// What a stream collects and how its draws are copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFlavor {
    /// Matched tokens; every draw builds a fresh node.
    Token,
    /// Trees returned by invoked rules.
    Subtree,
    /// Nodes matched by a tree grammar; every draw is a shallow copy.
    Node,
}

#[derive(Debug, Clone)]
enum Elements {
    Tokens(Vec<Token>),
    Trees(Vec<NodeId>),
}

enum Drawn {
    Token(Token),
    Tree(NodeId),
}

/// Ordered elements matched for one label during a rule invocation.
#[derive(Debug, Clone)]
pub struct ElementStream {
    description: Box<str>,
    flavor: StreamFlavor,
    elements: Elements,
    cursor: usize,
    /// Set by [`ElementStream::reset`]; from then on draws hand out copies.
    dirty: bool,
}

impl ElementStream {
    pub fn new(flavor: StreamFlavor, description: impl Into<Box<str>>) -> Self {
        let elements = match flavor {
            StreamFlavor::Token => Elements::Tokens(Vec::new()),
            StreamFlavor::Subtree | StreamFlavor::Node => Elements::Trees(Vec::new()),
        };
        Self { description: description.into(), flavor, elements, cursor: 0, dirty: false }
    }

    pub fn tokens(description: impl Into<Box<str>>) -> Self {
        Self::new(StreamFlavor::Token, description)
    }

    pub fn subtrees(description: impl Into<Box<str>>) -> Self {
        Self::new(StreamFlavor::Subtree, description)
    }

    pub fn nodes(description: impl Into<Box<str>>) -> Self {
        Self::new(StreamFlavor::Node, description)
    }

    pub fn flavor(&self) -> StreamFlavor {
        self.flavor
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[track_caller]
    pub fn add_token(&mut self, token: Token) {
        match &mut self.elements {
            Elements::Tokens(tokens) => tokens.push(token),
            Elements::Trees(_) => panic!("token added to tree stream `{}`", self.description),
        }
    }

    #[track_caller]
    pub fn add_tree(&mut self, tree: NodeId) {
        match &mut self.elements {
            Elements::Trees(trees) => trees.push(tree),
            Elements::Tokens(_) => panic!("tree added to token stream `{}`", self.description),
        }
    }

    pub fn len(&self) -> usize {
        match &self.elements {
            Elements::Tokens(tokens) => tokens.len(),
            Elements::Trees(trees) => trees.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.len()
    }

    /// Rewinds to the first element. Later draws copy what they return,
    /// since the originals may already be part of the result.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.dirty = true;
    }

    fn draw(&mut self) -> Result<Drawn, RewriteError> {
        let len = self.len();
        if len == 0 {
            return Err(RewriteError::EmptyStream { element: self.description.clone() });
        }
        let index = if self.cursor >= len {
            if len != 1 {
                return Err(RewriteError::Cardinality { element: self.description.clone() });
            }
            0
        } else {
            self.cursor += 1;
            self.cursor - 1
        };
        Ok(match &self.elements {
            Elements::Tokens(tokens) => Drawn::Token(tokens[index].clone()),
            Elements::Trees(trees) => Drawn::Tree(trees[index]),
        })
    }

    /// A lone element past the cursor is handed out again, and must be copied.
    fn must_copy(&self) -> bool {
        self.dirty || (self.cursor >= self.len() && self.len() == 1)
    }

    /// Next matched token of a token stream.
    #[track_caller]
    pub fn next_token(&mut self) -> Result<Token, RewriteError> {
        match self.draw()? {
            Drawn::Token(token) => Ok(token),
            Drawn::Tree(_) => panic!("token drawn from tree stream `{}`", self.description),
        }
    }

    /// Next element as a tree for a child position.
    ///
    /// A nil list is always handed out as a copy: attaching it moves its
    /// children away, and later draws of the same element still need them.
    pub fn next_tree<A: TreeAdaptor>(&mut self, adaptor: &mut A) -> Result<NodeId, RewriteError> {
        let copy = self.must_copy();
        Ok(match (self.flavor, self.draw()?) {
            (_, Drawn::Token(token)) => adaptor.create(token),
            (StreamFlavor::Node, Drawn::Tree(node)) => adaptor.dup_node(node),
            (_, Drawn::Tree(tree)) if copy || adaptor.is_nil(tree) => adaptor.dup_tree(tree),
            (_, Drawn::Tree(tree)) => tree,
        })
    }

    /// Next element as a single node for a root position.
    ///
    /// For subtree streams, a nil list holding exactly one tree is looked
    /// through before its root is copied.
    pub fn next_node<A: TreeAdaptor>(&mut self, adaptor: &mut A) -> Result<NodeId, RewriteError> {
        let copy = self.must_copy();
        Ok(match (self.flavor, self.draw()?) {
            (_, Drawn::Token(token)) => adaptor.create(token),
            (StreamFlavor::Subtree, Drawn::Tree(tree)) if !copy => {
                let mut tree = tree;
                while adaptor.is_nil(tree) && adaptor.child_count(tree) == 1 {
                    match adaptor.child(tree, 0) {
                        Some(only) => tree = only,
                        None => break,
                    }
                }
                adaptor.dup_node(tree)
            }
            (_, Drawn::Tree(node)) => adaptor.dup_node(node),
        })
    }

    /// Next element as an independent deep copy.
    pub fn next_copy<A: TreeAdaptor>(&mut self, adaptor: &mut A) -> Result<NodeId, RewriteError> {
        Ok(match self.draw()? {
            Drawn::Token(token) => adaptor.create(token),
            Drawn::Tree(tree) => adaptor.dup_tree(tree),
        })
    }
}

/// The element streams of one rule invocation, keyed by label in
/// registration order.
#[derive(Debug, Default, Clone)]
pub struct RewriteStreams {
    streams: FxIndexMap<Box<str>, ElementStream>,
}

impl RewriteStreams {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream(&mut self, flavor: StreamFlavor, label: &str) -> &mut ElementStream {
        self.streams
            .entry(label.into())
            .or_insert_with(|| ElementStream::new(flavor, format!("{} {label}", flavor.noun())))
    }

    pub fn token_stream(&mut self, label: &str) -> &mut ElementStream {
        self.stream(StreamFlavor::Token, label)
    }

    pub fn subtree_stream(&mut self, label: &str) -> &mut ElementStream {
        self.stream(StreamFlavor::Subtree, label)
    }

    pub fn node_stream(&mut self, label: &str) -> &mut ElementStream {
        self.stream(StreamFlavor::Node, label)
    }

    pub fn get(&self, label: &str) -> Option<&ElementStream> {
        self.streams.get(label)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut ElementStream> {
        self.streams.get_mut(label)
    }

    pub fn has_next(&self, label: &str) -> bool {
        self.get(label).is_some_and(ElementStream::has_next)
    }

    pub fn reset(&mut self, label: &str) {
        if let Some(stream) = self.get_mut(label) {
            stream.reset();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementStream)> {
        self.streams.iter().map(|(label, stream)| (&**label, stream))
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl StreamFlavor {
    fn noun(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Subtree => "rule",
            Self::Node => "node",
        }
    }
}
