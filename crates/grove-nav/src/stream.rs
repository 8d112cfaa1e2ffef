use grove_tree::{Forest, NodeId, TokenKind, TreeAdaptor};
use tracing::trace;

use crate::symbol::Linearizer;
use crate::{NavError, NavSymbol};

/// Handle returned by [`TreeNodeStream::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker(usize);

/// A tree presented as a flat sequence of lookahead symbols.
///
/// Every node is followed by `DOWN`, its children and `UP` when it has
/// children. A nil root is transparent: only its children appear. The
/// sequence is indexed from 0; lookahead [`TreeNodeStream::lt`] is 1-based.
pub struct TreeNodeStream<'a, A> {
    adaptor: &'a A,
    root: NodeId,
    linearizer: Linearizer,
    /// Symbols produced so far, without the trailing EOF.
    symbols: Vec<NavSymbol>,
    exhausted: bool,
    p: usize,
    depth: usize,
    /// Held markers as `(id, position)`, oldest first.
    markers: Vec<(usize, usize)>,
    next_marker: usize,
    calls: Vec<usize>,
}

impl<'a, A: TreeAdaptor> TreeNodeStream<'a, A> {
    pub fn new(adaptor: &'a A, root: NodeId) -> Self {
        let linearizer = Linearizer::new(adaptor.forest(), root, true);
        TreeNodeStream {
            adaptor,
            root,
            linearizer,
            symbols: Vec::new(),
            exhausted: false,
            p: 0,
            depth: 0,
            markers: Vec::new(),
            next_marker: 0,
            calls: Vec::new(),
        }
    }

    pub fn adaptor(&self) -> &'a A {
        self.adaptor
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Makes sure the symbol at `index` has been produced, if it exists.
    fn fill(&mut self, index: usize) {
        let adaptor = self.adaptor;
        let forest = adaptor.forest();
        while !self.exhausted && self.symbols.len() <= index {
            match self.linearizer.next(forest) {
                Some(NavSymbol::Eof) | None => self.exhausted = true,
                Some(symbol) => self.symbols.push(symbol),
            }
        }
    }

    fn symbol_at(&mut self, index: usize) -> NavSymbol {
        self.fill(index);
        self.symbols.get(index).copied().unwrap_or(NavSymbol::Eof)
    }

    /// Symbol `k` positions away: `1` is the next symbol, `-1` the last one
    /// consumed. `0` and positions before the start are `None`.
    pub fn lt(&mut self, k: isize) -> Option<NavSymbol> {
        match k {
            0 => None,
            k if k > 0 => Some(self.symbol_at(self.p + k.unsigned_abs() - 1)),
            k => self.p.checked_sub(k.unsigned_abs()).map(|index| self.symbols[index]),
        }
    }

    pub fn la(&mut self, k: isize) -> TokenKind {
        let adaptor = self.adaptor;
        self.lt(k).map_or(TokenKind::INVALID, |symbol| symbol.kind(adaptor))
    }

    /// Advances past the current symbol. Does nothing at EOF.
    pub fn consume(&mut self) {
        match self.symbol_at(self.p) {
            NavSymbol::Eof => return,
            NavSymbol::Down => self.depth += 1,
            NavSymbol::Up => self.depth = self.depth.saturating_sub(1),
            NavSymbol::Node(_) => {}
        }
        self.p += 1;
    }

    pub fn index(&self) -> usize {
        self.p
    }

    /// Number of `DOWN`s not yet closed before the current position.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Remembers the current position. Handles are never reused, so a
    /// released marker stays unknown.
    pub fn mark(&mut self) -> Marker {
        let id = self.next_marker;
        self.next_marker += 1;
        self.markers.push((id, self.p));
        Marker(id)
    }

    fn marker_slot(&self, marker: Marker) -> Option<usize> {
        self.markers.iter().position(|&(id, _)| id == marker.0)
    }

    pub fn rewind(&mut self, marker: Marker) -> Result<(), NavError> {
        let slot = self.marker_slot(marker).ok_or(NavError::UnknownMarker(marker))?;
        self.seek(self.markers[slot].1)
    }

    /// Rewinds to the most recent marker, or to the start when none is held.
    pub fn rewind_to_last(&mut self) -> Result<(), NavError> {
        let index = self.markers.last().map_or(0, |&(_, index)| index);
        self.seek(index)
    }

    /// Drops `marker` and every marker handed out after it.
    pub fn release(&mut self, marker: Marker) {
        if let Some(slot) = self.marker_slot(marker) {
            self.markers.truncate(slot);
        }
    }

    /// Moves to the absolute position `index` by replaying the sequence from
    /// the start, so that [`TreeNodeStream::depth`] stays exact.
    pub fn seek(&mut self, index: usize) -> Result<(), NavError> {
        self.fill(index);
        let len = self.symbols.len();
        if index > len {
            return Err(NavError::SeekPastEnd { index, len });
        }
        trace!(from = self.p, to = index, "seek");
        self.p = 0;
        self.depth = 0;
        while self.p < index {
            self.consume();
        }
        Ok(())
    }

    /// Back to the first symbol; markers and saved call positions are dropped.
    pub fn reset(&mut self) {
        self.p = 0;
        self.depth = 0;
        self.markers.clear();
        self.calls.clear();
    }

    /// Saves the current position and continues at `index`, as when a tree
    /// walker rule is invoked on a node elsewhere in the tree.
    pub fn push(&mut self, index: usize) -> Result<(), NavError> {
        let ret = self.p;
        self.seek(index)?;
        self.calls.push(ret);
        trace!(index, ret, calls = self.calls.len(), "push");
        Ok(())
    }

    /// Returns to the position saved by the matching [`TreeNodeStream::push`].
    pub fn pop(&mut self) -> Result<usize, NavError> {
        let ret = self.calls.pop().ok_or(NavError::EmptyCallStack)?;
        trace!(ret, calls = self.calls.len(), "pop");
        self.seek(ret)?;
        Ok(ret)
    }

    /// Number of symbols, EOF excluded.
    pub fn len(&mut self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    pub fn get(&mut self, index: usize) -> Option<NavSymbol> {
        self.fill(index);
        self.symbols.get(index).copied()
    }

    /// The whole sequence, EOF excluded.
    pub fn symbols(&mut self) -> &[NavSymbol] {
        while !self.exhausted {
            self.fill(self.symbols.len());
        }
        &self.symbols
    }

    /// Kinds of the whole sequence, separated by spaces.
    pub fn kinds_string(&mut self) -> String {
        self.render(true)
    }

    /// Like [`TreeNodeStream::kinds_string`] without `DOWN` and `UP`.
    pub fn node_kinds_string(&mut self) -> String {
        self.render(false)
    }

    fn render(&mut self, with_navigation: bool) -> String {
        let adaptor = self.adaptor;
        self.symbols()
            .iter()
            .filter(|symbol| with_navigation || symbol.node().is_some())
            .map(|symbol| symbol.kind(adaptor).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Walks a tree like [`TreeNodeStream`] but keeps a nil root visible and
/// finishes with EOF.
pub struct TreeIterator<'a> {
    forest: &'a Forest,
    linearizer: Linearizer,
}

impl<'a> TreeIterator<'a> {
    pub fn new(forest: &'a Forest, root: NodeId) -> Self {
        TreeIterator { forest, linearizer: Linearizer::new(forest, root, false) }
    }

    pub fn reset(&mut self) {
        self.linearizer.restart(self.forest);
    }
}

impl Iterator for TreeIterator<'_> {
    type Item = NavSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        self.linearizer.next(self.forest)
    }
}
