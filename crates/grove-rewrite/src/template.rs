//! Declarative rewrite templates, as emitted by generated rule code.

use std::fmt;

use grove_tree::{NodeId, Token, TokenKind};

/// A single element of a template.
#[derive(Debug, Clone)]
pub enum Atom {
    /// Draws the next element of the stream registered under the label.
    Ref(Box<str>),
    /// `$label`: draws the next element and deep-copies it.
    Copy(Box<str>),
    Imaginary(Imaginary),
    /// A computed value substituted as is.
    Embedded(Embedded),
}

/// `KIND`, `KIND["text"]`, `KIND[$token]` or `KIND[$token, "text"]`.
#[derive(Debug, Clone)]
pub struct Imaginary {
    pub kind: TokenKind,
    /// Token whose position the new node claims.
    pub from: Option<Token>,
    pub text: Option<Box<str>>,
}

#[derive(Debug, Clone)]
pub enum Embedded {
    Node(NodeId),
    Token(Token),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

#[derive(Debug, Clone)]
pub enum Template {
    Atom(Atom),
    /// `^(root children...)`
    Tree { root: Atom, children: Vec<Template> },
    /// `( elements... )` followed by a quantifier.
    Block { quantifier: Quantifier, elements: Vec<Template> },
}

impl Atom {
    pub fn label(label: &str) -> Self {
        Self::Ref(label.into())
    }

    pub fn copy(label: &str) -> Self {
        Self::Copy(label.into())
    }

    pub fn imaginary(kind: TokenKind) -> Self {
        Self::Imaginary(Imaginary { kind, from: None, text: None })
    }

    pub fn imaginary_with_text(kind: TokenKind, text: &str) -> Self {
        Self::Imaginary(Imaginary { kind, from: None, text: Some(text.into()) })
    }

    pub fn imaginary_from(kind: TokenKind, from: Token, text: Option<&str>) -> Self {
        Self::Imaginary(Imaginary { kind, from: Some(from), text: text.map(Into::into) })
    }

    /// Label of the stream this atom draws from.
    pub fn stream_label(&self) -> Option<&str> {
        match self {
            Self::Ref(label) | Self::Copy(label) => Some(label),
            Self::Imaginary(_) | Self::Embedded(_) => None,
        }
    }
}

impl Template {
    pub fn label(label: &str) -> Self {
        Self::Atom(Atom::label(label))
    }

    pub fn copy(label: &str) -> Self {
        Self::Atom(Atom::copy(label))
    }

    pub fn imaginary(kind: TokenKind) -> Self {
        Self::Atom(Atom::imaginary(kind))
    }

    pub fn node(node: NodeId) -> Self {
        Self::Atom(Atom::Embedded(Embedded::Node(node)))
    }

    pub fn tree(root: Atom, children: Vec<Template>) -> Self {
        Self::Tree { root, children }
    }

    pub fn optional(elements: Vec<Template>) -> Self {
        Self::Block { quantifier: Quantifier::Optional, elements }
    }

    pub fn zero_or_more(elements: Vec<Template>) -> Self {
        Self::Block { quantifier: Quantifier::ZeroOrMore, elements }
    }

    pub fn one_or_more(elements: Vec<Template>) -> Self {
        Self::Block { quantifier: Quantifier::OneOrMore, elements }
    }

    /// Stream labels referenced by `elements`, in order and without repeats.
    ///
    /// Tree constructions are always searched; nested blocks only when `deep`.
    pub fn referenced_labels(elements: &[Template], deep: bool) -> Vec<&str> {
        let mut labels = Vec::new();
        for element in elements {
            element.collect_labels(deep, &mut labels);
        }
        labels
    }

    fn collect_labels<'t>(&'t self, deep: bool, labels: &mut Vec<&'t str>) {
        match self {
            Self::Atom(atom) => push_label(atom, labels),
            Self::Tree { root, children } => {
                push_label(root, labels);
                for child in children {
                    child.collect_labels(deep, labels);
                }
            }
            Self::Block { elements, .. } if deep => {
                for element in elements {
                    element.collect_labels(deep, labels);
                }
            }
            Self::Block { .. } => {}
        }
    }
}

fn push_label<'t>(atom: &'t Atom, labels: &mut Vec<&'t str>) {
    if let Some(label) = atom.stream_label() {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
}

/// Predicate guarding one rewrite alternative.
pub type Guard<'a> = Box<dyn Fn() -> bool + 'a>;

/// The rewrite clause of a rule: guarded alternatives tried in order, then an
/// optional unguarded default.
pub struct Rewrite<'a> {
    alternatives: Vec<(Guard<'a>, Vec<Template>)>,
    default: Option<Vec<Template>>,
}

impl<'a> Rewrite<'a> {
    /// An unguarded rewrite. An empty `elements` deletes the rule's tree.
    pub fn new(elements: Vec<Template>) -> Self {
        Self { alternatives: Vec::new(), default: Some(elements) }
    }

    /// A rewrite without alternatives; add them with [`Rewrite::when`].
    pub fn guarded() -> Self {
        Self { alternatives: Vec::new(), default: None }
    }

    pub fn when(mut self, guard: impl Fn() -> bool + 'a, elements: Vec<Template>) -> Self {
        self.alternatives.push((Box::new(guard), elements));
        self
    }

    pub fn otherwise(mut self, elements: Vec<Template>) -> Self {
        self.default = Some(elements);
        self
    }

    /// The alternative to evaluate, with its position (`None` for the default).
    pub fn select(&self) -> Option<(Option<usize>, &[Template])> {
        self.alternatives
            .iter()
            .position(|(guard, _)| guard())
            .map(|index| (Some(index), self.alternatives[index].1.as_slice()))
            .or_else(|| self.default.as_deref().map(|elements| (None, elements)))
    }
}

impl fmt::Debug for Rewrite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rewrite")
            .field(
                "alternatives",
                &self.alternatives.iter().map(|(_, alt)| alt).collect::<Vec<_>>(),
            )
            .field("default", &self.default)
            .finish()
    }
}
