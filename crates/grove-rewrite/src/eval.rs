use grove_tree::{NodeId, TreeAdaptor, Vocabulary};
use tracing::debug;

use crate::{
    Atom, ElementStream, Embedded, Imaginary, Quantifier, Rewrite, RewriteError, RewriteStreams,
    Template,
};

/// Builds the result tree of a rule from its rewrite clause.
///
/// Returns `Ok(None)` when no alternative applies or the chosen alternative
/// produces nothing. On error, nodes built so far are abandoned.
pub fn rewrite<A: TreeAdaptor>(
    adaptor: &mut A,
    vocabulary: &Vocabulary,
    streams: &mut RewriteStreams,
    rewrite: &Rewrite<'_>,
) -> Result<Option<NodeId>, RewriteError> {
    let Some((alternative, elements)) = rewrite.select() else {
        debug!("no rewrite alternative applies");
        return Ok(None);
    };
    debug!(?alternative, elements = elements.len(), "evaluating rewrite");

    let root_0 = adaptor.nil();
    let mut evaluator = Evaluator { adaptor, vocabulary, streams };
    if let Err(error) = evaluator.sequence(root_0, elements) {
        debug!(%error, "rewrite failed");
        return Err(error);
    }
    Ok(evaluator.adaptor.rule_post_processing(root_0))
}

struct Evaluator<'r, A> {
    adaptor: &'r mut A,
    vocabulary: &'r Vocabulary,
    streams: &'r mut RewriteStreams,
}

impl<A: TreeAdaptor> Evaluator<'_, A> {
    fn sequence(&mut self, parent: NodeId, elements: &[Template]) -> Result<(), RewriteError> {
        for element in elements {
            self.element(parent, element)?;
        }
        Ok(())
    }

    fn element(&mut self, parent: NodeId, template: &Template) -> Result<(), RewriteError> {
        match template {
            Template::Atom(atom) => {
                let tree = self.child_atom(atom)?;
                self.adaptor.add_child(parent, tree);
            }
            Template::Tree { root, children } => {
                let root_1 = self.adaptor.nil();
                let new_root = self.root_atom(root)?;
                let root_1 = self.adaptor.become_root(new_root, root_1)?;
                self.sequence(root_1, children)?;
                self.adaptor.add_child(parent, root_1);
            }
            Template::Block { quantifier, elements } => self.block(parent, *quantifier, elements)?,
        }
        Ok(())
    }

    fn block(
        &mut self,
        parent: NodeId,
        quantifier: Quantifier,
        elements: &[Template],
    ) -> Result<(), RewriteError> {
        let deep = quantifier == Quantifier::Optional;
        let labels = Template::referenced_labels(elements, deep);
        let any_next =
            |streams: &RewriteStreams| labels.iter().any(|label| streams.has_next(label));

        match quantifier {
            Quantifier::Optional => {
                if any_next(&*self.streams) {
                    self.sequence(parent, elements)?;
                }
            }
            Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                if quantifier == Quantifier::OneOrMore && !any_next(&*self.streams) {
                    return Err(RewriteError::EarlyExit { element: labels.join(", ").into() });
                }
                while any_next(&*self.streams) {
                    self.sequence(parent, elements)?;
                }
            }
        }

        for label in &labels {
            self.streams.reset(label);
        }
        Ok(())
    }

    fn child_atom(&mut self, atom: &Atom) -> Result<NodeId, RewriteError> {
        match atom {
            Atom::Ref(label) => stream(self.streams, label)?.next_tree(self.adaptor),
            Atom::Copy(label) => stream(self.streams, label)?.next_copy(self.adaptor),
            Atom::Imaginary(imaginary) => Ok(self.imaginary(imaginary)),
            Atom::Embedded(embedded) => Ok(self.embedded(embedded)),
        }
    }

    fn root_atom(&mut self, atom: &Atom) -> Result<NodeId, RewriteError> {
        match atom {
            Atom::Ref(label) => stream(self.streams, label)?.next_node(self.adaptor),
            Atom::Copy(_) | Atom::Imaginary(_) | Atom::Embedded(_) => self.child_atom(atom),
        }
    }

    fn imaginary(&mut self, imaginary: &Imaginary) -> NodeId {
        let Imaginary { kind, from, text } = imaginary;
        match (from, text) {
            (Some(from), text) => self.adaptor.create_from_token(*kind, from, text.as_deref()),
            (None, Some(text)) => self.adaptor.create_from_type(*kind, text),
            (None, None) => {
                let name =
                    self.vocabulary.name(*kind).map_or_else(|| kind.to_string(), str::to_owned);
                self.adaptor.create_from_type(*kind, &name)
            }
        }
    }

    fn embedded(&mut self, embedded: &Embedded) -> NodeId {
        match embedded {
            Embedded::Node(node) => *node,
            Embedded::Token(token) => self.adaptor.create(token.clone()),
        }
    }
}

/// A label nothing was collected for behaves like an empty stream.
fn stream<'s>(
    streams: &'s mut RewriteStreams,
    label: &str,
) -> Result<&'s mut ElementStream, RewriteError> {
    streams.get_mut(label).ok_or_else(|| RewriteError::EmptyStream { element: label.into() })
}
