use grove_tree::{CommonTreeAdaptor, Token, TokenKind, TreeAdaptor as _};

use crate::{Atom, ElementStream, RewriteError, RewriteStreams, StreamFlavor, Template};

const ID: TokenKind = TokenKind::new(4);

fn id(text: &str) -> Token {
    Token::synthetic(ID, text)
}

#[test]
fn drawing_from_an_empty_stream() {
    let mut adaptor = CommonTreeAdaptor::new();
    let mut stream = ElementStream::tokens("token ID");

    assert!(!stream.has_next());
    assert_eq!(
        stream.next_tree(&mut adaptor),
        Err(RewriteError::EmptyStream { element: "token ID".into() })
    );
}

#[test]
fn single_element_is_repeated() {
    let mut adaptor = CommonTreeAdaptor::new();
    let mut stream = ElementStream::tokens("token ID");
    stream.add_token(id("a"));

    let first = stream.next_tree(&mut adaptor).unwrap();
    assert!(!stream.has_next());
    let second = stream.next_tree(&mut adaptor).unwrap();

    assert_ne!(first, second);
    assert_eq!(adaptor.text(second), Some("a"));
}

#[test]
fn overdrawing_a_list_is_a_cardinality_error() {
    let mut adaptor = CommonTreeAdaptor::new();
    let mut stream = ElementStream::tokens("token ID");
    stream.add_token(id("a"));
    stream.add_token(id("b"));

    stream.next_tree(&mut adaptor).unwrap();
    stream.next_tree(&mut adaptor).unwrap();

    assert_eq!(
        stream.next_tree(&mut adaptor),
        Err(RewriteError::Cardinality { element: "token ID".into() })
    );
}

#[test]
fn tokens_are_drawn_in_match_order() {
    let mut stream = ElementStream::tokens("token ID");
    assert_eq!(
        stream.next_token(),
        Err(RewriteError::EmptyStream { element: "token ID".into() })
    );

    stream.add_token(id("a"));
    stream.add_token(id("b"));
    let drawn: Vec<_> = (0..2).map(|_| stream.next_token().unwrap()).collect();
    assert_eq!(drawn, [id("a"), id("b")]);
    assert_eq!(
        stream.next_token(),
        Err(RewriteError::Cardinality { element: "token ID".into() })
    );

    stream.reset();
    assert_eq!(stream.next_token(), Ok(id("a")));
}

#[test]
#[should_panic(expected = "token drawn from tree stream")]
fn tokens_are_not_drawn_from_tree_streams() {
    let mut adaptor = CommonTreeAdaptor::new();
    let mut stream = ElementStream::subtrees("rule b");
    stream.add_tree(adaptor.create(id("a")));
    let _ = stream.next_token();
}

#[test]
fn subtree_draws_copy_after_reset() {
    let mut adaptor = CommonTreeAdaptor::new();
    let tree = adaptor.create(id("a"));
    let child = adaptor.create(id("b"));
    adaptor.add_child(tree, child);
    let mut stream = ElementStream::subtrees("rule b");
    stream.add_tree(tree);
    stream.add_tree(child);

    assert_eq!(stream.next_tree(&mut adaptor), Ok(tree));
    stream.reset();
    let copy = stream.next_tree(&mut adaptor).unwrap();

    assert_ne!(copy, tree);
    assert_eq!(adaptor.to_string_tree(copy), "(a b)");
}

#[test]
fn subtree_root_draw_looks_through_single_tree_lists() {
    let mut adaptor = CommonTreeAdaptor::new();
    let list = adaptor.nil();
    let tree = adaptor.create(id("a"));
    let child = adaptor.create(id("b"));
    adaptor.add_child(tree, child);
    adaptor.add_child(list, tree);
    let mut stream = ElementStream::subtrees("rule b");
    stream.add_tree(list);

    let root = stream.next_node(&mut adaptor).unwrap();

    assert_eq!(adaptor.text(root), Some("a"));
    assert_eq!(adaptor.child_count(root), 0);
    assert_eq!(adaptor.parent(tree), Some(list));
}

#[test]
fn node_stream_always_copies() {
    let mut adaptor = CommonTreeAdaptor::new();
    let node = adaptor.create(id("a"));
    let child = adaptor.create(id("b"));
    adaptor.add_child(node, child);
    let mut stream = ElementStream::nodes("wildcard");
    stream.add_tree(node);

    let drawn = stream.next_tree(&mut adaptor).unwrap();

    assert_ne!(drawn, node);
    assert_eq!(adaptor.child_count(drawn), 0);
}

#[test]
fn copy_draws_are_deep() {
    let mut adaptor = CommonTreeAdaptor::new();
    let tree = adaptor.create(id("a"));
    let child = adaptor.create(id("b"));
    adaptor.add_child(tree, child);
    let mut stream = ElementStream::subtrees("rule x");
    stream.add_tree(tree);

    let copy = stream.next_copy(&mut adaptor).unwrap();

    assert_ne!(copy, tree);
    assert_eq!(adaptor.to_string_tree(copy), "(a b)");
    assert_ne!(adaptor.child(copy, 0), Some(child));
}

#[test]
#[should_panic(expected = "token added to tree stream")]
fn flavors_do_not_mix() {
    let mut stream = ElementStream::subtrees("rule b");
    stream.add_token(id("a"));
}

#[test]
fn registry_keeps_registration_order_and_first_flavor() {
    let mut streams = RewriteStreams::new();
    streams.token_stream("INT").add_token(Token::synthetic(TokenKind::new(5), "1"));
    streams.subtree_stream("type");
    streams.node_stream("INT");

    let labels: Vec<_> = streams.iter().map(|(label, stream)| (label, stream.flavor())).collect();

    assert_eq!(labels, [("INT", StreamFlavor::Token), ("type", StreamFlavor::Subtree)]);
    assert_eq!(streams.get("INT").map(ElementStream::description), Some("token INT"));
    assert!(streams.has_next("INT"));
    assert!(!streams.has_next("missing"));
}

#[test]
fn referenced_labels_descend_into_trees_but_not_blocks() {
    let elements = vec![
        Template::tree(Atom::label("type"), vec![
            Template::optional(vec![Template::label("modifier")]),
            Template::label("ID"),
        ]),
        Template::copy("type"),
        Template::imaginary(TokenKind::new(9)),
    ];

    assert_eq!(Template::referenced_labels(&elements, false), ["type", "ID"]);
    assert_eq!(Template::referenced_labels(&elements, true), ["type", "modifier", "ID"]);
}
