use expect_test::{Expect, expect};
use grove_tree::{TokenKind, Vocabulary};
use text_size::TextSize;

use crate::lexer::{Lexer, PatternToken};
use crate::{PatternError, PatternNode, TreePattern};

fn vocabulary() -> Vocabulary {
    Vocabulary::with_user_tokens(["A", "B", "C", "D", "ID"])
}

fn check_tokens(text: &str, expect: Expect) {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    loop {
        let (token, offset) = lexer.next_token().unwrap();
        let done = token == PatternToken::Eof;
        tokens.push(format!("{token:?}@{offset:?}"));
        if done {
            break;
        }
    }
    expect.assert_eq(&tokens.join(" "));
}

#[test]
fn lex_tree_with_label_and_text() {
    check_tokens(
        "(A %x:ID[foo] .)",
        expect![[r#"Open@0 Name("A")@1 Percent@3 Name("x")@4 Colon@5 Name("ID")@6 Text("foo")@8 Dot@14 Close@15 Eof@16"#]],
    );
}

#[test]
fn lex_escaped_bracket() {
    check_tokens(r"ID[a\]b\c]", expect![[r#"Name("ID")@0 Text("a]b\\c")@2 Eof@10"#]]);
}

#[test]
fn lex_errors() {
    let mut lexer = Lexer::new("ID[abc");
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::UnterminatedText { offset: TextSize::new(2) })
    );

    let mut lexer = Lexer::new("  #");
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::UnexpectedChar { ch: '#', offset: TextSize::new(2) })
    );
}

#[test]
fn parse_nested_pattern() {
    let pattern = TreePattern::parse(&vocabulary(), "(A %b:B (C D[x]) nil)").unwrap();

    assert_eq!(pattern.root_kind(), Some(TokenKind::new(4)));
    assert_eq!(pattern.children.len(), 3);
    assert_eq!(pattern.children[0].label.as_deref(), Some("b"));
    assert_eq!(pattern.children[1].children[0].node, PatternNode::Token {
        kind: TokenKind::new(7),
        text: Some("x".into()),
    });
    assert_eq!(pattern.children[2].node, PatternNode::Nil);
}

#[test]
fn parse_single_node_and_wildcard() {
    let vocabulary = vocabulary();

    let single = TreePattern::parse(&vocabulary, "ID").unwrap();
    assert!(single.children.is_empty());
    assert_eq!(single.node, PatternNode::Token { kind: TokenKind::new(8), text: None });

    let wildcard = TreePattern::parse(&vocabulary, "%any:.").unwrap();
    assert_eq!(wildcard.node, PatternNode::Wildcard);
    assert_eq!(wildcard.root_kind(), None);
}

#[test]
fn parse_errors() {
    let vocabulary = vocabulary();
    let parse = |text| TreePattern::parse(&vocabulary, text).unwrap_err();

    expect![[r#"UnknownToken { name: "E" }"#]].assert_eq(&format!("{:?}", parse("(A E)")));
    expect![[r#"Expected { expected: "`)`", offset: 4 }"#]]
        .assert_eq(&format!("{:?}", parse("(A B")));
    expect!["TrailingInput { offset: 2 }"].assert_eq(&format!("{:?}", parse("A B")));
    expect![[r#"Expected { expected: "`:` after the label", offset: 3 }"#]]
        .assert_eq(&format!("{:?}", parse("%x A")));
    expect![[r#"Expected { expected: "a token name", offset: 1 }"#]]
        .assert_eq(&format!("{:?}", parse("()")));
}
