use std::cell::RefCell;

use grove_pattern::{Labels, PatternError, TreeWizard, in_context};
use grove_tree::{CommonTreeAdaptor, NodeId, TreeAdaptor as _, TreeVisitor, Vocabulary};

fn vocabulary() -> Vocabulary {
    Vocabulary::new([
        "<invalid>", "<EOR>", "<DOWN>", "<UP>", "VEC", "ASSIGN", "PRINT", "PLUS", "MULT", "DOT",
        "ID", "INT", "WS", "'['", "','", "']'",
    ])
}

/// Builds `tree` and returns the node `pattern` binds to `x`.
fn bound_x(
    adaptor: &mut CommonTreeAdaptor,
    vocabulary: &Vocabulary,
    tree: &str,
    pattern: &str,
) -> NodeId {
    let wizard = TreeWizard::new(vocabulary);
    let tree = wizard.create(adaptor, tree).unwrap();
    let mut labels = Labels::default();
    assert!(wizard.parse(&*adaptor, tree, pattern, &mut labels).unwrap());
    labels["x"]
}

struct Fixture {
    adaptor: CommonTreeAdaptor,
    vocabulary: Vocabulary,
    x: NodeId,
}

impl Fixture {
    fn new(tree: &str, pattern: &str) -> Self {
        let mut adaptor = CommonTreeAdaptor::new();
        let vocabulary = vocabulary();
        let x = bound_x(&mut adaptor, &vocabulary, tree, pattern);
        Self { adaptor, vocabulary, x }
    }

    /// Assignment followed by a print, under a nil root.
    fn statements() -> Self {
        Self::new(
            "(nil (ASSIGN ID[x] INT[3]) (PRINT (MULT ID[x] (VEC INT[1] INT[2] INT[3]))))",
            "(nil (ASSIGN ID[x] INT[3]) (PRINT (MULT ID (VEC INT %x:INT INT))))",
        )
    }

    fn nested() -> Self {
        Self::new(
            "(PRINT (MULT ID[x] (VEC (MULT INT[9] INT[1]) INT[2] INT[3])))",
            "(PRINT (MULT ID (VEC (MULT INT %x:INT) INT INT)))",
        )
    }

    fn context(&self, context: &str) -> Result<bool, PatternError> {
        in_context(&self.adaptor, &self.vocabulary, self.x, context)
    }

    fn check(&self, context: &str, expected: bool) {
        assert_eq!(self.context(context), Ok(expected), "context {context:?}");
    }
}

#[test]
fn parent() {
    Fixture::statements().check("VEC", true);
}

#[test]
fn no_parent() {
    let fixture = Fixture::new(
        "(PRINT (MULT ID[x] (VEC INT[1] INT[2] INT[3])))",
        "(%x:PRINT (MULT ID (VEC INT INT INT)))",
    );
    fixture.check("VEC", false);
}

#[test]
fn parent_with_wildcard() {
    let fixture = Fixture::statements();
    fixture.check("VEC ...", true);
    fixture.check("...VEC", true);
}

#[test]
fn ancestor_with_gap() {
    let fixture = Fixture::statements();
    fixture.check("PRINT...VEC", true);
    fixture.check("... PRINT ... VEC ...", true);
}

#[test]
fn nested_contexts() {
    let fixture = Fixture::nested();
    for context in ["VEC ...", "PRINT ...", "PRINT ... VEC ...", "PRINT MULT VEC MULT"] {
        fixture.check(context, true);
    }
    for context in ["VEC", "PRINT VEC MULT", "PRINT VEC ...", "VEC ... VEC MULT"] {
        fixture.check(context, false);
    }
}

#[test]
fn malformed_contexts() {
    let fixture = Fixture::nested();
    assert_eq!(fixture.context("PRINT ... ... VEC"), Err(PatternError::DoubledEllipsis));
    assert_eq!(
        fixture.context("PRINT .. VEC"),
        Err(PatternError::MalformedEllipsis { dots: "..".into() })
    );
    assert_eq!(
        fixture.context("PRINT ... MULT ... VEC"),
        Err(PatternError::TooManyEllipses)
    );
}

#[test]
fn visitor_order() {
    let mut adaptor = CommonTreeAdaptor::new();
    let vocabulary = vocabulary();
    let tree = TreeWizard::new(&vocabulary)
        .create(&mut adaptor, "(PRINT (MULT ID[x] (VEC (MULT INT[9] INT[1]) INT[2] INT[3])))")
        .unwrap();

    let log = RefCell::new(Vec::new());
    let entry = |adaptor: &CommonTreeAdaptor, action: &str, node: NodeId| {
        log.borrow_mut().push(format!("{action}({})", adaptor.text(node).unwrap_or_default()));
    };
    TreeVisitor::new(&mut adaptor).visit(
        tree,
        |adaptor, node| {
            entry(adaptor, "pre", node);
            node
        },
        |adaptor, node| {
            entry(adaptor, "post", node);
            node
        },
    );

    assert_eq!(log.into_inner().join(" "), [
        "pre(PRINT)", "pre(MULT)", "pre(x)", "post(x)", "pre(VEC)", "pre(MULT)", "pre(9)",
        "post(9)", "pre(1)", "post(1)", "post(MULT)", "pre(2)", "post(2)", "pre(3)", "post(3)",
        "post(VEC)", "post(MULT)", "post(PRINT)",
    ]
    .join(" "));
}
