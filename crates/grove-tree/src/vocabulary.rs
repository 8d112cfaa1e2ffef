use rustc_hash::FxHashMap;

use crate::TokenKind;

/// Token-name table of a generated grammar; the position of a name is its
/// token type.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    names: Vec<Box<str>>,
    kinds: FxHashMap<Box<str>, TokenKind>,
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let names: Vec<Box<str>> = names.into_iter().map(Into::into).collect();
        let mut kinds = FxHashMap::default();
        for (index, name) in names.iter().enumerate() {
            kinds.entry(name.clone()).or_insert(TokenKind::new(index as i32));
        }
        Self { names, kinds }
    }

    /// A vocabulary with the four reserved names followed by `user`.
    pub fn with_user_tokens<I, S>(user: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let reserved = ["<invalid>", "<EOR>", "<DOWN>", "<UP>"].map(Box::<str>::from);
        Self::new(reserved.into_iter().chain(user.into_iter().map(Into::into)))
    }

    pub fn kind(&self, name: &str) -> Option<TokenKind> {
        self.kinds.get(name).copied()
    }

    pub fn name(&self, kind: TokenKind) -> Option<&str> {
        if kind == TokenKind::EOF {
            return Some("EOF");
        }
        self.names.get(kind.table_index()?).map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
