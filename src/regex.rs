//! Implementations of regex-based parsers

use super::*;

use regex_automata::{
    meta::{self, BuildError},
    Anchored, Input,
};

/// See [`regex`].
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: Cow<'static, str>,
    regex: meta::Regex,
}

impl Regex {
    /// Compile the given pattern, returning the build error if it is invalid.
    pub fn new(pattern: impl Into<Cow<'static, str>>) -> Result<Self, BuildError> {
        let pattern = pattern.into();
        let regex = meta::Regex::new(&pattern)?;
        Ok(Self { pattern, regex })
    }
}

impl Parser for Regex {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        let input = Input::new(state.remaining()).anchored(Anchored::Yes);
        match self.regex.search(&input) {
            Some(m) => matched(state, node, m.end()),
            None => mismatched(state, before, self.pattern.clone()),
        }
    }
}

/// Match input based on a provided regex pattern, anchored at the cursor.
///
/// The match follows the leftmost-first semantics of the `regex` crate, so the first alternative of a `|` that
/// matches wins, not the longest one. A pattern that can match the empty string always succeeds.
///
/// # Panics
///
/// Panics if the pattern is invalid. Use [`Regex::new`] to handle that case.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let words = one_or_more(regex("[a-zA-Z_][a-zA-Z0-9_]*"));
///
/// let node = words.parse("hello world this works").unwrap();
/// assert_eq!(node.children.len(), 4);
/// assert_eq!(node.children[3].token, "works");
/// ```
pub fn regex(pattern: impl Into<Cow<'static, str>>) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid regex: {}", err),
    }
}
