//! Parser primitives that match specific patterns of text.
//!
//! *“These creatures you call mice, you see, they are not quite as they appear. They are merely the protrusion into
//! our dimension of vastly hyperintelligent pandimensional beings.”*
//!
//! Every leaf matcher here, and in [`text`], obeys the same contract:
//!
//! - whitespace is skipped with the active [`Whitespace`] strategy before matching (except by [`until`]);
//! - on success, the matched text becomes the node's `token`, `start` and `end` are set and the cursor advances;
//! - on failure, an error is recorded at the offset reached *after* skipping whitespace, and the cursor is put back
//!   where it was *before* skipping whitespace.
//!
//! Third-party leaf matchers can follow the same contract using the public methods on [`State`].

use super::*;

/// Finish a leaf match of `len` bytes starting at the cursor.
pub(crate) fn matched<'a>(state: &mut State<'a>, node: &mut Node<'a>, len: usize) {
    let start = state.pos();
    let input = state.input();
    state.advance(len);
    *node = Node {
        start,
        end: state.pos(),
        token: Cow::Borrowed(&input[start..state.pos()]),
        ..Node::default()
    };
}

/// Fail a leaf match at the cursor, putting the cursor back to `before`.
pub(crate) fn mismatched(state: &mut State<'_>, before: usize, expected: impl Into<Cow<'static, str>>) {
    state.error_here(expected);
    state.rewind(before);
}

/// See [`exact`].
#[derive(Clone, Debug)]
pub struct Exact {
    text: Cow<'static, str>,
}

impl Exact {
    /// Create a matcher for the given literal text.
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self { text: text.into() }
    }
}

impl Parser for Exact {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        if state.remaining().starts_with(self.text.as_ref()) {
            matched(state, node, self.text.len());
        } else {
            mismatched(state, before, self.text.clone());
        }
    }
}

/// A parser that accepts exactly the given text.
///
/// String literals are converted into this parser wherever a combinator accepts `impl Into<Parserish>`, so it is
/// rare to call this directly.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let question = exact("?");
///
/// assert_eq!(question.parse("?").unwrap().token, "?");
/// assert_eq!(question.parse("!").unwrap_err().to_string(), "offset 0: expected ?");
/// ```
pub fn exact(text: impl Into<Cow<'static, str>>) -> Exact {
    Exact::new(text)
}

/// A set of characters, written as in a regex character class without the brackets.
///
/// `a-z` is an inclusive range, `\` escapes the following character and a `-` at either end of the set stands for
/// itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
}

impl CharSet {
    /// Parse a set from its textual form.
    pub fn new(set: &str) -> Self {
        let mut items = Vec::new();
        let mut chars = set.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(c) => items.push((c, true)),
                    None => items.push(('\\', true)),
                },
                c => items.push((c, false)),
            }
        }

        let mut ranges = Vec::new();
        let mut i = 0;
        while i < items.len() {
            match items.get(i + 1..i + 3) {
                Some(&[('-', false), (hi, _)]) => {
                    let lo = items[i].0;
                    ranges.push((lo.min(hi), lo.max(hi)));
                    i += 3;
                }
                _ => {
                    ranges.push((items[i].0, items[i].0));
                    i += 1;
                }
            }
        }
        Self { ranges }
    }

    /// Returns `true` if the set contains the given character.
    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
    }
}

/// See [`chars`] and [`not_chars`].
#[derive(Clone, Debug)]
pub struct Chars {
    text: Cow<'static, str>,
    set: CharSet,
    negated: bool,
    min: usize,
    max: usize,
}

impl Chars {
    fn new(set: impl Into<Cow<'static, str>>, negated: bool) -> Self {
        let text = set.into();
        Self {
            set: CharSet::new(&text),
            text,
            negated,
            min: 1,
            max: usize::MAX,
        }
    }

    /// Require at least `n` characters. `0` makes the matcher optional.
    pub fn at_least(self, n: usize) -> Self {
        Self { min: n, ..self }
    }

    /// Match at most `n` characters.
    pub fn at_most(self, n: usize) -> Self {
        Self { max: n, ..self }
    }

    /// Match exactly `n` characters.
    pub fn exactly(self, n: usize) -> Self {
        Self { min: n, max: n, ..self }
    }
}

impl Parser for Chars {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        let rest = state.remaining();
        let (count, len) = rest
            .chars()
            .take(self.max)
            .take_while(|&c| self.set.contains(c) != self.negated)
            .fold((0, 0), |(count, len), c| (count + 1, len + c.len_utf8()));
        if count < self.min {
            mismatched(state, before, self.text.clone());
        } else {
            matched(state, node, len);
        }
    }
}

/// A parser that accepts a run of characters from the given set. See [`CharSet`] for the set syntax.
///
/// By default at least one character must match and the run is as long as possible. Use [`Chars::at_least`],
/// [`Chars::at_most`] and [`Chars::exactly`] to change that.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let hex = chars("0-9a-fA-F");
/// assert_eq!(hex.parse("DEADbeef").unwrap().token, "DEADbeef");
///
/// let byte = chars("0-9a-fA-F").exactly(2);
/// assert_eq!(byte.parse_partial("fff").0.token, "ff");
/// assert!(byte.parse("f").is_err());
/// ```
pub fn chars(set: impl Into<Cow<'static, str>>) -> Chars {
    Chars::new(set, false)
}

/// A parser that accepts a run of characters *not* in the given set. The inverse of [`chars`].
///
/// Note that automatic whitespace skipping still happens first, so a set that does not list whitespace will not
/// start its run with any.
pub fn not_chars(set: impl Into<Cow<'static, str>>) -> Chars {
    Chars::new(set, true)
}

/// See [`until`].
#[derive(Clone, Debug)]
pub struct Until {
    terminators: Vec<Cow<'static, str>>,
}

impl Parser for Until {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let rest = state.remaining();
        let len = rest
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| {
                self.terminators
                    .iter()
                    .any(|t| rest[i..].starts_with(t.as_ref()))
            })
            .unwrap_or(rest.len());
        if len == 0 {
            state.error_here("something");
        } else {
            matched(state, node, len);
        }
    }
}

/// A parser that accepts everything up to (but not including) the first of the given terminators, or to the end of
/// input.
///
/// Whitespace is not skipped: leading whitespace becomes part of the token. The parser fails if it would match
/// nothing.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let comment = seq(("#", until(["\n"])));
///
/// let (node, state) = comment.parse_partial("# hello\nworld");
/// assert_eq!(node.children[1].token, " hello");
/// assert_eq!(state.remaining(), "\nworld");
/// ```
pub fn until<I>(terminators: I) -> Until
where
    I: IntoIterator,
    I::Item: Into<Cow<'static, str>>,
{
    Until {
        terminators: terminators.into_iter().map(Into::into).collect(),
    }
}

/// See [`cut`].
#[derive(Copy, Clone, Debug)]
pub struct Cut;

impl Parser for Cut {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        state.raise_cut(state.pos());
        node.start = state.pos();
        node.end = state.pos();
    }
}

/// Commit to the current parse.
///
/// Once a cut has been crossed, failures after it are never backtracked over: [`any`] does not try its remaining
/// alternatives, [`maybe`] and the repetition combinators do not absorb the failure, and [`seq`] leaves the cursor
/// at the point of failure. This turns "nothing matched here" into a precise error from deep inside the branch that
/// was clearly intended.
///
/// The commitment is to everything before the cursor for the rest of the run, not just to the enclosing
/// combinator.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let tag = seq(("<", cut(), chars("a-z"), ">"));
/// let text = chars("a-z");
/// let doc = one_or_more(any((tag, text)));
///
/// assert_eq!(
///     doc.parse("hello <world").unwrap_err().to_string(),
///     "offset 12: expected >",
/// );
/// ```
pub fn cut() -> Cut {
    Cut
}
