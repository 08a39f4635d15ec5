//! Error types, traits and utilities.
//!
//! *“I like the cover," he said. "Don't Panic. It's the first helpful or intelligible thing anybody's said to me all
//! day.”*
//!
//! Parse failures are ordinary data: a failing parser records a [`ParseError`] on the [`State`] and returns. The
//! runner methods on [`Parser`] turn the final state into a [`RunError`].

use super::*;

use alloc::borrow::Cow;

/// A match failure: the furthest position reached and a description of what was expected there.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseError {
    pos: usize,
    expected: Cow<'static, str>,
}

impl ParseError {
    /// Create a new error at the given input offset.
    pub fn new(pos: usize, expected: impl Into<Cow<'static, str>>) -> Self {
        Self {
            pos,
            expected: expected.into(),
        }
    }

    /// The input offset at which the failure was detected.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// A human-readable description of what would have allowed parsing to continue.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Keep whichever of two errors reached further into the input. If they hold the same position, join their
    /// descriptions with `or`.
    pub fn max(self, other: Self) -> Self {
        match self.pos.cmp(&other.pos) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => self.merge(other),
        }
    }

    /// Join the descriptions of two errors at the same position.
    fn merge(mut self, other: Self) -> Self {
        let already = self
            .expected
            .split(" or ")
            .any(|alt| alt == other.expected.as_ref());
        if !already {
            let joined = format!("{} or {}", self.expected, other.expected);
            self.expected = Cow::Owned(joined);
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}: expected {}", self.pos, self.expected)
    }
}

impl std::error::Error for ParseError {}

/// The ways a complete run over an input can fail.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunError {
    /// The parser failed to match.
    Failed(ParseError),
    /// The parser matched, but did not consume the whole input.
    Unparsed {
        /// Offset of the first unconsumed byte.
        pos: usize,
        /// The unconsumed input.
        remaining: String,
    },
}

impl RunError {
    /// The input offset the error refers to.
    pub fn pos(&self) -> usize {
        match self {
            Self::Failed(err) => err.pos(),
            Self::Unparsed { pos, .. } => *pos,
        }
    }
}

impl From<ParseError> for RunError {
    fn from(err: ParseError) -> Self {
        Self::Failed(err)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => err.fmt(f),
            Self::Unparsed { remaining, .. } => write!(f, "left unparsed: {}", remaining),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Unparsed { .. } => None,
        }
    }
}
