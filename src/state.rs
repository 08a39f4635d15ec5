//! The mutable state threaded through a single parse run.
//!
//! *“Space is big. You just won't believe how vastly, hugely, mind-bogglingly big it is.”*
//!
//! A [`State`] owns the cursor, the most recent failure, the cut mark and the active [`Whitespace`] strategy. It is
//! created fresh for every run and handed down the call tree by exclusive reference, so a single grammar can serve
//! many independent runs at once.

use super::*;

use alloc::borrow::Cow;

/// A strategy for skipping insignificant input before a token is matched.
#[derive(Copy, Clone, Default)]
pub enum Whitespace {
    /// Skip anything that [`char::is_whitespace`] accepts.
    #[default]
    Unicode,
    /// Skip ASCII spaces, tabs, carriage returns and newlines.
    Ascii,
    /// Skip nothing.
    Nothing,
    /// Skip as many leading bytes as the function reports.
    Custom(fn(&str) -> usize),
}

impl Whitespace {
    /// The number of leading bytes of `input` that this strategy skips.
    pub fn skip(&self, input: &str) -> usize {
        match self {
            Self::Unicode => leading_len(input, char::is_whitespace),
            Self::Ascii => leading_len(input, |c| matches!(c, ' ' | '\t' | '\r' | '\n')),
            Self::Nothing => 0,
            Self::Custom(f) => {
                let mut n = f(input).min(input.len());
                while !input.is_char_boundary(n) {
                    n -= 1;
                }
                n
            }
        }
    }
}

impl fmt::Debug for Whitespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode => f.write_str("Unicode"),
            Self::Ascii => f.write_str("Ascii"),
            Self::Nothing => f.write_str("Nothing"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn leading_len(input: &str, f: impl Fn(char) -> bool) -> usize {
    input
        .char_indices()
        .find(|(_, c)| !f(*c))
        .map_or(input.len(), |(i, _)| i)
}

/// The state of a single parse run.
pub struct State<'a> {
    input: &'a str,
    pos: usize,
    cut: usize,
    error: Option<ParseError>,
    ws: Whitespace,
    pub(crate) verbose: Option<Verbose>,
}

impl<'a> State<'a> {
    /// Create a fresh state at the start of the given input, using [`Whitespace::Unicode`].
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            cut: 0,
            error: None,
            ws: Whitespace::default(),
            verbose: None,
        }
    }

    /// Use the given whitespace strategy for this run.
    pub fn with_whitespace(self, ws: Whitespace) -> Self {
        Self { ws, ..self }
    }

    /// Record a [`Verbose`] trace of `.debug(..)` scopes during this run.
    pub fn with_verbose(self) -> Self {
        Self {
            verbose: Some(Verbose::default()),
            ..self
        }
    }

    /// The whole input of this run.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// The current cursor offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The input that has not yet been consumed.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns `true` once the cursor has reached the end of the input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The current failure, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Returns `true` if the most recent parser failed and nothing has recovered from it yet.
    pub fn errored(&self) -> bool {
        self.error.is_some()
    }

    /// Remove and return the current failure.
    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    /// The active whitespace strategy.
    pub fn whitespace(&self) -> Whitespace {
        self.ws
    }

    /// Replace the whitespace strategy, returning the previous one.
    pub fn set_whitespace(&mut self, ws: Whitespace) -> Whitespace {
        core::mem::replace(&mut self.ws, ws)
    }

    /// The offset past which the parse has committed. See [`cut`].
    pub fn cut_mark(&self) -> usize {
        self.cut
    }

    /// Returns `true` if a cut was made strictly after `pos`, meaning a failure there must not be backtracked over.
    pub fn cut_beyond(&self, pos: usize) -> bool {
        self.cut > pos
    }

    /// Commit to the parse up to `pos`. The mark never moves backwards.
    pub fn raise_cut(&mut self, pos: usize) {
        self.cut = self.cut.max(pos);
    }

    /// Skip whitespace according to the active strategy.
    pub fn skip_whitespace(&mut self) {
        let n = self.ws.skip(self.remaining());
        self.pos += n;
    }

    /// Move the cursor forward by `n` bytes, stopping at the end of the input.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
        debug_assert!(
            self.input.is_char_boundary(self.pos),
            "cursor advanced into the middle of a character"
        );
    }

    /// Move the cursor back to an earlier offset.
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.input.len());
        self.pos = pos;
    }

    /// Record a failure at the cursor.
    pub fn error_here(&mut self, expected: impl Into<Cow<'static, str>>) {
        self.error_at(self.pos, expected);
    }

    /// Record a failure at the given offset.
    pub fn error_at(&mut self, pos: usize, expected: impl Into<Cow<'static, str>>) {
        self.error = Some(ParseError::new(pos, expected));
    }

    /// Replace the current failure with the given one.
    pub fn set_error(&mut self, err: ParseError) {
        self.error = Some(err);
    }

    /// Clear the current failure so that another alternative can be attempted.
    pub fn recover(&mut self) {
        self.error = None;
    }

    /// Add a message to the trace of this run. The message is only built if a [`Verbose`] trace is being recorded.
    pub fn info(&mut self, msg: impl FnOnce() -> String) {
        if let Some(verbose) = &mut self.verbose {
            verbose.info(msg());
        }
    }

    /// Run `f` inside a named debugging scope. Only recorded if this run is verbose.
    pub(crate) fn scope(&mut self, name: &Cow<'static, str>, f: impl FnOnce(&mut Self)) {
        let outer = match self.verbose.take() {
            Some(outer) => outer,
            None => return f(self),
        };
        self.verbose = Some(Verbose::default());
        let start = self.pos;
        f(self);
        let inner = core::mem::replace(&mut self.verbose, Some(outer)).unwrap_or_default();
        let outcome = match &self.error {
            Some(err) => Outcome::Failed(err.clone()),
            None => Outcome::Matched(self.pos),
        };
        if let Some(verbose) = &mut self.verbose {
            verbose.push_scope(name.clone(), start, outcome, inner);
        }
    }
}

impl fmt::Debug for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("pos", &self.pos)
            .field("cut", &self.cut)
            .field("error", &self.error)
            .field("ws", &self.ws)
            .finish()
    }
}
