//! Utilities for debugging parsers.
//!
//! *“He was staring at the instruments with the air of one who is trying to convert Fahrenheit to centigrade in his
//! head while his house is burning down.”*
//!
//! Name the interesting parts of a grammar with [`Parser::debug`], then run it with [`Parser::parse_verbose`] to get
//! a [`Verbose`] trace of every named scope that was entered. Named scopes are also reported through `tracing` at
//! the trace level, so a subscriber can follow a run without a verbose trace being collected.

use super::*;

use hashbrown::HashMap;

/// See [`Parser::debug`].
#[derive(Clone)]
pub struct Debug<A> {
    pub(crate) parser: A,
    pub(crate) name: Cow<'static, str>,
}

impl<A: Parser> Parser for Debug<A> {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        tracing::trace!(name = %self.name, start, "entering");
        state.scope(&self.name, |state| self.parser.go(state, node));
        match state.error() {
            Some(err) => tracing::trace!(name = %self.name, start, error = %err, "failed"),
            None => tracing::trace!(name = %self.name, start, end = state.pos(), "matched"),
        }
    }
}

/// How a named scope ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The parser matched, leaving the cursor at the given offset.
    Matched(usize),
    /// The parser failed.
    Failed(ParseError),
}

/// An event that occurred during parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Debugging information was emitted.
    Info(String),
    /// A named scope was entered and left.
    Scope {
        /// The name given to [`Parser::debug`].
        name: Cow<'static, str>,
        /// The cursor when the scope was entered.
        start: usize,
        /// How the scope ended.
        outcome: Outcome,
        /// Events from scopes nested inside this one.
        inner: Verbose,
    },
}

/// A trace of the named scopes entered during a run. See [`Parser::parse_verbose`].
///
/// Displaying a trace prints it as an indented tree, one scope per line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Verbose {
    events: Vec<Event>,
}

impl Verbose {
    /// The top-level events of this trace.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Add a free-form message to the trace.
    pub fn info(&mut self, msg: impl Into<String>) {
        self.events.push(Event::Info(msg.into()));
    }

    pub(crate) fn push_scope(&mut self, name: Cow<'static, str>, start: usize, outcome: Outcome, inner: Verbose) {
        self.events.push(Event::Scope {
            name,
            start,
            outcome,
            inner,
        });
    }

    /// Count, for each scope name, how many times it was entered and how many of those times it failed.
    ///
    /// Nested scopes are included.
    pub fn stats(&self) -> HashMap<Cow<'static, str>, (usize, usize)> {
        let mut stats = HashMap::new();
        self.collect_stats(&mut stats);
        stats
    }

    fn collect_stats(&self, stats: &mut HashMap<Cow<'static, str>, (usize, usize)>) {
        for event in &self.events {
            if let Event::Scope {
                name,
                outcome,
                inner,
                ..
            } = event
            {
                let (calls, failures) = stats.entry(name.clone()).or_insert((0, 0));
                *calls += 1;
                if matches!(outcome, Outcome::Failed(_)) {
                    *failures += 1;
                }
                inner.collect_stats(stats);
            }
        }
    }

    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for event in &self.events {
            write!(f, "{:indent$}", "", indent = depth * 4)?;
            match event {
                Event::Info(s) => writeln!(f, "{}", s)?,
                Event::Scope {
                    name,
                    start,
                    outcome,
                    inner,
                } => {
                    match outcome {
                        Outcome::Matched(end) => writeln!(f, "{} {}..{} matched", name, start, end)?,
                        Outcome::Failed(err) => writeln!(f, "{} {} failed: {}", name, start, err)?,
                    }
                    inner.fmt_inner(f, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Verbose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_inner(f, 0)
    }
}
