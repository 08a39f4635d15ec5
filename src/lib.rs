#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

extern crate alloc;

pub mod combinator;
pub mod debug;
pub mod error;
pub mod node;
pub mod parserish;
pub mod primitive;
pub mod recursive;
#[cfg(feature = "regex")]
pub mod regex;
pub mod state;
pub mod text;

pub use crate::{
    error::{ParseError, RunError},
    node::{Node, Value},
    parserish::{parsify, Parserish, ParsifyAll},
    recursive::{recursive, Rule},
    state::{State, Whitespace},
};

use crate::{
    combinator::*,
    debug::{Outcome, Verbose},
    primitive::*,
};

#[cfg(test)]
use crate::{recursive::*, text::*};

use alloc::borrow::Cow;
use std::{cmp::Ordering, fmt, ops::Range, sync::Arc};

/// Commonly used functions, traits and types.
pub mod prelude {
    #[cfg(feature = "regex")]
    pub use super::regex::regex;
    pub use super::{
        combinator::{any, bind, chain, map, maybe, merge, no_auto_ws, one_or_more, seq, zero_or_more},
        debug::Verbose,
        error::{ParseError, RunError},
        node::{Node, Value},
        parserish::{parsify, Parserish},
        primitive::{chars, cut, exact, not_chars, until},
        recursive::{recursive, Rule},
        state::{State, Whitespace},
        text::{ident, number_lit, string_lit},
        Boxed, Parser,
    };
}

fn finish<'a>(mut state: State<'a>, node: Node<'a>) -> Result<Node<'a>, RunError> {
    if let Some(err) = state.take_error() {
        tracing::debug!(pos = err.pos(), expected = err.expected(), "parse failed");
        return Err(RunError::Failed(err));
    }
    state.skip_whitespace();
    if !state.at_end() {
        tracing::debug!(pos = state.pos(), "input left unparsed");
        return Err(RunError::Unparsed {
            pos: state.pos(),
            remaining: state.remaining().to_string(),
        });
    }
    tracing::trace!(span = ?node.span(), "parse succeeded");
    Ok(node)
}

/// A trait implemented by parsers.
///
/// Parsers take a [`State`] holding the input and cursor, and fill in the [`Node`] they are given. A parser that
/// fails does not return anything special: it records a [`ParseError`] on the state, and its caller checks
/// [`State::errored`] after invoking it.
///
/// You should not need to implement this trait by hand unless you are writing a new leaf matcher. In that case, see
/// the contract described in [`primitive`]. Most of the time, combine the parsers in [`combinator`],
/// [`primitive`] and [`text`] instead.
///
/// Parsers are `Send + Sync`, so a single grammar may be shared between threads and used for many runs at once.
pub trait Parser: Send + Sync {
    /// Attempt to match at the cursor of `state`, writing the match into `node`.
    ///
    /// On failure, a [`ParseError`] is left on `state`. The cursor is left where it started unless a [`cut`] was
    /// crossed.
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>);

    /// Parse the whole of the given input, skipping whitespace with [`Whitespace::Unicode`].
    ///
    /// Trailing whitespace is permitted. Any other unconsumed input is reported as [`RunError::Unparsed`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsify::prelude::*;
    /// let parser = seq(("hello", "world"));
    ///
    /// assert!(parser.parse("hello world").is_ok());
    /// assert_eq!(
    ///     parser.parse("hello world!").unwrap_err(),
    ///     RunError::Unparsed { pos: 11, remaining: "!".to_string() },
    /// );
    /// ```
    fn parse<'a>(&self, input: &'a str) -> Result<Node<'a>, RunError> {
        self.parse_with(input, Whitespace::default())
    }

    /// Parse the whole of the given input, skipping whitespace with the given strategy.
    fn parse_with<'a>(&self, input: &'a str, ws: Whitespace) -> Result<Node<'a>, RunError> {
        let mut state = State::new(input).with_whitespace(ws);
        let mut node = Node::default();
        self.go(&mut state, &mut node);
        finish(state, node)
    }

    /// Parse a prefix of the given input, returning the final state alongside the output.
    ///
    /// No check is made for unconsumed input, and a failure is left on the returned state rather than turned into
    /// an error.
    fn parse_partial<'a>(&self, input: &'a str) -> (Node<'a>, State<'a>) {
        let mut state = State::new(input);
        let mut node = Node::default();
        self.go(&mut state, &mut node);
        (node, state)
    }

    /// Parse the whole of the given input like [`Parser::parse`], also recording a trace of every scope created
    /// with [`Parser::debug`].
    ///
    /// The trace is only worth producing while developing a grammar. It is considerably slower than a plain parse.
    fn parse_verbose<'a>(&self, input: &'a str) -> (Result<Node<'a>, RunError>, Verbose) {
        let mut state = State::new(input).with_verbose();
        let mut node = Node::default();
        self.go(&mut state, &mut node);
        let verbose = state.verbose.take().unwrap_or_default();
        (finish(state, node), verbose)
    }

    /// Call the given function on the output of this parser whenever it matches. See [`map`].
    fn map<F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(&mut Node<'_>) + Send + Sync,
    {
        Map {
            parser: self,
            mapper: f,
        }
    }

    /// Attach a constant value to the output of this parser whenever it matches. See [`bind`].
    fn bind<T: core::any::Any + Send + Sync>(self, value: T) -> Bind<Self>
    where
        Self: Sized,
    {
        Bind {
            parser: self,
            value: Value::new(value),
        }
    }

    /// Flatten the output of this parser into a single token. See [`merge`].
    fn merge(self) -> Merge<Self>
    where
        Self: Sized,
    {
        Merge { parser: self }
    }

    /// Disable automatic whitespace skipping inside this parser. See [`no_auto_ws`].
    fn no_auto_ws(self) -> NoAutoWs<Self>
    where
        Self: Sized,
    {
        NoAutoWs { parser: self }
    }

    /// Choose the parser that follows this one based on its output. See [`chain`].
    fn chain<F, P>(self, next: F) -> Chain<Self, F>
    where
        Self: Sized,
        F: Fn(&Node<'_>) -> P + Send + Sync,
        P: Into<Parserish>,
    {
        Chain { parser: self, next }
    }

    /// Box the parser, yielding a parser that performs parsing through dynamic dispatch.
    ///
    /// Boxing a parser might be useful for:
    ///
    /// - Storing parsers of different types in a collection
    ///
    /// - Giving a recursive grammar a nameable type
    ///
    /// Boxing an already boxed parser returns it unchanged.
    fn boxed(self) -> Boxed
    where
        Self: Sized + 'static,
    {
        Boxed(Arc::new(self))
    }

    /// Give this parser a name in the trace of verbose runs (see [`Parser::parse_verbose`]).
    ///
    /// Entering and leaving a named scope is also logged through `tracing` at the trace level.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsify::prelude::*;
    /// let word = chars("a-z").debug("word");
    /// let words = one_or_more(word);
    ///
    /// let (result, trace) = words.parse_verbose("hello world");
    /// assert!(result.is_ok());
    /// assert_eq!(trace.stats()["word"], (3, 1));
    /// ```
    fn debug(self, name: impl Into<Cow<'static, str>>) -> debug::Debug<Self>
    where
        Self: Sized,
    {
        debug::Debug {
            parser: self,
            name: name.into(),
        }
    }
}

/// A parser that performs parsing through dynamic dispatch. See [`Parser::boxed`].
///
/// Cloning a boxed parser is cheap: it shares the underlying parser.
#[derive(Clone)]
pub struct Boxed(Arc<dyn Parser>);

impl Parser for Boxed {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        self.0.go(state, node)
    }

    fn boxed(self) -> Boxed {
        self
    }
}
