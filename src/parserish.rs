//! Lifting values that can stand in for a parser into a [`Boxed`] parser.
//!
//! Grammars are written with a mixture of already-built parsers, string literals and forward references to rules
//! that are not yet defined. [`Parserish`] is the closed set of those three shapes. It is resolved once, when the
//! grammar is constructed, so no dispatch over it happens while parsing.

use super::*;

use alloc::borrow::Cow;

/// Anything that can be adapted into a parser.
///
/// You rarely name this type: every combinator constructor accepts `impl Into<Parserish>`.
#[derive(Clone)]
pub enum Parserish {
    /// An already-built parser.
    Parser(Boxed),
    /// A literal, matched exactly (see [`exact`]).
    Literal(Cow<'static, str>),
    /// A reference to a rule that may not be defined yet.
    Forward(Rule),
}

impl Parserish {
    /// Resolve into a parser.
    pub fn parsify(self) -> Boxed {
        match self {
            Self::Parser(parser) => parser,
            Self::Literal(text) => Exact::new(text).boxed(),
            Self::Forward(rule) => rule.to_parser(),
        }
    }
}

impl<P: Parser + 'static> From<P> for Parserish {
    fn from(parser: P) -> Self {
        Self::Parser(parser.boxed())
    }
}

impl From<&'static str> for Parserish {
    fn from(text: &'static str) -> Self {
        Self::Literal(Cow::Borrowed(text))
    }
}

impl From<String> for Parserish {
    fn from(text: String) -> Self {
        Self::Literal(Cow::Owned(text))
    }
}

impl From<Rule> for Parserish {
    fn from(rule: Rule) -> Self {
        Self::Forward(rule)
    }
}

impl From<&Rule> for Parserish {
    fn from(rule: &Rule) -> Self {
        Self::Forward(rule.clone())
    }
}

/// Adapt a single value into a parser.
pub fn parsify(x: impl Into<Parserish>) -> Boxed {
    x.into().parsify()
}

/// A sequence of parser-like values, adapted in order.
///
/// Implemented for tuples of up to 16 (possibly different) `Into<Parserish>` types, for arrays and for [`Vec`].
pub trait ParsifyAll {
    /// Adapt every element, preserving order.
    fn parsify_all(self) -> Vec<Boxed>;
}

impl<T: Into<Parserish>> ParsifyAll for Vec<T> {
    fn parsify_all(self) -> Vec<Boxed> {
        self.into_iter().map(parsify).collect()
    }
}

impl<T: Into<Parserish>, const N: usize> ParsifyAll for [T; N] {
    fn parsify_all(self) -> Vec<Boxed> {
        self.into_iter().map(parsify).collect()
    }
}

macro_rules! impl_parsify_all_for_tuple {
    () => {};
    ($head:ident $($X:ident)*) => {
        impl_parsify_all_for_tuple!($($X)*);
        impl_parsify_all_for_tuple!(~ $head $($X)*);
    };
    (~ $($X:ident)*) => {
        #[allow(non_snake_case)]
        impl<$($X: Into<Parserish>),*> ParsifyAll for ($($X,)*) {
            fn parsify_all(self) -> Vec<Boxed> {
                let ($($X,)*) = self;
                vec![$(parsify($X)),*]
            }
        }
    };
}

impl_parsify_all_for_tuple!(A_ B_ C_ D_ E_ F_ G_ H_ I_ J_ K_ L_ M_ N_ O_ P_);
