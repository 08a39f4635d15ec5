//! Recursive parsers (parser that include themselves within their patterns).
//!
//! *“It's unpleasantly like being drunk."
//! "What's so unpleasant about being drunk?"
//! "You ask a glass of water.”*
//!
//! The [`recursive()`] function covers most cases, but sometimes it's necessary to manually control the declaration and
//! definition of parsers more carefully, particularly for mutually-recursive grammars. In such cases, the functions
//! on [`Rule`] allow for this.

use super::*;

use std::sync::{OnceLock, Weak};

type Slot = OnceLock<Boxed>;

#[derive(Clone)]
enum RuleInner {
    Owned(Arc<Slot>),
    Unowned(Weak<Slot>),
}

/// A named slot for a parser that can be referred to before it is defined.
///
/// Every handle to a rule (obtained via `&rule` or `rule.clone()`, both of which are `Into<Parserish>`) resolves the
/// slot lazily each time it is invoked, so a rule may freely appear inside its own definition.
///
/// Handles created from [`Rule::declare`] keep the rule alive. A rule that refers to itself through such a handle
/// forms a reference cycle and is never freed; prefer [`recursive()`], whose inner handle is weak, when the grammar
/// is not built once for the lifetime of the program.
#[derive(Clone)]
pub struct Rule {
    inner: RuleInner,
}

impl Rule {
    /// Declare the existence of a rule, allowing it to be used to construct combinators before being fully defined.
    ///
    /// This should be followed by **exactly one** call to [`Rule::define`] before the rule is used for parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parsify::prelude::*;
    /// let mut parens = Rule::declare();
    /// parens.define(seq(("(", maybe(&parens), ")")));
    ///
    /// let flat = merge(&parens);
    /// assert_eq!(flat.parse("((()))").unwrap().token, "((()))");
    /// ```
    pub fn declare() -> Self {
        Rule {
            inner: RuleInner::Owned(Arc::new(OnceLock::new())),
        }
    }

    /// Defines the rule after declaring it, allowing it to be used for parsing.
    ///
    /// # Panics
    ///
    /// Panics if the rule has already been defined.
    pub fn define(&mut self, parser: impl Into<Parserish>) {
        let parser = parser.into().parsify();
        if self.with_slot(|slot| slot.set(parser)).is_err() {
            panic!("rule defined more than once");
        }
    }

    /// Returns `true` if [`Rule::define`] has been called.
    pub fn is_defined(&self) -> bool {
        self.with_slot(|slot| slot.get().is_some())
    }

    /// Get a parser that invokes this rule.
    pub fn to_parser(&self) -> Boxed {
        Forward { rule: self.clone() }.boxed()
    }

    // Only a weak handle needs to touch the reference count.
    fn with_slot<R>(&self, f: impl FnOnce(&Slot) -> R) -> R {
        match &self.inner {
            RuleInner::Owned(x) => f(x.as_ref()),
            RuleInner::Unowned(x) => {
                let slot = x
                    .upgrade()
                    .expect("rule used after the parser that owns it was dropped");
                f(slot.as_ref())
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("defined", &self.is_defined())
            .finish()
    }
}

/// See [`Rule::to_parser`].
#[derive(Clone)]
pub struct Forward {
    rule: Rule,
}

impl Parser for Forward {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        self.rule.with_slot(|slot| {
            let parser = slot.get().expect("rule used before being defined");
            #[cfg(feature = "stacker")]
            stacker::maybe_grow(1024 * 64, 1024 * 1024, || parser.go(state, node));
            #[cfg(not(feature = "stacker"))]
            parser.go(state, node);
        })
    }
}

/// Construct a recursive parser (i.e: a parser that may contain itself as part of its pattern).
///
/// The given function must create the parser. The handle it is given must not be used to parse input before this
/// function returns.
///
/// This is a wrapper around [`Rule::declare`] and [`Rule::define`] that avoids the reference cycle a self-referential
/// rule would otherwise create.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// // A parser that counts nesting depth of brackets
/// let depth = recursive(|depth| {
///     any((
///         seq(("[", maybe(depth), "]")).map(|n| {
///             let inner = n.children[1].value_ref::<usize>().copied().unwrap_or(0);
///             n.set_value(inner + 1);
///         }),
///         "x",
///     ))
/// });
///
/// let node = depth.parse("[[[x]]]").unwrap();
/// assert_eq!(node.value_ref::<usize>(), Some(&3));
/// ```
pub fn recursive<F, P>(f: F) -> Boxed
where
    F: FnOnce(&Rule) -> P,
    P: Into<Parserish>,
{
    let slot = Arc::new(OnceLock::new());
    let inner = Rule {
        inner: RuleInner::Unowned(Arc::downgrade(&slot)),
    };
    let parser = f(&inner).into().parsify();
    if slot.set(parser).is_err() {
        unreachable!("recursive rule defined while being built");
    }
    Rule {
        inner: RuleInner::Owned(slot),
    }
    .to_parser()
}
