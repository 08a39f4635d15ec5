//! The result tree produced by parser invocations.
//!
//! Every parser writes into a [`Node`]. Leaf parsers fill in the matched `token`, sequencing and repetition fill in
//! `children`, and callbacks such as [`Parser::map`] attach a semantic [`Value`] that is carried up the tree.

use super::*;

use alloc::borrow::Cow;
use core::any::Any;

/// A cheaply clonable, type-erased payload attached to a [`Node`].
///
/// Values are reference counted so that constants supplied to [`bind`] can be handed out on every match without
/// being deep-copied. Two values compare equal only if they share the same allocation.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(x: T) -> Self {
        Self(Arc::new(x))
    }

    /// Returns `true` if the payload has type `T`.
    pub fn is<T: Any>(&self) -> bool {
        (*self.0).is::<T>()
    }

    /// Borrow the payload as a `T`, if that is its type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>()
    }

    /// Take the payload out as a `T`.
    ///
    /// The payload is moved out if this is the only handle to it, and cloned otherwise (e.g: when the value came
    /// from a [`bind`] constant).
    pub fn into_inner<T: Any + Send + Sync + Clone>(self) -> Option<T> {
        let x = self.0.downcast::<T>().ok()?;
        Some(Arc::try_unwrap(x).unwrap_or_else(|x| (*x).clone()))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Value(..)")
    }
}

/// The output of a single parser invocation.
///
/// A node that matched nothing is indistinguishable from [`Node::default()`], which is what optional combinators
/// produce when their operand is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node<'a> {
    /// Offset of the first byte spanned by this match.
    pub start: usize,
    /// Offset one past the last byte spanned by this match.
    pub end: usize,
    /// The matched text. Leaf parsers borrow it from the input, [`merge`] builds an owned one.
    pub token: Cow<'a, str>,
    /// Sub-results, in input order.
    pub children: Vec<Node<'a>>,
    /// A semantic payload set by [`bind`], [`map`] or a leaf parser.
    pub value: Option<Value>,
}

impl<'a> Node<'a> {
    /// Returns `true` if this node is the zero value, i.e: nothing was matched into it.
    pub fn is_empty(&self) -> bool {
        self.start == 0
            && self.end == 0
            && self.token.is_empty()
            && self.children.is_empty()
            && self.value.is_none()
    }

    /// Get the child at the given index.
    pub fn child(&self, idx: usize) -> Option<&Node<'a>> {
        self.children.get(idx)
    }

    /// The byte range of the input spanned by this node.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Attach a payload to this node, replacing any existing one.
    pub fn set_value<T: Any + Send + Sync>(&mut self, x: T) {
        self.value = Some(Value::new(x));
    }

    /// Borrow this node's payload as a `T`.
    pub fn value_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_ref()?.downcast_ref()
    }

    /// Take this node's payload as a `T`, leaving no payload behind.
    ///
    /// If the payload has a different type it is left in place and `None` is returned.
    pub fn take_value<T: Any + Send + Sync + Clone>(&mut self) -> Option<T> {
        if !self.value.as_ref()?.is::<T>() {
            return None;
        }
        self.value.take()?.into_inner()
    }

    /// Concatenate the tokens of every descendant, depth-first and left to right.
    ///
    /// A childless node yields its own token.
    pub fn flattened(&self) -> Cow<'a, str> {
        if self.children.is_empty() {
            return self.token.clone();
        }
        let mut buf = String::new();
        self.flatten_into(&mut buf);
        Cow::Owned(buf)
    }

    fn flatten_into(&self, buf: &mut String) {
        if self.children.is_empty() {
            buf.push_str(&self.token);
        } else {
            for child in &self.children {
                child.flatten_into(buf);
            }
        }
    }
}
