//! Combinators that allow combining and extending existing parsers.
//!
//! *“Ford... you're turning into a penguin. Stop it.”*
//!
//! Every combinator follows the same failure discipline. A failure is left on the [`State`] for the caller to see,
//! and the cursor is restored to where the combinator started, *unless* the cut mark (see [`cut`]) has moved past
//! that start. In that case the parse has committed and the failure is a hard one: nothing backtracks over it and no
//! optional or alternative combinator may absorb it.
//!
//! Although it's sometimes useful to be able to name their types, most of these parsers are much easier to work
//! with through their constructor functions or their respective methods on [`Parser`].

use super::*;

/// See [`seq`].
#[derive(Clone)]
pub struct Seq {
    parsers: Vec<Boxed>,
}

impl Parser for Seq {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        node.children.clear();
        node.children.reserve(self.parsers.len());
        for parser in &self.parsers {
            let mut child = Node::default();
            parser.go(state, &mut child);
            if state.errored() {
                *node = Node::default();
                if !state.cut_beyond(start) {
                    state.rewind(start);
                }
                return;
            }
            node.children.push(child);
        }
        node.start = start;
        node.end = state.pos();
    }
}

/// Match each of the given parsers in order. The output node has one child per parser.
///
/// If any parser fails, the output is an empty [`Node`] and the cursor is restored to where the sequence began,
/// unless a [`cut`] inside the sequence has committed to it.
///
/// The span of the output starts at the cursor the sequence was entered with, before any whitespace its first
/// parser skips. Children start after their own whitespace.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let greeting = seq(("hello", "world"));
///
/// let node = greeting.parse("hello world").unwrap();
/// assert_eq!(node.children[0].token, "hello");
/// assert_eq!(node.children[1].token, "world");
///
/// let err = greeting.parse("hello there").unwrap_err();
/// assert_eq!(err.to_string(), "offset 6: expected world");
/// ```
pub fn seq(parsers: impl ParsifyAll) -> Seq {
    Seq {
        parsers: parsers.parsify_all(),
    }
}

/// See [`any`].
#[derive(Clone)]
pub struct Any {
    parsers: Vec<Boxed>,
}

impl Parser for Any {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        let start = state.pos();
        if state.at_end() {
            state.error_here("more input");
            state.rewind(before);
            return;
        }

        let mut longest: Option<ParseError> = None;
        for parser in &self.parsers {
            *node = Node::default();
            parser.go(state, node);
            let err = match state.take_error() {
                None => {
                    node.start = start;
                    node.end = state.pos();
                    return;
                }
                Some(err) => err,
            };
            if state.cut_beyond(start) {
                state.set_error(err);
                return;
            }
            longest = Some(match longest {
                Some(longest) => longest.max(err),
                None => err,
            });
            state.rewind(start);
        }

        *node = Node::default();
        state.set_error(longest.unwrap_or_else(|| ParseError::new(start, "an alternative")));
        state.rewind(before);
    }
}

/// Match the first of the given parsers that succeeds.
///
/// If every alternative fails, the reported error is the one that got furthest into the input. Alternatives that
/// failed at that same furthest position have their expectations joined with `or`.
///
/// Once an alternative crosses a [`cut`], the remaining alternatives are not attempted: its failure is reported as
/// is.
///
/// With no alternatives at all, `any` always fails.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let keyword = any(("if", "else", "while"));
/// assert_eq!(keyword.parse("else").unwrap().token, "else");
///
/// let stmt = any((seq(("let", "x", "=")), seq(("let", "y", "="))));
/// assert_eq!(
///     stmt.parse("let z").unwrap_err().to_string(),
///     "offset 4: expected x or y",
/// );
/// ```
pub fn any(parsers: impl ParsifyAll) -> Any {
    Any {
        parsers: parsers.parsify_all(),
    }
}

/// See [`zero_or_more`] and [`one_or_more`].
#[derive(Clone)]
pub struct Many {
    min: usize,
    parser: Boxed,
    separator: Option<Boxed>,
}

impl Many {
    /// Consume (and discard) the given separator between repetitions.
    ///
    /// A separator that is not followed by another repetition is still consumed.
    pub fn separated_by(self, separator: impl Into<Parserish>) -> Self {
        Self {
            separator: Some(separator.into().parsify()),
            ..self
        }
    }
}

impl Parser for Many {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        node.children.clear();
        loop {
            let before = state.pos();
            let mut child = Node::default();
            self.parser.go(state, &mut child);
            if state.errored() {
                if node.children.len() < self.min || state.cut_beyond(before) {
                    state.rewind(start);
                    return;
                }
                state.recover();
                state.rewind(before);
                break;
            }
            node.children.push(child);

            if let Some(separator) = &self.separator {
                let after = state.pos();
                separator.go(state, &mut Node::default());
                if state.errored() {
                    state.recover();
                    state.rewind(after);
                    break;
                }
            }

            // An operand that matched nothing would match nothing forever
            if state.pos() == before {
                break;
            }
        }
        node.start = start;
        node.end = state.pos();
    }
}

/// Match the given parser as many times as possible, including not at all. Each match is a child of the output.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let list = zero_or_more(chars("a-z")).separated_by(",");
///
/// let node = list.parse("a,b,c,").unwrap();
/// assert_eq!(node.children.len(), 3);
/// assert!(list.parse("").unwrap().children.is_empty());
/// ```
pub fn zero_or_more(parser: impl Into<Parserish>) -> Many {
    Many {
        min: 0,
        parser: parser.into().parsify(),
        separator: None,
    }
}

/// Match the given parser as many times as possible, but at least once. Each match is a child of the output.
///
/// If there is not even one match, the error of the first attempt is reported.
pub fn one_or_more(parser: impl Into<Parserish>) -> Many {
    Many {
        min: 1,
        parser: parser.into().parsify(),
        separator: None,
    }
}

/// See [`maybe`].
#[derive(Clone)]
pub struct Maybe<A> {
    pub(crate) parser: A,
}

impl<A: Parser> Parser for Maybe<A> {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        self.parser.go(state, node);
        if state.errored() && !state.cut_beyond(start) {
            state.recover();
            state.rewind(start);
            *node = Node::default();
        }
    }
}

/// Match the given parser if possible. If it does not match, the output is an empty [`Node`] and parsing continues
/// without error.
///
/// A failure after a [`cut`] inside the operand is not absorbed.
pub fn maybe(parser: impl Into<Parserish>) -> Maybe<Boxed> {
    Maybe {
        parser: parser.into().parsify(),
    }
}

/// See [`bind`].
#[derive(Clone)]
pub struct Bind<A> {
    pub(crate) parser: A,
    pub(crate) value: Value,
}

impl<A: Parser> Parser for Bind<A> {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        self.parser.go(state, node);
        if state.errored() {
            return;
        }
        node.value = Some(self.value.clone());
        node.start = start;
        node.end = state.pos();
    }
}

/// Attach a constant value to the output of the given parser whenever it matches.
///
/// This is useful for giving a value to keywords and constant literals like `true` and `false`.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let boolean = any((bind("true", true), bind("false", false)));
/// assert_eq!(boolean.parse("false").unwrap().value_ref::<bool>(), Some(&false));
/// ```
pub fn bind<T: core::any::Any + Send + Sync>(parser: impl Into<Parserish>, value: T) -> Bind<Boxed> {
    Bind {
        parser: parser.into().parsify(),
        value: Value::new(value),
    }
}

/// See [`map`].
#[derive(Clone)]
pub struct Map<A, F> {
    pub(crate) parser: A,
    pub(crate) mapper: F,
}

impl<A, F> Parser for Map<A, F>
where
    A: Parser,
    F: Fn(&mut Node<'_>) + Send + Sync,
{
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        self.parser.go(state, node);
        if state.errored() {
            return;
        }
        node.start = start;
        node.end = state.pos();
        (self.mapper)(node);
    }
}

/// Call the given function on the output of the given parser whenever it matches.
///
/// The function may rewrite the node in any way. It is how leaf matches become typed values.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// #[derive(Clone, Debug, PartialEq)]
/// struct Tag(String);
///
/// let tag = map(seq(("<", chars("a-zA-Z0-9"), ">")), |n| {
///     let name = n.children[1].token.to_string();
///     n.set_value(Tag(name));
/// });
///
/// assert_eq!(tag.parse("<html>").unwrap().value_ref(), Some(&Tag("html".into())));
/// assert_eq!(tag.parse("<html").unwrap_err().to_string(), "offset 5: expected >");
/// ```
pub fn map<F>(parser: impl Into<Parserish>, f: F) -> Map<Boxed, F>
where
    F: Fn(&mut Node<'_>) + Send + Sync,
{
    Map {
        parser: parser.into().parsify(),
        mapper: f,
    }
}

/// See [`chain`].
#[derive(Clone)]
pub struct Chain<A, F> {
    pub(crate) parser: A,
    pub(crate) next: F,
}

impl<A, F, P> Parser for Chain<A, F>
where
    A: Parser,
    F: Fn(&Node<'_>) -> P + Send + Sync,
    P: Into<Parserish>,
{
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        let mut first = Node::default();
        self.parser.go(state, &mut first);
        if state.errored() {
            *node = first;
            return;
        }

        let next = (self.next)(&first).into().parsify();
        next.go(state, node);
        if state.errored() {
            if !state.cut_beyond(start) {
                state.rewind(start);
            }
            return;
        }
        node.start = start;
        node.end = state.pos();
    }
}

/// Parse one thing, then choose what to parse next based on what was found.
///
/// The output of the chosen parser is the output of the chain.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// // A length-prefixed run of characters
/// let counted = chain(chars("0-9"), |n| {
///     let len = n.token.parse().unwrap_or(0);
///     chars("a-z").exactly(len)
/// });
///
/// assert_eq!(counted.parse("3abc").unwrap().token, "abc");
/// assert!(counted.parse("3ab").is_err());
/// ```
pub fn chain<F, P>(parser: impl Into<Parserish>, next: F) -> Chain<Boxed, F>
where
    F: Fn(&Node<'_>) -> P + Send + Sync,
    P: Into<Parserish>,
{
    Chain {
        parser: parser.into().parsify(),
        next,
    }
}

/// See [`merge`].
#[derive(Clone)]
pub struct Merge<A> {
    pub(crate) parser: A,
}

impl<A: Parser> Parser for Merge<A> {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let start = state.pos();
        self.parser.go(state, node);
        if state.errored() {
            return;
        }
        node.start = start;
        node.end = state.pos();
        node.token = node.flattened();
    }
}

/// Concatenate the tokens of every descendant of the given parser's output into the output's own token.
///
/// Use this when a structured sub-grammar should be exposed as one flat piece of text. Children are left in place.
pub fn merge(parser: impl Into<Parserish>) -> Merge<Boxed> {
    Merge {
        parser: parser.into().parsify(),
    }
}

/// See [`no_auto_ws`].
#[derive(Clone)]
pub struct NoAutoWs<A> {
    pub(crate) parser: A,
}

impl<A: Parser> Parser for NoAutoWs<A> {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let old = state.set_whitespace(Whitespace::Nothing);
        let start = state.pos();
        self.parser.go(state, node);
        state.set_whitespace(old);
        if state.errored() {
            return;
        }
        node.start = start;
        node.end = state.pos();
    }
}

/// Disable automatic whitespace skipping for everything inside the given parser.
///
/// The previous strategy is restored afterwards, whether or not the parser matched.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let version = merge(no_auto_ws(seq((chars("0-9"), ".", chars("0-9")))));
///
/// assert_eq!(version.parse("1.23").unwrap().token, "1.23");
/// assert!(version.parse("1 . 23").is_err());
/// ```
pub fn no_auto_ws(parser: impl Into<Parserish>) -> NoAutoWs<Boxed> {
    NoAutoWs {
        parser: parser.into().parsify(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(node: &Node<'_>) -> Vec<String> {
        node.children.iter().map(|c| c.token.to_string()).collect()
    }

    mod seq {
        use super::*;

        #[test]
        fn matches_sequence() {
            let (node, state) = seq(("hello", "world")).parse_partial("hello world");
            assert_eq!(tokens(&node), ["hello", "world"]);
            assert_eq!(state.remaining(), "");
            assert_eq!(node.span(), 0..11);
        }

        #[test]
        fn backtracks_on_failure() {
            let (_, state) = seq(("hello", "world")).parse_partial("hello there");
            let err = state.error().unwrap();
            assert_eq!(err.expected(), "world");
            assert_eq!(err.pos(), 6);
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn backtracks_from_any_position() {
            for input in ["b c d", "a x d", "a c x"] {
                let (_, state) = seq(("a", "c", "d")).parse_partial(input);
                assert!(state.errored());
                assert_eq!(state.pos(), 0, "input {:?}", input);
            }
        }

        #[test]
        fn cut_leaves_cursor_at_failure() {
            let (_, state) = seq(("var", cut(), "hello")).parse_partial("var world");
            assert_eq!(state.error().unwrap().to_string(), "offset 4: expected hello");
            assert_eq!(state.pos(), 3);
        }

        #[test]
        fn failure_leaves_empty_node() {
            for input in ["x c d", "a c x"] {
                let (node, state) = seq(("a", "c", "d")).parse_partial(input);
                assert!(state.errored());
                assert_eq!(node, Node::default(), "input {:?}", input);
            }

            let (node, state) = seq(("var", cut(), "hello")).parse_partial("var world");
            assert!(state.errored());
            assert_eq!(node, Node::default());
        }

        #[test]
        fn span_includes_leading_whitespace() {
            let node = seq(("a", "b")).parse("  a b").unwrap();
            assert_eq!(node.span(), 0..5);
            assert_eq!(node.children[0].span(), 2..3);
            assert_eq!(node.children[1].span(), 4..5);
        }
    }

    mod maybe {
        use super::*;

        #[test]
        fn matches() {
            let (node, state) = maybe("hello").parse_partial("hello world");
            assert_eq!(node.token, "hello");
            assert_eq!(state.remaining(), " world");
        }

        #[test]
        fn absent_is_not_an_error() {
            let (node, state) = maybe("world").parse_partial("hello world");
            assert_eq!(node, Node::default());
            assert!(!state.errored());
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn never_fails_without_cut() {
            let parsers: Vec<Boxed> = vec![
                parsify("x"),
                seq(("a", "b", "c")).boxed(),
                one_or_more(chars("0-9")).boxed(),
                any(("q", seq(("a", "z")))).boxed(),
            ];
            for parser in parsers {
                for input in ["", "a", "a b", "abz", "1 2 x"] {
                    let (_, state) = maybe(parser.clone()).parse_partial(input);
                    assert!(!state.errored(), "input {:?}", input);
                }
            }
        }

        #[test]
        fn cannot_swallow_cut() {
            let (_, state) = maybe(seq(("var", cut(), "hello"))).parse_partial("var");
            assert_eq!(state.error().unwrap().to_string(), "offset 3: expected hello");
        }
    }

    mod any {
        use super::*;

        #[test]
        fn first_match_wins() {
            let (node, state) = any(("hello", "world")).parse_partial("hello world!");
            assert_eq!(node.token, "hello");
            assert_eq!(state.pos(), 5);
        }

        #[test]
        fn reports_longest_error() {
            let (_, state) = any((
                "nope",
                seq(("hello", "world", ".")),
                seq(("hello", "brother")),
            ))
            .parse_partial("hello world!");
            assert_eq!(state.error().unwrap().to_string(), "offset 11: expected .");
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn joins_errors_at_same_position() {
            let (_, state) = any((
                seq(("a", "x")),
                "zzz",
                seq(("a", "b", "y")),
                seq(("a", "b", "w")),
            ))
            .parse_partial("a b c");
            let err = state.error().unwrap();
            assert_eq!(err.pos(), 4);
            assert_eq!(err.expected(), "y or w");
        }

        #[test]
        fn total_failure_leaves_empty_node() {
            let (node, state) = any((exact("ffffff"),)).parse_partial("hello world!");
            assert_eq!(node, Node::default());
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn end_of_input() {
            let (_, state) = any(("a", "b")).parse_partial("   ");
            assert_eq!(state.error().unwrap().to_string(), "offset 3: expected more input");
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn overlapping_alternatives() {
            let parser = one_or_more(any(("ab", "a")));

            let (node, state) = parser.parse_partial("a ab");
            assert!(!state.errored());
            assert_eq!(tokens(&node), ["a", "ab"]);

            let (node, state) = parser.parse_partial("ab a");
            assert!(!state.errored());
            assert_eq!(tokens(&node), ["ab", "a"]);
        }

        #[test]
        fn inner_failure_does_not_leak() {
            let parser = any((seq(("str", "1")), any(("str2",)), "str"));
            let (node, state) = parser.parse_partial("str");
            assert!(!state.errored());
            assert_eq!(state.remaining(), "");
            assert_eq!(node.token, "str");
            assert!(node.children.is_empty());
        }

        #[test]
        fn cut_stops_alternatives() {
            let parser = any((seq(("var", cut(), "hello")), "var world"));
            let (_, state) = parser.parse_partial("var world");
            assert_eq!(state.error().unwrap().to_string(), "offset 4: expected hello");
            assert_eq!(state.pos(), 3);
        }

        #[test]
        fn no_alternatives_fails() {
            let (node, state) = any(Vec::<Boxed>::new()).parse_partial("  abc");
            assert_eq!(state.error().unwrap().to_string(), "offset 2: expected an alternative");
            assert_eq!(node, Node::default());
            assert_eq!(state.pos(), 0);

            assert!(maybe(any(Vec::<Boxed>::new())).parse("").is_ok());
        }
    }

    mod many {
        use super::*;

        #[test]
        fn with_separator() {
            let (node, state) = zero_or_more(chars("a-g")).separated_by(",").parse_partial("a,b,c,d,e,");
            assert!(!state.errored());
            assert_eq!(tokens(&node), ["a", "b", "c", "d", "e"]);
            assert_eq!(state.pos(), 10);
        }

        #[test]
        fn without_trailing_separator() {
            let (node, state) = zero_or_more(chars("a-g"))
                .separated_by(",")
                .parse_partial("a,b,c,d,e1111");
            assert!(!state.errored());
            assert_eq!(tokens(&node), ["a", "b", "c", "d", "e"]);
            assert_eq!(state.remaining(), "1111");
        }

        #[test]
        fn separators_as_operands() {
            let (node, state) = zero_or_more(any((chars("a-g"), ","))).parse_partial("a,b,c,d,e,");
            assert_eq!(tokens(&node), ["a", ",", "b", ",", "c", ",", "d", ",", "e", ","]);
            assert_eq!(state.pos(), 10);
        }

        #[test]
        fn splits_on_whitespace() {
            let (node, state) = zero_or_more(chars("a-z")).parse_partial("hello world");
            assert_eq!(tokens(&node), ["hello", "world"]);
            assert_eq!(state.remaining(), "");
        }

        #[test]
        fn stops_at_first_mismatch() {
            let (node, state) = one_or_more(chars("abc")).separated_by(exact(",")).parse_partial("a,b,c,d,e,");
            assert_eq!(tokens(&node), ["a", "b", "c"]);
            assert_eq!(state.pos(), 6);
            assert_eq!(state.remaining(), "d,e,");
        }

        #[test]
        fn minimum_not_met() {
            let (_, state) = one_or_more(chars("def")).separated_by(exact(",")).parse_partial("a,b,c,d,e,");
            assert_eq!(state.error().unwrap().to_string(), "offset 0: expected def");
            assert_eq!(state.remaining(), "a,b,c,d,e,");

            let (node, state) = zero_or_more(chars("def")).parse_partial("a,b,c,d,e,");
            assert!(!state.errored());
            assert!(node.children.is_empty());
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn empty_operand_terminates() {
            let (node, state) = zero_or_more(maybe("x")).parse_partial("yyy");
            assert!(!state.errored());
            assert_eq!(node.children.len(), 1);
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn cut_fails_whole_repetition() {
            let parser = one_or_more(any((seq(("<", cut(), chars("a-z"), ">")), chars("a-z"))));
            let (_, state) = parser.parse_partial("hello <world");
            assert_eq!(state.error().unwrap().to_string(), "offset 12: expected >");
            assert_eq!(state.pos(), 0);
        }
    }

    mod bind {
        use super::*;

        #[test]
        fn attaches_constant() {
            let (node, _) = bind("true", true).parse_partial("true");
            assert_eq!(node.value_ref::<bool>(), Some(&true));
            assert_eq!(node.span(), 0..4);
        }

        #[test]
        fn failure_leaves_no_value() {
            let (node, state) = bind("true", true).parse_partial("nil");
            assert!(node.value.is_none());
            assert_eq!(state.error().unwrap().to_string(), "offset 0: expected true");
            assert_eq!(state.pos(), 0);
        }
    }

    mod map {
        use super::*;

        #[derive(Clone, Debug, PartialEq)]
        struct HtmlTag {
            name: String,
        }

        fn tag() -> impl Parser {
            seq(("<", chars("a-zA-Z0-9"), ">")).map(|n| {
                let name = n.children[1].token.to_string();
                n.set_value(HtmlTag { name });
            })
        }

        #[test]
        fn success() {
            let (node, _) = tag().parse_partial("<html>");
            assert_eq!(node.value_ref(), Some(&HtmlTag { name: "html".into() }));
        }

        #[test]
        fn failure_skips_callback() {
            let called = Arc::new(core::sync::atomic::AtomicBool::new(false));
            let flag = called.clone();
            let parser = map("x", move |_| flag.store(true, core::sync::atomic::Ordering::SeqCst));
            let (_, state) = parser.parse_partial("y");
            assert!(state.errored());
            assert!(!called.load(core::sync::atomic::Ordering::SeqCst));

            let (_, state) = tag().parse_partial("<html");
            assert_eq!(state.error().unwrap().to_string(), "offset 5: expected >");
            assert_eq!(state.pos(), 0);
        }
    }

    mod chain {
        use super::*;

        #[derive(Clone, Debug, PartialEq)]
        enum Data {
            Str(String),
            Num(f64),
            Roll(u32, u32),
        }

        fn parser() -> impl Parser {
            chain(seq((any(("string", "number", "diceroll")), ":")), |prev| {
                match prev.children[0].token.as_ref() {
                    "string" => chars("a-zA-Z0-9")
                        .map(|n| {
                            let s = n.token.to_string();
                            n.set_value(Data::Str(s));
                        })
                        .boxed(),
                    "number" => number_lit()
                        .map(|n| {
                            let x = match (n.value_ref::<i64>(), n.value_ref::<f64>()) {
                                (Some(i), _) => *i as f64,
                                (_, Some(f)) => *f,
                                _ => f64::NAN,
                            };
                            n.set_value(Data::Num(x));
                        })
                        .boxed(),
                    _ => {
                        let num = chars("0-9").map(|n| {
                            let x: u32 = n.token.parse().unwrap_or(0);
                            n.set_value(x);
                        });
                        seq((num.clone(), "d", num))
                            .map(|n| {
                                let a = *n.children[0].value_ref::<u32>().unwrap();
                                let b = *n.children[2].value_ref::<u32>().unwrap();
                                n.set_value(Data::Roll(a, b));
                            })
                            .boxed()
                    }
                }
            })
        }

        #[test]
        fn picks_continuation() {
            let node = parser().parse("string:something").unwrap();
            assert_eq!(node.value_ref(), Some(&Data::Str("something".into())));
            assert_eq!(node.span(), 0..16);

            let node = parser().parse("number: 12.5").unwrap();
            assert_eq!(node.value_ref(), Some(&Data::Num(12.5)));

            let node = parser().parse("diceroll:2d6").unwrap();
            assert_eq!(node.value_ref(), Some(&Data::Roll(2, 6)));
        }

        #[test]
        fn continuation_error() {
            let (_, state) = parser().parse_partial("number:&*%");
            assert_eq!(state.error().unwrap().to_string(), "offset 7: expected number");
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn first_stage_error() {
            let (_, state) = parser().parse_partial("dunno:&*%");
            assert_eq!(
                state.error().unwrap().to_string(),
                "offset 0: expected string or number or diceroll",
            );
            assert_eq!(state.pos(), 0);
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn flattens_nested() {
            let mut bracer = Rule::declare();
            bracer.define(seq(("(", maybe(&bracer), ")")));
            let parser = merge(&bracer);

            let (node, _) = parser.parse_partial("((()))");
            assert_eq!(node.token, "((()))");
            assert_eq!(node.children.len(), 3);

            let (_, state) = parser.parse_partial("((())");
            assert_eq!(state.error().unwrap().to_string(), "offset 5: expected )");
            assert_eq!(state.pos(), 0);
        }

        #[test]
        fn flat_input_unchanged() {
            let (node, _) = merge(chars("a-z")).parse_partial("hello");
            assert_eq!(node.token, "hello");
        }
    }

    mod no_auto_ws {
        use super::*;

        #[test]
        fn disables_and_restores() {
            let parser = seq((no_auto_ws(seq(("a", "b"))), "c"));
            assert!(parser.parse("ab c").is_ok());
            assert!(parser.parse("a b c").is_err());

            let (_, state) = no_auto_ws("x").parse_partial(" x");
            assert!(state.errored());
            assert!(matches!(state.whitespace(), Whitespace::Unicode));
        }
    }
}
