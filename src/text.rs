//! Text-specific parsers for common lexical tokens.
//!
//! *“Ford!" he said, "there's an infinite number of monkeys outside who want to talk to us about this script for
//! Hamlet they've worked out.”*
//!
//! The matchers in this module follow the leaf contract described in [`primitive`]. Besides setting `token` to the
//! raw text that was matched, they attach the decoded [`Value`] of the literal to the node.

use super::*;

/// See [`string_lit`].
#[derive(Clone, Debug)]
pub struct StringLit {
    quotes: Cow<'static, str>,
}

/// Why a string literal could not be decoded, and where.
struct Invalid {
    at: usize,
    expected: Cow<'static, str>,
}

impl Invalid {
    fn new(at: usize, expected: impl Into<Cow<'static, str>>) -> Self {
        Self {
            at,
            expected: expected.into(),
        }
    }
}

fn hex4(s: &str) -> Option<u32> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Decode the body of a literal opened by `quote`, whose text starts at `body`. Returns the decoded string and the
/// length of the body including the closing quote.
fn unescape(body: &str, quote: char) -> Result<(String, usize), Invalid> {
    let mut out = String::new();
    let mut iter = body.char_indices();
    while let Some((i, c)) = iter.next() {
        if c == quote {
            return Ok((out, i + c.len_utf8()));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match iter.next() {
            Some((_, 'n')) => '\n',
            Some((_, 't')) => '\t',
            Some((_, 'r')) => '\r',
            Some((_, 'b')) => '\u{8}',
            Some((_, 'f')) => '\u{c}',
            Some((_, '/')) => '/',
            Some((_, '\\')) => '\\',
            Some((_, c)) if c == quote => quote,
            Some((j, 'u')) => {
                let at = j + 1;
                let high = hex4(&body[at..]).ok_or_else(|| Invalid::new(at, "4 hex digits"))?;
                // Skip the four digits
                iter.nth(3);
                match char::from_u32(high) {
                    Some(c) => c,
                    None if (0xD800..0xDC00).contains(&high) && body[at + 4..].starts_with("\\u") => {
                        let low = hex4(&body[at + 6..])
                            .filter(|low| (0xDC00..0xE000).contains(low))
                            .ok_or_else(|| Invalid::new(at + 4, "valid escape sequence"))?;
                        iter.nth(5);
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        char::from_u32(code).ok_or_else(|| Invalid::new(at + 4, "valid escape sequence"))?
                    }
                    None => return Err(Invalid::new(i, "valid escape sequence")),
                }
            }
            Some(_) => return Err(Invalid::new(i, "valid escape sequence")),
            None => break,
        };
        out.push(escaped);
    }
    Err(Invalid::new(body.len(), quote.to_string()))
}

impl Parser for StringLit {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        let rest = state.remaining();
        let quote = match rest.chars().next() {
            Some(c) if self.quotes.contains(c) => c,
            _ => return mismatched(state, before, self.quotes.clone()),
        };
        let open = quote.len_utf8();
        match unescape(&rest[open..], quote) {
            Ok((text, len)) => {
                matched(state, node, open + len);
                node.set_value(text);
            }
            Err(invalid) => {
                state.error_at(state.pos() + open + invalid.at, invalid.expected);
                state.rewind(before);
            }
        }
    }
}

/// A parser that accepts a quoted string literal, opened and closed by any one of the given quote characters.
///
/// The escapes `\n`, `\t`, `\r`, `\b`, `\f`, `\/`, `\\`, `\uXXXX` (including UTF-16 surrogate pairs) and a
/// backslash followed by the opening quote are recognised. The node's value is the decoded [`String`], and its
/// token is the raw literal, quotes included.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let string = string_lit("\"'");
///
/// let node = string.parse(r#""tab\there""#).unwrap();
/// assert_eq!(node.value_ref::<String>().map(String::as_str), Some("tab\there"));
///
/// let node = string.parse(r"'it\'s'").unwrap();
/// assert_eq!(node.value_ref::<String>().map(String::as_str), Some("it's"));
///
/// assert_eq!(string.parse(r#""nope"#).unwrap_err().to_string(), "offset 5: expected \"");
/// ```
pub fn string_lit(quotes: impl Into<Cow<'static, str>>) -> StringLit {
    StringLit {
        quotes: quotes.into(),
    }
}

/// See [`number_lit`].
#[derive(Copy, Clone, Debug)]
pub struct NumberLit;

impl Parser for NumberLit {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        let rest = state.remaining();
        let unsigned = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return mismatched(state, before, "number");
        }
        let len = match lexical::parse_partial::<f64, _>(rest.as_bytes()) {
            Ok((_, len)) if len > 0 => len,
            _ => return mismatched(state, before, "number"),
        };
        let text = &rest[..len];
        let integral = text.bytes().all(|b| b.is_ascii_digit() || b == b'+' || b == b'-');
        let value = match lexical::parse::<i64, _>(text) {
            Ok(int) if integral => Value::new(int),
            _ => match lexical::parse::<f64, _>(text) {
                Ok(float) => Value::new(float),
                Err(_) => return mismatched(state, before, "number"),
            },
        };
        matched(state, node, len);
        node.value = Some(value);
    }
}

/// A parser that accepts a decimal number with an optional sign, fraction and exponent.
///
/// The node's value is an [`i64`] if the literal is a whole number that fits in one, and an [`f64`] otherwise.
///
/// # Examples
///
/// ```
/// # use parsify::prelude::*;
/// let number = number_lit();
///
/// assert_eq!(number.parse("-42").unwrap().value_ref::<i64>(), Some(&-42));
/// assert_eq!(number.parse("6.02e23").unwrap().value_ref::<f64>(), Some(&6.02e23));
/// assert!(number.parse("abc").is_err());
/// ```
pub fn number_lit() -> NumberLit {
    NumberLit
}

/// See [`ident`].
#[derive(Copy, Clone, Debug)]
pub struct Ident;

impl Parser for Ident {
    fn go<'a>(&self, state: &mut State<'a>, node: &mut Node<'a>) {
        let before = state.pos();
        state.skip_whitespace();
        let rest = state.remaining();
        let mut iter = rest.char_indices();
        match iter.next() {
            Some((_, c)) if c == '_' || unicode_ident::is_xid_start(c) => {}
            _ => return mismatched(state, before, "identifier"),
        }
        let len = iter
            .find(|(_, c)| !unicode_ident::is_xid_continue(*c))
            .map_or(rest.len(), |(i, _)| i);
        matched(state, node, len);
    }
}

/// A parser that accepts a Unicode identifier: an XID_Start character or `_`, followed by any number of
/// XID_Continue characters.
///
/// Keywords are not excluded. Use [`any`] with the keyword literals first if they must be distinguished.
pub fn ident() -> Ident {
    Ident
}
