//! Parser combinators over a string cursor.
//!
//! A parser is anything implementing [`Parser`]: given the input, it either
//! produces a [`ParseResult`] (a value plus the unconsumed remainder) or
//! `None` for "no match". Every closure of shape
//! `Fn(&'a str) -> Option<ParseResult<'a, T>>` is a parser, so the
//! combinators in [`combinators`] are plain functions returning closures.
//!
//! Parsers carry no mutable state and retry only from the position they
//! were given; there is no memoization. That is enough for the flat,
//! prefix-driven grammar of query segments.
//!
//! # Example
//!
//! ```
//! use slashq::parser::{literal, ret, Parser};
//!
//! let sign = literal("-", -1i64).or(ret(1i64));
//!
//! let negative = sign.parse("-42").unwrap();
//! assert_eq!(negative.value, -1);
//! assert_eq!(negative.remaining, "42");
//!
//! let positive = sign.parse("42").unwrap();
//! assert_eq!(positive.value, 1);
//! assert_eq!(positive.remaining, "42");
//! ```

mod combinators;

pub use combinators::{
    end, fail, item, literal, literal_ignore_case, optional, or, or_when, preceded, recognize,
    repeat, ret, satisfy, select, select_many, terminated, then, verify, when,
};

/// A parsed value and the input left after parsing it.
///
/// `remaining` always borrows a suffix of the input the parser was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseResult<'a, T> {
    pub value: T,
    pub remaining: &'a str,
}

impl<'a, T> ParseResult<'a, T> {
    pub fn new(value: T, remaining: &'a str) -> Self {
        ParseResult { value, remaining }
    }

    /// Maps the value, keeping the remainder.
    pub fn map<U, F>(self, f: F) -> ParseResult<'a, U>
    where
        F: FnOnce(T) -> U,
    {
        ParseResult {
            value: f(self.value),
            remaining: self.remaining,
        }
    }
}

/// A parser producing values of type `T` from `&'a str` input.
///
/// The provided methods mirror the free combinators and box their result,
/// which keeps chains such as `a.or(b).select(f)` nameable.
pub trait Parser<'a, T> {
    /// Runs the parser. `None` means no match.
    fn parse(&self, input: &'a str) -> Option<ParseResult<'a, T>>;

    /// Erases the concrete parser type.
    fn boxed(self) -> BoxedParser<'a, T>
    where
        Self: Sized + 'a,
    {
        BoxedParser::new(self)
    }

    /// See [`then`].
    fn then<U, Q, F>(self, f: F) -> BoxedParser<'a, U>
    where
        Self: Sized + 'a,
        T: 'a,
        U: 'a,
        Q: Parser<'a, U> + 'a,
        F: Fn(T) -> Q + 'a,
    {
        BoxedParser::new(combinators::then(self, f))
    }

    /// See [`or`].
    fn or<Q>(self, other: Q) -> BoxedParser<'a, T>
    where
        Self: Sized + 'a,
        T: 'a,
        Q: Parser<'a, T> + 'a,
    {
        BoxedParser::new(combinators::or(self, other))
    }

    /// See [`verify`].
    fn verify<F>(self, predicate: F) -> BoxedParser<'a, T>
    where
        Self: Sized + 'a,
        T: 'a,
        F: Fn(&T) -> bool + 'a,
    {
        BoxedParser::new(combinators::verify(self, predicate))
    }

    /// See [`select`].
    fn select<U, F>(self, f: F) -> BoxedParser<'a, U>
    where
        Self: Sized + 'a,
        T: 'a,
        U: 'a,
        F: Fn(T) -> U + 'a,
    {
        BoxedParser::new(combinators::select(self, f))
    }

    /// See [`select_many`].
    fn select_many<U, V, Q, F, G>(self, f: F, project: G) -> BoxedParser<'a, V>
    where
        Self: Sized + 'a,
        T: 'a,
        U: 'a,
        V: 'a,
        Q: Parser<'a, U> + 'a,
        F: Fn(&T) -> Q + 'a,
        G: Fn(T, U) -> V + 'a,
    {
        BoxedParser::new(combinators::select_many(self, f, project))
    }

    /// See [`repeat`].
    fn repeat(self) -> BoxedParser<'a, Vec<T>>
    where
        Self: Sized + 'a,
        T: 'a,
    {
        BoxedParser::new(combinators::repeat(self))
    }

    /// See [`or_when`].
    fn or_when<C, Q>(self, condition: C, other: Q) -> BoxedParser<'a, T>
    where
        Self: Sized + 'a,
        T: 'a,
        C: Fn(&str) -> bool + 'a,
        Q: Parser<'a, T> + 'a,
    {
        BoxedParser::new(combinators::or_when(self, condition, other))
    }
}

impl<'a, T, F> Parser<'a, T> for F
where
    F: Fn(&'a str) -> Option<ParseResult<'a, T>>,
{
    fn parse(&self, input: &'a str) -> Option<ParseResult<'a, T>> {
        self(input)
    }
}

/// A type-erased parser.
///
/// Needed wherever parsers of different concrete types must share one type,
/// such as the branches of a dispatch table.
pub struct BoxedParser<'a, T> {
    parser: Box<dyn Parser<'a, T> + 'a>,
}

impl<'a, T> BoxedParser<'a, T> {
    pub fn new<P>(parser: P) -> Self
    where
        P: Parser<'a, T> + 'a,
    {
        BoxedParser {
            parser: Box::new(parser),
        }
    }
}

impl<'a, T> Parser<'a, T> for BoxedParser<'a, T> {
    fn parse(&self, input: &'a str) -> Option<ParseResult<'a, T>> {
        self.parser.parse(input)
    }
}

impl<T> std::fmt::Debug for BoxedParser<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxedParser")
    }
}
