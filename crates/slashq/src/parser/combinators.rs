//! Primitive parsers and the combinators that compose them.

use super::{ParseResult, Parser};

// ============================================================================
// Primitives
// ============================================================================

/// Consumes a single character. Fails on empty input.
pub fn item<'a>() -> impl Parser<'a, char> {
    |input: &'a str| {
        let mut chars = input.chars();
        let c = chars.next()?;
        Some(ParseResult::new(c, chars.as_str()))
    }
}

/// Succeeds with `value` without consuming input.
pub fn ret<'a, T>(value: T) -> impl Parser<'a, T>
where
    T: Clone,
{
    move |input: &'a str| Some(ParseResult::new(value.clone(), input))
}

/// Never matches.
pub fn fail<'a, T>() -> impl Parser<'a, T> {
    |_: &'a str| -> Option<ParseResult<'a, T>> { None }
}

/// Matches only the empty input.
pub fn end<'a>() -> impl Parser<'a, ()> {
    when(str::is_empty, ret(()))
}

// ============================================================================
// Combinators
// ============================================================================

/// Runs `parser`, feeds its value to `f` and runs the resulting parser on
/// the remainder.
pub fn then<'a, P, F, Q, A, B>(parser: P, f: F) -> impl Parser<'a, B>
where
    P: Parser<'a, A>,
    F: Fn(A) -> Q,
    Q: Parser<'a, B>,
{
    move |input: &'a str| {
        let first = parser.parse(input)?;
        f(first.value).parse(first.remaining)
    }
}

/// Ordered choice. `second` runs on the original input, so a failed
/// `first` never leaks partial consumption.
pub fn or<'a, P, Q, T>(first: P, second: Q) -> impl Parser<'a, T>
where
    P: Parser<'a, T>,
    Q: Parser<'a, T>,
{
    move |input: &'a str| first.parse(input).or_else(|| second.parse(input))
}

/// Keeps a successful parse only when `predicate` accepts its value.
pub fn verify<'a, P, F, T>(parser: P, predicate: F) -> impl Parser<'a, T>
where
    P: Parser<'a, T>,
    F: Fn(&T) -> bool,
{
    move |input: &'a str| {
        parser
            .parse(input)
            .filter(|result| predicate(&result.value))
    }
}

/// Maps the parsed value through `f`.
pub fn select<'a, P, F, A, B>(parser: P, f: F) -> impl Parser<'a, B>
where
    P: Parser<'a, A>,
    F: Fn(A) -> B,
{
    move |input: &'a str| parser.parse(input).map(|result| result.map(&f))
}

/// Parses `A`, uses it to pick a parser for `B`, and combines both.
pub fn select_many<'a, P, F, Q, G, A, B, C>(parser: P, f: F, project: G) -> impl Parser<'a, C>
where
    P: Parser<'a, A>,
    F: Fn(&A) -> Q,
    Q: Parser<'a, B>,
    G: Fn(A, B) -> C,
{
    move |input: &'a str| {
        let first = parser.parse(input)?;
        let second = f(&first.value).parse(first.remaining)?;
        Some(ParseResult::new(
            project(first.value, second.value),
            second.remaining,
        ))
    }
}

/// Applies `parser` until it fails, the input runs out, or a match
/// consumes nothing.
///
/// Always succeeds. Whatever could not be parsed is left as the remainder;
/// it is not an error.
pub fn repeat<'a, P, T>(parser: P) -> impl Parser<'a, Vec<T>>
where
    P: Parser<'a, T>,
{
    move |mut input: &'a str| {
        let mut values = Vec::new();
        while !input.is_empty() {
            match parser.parse(input) {
                Some(next) if next.remaining.len() < input.len() => {
                    values.push(next.value);
                    input = next.remaining;
                }
                _ => break,
            }
        }
        Some(ParseResult::new(values, input))
    }
}

/// Recognizes `text` character by character and yields `value`.
///
/// An empty `text` behaves like [`ret`].
pub fn literal<'a, T>(text: &str, value: T) -> impl Parser<'a, T>
where
    T: Clone,
{
    chars_matching(text.to_string(), value, |expected, actual| expected == actual)
}

/// Like [`literal`], ignoring ASCII case.
pub fn literal_ignore_case<'a, T>(text: &str, value: T) -> impl Parser<'a, T>
where
    T: Clone,
{
    chars_matching(text.to_string(), value, |expected, actual| {
        expected.eq_ignore_ascii_case(&actual)
    })
}

fn chars_matching<'a, T, E>(text: String, value: T, eq: E) -> impl Parser<'a, T>
where
    T: Clone,
    E: Fn(char, char) -> bool,
{
    move |input: &'a str| {
        let mut remaining = input;
        for expected in text.chars() {
            remaining = satisfy(|c: &char| eq(expected, *c))
                .parse(remaining)?
                .remaining;
        }
        Some(ParseResult::new(value.clone(), remaining))
    }
}

/// Only attempts `parser` when `condition` holds for the input.
pub fn when<'a, C, P, T>(condition: C, parser: P) -> impl Parser<'a, T>
where
    C: Fn(&str) -> bool,
    P: Parser<'a, T>,
{
    move |input: &'a str| {
        if condition(input) {
            parser.parse(input)
        } else {
            None
        }
    }
}

/// Tries `first`; on failure tries `second` if `condition` holds for the
/// original input.
///
/// Chaining `or_when` builds a prioritized dispatch table; a condition of
/// `|_| true` makes an unconditional default branch.
pub fn or_when<'a, P, C, Q, T>(first: P, condition: C, second: Q) -> impl Parser<'a, T>
where
    P: Parser<'a, T>,
    C: Fn(&str) -> bool,
    Q: Parser<'a, T>,
{
    move |input: &'a str| {
        first.parse(input).or_else(|| {
            if condition(input) {
                second.parse(input)
            } else {
                None
            }
        })
    }
}

// ============================================================================
// Conveniences
// ============================================================================

/// Consumes one character accepted by `predicate`.
pub fn satisfy<'a, F>(predicate: F) -> impl Parser<'a, char>
where
    F: Fn(&char) -> bool,
{
    verify(item(), predicate)
}

/// Yields the slice of input consumed by `parser` instead of its value.
pub fn recognize<'a, P, T>(parser: P) -> impl Parser<'a, &'a str>
where
    P: Parser<'a, T>,
{
    move |input: &'a str| {
        let result = parser.parse(input)?;
        let consumed = input.len() - result.remaining.len();
        Some(ParseResult::new(&input[..consumed], result.remaining))
    }
}

/// Yields `Some` when `parser` matches and `None` (consuming nothing)
/// otherwise. Never fails.
pub fn optional<'a, P, T>(parser: P) -> impl Parser<'a, Option<T>>
where
    P: Parser<'a, T>,
{
    move |input: &'a str| {
        Some(match parser.parse(input) {
            Some(result) => result.map(Some),
            None => ParseResult::new(None, input),
        })
    }
}

/// Runs `prefix` then `parser`, keeping the value of `parser`.
pub fn preceded<'a, P, Q, A, B>(prefix: P, parser: Q) -> impl Parser<'a, B>
where
    P: Parser<'a, A>,
    Q: Parser<'a, B>,
{
    move |input: &'a str| {
        let first = prefix.parse(input)?;
        parser.parse(first.remaining)
    }
}

/// Runs `parser` then `suffix`, keeping the value of `parser`.
pub fn terminated<'a, P, Q, A, B>(parser: P, suffix: Q) -> impl Parser<'a, A>
where
    P: Parser<'a, A>,
    Q: Parser<'a, B>,
{
    move |input: &'a str| {
        let result = parser.parse(input)?;
        let rest = suffix.parse(result.remaining)?;
        Some(ParseResult::new(result.value, rest.remaining))
    }
}
