//! Compiles query strings into operation sequences.
//!
//! A query is a run of segments separated by `/`. Each segment goes through
//! one prioritized dispatch table (page, skip, take, sort, then filter as the
//! default) and yields at most one [`QueryOperation`].
//!
//! Failures come in two tiers. A segment whose shape is wrong (`skip-x`, a
//! filter with an unknown comparator, ...) is dropped and compilation goes
//! on. A segment that is well-formed but semantically invalid (`page-0`,
//! `sort-`) aborts the whole compilation with a [`QueryError`](crate::QueryError).

use tracing::{debug, trace};

use crate::error::Result;
use crate::operation::{
    Comparator, FilterSpec, FilterValue, Limit, OperationSequence, PageSpec, QueryOperation,
    SortSpec,
};
use crate::parser::{
    end, item, literal_ignore_case, optional, preceded, recognize, repeat, satisfy, select_many,
    terminated, when, BoxedParser, Parser,
};
use crate::syntax::QuerySyntax;

/// Outcome of decoding one segment: an operation, a dropped segment, or a
/// fatal error.
type Step = Result<Option<QueryOperation>>;

/// Compiles query strings using a fixed [`QuerySyntax`].
///
/// # Example
///
/// ```
/// use slashq::{Limit, QueryCompiler, QueryOperation, QuerySyntax};
///
/// let compiler = QueryCompiler::new(QuerySyntax::default());
/// let operations = compiler.compile("/sort-desc-age/skip-x/take-5/").unwrap();
///
/// // `skip-x` is malformed and dropped.
/// assert_eq!(operations.len(), 2);
/// assert_eq!(operations.operations()[1], QueryOperation::Take(Limit::Count(5)));
///
/// assert!(compiler.compile("page-0").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    syntax: QuerySyntax,
}

impl QueryCompiler {
    /// Creates a compiler. See [`QuerySyntax::validate`] for checking a
    /// host-supplied syntax first.
    pub fn new(syntax: QuerySyntax) -> Self {
        QueryCompiler { syntax }
    }

    pub fn syntax(&self) -> &QuerySyntax {
        &self.syntax
    }

    /// Compiles `query` into the operations its segments describe, in order.
    ///
    /// Empty input and runs of separators produce no operations. Malformed
    /// segments are skipped; the first semantically invalid segment is
    /// returned as an error.
    pub fn compile(&self, query: &str) -> Result<OperationSequence> {
        let steps = self
            .grammar()
            .parse(query)
            .map(|parsed| parsed.value)
            .unwrap_or_default();

        let operations = steps
            .into_iter()
            .filter_map(Result::transpose)
            .collect::<Result<OperationSequence>>()?;

        trace!(query, operations = operations.len(), "compiled query");
        Ok(operations)
    }

    fn grammar<'a>(&'a self) -> BoxedParser<'a, Vec<Step>> {
        let syntax = &self.syntax;
        let separator = syntax.separator;
        let table = terminated(segment_table(syntax), end());

        let separators = recognize(repeat(satisfy(move |c: &char| *c == separator)))
            .verify(|run: &&'a str| !run.is_empty())
            .select(|_: &'a str| -> Step { Ok(None) });

        let segment = recognize(repeat(satisfy(move |c: &char| *c != separator)))
            .verify(|text: &&'a str| !text.is_empty())
            .select(move |text: &'a str| -> Step {
                match table.parse(text) {
                    Some(decoded) => decoded.value,
                    None => {
                        debug!(segment = text, "dropping unrecognized segment");
                        Ok(None)
                    }
                }
            });

        separators.or(segment).repeat()
    }
}

/// The per-segment dispatch table. Order matters: a segment starting with a
/// known prefix never falls through to the filter decoder.
fn segment_table<'a>(syntax: &'a QuerySyntax) -> BoxedParser<'a, Step> {
    when(prefixed(&syntax.page_prefix), page(syntax))
        .or_when(prefixed(&syntax.skip_prefix), skip(syntax))
        .or_when(prefixed(&syntax.take_prefix), take(syntax))
        .or_when(prefixed(&syntax.sort_prefix), sort(syntax))
        .or_when(|_: &str| true, filter(syntax))
}

fn prefixed<'a>(prefix: &'a str) -> impl Fn(&str) -> bool + 'a {
    move |input: &str| {
        input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }
}

/// Consumes the rest of the input.
fn rest<'a>() -> impl Parser<'a, &'a str> {
    recognize(repeat(item()))
}

/// Text up to the next inner separator (possibly empty).
fn part<'a>(inner: char) -> impl Parser<'a, &'a str> {
    recognize(repeat(satisfy(move |c: &char| *c != inner)))
}

/// Splits the rest of the input on the inner separator.
fn parts<'a>(inner: char) -> impl Parser<'a, Vec<&'a str>> {
    select_many(
        part(inner),
        move |_: &&'a str| repeat(preceded(satisfy(move |c: &char| *c == inner), part(inner))),
        |first: &'a str, mut others: Vec<&'a str>| {
            others.insert(0, first);
            others
        },
    )
}

fn page<'a>(syntax: &'a QuerySyntax) -> impl Parser<'a, Step> {
    preceded(
        literal_ignore_case(&syntax.page_prefix, ()),
        parts(syntax.inner_separator),
    )
    .select(move |parts: Vec<&'a str>| decode_page(&parts, syntax))
}

fn decode_page(parts: &[&str], syntax: &QuerySyntax) -> Step {
    let (number, size) = match parts {
        [number] => (*number, None),
        [number, size] => (*number, Some(*size)),
        _ => {
            debug!(?parts, "dropping page segment with too many parts");
            return Ok(None);
        }
    };

    let default_size = i64::try_from(syntax.default_page_size).unwrap_or(i64::MAX);
    let number = number.parse::<i64>().unwrap_or(1);
    let size = size
        .and_then(|size| size.parse::<i64>().ok())
        .unwrap_or(default_size);

    PageSpec::new(number, size).map(|page| Some(QueryOperation::Page(page)))
}

fn skip<'a>(syntax: &'a QuerySyntax) -> impl Parser<'a, Step> {
    preceded(literal_ignore_case(&syntax.skip_prefix, ()), rest()).select(
        |count: &'a str| -> Step {
            match count.parse::<usize>() {
                Ok(count) => Ok(Some(QueryOperation::Skip(count))),
                Err(_) => {
                    debug!(count, "dropping skip segment with a non-numeric count");
                    Ok(None)
                }
            }
        },
    )
}

fn take<'a>(syntax: &'a QuerySyntax) -> impl Parser<'a, Step> {
    preceded(literal_ignore_case(&syntax.take_prefix, ()), rest()).select(
        move |limit: &'a str| -> Step {
            if let Ok(count) = limit.parse::<usize>() {
                return Ok(Some(QueryOperation::Take(Limit::Count(count))));
            }
            if !limit.eq_ignore_ascii_case(&syntax.take_all) {
                debug!(limit, "treating non-numeric take limit as unbounded");
            }
            Ok(Some(QueryOperation::Take(Limit::Unbounded)))
        },
    )
}

fn sort<'a>(syntax: &'a QuerySyntax) -> impl Parser<'a, Step> {
    preceded(
        literal_ignore_case(&syntax.sort_prefix, ()),
        select_many(
            optional(literal_ignore_case(&syntax.descending_prefix, ())),
            |_: &Option<()>| rest(),
            move |descending: Option<()>, columns: &'a str| {
                let columns = columns
                    .split(syntax.list_delimiter)
                    .filter(|column| !column.is_empty());
                SortSpec::new(columns, descending.is_some())
                    .map(|sort| Some(QueryOperation::Sort(sort)))
            },
        ),
    )
}

fn filter<'a>(syntax: &'a QuerySyntax) -> impl Parser<'a, Step> {
    parts(syntax.inner_separator)
        .select(move |parts: Vec<&'a str>| -> Step { Ok(decode_filter(&parts, syntax)) })
}

fn decode_filter(parts: &[&str], syntax: &QuerySyntax) -> Option<QueryOperation> {
    let [field, comparator, value] = parts else {
        debug!(?parts, "dropping filter segment without exactly three parts");
        return None;
    };
    if field.is_empty() {
        debug!(?parts, "dropping filter segment without a field name");
        return None;
    }
    let Some(comparator) = Comparator::from_token(comparator) else {
        debug!(comparator = *comparator, "dropping filter segment with an unknown comparator");
        return None;
    };

    let value = if value.eq_ignore_ascii_case(&syntax.null_token) {
        FilterValue::Null
    } else {
        FilterValue::Text(value.to_string())
    };
    Some(QueryOperation::Filter(FilterSpec::new(*field, comparator, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    fn compile(query: &str) -> Result<OperationSequence> {
        QueryCompiler::default().compile(query)
    }

    fn single(query: &str) -> QueryOperation {
        let operations = compile(query).unwrap();
        assert_eq!(operations.len(), 1, "expected one operation for {query}");
        operations.operations()[0].clone()
    }

    #[test]
    fn parts_splits_on_inner_separator() {
        let result = parts('-').parse("a-b--c").unwrap();
        assert_eq!(result.value, vec!["a", "b", "", "c"]);
        assert_eq!(result.remaining, "");

        assert_eq!(parts('-').parse("").unwrap().value, vec![""]);
    }

    #[test]
    fn prefix_check_ignores_case() {
        let check = prefixed("sort-");
        assert!(check("SORT-name"));
        assert!(check("sort-"));
        assert!(!check("sor"));
        assert!(!check("skip-1"));
    }

    #[test]
    fn page_with_and_without_size() {
        let page = single("page-2-8");
        assert_eq!(page, QueryOperation::Page(PageSpec::new(2, 8).unwrap()));

        let page = single("page-3");
        assert_eq!(page, QueryOperation::Page(PageSpec::new(3, 10).unwrap()));
    }

    #[test]
    fn page_falls_back_on_unparsable_parts() {
        assert_eq!(
            single("page-x"),
            QueryOperation::Page(PageSpec::new(1, 10).unwrap())
        );
        assert_eq!(
            single("page-2-x"),
            QueryOperation::Page(PageSpec::new(2, 10).unwrap())
        );
    }

    #[test]
    fn page_with_too_many_parts_is_dropped() {
        assert!(compile("page-1-2-3").unwrap().is_empty());
    }

    #[test]
    fn invalid_page_is_fatal() {
        assert_eq!(compile("page-0"), Err(QueryError::InvalidPageNumber(0)));
        assert_eq!(compile("page-1-0"), Err(QueryError::InvalidPageSize(0)));
        assert_eq!(
            compile("skip-1/page-1-0/take-2"),
            Err(QueryError::InvalidPageSize(0))
        );
    }

    #[test]
    fn skip_needs_a_count() {
        assert_eq!(single("skip-5"), QueryOperation::Skip(5));
        assert!(compile("skip-x").unwrap().is_empty());
        assert!(compile("skip--1").unwrap().is_empty());
        assert!(compile("skip-").unwrap().is_empty());
    }

    #[test]
    fn take_count_all_and_garbage() {
        assert_eq!(single("take-7"), QueryOperation::Take(Limit::Count(7)));
        assert_eq!(single("take-all"), QueryOperation::Take(Limit::Unbounded));
        assert_eq!(single("take-ALL"), QueryOperation::Take(Limit::Unbounded));
        assert_eq!(single("take-lots"), QueryOperation::Take(Limit::Unbounded));
    }

    #[test]
    fn sort_columns_and_direction() {
        let QueryOperation::Sort(sort) = single("sort-desc-Name,age") else {
            panic!("expected a sort");
        };
        assert!(sort.is_descending());
        assert_eq!(sort.columns(), ["name", "age"]);

        let QueryOperation::Sort(sort) = single("sort-a,,b,") else {
            panic!("expected a sort");
        };
        assert!(!sort.is_descending());
        assert_eq!(sort.columns(), ["a", "b"]);
    }

    #[test]
    fn sort_without_columns_is_fatal() {
        assert_eq!(compile("sort-"), Err(QueryError::EmptySort));
        assert_eq!(compile("sort-desc-"), Err(QueryError::EmptySort));
        assert_eq!(compile("sort-,,"), Err(QueryError::EmptySort));
    }

    #[test]
    fn filter_is_lower_cased() {
        let QueryOperation::Filter(filter) = single("Name-Equals-Bob") else {
            panic!("expected a filter");
        };
        assert_eq!(filter.field, "name");
        assert_eq!(filter.value, FilterValue::Text("bob".to_string()));
    }

    #[test]
    fn filter_null_token() {
        assert_eq!(
            single("nickname-not-NULL"),
            QueryOperation::Filter(FilterSpec::new(
                "nickname",
                Comparator::Not,
                FilterValue::Null
            ))
        );
    }

    #[test]
    fn malformed_filters_are_dropped() {
        assert!(compile("name-equals").unwrap().is_empty());
        assert!(compile("name-equals-a-b").unwrap().is_empty());
        assert!(compile("name-resembles-a").unwrap().is_empty());
        assert!(compile("-equals-a").unwrap().is_empty());
        assert!(compile("justaword").unwrap().is_empty());
    }

    #[test]
    fn prefixes_ignore_case() {
        assert_eq!(single("SKIP-3"), QueryOperation::Skip(3));
        assert_eq!(
            single("Page-2"),
            QueryOperation::Page(PageSpec::new(2, 10).unwrap())
        );
    }

    #[test]
    fn custom_syntax() {
        let syntax = QuerySyntax {
            separator: ';',
            inner_separator: ':',
            skip_prefix: "offset:".to_string(),
            ..QuerySyntax::default()
        };
        let compiler = QueryCompiler::new(syntax);
        let operations = compiler.compile(";offset:4;age:lessthan:30").unwrap();
        assert_eq!(
            operations.operations(),
            [
                QueryOperation::Skip(4),
                QueryOperation::Filter(FilterSpec::new("age", Comparator::LessThan, "30")),
            ]
        );
    }
}
