//! Query operations and their canonical string forms.
//!
//! A compiled query is an [`OperationSequence`]: the operations in the order
//! their segments appeared. Constructors that can fail ([`PageSpec::new`],
//! [`SortSpec::new`]) enforce the invariants up front, so every value of
//! these types is valid.

use std::fmt;

use crate::error::{QueryError, Result};
use crate::syntax::QuerySyntax;

/// Filter comparator.
///
/// The wire tokens are the lower-case names: `equals`, `like`,
/// `greaterthan`, `greaterthanequal`, `lessthan`, `lessthanequal`, `not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Equal.
    Equals,
    /// Field rendered as text contains the value.
    Like,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanEqual,
    /// Not equal.
    Not,
}

impl Comparator {
    pub const ALL: [Comparator; 7] = [
        Comparator::Equals,
        Comparator::Like,
        Comparator::GreaterThan,
        Comparator::GreaterThanEqual,
        Comparator::LessThan,
        Comparator::LessThanEqual,
        Comparator::Not,
    ];

    /// Looks up a comparator by its wire token, ignoring ASCII case.
    ///
    /// The whole token must match; `greaterthanequalx` is not a comparator.
    pub fn from_token(token: &str) -> Option<Comparator> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.token().eq_ignore_ascii_case(token))
    }

    /// Returns the wire token of this comparator.
    pub fn token(self) -> &'static str {
        match self {
            Comparator::Equals => "equals",
            Comparator::Like => "like",
            Comparator::GreaterThan => "greaterthan",
            Comparator::GreaterThanEqual => "greaterthanequal",
            Comparator::LessThan => "lessthan",
            Comparator::LessThanEqual => "lessthanequal",
            Comparator::Not => "not",
        }
    }

    /// Returns `true` for the greater/less-than family, which needs an
    /// ordered field.
    pub fn is_ordinal(self) -> bool {
        matches!(
            self,
            Comparator::GreaterThan
                | Comparator::GreaterThanEqual
                | Comparator::LessThan
                | Comparator::LessThanEqual
        )
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Right-hand side of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue {
    /// Raw text, converted to the field's type at execution.
    Text(String),
    /// Compares against absence rather than a value.
    Null,
}

impl FilterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(text) => Some(text),
            FilterValue::Null => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

/// Limit of a take operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    Count(usize),
    /// No limit: `take-all`.
    Unbounded,
}

/// Sort over one or more columns, all in the same direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    columns: Vec<String>,
    descending: bool,
}

impl SortSpec {
    /// Creates a sort. Column names are lower-cased.
    ///
    /// Fails with [`QueryError::EmptySort`] when `columns` is empty.
    pub fn new<I, S>(columns: I, descending: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|column| column.as_ref().to_lowercase())
            .collect();
        if columns.is_empty() {
            return Err(QueryError::EmptySort);
        }
        Ok(SortSpec {
            columns,
            descending,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }
}

/// A page of results, stored as its skip/take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSpec {
    skip: usize,
    take: usize,
}

impl PageSpec {
    /// Creates page `page_number` (1-based) of `page_size` records.
    ///
    /// # Example
    ///
    /// ```
    /// use slashq::PageSpec;
    ///
    /// let page = PageSpec::new(3, 20).unwrap();
    /// assert_eq!(page.skip(), 40);
    /// assert_eq!(page.take(), 20);
    /// assert_eq!(page.page_number(), 3);
    ///
    /// assert!(PageSpec::new(0, 20).is_err());
    /// assert!(PageSpec::new(1, 0).is_err());
    /// ```
    pub fn new(page_number: i64, page_size: i64) -> Result<Self> {
        if page_size < 1 {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        if page_number < 1 {
            return Err(QueryError::InvalidPageNumber(page_number));
        }
        let take = usize::try_from(page_size).map_err(|_| QueryError::InvalidPageSize(page_size))?;
        let skip = usize::try_from(page_number - 1)
            .ok()
            .and_then(|previous| previous.checked_mul(take))
            .ok_or(QueryError::InvalidPageNumber(page_number))?;
        Ok(PageSpec { skip, take })
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn take(&self) -> usize {
        self.take
    }

    /// Recomputes the 1-based page number as `skip / take + 1`.
    pub fn page_number(&self) -> usize {
        self.skip / self.take + 1
    }
}

/// A filter on one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    pub field: String,
    pub comparator: Comparator,
    pub value: FilterValue,
}

impl FilterSpec {
    /// Creates a filter in canonical form: the field name and any text
    /// value are lower-cased, matching how query strings are serialized.
    /// Text comparisons fold case, so this loses no matches.
    pub fn new(field: impl Into<String>, comparator: Comparator, value: impl Into<FilterValue>) -> Self {
        let value = match value.into() {
            FilterValue::Text(text) => FilterValue::Text(text.to_lowercase()),
            FilterValue::Null => FilterValue::Null,
        };
        FilterSpec {
            field: field.into().to_lowercase(),
            comparator,
            value,
        }
    }
}

/// One step of a compiled query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryOperation {
    Sort(SortSpec),
    Skip(usize),
    Take(Limit),
    Page(PageSpec),
    Filter(FilterSpec),
}

impl QueryOperation {
    /// Renders the canonical form of this operation.
    ///
    /// Rendering does not lower-case; [`serialize`](crate::serialize) does
    /// that for the whole query string.
    pub fn render(&self, syntax: &QuerySyntax) -> String {
        let inner = syntax.inner_separator;
        match self {
            QueryOperation::Sort(sort) => {
                let mut rendered = syntax.sort_prefix.clone();
                if sort.descending {
                    rendered.push_str(&syntax.descending_prefix);
                }
                let delimiter = syntax.list_delimiter.to_string();
                rendered.push_str(&sort.columns.join(&delimiter));
                rendered
            }
            QueryOperation::Skip(count) => format!("{}{count}", syntax.skip_prefix),
            QueryOperation::Take(Limit::Count(count)) => {
                format!("{}{count}", syntax.take_prefix)
            }
            QueryOperation::Take(Limit::Unbounded) => {
                format!("{}{}", syntax.take_prefix, syntax.take_all)
            }
            QueryOperation::Page(page) => {
                let mut rendered = format!("{}{}", syntax.page_prefix, page.page_number());
                if page.take != syntax.default_page_size {
                    rendered.push(inner);
                    rendered.push_str(&page.take.to_string());
                }
                rendered
            }
            QueryOperation::Filter(filter) => {
                let value = match &filter.value {
                    FilterValue::Text(text) => text.as_str(),
                    FilterValue::Null => syntax.null_token.as_str(),
                };
                format!(
                    "{}{inner}{}{inner}{value}",
                    filter.field,
                    filter.comparator.token()
                )
            }
        }
    }
}

impl fmt::Display for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&QuerySyntax::default()))
    }
}

/// Operations in the order they apply.
///
/// Built append-only by the compiler or [`QueryBuilder`](crate::QueryBuilder);
/// there is no way to reorder or remove operations afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OperationSequence {
    operations: Vec<QueryOperation>,
}

impl OperationSequence {
    pub fn new() -> Self {
        OperationSequence::default()
    }

    pub(crate) fn push(&mut self, operation: QueryOperation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[QueryOperation] {
        &self.operations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryOperation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl FromIterator<QueryOperation> for OperationSequence {
    fn from_iter<I: IntoIterator<Item = QueryOperation>>(iter: I) -> Self {
        OperationSequence {
            operations: iter.into_iter().collect(),
        }
    }
}

impl<'s> IntoIterator for &'s OperationSequence {
    type Item = &'s QueryOperation;
    type IntoIter = std::slice::Iter<'s, QueryOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl fmt::Display for OperationSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serializer::serialize(self, &QuerySyntax::default()))
    }
}
