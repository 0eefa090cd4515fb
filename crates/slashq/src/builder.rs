//! Fluent construction of operation sequences.
//!
//! [`QueryBuilder`] builds the same [`OperationSequence`] the compiler would
//! produce for the equivalent query string, which makes it the way to
//! generate query strings: build, then [`serialize`](crate::serialize).

use std::fmt::Display;

use crate::error::Result;
use crate::operation::{
    Comparator, FilterSpec, FilterValue, Limit, OperationSequence, PageSpec, QueryOperation,
    SortSpec,
};

/// Builds an [`OperationSequence`] one operation at a time.
///
/// Operations keep the order they are added in. Steps whose construction
/// can fail (`page`, `sort_*`) return a [`Result`].
///
/// Filter values are stored lower-cased. A few of them have no
/// query string form and change meaning once serialized and compiled again:
///
/// - a value containing the separator or inner separator (`/`, `-`), such
///   as a negative number, splits the segment and the filter is dropped;
/// - the text `null` reads back as [`FilterValue::Null`]. Use
///   [`filter_null`](Self::filter_null) to mean absence.
///
/// # Example
///
/// ```
/// use slashq::{serialize, QueryBuilder, QuerySyntax};
///
/// let operations = QueryBuilder::new()
///     .greater_than("age", 30)
///     .filter_null("nickname")
///     .sort_desc(["age", "name"])?
///     .page(2, 25)?
///     .build();
///
/// assert_eq!(
///     serialize(&operations, &QuerySyntax::default()),
///     "/age-greaterthan-30/nickname-equals-null/sort-desc-age,name/page-2-25/"
/// );
/// # Ok::<(), slashq::QueryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    operations: OperationSequence,
}

impl QueryBuilder {
    /// Creates a builder with no operations.
    pub fn new() -> Self {
        QueryBuilder::default()
    }

    fn push(mut self, operation: QueryOperation) -> Self {
        self.operations.push(operation);
        self
    }

    // ========================================================================
    // Ordering and paging
    // ========================================================================

    /// Sorts ascending by `columns`, first column first.
    pub fn sort_asc<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sort = SortSpec::new(columns, false)?;
        Ok(self.push(QueryOperation::Sort(sort)))
    }

    /// Sorts descending by `columns`, first column first.
    pub fn sort_desc<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sort = SortSpec::new(columns, true)?;
        Ok(self.push(QueryOperation::Sort(sort)))
    }

    pub fn skip(self, count: usize) -> Self {
        self.push(QueryOperation::Skip(count))
    }

    pub fn take(self, count: usize) -> Self {
        self.push(QueryOperation::Take(Limit::Count(count)))
    }

    /// Adds `take-all`, which leaves the collection unchanged.
    pub fn take_all(self) -> Self {
        self.push(QueryOperation::Take(Limit::Unbounded))
    }

    /// Selects page `number` (1-based) of `size` records.
    pub fn page(self, number: i64, size: i64) -> Result<Self> {
        let page = PageSpec::new(number, size)?;
        Ok(self.push(QueryOperation::Page(page)))
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Adds a filter. The field name and text value are lower-cased.
    pub fn filter(
        self,
        field: &str,
        comparator: Comparator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.push(QueryOperation::Filter(FilterSpec::new(
            field, comparator, value,
        )))
    }

    /// Keeps records where `field` is absent.
    pub fn filter_null(self, field: &str) -> Self {
        self.filter(field, Comparator::Equals, FilterValue::Null)
    }

    /// Keeps records where `field` is present.
    pub fn filter_not_null(self, field: &str) -> Self {
        self.filter(field, Comparator::Not, FilterValue::Null)
    }

    pub fn equals(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::Equals, value.to_string())
    }

    pub fn not(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::Not, value.to_string())
    }

    /// Substring match on the field's text form.
    pub fn like(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::Like, value.to_string())
    }

    pub fn greater_than(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::GreaterThan, value.to_string())
    }

    pub fn greater_than_equal(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::GreaterThanEqual, value.to_string())
    }

    pub fn less_than(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::LessThan, value.to_string())
    }

    pub fn less_than_equal(self, field: &str, value: impl Display) -> Self {
        self.filter(field, Comparator::LessThanEqual, value.to_string())
    }

    // ========================================================================
    // Finishing
    // ========================================================================

    pub fn build(self) -> OperationSequence {
        self.operations
    }
}
