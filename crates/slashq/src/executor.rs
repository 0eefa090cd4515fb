//! Applies compiled operations to a collection.
//!
//! The executor knows nothing about storage. It turns each operation into
//! a call on a [`QueryTarget`]: a filter predicate, a comparator for a
//! stable sort, a skip or a take. Field access goes through a
//! [`FieldResolver`], so the same sequence can run against any record type
//! that has a schema.

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::operation::{Limit, OperationSequence, QueryOperation, SortSpec};
use crate::ordering::{compare_by_keys, Dir, SortKey};
use crate::predicate::Predicate;
use crate::schema::FieldResolver;

/// A collection that query operations can be applied to.
///
/// Each method consumes the target and returns the narrowed or reordered
/// collection. `sort_by` must be stable: records that compare equal keep
/// their relative order.
pub trait QueryTarget<T>: Sized {
    /// Keeps the records for which `predicate` returns `true`.
    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static;

    /// Stable sort by `compare`.
    fn sort_by<C>(self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static;

    /// Drops the first `count` records (all of them if there are fewer).
    fn skip(self, count: usize) -> Self;

    /// Keeps at most the first `count` records.
    fn take(self, count: usize) -> Self;
}

/// Owned rows (`Vec<T>`) or borrowed rows (`Vec<&T>`).
impl<T, B> QueryTarget<T> for Vec<B>
where
    B: Borrow<T>,
{
    fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.retain(|row| predicate(row.borrow()));
        self
    }

    fn sort_by<C>(mut self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        self.as_mut_slice()
            .sort_by(|a, b| compare(a.borrow(), b.borrow()));
        self
    }

    fn skip(mut self, count: usize) -> Self {
        let count = count.min(self.len());
        self.drain(..count);
        self
    }

    fn take(mut self, count: usize) -> Self {
        self.truncate(count);
        self
    }
}

/// A lazily evaluated collection.
///
/// Filters, skips and takes are chained onto the underlying iterator and
/// run only when the result is consumed. Sorting has to see every record,
/// so it collects the rows first.
///
/// # Example
///
/// ```
/// use slashq::{Deferred, FieldKind, Number, QueryCompiler, Executor, Schema, Value};
///
/// let schema = Schema::<u32>::new()
///     .field("n", FieldKind::Number, |n| Value::Number(Number::from(*n)));
/// let operations = QueryCompiler::default()
///     .compile("n-greaterthan-10/take-2")
///     .unwrap();
///
/// let target = Deferred::new(1..u32::MAX);
/// let first: Vec<u32> = Executor::new(&schema).apply(&operations, target).collect();
/// assert_eq!(first, vec![11, 12]);
/// ```
pub struct Deferred<'a, B> {
    rows: Box<dyn Iterator<Item = B> + 'a>,
}

impl<'a, B: 'a> Deferred<'a, B> {
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = B>,
        I::IntoIter: 'a,
    {
        Deferred {
            rows: Box::new(rows.into_iter()),
        }
    }
}

impl<B> Iterator for Deferred<'_, B> {
    type Item = B;

    fn next(&mut self) -> Option<B> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<B> std::fmt::Debug for Deferred<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

impl<'a, T, B> QueryTarget<T> for Deferred<'a, B>
where
    T: 'a,
    B: Borrow<T> + 'a,
{
    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        Deferred::new(self.rows.filter(move |row| predicate(row.borrow())))
    }

    fn sort_by<C>(self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        let mut rows: Vec<B> = self.rows.collect();
        rows.as_mut_slice()
            .sort_by(|a, b| compare(a.borrow(), b.borrow()));
        Deferred::new(rows)
    }

    fn skip(self, count: usize) -> Self {
        Deferred::new(self.rows.skip(count))
    }

    fn take(self, count: usize) -> Self {
        Deferred::new(self.rows.take(count))
    }
}

/// Runs operation sequences against targets, resolving fields through a
/// [`FieldResolver`].
pub struct Executor<'r, T> {
    resolver: &'r dyn FieldResolver<T>,
}

impl<'r, T: 'static> Executor<'r, T> {
    pub fn new<R>(resolver: &'r R) -> Self
    where
        R: FieldResolver<T> + 'r,
    {
        Executor { resolver }
    }

    /// Applies `operations` to `target`, strictly in sequence order.
    ///
    /// Operations that cannot apply (a filter on an unknown field, a sort
    /// with no known column) leave the target unchanged.
    pub fn apply<Q>(&self, operations: &OperationSequence, target: Q) -> Q
    where
        Q: QueryTarget<T>,
    {
        operations
            .iter()
            .fold(target, |target, operation| self.apply_one(operation, target))
    }

    fn apply_one<Q>(&self, operation: &QueryOperation, target: Q) -> Q
    where
        Q: QueryTarget<T>,
    {
        trace!(%operation, "applying operation");
        match operation {
            QueryOperation::Sort(sort) => self.sort(sort, target),
            QueryOperation::Skip(count) => target.skip(*count),
            QueryOperation::Take(Limit::Count(count)) => target.take(*count),
            QueryOperation::Take(Limit::Unbounded) => target,
            QueryOperation::Page(page) => target.skip(page.skip()).take(page.take()),
            QueryOperation::Filter(filter) => match Predicate::bind(filter, self.resolver) {
                Some(predicate) => target.filter(move |row| predicate.matches(row)),
                None => target,
            },
        }
    }

    fn sort<Q>(&self, sort: &SortSpec, target: Q) -> Q
    where
        Q: QueryTarget<T>,
    {
        let dir = Dir::from_descending(sort.is_descending());
        let keys: Vec<SortKey<T>> = sort
            .columns()
            .iter()
            .filter_map(|column| match self.resolver.resolve(column) {
                Some(descriptor) => Some(SortKey::new(descriptor.accessor(), dir)),
                None => {
                    debug!(column = %column, "skipping unknown sort column");
                    None
                }
            })
            .collect();

        if keys.is_empty() {
            return target;
        }
        target.sort_by(move |a, b| compare_by_keys(a, b, &keys))
    }
}

impl<T> std::fmt::Debug for Executor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}
