//! Ordering types for sorting records.
//!
//! Provides [`Dir`] for sort direction and [`SortKey`] for an accessor
//! paired with a direction.

use std::cmp::Ordering;

use crate::schema::Accessor;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Direction for a sort operation's `descending` flag.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

/// A resolved sort column: how to read the field and which way to order it.
pub struct SortKey<T> {
    pub accessor: Accessor<T>,
    pub dir: Dir,
}

impl<T> SortKey<T> {
    pub fn new(accessor: Accessor<T>, dir: Dir) -> Self {
        SortKey { accessor, dir }
    }

    /// Compares two records on this key.
    ///
    /// Returns `None` if the values cannot be compared (type mismatch or NaN).
    pub fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        let base = compare_values(&(self.accessor)(a), &(self.accessor)(b))?;
        Some(self.dir.apply(base))
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SortKey<T> {}

impl<T> std::fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortKey").field("dir", &self.dir).finish()
    }
}

/// Compares two values of the same type.
///
/// Returns `None` if the types don't match or comparison is not possible (NaN).
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),

        // Absent values are the smallest: first ascending, last descending
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Less),
        (_, Value::None) => Some(Ordering::Greater),

        // Type mismatch - cannot compare
        _ => None,
    }
}

/// Compares two records using a list of keys.
///
/// The first key is the primary sort key, the second breaks ties, and so on.
/// Incomparable values count as equal so the next key gets a say.
pub fn compare_by_keys<T>(a: &T, b: &T, keys: &[SortKey<T>]) -> Ordering {
    for key in keys {
        if let Some(ordering) = key.compare(a, b) {
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
    }
    Ordering::Equal
}
