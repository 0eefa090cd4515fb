//! Filter predicates bound to a field.
//!
//! A [`Predicate`] is a [`FilterSpec`] whose field has been resolved and
//! whose value has been converted to the field's type. Binding fails (and
//! the filter becomes a no-op) when the field is unknown, the comparator
//! does not apply to the field's kind, or the value cannot be converted.
//!
//! Query strings are case-insensitive, so text and character comparisons
//! fold case on both sides.

use std::cmp::Ordering;

use tracing::debug;

use crate::operation::{Comparator, FilterSpec, FilterValue};
use crate::ordering::compare_values;
use crate::schema::{Accessor, FieldKind, FieldResolver};
use crate::value::{Number, Value};

/// A filter value converted to a field's type.
///
/// Owns its data, so predicates built from it do not borrow the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// String field value, or the raw text of a `like` filter.
    Text(String),
    Number(Number),
    Char(char),
    Bool(bool),
    /// Enum ordinal.
    Enum(u32),
    /// Matches on absence.
    Null,
}

impl Operand {
    /// Converts `value` for a field of `kind`.
    ///
    /// Returns `None` if the text does not describe a value of that kind.
    ///
    /// ```
    /// use slashq::{FieldKind, FilterValue, Number, Operand};
    ///
    /// let value = FilterValue::from("42");
    /// assert_eq!(
    ///     Operand::coerce(&value, FieldKind::Number),
    ///     Some(Operand::Number(Number::I64(42)))
    /// );
    /// assert_eq!(Operand::coerce(&value, FieldKind::Bool), None);
    /// ```
    pub fn coerce(value: &FilterValue, kind: FieldKind) -> Option<Operand> {
        let text = match value {
            FilterValue::Null => return Some(Operand::Null),
            FilterValue::Text(text) => text.as_str(),
        };

        match kind {
            FieldKind::String => Some(Operand::Text(text.to_lowercase())),
            FieldKind::Number => Number::parse(text).map(Operand::Number),
            FieldKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Operand::Char(fold_char(c))),
                    _ => None,
                }
            }
            FieldKind::Bool => {
                if text.eq_ignore_ascii_case("true") {
                    Some(Operand::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(Operand::Bool(false))
                } else {
                    None
                }
            }
            FieldKind::Enum(variants) => {
                let ordinal = text.parse::<u32>().ok().or_else(|| {
                    variants
                        .iter()
                        .position(|variant| variant.eq_ignore_ascii_case(text))
                        .and_then(|index| u32::try_from(index).ok())
                });
                ordinal.map(Operand::Enum)
            }
        }
    }

    /// Borrows the operand as a [`Value`] for comparison.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Operand::Text(text) => Value::String(text),
            Operand::Number(n) => Value::Number(*n),
            Operand::Char(c) => Value::Char(*c),
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Enum(ordinal) => Value::Enum(*ordinal),
            Operand::Null => Value::None,
        }
    }
}

/// A filter ready to run against records of type `T`.
pub struct Predicate<T> {
    field: String,
    kind: FieldKind,
    accessor: Accessor<T>,
    comparator: Comparator,
    operand: Operand,
}

impl<T> Predicate<T> {
    /// Resolves the filter's field and converts its value.
    ///
    /// Returns `None` when the filter cannot apply; callers treat that as
    /// "keep every record".
    pub fn bind<R>(filter: &FilterSpec, resolver: &R) -> Option<Self>
    where
        R: FieldResolver<T> + ?Sized,
    {
        let Some(descriptor) = resolver.resolve(&filter.field) else {
            debug!(field = %filter.field, "ignoring filter on unknown field");
            return None;
        };

        if !descriptor.supports(filter.comparator) {
            debug!(
                field = %filter.field,
                comparator = %filter.comparator,
                kind = descriptor.kind().as_str(),
                "ignoring ordinal filter on unordered field"
            );
            return None;
        }

        let operand = match (&filter.value, filter.comparator) {
            // `like` matches against the rendered field, so the text is kept as is.
            (FilterValue::Text(text), Comparator::Like) => Operand::Text(text.to_lowercase()),
            (value, _) => match Operand::coerce(value, descriptor.kind()) {
                Some(operand) => operand,
                None => {
                    debug!(
                        field = %filter.field,
                        value = ?filter.value,
                        kind = descriptor.kind().as_str(),
                        "ignoring filter whose value does not fit the field"
                    );
                    return None;
                }
            },
        };

        Some(Predicate {
            field: filter.field.clone(),
            kind: descriptor.kind(),
            accessor: descriptor.accessor(),
            comparator: filter.comparator,
            operand,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Evaluates the predicate against one record.
    pub fn matches(&self, record: &T) -> bool {
        let value = (self.accessor)(record);

        if self.operand == Operand::Null {
            return match self.comparator {
                Comparator::Equals | Comparator::Like => value.is_none(),
                Comparator::Not => !value.is_none(),
                _ => false,
            };
        }

        // An absent field differs from every value and equals none of them.
        if value.is_none() {
            return self.comparator == Comparator::Not;
        }

        match self.comparator {
            Comparator::Like => match &self.operand {
                Operand::Text(needle) => render(&value, self.kind)
                    .to_lowercase()
                    .contains(needle.as_str()),
                _ => false,
            },
            comparator => {
                let ordering = match (&value, &self.operand) {
                    (Value::String(field), Operand::Text(text)) => {
                        Some(field.to_lowercase().as_str().cmp(text.as_str()))
                    }
                    (Value::Char(field), Operand::Char(c)) => Some(fold_char(*field).cmp(c)),
                    _ => compare_values(&value, &self.operand.as_value()),
                };
                matches_ordering(comparator, ordering)
            }
        }
    }
}

impl<T> std::fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("field", &self.field)
            .field("comparator", &self.comparator)
            .field("operand", &self.operand)
            .finish()
    }
}

/// Decides a comparator given how the field compares to the operand.
///
/// Incomparable values (NaN) only satisfy `not`.
fn matches_ordering(comparator: Comparator, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return comparator == Comparator::Not;
    };
    match comparator {
        Comparator::Equals | Comparator::Like => ordering == Ordering::Equal,
        Comparator::Not => ordering != Ordering::Equal,
        Comparator::GreaterThan => ordering == Ordering::Greater,
        Comparator::GreaterThanEqual => ordering != Ordering::Less,
        Comparator::LessThan => ordering == Ordering::Less,
        Comparator::LessThanEqual => ordering != Ordering::Greater,
    }
}

/// Lower-cases a character when it has a single-character lower case.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => c,
    }
}

/// Renders a field value as text for `like`.
fn render(value: &Value<'_>, kind: FieldKind) -> String {
    match value {
        Value::String(s) => (*s).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Char(c) => c.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Enum(ordinal) => match kind {
            FieldKind::Enum(variants) => usize::try_from(*ordinal)
                .ok()
                .and_then(|index| variants.get(index))
                .map_or_else(|| ordinal.to_string(), |name| (*name).to_string()),
            _ => ordinal.to_string(),
        },
        Value::None => String::new(),
    }
}
