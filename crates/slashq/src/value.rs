//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the value of a field read from a record
//! through its schema accessor. Strings are borrowed from the record.

use std::cmp::Ordering;
use std::fmt;

/// Runtime value for comparison, borrowed from the source record.
///
/// # Example
///
/// ```
/// use slashq::{Number, Value};
///
/// struct Person {
///     name: String,
///     age: Option<u8>,
/// }
///
/// fn name(person: &Person) -> Value<'_> {
///     Value::String(&person.name)
/// }
///
/// fn age(person: &Person) -> Value<'_> {
///     person.age.map_or(Value::None, |age| Value::Number(Number::from(age)))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Single character.
    Char(char),
    /// Enum ordinal, see [`QueryEnum`](crate::QueryEnum).
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Field absent (an optional field holding nothing).
    None,
}

impl Value<'_> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

/// A number read from a field or parsed from filter text.
///
/// Signed, unsigned and floating values keep separate variants so integer
/// comparisons stay exact; only comparisons involving a float widen to f64.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            // Same type comparisons
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Integers of different signedness compare exactly
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),

            // Anything involving a float goes through f64
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Parses filter text into the narrowest fitting variant.
    ///
    /// Integers are tried before floats so that `"4"` stays exact.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }
}

fn compare_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    if signed < 0 {
        Ordering::Less
    } else {
        (signed as u64).cmp(&unsigned)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);
