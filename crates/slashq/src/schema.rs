//! Field resolution for query execution.
//!
//! The executor never inspects records directly. It asks a
//! [`FieldResolver`] for a [`FieldDescriptor`] by name and reads values
//! through the descriptor's accessor. [`Schema`] is the standard resolver:
//! an explicit name → descriptor map built once when the record type is
//! registered, either by hand or with `#[derive(Queryable)]`.

use std::collections::HashMap;

use crate::operation::Comparator;
use crate::value::Value;

/// Reads one field of a record as a [`Value`].
pub type Accessor<T> = for<'r> fn(&'r T) -> Value<'r>;

/// The underlying type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Char,
    Bool,
    /// Enum field with its variant names, indexed by ordinal.
    Enum(&'static [&'static str]),
}

impl FieldKind {
    /// Returns `true` if ordinal comparators (greater/less-than) apply.
    pub fn is_ordered(self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Char | FieldKind::Enum(_))
    }

    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Char => "char",
            FieldKind::Bool => "bool",
            FieldKind::Enum(_) => "enum",
        }
    }
}

/// Everything the executor needs to know about one field.
pub struct FieldDescriptor<T> {
    name: String,
    kind: FieldKind,
    optional: bool,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// Creates a descriptor for a required field.
    pub fn new(name: impl Into<String>, kind: FieldKind, accessor: Accessor<T>) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind,
            optional: false,
            accessor,
        }
    }

    /// Marks the field as optional: its accessor may yield [`Value::None`].
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn accessor(&self) -> Accessor<T> {
        self.accessor
    }

    /// Reads this field from a record.
    pub fn value<'r>(&self, record: &'r T) -> Value<'r> {
        (self.accessor)(record)
    }

    /// Returns `true` if `comparator` can be evaluated against this field.
    ///
    /// Ordinal comparators need an ordered kind; the rest apply everywhere.
    pub fn supports(&self, comparator: Comparator) -> bool {
        !comparator.is_ordinal() || self.kind.is_ordered()
    }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .finish()
    }
}

/// Resolves query field names to descriptors.
///
/// Lookups are case-insensitive. Hosts may hide or rename fields freely;
/// a name that resolves to nothing makes filters on it no-ops and sort
/// columns on it skipped.
pub trait FieldResolver<T> {
    fn resolve(&self, name: &str) -> Option<&FieldDescriptor<T>>;
}

/// A name → descriptor map for record type `T`.
///
/// # Example
///
/// ```
/// use slashq::{FieldKind, FieldResolver, Number, Schema, Value};
///
/// struct Person {
///     name: String,
///     age: Option<u8>,
/// }
///
/// let schema = Schema::<Person>::new()
///     .field("name", FieldKind::String, |p| Value::String(&p.name))
///     .optional_field("age", FieldKind::Number, |p| {
///         p.age.map_or(Value::None, |a| Value::Number(Number::from(a)))
///     })
///     .rename("name", "fullname");
///
/// assert!(schema.resolve("FullName").is_some());
/// assert!(schema.resolve("name").is_none());
/// assert!(schema.resolve("age").unwrap().is_optional());
/// ```
pub struct Schema<T> {
    fields: HashMap<String, FieldDescriptor<T>>,
}

impl<T> Schema<T> {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Schema {
            fields: HashMap::new(),
        }
    }

    /// Adds a descriptor, replacing any field with the same name.
    pub fn with(mut self, descriptor: FieldDescriptor<T>) -> Self {
        self.fields
            .insert(descriptor.name.to_lowercase(), descriptor);
        self
    }

    /// Adds a required field.
    pub fn field(self, name: &str, kind: FieldKind, accessor: Accessor<T>) -> Self {
        self.with(FieldDescriptor::new(name, kind, accessor))
    }

    /// Adds an optional field.
    pub fn optional_field(self, name: &str, kind: FieldKind, accessor: Accessor<T>) -> Self {
        self.with(FieldDescriptor::new(name, kind, accessor).optional())
    }

    /// Exposes field `from` under the name `to` only.
    ///
    /// Unknown names are ignored.
    pub fn rename(mut self, from: &str, to: &str) -> Self {
        if let Some(mut descriptor) = self.fields.remove(&from.to_lowercase()) {
            descriptor.name = to.to_string();
            self = self.with(descriptor);
        }
        self
    }

    /// Hides a field from queries.
    pub fn exclude(mut self, name: &str) -> Self {
        self.fields.remove(&name.to_lowercase());
        self
    }

    /// Returns the number of queryable fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is queryable.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the descriptors in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields.values()
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Schema::new()
    }
}

impl<T> FieldResolver<T> for Schema<T> {
    fn resolve(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.get(&name.to_lowercase())
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Record types that describe their own queryable fields.
///
/// Usually derived with `#[derive(Queryable)]`:
///
/// ```ignore
/// use slashq::Queryable;
///
/// #[derive(Queryable)]
/// struct Task {
///     #[query(String)]
///     name: String,
///     #[query(Number, rename = "prio")]
///     priority: u8,
///     #[query(Number)]
///     estimate: Option<u32>,
///     #[query(skip)]
///     internal_id: u64,
/// }
/// ```
///
/// Call [`Queryable::schema`] once and keep the result; it is rebuilt on
/// every call.
pub trait Queryable: Sized {
    fn schema() -> Schema<Self>;
}

/// Enum types usable as query fields.
///
/// `VARIANTS` lists the names a filter value may use, indexed by ordinal.
/// Ordinals drive ordering, so keep them stable.
///
/// # Example
///
/// ```
/// use slashq::QueryEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Active,
///     Done,
/// }
///
/// impl QueryEnum for Status {
///     const VARIANTS: &'static [&'static str] = &["pending", "active", "done"];
///
///     fn ordinal(&self) -> u32 {
///         *self as u32
///     }
/// }
///
/// assert_eq!(Status::Active.ordinal(), 1);
/// ```
pub trait QueryEnum {
    const VARIANTS: &'static [&'static str];

    fn ordinal(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    struct Item {
        name: String,
        count: i32,
        grade: Option<char>,
    }

    fn schema() -> Schema<Item> {
        Schema::<Item>::new()
            .field("Name", FieldKind::String, |i| Value::String(&i.name))
            .field("count", FieldKind::Number, |i| {
                Value::Number(Number::from(i.count))
            })
            .optional_field("grade", FieldKind::Char, |i| {
                i.grade.map_or(Value::None, Value::Char)
            })
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let schema = schema();
        assert_eq!(schema.resolve("name").map(|d| d.name()), Some("Name"));
        assert!(schema.resolve("COUNT").is_some());
        assert!(schema.resolve("missing").is_none());
    }

    #[test]
    fn descriptor_reads_values() {
        let schema = schema();
        let item = Item {
            name: "widget".to_string(),
            count: 3,
            grade: None,
        };

        let count = schema.resolve("count").unwrap();
        assert_eq!(count.value(&item), Value::Number(Number::I64(3)));
        assert!(!count.is_optional());

        let grade = schema.resolve("grade").unwrap();
        assert_eq!(grade.value(&item), Value::None);
        assert!(grade.is_optional());
    }

    #[test]
    fn ordinal_support_depends_on_kind() {
        let schema = schema();
        let name = schema.resolve("name").unwrap();
        let count = schema.resolve("count").unwrap();
        let grade = schema.resolve("grade").unwrap();

        assert!(name.supports(Comparator::Equals));
        assert!(name.supports(Comparator::Like));
        assert!(!name.supports(Comparator::GreaterThan));
        assert!(count.supports(Comparator::LessThanEqual));
        assert!(grade.supports(Comparator::GreaterThanEqual));
    }

    #[test]
    fn rename_and_exclude() {
        let schema = schema().rename("count", "qty").exclude("grade");
        assert!(schema.resolve("count").is_none());
        assert_eq!(schema.resolve("QTY").map(|d| d.name()), Some("qty"));
        assert!(schema.resolve("grade").is_none());
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn rename_unknown_field_is_ignored() {
        let schema = schema().rename("nope", "other");
        assert_eq!(schema.len(), 3);
        assert!(schema.resolve("other").is_none());
    }

    #[test]
    fn kind_ordering_flags() {
        assert!(FieldKind::Number.is_ordered());
        assert!(FieldKind::Char.is_ordered());
        assert!(FieldKind::Enum(&["a"]).is_ordered());
        assert!(!FieldKind::String.is_ordered());
        assert!(!FieldKind::Bool.is_ordered());
        assert_eq!(FieldKind::Enum(&[]).as_str(), "enum");
    }
}
