//! slashq - slash-delimited query strings for record collections.
//!
//! A query string such as `/age-greaterthan-30/sort-desc-name/page-2-20/`
//! compiles into an ordered [`OperationSequence`]. The sequence then runs
//! against any [`QueryTarget`] (a `Vec` of rows or a lazy [`Deferred`]
//! iterator) with fields resolved through a [`Schema`].
//!
//! # Quick Start
//!
//! ```rust
//! use slashq::{FieldKind, Number, Queryable, Schema, Value};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//!     nickname: Option<String>,
//! }
//!
//! impl Queryable for Person {
//!     fn schema() -> Schema<Self> {
//!         Schema::<Self>::new()
//!             .field("name", FieldKind::String, |p| Value::String(&p.name))
//!             .field("age", FieldKind::Number, |p| Value::Number(Number::from(p.age)))
//!             .optional_field("nickname", FieldKind::String, |p| {
//!                 p.nickname.as_deref().map_or(Value::None, Value::String)
//!             })
//!     }
//! }
//!
//! let people = vec![
//!     Person { name: "Ada".into(), age: 36, nickname: None },
//!     Person { name: "Grace".into(), age: 85, nickname: Some("Amazing".into()) },
//!     Person { name: "Alan".into(), age: 41, nickname: None },
//! ];
//!
//! let found = slashq::run::<Person, _>("/age-greaterthan-40/sort-desc-name/", people)?;
//! let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
//! assert_eq!(names, ["Grace", "Alan"]);
//! # Ok::<(), slashq::QueryError>(())
//! ```
//!
//! # Query Language
//!
//! Segments are separated by `/`; empty segments are ignored. Each segment
//! is one of:
//!
//! | Segment | Operation |
//! |---------|-----------|
//! | `page-<n>` / `page-<n>-<size>` | page `n` (1-based), default size 10 |
//! | `skip-<n>` | drop the first `n` records |
//! | `take-<n>` / `take-all` | keep at most `n` records |
//! | `sort-[desc-]<a>,<b>` | stable sort by one or more columns |
//! | `<field>-<comparator>-<value>` | filter |
//!
//! Comparators are `equals`, `like`, `greaterthan`, `greaterthanequal`,
//! `lessthan`, `lessthanequal` and `not`. The value `null` compares against
//! absent fields.
//!
//! Query strings are case-insensitive: prefixes, comparators, field names
//! and values all match regardless of case. A segment that does not decode
//! is dropped. `page-0` and `sort-` are errors. A filter that cannot apply
//! to its field keeps every record.
//!
//! The separators, prefixes and default page size are configurable through
//! [`QuerySyntax`].

mod builder;
mod compiler;
mod error;
mod executor;
mod operation;
mod ordering;
pub mod parser;
mod predicate;
mod schema;
mod serializer;
mod syntax;
mod value;

// Re-export public API
pub use builder::QueryBuilder;
pub use compiler::QueryCompiler;
pub use error::{QueryError, Result};
pub use executor::{Deferred, Executor, QueryTarget};
pub use operation::{
    Comparator, FilterSpec, FilterValue, Limit, OperationSequence, PageSpec, QueryOperation,
    SortSpec,
};
pub use ordering::{compare_by_keys, compare_values, Dir, SortKey};
pub use predicate::{Operand, Predicate};
pub use schema::{Accessor, FieldDescriptor, FieldKind, FieldResolver, QueryEnum, Queryable, Schema};
pub use serializer::serialize;
pub use syntax::{QuerySyntax, DEFAULT_PAGE_SIZE};
pub use value::{Number, Value};

#[cfg(feature = "derive")]
pub use slashq_macros::Queryable;

/// Compiles `query` with the default [`QuerySyntax`].
pub fn compile(query: &str) -> Result<OperationSequence> {
    QueryCompiler::default().compile(query)
}

/// Compiles `query` and applies it to `target` using `T`'s schema.
///
/// The schema is rebuilt on every call; hosts running many queries should
/// keep a [`Schema`] and an [`Executor`] around instead.
pub fn run<T, Q>(query: &str, target: Q) -> Result<Q>
where
    T: Queryable + 'static,
    Q: QueryTarget<T>,
{
    let operations = compile(query)?;
    let schema = T::schema();
    Ok(Executor::new(&schema).apply(&operations, target))
}
