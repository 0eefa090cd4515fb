//! Proc macros for slashq.
//!
//! # Derive Macros
//!
//! - [`Queryable`] - Generate a field schema from struct field annotations
//!
//! # Examples
//!
//! For working examples, see `slashq/tests/derive.rs`.

mod queryable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Queryable` trait for structs that can be filtered and sorted
/// by query strings.
///
/// Only fields carrying a `#[query(...)]` kind are part of the schema.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text field, any `AsRef<str>` (supports equals, not, like) |
/// | `Number` | Integer or float field (supports all comparators) |
/// | `Char` | Character field (supports all comparators) |
/// | `Bool` | Boolean field (supports equals, not, like) |
/// | `Enum` | Enum field, requires a `QueryEnum` impl (supports all comparators) |
/// | `ty = "..."` | Kind given as a string, e.g. `ty = "enum"` |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name in query strings |
///
/// A field of type `Option<T>` is registered as optional: `None` is an
/// absent value that `null` filters match.
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Task::TITLE`, `Task::PRIORITY`)
/// 2. Implementation of `Queryable::schema()`
///
/// # Example
///
/// ```ignore
/// use slashq::Queryable;
///
/// #[derive(Queryable)]
/// struct Task {
///     #[query(String)]
///     title: String,
///
///     #[query(Number, rename = "prio")]
///     priority: u8,
///
///     #[query(Number)]
///     estimate: Option<u32>,
///
///     #[query(skip)]
///     internal_id: u64,
/// }
///
/// let tasks = vec![
///     Task { title: "Write docs".into(), priority: 3, estimate: None, internal_id: 1 },
///     Task { title: "Fix bug".into(), priority: 5, estimate: Some(2), internal_id: 2 },
/// ];
///
/// let results = slashq::run::<Task, _>("prio-greaterthan-3", tasks)?;
/// assert_eq!(results[0].title, "Fix bug");
/// assert_eq!(Task::PRIO, "prio");
/// ```
///
/// # Enum Fields
///
/// ```ignore
/// use slashq::QueryEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status { Pending, Active, Done }
///
/// impl QueryEnum for Status {
///     const VARIANTS: &'static [&'static str] = &["pending", "active", "done"];
///
///     fn ordinal(&self) -> u32 {
///         *self as u32
///     }
/// }
///
/// #[derive(Queryable)]
/// struct Task {
///     #[query(Enum)]
///     status: Status,
/// }
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    queryable::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
