//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Generates a `Queryable::schema()` implementation and field name
//! constants from `#[query(...)]` field annotations.

mod attrs;
mod derive;

pub use derive::queryable_derive_impl;
