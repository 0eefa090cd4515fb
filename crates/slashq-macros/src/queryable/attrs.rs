//! Attribute parsing for the Queryable derive macro.
//!
//! Parses the `#[query(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, Meta, Result, Token,
};

/// The kind of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// `#[query(String)]`
    String,
    /// `#[query(Number)]`
    Number,
    /// `#[query(Char)]`
    Char,
    /// `#[query(Bool)]`
    Bool,
    /// `#[query(Enum)]`, the field type implements `QueryEnum`.
    Enum,
}

impl QueryKind {
    /// Parses a kind from an identifier or a `ty = "..."` string.
    pub fn parse_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(QueryKind::String),
            "Number" | "number" => Ok(QueryKind::Number),
            "Char" | "char" => Ok(QueryKind::Char),
            "Bool" | "bool" | "boolean" => Ok(QueryKind::Bool),
            "Enum" | "enum" | "enumeration" => Ok(QueryKind::Enum),
            other => Err(Error::new(
                span,
                format!(
                    "unknown query kind: '{}'. Expected one of: String, Number, Char, Bool, Enum",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone, Default)]
pub struct QueryAttr {
    pub kind: Option<QueryKind>,
    /// Leave the field out of the schema.
    pub skip: bool,
    /// Name used in query strings (default: the field name).
    pub rename: Option<String>,
}

fn string_literal(expr: &Expr, what: &str) -> Result<(String, Span)> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok((s.value(), s.span())),
        _ => Err(Error::new(
            expr.span(),
            format!("{what} must be a string literal"),
        )),
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // query(String), query(Number), query(skip)
                Meta::Path(path) => {
                    if path.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = path.get_ident() {
                        attr.kind = Some(kind_from_ident(ident)?);
                    } else {
                        return Err(Error::new(
                            path.span(),
                            "expected query kind: String, Number, Char, Bool, Enum, or skip",
                        ));
                    }
                }

                // rename = "name" or ty = "enum"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        let (name, span) = string_literal(&nv.value, "rename")?;
                        if name.is_empty() {
                            return Err(Error::new(span, "rename cannot be empty"));
                        }
                        attr.rename = Some(name);
                    } else if nv.path.is_ident("ty") {
                        let (name, span) = string_literal(&nv.value, "ty")?;
                        attr.kind = Some(QueryKind::parse_name(&name, span)?);
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: String, Number, Char, Bool, Enum, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn kind_from_ident(ident: &Ident) -> Result<QueryKind> {
    QueryKind::parse_name(&ident.to_string(), ident.span())
}

/// Extracts the `#[query(...)]` attribute from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}
