//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Generates an implementation of `Queryable` whose schema has one
//! descriptor per annotated field, plus field name constants.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use super::attrs::{parse_query_attrs, QueryKind};

/// Main implementation of the Queryable derive macro.
pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let mut descriptors: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let query_attrs = parse_query_attrs(&field.attrs)?;
        if query_attrs.skip {
            continue;
        }

        // Fields without a kind are not queryable
        let kind = match query_attrs.kind {
            Some(kind) => kind,
            None => continue,
        };

        let query_name = query_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name constant for building queries.
            pub const #const_name: &'static str = #query_name;
        });

        let optional_inner = option_inner(&field.ty);
        let value_type = optional_inner.unwrap_or(&field.ty);
        let kind_expr = kind_tokens(kind, value_type);

        let descriptor = match optional_inner {
            None => {
                let value = value_tokens(kind, &quote! { record.#field_name }, false);
                quote! {
                    ::slashq::FieldDescriptor::<Self>::new(#query_name, #kind_expr, |record| #value)
                }
            }
            Some(_) => {
                let inner = format_ident!("value");
                let value = value_tokens(kind, &quote! { #inner }, true);
                quote! {
                    ::slashq::FieldDescriptor::<Self>::new(#query_name, #kind_expr, |record| {
                        match &record.#field_name {
                            ::core::option::Option::Some(#inner) => #value,
                            ::core::option::Option::None => ::slashq::Value::None,
                        }
                    })
                    .optional()
                }
            }
        };

        descriptors.push(quote! { .with(#descriptor) });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::slashq::Queryable for #struct_name #ty_generics #where_clause {
            fn schema() -> ::slashq::Schema<Self> {
                ::slashq::Schema::new()
                    #(#descriptors)*
            }
        }
    };

    Ok(expanded)
}

/// Returns `T` if `ty` is written as `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn kind_tokens(kind: QueryKind, value_type: &Type) -> TokenStream {
    match kind {
        QueryKind::String => quote! { ::slashq::FieldKind::String },
        QueryKind::Number => quote! { ::slashq::FieldKind::Number },
        QueryKind::Char => quote! { ::slashq::FieldKind::Char },
        QueryKind::Bool => quote! { ::slashq::FieldKind::Bool },
        QueryKind::Enum => quote! {
            ::slashq::FieldKind::Enum(<#value_type as ::slashq::QueryEnum>::VARIANTS)
        },
    }
}

/// Builds the `Value` expression for a field.
///
/// `by_ref` is set when `access` is a reference to the value (the binding
/// inside `Some(..)`) rather than the field place itself.
fn value_tokens(kind: QueryKind, access: &TokenStream, by_ref: bool) -> TokenStream {
    let copied = if by_ref {
        quote! { *#access }
    } else {
        quote! { #access }
    };
    let borrowed = if by_ref {
        quote! { #access }
    } else {
        quote! { &#access }
    };

    match kind {
        QueryKind::String => quote! {
            ::slashq::Value::String(::core::convert::AsRef::<str>::as_ref(#borrowed))
        },
        QueryKind::Number => quote! {
            ::slashq::Value::Number(::slashq::Number::from(#copied))
        },
        QueryKind::Char => quote! { ::slashq::Value::Char(#copied) },
        QueryKind::Bool => quote! { ::slashq::Value::Bool(#copied) },
        QueryKind::Enum => quote! {
            ::slashq::Value::Enum(::slashq::QueryEnum::ordinal(#borrowed))
        },
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("due_date"), "DUE_DATE");
        assert_eq!(to_screaming_snake_case("dueDate"), "DUE_DATE");
        assert_eq!(to_screaming_snake_case("page-size"), "PAGE_SIZE");
    }

    #[test]
    fn test_option_inner() {
        let ty: Type = syn::parse_str("Option<u32>").unwrap();
        let inner = option_inner(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), "u32");

        let ty: Type = syn::parse_str("std::option::Option<String>").unwrap();
        assert!(option_inner(&ty).is_some());

        let ty: Type = syn::parse_str("Vec<u32>").unwrap();
        assert!(option_inner(&ty).is_none());

        let ty: Type = syn::parse_str("u32").unwrap();
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_derive_rejects_enums() {
        let input: DeriveInput = syn::parse_str("enum Status { Open, Closed }").unwrap();
        let err = queryable_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn test_derive_rejects_tuple_structs() {
        let input: DeriveInput = syn::parse_str("struct Pair(u32, u32);").unwrap();
        assert!(queryable_derive_impl(input).is_err());
    }

    #[test]
    fn test_derive_emits_descriptors() {
        let input: DeriveInput = syn::parse_str(
            r#"
            struct Task {
                #[query(String)]
                title: String,
                #[query(Number, rename = "prio")]
                priority: u8,
                #[query(Number)]
                estimate: Option<u32>,
                #[query(skip)]
                id: u64,
                notes: String,
            }
            "#,
        )
        .unwrap();

        let output = queryable_derive_impl(input).unwrap().to_string();
        assert!(output.contains("TITLE"));
        assert!(output.contains("PRIO"));
        assert!(output.contains("ESTIMATE"));
        assert_eq!(output.matches("optional").count(), 1);
        assert!(!output.contains("\"id\""));
        assert!(!output.contains("\"notes\""));
    }
}
