/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
#![forbid(unsafe_code)]

//! Mailroom Macro Library
//!
//! This library provides the [`mailroom_message`] attribute, which turns a plain
//! struct or enum into a Mailroom message type: cloneable, debuggable, serializable
//! to the wire shape, and carrying a stable routing code.
//!
//! ```ignore
//! // Explicit, globally unique code (recommended for anything that crosses a wire)
//! #[mailroom_message(code = "01HBN0K9K9A2HEB918MY0JA85Q")]
//! pub struct Ping;
//!
//! // Falls back to the type name ("Increment") as its code
//! #[mailroom_message]
//! pub struct Increment {
//!     pub amount: u32,
//! }
//! ```

use proc_macro::TokenStream;

use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Lit, LitStr, Token};

/// Wire keys of the message header. Payload fields share the same JSON object, so
/// none of them may serialize under one of these names.
const HEADER_KEYS: [&str; 7] = [
    "type",
    "code",
    "messageId",
    "traceId",
    "createdAt",
    "reason",
    "reasonId",
];

fn has_derive(input: &DeriveInput, trait_name: &str) -> bool {
    input.attrs.iter().any(|attr| {
        if attr.path().is_ident("derive") {
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta
                    .path
                    .segments
                    .last()
                    .is_some_and(|segment| segment.ident == trait_name)
                {
                    found = true;
                }
                Ok(())
            });
            found
        } else {
            false
        }
    })
}

/// The `#[serde(...)]` entries of `attrs` as (key, string value) pairs.
///
/// `rename(serialize = "..")` is reported as `rename`. Malformed attributes are left
/// for serde to report.
fn serde_entries(attrs: &[Attribute]) -> Vec<(String, Option<String>)> {
    let mut entries = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();
            if meta.input.peek(Token![=]) {
                let value: Expr = meta.value()?.parse()?;
                entries.push((key, string_literal(&value)));
            } else if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|inner| {
                    if inner.input.peek(Token![=]) {
                        let value: Expr = inner.value()?.parse()?;
                        if inner.path.is_ident("serialize") {
                            entries.push((key.clone(), string_literal(&value)));
                        }
                    }
                    Ok(())
                })?;
            } else {
                entries.push((key, None));
            }
            Ok(())
        });
    }
    entries
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Str(lit) => Some(lit.value()),
            _ => None,
        },
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Applies a serde `rename_all` rule to a snake_case field name.
fn apply_rename_all(rule: &str, field: &str) -> String {
    match rule {
        "lowercase" => field.to_lowercase(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_uppercase(),
        "camelCase" => {
            let mut words = field.split('_');
            let head = words.next().unwrap_or_default().to_string();
            words.fold(head, |mut name, word| {
                name.push_str(&capitalize(word));
                name
            })
        }
        "PascalCase" => field.split('_').map(capitalize).collect(),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_uppercase().replace('_', "-"),
        _ => field.to_string(),
    }
}

/// Rejects payload fields that would serialize under a header key.
fn check_header_keys(input: &DeriveInput) -> syn::Result<()> {
    let Data::Struct(data) = &input.data else {
        return Ok(());
    };
    let Fields::Named(fields) = &data.fields else {
        return Ok(());
    };
    let container = serde_entries(&input.attrs);
    let rename_all = container
        .iter()
        .find(|(key, _)| key == "rename_all")
        .and_then(|(_, value)| value.clone());

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let entries = serde_entries(&field.attrs);
        let skipped = entries
            .iter()
            .any(|(key, _)| matches!(key.as_str(), "skip" | "skip_serializing" | "flatten"));
        if skipped {
            continue;
        }
        let wire_name = entries
            .iter()
            .find(|(key, _)| key == "rename")
            .and_then(|(_, value)| value.clone())
            .unwrap_or_else(|| {
                let field_name = ident.unraw().to_string();
                match &rename_all {
                    Some(rule) => apply_rename_all(rule, &field_name),
                    None => field_name,
                }
            });
        if HEADER_KEYS.contains(&wire_name.as_str()) {
            return Err(syn::Error::new_spanned(
                ident,
                format!(
                    "field serializes as `{wire_name}`, which is a message header key; \
                     rename it with `#[serde(rename = \"...\")]`"
                ),
            ));
        }
    }
    Ok(())
}

/// Turns a struct or enum into a Mailroom message type.
///
/// The expansion:
/// - derives `Clone`, `Debug`, `Serialize` and `Deserialize` (only those not already present),
/// - implements `mailroom_core::MessageKind` with `CODE` set to the `code = "..."` argument,
///   or to the type name when no code is given, and `NAME` set to the type name,
/// - asserts at compile time that the type is `Send + Sync + 'static`,
/// - rejects named fields that would serialize under a header key (`type`, `code`,
///   `messageId`, `traceId`, `createdAt`, `reason`, `reasonId`), honoring
///   `#[serde(rename)]` and `#[serde(rename_all)]`.
///
/// Registration with the `MessageFactory` is still explicit (or happens implicitly
/// when a handler or subscription names the type).
#[proc_macro_attribute]
pub fn mailroom_message(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut code: Option<LitStr> = None;
    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("code") {
            code = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported mailroom_message property, expected `code = \"...\"`"))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let input = parse_macro_input!(item as DeriveInput);
    if let Err(error) = check_header_keys(&input) {
        return error.to_compile_error().into();
    }

    let name = &input.ident;
    let name_str = name.to_string();
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let code = code.map_or_else(|| name_str.clone(), |lit| lit.value());
    if code.trim().is_empty() {
        return syn::Error::new_spanned(name, "a message code must not be empty")
            .to_compile_error()
            .into();
    }

    let need_serialize = !has_derive(&input, "Serialize");
    let need_deserialize = !has_derive(&input, "Deserialize");

    let derives = {
        let mut traits = Vec::new();
        if !has_derive(&input, "Clone") {
            traits.push(quote!(Clone));
        }
        if !has_derive(&input, "Debug") {
            traits.push(quote!(Debug));
        }
        if need_serialize {
            traits.push(quote!(::mailroom_core::__private::serde::Serialize));
        }
        if need_deserialize {
            traits.push(quote!(::mailroom_core::__private::serde::Deserialize));
        }
        if traits.is_empty() {
            quote!()
        } else {
            quote!(#[derive(#(#traits),*)])
        }
    };

    let serde_crate = if need_serialize || need_deserialize {
        quote!(#[serde(crate = "::mailroom_core::__private::serde")])
    } else {
        quote!()
    };

    let assert_ident = quote::format_ident!("_AssertMailroomMessage_{}", name);

    let expanded = quote! {
        #derives
        #serde_crate
        #input

        impl #impl_generics ::mailroom_core::MessageKind for #name #ty_generics #where_clause {
            const CODE: &'static str = #code;
            const NAME: &'static str = #name_str;
        }

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Send + Sync + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}
