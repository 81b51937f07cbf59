//! Derive macros for the gravflow simulation core.
//!
//! This crate provides one derive macro:
//!
//! - [`EnumTable`] - Turns a fieldless enum into a dense, table-indexable
//!   category (liquid types, gravity well kinds)
//!
//! # Usage
//!
//! The macro is re-exported from the main `gravflow` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use gravflow::EnumTable;
//!
//! #[derive(EnumTable, Clone, Copy, PartialEq, Debug)]
//! enum Liquid {
//!     Plasma,
//!     Crystal,
//! }
//!
//! static VISCOSITY: [f32; Liquid::count() as usize] = [0.998, 0.95];
//! ```
//!
//! # The EnumTable Macro
//!
//! It generates:
//! - `From<EnumName> for u32` - Dense index of the variant
//! - `From<u32> for EnumName` - Convert back (defaults to first variant)
//! - `EnumName::count() -> u32` - Number of variants (usable in array lengths)
//! - `EnumName::variants() -> &'static [EnumName]` - All variants in order
//! - `EnumName::name(&self) -> &'static str` - Lowercase variant name
//! - `EnumName::try_from_name(&str) -> Option<EnumName>` - Case-insensitive lookup
//! - `EnumName::from_name(&str) -> EnumName` - Lookup that falls back to the first variant

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro for category enums backed by lookup tables.
///
/// Variants are assigned sequential indices starting from 0, in
/// declaration order. Names are the variant identifiers lowercased, so
/// `GasGiant` is `"gasgiant"`.
///
/// # Requirements
///
/// - Must be an enum (not a struct)
/// - All variants must be unit variants (no fields)
/// - Enum must also derive `Clone` and `Copy`
///
/// # Example
///
/// ```ignore
/// #[derive(EnumTable, Clone, Copy, PartialEq, Debug)]
/// enum WellKind {
///     Star,       // = 0, "star"
///     BlackHole,  // = 1, "blackhole"
/// }
///
/// assert_eq!(WellKind::from_name("BLACKHOLE"), WellKind::BlackHole);
/// assert_eq!(WellKind::from_name("comet"), WellKind::Star);
/// assert_eq!(WellKind::count(), 2);
/// ```
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to a struct instead of an enum
/// - Any variant has fields (tuple or struct variants)
/// - Enum has zero variants
#[proc_macro_derive(EnumTable)]
pub fn derive_enum_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => panic!("EnumTable derive only supports enums"),
    };

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            panic!(
                "EnumTable enum variants must be unit variants (no fields). \
                 Found fields on variant '{}'",
                variant.ident
            );
        }
    }

    let first_variant = &variants
        .first()
        .expect("Enum must have at least one variant")
        .ident;
    let variant_count = variants.len() as u32;

    let into_arms: Vec<TokenStream2> = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| {
            let variant_name = &variant.ident;
            let idx = i as u32;
            quote! { #name::#variant_name => #idx }
        })
        .collect();

    let from_arms: Vec<TokenStream2> = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| {
            let variant_name = &variant.ident;
            let idx = i as u32;
            quote! { #idx => #name::#variant_name }
        })
        .collect();

    let lower_names: Vec<LitStr> = variants
        .iter()
        .map(|variant| {
            LitStr::new(
                &variant.ident.to_string().to_lowercase(),
                variant.ident.span(),
            )
        })
        .collect();

    let name_arms: Vec<TokenStream2> = variants
        .iter()
        .zip(&lower_names)
        .map(|(variant, lower)| {
            let variant_name = &variant.ident;
            quote! { #name::#variant_name => #lower }
        })
        .collect();

    let lookup_arms: Vec<TokenStream2> = variants
        .iter()
        .zip(&lower_names)
        .map(|(variant, lower)| {
            let variant_name = &variant.ident;
            quote! { #lower => ::core::option::Option::Some(#name::#variant_name) }
        })
        .collect();

    let all_variants: Vec<TokenStream2> = variants
        .iter()
        .map(|variant| {
            let variant_name = &variant.ident;
            quote! { #name::#variant_name }
        })
        .collect();

    let expanded = quote! {
        impl From<#name> for u32 {
            fn from(value: #name) -> u32 {
                match value {
                    #(#into_arms),*
                }
            }
        }

        impl From<u32> for #name {
            fn from(value: u32) -> #name {
                match value {
                    #(#from_arms,)*
                    _ => #name::#first_variant,
                }
            }
        }

        impl #name {
            /// Returns the number of variants in this enum.
            pub const fn count() -> u32 {
                #variant_count
            }

            /// All variants in declaration order.
            pub fn variants() -> &'static [#name] {
                &[#(#all_variants),*]
            }

            /// Lowercase name of this variant.
            pub fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }

            /// Case-insensitive lookup by name.
            pub fn try_from_name(name: &str) -> ::core::option::Option<#name> {
                match name.trim().to_ascii_lowercase().as_str() {
                    #(#lookup_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            /// Case-insensitive lookup by name, falling back to the first variant.
            pub fn from_name(name: &str) -> #name {
                #name::try_from_name(name).unwrap_or(#name::#first_variant)
            }
        }
    };

    TokenStream::from(expanded)
}
