use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, ExprLit, Fields, Lit, Meta, spanned::Spanned};

pub(crate) fn derive_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "RuleCode can only be derived for enums",
        ));
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "RuleCode variants must not carry fields",
            ));
        }
        let code = code_literal(variant)?;
        variants.push((&variant.ident, code));
    }

    let as_code_arms = variants
        .iter()
        .map(|(ident, code)| quote! { Self::#ident => #code })
        .collect_vec();

    let from_code_arms = variants
        .iter()
        .map(|(ident, code)| quote! { #code => Some(Self::#ident) })
        .collect_vec();

    let all_variants = variants.iter().map(|(ident, _)| quote! { Self::#ident });

    Ok(quote! {
        impl #name {
            /// The stable short code for this rule, e.g. `"TYP001"`.
            pub const fn as_code(&self) -> &'static str {
                match self {
                    #(#as_code_arms,)*
                }
            }

            /// Parse a rule code, case-sensitively, back into its variant.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    #(#from_code_arms,)*
                    _ => None,
                }
            }

            /// Every variant, in declaration order.
            pub const fn all() -> &'static [Self] {
                &[#(#all_variants),*]
            }
        }

        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_code())
            }
        }
    })
}

fn code_literal(variant: &syn::Variant) -> syn::Result<String> {
    for attr in &variant.attrs {
        if !attr.path().is_ident("code") {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta {
            if let Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) = &nv.value
            {
                return Ok(s.value());
            }
        }
        return Err(syn::Error::new(
            attr.span(),
            "expected `#[code = \"...\"]`",
        ));
    }
    Err(syn::Error::new(
        variant.span(),
        "variant is missing a `#[code = \"...\"]` attribute",
    ))
}
