mod rule_code;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `as_code`/`from_code` on a fieldless enum whose variants each carry
/// a `#[code = "TYP001"]` attribute, mirroring the hand-maintained match
/// statements a rule registry would otherwise need to keep in sync by hand.
#[proc_macro_derive(RuleCode, attributes(code))]
pub fn derive_rule_code(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    rule_code::derive_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
