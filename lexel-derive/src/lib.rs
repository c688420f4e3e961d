//! # Lexel derive
//!
//! This is a `#[derive]` macro crate; for documentation go to the main
//! `lexel` crate.

use proc_macro::TokenStream;

#[proc_macro_derive(Lexel, attributes(lexel, token, regex))]
pub fn lexel(input: TokenStream) -> TokenStream {
    lexel_codegen::generate(input.into()).into()
}
