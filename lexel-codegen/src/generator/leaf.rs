use proc_macro2::TokenStream;
use quote::quote;

use crate::generator::Generator;
use crate::input::{EndsId, InputKind};

impl<'a> Generator<'a> {
    /// An accepting routine: record the terminal's token, run its
    /// callback, or drop the span for skips.
    pub fn generate_leaf(&self, ends: EndsId) -> TokenStream {
        let input = self.graph.input(ends);
        let name = self.name;
        let variant = &input.token;

        match &input.kind {
            InputKind::Skip => quote! {
                lex.skip();

                Ok(())
            },
            InputKind::Standalone => quote!(lex.set_token(#name::#variant)),
            InputKind::Fill(callback) => {
                let callback = &callback.0;

                quote! {
                    fn __lexel_coerce<'s, T>(
                        f: impl FnMut(&mut Lexer<'s>) -> T,
                    ) -> impl FnMut(&mut Lexer<'s>) -> T {
                        f
                    }

                    let mut callback = __lexel_coerce(#callback);
                    let value = callback(&mut *lex);

                    lex.set_token(#name::#variant(value))
                }
            }
            InputKind::Create(callback) => {
                let callback = &callback.0;

                quote! {
                    fn __lexel_coerce<'s, T>(
                        f: impl FnMut(&mut Lexer<'s>) -> T,
                    ) -> impl FnMut(&mut Lexer<'s>) -> T {
                        f
                    }

                    let mut callback = __lexel_coerce(#callback);

                    match CreateOutcome::<'s, #name>::construct(callback(&mut *lex)) {
                        CallbackResult::Emit(token) => lex.set_token(token),
                        CallbackResult::Skip => {
                            lex.skip();

                            Ok(())
                        }
                    }
                }
            }
        }
    }
}
