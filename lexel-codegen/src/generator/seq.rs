use proc_macro2::TokenStream;
use quote::quote;

use crate::generator::Generator;
use crate::graph::{NodeId, Seq, SeqMiss};

impl<'a> Generator<'a> {
    /// Peek a window the size of the run and compare element-wise. A
    /// short window takes the miss path; a mismatch past the first
    /// scalar only recovers under an `Anytime` policy.
    pub fn generate_seq(&self, this: NodeId, seq: &Seq) -> TokenStream {
        let len = seq.run.len();

        let error = quote!(lex.error());
        let (first_miss, rest_miss) = match seq.miss {
            None => (error.clone(), error),
            Some(SeqMiss::First(miss)) => (self.miss_expr(this, Some(miss)), error),
            Some(SeqMiss::Anytime(miss)) => {
                let miss = self.miss_expr(this, Some(miss));

                (miss.clone(), miss)
            }
        };

        let checks = seq.run.iter().enumerate().map(|(index, &scalar)| {
            let miss = if index == 0 { &first_miss } else { &rest_miss };

            quote! {
                if Into::<u32>::into(chunk[#index]) != #scalar {
                    return #miss;
                }
            }
        });

        if seq.then == this {
            // The run feeds straight back into itself.
            return quote! {
                loop {
                    let chunk = match lex.peek_slice(#len) {
                        Some(chunk) => chunk,
                        None => return #first_miss,
                    };

                    #(#checks)*

                    lex.bump(#len)?;
                }
            };
        }

        let then = self.call_expr(seq.then);

        quote! {
            let chunk = match lex.peek_slice(#len) {
                Some(chunk) => chunk,
                None => return #first_miss,
            };

            #(#checks)*

            lex.bump(#len)?;

            #then
        }
    }
}
