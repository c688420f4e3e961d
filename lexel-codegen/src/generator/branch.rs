use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::quote;

use crate::generator::Generator;
use crate::graph::{Branch, NodeId};
use crate::range::Range;

impl<'a> Generator<'a> {
    /// Peek one scalar and dispatch over the branch table, one arm per
    /// distinct target. End of input takes the miss path without
    /// consuming anything.
    pub fn generate_branch(&self, this: NodeId, branch: &Branch) -> TokenStream {
        let miss = self.miss_expr(this, branch.miss);

        let mut groups: BTreeMap<NodeId, Vec<Range>> = BTreeMap::new();

        for (range, then) in branch.branches() {
            groups.entry(then).or_default().push(range);
        }

        if !groups.contains_key(&this) {
            let arms = groups.iter().map(|(&then, ranges)| {
                let patterns = ranges.iter().map(range_pattern);
                let next = self.call_expr(then);

                quote!(#(#patterns)|* => { lex.bump(1)?; #next })
            });

            return quote! {
                let byte = match lex.peek() {
                    Some(byte) => byte,
                    None => return #miss,
                };

                match byte {
                    #(#arms)*
                    _ => #miss,
                }
            };
        }

        // A self-edge re-enters this routine; keep it on this frame.
        let arms = groups.iter().map(|(&then, ranges)| {
            let patterns = ranges.iter().map(range_pattern);

            if then == this {
                quote!(#(#patterns)|* => { lex.bump(1)?; continue; })
            } else {
                let next = self.call_expr(then);

                quote!(#(#patterns)|* => { lex.bump(1)?; return #next; })
            }
        });

        quote! {
            loop {
                let byte = match lex.peek() {
                    Some(byte) => byte,
                    None => return #miss,
                };

                match byte {
                    #(#arms)*
                    _ => return #miss,
                }
            }
        }
    }
}

fn range_pattern(range: &Range) -> TokenStream {
    let start = range.start;
    let end = range.end;

    if range.is_single() {
        quote!(#start)
    } else {
        quote!(#start..=#end)
    }
}
