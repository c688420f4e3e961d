//! Emission of the finalised graph as Rust source.
//!
//! Every node becomes one `jump_to_<id>` routine consuming the cursor;
//! continuations are plain tail calls between the routines, except for
//! direct self-edges, which are emitted as `loop`s so unbounded
//! repetition cannot grow the stack.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::graph::{Graph, Node, NodeId};

mod branch;
mod leaf;
mod seq;

pub struct Generator<'a> {
    /// Name of the enum we are implementing the `Lexel` trait for.
    name: &'a Ident,
    /// Id of the root node.
    root: NodeId,
    /// The shaken graph with all of the nodes.
    graph: &'a Graph,
}

impl<'a> Generator<'a> {
    pub fn new(name: &'a Ident, root: NodeId, graph: &'a Graph) -> Self {
        Generator { name, root, graph }
    }

    /// Render one routine per node in arena order, followed by the
    /// call into the root routine.
    pub fn generate(&self) -> TokenStream {
        let mut rendered = TokenStream::new();

        for (index, slot) in self.graph.nodes().iter().enumerate() {
            let node = match slot {
                Some(node) => node,
                None => continue,
            };

            let id = NodeId::new(index);
            let ident = jump_ident(id);
            let body = match node {
                Node::Branch(branch) => self.generate_branch(id, branch),
                Node::Seq(seq) => self.generate_seq(id, seq),
                Node::Leaf(ends) => self.generate_leaf(*ends),
            };

            rendered.extend(quote! {
                #[inline]
                fn #ident<'s>(lex: &mut Lexer<'s>) -> Result<(), LexError> {
                    #body
                }
            });
        }

        let root = jump_ident(self.root);

        rendered.extend(quote!(#root(lex)));
        rendered
    }

    /// Continuation expression for a fallback edge. A missing fallback
    /// is a dead end, and so is a self-referential one, which would
    /// otherwise spin without consuming input.
    fn miss_expr(&self, this: NodeId, miss: Option<NodeId>) -> TokenStream {
        match miss {
            Some(id) if id != this => self.call_expr(id),
            _ => quote!(lex.error()),
        }
    }

    fn call_expr(&self, id: NodeId) -> TokenStream {
        let ident = jump_ident(id);

        quote!(#ident(lex))
    }
}

pub(crate) fn jump_ident(id: NodeId) -> Ident {
    Ident::new(&format!("jump_to_{}", id), Span::call_site())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::hir::Hir;
    use crate::input::{GraphInput, InputKind};

    #[test]
    fn one_routine_per_node() {
        let mut graph = Graph::new();

        for (name, pattern) in [("Ab", "ab"), ("Digits", "[0-9]+?")] {
            graph
                .push_input(GraphInput::new(
                    Ident::new(name, Span::call_site()),
                    Span::call_site(),
                    InputKind::Standalone,
                    Hir::regex(pattern).unwrap(),
                ))
                .unwrap();
        }

        let root = graph.make_root().unwrap();
        let root = graph.shake(root).unwrap();

        let name = Ident::new("Token", Span::call_site());
        let rendered = Generator::new(&name, root, &graph).generate().to_string();

        let routines = rendered.matches("fn jump_to_").count();

        assert_eq!(routines, graph.nodes().len());
        assert!(rendered.trim_end().ends_with("(lex)"));
    }
}
