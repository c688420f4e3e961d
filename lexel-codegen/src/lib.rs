//! # Lexel codegen
//!
//! The compile-time half of Lexel: lowers every `#[token]`/`#[regex]`
//! pattern into a normalised HIR, merges all of them into one shared
//! byte-driven state graph, shakes it, and emits the graph as a set of
//! mutually tail-calling jump routines wrapped in a `Lexel` impl.
//!
//! This is a backend crate for `lexel-derive`; there is no reason to
//! depend on it directly.

// The `quote!` macro requires deep recursion.
#![recursion_limit = "196"]

#[macro_use]
mod macros;

mod error;
mod generator;
mod graph;
mod hir;
mod input;
mod parser;
mod range;

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{Fields, ItemEnum};

use error::GraphError;
use generator::Generator;
use graph::Graph;
use hir::Hir;
use input::{Callback, GraphInput, InputKind};
use parser::{CallbackStyle, Parser, REGEX_ATTR, TOKEN_ATTR};

/// Generate a `Lexel` implementation for the given enum, provided as a
/// stream of Rust tokens.
pub fn generate(input: TokenStream) -> TokenStream {
    debug!("Parsing the item enum");

    let item: ItemEnum = match syn::parse2(input) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error(),
    };

    let name = &item.ident;

    let mut parser = Parser::default();

    if !item.generics.params.is_empty() {
        parser.err(
            "generic token enums are not supported",
            item.generics.span(),
        );
    }

    for attr in &item.attrs {
        parser.try_parse_lexel(attr);
    }

    let mut graph = Graph::new();

    for literal in parser.skips.clone() {
        let span = literal.span();

        match Hir::regex(&literal.value()) {
            Ok(hir) if hir.matches_empty() => {
                parser.err("skip pattern can match the empty string", span);
            }
            Ok(hir) => {
                let skip = GraphInput::new(
                    Ident::new("skip", span),
                    span,
                    InputKind::Skip,
                    hir,
                );

                if let Err(err) = graph.push_input(skip) {
                    report_graph_error(&mut parser, &graph, err, span);
                }
            }
            Err(err) => {
                parser.errors.err(err.to_string(), span);
            }
        }
    }

    debug!("Building the graph from enum variants");

    for variant in &item.variants {
        let field = match &variant.fields {
            Fields::Unit => None,
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Some(()),
            Fields::Unnamed(fields) => {
                parser.err(
                    "only variants with a single unnamed field are supported",
                    fields.span(),
                );
                continue;
            }
            Fields::Named(fields) => {
                parser.err("variants with named fields are not supported", fields.span());
                continue;
            }
        };

        let mut definitions = 0;

        for attr in &variant.attrs {
            let is_token = if attr.path().is_ident(TOKEN_ATTR) {
                true
            } else if attr.path().is_ident(REGEX_ATTR) {
                false
            } else {
                continue;
            };

            definitions += 1;

            if definitions > 1 {
                parser.err(
                    "each variant takes exactly one #[token] or #[regex] definition",
                    attr.span(),
                );
                continue;
            }

            let definition = match parser.parse_definition(attr) {
                Some(definition) => definition,
                None => continue,
            };

            let span = definition.literal.span();
            let value = definition.literal.value();

            let lowered = if is_token {
                Hir::token(&value)
            } else {
                Hir::regex(&value)
            };

            let hir = match lowered {
                Ok(hir) => hir,
                Err(err) => {
                    parser.errors.err(err.to_string(), span);
                    continue;
                }
            };

            if hir.matches_empty() {
                parser.err("pattern can match the empty string", span);
                continue;
            }

            let kind = match &definition.callback {
                None => {
                    if field.is_some() {
                        parser.err(
                            "a variant with a payload field needs a fill callback",
                            variant.span(),
                        );
                        continue;
                    }

                    InputKind::Standalone
                }
                Some((style, tokens)) => {
                    let resolved = match style {
                        CallbackStyle::Bare if field.is_some() => CallbackStyle::Fill,
                        CallbackStyle::Bare => CallbackStyle::Create,
                        style => *style,
                    };

                    match resolved {
                        CallbackStyle::Fill if field.is_none() => {
                            parser.err(
                                "a fill callback needs a payload field on the variant",
                                span,
                            );
                            continue;
                        }
                        CallbackStyle::Fill => InputKind::Fill(Callback(tokens.clone())),
                        _ => InputKind::Create(Callback(tokens.clone())),
                    }
                }
            };

            let input = GraphInput::new(variant.ident.clone(), span, kind, hir)
                .priority(definition.priority);

            if let Err(err) = graph.push_input(input) {
                report_graph_error(&mut parser, &graph, err, span);
            }
        }

        if definitions == 0 {
            parser.err(
                "variant needs a #[token] or #[regex] definition",
                variant.span(),
            );
        }
    }

    if graph.inputs().is_empty() && parser.errors.is_empty() {
        parser.err("the enum defines no tokens", name.span());
    }

    let root = if parser.errors.is_empty() {
        debug!("Finalising the root and shaking the graph");

        match graph.make_root().and_then(|root| graph.shake(root)) {
            Ok(root) => Some(root),
            Err(err) => {
                report_graph_error(&mut parser, &graph, err, name.span());
                None
            }
        }
    } else {
        None
    };

    let source = parser.source.take().unwrap_or_else(|| quote!([char]));

    let body = match root {
        Some(root) => {
            debug!("Generating code from graph:\n{:#?}", graph);

            let routines = Generator::new(name, root, &graph).generate();

            quote! {
                #[allow(unused_imports)]
                use ::lexel::internal::{CallbackResult, CreateOutcome};
                use ::lexel::LexError;

                type Lexer<'s> = ::lexel::Lexer<'s, #name>;

                #routines
            }
        }
        None => match std::mem::take(&mut parser.errors).render() {
            Some(errors) => errors,
            None => quote!(unimplemented!()),
        },
    };

    quote! {
        impl<'s> ::lexel::Lexel<'s> for #name {
            type Source = #source;

            fn lex(lex: &mut ::lexel::Lexer<'s, Self>) -> ::core::result::Result<(), ::lexel::LexError> {
                #body
            }
        }
    }
}

fn report_graph_error(parser: &mut Parser, graph: &Graph, err: GraphError, span: Span) {
    match err {
        GraphError::DuplicatedInputs(existing) => {
            let previous = graph.input(existing);

            parser
                .errors
                .err(
                    format!("`{}` has an identical definition already", previous.token),
                    span,
                )
                .err("First definition here", previous.span);
        }
        GraphError::IdenticalPriority(first, second) => {
            let first = graph.input(first);
            let second = graph.input(second);
            let disambiguate = first.priority + 1;

            let mut err = |a: &GraphInput, b: &GraphInput| {
                parser.errors.err(
                    format!(
                        "A definition of variant `{a}` can match the same input as another \
                         definition of variant `{b}`.\n\
                         \n\
                         hint: Consider giving one definition a higher priority: \
                         priority = {disambiguate}",
                        a = a.token,
                        b = b.token,
                    ),
                    a.span,
                );
            };

            err(first, second);
            err(second, first);
        }
        err => {
            parser.errors.err(err.to_string(), span);
        }
    }
}
