use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitStr, Token, Type};

use crate::error::Errors;

mod definition;

pub use definition::{CallbackStyle, Definition};

pub const LEXEL_ATTR: &str = "lexel";
pub const TOKEN_ATTR: &str = "token";
pub const REGEX_ATTR: &str = "regex";

/// Collects the enum-level configuration from `#[lexel(...)]`
/// attributes, plus every error raised along the way.
#[derive(Default)]
pub struct Parser {
    pub errors: Errors,
    pub skips: Vec<LitStr>,
    pub source: Option<TokenStream>,
}

enum LexelAttr {
    /// `skip "<regex>"` — matches are silently dropped.
    Skip(LitStr),
    /// `source = <Type>` — overrides the default `[char]` source.
    Source(Type, Span),
}

impl Parse for LexelAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;

        match name.to_string().as_str() {
            "skip" => {
                if input.peek(Token![=]) {
                    input.parse::<Token![=]>()?;
                }

                Ok(LexelAttr::Skip(input.parse()?))
            }
            "source" => {
                input.parse::<Token![=]>()?;

                Ok(LexelAttr::Source(input.parse()?, name.span()))
            }
            _ => Err(syn::Error::new(
                name.span(),
                "unknown nested attribute, expected one of: skip, source",
            )),
        }
    }
}

impl Parser {
    /// Try to parse the main `#[lexel(...)]` attribute; does nothing if
    /// the attribute's name isn't `lexel`.
    pub fn try_parse_lexel(&mut self, attr: &Attribute) {
        if !attr.path().is_ident(LEXEL_ATTR) {
            return;
        }

        let parsed =
            attr.parse_args_with(Punctuated::<LexelAttr, Token![,]>::parse_terminated);

        let attrs = match parsed {
            Ok(attrs) => attrs,
            Err(err) => {
                self.errors.push_syn(err);
                return;
            }
        };

        for nested in attrs {
            match nested {
                LexelAttr::Skip(literal) => self.skips.push(literal),
                LexelAttr::Source(ty, span) => {
                    if self.source.is_some() {
                        self.err("source can be defined only once", span);
                        continue;
                    }

                    self.source = Some(ty.to_token_stream());
                }
            }
        }
    }

    /// Parse a `#[token(...)]` or `#[regex(...)]` attribute body.
    pub fn parse_definition(&mut self, attr: &Attribute) -> Option<Definition> {
        match attr.parse_args::<Definition>() {
            Ok(definition) => Some(definition),
            Err(err) => {
                self.errors.push_syn(err);
                None
            }
        }
    }

    pub fn err(&mut self, message: &'static str, span: Span) -> &mut Errors {
        self.errors.err(message, span)
    }
}
