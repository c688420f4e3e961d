use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Ident, LitInt, LitStr, Token};

/// How a callback argument was introduced, which decides whether it
/// fills a payload or creates a whole token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackStyle {
    Fill,
    Create,
    /// Positional, with no keyword; resolved from the variant shape.
    Bare,
}

/// Parsed contents of a `#[token(...)]` or `#[regex(...)]` attribute:
/// the pattern literal, then any of `priority = <int>`, `fill = <expr>`
/// or `create = <expr>`, or one bare callback expression.
pub struct Definition {
    pub literal: LitStr,
    pub priority: Option<usize>,
    pub callback: Option<(CallbackStyle, TokenStream)>,
}

impl Parse for Definition {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let literal: LitStr = input.parse()?;

        let mut definition = Definition {
            literal,
            priority: None,
            callback: None,
        };

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;

            if input.is_empty() {
                break;
            }

            if input.peek(Ident) && input.peek2(Token![=]) {
                let name: Ident = input.parse()?;
                input.parse::<Token![=]>()?;

                match name.to_string().as_str() {
                    "priority" => {
                        let value: LitInt = input.parse()?;

                        if definition.priority.is_some() {
                            return Err(syn::Error::new(
                                name.span(),
                                "priority can only be set once",
                            ));
                        }

                        definition.priority = Some(value.base10_parse()?);
                    }
                    "fill" => definition.set_callback(CallbackStyle::Fill, &name, input)?,
                    "create" => definition.set_callback(CallbackStyle::Create, &name, input)?,
                    _ => {
                        return Err(syn::Error::new(
                            name.span(),
                            "unknown argument, expected one of: priority, fill, create",
                        ));
                    }
                }
            } else {
                let span = input.span();
                let expr: Expr = input.parse()?;

                if definition.callback.is_some() {
                    return Err(syn::Error::new(span, "callback is already set"));
                }

                definition.callback = Some((CallbackStyle::Bare, expr.to_token_stream()));
            }
        }

        Ok(definition)
    }
}

impl Definition {
    fn set_callback(
        &mut self,
        style: CallbackStyle,
        name: &Ident,
        input: ParseStream,
    ) -> syn::Result<()> {
        let expr: Expr = input.parse()?;

        if self.callback.is_some() {
            return Err(syn::Error::new(name.span(), "callback is already set"));
        }

        self.callback = Some((style, expr.to_token_stream()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: TokenStream) -> syn::Result<Definition> {
        syn::parse2(tokens)
    }

    #[test]
    fn literal_only() {
        let definition = parse(quote::quote!("fast")).unwrap();

        assert_eq!(definition.literal.value(), "fast");
        assert_eq!(definition.priority, None);
        assert!(definition.callback.is_none());
    }

    #[test]
    fn literal_with_priority() {
        let definition = parse(quote::quote!("fast", priority = 10)).unwrap();

        assert_eq!(definition.priority, Some(10));
    }

    #[test]
    fn named_fill_callback() {
        let definition = parse(quote::quote!("[0-9]+?", fill = |lex| lex.slice().len())).unwrap();

        let (style, _) = definition.callback.unwrap();
        assert_eq!(style, CallbackStyle::Fill);
    }

    #[test]
    fn bare_callback_with_priority() {
        let definition =
            parse(quote::quote!("what", |lex| lex.slice().len(), priority = 3)).unwrap();

        let (style, _) = definition.callback.unwrap();
        assert_eq!(style, CallbackStyle::Bare);
        assert_eq!(definition.priority, Some(3));
    }

    #[test]
    fn double_priority_is_an_error() {
        assert!(parse(quote::quote!("a", priority = 1, priority = 2)).is_err());
    }

    #[test]
    fn fill_and_create_conflict() {
        assert!(parse(quote::quote!("a", fill = |lex| 1, create = |lex| Token::A)).is_err());
    }
}
