use beef::lean::Cow;
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned, ToTokens, TokenStreamExt};

use crate::input::EndsId;

/// Ways a single pattern can fail to lower into the HIR. Each kind is
/// reported against the offending pattern literal; the remaining
/// patterns still go through generation so all problems surface at
/// once.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("invalid repetition range: the upper bound is smaller than the lower bound")]
    InvalidRepetitionRange,
    #[error(
        "greedy repetition would consume input the rest of the pattern needs; \
         use a reluctant quantifier (`*?`, `+?`, `??`, `{{n,m}}?`) instead"
    )]
    GreedyMatchingMore,
    #[error("unsupported repetition kind")]
    NotSupportedRepetitionKind,
    #[error("unsupported group qualification (inline flags are not supported)")]
    NotSupportedQualification,
    #[error("unsupported atom (anchors and word boundaries are not supported)")]
    NotSupportedAtomKind,
    #[error("unsupported regex construct: {0}")]
    NotSupportedRegexNode(String),
    #[error("unsupported character class (perl and POSIX classes are not supported)")]
    NotSupportedCharacterClass,
    #[error("character range upper bound is smaller than its lower bound")]
    IncorrectCharRange,
    #[error("unsupported character range kind")]
    NotSupportedCharacterRangeKind,
    #[error("invalid escape character")]
    InvalidEscapeCharacter,
    #[error("quotes are not supported inside character classes")]
    QuoteInCharacterClass,
    #[error("scalar value lies outside the supported Unicode range")]
    WiderUnicodeThanSupported,
}

/// Failures while building or finalising the graph. The first two name
/// design conflicts the token set's author has to resolve; the rest are
/// internal invariants that indicate a bug when they surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("terminal {0} is defined twice with an identical pattern")]
    DuplicatedInputs(EndsId),
    #[error("terminals {0} and {1} can match the same input with identical priority")]
    IdenticalPriority(EndsId, EndsId),
    #[error("internal error: attempted to merge two empty nodes")]
    EmptyMerging,
    #[error("internal error: attempted to merge two leaves structurally")]
    MergingLeaves,
    #[error("internal error: overwrote a slot that was not reserved")]
    OverwriteNonReserved,
    #[error("internal error: no terminals to build a root from")]
    EmptyRoot,
    #[error("internal error: dangling node id while shaking the graph")]
    ShakingError,
    #[error("internal error: branch ranges lost their ordering during a merge")]
    MergingRangeError,
}

/// Accumulator for spanned error messages, rendered as a series of
/// `compile_error!` invocations.
#[derive(Default)]
pub struct Errors {
    collected: Vec<SpannedError>,
}

impl Errors {
    pub fn err<M>(&mut self, message: M, span: Span) -> &mut Self
    where
        M: Into<Cow<'static, str>>,
    {
        self.collected.push(SpannedError {
            message: message.into(),
            span,
        });

        self
    }

    pub fn push_syn(&mut self, error: syn::Error) -> &mut Self {
        let span = error.span();

        self.err(error.to_string(), span)
    }

    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }

    pub fn render(self) -> Option<TokenStream> {
        let errors = self.collected;

        match errors.len() {
            0 => None,
            _ => Some(quote! {
                fn _lexel_derive_compile_errors() {
                    #(#errors)*
                }

                unimplemented!()
            }),
        }
    }
}

#[derive(Debug)]
pub struct SpannedError {
    message: Cow<'static, str>,
    span: Span,
}

impl ToTokens for SpannedError {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let message = &*self.message;

        tokens.append_all(quote_spanned!(self.span => {
            compile_error!(#message)
        }))
    }
}
