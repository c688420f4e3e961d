//! Plumbing consumed by code produced with `#[derive(Lexel)]`.
//!
//! **This module is not meant to be used directly.**

use crate::{Filter, Lexel, Skip};

/// What a create callback decided to do with the current match.
pub enum CallbackResult<Token> {
    /// Record `Token` for this step.
    Emit(Token),
    /// Drop the match and continue lexing.
    Skip,
}

/// Conversion from a create callback's return value into a
/// [`CallbackResult`]. Implemented for the token type itself, for
/// [`Skip`], and for [`Filter`] over the token type.
pub trait CreateOutcome<'s, Token: Lexel<'s>> {
    /// Fold `self` into an emit-or-skip decision.
    fn construct(self) -> CallbackResult<Token>;
}

impl<'s, Token: Lexel<'s>> CreateOutcome<'s, Token> for Token {
    #[inline]
    fn construct(self) -> CallbackResult<Token> {
        CallbackResult::Emit(self)
    }
}

impl<'s, Token: Lexel<'s>> CreateOutcome<'s, Token> for Skip {
    #[inline]
    fn construct(self) -> CallbackResult<Token> {
        CallbackResult::Skip
    }
}

impl<'s, Token: Lexel<'s>> CreateOutcome<'s, Token> for Filter<Token> {
    #[inline]
    fn construct(self) -> CallbackResult<Token> {
        match self {
            Filter::Emit(token) => CallbackResult::Emit(token),
            Filter::Skip => CallbackResult::Skip,
        }
    }
}
