//! # Lexel
//!
//! _Declarative lexers over Unicode scalar values._
//!
//! **Lexel** turns a set of token definitions — literal patterns and
//! regexes, each with an optional priority and callback — into a single
//! deterministic state graph at compile time, and emits it as a set of
//! mutually tail-calling jump routines. This crate is the runtime those
//! routines drive: a cursor over an element-indexed [`Source`] and a
//! pull-based token iterator.
//!
//! ```rust
//! use lexel::Lexel;
//!
//! #[derive(Lexel, Debug, PartialEq)]
//! #[lexel(skip " ")]
//! enum Token {
//!     #[token("let")]
//!     Let,
//!
//!     #[regex("[a-z]+?", fill = |lex| lex.slice().iter().collect())]
//!     Word(String),
//! }
//!
//! let source: Vec<char> = "let it be".chars().collect();
//! let tokens: Vec<_> = Token::lexer(&source).collect();
//!
//! assert_eq!(
//!     tokens,
//!     &[
//!         Ok(Token::Let),
//!         Ok(Token::Word("it".to_string())),
//!         Ok(Token::Word("be".to_string())),
//!     ],
//! );
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "export_derive")]
pub use lexel_derive::Lexel;

mod lexer;
pub mod source;

#[doc(hidden)]
pub mod internal;

pub use crate::lexer::{LexError, Lexer, Span, SpannedIter};
pub use crate::source::Source;

/// Trait implemented for an enum representing all tokens. You should
/// never have to implement it manually; use the `#[derive(Lexel)]`
/// attribute on your enum.
pub trait Lexel<'s>: Sized {
    /// Source type this token can be lexed from. Defaults to `[char]`
    /// unless overridden with `#[lexel(source = ...)]`.
    type Source: Source + ?Sized + 's;

    /// The generated entry point, called by the [`Lexer`] once per
    /// step. The implementation is produced by `#[derive(Lexel)]`.
    fn lex(lexer: &mut Lexer<'s, Self>) -> Result<(), LexError>;

    /// Create a new [`Lexer`] that will produce tokens of this type.
    fn lexer(source: &'s Self::Source) -> Lexer<'s, Self> {
        Lexer::new(source)
    }
}

/// Sentinel type a create callback can return to drop the current
/// match and keep lexing.
///
/// ```rust
/// use lexel::{Lexel, Skip};
///
/// #[derive(Lexel, Debug, PartialEq)]
/// enum Token {
///     // Commas are matched, then thrown away.
///     #[token(",", create = |_| Skip)]
///     Comma,
///
///     #[regex("[0-9]+?")]
///     Number,
/// }
///
/// let source: Vec<char> = "1,2".chars().collect();
/// let tokens: Vec<_> = Token::lexer(&source).collect();
///
/// assert_eq!(tokens, &[Ok(Token::Number), Ok(Token::Number)]);
/// ```
pub struct Skip;

/// Return type for create callbacks that decide between emitting a
/// token and skipping the match at run time.
pub enum Filter<Token> {
    /// Record the given token.
    Emit(Token),
    /// Drop the match, analog to [`Skip`].
    Skip,
}
