//! Two definitions that accept the same input with the same priority
//! must be rejected at build time:
//!
//! ```compile_fail
//! use lexel::Lexel;
//!
//! #[derive(Lexel)]
//! enum Token {
//!     #[token("fast")]
//!     Fast,
//!
//!     #[token("fast")]
//!     Slow,
//! }
//! ```
//!
//! Greedy unbounded repetition cannot be expressed without
//! backtracking:
//!
//! ```compile_fail
//! use lexel::Lexel;
//!
//! #[derive(Lexel)]
//! enum Token {
//!     #[regex("[0-9]+")]
//!     Number,
//! }
//! ```
//!
//! Patterns that can match the empty string never make progress:
//!
//! ```compile_fail
//! use lexel::Lexel;
//!
//! #[derive(Lexel)]
//! enum Token {
//!     #[regex("a*?")]
//!     Maybe,
//! }
//! ```
//!
//! A payload field needs a fill callback to be built from the slice:
//!
//! ```compile_fail
//! use lexel::Lexel;
//!
//! #[derive(Lexel)]
//! enum Token {
//!     #[regex("[0-9]+?")]
//!     Number(u64),
//! }
//! ```

use std::fmt;
use std::ops::Range;

use lexel::{LexError, Lexel, Source};

/// Drive a lexer over `source` and compare every produced token, its
/// slice, and its span against the expected list, in order.
#[allow(clippy::type_complexity)]
pub fn assert_lex<'a, Token>(
    source: &'a Token::Source,
    tokens: &[(
        Result<Token, LexError>,
        &'a [<Token::Source as Source>::Unit],
        Range<usize>,
    )],
) where
    Token: Lexel<'a> + fmt::Debug + PartialEq,
{
    let mut lex = Token::lexer(source);

    for tuple in tokens {
        assert_eq!(
            &(lex.next().expect("Unexpected end"), lex.slice(), lex.span()),
            tuple
        );
    }

    assert_eq!(lex.next(), None);
}
