use core::fmt::{self, Debug};
use core::ops::{Deref, DerefMut};

use crate::source::Source;
use crate::Lexel;

/// Element range in the source occupied by the current token.
pub type Span = core::ops::Range<usize>;

/// Errors surfaced by the lexer at run time.
///
/// `NotMatch` is data-driven and expected: no pattern matches a prefix
/// of the remaining input. The other three indicate a malformed
/// generated program and should never be produced by a correct build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexError {
    /// No token definition matches the input at the current position.
    NotMatch,
    /// A bump would move the cursor past the end of the source.
    SourceBoundExceeded,
    /// A token was recorded twice within a single step.
    DuplicatedToken,
    /// A step finished without recording a token, a skip, or an error,
    /// or recorded a token over an empty span.
    EmptyToken,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            LexError::NotMatch => "no token matches the input",
            LexError::SourceBoundExceeded => "cursor bumped past the end of the source",
            LexError::DuplicatedToken => "token recorded twice in one step",
            LexError::EmptyToken => "step produced no token",
        };

        f.write_str(message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LexError {}

/// Outcome slot for a single lexing step.
enum Slot<Token> {
    Empty,
    Token(Token),
    Skipped,
}

/// `Lexer` is the main struct of the crate. It reads through a
/// [`Source`] and produces tokens for enums implementing the [`Lexel`]
/// trait.
pub struct Lexer<'s, Token: Lexel<'s>> {
    source: &'s Token::Source,
    slot: Slot<Token>,
    token_start: usize,
    token_end: usize,
    failed: bool,
}

impl<'s, Token: Lexel<'s>> Lexer<'s, Token> {
    /// Create a new `Lexer`.
    ///
    /// Due to type inference, it might be more ergonomic to construct
    /// it by calling [`Lexel::lexer`] on the token type instead.
    pub fn new(source: &'s Token::Source) -> Self {
        Lexer {
            source,
            slot: Slot::Empty,
            token_start: 0,
            token_end: 0,
            failed: false,
        }
    }

    /// Source this `Lexer` is reading tokens from.
    #[inline]
    pub fn source(&self) -> &'s Token::Source {
        self.source
    }

    /// Get the element range of the current token.
    #[inline]
    pub fn span(&self) -> Span {
        self.token_start..self.token_end
    }

    /// Get the slice of the source covered by the current token.
    #[inline]
    pub fn slice(&self) -> &'s [<Token::Source as Source>::Unit] {
        // In bounds as long as `bump` never pushed `token_end` past the
        // source length, which it checks on every call.
        match self.source.slice(self.span()) {
            Some(slice) => slice,
            None => &[],
        }
    }

    /// Get the remaining part of the source, starting after the current
    /// token.
    #[inline]
    pub fn remainder(&self) -> &'s [<Token::Source as Source>::Unit] {
        match self.source.slice(self.token_end..self.source.len()) {
            Some(slice) => slice,
            None => &[],
        }
    }

    /// Peek at the scalar value right after the current token, without
    /// consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u32> {
        self.source.get(self.token_end)
    }

    /// Peek at a window of `len` elements right after the current
    /// token. Returns `None` when fewer than `len` elements remain.
    #[inline]
    pub fn peek_slice(&self, len: usize) -> Option<&'s [<Token::Source as Source>::Unit]> {
        self.source.read_slice(self.token_end, len)
    }

    /// Advance the end of the current token by `n` elements.
    #[inline]
    pub fn bump(&mut self, n: usize) -> Result<(), LexError> {
        if self.token_end + n > self.source.len() {
            return Err(LexError::SourceBoundExceeded);
        }

        self.token_end += n;

        Ok(())
    }

    /// Record the token produced by this step. Recording a second token
    /// within the same step is an error.
    #[inline]
    pub fn set_token(&mut self, token: Token) -> Result<(), LexError> {
        match self.slot {
            Slot::Token(_) => Err(LexError::DuplicatedToken),
            _ => {
                self.slot = Slot::Token(token);

                Ok(())
            }
        }
    }

    /// Drop the span accumulated so far and restart after it, recording
    /// a skipped outcome for this step.
    ///
    /// If the span is empty the cursor still advances one element, so
    /// that iteration always makes progress.
    #[inline]
    pub fn skip(&mut self) {
        if self.token_start == self.token_end {
            self.token_end += 1;
        }

        self.token_start = self.token_end;
        self.slot = Slot::Skipped;
    }

    /// Fail the current step with [`LexError::NotMatch`].
    #[inline]
    pub fn error(&mut self) -> Result<(), LexError> {
        Err(LexError::NotMatch)
    }

    /// Wrap the `Lexer` in an [`Iterator`] that produces tuples of
    /// `(Result<Token, LexError>, Span)`.
    #[inline]
    pub fn spanned(self) -> SpannedIter<'s, Token> {
        SpannedIter { lexer: self }
    }
}

impl<'s, Token> Clone for Lexer<'s, Token>
where
    Token: Lexel<'s> + Clone,
{
    fn clone(&self) -> Self {
        Lexer {
            source: self.source,
            slot: Slot::Empty,
            token_start: self.token_start,
            token_end: self.token_end,
            failed: self.failed,
        }
    }
}

impl<'s, Token> Debug for Lexer<'s, Token>
where
    Token: Lexel<'s>,
    Token::Source: Debug,
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Lexer")
            .field("source", &self.source)
            .field("span", &self.span())
            .finish()
    }
}

impl<'s, Token> Iterator for Lexer<'s, Token>
where
    Token: Lexel<'s>,
{
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Result<Token, LexError>> {
        loop {
            self.token_start = self.token_end;

            if self.failed || self.token_end >= self.source.len() {
                return None;
            }

            self.slot = Slot::Empty;

            if let Err(err) = Token::lex(self) {
                self.failed = true;

                return Some(Err(err));
            }

            match core::mem::replace(&mut self.slot, Slot::Empty) {
                Slot::Token(token) => {
                    if self.token_start == self.token_end {
                        self.failed = true;

                        return Some(Err(LexError::EmptyToken));
                    }

                    return Some(Ok(token));
                }
                Slot::Skipped => continue,
                Slot::Empty => {
                    self.failed = true;

                    return Some(Err(LexError::EmptyToken));
                }
            }
        }
    }
}

/// Iterator that pairs tokens with their element spans in the source.
///
/// Look at [`Lexer::spanned`] for documentation.
pub struct SpannedIter<'s, Token: Lexel<'s>> {
    lexer: Lexer<'s, Token>,
}

impl<'s, Token> Iterator for SpannedIter<'s, Token>
where
    Token: Lexel<'s>,
{
    type Item = (Result<Token, LexError>, Span);

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.next().map(|token| (token, self.lexer.span()))
    }
}

impl<'s, Token> Deref for SpannedIter<'s, Token>
where
    Token: Lexel<'s>,
{
    type Target = Lexer<'s, Token>;

    fn deref(&self) -> &Lexer<'s, Token> {
        &self.lexer
    }
}

impl<'s, Token> DerefMut for SpannedIter<'s, Token>
where
    Token: Lexel<'s>,
{
    fn deref_mut(&mut self) -> &mut Lexer<'s, Token> {
        &mut self.lexer
    }
}
