//! Front-end error types and their diagnostic codes.
//!
//! Error codes `E101`--`E107` cover lexical and grammar failures. `E100` is
//! reserved for token-cursor misuse, which indicates a bug in the caller
//! rather than in the HDL source.

use silica_diagnostics::{Category, Diagnostic, DiagnosticCode};
use silica_source::Span;

/// Misuse of a [`TokenCursor`](crate::TokenCursor).
///
/// Querying the current token before the first `advance()` or after the
/// stream has been exhausted is a programming error, signalled explicitly
/// rather than answered with a default token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The cursor was queried before the first `advance()`.
    #[error("token cursor queried before the first advance")]
    NotAdvanced,
    /// The cursor was advanced past the end of the token stream.
    #[error("token cursor advanced past end of stream")]
    PastEnd,
}

/// Errors produced by the HDL lexer and parser.
///
/// Every variant carries the span where the failure was detected; parsing is
/// fail-fast, so at most one error is reported per file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("unrecognized character `{ch}`")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
        /// Where it was found.
        span: Span,
    },

    /// A `/* */` comment with no closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment {
        /// The comment opener.
        span: Span,
    },

    /// The parser found a token other than the one the grammar requires.
    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken {
        /// What the grammar required at this point.
        expected: String,
        /// The text of the token actually found.
        found: String,
        /// The offending token.
        span: Span,
    },

    /// The file ended in the middle of a chip definition.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What the grammar required at this point.
        expected: String,
        /// The end of the file.
        span: Span,
    },

    /// Tokens remain after the chip's closing `}`.
    #[error("unexpected tokens after closing `}}`")]
    TrailingTokens {
        /// The first trailing token.
        span: Span,
    },

    /// A pin reference whose bracket suffix is not `[n]` or `[lo..hi]`.
    #[error("malformed pin reference `{text}`")]
    MalformedPinRef {
        /// The full pin-reference lexeme.
        text: String,
        /// The offending reference.
        span: Span,
    },

    /// Token-cursor misuse while parsing; indicates a parser bug.
    #[error("internal cursor error: {0}")]
    Cursor(#[from] CursorError),
}

impl ParseError {
    /// Returns the stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ParseError::Cursor(_) => 100,
            ParseError::UnexpectedCharacter { .. } => 101,
            ParseError::UnexpectedToken { .. } => 102,
            ParseError::UnexpectedEof { .. } => 103,
            ParseError::UnterminatedComment { .. } => 104,
            ParseError::MalformedPinRef { .. } => 105,
            ParseError::TrailingTokens { .. } => 106,
        };
        DiagnosticCode::new(Category::Error, number)
    }

    /// Returns the span where the error was detected, if any.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedCharacter { span, .. }
            | ParseError::UnterminatedComment { span }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::TrailingTokens { span }
            | ParseError::MalformedPinRef { span, .. } => *span,
            ParseError::Cursor(_) => Span::DUMMY,
        }
    }

    /// Converts this error into a renderable [`Diagnostic`].
    pub fn into_diagnostic(self) -> Diagnostic {
        let code = self.code();
        let span = self.span();
        Diagnostic::error(code, self.to_string(), span)
    }
}
