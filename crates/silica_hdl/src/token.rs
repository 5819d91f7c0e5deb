//! Token kinds and the advance-driven token cursor.
//!
//! Keywords are the fixed, case-sensitive HDL set. Bus and sub-bus notation
//! (`a[16]`, `sum[0..7]`) is part of the identifier lexeme, not separate
//! tokens; the bracket suffix is split downstream by
//! [`PinRef::parse`](crate::ast::PinRef::parse).

use crate::error::CursorError;
use serde::{Deserialize, Serialize};
use silica_source::Span;

/// An HDL token kind.
///
/// Literal values are not stored in the token; they are retrieved from the
/// source text using the token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum HdlToken {
    // === Keywords ===
    /// `CHIP`
    Chip,
    /// `IN`
    In,
    /// `OUT`
    Out,
    /// `BUILTIN`
    Builtin,
    /// `CLOCKED`
    Clocked,
    /// `PARTS:` (the colon is part of the keyword lexeme)
    Parts,

    // === Symbols ===
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Equals,

    // === Literals ===
    /// An integer literal.
    IntLiteral,
    /// An identifier, possibly with an embedded bracket suffix.
    Identifier,

    /// End of the token stream.
    Eof,
}

impl HdlToken {
    /// Returns `true` if this token is one of the HDL keywords.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            HdlToken::Chip
                | HdlToken::In
                | HdlToken::Out
                | HdlToken::Builtin
                | HdlToken::Clocked
                | HdlToken::Parts
        )
    }
}

/// Looks up the keyword token for an identifier lexeme, if any.
///
/// HDL keywords are case-sensitive; `chip` is an ordinary identifier.
/// `PARTS` is handled separately by the lexer because its lexeme includes
/// the trailing colon.
pub fn lookup_keyword(text: &str) -> Option<HdlToken> {
    match text {
        "CHIP" => Some(HdlToken::Chip),
        "IN" => Some(HdlToken::In),
        "OUT" => Some(HdlToken::Out),
        "BUILTIN" => Some(HdlToken::Builtin),
        "CLOCKED" => Some(HdlToken::Clocked),
        _ => None,
    }
}

/// A token: a kind paired with its source span.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: HdlToken,
    /// The byte range of the token's lexeme.
    pub span: Span,
}

/// A cursor over a lexed token stream whose sole mutator is [`advance`].
///
/// The cursor starts positioned *before* the first token; querying
/// [`current`] before the first `advance()`, or after the stream is
/// exhausted, returns a [`CursorError`] instead of a silent default.
/// End-of-stream is queryable without error via [`has_more`].
///
/// [`advance`]: TokenCursor::advance
/// [`current`]: TokenCursor::current
/// [`has_more`]: TokenCursor::has_more
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: Option<usize>,
}

impl TokenCursor {
    /// Creates a cursor positioned before the first token.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: None }
    }

    /// Advances to the next token. Returns `true` if the cursor now sits on
    /// a token, `false` if it moved past the end of the stream.
    pub fn advance(&mut self) -> bool {
        let next = match self.pos {
            None => 0,
            Some(i) => (i + 1).min(self.tokens.len()),
        };
        self.pos = Some(next);
        next < self.tokens.len()
    }

    /// Returns `true` if at least one token remains ahead of the cursor.
    pub fn has_more(&self) -> bool {
        match self.pos {
            None => !self.tokens.is_empty(),
            Some(i) => i + 1 < self.tokens.len(),
        }
    }

    /// Returns the token the cursor currently sits on.
    pub fn current(&self) -> Result<Token, CursorError> {
        match self.pos {
            None => Err(CursorError::NotAdvanced),
            Some(i) => self.tokens.get(i).copied().ok_or(CursorError::PastEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silica_source::FileId;

    fn tok(kind: HdlToken, start: u32, end: u32) -> Token {
        Token {
            kind,
            span: Span::new(FileId::from_raw(0), start, end),
        }
    }

    #[test]
    fn keyword_lookup_case_sensitive() {
        assert_eq!(lookup_keyword("CHIP"), Some(HdlToken::Chip));
        assert_eq!(lookup_keyword("chip"), None);
        assert_eq!(lookup_keyword("CLOCKED"), Some(HdlToken::Clocked));
        assert_eq!(lookup_keyword("Nand"), None);
    }

    #[test]
    fn is_keyword() {
        assert!(HdlToken::Parts.is_keyword());
        assert!(!HdlToken::Identifier.is_keyword());
        assert!(!HdlToken::LBrace.is_keyword());
    }

    #[test]
    fn cursor_before_first_advance() {
        let cursor = TokenCursor::new(vec![tok(HdlToken::Chip, 0, 4)]);
        assert_eq!(cursor.current(), Err(CursorError::NotAdvanced));
        assert!(cursor.has_more());
    }

    #[test]
    fn cursor_walks_stream() {
        let mut cursor = TokenCursor::new(vec![
            tok(HdlToken::Chip, 0, 4),
            tok(HdlToken::Identifier, 5, 8),
        ]);
        assert!(cursor.advance());
        assert_eq!(cursor.current().unwrap().kind, HdlToken::Chip);
        assert!(cursor.has_more());
        assert!(cursor.advance());
        assert_eq!(cursor.current().unwrap().kind, HdlToken::Identifier);
        assert!(!cursor.has_more());
    }

    #[test]
    fn cursor_past_end() {
        let mut cursor = TokenCursor::new(vec![tok(HdlToken::Eof, 0, 0)]);
        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert_eq!(cursor.current(), Err(CursorError::PastEnd));
        // Further advances stay past the end rather than wrapping.
        assert!(!cursor.advance());
        assert_eq!(cursor.current(), Err(CursorError::PastEnd));
    }

    #[test]
    fn empty_stream_has_no_more() {
        let cursor = TokenCursor::new(Vec::new());
        assert!(!cursor.has_more());
    }
}
