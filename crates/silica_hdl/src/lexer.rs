//! Lexical analyzer for HDL chip source text.
//!
//! Converts source text into a sequence of [`Token`]s: the fixed keyword set,
//! symbols, integers, and identifiers. A bracket suffix (`a[16]`,
//! `sum[0..7]`) is lexed as part of the identifier lexeme. `//` line comments
//! and `/* */` block comments are skipped. The first lexical error aborts
//! lexing and is returned as a [`ParseError`].

use crate::error::ParseError;
use crate::token::{lookup_keyword, HdlToken, Token};
use silica_source::{FileId, Span};

/// Lexes the given source text into a vector of tokens.
///
/// Whitespace and comments are skipped. On success the returned vector
/// always ends with an [`HdlToken::Eof`] token.
pub fn lex(source: &str, file: FileId) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
}

impl<'a> Lexer<'a> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: HdlToken::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return Ok(());
            }
            // Line comment: //
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            // Block comment: /* ... */
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        return Err(ParseError::UnterminatedComment {
                            span: self.span_from(start),
                        });
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            return Ok(());
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier(start);
        }
        if b.is_ascii_digit() {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            return Ok(Token {
                kind: HdlToken::IntLiteral,
                span: self.span_from(start),
            });
        }

        self.pos += 1;
        let kind = match b {
            b'{' => HdlToken::LBrace,
            b'}' => HdlToken::RBrace,
            b'(' => HdlToken::LParen,
            b')' => HdlToken::RParen,
            b',' => HdlToken::Comma,
            b';' => HdlToken::Semicolon,
            b'=' => HdlToken::Equals,
            _ => {
                return Err(ParseError::UnexpectedCharacter {
                    ch: b as char,
                    span: self.span_from(start),
                })
            }
        };
        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn lex_identifier(&mut self, start: usize) -> Result<Token, ParseError> {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
        let bare_end = self.pos;
        let text = std::str::from_utf8(&self.source[start..bare_end]).unwrap_or("");

        // `PARTS:` is a keyword whose lexeme includes the colon.
        if text == "PARTS" && self.peek() == b':' {
            self.pos += 1;
            return Ok(Token {
                kind: HdlToken::Parts,
                span: self.span_from(start),
            });
        }

        if let Some(kw) = lookup_keyword(text) {
            return Ok(Token {
                kind: kw,
                span: self.span_from(start),
            });
        }

        // Bus-width / sub-bus suffix is part of the identifier lexeme:
        // a[16], sum[0..7], x[3]. Contents are validated downstream.
        if self.peek() == b'[' {
            self.pos += 1;
            loop {
                if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                    let lexeme = std::str::from_utf8(&self.source[start..self.pos])
                        .unwrap_or("")
                        .to_string();
                    return Err(ParseError::MalformedPinRef {
                        text: lexeme,
                        span: self.span_from(start),
                    });
                }
                if self.source[self.pos] == b']' {
                    self.pos += 1;
                    break;
                }
                self.pos += 1;
            }
        }

        Ok(Token {
            kind: HdlToken::Identifier,
            span: self.span_from(start),
        })
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(source: &str) -> Vec<HdlToken> {
        lex(source, FileId::from_raw(0))
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(lex_kinds(""), vec![HdlToken::Eof]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(lex_kinds("  \t\n\r\n  "), vec![HdlToken::Eof]);
    }

    #[test]
    fn keywords() {
        assert_eq!(
            lex_kinds("CHIP IN OUT BUILTIN CLOCKED PARTS:"),
            vec![
                HdlToken::Chip,
                HdlToken::In,
                HdlToken::Out,
                HdlToken::Builtin,
                HdlToken::Clocked,
                HdlToken::Parts,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            lex_kinds("chip In parts"),
            vec![
                HdlToken::Identifier,
                HdlToken::Identifier,
                HdlToken::Identifier,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(
            lex_kinds("{ } ( ) , ; ="),
            vec![
                HdlToken::LBrace,
                HdlToken::RBrace,
                HdlToken::LParen,
                HdlToken::RParen,
                HdlToken::Comma,
                HdlToken::Semicolon,
                HdlToken::Equals,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn integer_literal() {
        assert_eq!(
            lex_kinds("42 0"),
            vec![HdlToken::IntLiteral, HdlToken::IntLiteral, HdlToken::Eof]
        );
    }

    #[test]
    fn bracket_suffix_is_one_identifier() {
        let tokens = lex("a[16] sum[0..7] x[3]", FileId::from_raw(0)).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                HdlToken::Identifier,
                HdlToken::Identifier,
                HdlToken::Identifier,
                HdlToken::Eof,
            ]
        );
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, 5); // "a[16]"
        assert_eq!(tokens[1].span.end, 15); // "sum[0..7]"
    }

    #[test]
    fn wiring_pair() {
        assert_eq!(
            lex_kinds("a=b, out=sum[0..7]"),
            vec![
                HdlToken::Identifier,
                HdlToken::Equals,
                HdlToken::Identifier,
                HdlToken::Comma,
                HdlToken::Identifier,
                HdlToken::Equals,
                HdlToken::Identifier,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn line_comment() {
        assert_eq!(
            lex_kinds("CHIP // the whole chip\nAnd"),
            vec![HdlToken::Chip, HdlToken::Identifier, HdlToken::Eof]
        );
    }

    #[test]
    fn block_comment() {
        assert_eq!(
            lex_kinds("CHIP /* spans\nlines */ And"),
            vec![HdlToken::Chip, HdlToken::Identifier, HdlToken::Eof]
        );
    }

    #[test]
    fn unterminated_block_comment_errors() {
        let err = lex("CHIP /* no end", FileId::from_raw(0)).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedComment { .. }));
    }

    #[test]
    fn unterminated_bracket_errors() {
        let err = lex("a[0..7", FileId::from_raw(0)).unwrap_err();
        assert!(matches!(err, ParseError::MalformedPinRef { .. }));
    }

    #[test]
    fn unexpected_character_errors() {
        let err = lex("CHIP @", FileId::from_raw(0)).unwrap_err();
        match err {
            ParseError::UnexpectedCharacter { ch, .. } => assert_eq!(ch, '@'),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bare_colon_is_an_error() {
        // The colon is only legal as part of the `PARTS:` lexeme.
        let err = lex("IN a : b", FileId::from_raw(0)).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedCharacter { ch: ':', .. }));
    }

    #[test]
    fn spans_track_byte_offsets() {
        let tokens = lex("CHIP And", FileId::from_raw(0)).unwrap();
        assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 4));
        assert_eq!((tokens[1].span.start, tokens[1].span.end), (5, 8));
    }
}
