//! Recursive descent parser for chip definitions.
//!
//! The parser drives a [`TokenCursor`] (its sole mutator is `advance`) and
//! builds a [`ChipDecl`]. It is fail-fast: the first grammar error aborts and
//! is returned as a [`ParseError`] value. No tokens are permitted after the
//! chip's closing `}`.

use crate::ast::{ChipBody, ChipDecl, PartDecl, PinDecl, PinRef, SubSpec, Wire};
use crate::error::ParseError;
use crate::lexer::lex;
use crate::token::{HdlToken, Token, TokenCursor};
use silica_source::FileId;

/// Lexes and parses one chip definition from HDL source text.
pub fn parse_chip(source: &str, file: FileId) -> Result<ChipDecl, ParseError> {
    let tokens = lex(source, file)?;
    let mut parser = Parser {
        cursor: TokenCursor::new(tokens),
        source,
    };
    parser.parse()
}

struct Parser<'src> {
    cursor: TokenCursor,
    source: &'src str,
}

impl<'src> Parser<'src> {
    // ========================================================================
    // Primitive operations
    // ========================================================================

    /// Advances to and returns the next token.
    fn bump(&mut self) -> Result<Token, ParseError> {
        self.cursor.advance();
        Ok(self.cursor.current()?)
    }

    /// Returns the source text of a token.
    fn text(&self, token: Token) -> &'src str {
        &self.source[token.span.start as usize..token.span.end as usize]
    }

    /// Advances and requires the next token to have the given kind.
    fn expect(&mut self, kind: HdlToken, expected: &str) -> Result<Token, ParseError> {
        let token = self.bump()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    fn unexpected(&self, token: Token, expected: &str) -> ParseError {
        if token.kind == HdlToken::Eof {
            ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span: token.span,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.text(token).to_string(),
                span: token.span,
            }
        }
    }

    /// Expects an identifier with no bracket suffix (a chip or impl name).
    fn expect_name(&mut self, expected: &str) -> Result<(String, Token), ParseError> {
        let token = self.expect(HdlToken::Identifier, expected)?;
        let text = self.text(token);
        if text.contains('[') {
            return Err(self.unexpected(token, expected));
        }
        Ok((text.to_string(), token))
    }

    // ========================================================================
    // Grammar rules
    // ========================================================================

    fn parse(&mut self) -> Result<ChipDecl, ParseError> {
        let chip_kw = self.expect(HdlToken::Chip, "`CHIP`")?;
        let (name, name_token) = self.expect_name("chip name")?;
        self.expect(HdlToken::LBrace, "`{`")?;

        let mut token = self.bump()?;
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        if token.kind == HdlToken::In {
            inputs = self.pin_decl_list()?;
            token = self.bump()?;
        }
        if token.kind == HdlToken::Out {
            outputs = self.pin_decl_list()?;
            token = self.bump()?;
        }

        let (body, close) = match token.kind {
            HdlToken::Builtin => self.builtin_body()?,
            HdlToken::Parts => self.parts_body()?,
            _ => return Err(self.unexpected(token, "`BUILTIN` or `PARTS:`")),
        };

        let tail = self.bump()?;
        if tail.kind != HdlToken::Eof {
            return Err(ParseError::TrailingTokens { span: tail.span });
        }

        Ok(ChipDecl {
            name,
            name_span: name_token.span,
            inputs,
            outputs,
            body,
            span: chip_kw.span.merge(close.span),
        })
    }

    /// Parses `pinName ("," pinName)* ";"` after `IN` or `OUT`.
    fn pin_decl_list(&mut self) -> Result<Vec<PinDecl>, ParseError> {
        let mut decls = Vec::new();
        loop {
            let token = self.expect(HdlToken::Identifier, "pin name")?;
            let pin_ref = PinRef::parse(self.text(token), token.span)?;
            let width = match pin_ref.sub {
                None => 1,
                Some(SubSpec::Index(n)) => n,
                Some(SubSpec::Range(..)) => {
                    return Err(ParseError::MalformedPinRef {
                        text: self.text(token).to_string(),
                        span: token.span,
                    })
                }
            };
            decls.push(PinDecl {
                name: pin_ref.name,
                width,
                span: token.span,
            });

            let sep = self.bump()?;
            match sep.kind {
                HdlToken::Comma => {}
                HdlToken::Semicolon => return Ok(decls),
                _ => return Err(self.unexpected(sep, "`,` or `;`")),
            }
        }
    }

    /// Parses `<implName> ";" ["CLOCKED" pinList ";"] "}"` after `BUILTIN`.
    fn builtin_body(&mut self) -> Result<(ChipBody, Token), ParseError> {
        let (impl_name, impl_token) = self.expect_name("implementation name")?;
        self.expect(HdlToken::Semicolon, "`;`")?;

        let mut clocked = Vec::new();
        let mut token = self.bump()?;
        if token.kind == HdlToken::Clocked {
            loop {
                let pin = self.expect(HdlToken::Identifier, "pin name")?;
                let pin_ref = PinRef::parse(self.text(pin), pin.span)?;
                if pin_ref.sub.is_some() {
                    return Err(ParseError::MalformedPinRef {
                        text: self.text(pin).to_string(),
                        span: pin.span,
                    });
                }
                clocked.push((pin_ref.name, pin.span));

                let sep = self.bump()?;
                match sep.kind {
                    HdlToken::Comma => {}
                    HdlToken::Semicolon => break,
                    _ => return Err(self.unexpected(sep, "`,` or `;`")),
                }
            }
            token = self.bump()?;
        }

        if token.kind != HdlToken::RBrace {
            return Err(self.unexpected(token, "`}`"));
        }
        Ok((
            ChipBody::Builtin {
                impl_name,
                impl_span: impl_token.span,
                clocked,
            },
            token,
        ))
    }

    /// Parses `(partInst)* "}"` after `PARTS:`.
    fn parts_body(&mut self) -> Result<(ChipBody, Token), ParseError> {
        let mut parts = Vec::new();
        loop {
            let token = self.bump()?;
            if token.kind == HdlToken::RBrace {
                return Ok((ChipBody::Parts { parts }, token));
            }
            if token.kind != HdlToken::Identifier || self.text(token).contains('[') {
                return Err(self.unexpected(token, "part chip name or `}`"));
            }
            let chip_name = self.text(token).to_string();

            self.expect(HdlToken::LParen, "`(`")?;
            let mut wires = Vec::new();
            loop {
                let left = self.expect(HdlToken::Identifier, "pin name")?;
                let part_pin = PinRef::parse(self.text(left), left.span)?;
                self.expect(HdlToken::Equals, "`=`")?;
                let right = self.expect(HdlToken::Identifier, "pin name")?;
                let source = PinRef::parse(self.text(right), right.span)?;
                wires.push(Wire {
                    part_pin,
                    source,
                    span: left.span.merge(right.span),
                });

                let sep = self.bump()?;
                match sep.kind {
                    HdlToken::Comma => {}
                    HdlToken::RParen => break,
                    _ => return Err(self.unexpected(sep, "`,` or `)`")),
                }
            }
            let semi = self.expect(HdlToken::Semicolon, "`;`")?;
            parts.push(PartDecl {
                chip_name,
                wires,
                span: token.span.merge(semi.span),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<ChipDecl, ParseError> {
        parse_chip(source, FileId::from_raw(0))
    }

    const AND_HDL: &str = "\
CHIP And {
    IN a, b;
    OUT out;
    PARTS:
    Nand(a=a, b=b, out=nandOut);
    Not(in=nandOut, out=out);
}";

    #[test]
    fn composite_chip() {
        let chip = parse(AND_HDL).unwrap();
        assert_eq!(chip.name, "And");
        assert_eq!(chip.inputs.len(), 2);
        assert_eq!(chip.outputs.len(), 1);
        assert_eq!(chip.inputs[0].name, "a");
        assert_eq!(chip.inputs[0].width, 1);

        let ChipBody::Parts { parts } = &chip.body else {
            panic!("expected parts body");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].chip_name, "Nand");
        assert_eq!(parts[0].wires.len(), 3);
        assert_eq!(parts[1].wires[0].part_pin.name, "in");
        assert_eq!(parts[1].wires[0].source.name, "nandOut");
    }

    #[test]
    fn builtin_chip_with_clocked_list() {
        let chip = parse(
            "CHIP DFF {
                IN in;
                OUT out;
                BUILTIN DFF;
                CLOCKED in, out;
            }",
        )
        .unwrap();
        let ChipBody::Builtin {
            impl_name, clocked, ..
        } = &chip.body
        else {
            panic!("expected builtin body");
        };
        assert_eq!(impl_name, "DFF");
        let names: Vec<_> = clocked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["in", "out"]);
    }

    #[test]
    fn builtin_chip_without_clocked_list() {
        let chip = parse("CHIP Nand { IN a, b; OUT out; BUILTIN Nand; }").unwrap();
        let ChipBody::Builtin { clocked, .. } = &chip.body else {
            panic!("expected builtin body");
        };
        assert!(clocked.is_empty());
    }

    #[test]
    fn bus_widths_and_subbus_wiring() {
        let chip = parse(
            "CHIP Low8 {
                IN in[16];
                OUT out[8];
                PARTS:
                Pass8(in=in[0..7], out=out);
            }",
        )
        .unwrap();
        assert_eq!(chip.inputs[0].width, 16);
        assert_eq!(chip.outputs[0].width, 8);
        let ChipBody::Parts { parts } = &chip.body else {
            panic!("expected parts body");
        };
        assert_eq!(parts[0].wires[0].source.sub, Some(SubSpec::Range(0, 7)));
    }

    #[test]
    fn empty_parts_section() {
        let chip = parse("CHIP Stub { IN a; OUT out; PARTS: }").unwrap();
        let ChipBody::Parts { parts } = &chip.body else {
            panic!("expected parts body");
        };
        assert!(parts.is_empty());
    }

    #[test]
    fn chip_without_inputs() {
        let chip = parse("CHIP One { OUT out; PARTS: Tie(out=out); }").unwrap();
        assert!(chip.inputs.is_empty());
        assert_eq!(chip.outputs.len(), 1);
    }

    #[test]
    fn trailing_tokens_rejected() {
        let err = parse("CHIP X { IN a; OUT b; PARTS: } CHIP").unwrap_err();
        assert!(matches!(err, ParseError::TrailingTokens { .. }));
    }

    #[test]
    fn missing_body_rejected() {
        let err = parse("CHIP X { IN a; OUT b; }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, .. } => {
                assert!(expected.contains("BUILTIN"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_semicolon_rejected() {
        let err = parse("CHIP X { IN a OUT b; PARTS: }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "`,` or `;`");
                assert_eq!(found, "OUT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn eof_inside_parts_rejected() {
        let err = parse("CHIP X { IN a; OUT b; PARTS: Nand(a=a,").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn range_in_declaration_rejected() {
        let err = parse("CHIP X { IN a[0..7]; OUT b; PARTS: }").unwrap_err();
        assert!(matches!(err, ParseError::MalformedPinRef { .. }));
    }

    #[test]
    fn subbus_in_clocked_list_rejected() {
        let err = parse("CHIP X { IN a; OUT b; BUILTIN X; CLOCKED a[3]; }").unwrap_err();
        assert!(matches!(err, ParseError::MalformedPinRef { .. }));
    }

    #[test]
    fn span_covers_definition() {
        let chip = parse("CHIP X { IN a; OUT b; PARTS: }").unwrap();
        assert_eq!(chip.span.start, 0);
        assert_eq!(chip.span.end as usize, "CHIP X { IN a; OUT b; PARTS: }".len());
    }
}
