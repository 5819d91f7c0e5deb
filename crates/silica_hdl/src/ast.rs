//! AST node types for parsed chip definitions.
//!
//! Every node carries a [`Span`] for diagnostics. Bus-width and sub-bus
//! bracket suffixes arrive from the lexer embedded in identifier lexemes;
//! [`PinRef::parse`] splits them into a name plus [`SubSpec`].

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use silica_source::Span;

/// A complete chip definition parsed from one `.hdl` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipDecl {
    /// The declared chip name.
    pub name: String,
    /// The span of the chip name.
    pub name_span: Span,
    /// Input pin declarations, in declaration order.
    pub inputs: Vec<PinDecl>,
    /// Output pin declarations, in declaration order.
    pub outputs: Vec<PinDecl>,
    /// The chip body: builtin binding or parts list.
    pub body: ChipBody,
    /// The span covering the whole definition.
    pub span: Span,
}

/// A pin declaration from an `IN` or `OUT` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDecl {
    /// The pin name.
    pub name: String,
    /// The declared bus width; `1` when no bracket suffix was given.
    /// Validated against the 1–16 limit during elaboration.
    pub width: u16,
    /// The span of the declaration lexeme.
    pub span: Span,
}

/// The body of a chip definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChipBody {
    /// `BUILTIN <implName>;` with an optional `CLOCKED <pin,...>;` list.
    Builtin {
        /// The registered implementation name.
        impl_name: String,
        /// The span of the implementation name.
        impl_span: Span,
        /// Pins declared clocked, with their spans.
        clocked: Vec<(String, Span)>,
    },
    /// `PARTS:` followed by sub-part instantiations.
    Parts {
        /// The sub-part instantiations, in source order.
        parts: Vec<PartDecl>,
    },
}

/// One sub-part instantiation: `<ChipName>(<pin>=<pin>, ...);`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDecl {
    /// The name of the chip this part instantiates.
    pub chip_name: String,
    /// The pin connections, in source order.
    pub wires: Vec<Wire>,
    /// The span of the part entry.
    pub span: Span,
}

/// One `leftPin=rightPin` connection inside a part instantiation.
///
/// The left side always names a pin of the part's own interface; the right
/// side names a pin or net of the enclosing chip (or `true`/`false`/`clk`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    /// The part-side pin reference (left of `=`).
    pub part_pin: PinRef,
    /// The chip-side pin reference (right of `=`).
    pub source: PinRef,
    /// The span of the whole pair.
    pub span: Span,
}

/// A sub-bus specification attached to a pin reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubSpec {
    /// `name[n]`: a single bit in a wiring context, or a declared width in
    /// an `IN`/`OUT` declaration.
    Index(u16),
    /// `name[lo..hi]`: an inclusive bit range.
    Range(u16, u16),
}

/// A pin reference: a name with an optional sub-bus suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    /// The pin or net name.
    pub name: String,
    /// The bracket suffix, if any.
    pub sub: Option<SubSpec>,
    /// The span of the full lexeme.
    pub span: Span,
}

impl PinRef {
    /// Splits an identifier lexeme into a name and optional [`SubSpec`].
    ///
    /// Accepts `name`, `name[n]`, and `name[lo..hi]`; anything else is a
    /// [`ParseError::MalformedPinRef`].
    pub fn parse(text: &str, span: Span) -> Result<PinRef, ParseError> {
        let malformed = || ParseError::MalformedPinRef {
            text: text.to_string(),
            span,
        };

        let Some(open) = text.find('[') else {
            return Ok(PinRef {
                name: text.to_string(),
                sub: None,
                span,
            });
        };
        if !text.ends_with(']') || open == 0 {
            return Err(malformed());
        }
        let name = &text[..open];
        let inside = &text[open + 1..text.len() - 1];

        let sub = if let Some((lo, hi)) = inside.split_once("..") {
            let lo: u16 = lo.parse().map_err(|_| malformed())?;
            let hi: u16 = hi.parse().map_err(|_| malformed())?;
            SubSpec::Range(lo, hi)
        } else {
            SubSpec::Index(inside.parse().map_err(|_| malformed())?)
        };
        Ok(PinRef {
            name: name.to_string(),
            sub: Some(sub),
            span,
        })
    }
}
