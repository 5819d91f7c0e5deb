//! Elaboration error types and their diagnostic codes.
//!
//! Error codes `E200`--`E215` cover chip resolution and wiring failures;
//! `E301` covers an unregistered builtin implementation. Front-end errors
//! pass through with their own codes.

use silica_diagnostics::{Category, Diagnostic, DiagnosticCode};
use silica_hdl::ParseError;
use silica_source::Span;
use std::path::PathBuf;

/// Errors produced while elaborating a chip class.
///
/// Elaboration is fail-fast: the first error aborts the chip's construction
/// and nothing is cached for it.
#[derive(Debug, thiserror::Error)]
pub enum ElabError {
    /// A chip source file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No `.hdl` file for the chip was found in any search directory.
    #[error("chip `{name}` not found in any search directory")]
    ChipNotFound {
        /// The chip name being resolved.
        name: String,
        /// The reference that triggered the lookup, if any.
        span: Span,
    },

    /// A front-end failure while lexing or parsing the chip's file.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The declared chip name does not match the file stem.
    #[error("chip `{declared}` must be defined in `{declared}.hdl`, found in `{file_stem}.hdl`")]
    NameMismatch {
        /// The name declared after `CHIP`.
        declared: String,
        /// The stem of the file it was found in.
        file_stem: String,
        /// The span of the declared name.
        span: Span,
    },

    /// The same name is declared more than once among a chip's pins.
    #[error("duplicate pin name `{name}`")]
    DuplicatePin {
        /// The repeated pin name.
        name: String,
        /// The later declaration.
        span: Span,
    },

    /// A declared bus width outside the supported range.
    #[error("pin `{name}` has width {width}; widths must be between 1 and {max}",
            max = silica_common::MAX_WIDTH)]
    InvalidWidth {
        /// The pin name.
        name: String,
        /// The declared width.
        width: u16,
        /// The declaration.
        span: Span,
    },

    /// A wire's left side names a pin the part does not have.
    #[error("part `{part}` has no pin `{pin}`")]
    UnknownPartPin {
        /// The part's chip name.
        part: String,
        /// The unknown pin name.
        pin: String,
        /// The reference.
        span: Span,
    },

    /// A boundary output used as a wire source.
    #[error("output pin `{pin}` cannot be used as a source")]
    SourceIsOutput {
        /// The output pin name.
        pin: String,
        /// The reference.
        span: Span,
    },

    /// A part output wired to a boundary input.
    #[error("input pin `{pin}` cannot be driven from inside the chip")]
    DestinationIsInput {
        /// The input pin name.
        pin: String,
        /// The reference.
        span: Span,
    },

    /// A sub-bus slice applied to an internal net or constant.
    #[error("sub-bus of `{name}` is not allowed here")]
    SubBusOfInternal {
        /// The sliced name.
        name: String,
        /// The reference.
        span: Span,
    },

    /// A slice that is inverted or exceeds its pin's width.
    #[error("bit range {range} is invalid for pin `{pin}` of width {width}")]
    BadSubBus {
        /// The pin name.
        pin: String,
        /// The offending range, rendered `[n]` or `[lo..hi]`.
        range: String,
        /// The pin's declared width.
        width: u16,
        /// The reference.
        span: Span,
    },

    /// The two sides of a wire have different effective widths.
    #[error("width mismatch: `{left}` is {left_width} bits wide but `{right}` is {right_width}")]
    WidthMismatch {
        /// The part-side reference text.
        left: String,
        /// The part-side effective width.
        left_width: u16,
        /// The chip-side reference text.
        right: String,
        /// The chip-side effective width.
        right_width: u16,
        /// The wire.
        span: Span,
    },

    /// More than one driver for the same bit of a pin or net.
    #[error("`{name}` is driven more than once")]
    MultiplyDriven {
        /// The multiply-driven pin or net name.
        name: String,
        /// The second driver.
        span: Span,
    },

    /// An internal net that is read but never driven.
    #[error("internal net `{name}` is never driven")]
    UndrivenNet {
        /// The undriven net name.
        name: String,
        /// The chip definition.
        span: Span,
    },

    /// A combinational dependency cycle among a chip's parts.
    #[error("chip `{chip}` contains a combinational cycle")]
    CombinationalCycle {
        /// The chip being elaborated.
        chip: String,
        /// The chip definition.
        span: Span,
    },

    /// A chip that (transitively) instantiates itself.
    #[error("circular chip inclusion: {chain}")]
    CircularInclusion {
        /// The inclusion chain, rendered `A -> B -> A`.
        chain: String,
        /// The reference that closed the cycle.
        span: Span,
    },

    /// A part output wired to a constant or the clock.
    #[error("`{name}` cannot be driven")]
    ConstantDriven {
        /// The constant or clock name.
        name: String,
        /// The wire.
        span: Span,
    },

    /// A `CLOCKED` list entry naming no declared boundary pin.
    #[error("clocked pin `{pin}` is not a declared input or output")]
    ClockedPinUnknown {
        /// The unknown pin name.
        pin: String,
        /// The list entry.
        span: Span,
    },

    /// A `BUILTIN` implementation name with no registered factory.
    #[error("no builtin implementation registered under `{impl_name}`")]
    UnknownBuiltin {
        /// The declared implementation name.
        impl_name: String,
        /// The declaration.
        span: Span,
    },
}

impl ElabError {
    /// Returns the stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ElabError::Parse(e) => return e.code(),
            ElabError::Io { .. } => 200,
            ElabError::ChipNotFound { .. } => 201,
            ElabError::NameMismatch { .. } => 202,
            ElabError::DuplicatePin { .. } => 203,
            ElabError::InvalidWidth { .. } => 204,
            ElabError::UnknownPartPin { .. } => 205,
            ElabError::SourceIsOutput { .. } => 206,
            ElabError::DestinationIsInput { .. } => 207,
            ElabError::SubBusOfInternal { .. } => 208,
            ElabError::BadSubBus { .. } => 209,
            ElabError::WidthMismatch { .. } => 210,
            ElabError::MultiplyDriven { .. } => 211,
            ElabError::UndrivenNet { .. } => 212,
            ElabError::CombinationalCycle { .. } => 213,
            ElabError::CircularInclusion { .. } => 214,
            ElabError::ClockedPinUnknown { .. } => 215,
            ElabError::ConstantDriven { .. } => 216,
            ElabError::UnknownBuiltin { .. } => 301,
        };
        DiagnosticCode::new(Category::Error, number)
    }

    /// Returns the span where the error was detected, if any.
    pub fn span(&self) -> Span {
        match self {
            ElabError::Parse(e) => e.span(),
            ElabError::Io { .. } => Span::DUMMY,
            ElabError::ChipNotFound { span, .. }
            | ElabError::NameMismatch { span, .. }
            | ElabError::DuplicatePin { span, .. }
            | ElabError::InvalidWidth { span, .. }
            | ElabError::UnknownPartPin { span, .. }
            | ElabError::SourceIsOutput { span, .. }
            | ElabError::DestinationIsInput { span, .. }
            | ElabError::SubBusOfInternal { span, .. }
            | ElabError::BadSubBus { span, .. }
            | ElabError::WidthMismatch { span, .. }
            | ElabError::MultiplyDriven { span, .. }
            | ElabError::UndrivenNet { span, .. }
            | ElabError::CombinationalCycle { span, .. }
            | ElabError::CircularInclusion { span, .. }
            | ElabError::ClockedPinUnknown { span, .. }
            | ElabError::ConstantDriven { span, .. }
            | ElabError::UnknownBuiltin { span, .. } => *span,
        }
    }

    /// Converts this error into a renderable [`Diagnostic`].
    pub fn into_diagnostic(self) -> Diagnostic {
        if let ElabError::Parse(e) = self {
            return e.into_diagnostic();
        }
        let code = self.code();
        let span = self.span();
        Diagnostic::error(code, self.to_string(), span)
    }
}
