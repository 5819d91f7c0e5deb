//! Structured diagnostics for HDL elaboration errors.
//!
//! Provides [`Diagnostic`] messages with severity levels, stable error codes,
//! and source labels; the thread-safe [`DiagnosticSink`] accumulator; and the
//! [`TerminalRenderer`] that formats diagnostics with file/line/column
//! coordinates resolved through a `SourceDb`.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod render;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use render::{DiagnosticRenderer, TerminalRenderer};
pub use sink::DiagnosticSink;
