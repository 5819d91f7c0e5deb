//! Shared helpers for CLI commands: elaboration and diagnostic rendering.

use std::path::PathBuf;
use std::sync::Arc;

use silica_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use silica_elaborate::{BuiltinRegistry, ChipClass, ElabContext};
use silica_sim::standard_registry;
use silica_source::Span;

/// The builtin registry every CLI session uses.
pub fn registry() -> BuiltinRegistry {
    standard_registry()
}

/// Elaborates `chip` against the search directories.
///
/// On failure the error is rendered to stderr with source context and
/// `None` is returned; callers translate that into a nonzero exit code.
pub fn elaborate(
    chip: &str,
    dirs: &[PathBuf],
    registry: &BuiltinRegistry,
) -> Option<Arc<ChipClass>> {
    let mut ctx = ElabContext::new(registry, dirs.to_vec());
    match ctx.lookup_or_elaborate(chip, Span::DUMMY) {
        Ok(class) => Some(class),
        Err(e) => {
            let renderer = TerminalRenderer::new();
            eprint!("{}", renderer.render(&e.into_diagnostic(), ctx.source_db()));
            None
        }
    }
}

/// Parses a `pin=value` assignment. Values accept decimal, `0x` hex, and
/// `0b` binary forms.
pub fn parse_assignment(text: &str) -> Result<(String, u16), String> {
    let Some((pin, value)) = text.split_once('=') else {
        return Err(format!("expected `pin=value`, got `{text}`"));
    };
    let pin = pin.trim();
    if pin.is_empty() {
        return Err(format!("missing pin name in `{text}`"));
    }
    let value = value.trim();
    let parsed = if let Some(hex) = value.strip_prefix("0x") {
        u16::from_str_radix(hex, 16)
    } else if let Some(bin) = value.strip_prefix("0b") {
        u16::from_str_radix(bin, 2)
    } else {
        value.parse()
    };
    match parsed {
        Ok(v) => Ok((pin.to_string(), v)),
        Err(_) => Err(format!("invalid value `{value}` for pin `{pin}`")),
    }
}
