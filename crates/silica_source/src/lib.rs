//! Source file management and span tracking for HDL diagnostics.
//!
//! This crate provides the [`SourceDb`] for loading `.hdl` files, [`FileId`]
//! and [`Span`] for tracking byte ranges back to their source, and
//! [`ResolvedSpan`] for converting byte offsets to 1-based line/column
//! coordinates when diagnostics are rendered.

#![warn(missing_docs)]

pub mod db;
pub mod span;

pub use db::{ResolvedSpan, SourceDb, SourceFile};
pub use span::{FileId, Span};
