//! Chip elaboration: from parsed HDL to immutable, cached chip blueprints.
//!
//! The entry point is [`ElabContext`], which resolves chip names to `.hdl`
//! files, elaborates them (recursively for composite chips), and caches the
//! resulting [`ChipClass`] blueprints by canonical path. Composite
//! elaboration builds a dependency graph over sub-parts, pins and internal
//! nets, topologically orders the sub-parts for evaluation, rejects
//! combinational cycles, and derives the clocked/combinational classification
//! of every boundary pin.
//!
//! Elaboration is fail-fast and atomic: any error aborts the chip's
//! construction and nothing is cached.

#![warn(missing_docs)]

pub mod builtin;
pub mod class;
pub mod composite;
pub mod context;
pub mod errors;
pub mod graph;

pub use builtin::{BuiltinChip, BuiltinRegistry};
pub use class::{
    BuiltinSpec, ChipClass, ChipClassBody, CompositeSpec, Connection, ConnectionKind,
    PinInfo, PinKind,
};
pub use context::ElabContext;
pub use errors::ElabError;
