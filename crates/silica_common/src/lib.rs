//! Shared foundational types for the silica chip simulator.
//!
//! This crate provides the 16-bit bus value helpers and the [`BitRange`]
//! sub-bus type used by both the elaborator (for width checking) and the
//! runtime (for masked/shifted signal propagation).

#![warn(missing_docs)]

pub mod bus;

pub use bus::{extract, inject, mask, BitRange, MAX_WIDTH};
