//! Gate-level simulation of elaborated chips.
//!
//! [`Circuit::instantiate`] turns an immutable
//! [`ChipClass`](silica_elaborate::ChipClass) blueprint into a live circuit:
//! a flat arena of signal nodes wired by sliced links, driven through
//! dirty-flag evaluation and a two-phase clock. The [`builtins`] module
//! supplies the standard primitive chip implementations.

#![warn(missing_docs)]

pub mod builtins;
pub mod circuit;
pub mod error;

pub use builtins::standard_registry;
pub use circuit::Circuit;
pub use error::SimError;
