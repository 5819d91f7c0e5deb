//! The builtin-chip trait and the name-keyed implementation registry.
//!
//! A `BUILTIN <implName>;` declaration binds a chip to a natively
//! implemented evaluation routine. The embedding application populates a
//! [`BuiltinRegistry`] at startup; the elaborator validates names against it
//! and the runtime instantiates implementations from it. The core never
//! performs dynamic symbol lookup.

use std::collections::HashMap;

/// A natively implemented chip evaluation routine.
///
/// Input and output slices are ordered exactly as the chip's declared pin
/// lists. Values arrive masked to their pin widths; written outputs are
/// masked by the runtime before propagation.
pub trait BuiltinChip {
    /// Computes output values from the current input values.
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]);

    /// First clock phase: captures next state from the current inputs
    /// without touching outputs. No-op for combinational chips.
    fn clock_up(&mut self, _inputs: &[u16]) {}

    /// Second clock phase: commits the state captured at `clock_up` to the
    /// outputs. No-op for combinational chips.
    fn clock_down(&mut self, _outputs: &mut [u16]) {}
}

type BuiltinFactory = Box<dyn Fn() -> Box<dyn BuiltinChip> + Send + Sync>;

/// A registry mapping `BUILTIN` implementation names to factories.
///
/// Each gate instance gets a fresh implementation from its factory, so
/// stateful chips (registers, memories) never share state across instances.
#[derive(Default)]
pub struct BuiltinRegistry {
    factories: HashMap<String, BuiltinFactory>,
}

impl BuiltinRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under the given implementation name.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn BuiltinChip> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Returns `true` if an implementation is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Creates a fresh implementation instance, or `None` if unregistered.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn BuiltinChip>> {
        self.factories.get(name).map(|f| f())
    }
}
