//! Runtime error types.

/// Errors produced while instantiating or driving a circuit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// A chip class references a builtin with no registered factory.
    ///
    /// Elaboration validates implementation names against its own registry,
    /// so this only occurs when a circuit is instantiated from a different
    /// registry than the one it was elaborated against.
    #[error("chip `{chip}` needs builtin `{impl_name}`, which is not registered")]
    MissingBuiltin {
        /// The chip whose class declares the builtin.
        chip: String,
        /// The missing implementation name.
        impl_name: String,
    },

    /// A pin name that is not part of the circuit's boundary.
    #[error("no pin named `{name}`")]
    UnknownPin {
        /// The requested name.
        name: String,
    },

    /// An attempt to drive a pin that is not an input.
    #[error("pin `{name}` is not an input")]
    NotAnInput {
        /// The requested name.
        name: String,
    },
}
