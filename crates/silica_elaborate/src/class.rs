//! Immutable chip blueprints: pins, connections, and class variants.

use silica_common::BitRange;
use std::collections::HashMap;
use std::sync::Arc;

/// The kind of a named pin within a chip class's namespace.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PinKind {
    /// A boundary input pin.
    Input,
    /// A boundary output pin.
    Output,
    /// An internal net of a composite chip.
    Internal,
    /// The name does not exist in this class.
    Unknown,
}

/// A named, widthed pin descriptor.
///
/// The `driven` bitmask records which bits already have a driver; it is
/// consulted only during composite elaboration to enforce the single-writer
/// ("fed once") rule and is of no significance afterwards.
#[derive(Clone, Debug)]
pub struct PinInfo {
    /// The pin name.
    pub name: String,
    /// The bus width in bits (1–16).
    pub width: u16,
    pub(crate) driven: u16,
}

impl PinInfo {
    /// Creates a pin descriptor with no driven bits.
    pub fn new(name: impl Into<String>, width: u16) -> Self {
        Self {
            name: name.into(),
            width,
            driven: 0,
        }
    }

    /// Marks the bits of `range` as driven. Returns `false` if any of them
    /// already had a driver.
    pub(crate) fn mark_driven(&mut self, range: BitRange) -> bool {
        let bits = silica_common::mask(range.width()) << range.lo;
        if self.driven & bits != 0 {
            return false;
        }
        self.driven |= bits;
        true
    }

    /// Returns `true` if at least one bit of this pin has a driver.
    pub(crate) fn has_driver(&self) -> bool {
        self.driven != 0
    }
}

/// The kind tag of one wire in a composite chip.
///
/// There is deliberately no `FromOutput` kind: a boundary output can never
/// act as a source, and a part output can never feed a boundary input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConnectionKind {
    /// Boundary input → part input.
    FromInput,
    /// Internal net → part input.
    FromInternal,
    /// Constant true → part input.
    FromTrue,
    /// Constant false → part input.
    FromFalse,
    /// The clock → part input.
    FromClock,
    /// Part output → internal net.
    ToInternal,
    /// Part output → boundary output.
    ToOutput,
}

impl ConnectionKind {
    /// Returns `true` if the part-side pin of this connection is one of the
    /// part's inputs (as opposed to one of its outputs).
    pub fn part_side_is_input(self) -> bool {
        !matches!(self, ConnectionKind::ToInternal | ConnectionKind::ToOutput)
    }
}

/// An immutable description of one wire inside a composite chip.
#[derive(Clone, Copy, Debug)]
pub struct Connection {
    /// The kind tag.
    pub kind: ConnectionKind,
    /// Index of the sub-part this wire touches.
    pub part: usize,
    /// Pin index within the part's input or output list, per
    /// [`ConnectionKind::part_side_is_input`].
    pub part_pin: usize,
    /// Optional sub-bus slice on the part side.
    pub part_range: Option<BitRange>,
    /// Boundary pin or internal net index on the chip side; meaningless
    /// (zero) for the constant and clock kinds.
    pub chip_pin: usize,
    /// Optional sub-bus slice on the chip side.
    pub chip_range: Option<BitRange>,
}

/// The builtin variant of a chip class: a registered implementation name.
#[derive(Clone, Debug)]
pub struct BuiltinSpec {
    /// The implementation name declared after `BUILTIN`, validated against
    /// the registry at elaboration time.
    pub impl_name: String,
}

/// The composite variant of a chip class.
#[derive(Clone, Debug)]
pub struct CompositeSpec {
    /// Internal net descriptors, in order of first reference.
    pub internals: Vec<PinInfo>,
    /// Sub-part classes, in source order.
    pub parts: Vec<Arc<ChipClass>>,
    /// All wires, in source order.
    pub connections: Vec<Connection>,
    /// Part indices in topological evaluation order, fixed at elaboration
    /// and reused by every instance.
    pub eval_order: Vec<usize>,
}

/// The body variant of a chip class.
#[derive(Clone, Debug)]
pub enum ChipClassBody {
    /// A natively implemented chip.
    Builtin(BuiltinSpec),
    /// A chip composed of wired sub-parts.
    Composite(CompositeSpec),
}

/// An immutable, elaborated chip blueprint.
///
/// Created once per `.hdl` file by the [`ElabContext`](crate::ElabContext)
/// and shared via `Arc`; never mutated after creation.
#[derive(Debug)]
pub struct ChipClass {
    /// The chip name.
    pub name: String,
    /// Ordered input pin descriptors.
    pub inputs: Vec<PinInfo>,
    /// Ordered output pin descriptors.
    pub outputs: Vec<PinInfo>,
    /// Per-input clocked flags, aligned with `inputs`.
    pub input_clocked: Vec<bool>,
    /// Per-output clocked flags, aligned with `outputs`.
    pub output_clocked: Vec<bool>,
    /// `true` if any boundary pin is clocked.
    pub is_clocked: bool,
    /// The builtin or composite body.
    pub body: ChipClassBody,
    pin_table: HashMap<String, (PinKind, usize)>,
}

impl ChipClass {
    /// Assembles a class, building the name → (kind, index) pin table.
    ///
    /// Pin names are unique across inputs, outputs and internal nets; the
    /// elaborator rejects duplicates before calling this.
    pub(crate) fn assemble(
        name: String,
        inputs: Vec<PinInfo>,
        outputs: Vec<PinInfo>,
        input_clocked: Vec<bool>,
        output_clocked: Vec<bool>,
        body: ChipClassBody,
    ) -> Self {
        let mut pin_table = HashMap::new();
        for (i, pin) in inputs.iter().enumerate() {
            pin_table.insert(pin.name.clone(), (PinKind::Input, i));
        }
        for (i, pin) in outputs.iter().enumerate() {
            pin_table.insert(pin.name.clone(), (PinKind::Output, i));
        }
        if let ChipClassBody::Composite(spec) = &body {
            for (i, pin) in spec.internals.iter().enumerate() {
                pin_table.insert(pin.name.clone(), (PinKind::Internal, i));
            }
        }
        let is_clocked =
            input_clocked.iter().any(|&c| c) || output_clocked.iter().any(|&c| c);
        Self {
            name,
            inputs,
            outputs,
            input_clocked,
            output_clocked,
            is_clocked,
            body,
            pin_table,
        }
    }

    /// Returns the kind of the named pin, or [`PinKind::Unknown`].
    pub fn pin_kind(&self, name: &str) -> PinKind {
        self.pin_table
            .get(name)
            .map(|&(kind, _)| kind)
            .unwrap_or(PinKind::Unknown)
    }

    /// Returns the index of the named pin within its kind's table.
    pub fn pin_index(&self, name: &str) -> Option<usize> {
        self.pin_table.get(name).map(|&(_, idx)| idx)
    }

    /// Looks up a boundary pin (input or output) by name.
    ///
    /// Internal nets are not part of a chip's interface and are not visible
    /// to enclosing chips.
    pub fn boundary_pin(&self, name: &str) -> Option<(PinKind, usize)> {
        match self.pin_table.get(name) {
            Some(&(kind @ (PinKind::Input | PinKind::Output), idx)) => Some((kind, idx)),
            _ => None,
        }
    }
}
