//! The gate-level runtime: node arena, dirty tracking, and clocked update.
//!
//! A [`Circuit`] instantiates a [`ChipClass`] into a flat arena of signal
//! nodes plus a tree of gates. Directed links carry values between nodes
//! with optional bit-range slicing on either end; setting a node runs an
//! iterative worklist until the affected fan-out settles, marking watching
//! gates dirty along the way. Evaluation then visits dirty gates in the
//! precomputed topological order. Clocked state advances in two phases:
//! [`Circuit::tick`] raises the clock and lets clocked chips capture next
//! state, [`Circuit::tock`] lowers it and commits.

use crate::error::SimError;
use silica_common::{extract, inject, mask, BitRange, MAX_WIDTH};
use silica_elaborate::{
    BuiltinChip, BuiltinRegistry, ChipClass, ChipClassBody, ConnectionKind, PinKind,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Identifies a signal node in a circuit's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a gate in a circuit's gate tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GateId(u32);

impl GateId {
    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A directed value transfer between two nodes.
///
/// `src` slices the source node's value before transfer; `dst` injects the
/// transferred bits into a sub-range of the target, preserving the rest.
#[derive(Clone, Copy, Debug)]
struct Link {
    target: NodeId,
    src: Option<BitRange>,
    dst: Option<BitRange>,
}

enum GateKind {
    Builtin {
        imp: Box<dyn BuiltinChip>,
        inputs: Vec<NodeId>,
        outputs: Vec<NodeId>,
    },
    Composite {
        /// Child gates in topological evaluation order.
        parts: Vec<GateId>,
    },
}

struct Gate {
    dirty: bool,
    clocked: bool,
    parent: Option<GateId>,
    kind: GateKind,
}

/// A live, stateful instance of an elaborated chip.
pub struct Circuit {
    class: Arc<ChipClass>,
    values: Vec<u16>,
    widths: Vec<u16>,
    links: Vec<Vec<Link>>,
    watchers: Vec<Vec<GateId>>,
    gates: Vec<Gate>,
    top: GateId,
    false_node: NodeId,
    true_node: NodeId,
    clock_node: NodeId,
    pin_map: HashMap<String, NodeId>,
}

// The builtin trait objects inside the gate tree have no `Debug`, so the
// derive is unavailable; summarize the instance instead.
impl std::fmt::Debug for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Circuit")
            .field("class", &self.class.name)
            .field("nodes", &self.values.len())
            .field("gates", &self.gates.len())
            .finish_non_exhaustive()
    }
}

impl Circuit {
    /// Instantiates a chip class, creating fresh builtin state throughout.
    ///
    /// The registry must cover every builtin the class (transitively)
    /// declares; elaborating and instantiating against the same registry
    /// guarantees that.
    pub fn instantiate(
        class: &Arc<ChipClass>,
        registry: &BuiltinRegistry,
    ) -> Result<Self, SimError> {
        let mut circuit = Circuit {
            class: Arc::clone(class),
            values: Vec::new(),
            widths: Vec::new(),
            links: Vec::new(),
            watchers: Vec::new(),
            gates: Vec::new(),
            top: GateId(0),
            false_node: NodeId(0),
            true_node: NodeId(0),
            clock_node: NodeId(0),
            pin_map: HashMap::new(),
        };
        circuit.false_node = circuit.alloc_node(1);
        circuit.true_node = circuit.alloc_node(MAX_WIDTH);
        circuit.clock_node = circuit.alloc_node(1);

        let inputs: Vec<NodeId> = class
            .inputs
            .iter()
            .map(|pin| circuit.alloc_node(pin.width))
            .collect();
        let outputs: Vec<NodeId> = class
            .outputs
            .iter()
            .map(|pin| circuit.alloc_node(pin.width))
            .collect();
        for (pin, &node) in class.inputs.iter().zip(&inputs) {
            circuit.pin_map.insert(pin.name.clone(), node);
        }
        for (pin, &node) in class.outputs.iter().zip(&outputs) {
            circuit.pin_map.insert(pin.name.clone(), node);
        }

        circuit.top = circuit.build_gate(class, registry, None, &inputs, &outputs)?;

        // Seeding the constant propagates it through every FromTrue link.
        let true_node = circuit.true_node;
        circuit.set_node(true_node, u16::MAX);
        Ok(circuit)
    }

    /// Returns the chip class this circuit instantiates.
    pub fn class(&self) -> &ChipClass {
        &self.class
    }

    /// Returns `true` if the circuit holds clocked state.
    pub fn is_clocked(&self) -> bool {
        self.class.is_clocked
    }

    /// Returns the current clock level.
    pub fn clock(&self) -> bool {
        self.values[self.clock_node.as_usize()] != 0
    }

    /// Drives a boundary input pin and propagates the change.
    pub fn set_pin(&mut self, name: &str, value: u16) -> Result<(), SimError> {
        match self.class.pin_kind(name) {
            PinKind::Input => {
                let node = self.pin_map[name];
                self.set_node(node, value);
                Ok(())
            }
            PinKind::Unknown => Err(SimError::UnknownPin { name: name.into() }),
            _ => Err(SimError::NotAnInput { name: name.into() }),
        }
    }

    /// Reads the current value of a boundary pin or top-level internal net.
    pub fn get_pin(&self, name: &str) -> Result<u16, SimError> {
        self.pin_map
            .get(name)
            .map(|&node| self.values[node.as_usize()])
            .ok_or_else(|| SimError::UnknownPin { name: name.into() })
    }

    /// Re-evaluates every dirty gate. A no-op when nothing changed since
    /// the last evaluation.
    pub fn eval(&mut self) {
        self.eval_gate(self.top);
    }

    /// First half of a clock cycle: settle combinational logic, raise the
    /// clock, and let clocked chips capture their next state. Outputs keep
    /// their pre-edge values until [`Circuit::tock`].
    pub fn tick(&mut self) {
        self.eval();
        let clock = self.clock_node;
        self.set_node(clock, 1);
        self.clock_up_gate(self.top);
    }

    /// Second half of a clock cycle: lower the clock, commit captured state
    /// to outputs, and settle the results.
    pub fn tock(&mut self) {
        let clock = self.clock_node;
        self.set_node(clock, 0);
        self.clock_down_gate(self.top);
        self.eval();
    }

    /// A full clock cycle.
    pub fn cycle(&mut self) {
        self.tick();
        self.tock();
    }

    fn alloc_node(&mut self, width: u16) -> NodeId {
        let id = NodeId(self.values.len() as u32);
        self.values.push(0);
        self.widths.push(width);
        self.links.push(Vec::new());
        self.watchers.push(Vec::new());
        id
    }

    /// Builds the gate for `class`, wiring it to the caller-allocated
    /// boundary nodes. The gate is allocated before its children so that
    /// parent links are in place for dirty propagation.
    fn build_gate(
        &mut self,
        class: &Arc<ChipClass>,
        registry: &BuiltinRegistry,
        parent: Option<GateId>,
        inputs: &[NodeId],
        outputs: &[NodeId],
    ) -> Result<GateId, SimError> {
        let gate_id = GateId(self.gates.len() as u32);
        self.gates.push(Gate {
            dirty: true,
            clocked: class.is_clocked,
            parent,
            kind: GateKind::Composite { parts: Vec::new() },
        });

        match &class.body {
            ChipClassBody::Builtin(spec) => {
                let imp = registry.instantiate(&spec.impl_name).ok_or_else(|| {
                    SimError::MissingBuiltin {
                        chip: class.name.clone(),
                        impl_name: spec.impl_name.clone(),
                    }
                })?;
                // Clocked inputs do not trigger combinational re-evaluation;
                // they are sampled during the clock phases instead.
                for (i, &node) in inputs.iter().enumerate() {
                    if !class.input_clocked[i] {
                        self.watchers[node.as_usize()].push(gate_id);
                    }
                }
                self.gates[gate_id.as_usize()].kind = GateKind::Builtin {
                    imp,
                    inputs: inputs.to_vec(),
                    outputs: outputs.to_vec(),
                };
            }
            ChipClassBody::Composite(spec) => {
                let internals: Vec<NodeId> = spec
                    .internals
                    .iter()
                    .map(|pin| self.alloc_node(pin.width))
                    .collect();
                // The top chip's internal nets are observable by name;
                // nets of nested parts stay private to their instance.
                if parent.is_none() {
                    for (pin, &node) in spec.internals.iter().zip(&internals) {
                        self.pin_map.insert(pin.name.clone(), node);
                    }
                }
                let part_inputs: Vec<Vec<NodeId>> = spec
                    .parts
                    .iter()
                    .map(|part| {
                        part.inputs.iter().map(|pin| self.alloc_node(pin.width)).collect()
                    })
                    .collect();
                let part_outputs: Vec<Vec<NodeId>> = spec
                    .parts
                    .iter()
                    .map(|part| {
                        part.outputs.iter().map(|pin| self.alloc_node(pin.width)).collect()
                    })
                    .collect();

                for conn in &spec.connections {
                    let part_in = || part_inputs[conn.part][conn.part_pin];
                    let part_out = || part_outputs[conn.part][conn.part_pin];
                    let (from, to, src, dst) = match conn.kind {
                        ConnectionKind::FromInput => (
                            inputs[conn.chip_pin],
                            part_in(),
                            conn.chip_range,
                            conn.part_range,
                        ),
                        ConnectionKind::FromInternal => {
                            (internals[conn.chip_pin], part_in(), None, conn.part_range)
                        }
                        ConnectionKind::FromTrue => {
                            (self.true_node, part_in(), None, conn.part_range)
                        }
                        ConnectionKind::FromFalse => {
                            (self.false_node, part_in(), None, conn.part_range)
                        }
                        ConnectionKind::FromClock => {
                            (self.clock_node, part_in(), None, conn.part_range)
                        }
                        ConnectionKind::ToInternal => {
                            (part_out(), internals[conn.chip_pin], conn.part_range, None)
                        }
                        ConnectionKind::ToOutput => (
                            part_out(),
                            outputs[conn.chip_pin],
                            conn.part_range,
                            conn.chip_range,
                        ),
                    };
                    self.links[from.as_usize()].push(Link { target: to, src, dst });
                }

                let mut child_ids = Vec::with_capacity(spec.parts.len());
                for (i, part) in spec.parts.iter().enumerate() {
                    child_ids.push(self.build_gate(
                        part,
                        registry,
                        Some(gate_id),
                        &part_inputs[i],
                        &part_outputs[i],
                    )?);
                }
                let parts = spec.eval_order.iter().map(|&i| child_ids[i]).collect();
                self.gates[gate_id.as_usize()].kind = GateKind::Composite { parts };
            }
        }
        Ok(gate_id)
    }

    /// Writes a node and propagates through its fan-out until values settle,
    /// marking watching gates (and their ancestors) dirty on every change.
    fn set_node(&mut self, node: NodeId, value: u16) {
        let n = node.as_usize();
        let masked = value & mask(self.widths[n]);
        if self.values[n] == masked {
            return;
        }
        self.values[n] = masked;
        self.wake_watchers(node);

        let mut work = vec![node];
        while let Some(cur) = work.pop() {
            let c = cur.as_usize();
            for i in 0..self.links[c].len() {
                let link = self.links[c][i];
                let t = link.target.as_usize();
                let carried = match link.src {
                    Some(range) => extract(self.values[c], range),
                    None => self.values[c],
                };
                let updated = match link.dst {
                    Some(range) => inject(self.values[t], carried, range),
                    None => carried & mask(self.widths[t]),
                };
                if updated != self.values[t] {
                    self.values[t] = updated;
                    self.wake_watchers(link.target);
                    work.push(link.target);
                }
            }
        }
    }

    fn wake_watchers(&mut self, node: NodeId) {
        for i in 0..self.watchers[node.as_usize()].len() {
            let gate = self.watchers[node.as_usize()][i];
            self.mark_dirty(gate);
        }
    }

    fn mark_dirty(&mut self, gate: GateId) {
        let mut cur = Some(gate);
        while let Some(id) = cur {
            let gate = &mut self.gates[id.as_usize()];
            if gate.dirty {
                break;
            }
            gate.dirty = true;
            cur = gate.parent;
        }
    }

    fn eval_gate(&mut self, gate: GateId) {
        let g = gate.as_usize();
        if !self.gates[g].dirty {
            return;
        }
        match &self.gates[g].kind {
            GateKind::Composite { parts } => {
                let parts = parts.clone();
                for part in parts {
                    self.eval_gate(part);
                }
                // Cleared after the children: their output changes re-mark
                // this gate through the parent chain.
                self.gates[g].dirty = false;
            }
            GateKind::Builtin { inputs, outputs, .. } => {
                let input_ids = inputs.clone();
                let output_ids = outputs.clone();
                self.gates[g].dirty = false;

                let in_vals: Vec<u16> = input_ids
                    .iter()
                    .map(|&n| self.values[n.as_usize()])
                    .collect();
                let mut out_vals: Vec<u16> = output_ids
                    .iter()
                    .map(|&n| self.values[n.as_usize()])
                    .collect();
                if let GateKind::Builtin { imp, .. } = &mut self.gates[g].kind {
                    imp.eval(&in_vals, &mut out_vals);
                }
                for (&node, &val) in output_ids.iter().zip(&out_vals) {
                    self.set_node(node, val);
                }
            }
        }
    }

    fn clock_up_gate(&mut self, gate: GateId) {
        let g = gate.as_usize();
        if !self.gates[g].clocked {
            return;
        }
        match &self.gates[g].kind {
            GateKind::Composite { parts } => {
                let parts = parts.clone();
                for part in parts {
                    self.eval_gate(part);
                    self.clock_up_gate(part);
                }
            }
            GateKind::Builtin { inputs, .. } => {
                let input_ids = inputs.clone();
                let in_vals: Vec<u16> = input_ids
                    .iter()
                    .map(|&n| self.values[n.as_usize()])
                    .collect();
                if let GateKind::Builtin { imp, .. } = &mut self.gates[g].kind {
                    imp.clock_up(&in_vals);
                }
            }
        }
    }

    fn clock_down_gate(&mut self, gate: GateId) {
        let g = gate.as_usize();
        if !self.gates[g].clocked {
            return;
        }
        match &self.gates[g].kind {
            GateKind::Composite { parts } => {
                let parts = parts.clone();
                for part in parts {
                    self.clock_down_gate(part);
                    self.eval_gate(part);
                }
            }
            GateKind::Builtin { outputs, .. } => {
                let output_ids = outputs.clone();
                let mut out_vals: Vec<u16> = output_ids
                    .iter()
                    .map(|&n| self.values[n.as_usize()])
                    .collect();
                if let GateKind::Builtin { imp, .. } = &mut self.gates[g].kind {
                    imp.clock_down(&mut out_vals);
                }
                for (&node, &val) in output_ids.iter().zip(&out_vals) {
                    self.set_node(node, val);
                }
            }
        }
    }
}
