//! Combinational dependency analysis for composite chips.
//!
//! Builds a directed graph whose nodes are the chip's sub-parts, boundary
//! pins, internal nets, constants and the clock. An edge follows each wire
//! in the direction of signal flow, except through a clocked sub-part pin:
//! clocked pins latch on clock edges and carry no combinational dependency,
//! which is what lets feedback loops through flip-flops elaborate cleanly.
//!
//! From this graph we derive the fixed sub-part evaluation order, reject
//! combinational cycles, and classify every boundary pin as clocked or
//! combinational by path reachability.

use crate::class::{ChipClass, Connection, ConnectionKind, PinInfo};
use crate::errors::ElabError;
use petgraph::algo::{has_path_connecting, toposort, DfsSpace};
use petgraph::graph::{DiGraph, NodeIndex};
use silica_source::Span;
use std::sync::Arc;

/// A node in the combinational flow graph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum FlowNode {
    /// A sub-part, by index.
    Part(usize),
    /// A boundary input pin, by index.
    Input(usize),
    /// A boundary output pin, by index.
    Output(usize),
    /// An internal net, by index.
    Internal(usize),
    /// The constant-true source.
    True,
    /// The constant-false source.
    False,
    /// The clock source.
    Clock,
    /// Aggregator feeding every sub-part; keeps unconnected parts ordered.
    AllParts,
    /// Aggregator feeding every boundary input.
    AllInputs,
    /// Aggregator fed by every boundary output.
    AllOutputs,
}

/// The result of analyzing a composite chip's flow graph.
#[derive(Debug)]
pub(crate) struct FlowAnalysis {
    /// Sub-part indices in topological evaluation order.
    pub eval_order: Vec<usize>,
    /// Per-input clocked flags: no combinational path to any output.
    pub input_clocked: Vec<bool>,
    /// Per-output clocked flags: no combinational path from any input.
    pub output_clocked: Vec<bool>,
}

/// Analyzes the wiring of a composite chip.
///
/// Returns [`ElabError::CombinationalCycle`] if the parts cannot be
/// topologically ordered.
pub(crate) fn analyze(
    chip_name: &str,
    span: Span,
    inputs: &[PinInfo],
    outputs: &[PinInfo],
    internals: &[PinInfo],
    parts: &[Arc<ChipClass>],
    connections: &[Connection],
) -> Result<FlowAnalysis, ElabError> {
    let mut graph: DiGraph<FlowNode, ()> = DiGraph::new();

    let part_nodes: Vec<NodeIndex> =
        (0..parts.len()).map(|i| graph.add_node(FlowNode::Part(i))).collect();
    let input_nodes: Vec<NodeIndex> =
        (0..inputs.len()).map(|i| graph.add_node(FlowNode::Input(i))).collect();
    let output_nodes: Vec<NodeIndex> =
        (0..outputs.len()).map(|i| graph.add_node(FlowNode::Output(i))).collect();
    let internal_nodes: Vec<NodeIndex> =
        (0..internals.len()).map(|i| graph.add_node(FlowNode::Internal(i))).collect();
    let true_node = graph.add_node(FlowNode::True);
    let false_node = graph.add_node(FlowNode::False);
    let clock_node = graph.add_node(FlowNode::Clock);

    let all_parts = graph.add_node(FlowNode::AllParts);
    let all_inputs = graph.add_node(FlowNode::AllInputs);
    let all_outputs = graph.add_node(FlowNode::AllOutputs);
    for &p in &part_nodes {
        graph.add_edge(all_parts, p, ());
    }
    for &i in &input_nodes {
        graph.add_edge(all_inputs, i, ());
    }
    for &o in &output_nodes {
        graph.add_edge(o, all_outputs, ());
    }

    for conn in connections {
        let part_class = &parts[conn.part];
        // A clocked part pin latches on the clock edge and carries no
        // combinational dependency.
        let clocked = if conn.kind.part_side_is_input() {
            part_class.input_clocked[conn.part_pin]
        } else {
            part_class.output_clocked[conn.part_pin]
        };
        if clocked {
            continue;
        }
        let part = part_nodes[conn.part];
        match conn.kind {
            ConnectionKind::FromInput => {
                graph.add_edge(input_nodes[conn.chip_pin], part, ());
            }
            ConnectionKind::FromInternal => {
                graph.add_edge(internal_nodes[conn.chip_pin], part, ());
            }
            ConnectionKind::FromTrue => {
                graph.add_edge(true_node, part, ());
            }
            ConnectionKind::FromFalse => {
                graph.add_edge(false_node, part, ());
            }
            ConnectionKind::FromClock => {
                graph.add_edge(clock_node, part, ());
            }
            ConnectionKind::ToInternal => {
                graph.add_edge(part, internal_nodes[conn.chip_pin], ());
            }
            ConnectionKind::ToOutput => {
                graph.add_edge(part, output_nodes[conn.chip_pin], ());
            }
        }
    }

    let sorted = toposort(&graph, None).map_err(|_| ElabError::CombinationalCycle {
        chip: chip_name.to_string(),
        span,
    })?;
    let eval_order: Vec<usize> = sorted
        .into_iter()
        .filter_map(|ix| match graph[ix] {
            FlowNode::Part(i) => Some(i),
            _ => None,
        })
        .collect();

    let mut space = DfsSpace::new(&graph);
    let input_clocked: Vec<bool> = input_nodes
        .iter()
        .map(|&ix| !has_path_connecting(&graph, ix, all_outputs, Some(&mut space)))
        .collect();
    let output_clocked: Vec<bool> = output_nodes
        .iter()
        .map(|&ix| !has_path_connecting(&graph, all_inputs, ix, Some(&mut space)))
        .collect();

    Ok(FlowAnalysis {
        eval_order,
        input_clocked,
        output_clocked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{BuiltinSpec, ChipClassBody};

    fn gate(name: &str, n_in: usize) -> Arc<ChipClass> {
        let inputs = (0..n_in)
            .map(|i| PinInfo::new(format!("i{i}"), 1))
            .collect::<Vec<_>>();
        let input_clocked = vec![false; n_in];
        Arc::new(ChipClass::assemble(
            name.into(),
            inputs,
            vec![PinInfo::new("out", 1)],
            input_clocked,
            vec![false],
            ChipClassBody::Builtin(BuiltinSpec {
                impl_name: name.into(),
            }),
        ))
    }

    fn dff() -> Arc<ChipClass> {
        Arc::new(ChipClass::assemble(
            "DFF".into(),
            vec![PinInfo::new("in", 1)],
            vec![PinInfo::new("out", 1)],
            vec![true],
            vec![true],
            ChipClassBody::Builtin(BuiltinSpec {
                impl_name: "DFF".into(),
            }),
        ))
    }

    fn conn(kind: ConnectionKind, part: usize, part_pin: usize, chip_pin: usize) -> Connection {
        Connection {
            kind,
            part,
            part_pin,
            part_range: None,
            chip_pin,
            chip_range: None,
        }
    }

    #[test]
    fn chain_orders_parts_by_dataflow() {
        // in -> part1 -> net -> part0 -> out, declared in reverse order.
        let parts = vec![gate("Not", 1), gate("Not", 1)];
        let inputs = [PinInfo::new("in", 1)];
        let outputs = [PinInfo::new("out", 1)];
        let internals = [PinInfo::new("mid", 1)];
        let connections = [
            conn(ConnectionKind::FromInternal, 0, 0, 0),
            conn(ConnectionKind::ToOutput, 0, 0, 0),
            conn(ConnectionKind::FromInput, 1, 0, 0),
            conn(ConnectionKind::ToInternal, 1, 0, 0),
        ];
        let analysis = analyze(
            "Chain",
            Span::DUMMY,
            &inputs,
            &outputs,
            &internals,
            &parts,
            &connections,
        )
        .unwrap();
        assert_eq!(analysis.eval_order, vec![1, 0]);
        assert_eq!(analysis.input_clocked, vec![false]);
        assert_eq!(analysis.output_clocked, vec![false]);
    }

    #[test]
    fn combinational_loop_is_rejected() {
        // Two gates feeding each other through two nets.
        let parts = vec![gate("Not", 1), gate("Not", 1)];
        let internals = [PinInfo::new("a", 1), PinInfo::new("b", 1)];
        let connections = [
            conn(ConnectionKind::FromInternal, 0, 0, 0),
            conn(ConnectionKind::ToInternal, 0, 0, 1),
            conn(ConnectionKind::FromInternal, 1, 0, 1),
            conn(ConnectionKind::ToInternal, 1, 0, 0),
        ];
        let err = analyze("Loop", Span::DUMMY, &[], &[], &internals, &parts, &connections)
            .unwrap_err();
        assert!(matches!(err, ElabError::CombinationalCycle { chip, .. } if chip == "Loop"));
    }

    #[test]
    fn flipflop_breaks_the_loop() {
        // Not output loops back through a DFF: legal, and the DFF's
        // clocked pins cut both edges of the cycle.
        let parts = vec![gate("Not", 1), dff()];
        let outputs = [PinInfo::new("out", 1)];
        let internals = [PinInfo::new("q", 1), PinInfo::new("nq", 1)];
        let connections = [
            conn(ConnectionKind::FromInternal, 0, 0, 0),
            conn(ConnectionKind::ToInternal, 0, 0, 1),
            conn(ConnectionKind::FromInternal, 1, 0, 1),
            conn(ConnectionKind::ToInternal, 1, 0, 0),
            conn(ConnectionKind::ToOutput, 0, 0, 0),
        ];
        let analysis =
            analyze("Toggle", Span::DUMMY, &[], &outputs, &internals, &parts, &connections)
                .unwrap();
        assert_eq!(analysis.eval_order.len(), 2);
        // No input feeds the output combinationally, so it is clocked.
        assert_eq!(analysis.output_clocked, vec![true]);
    }

    #[test]
    fn clocked_input_has_no_path_to_outputs() {
        // in -> DFF -> out: the input only reaches the output through a
        // latch, so both boundary pins classify as clocked.
        let parts = vec![dff()];
        let inputs = [PinInfo::new("in", 1)];
        let outputs = [PinInfo::new("out", 1)];
        let connections = [
            conn(ConnectionKind::FromInput, 0, 0, 0),
            conn(ConnectionKind::ToOutput, 0, 0, 0),
        ];
        let analysis =
            analyze("Latch", Span::DUMMY, &inputs, &outputs, &[], &parts, &connections).unwrap();
        assert_eq!(analysis.input_clocked, vec![true]);
        assert_eq!(analysis.output_clocked, vec![true]);
    }

    #[test]
    fn passthrough_pins_are_combinational() {
        let parts = vec![gate("And", 2)];
        let inputs = [PinInfo::new("a", 1), PinInfo::new("b", 1)];
        let outputs = [PinInfo::new("out", 1)];
        let connections = [
            conn(ConnectionKind::FromInput, 0, 0, 0),
            conn(ConnectionKind::FromInput, 0, 1, 1),
            conn(ConnectionKind::ToOutput, 0, 0, 0),
        ];
        let analysis =
            analyze("And2", Span::DUMMY, &inputs, &outputs, &[], &parts, &connections).unwrap();
        assert_eq!(analysis.eval_order, vec![0]);
        assert_eq!(analysis.input_clocked, vec![false, false]);
        assert_eq!(analysis.output_clocked, vec![false]);
    }

    #[test]
    fn unconnected_part_still_appears_in_order() {
        let parts = vec![gate("Not", 1)];
        let analysis = analyze("Floating", Span::DUMMY, &[], &[], &[], &parts, &[]).unwrap();
        assert_eq!(analysis.eval_order, vec![0]);
    }
}
