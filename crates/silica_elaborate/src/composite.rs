//! Composite-chip elaboration: wire validation and blueprint assembly.
//!
//! Walks a `PARTS:` body wire by wire, resolving each side of every
//! `leftPin=rightPin` pair, enforcing the single-writer rule on outputs,
//! internal nets and part inputs, and materializing internal nets on first
//! reference. The validated connection list then goes through
//! [`graph::analyze`](crate::graph) for ordering and pin classification.

use crate::class::{
    ChipClass, ChipClassBody, CompositeSpec, Connection, ConnectionKind, PinInfo, PinKind,
};
use crate::context::ElabContext;
use crate::errors::ElabError;
use crate::graph;
use silica_common::{mask, BitRange};
use silica_hdl::{ChipDecl, PartDecl, PinRef, SubSpec};
use std::collections::HashMap;
use std::sync::Arc;

/// Validates a pin reference's bracket suffix against the pin's width.
fn resolve_range(pin: &PinRef, width: u16) -> Result<Option<BitRange>, ElabError> {
    let Some(sub) = pin.sub else {
        return Ok(None);
    };
    let (lo, hi, text) = match sub {
        SubSpec::Index(n) => (n, n, format!("[{n}]")),
        SubSpec::Range(lo, hi) => (lo, hi, format!("[{lo}..{hi}]")),
    };
    if lo > hi || hi >= width {
        return Err(ElabError::BadSubBus {
            pin: pin.name.clone(),
            range: text,
            width,
            span: pin.span,
        });
    }
    Ok(Some(BitRange::new(lo, hi)))
}

fn ref_text(name: &str, range: Option<BitRange>) -> String {
    match range {
        Some(r) => format!("{name}{r}"),
        None => name.to_string(),
    }
}

fn width_of(range: Option<BitRange>, pin_width: u16) -> u16 {
    range.map(|r| r.width()).unwrap_or(pin_width)
}

/// Elaborates a `PARTS:` body into a composite [`ChipClass`].
pub(crate) fn elaborate(
    ctx: &mut ElabContext<'_>,
    decl: &ChipDecl,
    inputs: Vec<PinInfo>,
    mut outputs: Vec<PinInfo>,
    part_decls: &[PartDecl],
) -> Result<ChipClass, ElabError> {
    let mut parts: Vec<Arc<ChipClass>> = Vec::with_capacity(part_decls.len());
    for pd in part_decls {
        parts.push(ctx.lookup_or_elaborate(&pd.chip_name, pd.span)?);
    }

    let mut boundary: HashMap<String, (PinKind, usize)> = HashMap::new();
    for (i, pin) in inputs.iter().enumerate() {
        boundary.insert(pin.name.clone(), (PinKind::Input, i));
    }
    for (i, pin) in outputs.iter().enumerate() {
        boundary.insert(pin.name.clone(), (PinKind::Output, i));
    }

    let mut internals: Vec<PinInfo> = Vec::new();
    let mut internal_index: HashMap<String, usize> = HashMap::new();
    let mut connections: Vec<Connection> = Vec::new();

    // Single-writer tracking for each part's input pins; the part classes
    // themselves are shared and immutable.
    let mut part_in_driven: Vec<Vec<u16>> =
        parts.iter().map(|c| vec![0u16; c.inputs.len()]).collect();

    for (part_idx, pd) in part_decls.iter().enumerate() {
        let class = Arc::clone(&parts[part_idx]);
        for wire in &pd.wires {
            let left = &wire.part_pin;
            let Some((left_kind, left_pin)) = class.boundary_pin(&left.name) else {
                return Err(ElabError::UnknownPartPin {
                    part: pd.chip_name.clone(),
                    pin: left.name.clone(),
                    span: left.span,
                });
            };
            let left_is_input = left_kind == PinKind::Input;
            let left_width = if left_is_input {
                class.inputs[left_pin].width
            } else {
                class.outputs[left_pin].width
            };
            let left_range = resolve_range(left, left_width)?;
            let left_eff = width_of(left_range, left_width);

            if left_is_input {
                let range = left_range.unwrap_or(BitRange::full(left_width));
                let bits = mask(range.width()) << range.lo;
                let driven = &mut part_in_driven[part_idx][left_pin];
                if *driven & bits != 0 {
                    return Err(ElabError::MultiplyDriven {
                        name: format!("{}.{}", pd.chip_name, left.name),
                        span: wire.span,
                    });
                }
                *driven |= bits;
            }

            let right = &wire.source;
            match right.name.as_str() {
                "true" | "false" | "clk" => {
                    if right.sub.is_some() {
                        return Err(ElabError::SubBusOfInternal {
                            name: right.name.clone(),
                            span: right.span,
                        });
                    }
                    if !left_is_input {
                        return Err(ElabError::ConstantDriven {
                            name: right.name.clone(),
                            span: wire.span,
                        });
                    }
                    let kind = match right.name.as_str() {
                        "true" => ConnectionKind::FromTrue,
                        "false" => ConnectionKind::FromFalse,
                        _ => ConnectionKind::FromClock,
                    };
                    // The clock is a single-bit signal; the constants fan
                    // out to whatever width the destination has.
                    if kind == ConnectionKind::FromClock && left_eff != 1 {
                        return Err(ElabError::WidthMismatch {
                            left: ref_text(&left.name, left_range),
                            left_width: left_eff,
                            right: "clk".into(),
                            right_width: 1,
                            span: wire.span,
                        });
                    }
                    connections.push(Connection {
                        kind,
                        part: part_idx,
                        part_pin: left_pin,
                        part_range: left_range,
                        chip_pin: 0,
                        chip_range: None,
                    });
                }
                _ => match boundary.get(&right.name).copied() {
                    Some((PinKind::Input, chip_pin)) => {
                        if !left_is_input {
                            return Err(ElabError::DestinationIsInput {
                                pin: right.name.clone(),
                                span: right.span,
                            });
                        }
                        let pin_width = inputs[chip_pin].width;
                        let chip_range = resolve_range(right, pin_width)?;
                        let right_eff = width_of(chip_range, pin_width);
                        if left_eff != right_eff {
                            return Err(ElabError::WidthMismatch {
                                left: ref_text(&left.name, left_range),
                                left_width: left_eff,
                                right: ref_text(&right.name, chip_range),
                                right_width: right_eff,
                                span: wire.span,
                            });
                        }
                        connections.push(Connection {
                            kind: ConnectionKind::FromInput,
                            part: part_idx,
                            part_pin: left_pin,
                            part_range: left_range,
                            chip_pin,
                            chip_range,
                        });
                    }
                    Some((PinKind::Output, chip_pin)) => {
                        if left_is_input {
                            return Err(ElabError::SourceIsOutput {
                                pin: right.name.clone(),
                                span: right.span,
                            });
                        }
                        let pin_width = outputs[chip_pin].width;
                        let chip_range = resolve_range(right, pin_width)?;
                        let right_eff = width_of(chip_range, pin_width);
                        if left_eff != right_eff {
                            return Err(ElabError::WidthMismatch {
                                left: ref_text(&left.name, left_range),
                                left_width: left_eff,
                                right: ref_text(&right.name, chip_range),
                                right_width: right_eff,
                                span: wire.span,
                            });
                        }
                        let driven = chip_range.unwrap_or(BitRange::full(pin_width));
                        if !outputs[chip_pin].mark_driven(driven) {
                            return Err(ElabError::MultiplyDriven {
                                name: right.name.clone(),
                                span: wire.span,
                            });
                        }
                        connections.push(Connection {
                            kind: ConnectionKind::ToOutput,
                            part: part_idx,
                            part_pin: left_pin,
                            part_range: left_range,
                            chip_pin,
                            chip_range,
                        });
                    }
                    _ => {
                        // An internal net, created on first reference with
                        // the width of that reference. Nets carry whole
                        // values only; sub-bus syntax belongs on pins.
                        if right.sub.is_some() {
                            return Err(ElabError::SubBusOfInternal {
                                name: right.name.clone(),
                                span: right.span,
                            });
                        }
                        let net = match internal_index.get(&right.name).copied() {
                            Some(net) => {
                                if internals[net].width != left_eff {
                                    return Err(ElabError::WidthMismatch {
                                        left: ref_text(&left.name, left_range),
                                        left_width: left_eff,
                                        right: right.name.clone(),
                                        right_width: internals[net].width,
                                        span: wire.span,
                                    });
                                }
                                net
                            }
                            None => {
                                internals.push(PinInfo::new(right.name.clone(), left_eff));
                                internal_index.insert(right.name.clone(), internals.len() - 1);
                                internals.len() - 1
                            }
                        };
                        if left_is_input {
                            connections.push(Connection {
                                kind: ConnectionKind::FromInternal,
                                part: part_idx,
                                part_pin: left_pin,
                                part_range: left_range,
                                chip_pin: net,
                                chip_range: None,
                            });
                        } else {
                            let full = BitRange::full(internals[net].width);
                            if !internals[net].mark_driven(full) {
                                return Err(ElabError::MultiplyDriven {
                                    name: right.name.clone(),
                                    span: wire.span,
                                });
                            }
                            connections.push(Connection {
                                kind: ConnectionKind::ToInternal,
                                part: part_idx,
                                part_pin: left_pin,
                                part_range: left_range,
                                chip_pin: net,
                                chip_range: None,
                            });
                        }
                    }
                },
            }
        }
    }

    for net in &internals {
        if !net.has_driver() {
            return Err(ElabError::UndrivenNet {
                name: net.name.clone(),
                span: decl.span,
            });
        }
    }

    let analysis = graph::analyze(
        &decl.name,
        decl.span,
        &inputs,
        &outputs,
        &internals,
        &parts,
        &connections,
    )?;

    Ok(ChipClass::assemble(
        decl.name.clone(),
        inputs,
        outputs,
        analysis.input_clocked,
        analysis.output_clocked,
        ChipClassBody::Composite(CompositeSpec {
            internals,
            parts,
            connections,
            eval_order: analysis.eval_order,
        }),
    ))
}
