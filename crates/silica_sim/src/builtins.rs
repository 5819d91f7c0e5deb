//! The standard builtin chip implementations.
//!
//! All combinational gates operate bitwise over the full `u16`, so the same
//! implementation serves a chip declared at any width; the runtime masks
//! node values to their declared widths on every write. The clocked chips
//! follow the two-phase protocol: `clock_up` captures next state from the
//! settled inputs, `clock_down` commits it to the outputs.

use silica_elaborate::{BuiltinChip, BuiltinRegistry};

/// `out = NAND(a, b)`, the primitive everything else reduces to.
pub struct Nand;

impl BuiltinChip for Nand {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = !(inputs[0] & inputs[1]);
    }
}

/// `out = NOT(in)`.
pub struct Not;

impl BuiltinChip for Not {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = !inputs[0];
    }
}

/// `out = AND(a, b)`.
pub struct And;

impl BuiltinChip for And {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = inputs[0] & inputs[1];
    }
}

/// `out = OR(a, b)`.
pub struct Or;

impl BuiltinChip for Or {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = inputs[0] | inputs[1];
    }
}

/// `out = XOR(a, b)`.
pub struct Xor;

impl BuiltinChip for Xor {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = inputs[0] ^ inputs[1];
    }
}

/// `out = a` when `sel` is low, `b` when high. Inputs: `a`, `b`, `sel`.
pub struct Mux;

impl BuiltinChip for Mux {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = if inputs[2] & 1 == 1 { inputs[1] } else { inputs[0] };
    }
}

/// Routes `in` to `a` when `sel` is low, to `b` when high; the other output
/// goes to zero. Inputs: `in`, `sel`; outputs: `a`, `b`.
pub struct DMux;

impl BuiltinChip for DMux {
    fn eval(&mut self, inputs: &[u16], outputs: &mut [u16]) {
        if inputs[1] & 1 == 1 {
            outputs[0] = 0;
            outputs[1] = inputs[0];
        } else {
            outputs[0] = inputs[0];
            outputs[1] = 0;
        }
    }
}

/// A D flip-flop: `out(t) = in(t-1)`.
#[derive(Default)]
pub struct Dff {
    cur: u16,
    next: u16,
}

impl BuiltinChip for Dff {
    fn eval(&mut self, _inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = self.cur;
    }

    fn clock_up(&mut self, inputs: &[u16]) {
        self.next = inputs[0];
    }

    fn clock_down(&mut self, outputs: &mut [u16]) {
        self.cur = self.next;
        outputs[0] = self.cur;
    }
}

/// A register with a load enable: captures `in` on cycles where `load` is
/// high, otherwise holds. Inputs: `in`, `load`. Serves any width, so it
/// backs both the single-bit and the 16-bit register chips.
#[derive(Default)]
pub struct LoadRegister {
    cur: u16,
    next: u16,
}

impl BuiltinChip for LoadRegister {
    fn eval(&mut self, _inputs: &[u16], outputs: &mut [u16]) {
        outputs[0] = self.cur;
    }

    fn clock_up(&mut self, inputs: &[u16]) {
        self.next = if inputs[1] & 1 == 1 { inputs[0] } else { self.cur };
    }

    fn clock_down(&mut self, outputs: &mut [u16]) {
        self.cur = self.next;
        outputs[0] = self.cur;
    }
}

/// Builds a registry with every standard implementation registered under
/// its conventional name.
pub fn standard_registry() -> BuiltinRegistry {
    let mut registry = BuiltinRegistry::new();
    registry.register("Nand", || Box::new(Nand));
    registry.register("Not", || Box::new(Not));
    registry.register("And", || Box::new(And));
    registry.register("Or", || Box::new(Or));
    registry.register("Xor", || Box::new(Xor));
    registry.register("Mux", || Box::new(Mux));
    registry.register("DMux", || Box::new(DMux));
    registry.register("DFF", || Box::<Dff>::default());
    registry.register("Bit", || Box::<LoadRegister>::default());
    registry.register("Register", || Box::<LoadRegister>::default());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval1(imp: &mut dyn BuiltinChip, inputs: &[u16]) -> u16 {
        let mut out = [0u16];
        imp.eval(inputs, &mut out);
        out[0]
    }

    #[test]
    fn combinational_gates() {
        assert_eq!(eval1(&mut Nand, &[1, 1]) & 1, 0);
        assert_eq!(eval1(&mut Nand, &[1, 0]) & 1, 1);
        assert_eq!(eval1(&mut And, &[0xF0F0, 0xFF00]), 0xF000);
        assert_eq!(eval1(&mut Or, &[0xF0F0, 0x0F00]), 0xFFF0);
        assert_eq!(eval1(&mut Xor, &[0xFF00, 0x0FF0]), 0xF0F0);
        assert_eq!(eval1(&mut Not, &[0x00FF]), 0xFF00);
    }

    #[test]
    fn mux_selects() {
        assert_eq!(eval1(&mut Mux, &[7, 9, 0]), 7);
        assert_eq!(eval1(&mut Mux, &[7, 9, 1]), 9);
    }

    #[test]
    fn dmux_routes() {
        let mut out = [0u16; 2];
        DMux.eval(&[5, 0], &mut out);
        assert_eq!(out, [5, 0]);
        DMux.eval(&[5, 1], &mut out);
        assert_eq!(out, [0, 5]);
    }

    #[test]
    fn dff_delays_one_cycle() {
        let mut dff = Dff::default();
        let mut out = [0u16];

        dff.eval(&[], &mut out);
        assert_eq!(out[0], 0);

        dff.clock_up(&[1]);
        // Output holds until the down phase.
        dff.eval(&[], &mut out);
        assert_eq!(out[0], 0);

        dff.clock_down(&mut out);
        assert_eq!(out[0], 1);
    }

    #[test]
    fn load_register_holds_without_load() {
        let mut reg = LoadRegister::default();
        let mut out = [0u16];

        reg.clock_up(&[0xAB, 1]);
        reg.clock_down(&mut out);
        assert_eq!(out[0], 0xAB);

        reg.clock_up(&[0xCD, 0]);
        reg.clock_down(&mut out);
        assert_eq!(out[0], 0xAB);

        reg.clock_up(&[0xCD, 1]);
        reg.clock_down(&mut out);
        assert_eq!(out[0], 0xCD);
    }

    #[test]
    fn standard_registry_is_complete() {
        let registry = standard_registry();
        for name in [
            "Nand", "Not", "And", "Or", "Xor", "Mux", "DMux", "DFF", "Bit", "Register",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }
}
