//! The `silica eval` command: instantiate a chip, drive it, print its pins.

use crate::{session, EvalArgs};
use silica_sim::Circuit;

/// Runs `silica eval`. Returns the process exit code.
pub fn run(args: &EvalArgs, quiet: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = session::registry();
    let Some(class) = session::elaborate(&args.chip, &args.dirs, &registry) else {
        return Ok(1);
    };

    let mut circuit = Circuit::instantiate(&class, &registry)?;
    for set in &args.sets {
        let (pin, value) = session::parse_assignment(set)?;
        circuit.set_pin(&pin, value)?;
    }
    circuit.eval();
    for _ in 0..args.cycles {
        circuit.cycle();
    }

    if !quiet {
        for pin in &circuit.class().inputs {
            let value = circuit.get_pin(&pin.name)?;
            println!("{} = {value} (0x{value:04X})", pin.name);
        }
        for pin in &circuit.class().outputs {
            let value = circuit.get_pin(&pin.name)?;
            println!("{} = {value} (0x{value:04X})", pin.name);
        }
    }
    Ok(0)
}
