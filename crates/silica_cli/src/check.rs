//! The `silica check` command: elaborate a chip and report its interface.

use crate::{session, CheckArgs};
use silica_elaborate::{ChipClassBody, PinInfo};

/// Runs `silica check`. Returns the process exit code.
pub fn run(args: &CheckArgs, quiet: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = session::registry();
    let Some(class) = session::elaborate(&args.chip, &args.dirs, &registry) else {
        return Ok(1);
    };

    if !quiet {
        let kind = match &class.body {
            ChipClassBody::Builtin(spec) => format!("builtin ({})", spec.impl_name),
            ChipClassBody::Composite(spec) => format!("composite ({} parts)", spec.parts.len()),
        };
        let timing = if class.is_clocked { "clocked" } else { "combinational" };
        println!("{}: {kind}, {timing}", class.name);
        print_pins("IN ", &class.inputs, &class.input_clocked);
        print_pins("OUT", &class.outputs, &class.output_clocked);
    }
    Ok(0)
}

fn print_pins(label: &str, pins: &[PinInfo], clocked: &[bool]) {
    for (pin, &clocked) in pins.iter().zip(clocked) {
        let width = if pin.width > 1 {
            format!("[{}]", pin.width)
        } else {
            String::new()
        };
        let marker = if clocked { "  (clocked)" } else { "" };
        println!("  {label} {}{width}{marker}", pin.name);
    }
}
