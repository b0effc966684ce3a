//! Headless and interactive console runner for the `mos6502` core.

use std::path::PathBuf;
use std::process;

use mos6502_host::Machine;

struct CliArgs {
    load_path: Option<PathBuf>,
    load_addr: u16,
    reset_vector: Option<u16>,
    steps: u64,
    trace: bool,
    tty: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        load_path: None,
        load_addr: 0x0000,
        reset_vector: None,
        steps: 0,
        trace: false,
        tty: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--load" => {
                i += 1;
                cli.load_path = args.get(i).map(PathBuf::from);
            }
            "--addr" => {
                i += 1;
                cli.load_addr = args
                    .get(i)
                    .and_then(|s| u16::from_str_radix(s.trim_start_matches("0x"), 16).ok())
                    .unwrap_or(0);
            }
            "--reset-vector" => {
                i += 1;
                cli.reset_vector = args
                    .get(i)
                    .and_then(|s| u16::from_str_radix(s.trim_start_matches("0x"), 16).ok());
            }
            "--steps" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.steps = s.parse().unwrap_or(0);
                }
            }
            "--trace" => cli.trace = true,
            "--tty" => cli.tty = true,
            "--help" | "-h" => {
                eprintln!("Usage: mos6502-host --load <file> [OPTIONS]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --load <file>           Binary image to load");
                eprintln!("  --addr <hex>            Load address [default: 0x0000]");
                eprintln!("  --reset-vector <hex>    Override $FFFC/$FFFD after loading");
                eprintln!("  --steps <n>             Run exactly n instructions then stop [default: run forever]");
                eprintln!("  --trace                 Print PC before each instruction");
                eprintln!("  --tty                   Enable the memory-mapped console at $F001/$F004");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    let Some(load_path) = &cli.load_path else {
        eprintln!("error: --load <file> is required");
        process::exit(1);
    };

    let binary = std::fs::read(load_path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", load_path.display());
        process::exit(1);
    });

    let mut machine = Machine::new();
    machine.load(cli.load_addr, &binary);

    if let Some(vector) = cli.reset_vector {
        machine.load(0xFFFC, &[vector as u8, (vector >> 8) as u8]);
    }

    #[cfg(feature = "tty")]
    if cli.tty {
        machine.enable_tty();
    }
    #[cfg(not(feature = "tty"))]
    if cli.tty {
        eprintln!("error: built without the `tty` feature");
        process::exit(1);
    }

    machine.reset();
    eprintln!("Reset vector -> ${:04X}", machine.pc());

    if cli.steps == 0 {
        loop {
            if cli.trace {
                eprintln!("PC=${:04X}", machine.pc());
            }
            machine.step_instruction();
        }
    } else {
        for _ in 0..cli.steps {
            if cli.trace {
                eprintln!("PC=${:04X}", machine.pc());
            }
            machine.step_instruction();
        }
        eprintln!(
            "Ran {} instructions, {} ticks total, PC=${:04X}",
            cli.steps,
            machine.cpu.ticks_total(),
            machine.pc()
        );
    }
}
