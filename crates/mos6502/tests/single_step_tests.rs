//! Integration tests using Tom Harte's `SingleStepTests` for the 6502.
//!
//! Runs 256 opcode files x 10,000 tests = 2,560,000 individual tests comparing
//! CPU register and memory state after each instruction.
//!
//! Test data lives in `test-data/65x02/6502/v1/XX.json`, relative to the
//! workspace root. Not distributed with this crate — skipped cleanly when
//! absent.

use mos6502::{Cpu, Pins, Status};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Flat 64 KiB RAM bus for testing.
struct TestBus {
    ram: [u8; 0x1_0000],
}

impl TestBus {
    fn new() -> Self {
        Self { ram: [0; 0x1_0000] }
    }

    fn load_ram(&mut self, entries: &[(u16, u8)]) {
        for &(addr, value) in entries {
            self.ram[addr as usize] = value;
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }
}

/// Services one `tick`'s worth of bus traffic: the incoming read is
/// resolved before the call, the outgoing write after it.
fn tick(cpu: &mut Cpu, bus: &mut TestBus, mut pins: Pins) -> Pins {
    if pins.rw {
        pins.data = bus.peek(pins.addr);
    }
    pins = cpu.tick(pins);
    if !pins.rw {
        bus.ram[pins.addr as usize] = pins.data;
    }
    pins
}

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: Vec<(u16, u8, String)>,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

/// Set up the CPU and bus from the initial test state, and the pins needed
/// to begin fetching the first opcode at `pc`.
fn setup(cpu: &mut Cpu, bus: &mut TestBus, state: &CpuState) -> Pins {
    bus.load_ram(&state.ram);
    cpu.regs.pc = state.pc;
    cpu.regs.s = state.s;
    cpu.regs.a = state.a;
    cpu.regs.x = state.x;
    cpu.regs.y = state.y;
    cpu.regs.p = Status::from_byte(state.p);
    Pins {
        addr: state.pc,
        rw: true,
        sync: true,
        res: false,
        ..Pins::default()
    }
}

/// Compare the CPU/bus state against expected, returning a list of mismatches.
fn compare(cpu: &Cpu, bus: &TestBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();

    if cpu.regs.pc != expected.pc {
        errors.push(format!(
            "PC: got ${:04X}, want ${:04X}",
            cpu.regs.pc, expected.pc
        ));
    }
    if cpu.regs.s != expected.s {
        errors.push(format!(
            "S: got ${:02X}, want ${:02X}",
            cpu.regs.s, expected.s
        ));
    }
    if cpu.regs.a != expected.a {
        errors.push(format!(
            "A: got ${:02X}, want ${:02X}",
            cpu.regs.a, expected.a
        ));
    }
    if cpu.regs.x != expected.x {
        errors.push(format!(
            "X: got ${:02X}, want ${:02X}",
            cpu.regs.x, expected.x
        ));
    }
    if cpu.regs.y != expected.y {
        errors.push(format!(
            "Y: got ${:02X}, want ${:02X}",
            cpu.regs.y, expected.y
        ));
    }

    // Status::from_byte() already forces U=1; compare the raw byte rather
    // than to_byte(), since B only has meaning when pushed to the stack.
    let actual_p = cpu.regs.p.0;
    let expected_p = expected.p | Status::U;
    if actual_p != expected_p {
        errors.push(format!(
            "P: got ${actual_p:02X} ({actual_p:08b}), want ${expected_p:02X} ({expected_p:08b})"
        ));
    }

    for &(addr, expected_val) in &expected.ram {
        let actual_val = bus.peek(addr);
        if actual_val != expected_val {
            errors.push(format!(
                "RAM[${addr:04X}]: got ${actual_val:02X}, want ${expected_val:02X}"
            ));
        }
    }

    errors
}

#[test]
#[ignore = "requires test-data/65x02 — run with --ignored"]
fn run_all() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parent of crate dir")
        .parent()
        .expect("workspace root")
        .join("test-data/65x02/6502/v1");

    if !test_dir.exists() {
        eprintln!("Test data not found at {}", test_dir.display());
        eprintln!("Skipping SingleStepTests.");
        return;
    }

    let mut total_pass = 0u64;
    let mut total_fail = 0u64;
    let mut total_files = 0u32;

    for opcode in 0..=0xFF_u8 {
        let filename = format!("{opcode:02x}.json");
        let path = test_dir.join(&filename);
        if !path.exists() {
            continue;
        }

        let data = fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!("Failed to read {}: {e}", path.display());
        });
        let tests: Vec<TestCase> = serde_json::from_str(&data).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {e}", path.display());
        });

        let mut file_pass = 0u32;
        let mut file_fail = 0u32;
        let mut first_failures: Vec<String> = Vec::new();

        for test in &tests {
            let mut cpu = Cpu::new();
            let mut bus = TestBus::new();

            let mut pins = setup(&mut cpu, &mut bus, &test.initial);
            for _ in 0..test.cycles.len() {
                pins = tick(&mut cpu, &mut bus, pins);
            }

            let errors = compare(&cpu, &bus, &test.final_state);
            if errors.is_empty() {
                file_pass += 1;
            } else {
                file_fail += 1;
                if first_failures.len() < 5 {
                    first_failures.push(format!("  FAIL [{}]: {}", test.name, errors.join(", ")));
                }
            }
        }

        let status = if file_fail == 0 { "PASS" } else { "FAIL" };
        println!(
            "Opcode ${opcode:02X} ({filename}): {status} — {file_pass}/{} passed",
            file_pass + file_fail
        );
        for msg in &first_failures {
            println!("{msg}");
        }

        total_pass += u64::from(file_pass);
        total_fail += u64::from(file_fail);
        total_files += 1;
    }

    println!();
    println!("=== SingleStepTests Summary ===");
    println!(
        "Files: {total_files}, Total: {}/{}, Pass: {total_pass}, Fail: {total_fail}",
        total_pass + total_fail,
        total_pass + total_fail
    );

    assert_eq!(total_fail, 0, "{total_fail} tests failed");
}
