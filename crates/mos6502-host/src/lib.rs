//! A console host for the [`mos6502`] core.
//!
//! Wraps a [`Cpu`] and an [`emu_core::SimpleBus`] behind the same per-tick
//! bus protocol the core's own tests use (read resolved before the tick,
//! write applied after), adds an optional memory-mapped TTY for
//! interactive programs such as EhBASIC, and exposes a worker-thread
//! driver so a binary can run the CPU continuously while a separate
//! thread issues step/stop requests.

#[cfg(feature = "tty")]
pub mod tty;

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;

use emu_core::{Bus, SimpleBus};
use mos6502::{Cpu, Pins};

/// Address the TTY feature polls for keyboard input.
pub const TTY_INPUT_ADDR: u16 = 0xF004;
/// Address the TTY feature writes output characters to.
pub const TTY_OUTPUT_ADDR: u16 = 0xF001;

/// A CPU paired with its bus, driven one bus transaction at a time.
///
/// `opaddr` tracks the address of the opcode currently in flight (the
/// address last seen on a SYNC cycle) so a host thread can watch execution
/// progress without touching the CPU directly.
pub struct Machine {
    pub cpu: Cpu,
    pub bus: SimpleBus,
    pins: Pins,
    pub opaddr: Arc<AtomicU16>,
    #[cfg(feature = "tty")]
    tty: Option<tty::TtyIo>,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            cpu: Cpu::new(),
            bus: SimpleBus::new(),
            pins: Pins::power_on(),
            opaddr: Arc::new(AtomicU16::new(0)),
            #[cfg(feature = "tty")]
            tty: None,
        }
    }

    /// Enables the memory-mapped TTY at [`TTY_INPUT_ADDR`]/[`TTY_OUTPUT_ADDR`].
    #[cfg(feature = "tty")]
    pub fn enable_tty(&mut self) {
        self.tty = Some(tty::TtyIo::new());
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        self.bus.load(addr, data);
    }

    /// Drives the reset microprogram to completion: eight ticks, after
    /// which the CPU is parked at the opcode fetch for the reset vector.
    pub fn reset(&mut self) {
        self.pins = Pins::power_on();
        for _ in 0..8 {
            self.step();
        }
    }

    /// Advances the machine by exactly one bus transaction, mirroring
    /// the original `Bus::CPU_Step`: resolve the pending read before the
    /// tick, apply the pending write after it.
    pub fn step(&mut self) {
        let mut pins = self.pins;
        if pins.rw {
            pins.data = self.bus.read(pins.addr);
        }
        pins = self.cpu.tick(pins);
        #[cfg(feature = "tty")]
        if let Some(tty) = &mut self.tty {
            tty.service(&mut pins, &mut self.bus);
        }
        if !pins.rw {
            self.bus.write(pins.addr, pins.data);
        }
        if pins.sync {
            self.opaddr.store(self.cpu.regs.pc, Ordering::Relaxed);
        }
        self.pins = pins;
    }

    /// Advances the machine until the next opcode fetch boundary, i.e. for
    /// exactly one complete instruction.
    pub fn step_instruction(&mut self) {
        loop {
            self.step();
            if self.pins.sync {
                return;
            }
        }
    }

    pub fn pc(&self) -> u16 {
        self.cpu.regs.pc
    }

    /// Asserts IRQ for the current tick only; by convention (matching the
    /// original step loop) a host clears it again once SYNC fires.
    pub fn request_irq(&mut self) {
        self.pins.irq = true;
    }

    pub fn request_nmi(&mut self) {
        self.pins.nmi = true;
    }

    /// Clears IRQ/NMI once a new instruction has begun fetching, the same
    /// housekeeping the original step loop performs on every SYNC cycle.
    pub fn clear_interrupts_on_sync(&mut self) {
        if self.pins.sync {
            self.pins.irq = false;
            self.pins.nmi = false;
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a [`Machine`] on a dedicated thread, responding to step-mode and
/// stop requests from whatever owns the returned handles.
pub struct Driver {
    pub step_mode: Arc<AtomicBool>,
    pub step_one: Arc<AtomicBool>,
    pub stop: Arc<AtomicBool>,
    pub opaddr: Arc<AtomicU16>,
}

impl Driver {
    /// Spawns the worker thread and returns the control handles plus the
    /// `JoinHandle` to wait on at shutdown.
    pub fn spawn(mut machine: Machine) -> (Self, std::thread::JoinHandle<Machine>) {
        let step_mode = Arc::new(AtomicBool::new(false));
        let step_one = Arc::new(AtomicBool::new(false));
        let stop = Arc::new(AtomicBool::new(false));
        let opaddr = Arc::clone(&machine.opaddr);

        let thread_step_mode = Arc::clone(&step_mode);
        let thread_step_one = Arc::clone(&step_one);
        let thread_stop = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            loop {
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                if thread_step_mode.load(Ordering::Relaxed) {
                    if thread_step_one.swap(false, Ordering::Relaxed) {
                        machine.step_instruction();
                    }
                } else {
                    machine.step();
                }
                machine.clear_interrupts_on_sync();
            }
            machine
        });

        (
            Driver {
                step_mode,
                step_one,
                stop,
                opaddr,
            },
            handle,
        )
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn request_step(&self) {
        self.step_mode.store(true, Ordering::Relaxed);
        self.step_one.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.step_mode.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_parks_at_vector() {
        let mut machine = Machine::new();
        machine.load(0xFFFC, &[0x00, 0x90]);
        machine.reset();
        assert_eq!(machine.pc(), 0x9000);
    }

    #[test]
    fn step_instruction_executes_one_opcode() {
        let mut machine = Machine::new();
        machine.load(0xFFFC, &[0x00, 0x90]);
        machine.load(0x9000, &[0xA9, 0x42]); // LDA #$42
        machine.reset();
        machine.step_instruction();
        assert_eq!(machine.cpu.regs.a, 0x42);
        assert_eq!(machine.pc(), 0x9002);
    }
}
