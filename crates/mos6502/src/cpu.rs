//! The tick driver: instruction sequencer, addressing/operation
//! micro-routines, and the ALU/flag helpers they call.
//!
//! Two tick counters interleave: `ticks` advances the addressing-mode
//! micro-sequencer, `ticks_func` advances the operation's. An opcode whose
//! addressing mode is implicit (no dedicated addressing ticks, e.g. most
//! register/stack/control operations) runs its operation sequencer off
//! `ticks` directly instead, the same way the source material does it —
//! `ticks_func` still increments alongside but goes unused by those ops.

use crate::opcodes::{Mode, Op, OPCODES};
use crate::pins::Pins;
use crate::registers::{Registers, Status};

const NMI_VECTOR_LOW: u16 = 0xFFFA;
const RESET_VECTOR_LOW: u16 = 0xFFFC;
const IRQ_VECTOR_LOW: u16 = 0xFFFE;

/// A cycle-accurate 6502 core, driven one bus transaction at a time by
/// [`Cpu::tick`].
#[derive(Debug, Clone)]
pub struct Cpu {
    pub regs: Registers,
    /// Addressing-mode scratch address register.
    ar: u16,
    /// Addressing-mode scratch data latch.
    ad: u8,
    opcode: u8,
    ticks: u8,
    ticks_func: u8,
    addressing_done: bool,
    nmi_latched: bool,
    irq_latched: bool,
    ticks_total: u64,
    prev_nmi: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A freshly constructed CPU, as if `RES` had just been asserted and
    /// held. Call [`Cpu::tick`] with [`Pins::power_on`] to begin the reset
    /// microprogram.
    pub const fn new() -> Self {
        Cpu {
            regs: Registers::new(),
            ar: 0,
            ad: 0,
            opcode: 0,
            ticks: 0,
            ticks_func: 0,
            addressing_done: false,
            nmi_latched: false,
            irq_latched: false,
            ticks_total: 0,
            prev_nmi: false,
        }
    }

    /// Total number of completed `tick` calls, for diagnostics/tests.
    pub fn ticks_total(&self) -> u64 {
        self.ticks_total
    }

    /// Advance the CPU by exactly one bus transaction.
    pub fn tick(&mut self, pins: Pins) -> Pins {
        // 1. Latch interrupts: NMI on the rising edge, IRQ level-sensitive
        //    and only while I is clear. Latched before the new pins are
        //    adopted so this tick still sees the previous NMI level.
        if !self.prev_nmi && pins.nmi {
            self.nmi_latched = true;
        }
        if pins.irq && !self.regs.p.is_set(Status::I) {
            self.irq_latched = true;
        }
        self.prev_nmi = pins.nmi;

        let mut pins = pins;

        // 2. RDY halts the CPU outright on a read cycle; nothing else
        //    advances this tick.
        if pins.rdy && pins.rw {
            return pins;
        }

        // 3. Reset takes priority over everything else and runs its own
        //    microprogram, bypassing the rest of the tick entirely.
        if pins.res {
            let pins = self.run_reset(pins);
            self.ticks_total += 1;
            return pins;
        }

        // 4. Opcode fetch boundary.
        if pins.sync {
            self.opcode = pins.data;
            pins.sync = false;
            if self.nmi_latched || self.irq_latched {
                self.opcode = 0x00;
                self.regs.p.clear(Status::B);
            } else {
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            self.ticks = 0;
            self.ticks_func = 0;
            self.addressing_done = false;
        }

        // 5. Default to a read cycle; operations that write flip this.
        pins.rw = true;

        let entry = OPCODES[self.opcode as usize];

        // 6. Addressing-mode micro-sequencer.
        if !self.addressing_done {
            pins = self.run_addressing(entry.mode, pins);
        }

        // 7. Operation micro-sequencer, possibly the same tick addressing
        //    finished on.
        if self.addressing_done {
            pins = self.run_operation(entry.op, pins);
            self.ticks_func += 1;
        }

        // 8. Completion: either fetch the next opcode or advance the
        //    addressing tick counter.
        if self.ticks + 1 >= entry.cycles {
            pins = self.next_op(pins);
        } else {
            self.ticks += 1;
        }

        self.ticks_total += 1;
        pins
    }

    /// Assert SYNC and present PC so the next tick fetches the next opcode.
    fn next_op(&mut self, mut pins: Pins) -> Pins {
        pins.sync = true;
        pins.addr = self.regs.pc;
        pins
    }

    fn run_reset(&mut self, mut pins: Pins) -> Pins {
        match self.ticks {
            0 => self.regs = Registers::new(),
            1 => pins.addr = RESET_VECTOR_LOW,
            2 => self.ar = u16::from(pins.data),
            3 => pins.addr = RESET_VECTOR_LOW + 1,
            4 => self.ar |= u16::from(pins.data) << 8,
            5 => self.regs.pc = self.ar,
            6 => pins.addr = self.regs.pc,
            7 => {
                pins.res = false;
                self.nmi_latched = false;
                self.irq_latched = false;
                self.ticks = 0;
                self.ticks_func = 0;
                self.addressing_done = false;
                return pins;
            }
            _ => {}
        }
        self.ticks = self.ticks.wrapping_add(1);
        pins
    }

    // ---- addressing modes ----------------------------------------------

    fn run_addressing(&mut self, mode: Mode, mut pins: Pins) -> Pins {
        match mode {
            Mode::Imp | Mode::Rel | Mode::Jsr => {
                self.addressing_done = true;
            }
            Mode::Imm => {
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.addressing_done = true;
            }
            Mode::Zpg => match self.ticks {
                0 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                1 => {
                    pins.addr = u16::from(pins.data);
                    self.addressing_done = true;
                }
                _ => {}
            },
            Mode::ZpgX => self.addr_zpg_indexed(self.regs.x, &mut pins),
            Mode::ZpgY => self.addr_zpg_indexed(self.regs.y, &mut pins),
            Mode::Abs => match self.ticks {
                0 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                1 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                    self.ar = u16::from(pins.data);
                }
                2 => {
                    pins.addr = (u16::from(pins.data) << 8) | self.ar;
                    self.addressing_done = true;
                }
                _ => {}
            },
            Mode::AbsX => self.addr_abs_indexed(self.regs.x, &mut pins),
            Mode::AbsY => self.addr_abs_indexed(self.regs.y, &mut pins),
            Mode::IndX => match self.ticks {
                0 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                1 => {
                    self.ar = u16::from(pins.data);
                    pins.addr = self.ar;
                }
                2 => {
                    self.ar = u16::from((self.ar as u8).wrapping_add(self.regs.x));
                    pins.addr = self.ar;
                }
                3 => {
                    pins.addr = u16::from((self.ar as u8).wrapping_add(1));
                    self.ar = u16::from(pins.data);
                }
                4 => {
                    pins.addr = (u16::from(pins.data) << 8) | self.ar;
                    self.addressing_done = true;
                }
                _ => {}
            },
            Mode::IndY => match self.ticks {
                0 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                1 => {
                    self.ar = u16::from(pins.data);
                    pins.addr = self.ar;
                }
                2 => {
                    pins.addr = u16::from((self.ar as u8).wrapping_add(1));
                    self.ar = u16::from(pins.data);
                }
                3 => {
                    self.ar |= u16::from(pins.data) << 8;
                    let indexed = self.ar.wrapping_add(u16::from(self.regs.y));
                    pins.addr = (self.ar & 0xFF00) | (indexed & 0xFF);
                    if (self.ar >> 8) >= (indexed >> 8) {
                        self.ar = indexed;
                        self.ticks = self.ticks.wrapping_add(1);
                        self.addressing_done = true;
                    } else {
                        self.ar = indexed;
                    }
                }
                4 => {
                    pins.addr = self.ar;
                    self.addressing_done = true;
                }
                _ => {}
            },
            Mode::Ind => match self.ticks {
                0 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                1 => {
                    pins.addr = self.regs.pc;
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                    self.ar = u16::from(pins.data);
                }
                2 => {
                    self.ar |= u16::from(pins.data) << 8;
                    pins.addr = self.ar;
                }
                3 => {
                    // The indirect-JMP page-wrap bug: the high-byte fetch
                    // never crosses into the next page.
                    pins.addr = (self.ar & 0xFF00) | ((self.ar.wrapping_add(1)) & 0xFF);
                    self.ar = u16::from(pins.data);
                }
                4 => {
                    pins.addr = (u16::from(pins.data) << 8) | self.ar;
                    self.addressing_done = true;
                }
                _ => {}
            },
        }
        pins
    }

    fn addr_zpg_indexed(&mut self, index: u8, pins: &mut Pins) {
        match self.ticks {
            0 => {
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            1 => {
                self.ar = u16::from(pins.data);
                pins.addr = self.ar;
            }
            2 => {
                pins.addr = u16::from((self.ar as u8).wrapping_add(index));
                self.addressing_done = true;
            }
            _ => {}
        }
    }

    fn addr_abs_indexed(&mut self, index: u8, pins: &mut Pins) {
        match self.ticks {
            0 => {
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            1 => {
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.ar = u16::from(pins.data);
            }
            2 => {
                self.ar |= u16::from(pins.data) << 8;
                let indexed = self.ar.wrapping_add(u16::from(index));
                pins.addr = (self.ar & 0xFF00) | (indexed & 0xFF);
                self.ar = indexed;
                if (self.ar.wrapping_sub(u16::from(index)) >> 8) >= (self.ar >> 8) {
                    self.ticks = self.ticks.wrapping_add(1);
                    self.addressing_done = true;
                }
            }
            3 => {
                pins.addr = self.ar;
                self.addressing_done = true;
            }
            _ => {}
        }
    }

    // ---- operation handlers ---------------------------------------------

    fn run_operation(&mut self, op: Op, mut pins: Pins) -> Pins {
        match op {
            Op::Brk => self.op_brk(&mut pins),
            // t=0 overlaps with the addressing tick that placed the
            // effective address on ADDR; the bus doesn't supply DATA for
            // that address until the following tick.
            Op::Ora => {
                if self.ticks_func == 1 {
                    self.regs.a |= pins.data;
                    self.regs.p.update_nz(self.regs.a);
                }
            }
            Op::And => {
                if self.ticks_func == 1 {
                    self.regs.a &= pins.data;
                    self.regs.p.update_nz(self.regs.a);
                }
            }
            Op::Eor => {
                if self.ticks_func == 1 {
                    self.regs.a ^= pins.data;
                    self.regs.p.update_nz(self.regs.a);
                }
            }
            Op::Adc => {
                if self.ticks_func == 1 {
                    self.adc_flags(pins.data);
                }
            }
            Op::Sbc => {
                if self.ticks_func == 1 {
                    self.sbc_flags(pins.data);
                }
            }
            Op::Cmp => {
                if self.ticks_func == 1 {
                    self.cmp_flags(self.regs.a, pins.data);
                }
            }
            Op::Cpx => {
                if self.ticks_func == 1 {
                    self.cmp_flags(self.regs.x, pins.data);
                }
            }
            Op::Cpy => {
                if self.ticks_func == 1 {
                    self.cmp_flags(self.regs.y, pins.data);
                }
            }
            Op::Bit => {
                if self.ticks_func == 1 {
                    self.bit_flags(pins.data);
                }
            }
            Op::Asl => self.op_rmw(&mut pins, Self::asl_flags),
            Op::AslA => self.op_accumulator(&mut pins, Self::asl_flags),
            Op::Rol => self.op_rmw(&mut pins, Self::rol_flags),
            Op::RolA => self.op_accumulator(&mut pins, Self::rol_flags),
            Op::Lsr => self.op_rmw(&mut pins, Self::lsr_flags),
            Op::LsrA => self.op_accumulator(&mut pins, Self::lsr_flags),
            Op::Ror => self.op_rmw(&mut pins, Self::ror_flags),
            Op::RorA => self.op_accumulator(&mut pins, Self::ror_flags),
            Op::Dec => self.op_rmw(&mut pins, |cpu, v| {
                let t = v.wrapping_sub(1);
                cpu.regs.p.update_nz(t);
                t
            }),
            Op::Inc => self.op_rmw(&mut pins, |cpu, v| {
                let t = v.wrapping_add(1);
                cpu.regs.p.update_nz(t);
                t
            }),
            Op::Sta => self.op_store(&mut pins, self.regs.a),
            Op::Stx => self.op_store(&mut pins, self.regs.x),
            Op::Sty => self.op_store(&mut pins, self.regs.y),
            Op::Lda => {
                if self.ticks_func == 1 {
                    self.regs.a = pins.data;
                    self.regs.p.update_nz(self.regs.a);
                }
            }
            Op::Ldx => {
                if self.ticks_func == 1 {
                    self.regs.x = pins.data;
                    self.regs.p.update_nz(self.regs.x);
                }
            }
            Op::Ldy => {
                if self.ticks_func == 1 {
                    self.regs.y = pins.data;
                    self.regs.p.update_nz(self.regs.y);
                }
            }
            Op::Php => self.op_push(&mut pins, self.ticks, Registers::stack_addr, |cpu| {
                cpu.regs.p.to_byte_brk()
            }),
            Op::Clc => self.op_flag(Status::C, false),
            Op::Plp => self.op_pull(&mut pins, |cpu, data| cpu.regs.p = Status::from_stack(data)),
            Op::Sec => self.op_flag(Status::C, true),
            Op::Pha => self.op_push(&mut pins, self.ticks, Registers::stack_addr, |cpu| cpu.regs.a),
            Op::Cli => self.op_flag(Status::I, false),
            Op::Pla => self.op_pull(&mut pins, |cpu, data| {
                cpu.regs.a = data;
                cpu.regs.p.update_nz(data);
            }),
            Op::Sei => self.op_flag(Status::I, true),
            Op::Dey => {
                if self.ticks == 1 {
                    self.regs.y = self.regs.y.wrapping_sub(1);
                    self.regs.p.update_nz(self.regs.y);
                }
            }
            Op::Tya => {
                if self.ticks == 1 {
                    self.regs.a = self.regs.y;
                    self.regs.p.update_nz(self.regs.a);
                }
            }
            Op::Tay => {
                if self.ticks == 1 {
                    self.regs.y = self.regs.a;
                    self.regs.p.update_nz(self.regs.y);
                }
            }
            Op::Clv => self.op_flag(Status::V, false),
            Op::Iny => {
                if self.ticks == 1 {
                    self.regs.y = self.regs.y.wrapping_add(1);
                    self.regs.p.update_nz(self.regs.y);
                }
            }
            Op::Cld => self.op_flag(Status::D, false),
            Op::Inx => {
                if self.ticks == 1 {
                    self.regs.x = self.regs.x.wrapping_add(1);
                    self.regs.p.update_nz(self.regs.x);
                }
            }
            Op::Sed => self.op_flag(Status::D, true),
            Op::Txa => {
                if self.ticks == 1 {
                    self.regs.a = self.regs.x;
                    self.regs.p.update_nz(self.regs.a);
                }
            }
            Op::Txs => {
                if self.ticks == 1 {
                    self.regs.s = self.regs.x;
                }
            }
            Op::Tax => {
                if self.ticks == 1 {
                    self.regs.x = self.regs.a;
                    self.regs.p.update_nz(self.regs.x);
                }
            }
            Op::Tsx => {
                if self.ticks == 1 {
                    self.regs.x = self.regs.s;
                    self.regs.p.update_nz(self.regs.x);
                }
            }
            Op::Dex => {
                if self.ticks == 1 {
                    self.regs.x = self.regs.x.wrapping_sub(1);
                    self.regs.p.update_nz(self.regs.x);
                }
            }
            Op::Nop | Op::Bad => {}
            Op::Jsr => self.op_jsr(&mut pins),
            // Unlike the compute-from-memory family above, JMP's DATA is
            // the operand-high byte addressing already fetched, not a
            // byte at a computed address, so it's available at t=0.
            Op::Jmp => {
                if self.ticks_func == 0 {
                    self.regs.pc = (u16::from(pins.data) << 8) | self.ar;
                }
            }
            Op::Rti => self.op_rti(&mut pins),
            Op::Rts => self.op_rts(&mut pins),
            Op::Bpl => self.op_branch(&mut pins, !self.regs.p.is_set(Status::N)),
            Op::Bmi => self.op_branch(&mut pins, self.regs.p.is_set(Status::N)),
            Op::Bvc => self.op_branch(&mut pins, !self.regs.p.is_set(Status::V)),
            Op::Bvs => self.op_branch(&mut pins, self.regs.p.is_set(Status::V)),
            Op::Bcc => self.op_branch(&mut pins, !self.regs.p.is_set(Status::C)),
            Op::Bcs => self.op_branch(&mut pins, self.regs.p.is_set(Status::C)),
            Op::Bne => self.op_branch(&mut pins, !self.regs.p.is_set(Status::Z)),
            Op::Beq => self.op_branch(&mut pins, self.regs.p.is_set(Status::Z)),
        }
        pins
    }

    fn op_flag(&mut self, flag: u8, value: bool) {
        if self.ticks == 1 {
            self.regs.p.set_if(flag, value);
        }
    }

    fn op_store(&mut self, pins: &mut Pins, value: u8) {
        match self.ticks_func {
            0 => {
                pins.data = value;
                pins.rw = false;
            }
            _ => {}
        }
    }

    fn op_rmw(&mut self, pins: &mut Pins, alu: impl Fn(&mut Self, u8) -> u8) {
        // t=0 overlaps with the addressing tick, same as the
        // compute-from-memory family; DATA at the effective address isn't
        // available until t=1.
        match self.ticks_func {
            1 => {
                self.ad = pins.data;
                pins.rw = false;
            }
            2 => {
                let ad = self.ad;
                let result = alu(self, ad);
                pins.data = result;
                pins.rw = false;
            }
            _ => {}
        }
    }

    fn op_accumulator(&mut self, pins: &mut Pins, alu: impl Fn(&mut Self, u8) -> u8) {
        if self.ticks == 0 {
            pins.addr = self.regs.pc;
        } else if self.ticks == 1 {
            pins.addr = self.regs.pc;
            let a = self.regs.a;
            self.regs.a = alu(self, a);
        }
    }

    fn op_push(
        &mut self,
        pins: &mut Pins,
        tick: u8,
        stack_addr: fn(&Registers) -> u16,
        value_of: impl Fn(&Self) -> u8,
    ) {
        match tick {
            0 => pins.addr = self.regs.pc,
            1 => {
                pins.addr = stack_addr(&self.regs);
                self.regs.s = self.regs.s.wrapping_sub(1);
                pins.data = value_of(self);
                pins.rw = false;
            }
            _ => {}
        }
    }

    fn op_pull(&mut self, pins: &mut Pins, apply: impl Fn(&mut Self, u8)) {
        match self.ticks {
            0 => pins.addr = self.regs.pc,
            1 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_add(1);
            }
            2 => pins.addr = self.regs.stack_addr(),
            3 => apply(self, pins.data),
            _ => {}
        }
    }

    fn op_brk(&mut self, pins: &mut Pins) {
        match self.ticks {
            0 => pins.addr = self.regs.pc,
            1 => {
                if !(self.irq_latched || self.nmi_latched) {
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_sub(1);
                pins.data = (self.regs.pc >> 8) as u8;
                if !pins.res {
                    pins.rw = false;
                }
            }
            2 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_sub(1);
                pins.data = self.regs.pc as u8;
                if !pins.res {
                    pins.rw = false;
                }
            }
            3 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_sub(1);
                pins.data = self.regs.p.to_byte();
                if pins.res {
                    self.ar = RESET_VECTOR_LOW;
                } else {
                    pins.rw = false;
                    self.ar = if self.nmi_latched {
                        NMI_VECTOR_LOW
                    } else {
                        IRQ_VECTOR_LOW
                    };
                }
            }
            4 => {
                pins.addr = self.ar;
                self.ar = self.ar.wrapping_add(1);
                self.regs.p.set(Status::I);
                self.regs.p.set(Status::B);
                self.nmi_latched = false;
                self.irq_latched = false;
            }
            5 => {
                pins.addr = self.ar;
                self.ar = u16::from(pins.data);
            }
            6 => {
                self.regs.pc = (u16::from(pins.data) << 8) | self.ar;
            }
            _ => {}
        }
    }

    fn op_jsr(&mut self, pins: &mut Pins) {
        match self.ticks {
            0 => {
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            1 => {
                pins.addr = self.regs.stack_addr();
                self.ar = u16::from(pins.data);
            }
            2 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_sub(1);
                pins.data = (self.regs.pc >> 8) as u8;
                pins.rw = false;
            }
            3 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_sub(1);
                pins.data = self.regs.pc as u8;
                pins.rw = false;
            }
            4 => {
                pins.addr = self.regs.pc;
            }
            5 => {
                self.regs.pc = (u16::from(pins.data) << 8) | self.ar;
            }
            _ => {}
        }
    }

    fn op_rti(&mut self, pins: &mut Pins) {
        match self.ticks {
            0 => pins.addr = self.regs.pc,
            1 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_add(1);
            }
            2 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_add(1);
            }
            3 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_add(1);
                self.regs.p = Status::from_stack(pins.data);
            }
            4 => {
                pins.addr = self.regs.stack_addr();
                self.ar = u16::from(pins.data);
            }
            5 => {
                self.regs.pc = (u16::from(pins.data) << 8) | self.ar;
            }
            _ => {}
        }
    }

    fn op_rts(&mut self, pins: &mut Pins) {
        match self.ticks {
            0 => pins.addr = self.regs.pc,
            1 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_add(1);
            }
            2 => {
                pins.addr = self.regs.stack_addr();
                self.regs.s = self.regs.s.wrapping_add(1);
            }
            3 => {
                pins.addr = self.regs.stack_addr();
                self.ar = u16::from(pins.data);
            }
            4 => {
                self.regs.pc = (u16::from(pins.data) << 8) | self.ar;
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            _ => {}
        }
    }

    fn op_branch(&mut self, pins: &mut Pins, take: bool) {
        match self.ticks {
            0 => {
                pins.addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            1 => {
                pins.addr = self.regs.pc;
                self.ar = self.regs.pc.wrapping_add(u16::from(pins.data as i8 as i16 as u16));
                if !take {
                    self.ticks = 4;
                }
            }
            2 => {
                pins.addr = (self.regs.pc & 0xFF00) | (self.ar & 0xFF);
                if (self.regs.pc & 0xFF00) == (self.ar & 0xFF00) {
                    self.regs.pc = self.ar;
                    self.ticks = 4;
                }
            }
            3 => {
                self.regs.pc = self.ar;
            }
            _ => {}
        }
    }

    // ---- ALU / flag helpers ----------------------------------------------

    fn bit_flags(&mut self, v: u8) {
        let test = self.regs.a & v;
        self.regs.p.set_if(Status::Z, test == 0);
        self.regs.p.set_if(Status::N, v & 0x80 != 0);
        self.regs.p.set_if(Status::V, v & 0x40 != 0);
    }

    fn asl_flags(&mut self, v: u8) -> u8 {
        self.regs.p.set_if(Status::C, v & 0x80 != 0);
        let t = v << 1;
        self.regs.p.update_nz(t);
        t
    }

    fn lsr_flags(&mut self, v: u8) -> u8 {
        self.regs.p.set_if(Status::C, v & 0x01 != 0);
        let t = v >> 1;
        self.regs.p.update_nz(t);
        t
    }

    fn rol_flags(&mut self, v: u8) -> u8 {
        let carry_in = self.regs.p.is_set(Status::C);
        self.regs.p.set_if(Status::C, v & 0x80 != 0);
        let mut t = v << 1;
        if carry_in {
            t |= 0x01;
        }
        self.regs.p.update_nz(t);
        t
    }

    fn ror_flags(&mut self, v: u8) -> u8 {
        let carry_in = self.regs.p.is_set(Status::C);
        self.regs.p.set_if(Status::C, v & 0x01 != 0);
        let mut t = v >> 1;
        if carry_in {
            t |= 0x80;
        }
        self.regs.p.update_nz(t);
        t
    }

    fn adc_flags(&mut self, v: u8) {
        let c = u16::from(self.regs.p.is_set(Status::C));
        let a = u16::from(self.regs.a);
        let v16 = u16::from(v);
        let mut sum = a + v16 + c;
        self.regs.p.set_if(Status::Z, sum & 0xFF == 0);
        if self.regs.p.is_set(Status::D) {
            if (a & 0x0F) + (v16 & 0x0F) + c > 9 {
                sum += 6;
            }
            self.regs.p.set_if(Status::N, sum & 0x80 != 0);
            self.regs
                .p
                .set_if(Status::V, !(a ^ v16) & 0x80 != 0 && (a ^ sum) & 0x80 != 0);
            if sum > 0x99 {
                sum += 0x60;
            }
            self.regs.p.set_if(Status::C, sum > 0x99);
        } else {
            self.regs.p.set_if(Status::N, sum & 0x80 != 0);
            self.regs
                .p
                .set_if(Status::V, !(a ^ v16) & 0x80 != 0 && (a ^ sum) & 0x80 != 0);
            self.regs.p.set_if(Status::C, sum > 0xFF);
        }
        self.regs.a = (sum & 0xFF) as u8;
    }

    fn sbc_flags(&mut self, v: u8) {
        let c_in = u16::from(self.regs.p.is_set(Status::C));
        let borrow = 1 - c_in;
        let a = u16::from(self.regs.a);
        let v16 = u16::from(v);
        let mut dif = a.wrapping_sub(v16).wrapping_sub(borrow);
        self.regs.p.set_if(Status::N, dif & 0x80 != 0);
        self.regs.p.set_if(Status::Z, dif & 0xFF == 0);
        self.regs
            .p
            .set_if(Status::V, (a ^ dif) & 0x80 != 0 && (a ^ v16) & 0x80 != 0);
        if self.regs.p.is_set(Status::D) {
            let lo = i32::from(a & 0x0F) - i32::from(borrow);
            if lo < i32::from(v16 & 0x0F) {
                dif = dif.wrapping_sub(6);
            }
            if dif > 0x99 {
                dif = dif.wrapping_sub(0x60);
            }
        }
        self.regs.p.set_if(Status::C, dif < 0x100);
        self.regs.a = (dif & 0xFF) as u8;
    }

    fn cmp_flags(&mut self, r: u8, v: u8) {
        let t = r.wrapping_sub(v);
        self.regs.p.set_if(Status::C, r >= v);
        self.regs.p.set_if(Status::Z, t == 0);
        self.regs.p.set_if(Status::N, t & 0x80 != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A flat 64 KiB memory image standing in for a bus in these tests.
    struct TestBus {
        mem: [u8; 0x10000],
    }

    impl TestBus {
        fn new() -> Self {
            TestBus { mem: [0; 0x10000] }
        }

        fn load(&mut self, addr: u16, bytes: &[u8]) {
            for (i, b) in bytes.iter().enumerate() {
                self.mem[addr as usize + i] = *b;
            }
        }
    }

    /// Pumps `tick` once per bus transaction, servicing reads/writes against
    /// `bus`, until SYNC is observed again — i.e. for exactly one complete
    /// instruction (or, immediately after reset, until the first opcode is
    /// latched and its addressing begins).
    fn step_instruction(cpu: &mut Cpu, bus: &mut TestBus, mut pins: Pins) -> Pins {
        loop {
            if pins.rw {
                pins.data = bus.mem[pins.addr as usize];
            }
            pins = cpu.tick(pins);
            if !pins.rw {
                bus.mem[pins.addr as usize] = pins.data;
            }
            if pins.sync {
                return pins;
            }
        }
    }

    /// A freshly reset CPU and the pins left over from the reset
    /// microprogram's last tick, ready to fetch the first opcode at
    /// `reset_vector`.
    fn powered_on(bus: &mut TestBus, reset_vector: u16) -> (Cpu, Pins) {
        bus.load(0xFFFC, &[reset_vector as u8, (reset_vector >> 8) as u8]);
        let mut cpu = Cpu::new();
        let mut pins = Pins::power_on();
        for _ in 0..8 {
            if pins.rw {
                pins.data = bus.mem[pins.addr as usize];
            }
            pins = cpu.tick(pins);
        }
        (cpu, pins)
    }

    #[test]
    fn reset_reaches_vector_with_expected_status() {
        let mut bus = TestBus::new();
        let (cpu, _pins) = powered_on(&mut bus, 0x8000);
        assert_eq!(cpu.regs.pc, 0x8000);
        assert_eq!(cpu.regs.s, 0xFD);
        assert_eq!(cpu.regs.p.0, 0x24);
    }

    #[test]
    fn immediate_load_sets_register_and_flags() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        bus.load(0x8000, &[0xA9, 0x00]); // LDA #$00
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.p.is_set(Status::Z));
        assert!(!cpu.regs.p.is_set(Status::N));
    }

    #[test]
    fn adc_sets_carry_and_overflow_on_signed_wrap() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        cpu.regs.a = 0x7F;
        bus.load(0x8000, &[0x69, 0x01]); // ADC #$01
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.a, 0x80);
        assert!(cpu.regs.p.is_set(Status::V));
        assert!(cpu.regs.p.is_set(Status::N));
        assert!(!cpu.regs.p.is_set(Status::C));
    }

    #[test]
    fn decimal_subtract_matches_bcd_arithmetic() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        cpu.regs.p.set(Status::D);
        cpu.regs.p.set(Status::C);
        cpu.regs.a = 0x42;
        bus.load(0x8000, &[0xE9, 0x12]); // SBC #$12
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.a, 0x30);
        assert!(cpu.regs.p.is_set(Status::C));
    }

    #[test]
    fn jsr_then_rts_round_trips_pc() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        bus.load(0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
        bus.load(0x9000, &[0x60]); // RTS
        let pins = step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.pc, 0x9000);
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.pc, 0x8003);
    }

    #[test]
    fn indirect_jmp_reproduces_page_wrap_bug() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        bus.load(0x8000, &[0x6C, 0xFF, 0x10]); // JMP ($10FF)
        bus.mem[0x10FF] = 0x00;
        bus.mem[0x1000] = 0x20; // wrong byte: real hardware reads $1000, not $1100
        bus.mem[0x1100] = 0x77;
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.pc, 0x2000);
    }

    #[test]
    fn zero_page_indexed_wraps_modulo_256() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        cpu.regs.x = 0x01;
        bus.mem[0x00] = 0x55;
        bus.load(0x8000, &[0xB5, 0xFF]); // LDA $FF,X -> wraps to $00
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.regs.a, 0x55);
    }

    #[test]
    fn rmw_increments_byte_at_effective_address() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        bus.mem[0x10] = 0x41;
        bus.load(0x8000, &[0xE6, 0x10]); // INC $10
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(bus.mem[0x10], 0x42);
        assert!(!cpu.regs.p.is_set(Status::Z));
        assert!(!cpu.regs.p.is_set(Status::N));
    }

    #[test]
    fn hardware_interrupt_pushes_b_clear() {
        let mut bus = TestBus::new();
        bus.load(0xFFFA, &[0x00, 0x90]); // NMI vector -> $9000
        let (mut cpu, mut pins) = powered_on(&mut bus, 0x8000);

        // NMI is edge-triggered and unmasked by I (unlike IRQ, which reset
        // leaves disabled). Assert it for the very fetch that would
        // otherwise start whatever's at $8000; the CPU hijacks it into a
        // forced BRK.
        pins.data = bus.mem[pins.addr as usize];
        pins.nmi = true;
        pins = cpu.tick(pins);
        pins.nmi = false;
        loop {
            if pins.rw {
                pins.data = bus.mem[pins.addr as usize];
            }
            pins = cpu.tick(pins);
            if !pins.rw {
                bus.mem[pins.addr as usize] = pins.data;
            }
            if pins.sync {
                break;
            }
        }

        // SP started at $FD: PC-high/PC-low/status land at $01FD/$01FC/$01FB.
        assert_eq!(bus.mem[0x01FB] & Status::B, 0);
        assert_eq!(bus.mem[0x01FB] & Status::U, Status::U);
        assert_eq!(cpu.regs.pc, 0x9000);
    }

    #[test]
    fn software_brk_pushes_b_set() {
        let mut bus = TestBus::new();
        bus.load(0xFFFE, &[0x00, 0x90]); // IRQ/BRK vector -> $9000
        bus.load(0x8000, &[0x00, 0x00]); // BRK + signature padding byte
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(bus.mem[0x01FB] & Status::B, Status::B);
        assert_eq!(cpu.regs.pc, 0x9000);
    }

    #[test]
    fn branch_not_taken_completes_in_two_cycles() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x8000);
        cpu.regs.p.clear(Status::Z);
        bus.load(0x8000, &[0xF0, 0x10]); // BEQ +16, not taken
        let start = cpu.ticks_total();
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.ticks_total() - start, 2);
        assert_eq!(cpu.regs.pc, 0x8002);
    }

    #[test]
    fn branch_taken_across_page_costs_four_cycles() {
        let mut bus = TestBus::new();
        let (mut cpu, pins) = powered_on(&mut bus, 0x80F0);
        cpu.regs.p.set(Status::Z);
        bus.load(0x80F0, &[0xF0, 0x20]); // BEQ +32, lands past the $80/$81 boundary
        let start = cpu.ticks_total();
        step_instruction(&mut cpu, &mut bus, pins);
        assert_eq!(cpu.ticks_total() - start, 4);
        assert_eq!(cpu.regs.pc, 0x8112);
    }

    #[test]
    fn cmp_flag_truth_table() {
        let mut cpu = Cpu::new();
        cpu.cmp_flags(0x10, 0x10);
        assert!(cpu.regs.p.is_set(Status::Z));
        assert!(cpu.regs.p.is_set(Status::C));
        cpu.cmp_flags(0x10, 0x20);
        assert!(!cpu.regs.p.is_set(Status::C));
        assert!(cpu.regs.p.is_set(Status::N));
        cpu.cmp_flags(0x20, 0x10);
        assert!(cpu.regs.p.is_set(Status::C));
        assert!(!cpu.regs.p.is_set(Status::Z));
    }

    #[test]
    fn rol_ror_round_trip_preserves_value() {
        let mut cpu = Cpu::new();
        cpu.regs.p.clear(Status::C);
        let original = 0b1011_0010;
        let rolled = cpu.rol_flags(original);
        assert!(cpu.regs.p.is_set(Status::C));
        let restored = cpu.ror_flags(rolled);
        assert_eq!(restored, original);
    }
}
