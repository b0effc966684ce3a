//! The 256-entry instruction sequencer table.
//!
//! Each opcode byte maps to a small tagged value — addressing-mode kind,
//! operation kind, nominal cycle count — interpreted by `match` in
//! `cpu.rs` rather than a table of member-function pointers. The opcode
//! byte is already the tag, so this is the "large switch over a table of
//! tagged values" shape rather than two parallel function-pointer arrays.

/// Addressing-mode kind, indexing [`crate::cpu::Cpu::run_addressing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Imp,
    Rel,
    Imm,
    Zpg,
    ZpgX,
    ZpgY,
    Abs,
    AbsX,
    AbsY,
    IndX,
    IndY,
    Ind,
    Jsr,
}

/// Operation kind, indexing [`crate::cpu::Cpu::run_operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Brk,
    Ora,
    And,
    Eor,
    Adc,
    Sbc,
    Cmp,
    Cpx,
    Cpy,
    Bit,
    Asl,
    AslA,
    Rol,
    RolA,
    Lsr,
    LsrA,
    Ror,
    RorA,
    Dec,
    Inc,
    Sta,
    Stx,
    Sty,
    Lda,
    Ldx,
    Ldy,
    Php,
    Clc,
    Plp,
    Sec,
    Pha,
    Cli,
    Pla,
    Sei,
    Dey,
    Tya,
    Tay,
    Clv,
    Iny,
    Cld,
    Inx,
    Sed,
    Txa,
    Txs,
    Tax,
    Tsx,
    Dex,
    Nop,
    Jsr,
    Jmp,
    Rti,
    Rts,
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    /// Undocumented opcode: a fixed 2-cycle no-op, per spec Non-goals.
    Bad,
}

/// One row of the dispatch table: addressing mode, operation, nominal
/// cycle count (the total number of `tick` calls the instruction
/// consumes in the common case; indexed/branch penalties subtract from
/// this via the tick-skip mechanism in `cpu.rs`, never add to it).
#[derive(Debug, Clone, Copy)]
pub struct OpEntry {
    pub mode: Mode,
    pub op: Op,
    pub cycles: u8,
}

const fn e(mode: Mode, op: Op, cycles: u8) -> OpEntry {
    OpEntry { mode, op, cycles }
}

#[rustfmt::skip]
pub static OPCODES: [OpEntry; 256] = [
    e(Mode::Imp,  Op::Brk,  7), // 0x00
    e(Mode::IndX, Op::Ora,  6), // 0x01
    e(Mode::Imp,  Op::Bad,  2), // 0x02
    e(Mode::Imp,  Op::Bad,  2), // 0x03
    e(Mode::Imp,  Op::Bad,  2), // 0x04
    e(Mode::Zpg,  Op::Ora,  3), // 0x05
    e(Mode::Zpg,  Op::Asl,  5), // 0x06
    e(Mode::Imp,  Op::Bad,  2), // 0x07
    e(Mode::Imp,  Op::Php,  3), // 0x08
    e(Mode::Imm,  Op::Ora,  2), // 0x09
    e(Mode::Imp,  Op::AslA, 2), // 0x0A
    e(Mode::Imp,  Op::Bad,  2), // 0x0B
    e(Mode::Imp,  Op::Bad,  2), // 0x0C
    e(Mode::Abs,  Op::Ora,  4), // 0x0D
    e(Mode::Abs,  Op::Asl,  6), // 0x0E
    e(Mode::Imp,  Op::Bad,  2), // 0x0F
    e(Mode::Rel,  Op::Bpl,  4), // 0x10
    e(Mode::IndY, Op::Ora,  6), // 0x11
    e(Mode::Imp,  Op::Bad,  2), // 0x12
    e(Mode::Imp,  Op::Bad,  2), // 0x13
    e(Mode::Imp,  Op::Bad,  2), // 0x14
    e(Mode::ZpgX, Op::Ora,  4), // 0x15
    e(Mode::ZpgX, Op::Asl,  6), // 0x16
    e(Mode::Imp,  Op::Bad,  2), // 0x17
    e(Mode::Imp,  Op::Clc,  2), // 0x18
    e(Mode::AbsY, Op::Ora,  5), // 0x19
    e(Mode::Imp,  Op::Bad,  2), // 0x1A
    e(Mode::Imp,  Op::Bad,  2), // 0x1B
    e(Mode::Imp,  Op::Bad,  2), // 0x1C
    e(Mode::AbsX, Op::Ora,  5), // 0x1D
    e(Mode::AbsX, Op::Asl,  7), // 0x1E
    e(Mode::Imp,  Op::Bad,  2), // 0x1F
    e(Mode::Jsr,  Op::Jsr,  6), // 0x20
    e(Mode::IndX, Op::And,  6), // 0x21
    e(Mode::Imp,  Op::Bad,  2), // 0x22
    e(Mode::Imp,  Op::Bad,  2), // 0x23
    e(Mode::Zpg,  Op::Bit,  3), // 0x24
    e(Mode::Zpg,  Op::And,  3), // 0x25
    e(Mode::Zpg,  Op::Rol,  5), // 0x26
    e(Mode::Imp,  Op::Bad,  2), // 0x27
    e(Mode::Imp,  Op::Plp,  4), // 0x28
    e(Mode::Imm,  Op::And,  2), // 0x29
    e(Mode::Imp,  Op::RolA, 2), // 0x2A
    e(Mode::Imp,  Op::Bad,  2), // 0x2B
    e(Mode::Abs,  Op::Bit,  4), // 0x2C
    e(Mode::Abs,  Op::And,  4), // 0x2D
    e(Mode::Abs,  Op::Rol,  6), // 0x2E
    e(Mode::Imp,  Op::Bad,  2), // 0x2F
    e(Mode::Rel,  Op::Bmi,  4), // 0x30
    e(Mode::IndY, Op::And,  6), // 0x31
    e(Mode::Imp,  Op::Bad,  2), // 0x32
    e(Mode::Imp,  Op::Bad,  2), // 0x33
    e(Mode::Imp,  Op::Bad,  2), // 0x34
    e(Mode::ZpgX, Op::And,  4), // 0x35
    e(Mode::ZpgX, Op::Rol,  6), // 0x36
    e(Mode::Imp,  Op::Bad,  2), // 0x37
    e(Mode::Imp,  Op::Sec,  2), // 0x38
    e(Mode::AbsY, Op::And,  5), // 0x39
    e(Mode::Imp,  Op::Bad,  2), // 0x3A
    e(Mode::Imp,  Op::Bad,  2), // 0x3B
    e(Mode::Imp,  Op::Bad,  2), // 0x3C
    e(Mode::AbsX, Op::And,  5), // 0x3D
    e(Mode::AbsX, Op::Rol,  7), // 0x3E
    e(Mode::Imp,  Op::Bad,  2), // 0x3F
    e(Mode::Imp,  Op::Rti,  6), // 0x40
    e(Mode::IndX, Op::Eor,  6), // 0x41
    e(Mode::Imp,  Op::Bad,  2), // 0x42
    e(Mode::Imp,  Op::Bad,  2), // 0x43
    e(Mode::Imp,  Op::Bad,  2), // 0x44
    e(Mode::Zpg,  Op::Eor,  3), // 0x45
    e(Mode::Zpg,  Op::Lsr,  5), // 0x46
    e(Mode::Imp,  Op::Bad,  2), // 0x47
    e(Mode::Imp,  Op::Pha,  3), // 0x48
    e(Mode::Imm,  Op::Eor,  2), // 0x49
    e(Mode::Imp,  Op::LsrA, 2), // 0x4A
    e(Mode::Imp,  Op::Bad,  2), // 0x4B
    e(Mode::Abs,  Op::Jmp,  3), // 0x4C
    e(Mode::Abs,  Op::Eor,  4), // 0x4D
    e(Mode::Abs,  Op::Lsr,  6), // 0x4E
    e(Mode::Imp,  Op::Bad,  2), // 0x4F
    e(Mode::Rel,  Op::Bvc,  4), // 0x50
    e(Mode::IndY, Op::Eor,  6), // 0x51
    e(Mode::Imp,  Op::Bad,  2), // 0x52
    e(Mode::Imp,  Op::Bad,  2), // 0x53
    e(Mode::Imp,  Op::Bad,  2), // 0x54
    e(Mode::ZpgX, Op::Eor,  4), // 0x55
    e(Mode::ZpgX, Op::Lsr,  6), // 0x56
    e(Mode::Imp,  Op::Bad,  2), // 0x57
    e(Mode::Imp,  Op::Cli,  2), // 0x58
    e(Mode::AbsY, Op::Eor,  5), // 0x59
    e(Mode::Imp,  Op::Bad,  2), // 0x5A
    e(Mode::Imp,  Op::Bad,  2), // 0x5B
    e(Mode::Imp,  Op::Bad,  2), // 0x5C
    e(Mode::AbsX, Op::Eor,  5), // 0x5D
    e(Mode::AbsX, Op::Lsr,  7), // 0x5E
    e(Mode::Imp,  Op::Bad,  2), // 0x5F
    e(Mode::Imp,  Op::Rts,  6), // 0x60
    e(Mode::IndX, Op::Adc,  6), // 0x61
    e(Mode::Imp,  Op::Bad,  2), // 0x62
    e(Mode::Imp,  Op::Bad,  2), // 0x63
    e(Mode::Imp,  Op::Bad,  2), // 0x64
    e(Mode::Zpg,  Op::Adc,  3), // 0x65
    e(Mode::Zpg,  Op::Ror,  5), // 0x66
    e(Mode::Imp,  Op::Bad,  2), // 0x67
    e(Mode::Imp,  Op::Pla,  4), // 0x68
    e(Mode::Imm,  Op::Adc,  2), // 0x69
    e(Mode::Imp,  Op::RorA, 2), // 0x6A
    e(Mode::Imp,  Op::Bad,  2), // 0x6B
    e(Mode::Ind,  Op::Jmp,  5), // 0x6C
    e(Mode::Abs,  Op::Adc,  4), // 0x6D
    e(Mode::Abs,  Op::Ror,  6), // 0x6E
    e(Mode::Imp,  Op::Bad,  2), // 0x6F
    e(Mode::Rel,  Op::Bvs,  4), // 0x70
    e(Mode::IndY, Op::Adc,  6), // 0x71
    e(Mode::Imp,  Op::Bad,  2), // 0x72
    e(Mode::Imp,  Op::Bad,  2), // 0x73
    e(Mode::Imp,  Op::Bad,  2), // 0x74
    e(Mode::ZpgX, Op::Adc,  4), // 0x75
    e(Mode::ZpgX, Op::Ror,  6), // 0x76
    e(Mode::Imp,  Op::Bad,  2), // 0x77
    e(Mode::Imp,  Op::Sei,  2), // 0x78
    e(Mode::AbsY, Op::Adc,  5), // 0x79
    e(Mode::Imp,  Op::Bad,  2), // 0x7A
    e(Mode::Imp,  Op::Bad,  2), // 0x7B
    e(Mode::Imp,  Op::Bad,  2), // 0x7C
    e(Mode::AbsX, Op::Adc,  5), // 0x7D
    e(Mode::AbsX, Op::Ror,  7), // 0x7E
    e(Mode::Imp,  Op::Bad,  2), // 0x7F
    e(Mode::Imp,  Op::Bad,  2), // 0x80
    e(Mode::IndX, Op::Sta,  6), // 0x81
    e(Mode::Imp,  Op::Bad,  2), // 0x82
    e(Mode::Imp,  Op::Bad,  2), // 0x83
    e(Mode::Zpg,  Op::Sty,  3), // 0x84
    e(Mode::Zpg,  Op::Sta,  3), // 0x85
    e(Mode::Zpg,  Op::Stx,  3), // 0x86
    e(Mode::Imp,  Op::Bad,  2), // 0x87
    e(Mode::Imp,  Op::Dey,  2), // 0x88
    e(Mode::Imp,  Op::Bad,  2), // 0x89
    e(Mode::Imp,  Op::Txa,  2), // 0x8A
    e(Mode::Imp,  Op::Bad,  2), // 0x8B
    e(Mode::Abs,  Op::Sty,  4), // 0x8C
    e(Mode::Abs,  Op::Sta,  4), // 0x8D
    e(Mode::Abs,  Op::Stx,  4), // 0x8E
    e(Mode::Imp,  Op::Bad,  2), // 0x8F
    e(Mode::Rel,  Op::Bcc,  4), // 0x90
    e(Mode::IndY, Op::Sta,  6), // 0x91
    e(Mode::Imp,  Op::Bad,  2), // 0x92
    e(Mode::Imp,  Op::Bad,  2), // 0x93
    e(Mode::ZpgX, Op::Sty,  4), // 0x94
    e(Mode::ZpgX, Op::Sta,  4), // 0x95
    e(Mode::ZpgY, Op::Stx,  4), // 0x96
    e(Mode::Imp,  Op::Bad,  2), // 0x97
    e(Mode::Imp,  Op::Tya,  2), // 0x98
    e(Mode::AbsY, Op::Sta,  5), // 0x99
    e(Mode::Imp,  Op::Txs,  2), // 0x9A
    e(Mode::Imp,  Op::Bad,  2), // 0x9B
    e(Mode::Imp,  Op::Bad,  2), // 0x9C
    e(Mode::AbsX, Op::Sta,  5), // 0x9D
    e(Mode::Imp,  Op::Bad,  2), // 0x9E
    e(Mode::Imp,  Op::Bad,  2), // 0x9F
    e(Mode::Imm,  Op::Ldy,  2), // 0xA0
    e(Mode::IndX, Op::Lda,  6), // 0xA1
    e(Mode::Imm,  Op::Ldx,  2), // 0xA2
    e(Mode::Imp,  Op::Bad,  2), // 0xA3
    e(Mode::Zpg,  Op::Ldy,  3), // 0xA4
    e(Mode::Zpg,  Op::Lda,  3), // 0xA5
    e(Mode::Zpg,  Op::Ldx,  3), // 0xA6
    e(Mode::Imp,  Op::Bad,  2), // 0xA7
    e(Mode::Imp,  Op::Tay,  2), // 0xA8
    e(Mode::Imm,  Op::Lda,  2), // 0xA9
    e(Mode::Imp,  Op::Tax,  2), // 0xAA
    e(Mode::Imp,  Op::Bad,  2), // 0xAB
    e(Mode::Abs,  Op::Ldy,  4), // 0xAC
    e(Mode::Abs,  Op::Lda,  4), // 0xAD
    e(Mode::Abs,  Op::Ldx,  4), // 0xAE
    e(Mode::Imp,  Op::Bad,  2), // 0xAF
    e(Mode::Rel,  Op::Bcs,  4), // 0xB0
    e(Mode::IndY, Op::Lda,  6), // 0xB1
    e(Mode::Imp,  Op::Bad,  2), // 0xB2
    e(Mode::Imp,  Op::Bad,  2), // 0xB3
    e(Mode::ZpgX, Op::Ldy,  4), // 0xB4
    e(Mode::ZpgX, Op::Lda,  4), // 0xB5
    e(Mode::ZpgY, Op::Ldx,  4), // 0xB6
    e(Mode::Imp,  Op::Bad,  2), // 0xB7
    e(Mode::Imp,  Op::Clv,  2), // 0xB8
    e(Mode::AbsY, Op::Lda,  5), // 0xB9
    e(Mode::Imp,  Op::Tsx,  2), // 0xBA
    e(Mode::Imp,  Op::Bad,  2), // 0xBB
    e(Mode::AbsX, Op::Ldy,  5), // 0xBC
    e(Mode::AbsX, Op::Lda,  5), // 0xBD
    e(Mode::AbsY, Op::Ldx,  5), // 0xBE
    e(Mode::Imp,  Op::Bad,  2), // 0xBF
    e(Mode::Imm,  Op::Cpy,  2), // 0xC0
    e(Mode::IndX, Op::Cmp,  6), // 0xC1
    e(Mode::Imp,  Op::Bad,  2), // 0xC2
    e(Mode::Imp,  Op::Bad,  2), // 0xC3
    e(Mode::Zpg,  Op::Cpy,  3), // 0xC4
    e(Mode::Zpg,  Op::Cmp,  3), // 0xC5
    e(Mode::Zpg,  Op::Dec,  5), // 0xC6
    e(Mode::Imp,  Op::Bad,  2), // 0xC7
    e(Mode::Imp,  Op::Iny,  2), // 0xC8
    e(Mode::Imm,  Op::Cmp,  2), // 0xC9
    e(Mode::Imp,  Op::Dex,  2), // 0xCA
    e(Mode::Imp,  Op::Bad,  2), // 0xCB
    e(Mode::Abs,  Op::Cpy,  4), // 0xCC
    e(Mode::Abs,  Op::Cmp,  4), // 0xCD
    e(Mode::Abs,  Op::Dec,  6), // 0xCE
    e(Mode::Imp,  Op::Bad,  2), // 0xCF
    e(Mode::Rel,  Op::Bne,  4), // 0xD0
    e(Mode::IndY, Op::Cmp,  6), // 0xD1
    e(Mode::Imp,  Op::Bad,  2), // 0xD2
    e(Mode::Imp,  Op::Bad,  2), // 0xD3
    e(Mode::Imp,  Op::Bad,  2), // 0xD4
    e(Mode::ZpgX, Op::Cmp,  4), // 0xD5
    e(Mode::ZpgX, Op::Dec,  6), // 0xD6
    e(Mode::Imp,  Op::Bad,  2), // 0xD7
    e(Mode::Imp,  Op::Cld,  2), // 0xD8
    e(Mode::AbsY, Op::Cmp,  5), // 0xD9
    e(Mode::Imp,  Op::Bad,  2), // 0xDA
    e(Mode::Imp,  Op::Bad,  2), // 0xDB
    e(Mode::Imp,  Op::Bad,  2), // 0xDC
    e(Mode::AbsX, Op::Cmp,  5), // 0xDD
    e(Mode::AbsX, Op::Dec,  7), // 0xDE
    e(Mode::Imp,  Op::Bad,  2), // 0xDF
    e(Mode::Imm,  Op::Cpx,  2), // 0xE0
    e(Mode::IndX, Op::Sbc,  6), // 0xE1
    e(Mode::Imp,  Op::Bad,  2), // 0xE2
    e(Mode::Imp,  Op::Bad,  2), // 0xE3
    e(Mode::Zpg,  Op::Cpx,  3), // 0xE4
    e(Mode::Zpg,  Op::Sbc,  3), // 0xE5
    e(Mode::Zpg,  Op::Inc,  5), // 0xE6
    e(Mode::Imp,  Op::Bad,  2), // 0xE7
    e(Mode::Imp,  Op::Inx,  2), // 0xE8
    e(Mode::Imm,  Op::Sbc,  2), // 0xE9
    e(Mode::Imp,  Op::Nop,  2), // 0xEA
    e(Mode::Imp,  Op::Bad,  2), // 0xEB
    e(Mode::Abs,  Op::Cpx,  4), // 0xEC
    e(Mode::Abs,  Op::Sbc,  4), // 0xED
    e(Mode::Abs,  Op::Inc,  6), // 0xEE
    e(Mode::Imp,  Op::Bad,  2), // 0xEF
    e(Mode::Rel,  Op::Beq,  4), // 0xF0
    e(Mode::IndY, Op::Sbc,  6), // 0xF1
    e(Mode::Imp,  Op::Bad,  2), // 0xF2
    e(Mode::Imp,  Op::Bad,  2), // 0xF3
    e(Mode::Imp,  Op::Bad,  2), // 0xF4
    e(Mode::ZpgX, Op::Sbc,  4), // 0xF5
    e(Mode::ZpgX, Op::Inc,  6), // 0xF6
    e(Mode::Imp,  Op::Bad,  2), // 0xF7
    e(Mode::Imp,  Op::Sed,  2), // 0xF8
    e(Mode::AbsY, Op::Sbc,  5), // 0xF9
    e(Mode::Imp,  Op::Bad,  2), // 0xFA
    e(Mode::Imp,  Op::Bad,  2), // 0xFB
    e(Mode::Imp,  Op::Bad,  2), // 0xFC
    e(Mode::AbsX, Op::Sbc,  5), // 0xFD
    e(Mode::AbsX, Op::Inc,  7), // 0xFE
    e(Mode::Imp,  Op::Bad,  2), // 0xFF
];
