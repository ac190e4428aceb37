//! Per-opcode metadata for all 256 encodings.
//!
//! Every slot is populated: illegal encodings map to their undocumented
//! operation, and the JAM slots decode as two-cycle no-ops so the stepper
//! can never stall on an empty entry.

// http://wiki.nesdev.com/w/index.php/CPU_addressing_modes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[rustfmt::skip]
pub(crate) enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage, ZeroPageX, ZeroPageY,
    Relative,
    Absolute, AbsoluteX, AbsoluteY,
    Indirect, IndirectX, IndirectY,
}

impl AddressingMode {
    /// Operand bytes plus the opcode byte itself.
    pub(crate) fn instruction_length(self) -> u8 {
        match self {
            Self::Implied | Self::Accumulator => 1,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::Relative
            | Self::IndirectX
            | Self::IndirectY => 2,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 3,
        }
    }
}

// http://obelisk.me.uk/6502/reference.html
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[rustfmt::skip]
pub(crate) enum Mnemonic {
    // Load/Store Operations
    LDA, LDX, LDY, STA, STX, STY,
    // Register Operations
    TAX, TSX, TAY, TXA, TXS, TYA,
    // Stack instructions
    PHA, PHP, PLA, PLP,
    // Logical instructions
    AND, EOR, ORA, BIT,
    // Arithmetic instructions
    ADC, SBC, CMP, CPX, CPY,
    // Increment/Decrement instructions
    INC, INX, INY, DEC, DEX, DEY,
    // Shift instructions
    ASL, LSR, ROL, ROR,
    // Jump instructions
    JMP, JSR, RTS, RTI,
    // Branch instructions
    BCC, BCS, BEQ, BMI, BNE, BPL, BVC, BVS,
    // Flag control instructions
    CLC, CLD, CLI, CLV, SEC, SED, SEI,
    // Misc
    BRK, NOP,
    // Unofficial
    LAX, SAX, DCP, ISC, SLO, RLA, SRE, RRA,
    ANC, ALR, ARR, AXS, LAS,
    // Unstable unofficial; best-effort or inert
    AHX, SHX, SHY, TAS, XAA, LXA, STP,
}

/// One row of the decode table.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub size: u8,
    pub cycles: u8,
    /// One extra cycle when the effective address crosses a page.
    pub page_penalty: bool,
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode, size: u8, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        mode,
        size,
        cycles,
        page_penalty: false,
    }
}

const fn opp(mnemonic: Mnemonic, mode: AddressingMode, size: u8, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        mode,
        size,
        cycles,
        page_penalty: true,
    }
}

use self::AddressingMode::*;
use self::Mnemonic::*;

#[rustfmt::skip]
pub(crate) static INSTRUCTIONS: [Instruction; 256] = [
    op(BRK, Implied, 1, 7),      // 0x00
    op(ORA, IndirectX, 2, 6),    // 0x01
    op(STP, Implied, 1, 2),      // 0x02
    op(SLO, IndirectX, 2, 8),    // 0x03
    op(NOP, ZeroPage, 2, 3),     // 0x04
    op(ORA, ZeroPage, 2, 3),     // 0x05
    op(ASL, ZeroPage, 2, 5),     // 0x06
    op(SLO, ZeroPage, 2, 5),     // 0x07
    op(PHP, Implied, 1, 3),      // 0x08
    op(ORA, Immediate, 2, 2),    // 0x09
    op(ASL, Accumulator, 1, 2),  // 0x0A
    op(ANC, Immediate, 2, 2),    // 0x0B
    op(NOP, Absolute, 3, 4),     // 0x0C
    op(ORA, Absolute, 3, 4),     // 0x0D
    op(ASL, Absolute, 3, 6),     // 0x0E
    op(SLO, Absolute, 3, 6),     // 0x0F
    op(BPL, Relative, 2, 2),     // 0x10
    opp(ORA, IndirectY, 2, 5),   // 0x11
    op(STP, Implied, 1, 2),      // 0x12
    op(SLO, IndirectY, 2, 8),    // 0x13
    op(NOP, ZeroPageX, 2, 4),    // 0x14
    op(ORA, ZeroPageX, 2, 4),    // 0x15
    op(ASL, ZeroPageX, 2, 6),    // 0x16
    op(SLO, ZeroPageX, 2, 6),    // 0x17
    op(CLC, Implied, 1, 2),      // 0x18
    opp(ORA, AbsoluteY, 3, 4),   // 0x19
    op(NOP, Implied, 1, 2),      // 0x1A
    op(SLO, AbsoluteY, 3, 7),    // 0x1B
    opp(NOP, AbsoluteX, 3, 4),   // 0x1C
    opp(ORA, AbsoluteX, 3, 4),   // 0x1D
    op(ASL, AbsoluteX, 3, 7),    // 0x1E
    op(SLO, AbsoluteX, 3, 7),    // 0x1F
    op(JSR, Absolute, 3, 6),     // 0x20
    op(AND, IndirectX, 2, 6),    // 0x21
    op(STP, Implied, 1, 2),      // 0x22
    op(RLA, IndirectX, 2, 8),    // 0x23
    op(BIT, ZeroPage, 2, 3),     // 0x24
    op(AND, ZeroPage, 2, 3),     // 0x25
    op(ROL, ZeroPage, 2, 5),     // 0x26
    op(RLA, ZeroPage, 2, 5),     // 0x27
    op(PLP, Implied, 1, 4),      // 0x28
    op(AND, Immediate, 2, 2),    // 0x29
    op(ROL, Accumulator, 1, 2),  // 0x2A
    op(ANC, Immediate, 2, 2),    // 0x2B
    op(BIT, Absolute, 3, 4),     // 0x2C
    op(AND, Absolute, 3, 4),     // 0x2D
    op(ROL, Absolute, 3, 6),     // 0x2E
    op(RLA, Absolute, 3, 6),     // 0x2F
    op(BMI, Relative, 2, 2),     // 0x30
    opp(AND, IndirectY, 2, 5),   // 0x31
    op(STP, Implied, 1, 2),      // 0x32
    op(RLA, IndirectY, 2, 8),    // 0x33
    op(NOP, ZeroPageX, 2, 4),    // 0x34
    op(AND, ZeroPageX, 2, 4),    // 0x35
    op(ROL, ZeroPageX, 2, 6),    // 0x36
    op(RLA, ZeroPageX, 2, 6),    // 0x37
    op(SEC, Implied, 1, 2),      // 0x38
    opp(AND, AbsoluteY, 3, 4),   // 0x39
    op(NOP, Implied, 1, 2),      // 0x3A
    op(RLA, AbsoluteY, 3, 7),    // 0x3B
    opp(NOP, AbsoluteX, 3, 4),   // 0x3C
    opp(AND, AbsoluteX, 3, 4),   // 0x3D
    op(ROL, AbsoluteX, 3, 7),    // 0x3E
    op(RLA, AbsoluteX, 3, 7),    // 0x3F
    op(RTI, Implied, 1, 6),      // 0x40
    op(EOR, IndirectX, 2, 6),    // 0x41
    op(STP, Implied, 1, 2),      // 0x42
    op(SRE, IndirectX, 2, 8),    // 0x43
    op(NOP, ZeroPage, 2, 3),     // 0x44
    op(EOR, ZeroPage, 2, 3),     // 0x45
    op(LSR, ZeroPage, 2, 5),     // 0x46
    op(SRE, ZeroPage, 2, 5),     // 0x47
    op(PHA, Implied, 1, 3),      // 0x48
    op(EOR, Immediate, 2, 2),    // 0x49
    op(LSR, Accumulator, 1, 2),  // 0x4A
    op(ALR, Immediate, 2, 2),    // 0x4B
    op(JMP, Absolute, 3, 3),     // 0x4C
    op(EOR, Absolute, 3, 4),     // 0x4D
    op(LSR, Absolute, 3, 6),     // 0x4E
    op(SRE, Absolute, 3, 6),     // 0x4F
    op(BVC, Relative, 2, 2),     // 0x50
    opp(EOR, IndirectY, 2, 5),   // 0x51
    op(STP, Implied, 1, 2),      // 0x52
    op(SRE, IndirectY, 2, 8),    // 0x53
    op(NOP, ZeroPageX, 2, 4),    // 0x54
    op(EOR, ZeroPageX, 2, 4),    // 0x55
    op(LSR, ZeroPageX, 2, 6),    // 0x56
    op(SRE, ZeroPageX, 2, 6),    // 0x57
    op(CLI, Implied, 1, 2),      // 0x58
    opp(EOR, AbsoluteY, 3, 4),   // 0x59
    op(NOP, Implied, 1, 2),      // 0x5A
    op(SRE, AbsoluteY, 3, 7),    // 0x5B
    opp(NOP, AbsoluteX, 3, 4),   // 0x5C
    opp(EOR, AbsoluteX, 3, 4),   // 0x5D
    op(LSR, AbsoluteX, 3, 7),    // 0x5E
    op(SRE, AbsoluteX, 3, 7),    // 0x5F
    op(RTS, Implied, 1, 6),      // 0x60
    op(ADC, IndirectX, 2, 6),    // 0x61
    op(STP, Implied, 1, 2),      // 0x62
    op(RRA, IndirectX, 2, 8),    // 0x63
    op(NOP, ZeroPage, 2, 3),     // 0x64
    op(ADC, ZeroPage, 2, 3),     // 0x65
    op(ROR, ZeroPage, 2, 5),     // 0x66
    op(RRA, ZeroPage, 2, 5),     // 0x67
    op(PLA, Implied, 1, 4),      // 0x68
    op(ADC, Immediate, 2, 2),    // 0x69
    op(ROR, Accumulator, 1, 2),  // 0x6A
    op(ARR, Immediate, 2, 2),    // 0x6B
    op(JMP, Indirect, 3, 5),     // 0x6C
    op(ADC, Absolute, 3, 4),     // 0x6D
    op(ROR, Absolute, 3, 6),     // 0x6E
    op(RRA, Absolute, 3, 6),     // 0x6F
    op(BVS, Relative, 2, 2),     // 0x70
    opp(ADC, IndirectY, 2, 5),   // 0x71
    op(STP, Implied, 1, 2),      // 0x72
    op(RRA, IndirectY, 2, 8),    // 0x73
    op(NOP, ZeroPageX, 2, 4),    // 0x74
    op(ADC, ZeroPageX, 2, 4),    // 0x75
    op(ROR, ZeroPageX, 2, 6),    // 0x76
    op(RRA, ZeroPageX, 2, 6),    // 0x77
    op(SEI, Implied, 1, 2),      // 0x78
    opp(ADC, AbsoluteY, 3, 4),   // 0x79
    op(NOP, Implied, 1, 2),      // 0x7A
    op(RRA, AbsoluteY, 3, 7),    // 0x7B
    opp(NOP, AbsoluteX, 3, 4),   // 0x7C
    opp(ADC, AbsoluteX, 3, 4),   // 0x7D
    op(ROR, AbsoluteX, 3, 7),    // 0x7E
    op(RRA, AbsoluteX, 3, 7),    // 0x7F
    op(NOP, Immediate, 2, 2),    // 0x80
    op(STA, IndirectX, 2, 6),    // 0x81
    op(NOP, Immediate, 2, 2),    // 0x82
    op(SAX, IndirectX, 2, 6),    // 0x83
    op(STY, ZeroPage, 2, 3),     // 0x84
    op(STA, ZeroPage, 2, 3),     // 0x85
    op(STX, ZeroPage, 2, 3),     // 0x86
    op(SAX, ZeroPage, 2, 3),     // 0x87
    op(DEY, Implied, 1, 2),      // 0x88
    op(NOP, Immediate, 2, 2),    // 0x89
    op(TXA, Implied, 1, 2),      // 0x8A
    op(XAA, Immediate, 2, 2),    // 0x8B
    op(STY, Absolute, 3, 4),     // 0x8C
    op(STA, Absolute, 3, 4),     // 0x8D
    op(STX, Absolute, 3, 4),     // 0x8E
    op(SAX, Absolute, 3, 4),     // 0x8F
    op(BCC, Relative, 2, 2),     // 0x90
    op(STA, IndirectY, 2, 6),    // 0x91
    op(STP, Implied, 1, 2),      // 0x92
    op(AHX, IndirectY, 2, 6),    // 0x93
    op(STY, ZeroPageX, 2, 4),    // 0x94
    op(STA, ZeroPageX, 2, 4),    // 0x95
    op(STX, ZeroPageY, 2, 4),    // 0x96
    op(SAX, ZeroPageY, 2, 4),    // 0x97
    op(TYA, Implied, 1, 2),      // 0x98
    op(STA, AbsoluteY, 3, 5),    // 0x99
    op(TXS, Implied, 1, 2),      // 0x9A
    op(TAS, AbsoluteY, 3, 5),    // 0x9B
    op(SHY, AbsoluteX, 3, 5),    // 0x9C
    op(STA, AbsoluteX, 3, 5),    // 0x9D
    op(SHX, AbsoluteY, 3, 5),    // 0x9E
    op(AHX, AbsoluteY, 3, 5),    // 0x9F
    op(LDY, Immediate, 2, 2),    // 0xA0
    op(LDA, IndirectX, 2, 6),    // 0xA1
    op(LDX, Immediate, 2, 2),    // 0xA2
    op(LAX, IndirectX, 2, 6),    // 0xA3
    op(LDY, ZeroPage, 2, 3),     // 0xA4
    op(LDA, ZeroPage, 2, 3),     // 0xA5
    op(LDX, ZeroPage, 2, 3),     // 0xA6
    op(LAX, ZeroPage, 2, 3),     // 0xA7
    op(TAY, Implied, 1, 2),      // 0xA8
    op(LDA, Immediate, 2, 2),    // 0xA9
    op(TAX, Implied, 1, 2),      // 0xAA
    op(LXA, Immediate, 2, 2),    // 0xAB
    op(LDY, Absolute, 3, 4),     // 0xAC
    op(LDA, Absolute, 3, 4),     // 0xAD
    op(LDX, Absolute, 3, 4),     // 0xAE
    op(LAX, Absolute, 3, 4),     // 0xAF
    op(BCS, Relative, 2, 2),     // 0xB0
    opp(LDA, IndirectY, 2, 5),   // 0xB1
    op(STP, Implied, 1, 2),      // 0xB2
    opp(LAX, IndirectY, 2, 5),   // 0xB3
    op(LDY, ZeroPageX, 2, 4),    // 0xB4
    op(LDA, ZeroPageX, 2, 4),    // 0xB5
    op(LDX, ZeroPageY, 2, 4),    // 0xB6
    op(LAX, ZeroPageY, 2, 4),    // 0xB7
    op(CLV, Implied, 1, 2),      // 0xB8
    opp(LDA, AbsoluteY, 3, 4),   // 0xB9
    op(TSX, Implied, 1, 2),      // 0xBA
    opp(LAS, AbsoluteY, 3, 4),   // 0xBB
    opp(LDY, AbsoluteX, 3, 4),   // 0xBC
    opp(LDA, AbsoluteX, 3, 4),   // 0xBD
    opp(LDX, AbsoluteY, 3, 4),   // 0xBE
    opp(LAX, AbsoluteY, 3, 4),   // 0xBF
    op(CPY, Immediate, 2, 2),    // 0xC0
    op(CMP, IndirectX, 2, 6),    // 0xC1
    op(NOP, Immediate, 2, 2),    // 0xC2
    op(DCP, IndirectX, 2, 8),    // 0xC3
    op(CPY, ZeroPage, 2, 3),     // 0xC4
    op(CMP, ZeroPage, 2, 3),     // 0xC5
    op(DEC, ZeroPage, 2, 5),     // 0xC6
    op(DCP, ZeroPage, 2, 5),     // 0xC7
    op(INY, Implied, 1, 2),      // 0xC8
    op(CMP, Immediate, 2, 2),    // 0xC9
    op(DEX, Implied, 1, 2),      // 0xCA
    op(AXS, Immediate, 2, 2),    // 0xCB
    op(CPY, Absolute, 3, 4),     // 0xCC
    op(CMP, Absolute, 3, 4),     // 0xCD
    op(DEC, Absolute, 3, 6),     // 0xCE
    op(DCP, Absolute, 3, 6),     // 0xCF
    op(BNE, Relative, 2, 2),     // 0xD0
    opp(CMP, IndirectY, 2, 5),   // 0xD1
    op(STP, Implied, 1, 2),      // 0xD2
    op(DCP, IndirectY, 2, 8),    // 0xD3
    op(NOP, ZeroPageX, 2, 4),    // 0xD4
    op(CMP, ZeroPageX, 2, 4),    // 0xD5
    op(DEC, ZeroPageX, 2, 6),    // 0xD6
    op(DCP, ZeroPageX, 2, 6),    // 0xD7
    op(CLD, Implied, 1, 2),      // 0xD8
    opp(CMP, AbsoluteY, 3, 4),   // 0xD9
    op(NOP, Implied, 1, 2),      // 0xDA
    op(DCP, AbsoluteY, 3, 7),    // 0xDB
    opp(NOP, AbsoluteX, 3, 4),   // 0xDC
    opp(CMP, AbsoluteX, 3, 4),   // 0xDD
    op(DEC, AbsoluteX, 3, 7),    // 0xDE
    op(DCP, AbsoluteX, 3, 7),    // 0xDF
    op(CPX, Immediate, 2, 2),    // 0xE0
    op(SBC, IndirectX, 2, 6),    // 0xE1
    op(NOP, Immediate, 2, 2),    // 0xE2
    op(ISC, IndirectX, 2, 8),    // 0xE3
    op(CPX, ZeroPage, 2, 3),     // 0xE4
    op(SBC, ZeroPage, 2, 3),     // 0xE5
    op(INC, ZeroPage, 2, 5),     // 0xE6
    op(ISC, ZeroPage, 2, 5),     // 0xE7
    op(INX, Implied, 1, 2),      // 0xE8
    op(SBC, Immediate, 2, 2),    // 0xE9
    op(NOP, Implied, 1, 2),      // 0xEA
    op(SBC, Immediate, 2, 2),    // 0xEB
    op(CPX, Absolute, 3, 4),     // 0xEC
    op(SBC, Absolute, 3, 4),     // 0xED
    op(INC, Absolute, 3, 6),     // 0xEE
    op(ISC, Absolute, 3, 6),     // 0xEF
    op(BEQ, Relative, 2, 2),     // 0xF0
    opp(SBC, IndirectY, 2, 5),   // 0xF1
    op(STP, Implied, 1, 2),      // 0xF2
    op(ISC, IndirectY, 2, 8),    // 0xF3
    op(NOP, ZeroPageX, 2, 4),    // 0xF4
    op(SBC, ZeroPageX, 2, 4),    // 0xF5
    op(INC, ZeroPageX, 2, 6),    // 0xF6
    op(ISC, ZeroPageX, 2, 6),    // 0xF7
    op(SED, Implied, 1, 2),      // 0xF8
    opp(SBC, AbsoluteY, 3, 4),   // 0xF9
    op(NOP, Implied, 1, 2),      // 0xFA
    op(ISC, AbsoluteY, 3, 7),    // 0xFB
    opp(NOP, AbsoluteX, 3, 4),   // 0xFC
    opp(SBC, AbsoluteX, 3, 4),   // 0xFD
    op(INC, AbsoluteX, 3, 7),    // 0xFE
    op(ISC, AbsoluteX, 3, 7),    // 0xFF
];
