use std::fmt;

use crate::bus::Bus;
use crate::cpu::instruction::{AddressingMode, Mnemonic, INSTRUCTIONS};
use crate::nes::Nes;

/// Snapshot of the CPU just before an instruction executes, rendered in the
/// nestest reference-log column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pc: u16,
    bytes: [u8; 3],
    size: u8,
    mnemonic: Mnemonic,
    mode: AddressingMode,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    s: u8,
    cycles: u64,
}

impl Trace {
    pub fn new(nes: &mut Nes) -> Self {
        let pc = nes.cpu.pc;
        let opcode = nes.bus.read(pc);
        let instruction = &INSTRUCTIONS[usize::from(opcode)];

        // only fetch the bytes the instruction actually occupies; the
        // operand could otherwise land on a side-effectful register
        let mut bytes = [opcode, 0, 0];
        for i in 1..usize::from(instruction.size) {
            bytes[i] = nes.bus.read(pc.wrapping_add(i as u16));
        }

        Self {
            pc,
            bytes,
            size: instruction.size,
            mnemonic: instruction.mnemonic,
            mode: instruction.mode,
            a: nes.cpu.a,
            x: nes.cpu.x,
            y: nes.cpu.y,
            p: nes.cpu.p.bits(),
            s: nes.cpu.s,
            cycles: nes.cpu.total_cycles,
        }
    }

    fn assembly(&self) -> String {
        let operand8 = self.bytes[1];
        let operand16 = u16::from(self.bytes[1]) | u16::from(self.bytes[2]) << 8;

        let operand = match self.mode {
            AddressingMode::Implied => String::new(),
            AddressingMode::Accumulator => "A".to_string(),
            AddressingMode::Immediate => format!("#${:02X}", operand8),
            AddressingMode::ZeroPage => format!("${:02X}", operand8),
            AddressingMode::ZeroPageX => format!("${:02X},X", operand8),
            AddressingMode::ZeroPageY => format!("${:02X},Y", operand8),
            // the resolved target reads better than a raw offset
            AddressingMode::Relative => {
                let target = self.pc.wrapping_add(2).wrapping_add(operand8 as i8 as u16);
                format!("${:04X}", target)
            }
            AddressingMode::Absolute => format!("${:04X}", operand16),
            AddressingMode::AbsoluteX => format!("${:04X},X", operand16),
            AddressingMode::AbsoluteY => format!("${:04X},Y", operand16),
            AddressingMode::Indirect => format!("(${:04X})", operand16),
            AddressingMode::IndirectX => format!("(${:02X},X)", operand8),
            AddressingMode::IndirectY => format!("(${:02X}),Y", operand8),
        };

        if operand.is_empty() {
            self.mnemonic.to_string()
        } else {
            format!("{} {}", self.mnemonic, operand)
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machine_code = match self.size {
            3 => format!(
                "{:02X} {:02X} {:02X}",
                self.bytes[0], self.bytes[1], self.bytes[2]
            ),
            2 => format!("{:02X} {:02X}", self.bytes[0], self.bytes[1]),
            _ => format!("{:02X}", self.bytes[0]),
        };

        write!(
            f,
            "{:04X}  {:<10}{:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc,
            machine_code,
            self.assembly(),
            self.a,
            self.x,
            self.y,
            self.p,
            self.s,
            self.cycles
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
