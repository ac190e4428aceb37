pub(crate) mod instruction;

use crate::bus::Bus;

use self::instruction::{AddressingMode, Mnemonic, INSTRUCTIONS};

pub(crate) const NMI_VECTOR: u16 = 0xFFFA;
pub(crate) const RESET_VECTOR: u16 = 0xFFFC;
pub(crate) const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_PAGE: u16 = 0x0100;
const STACK_RESET: u8 = 0xFD;

/// MOS 6502 register file plus the cycle bookkeeping for stepped execution.
#[derive(Debug, Default, Clone)]
pub struct Cpu {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) s: u8,
    pub(crate) p: Status,
    pub(crate) pc: u16,

    // Cycles left before the current instruction retires
    pub(crate) cycles: u8,
    pub(crate) total_cycles: u64,
}

bitflags! {
    #[derive(Default)]
    pub(crate) struct Status: u8 {
        // Negative
        const N = 1 << 7;
        // Overflow
        const V = 1 << 6;
        const R = 1 << 5;
        const B = 1 << 4;
        // Decimal mode; held but never consulted by arithmetic on the NES
        const D = 1 << 3;
        // IRQ prevention
        const I = 1 << 2;
        // Zero
        const Z = 1 << 1;
        // Carry
        const C = 1 << 0;
        // https://wiki.nesdev.com/w/index.php/Status_flags#The_B_flag
        const OPERATED_B = 0b0011_0000;
    }
}

impl Status {
    fn set_zn(&mut self, value: u8) {
        self.set(Self::Z, value == 0);
        self.set(Self::N, value & 0x80 != 0);
    }
}

/// Resolved operand handed to the operation body.
#[derive(Debug, Copy, Clone)]
struct Operand {
    mode: AddressingMode,
    addr: u16,
    // Address of the opcode itself; branches measure their page penalty
    // against this, not the already-advanced program counter.
    pc: u16,
}

/// Advance the CPU by one cycle. Returns true when this cycle retires the
/// in-flight instruction, so the caller can observe instruction boundaries.
///
/// Side effects of an instruction are committed atomically on its first
/// cycle; the remaining cycles of its advertised cost are burned down on the
/// following calls. The totals still come out exact, which is all the
/// CPU/PPU cadence needs.
pub(crate) fn clock<B: Bus>(cpu: &mut Cpu, bus: &mut B) -> bool {
    if cpu.cycles > 0 {
        cpu.cycles -= 1;
        return cpu.cycles == 0;
    }

    let pc = cpu.pc;
    let opcode = bus.read(pc);
    let instruction = &INSTRUCTIONS[opcode as usize];

    let (addr, page_crossed) = operand_address(cpu, bus, instruction.mode);

    cpu.cycles = instruction.cycles;
    if page_crossed && instruction.page_penalty {
        cpu.cycles += 1;
    }

    cpu.pc = pc.wrapping_add(u16::from(instruction.size));

    let operand = Operand {
        mode: instruction.mode,
        addr,
        pc,
    };
    execute(cpu, bus, instruction.mnemonic, operand);

    cpu.total_cycles += u64::from(cpu.cycles);
    cpu.cycles -= 1;

    false
}

fn page_crossed(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}

/// Effective-address computation. The bool is the page-cross signal consumed
/// by the table's penalty flag.
fn operand_address<B: Bus>(cpu: &mut Cpu, bus: &mut B, mode: AddressingMode) -> (u16, bool) {
    match mode {
        AddressingMode::Implied | AddressingMode::Accumulator => (0, false),

        AddressingMode::Immediate => (cpu.pc.wrapping_add(1), false),

        AddressingMode::ZeroPage => (u16::from(bus.read(cpu.pc.wrapping_add(1))), false),
        AddressingMode::ZeroPageX => {
            let addr = bus.read(cpu.pc.wrapping_add(1)).wrapping_add(cpu.x);
            (u16::from(addr), false)
        }
        AddressingMode::ZeroPageY => {
            let addr = bus.read(cpu.pc.wrapping_add(1)).wrapping_add(cpu.y);
            (u16::from(addr), false)
        }

        AddressingMode::Relative => {
            let offset = bus.read(cpu.pc.wrapping_add(1)) as i8;
            (cpu.pc.wrapping_add(2).wrapping_add(offset as u16), false)
        }

        AddressingMode::Absolute => (bus.read_word(cpu.pc.wrapping_add(1)), false),
        AddressingMode::AbsoluteX => {
            let base = bus.read_word(cpu.pc.wrapping_add(1));
            let addr = base.wrapping_add(u16::from(cpu.x));
            (addr, page_crossed(base, addr))
        }
        AddressingMode::AbsoluteY => {
            let base = bus.read_word(cpu.pc.wrapping_add(1));
            let addr = base.wrapping_add(u16::from(cpu.y));
            (addr, page_crossed(base, addr))
        }

        AddressingMode::Indirect => {
            let ptr = bus.read_word(cpu.pc.wrapping_add(1));
            (bus.read_word_bug(ptr), false)
        }
        AddressingMode::IndirectX => {
            let ptr = bus.read(cpu.pc.wrapping_add(1)).wrapping_add(cpu.x);
            (bus.read_word_bug(u16::from(ptr)), false)
        }
        AddressingMode::IndirectY => {
            let ptr = u16::from(bus.read(cpu.pc.wrapping_add(1)));
            let base = bus.read_word_bug(ptr);
            let addr = base.wrapping_add(u16::from(cpu.y));
            (addr, page_crossed(base, addr))
        }
    }
}

/// The single dispatch site: every opcode's semantics hang off its mnemonic
/// tag, so the match is exhaustive by construction.
fn execute<B: Bus>(cpu: &mut Cpu, bus: &mut B, mnemonic: Mnemonic, operand: Operand) {
    match mnemonic {
        Mnemonic::LDA => cpu.lda(bus, operand.addr),
        Mnemonic::LDX => cpu.ldx(bus, operand.addr),
        Mnemonic::LDY => cpu.ldy(bus, operand.addr),
        Mnemonic::STA => bus.write(operand.addr, cpu.a),
        Mnemonic::STX => bus.write(operand.addr, cpu.x),
        Mnemonic::STY => bus.write(operand.addr, cpu.y),

        Mnemonic::TAX => cpu.tax(),
        Mnemonic::TSX => cpu.tsx(),
        Mnemonic::TAY => cpu.tay(),
        Mnemonic::TXA => cpu.txa(),
        Mnemonic::TXS => cpu.s = cpu.x,
        Mnemonic::TYA => cpu.tya(),

        Mnemonic::PHA => cpu.push(bus, cpu.a),
        Mnemonic::PHP => cpu.php(bus),
        Mnemonic::PLA => cpu.pla(bus),
        Mnemonic::PLP => cpu.plp(bus),

        Mnemonic::AND => cpu.and(bus, operand.addr),
        Mnemonic::EOR => cpu.eor(bus, operand.addr),
        Mnemonic::ORA => cpu.ora(bus, operand.addr),
        Mnemonic::BIT => cpu.bit(bus, operand.addr),

        Mnemonic::ADC => {
            let value = bus.read(operand.addr);
            cpu.adc_value(value)
        }
        Mnemonic::SBC => {
            let value = bus.read(operand.addr);
            cpu.sbc_value(value)
        }
        Mnemonic::CMP => {
            let value = bus.read(operand.addr);
            cpu.compare(cpu.a, value)
        }
        Mnemonic::CPX => {
            let value = bus.read(operand.addr);
            cpu.compare(cpu.x, value)
        }
        Mnemonic::CPY => {
            let value = bus.read(operand.addr);
            cpu.compare(cpu.y, value)
        }

        Mnemonic::INC => {
            cpu.inc_mem(bus, operand.addr);
        }
        Mnemonic::INX => {
            cpu.x = cpu.x.wrapping_add(1);
            cpu.p.set_zn(cpu.x)
        }
        Mnemonic::INY => {
            cpu.y = cpu.y.wrapping_add(1);
            cpu.p.set_zn(cpu.y)
        }
        Mnemonic::DEC => {
            cpu.dec_mem(bus, operand.addr);
        }
        Mnemonic::DEX => {
            cpu.x = cpu.x.wrapping_sub(1);
            cpu.p.set_zn(cpu.x)
        }
        Mnemonic::DEY => {
            cpu.y = cpu.y.wrapping_sub(1);
            cpu.p.set_zn(cpu.y)
        }

        Mnemonic::ASL => cpu.asl(bus, operand),
        Mnemonic::LSR => cpu.lsr(bus, operand),
        Mnemonic::ROL => cpu.rol(bus, operand),
        Mnemonic::ROR => cpu.ror(bus, operand),

        Mnemonic::JMP => cpu.pc = operand.addr,
        Mnemonic::JSR => cpu.jsr(bus, operand.addr),
        Mnemonic::RTS => cpu.rts(bus),
        Mnemonic::RTI => cpu.rti(bus),

        Mnemonic::BCC => cpu.branch(!cpu.p.contains(Status::C), operand),
        Mnemonic::BCS => cpu.branch(cpu.p.contains(Status::C), operand),
        Mnemonic::BEQ => cpu.branch(cpu.p.contains(Status::Z), operand),
        Mnemonic::BMI => cpu.branch(cpu.p.contains(Status::N), operand),
        Mnemonic::BNE => cpu.branch(!cpu.p.contains(Status::Z), operand),
        Mnemonic::BPL => cpu.branch(!cpu.p.contains(Status::N), operand),
        Mnemonic::BVC => cpu.branch(!cpu.p.contains(Status::V), operand),
        Mnemonic::BVS => cpu.branch(cpu.p.contains(Status::V), operand),

        Mnemonic::CLC => cpu.p.remove(Status::C),
        Mnemonic::CLD => cpu.p.remove(Status::D),
        Mnemonic::CLI => cpu.p.remove(Status::I),
        Mnemonic::CLV => cpu.p.remove(Status::V),
        Mnemonic::SEC => cpu.p.insert(Status::C),
        Mnemonic::SED => cpu.p.insert(Status::D),
        Mnemonic::SEI => cpu.p.insert(Status::I),

        Mnemonic::BRK => cpu.brk(bus),
        Mnemonic::NOP => {}

        Mnemonic::LAX => cpu.lax(bus, operand.addr),
        Mnemonic::SAX => bus.write(operand.addr, cpu.a & cpu.x),
        Mnemonic::DCP => {
            let value = cpu.dec_mem(bus, operand.addr);
            cpu.compare(cpu.a, value)
        }
        Mnemonic::ISC => {
            let value = cpu.inc_mem(bus, operand.addr);
            cpu.sbc_value(value)
        }
        Mnemonic::SLO => {
            let value = cpu.asl_mem(bus, operand.addr);
            cpu.ora_value(value)
        }
        Mnemonic::RLA => {
            let value = cpu.rol_mem(bus, operand.addr);
            cpu.and_value(value)
        }
        Mnemonic::SRE => {
            let value = cpu.lsr_mem(bus, operand.addr);
            cpu.eor_value(value)
        }
        Mnemonic::RRA => {
            let value = cpu.ror_mem(bus, operand.addr);
            cpu.adc_value(value)
        }

        Mnemonic::ANC => cpu.anc(bus, operand.addr),
        Mnemonic::ALR => cpu.alr(bus, operand.addr),
        Mnemonic::ARR => cpu.arr(bus, operand.addr),
        Mnemonic::AXS => cpu.axs(bus, operand.addr),
        Mnemonic::LAS => cpu.las(bus, operand.addr),

        Mnemonic::AHX => {
            let high = (operand.addr >> 8) as u8;
            bus.write(operand.addr, cpu.a & cpu.x & high.wrapping_add(1))
        }
        Mnemonic::SHX => {
            let high = (operand.addr >> 8) as u8;
            bus.write(operand.addr, cpu.x & high.wrapping_add(1))
        }
        Mnemonic::SHY => {
            let high = (operand.addr >> 8) as u8;
            bus.write(operand.addr, cpu.y & high.wrapping_add(1))
        }
        Mnemonic::TAS => cpu.tas(bus, operand.addr),

        // Unstable on silicon; inert here so execution can never fault
        Mnemonic::XAA | Mnemonic::LXA | Mnemonic::STP => {}
    }
}

impl Cpu {
    // LoaD Accumulator
    fn lda<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.a = bus.read(addr);
        self.p.set_zn(self.a)
    }

    // LoaD X register
    fn ldx<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.x = bus.read(addr);
        self.p.set_zn(self.x)
    }

    // LoaD Y register
    fn ldy<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.y = bus.read(addr);
        self.p.set_zn(self.y)
    }

    fn tax(&mut self) {
        self.x = self.a;
        self.p.set_zn(self.x)
    }

    fn tsx(&mut self) {
        self.x = self.s;
        self.p.set_zn(self.x)
    }

    fn tay(&mut self) {
        self.y = self.a;
        self.p.set_zn(self.y)
    }

    fn txa(&mut self) {
        self.a = self.x;
        self.p.set_zn(self.a)
    }

    fn tya(&mut self) {
        self.a = self.y;
        self.p.set_zn(self.a)
    }

    // PusH Processor status
    fn php<B: Bus>(&mut self, bus: &mut B) {
        // The pushed byte always carries B and the unused bit;
        // https://wiki.nesdev.com/w/index.php/Status_flags#The_B_flag
        self.push(bus, (self.p | Status::OPERATED_B).bits())
    }

    // PulL Accumulator
    fn pla<B: Bus>(&mut self, bus: &mut B) {
        self.a = self.pop(bus);
        self.p.set_zn(self.a)
    }

    // PulL Processor status
    fn plp<B: Bus>(&mut self, bus: &mut B) {
        let bits = self.pop(bus);
        self.p = Status::from_bits_truncate(bits) & !Status::B | Status::R
    }

    fn and<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.and_value(value)
    }

    fn and_value(&mut self, value: u8) {
        self.a &= value;
        self.p.set_zn(self.a)
    }

    fn eor<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.eor_value(value)
    }

    fn eor_value(&mut self, value: u8) {
        self.a ^= value;
        self.p.set_zn(self.a)
    }

    fn ora<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.ora_value(value)
    }

    fn ora_value(&mut self, value: u8) {
        self.a |= value;
        self.p.set_zn(self.a)
    }

    // test BITs
    fn bit<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.p.set(Status::Z, self.a & value == 0);
        self.p.set(Status::V, value & 0x40 != 0);
        self.p.set(Status::N, value & 0x80 != 0);
    }

    // ADd with Carry
    // http://www.righto.com/2012/12/the-6502-overflow-flag-explained.html
    fn adc_value(&mut self, value: u8) {
        let a = u16::from(self.a);
        let m = u16::from(value);
        let carry = u16::from(self.p.contains(Status::C));
        let result = a + m + carry;

        self.p.set(Status::V, (a ^ result) & !(a ^ m) & 0x0080 != 0);
        self.p.set(Status::C, result > 0xFF);

        self.a = result as u8;
        self.p.set_zn(self.a)
    }

    // SuBtract with Carry is ADC of the one's complement; the D flag is
    // ignored entirely on the 2A03
    fn sbc_value(&mut self, value: u8) {
        self.adc_value(value ^ 0xFF)
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.p.set(Status::C, register >= value);
        self.p.set_zn(register.wrapping_sub(value))
    }

    fn inc_mem<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let value = bus.read(addr).wrapping_add(1);
        bus.write(addr, value);
        self.p.set_zn(value);
        value
    }

    fn dec_mem<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let value = bus.read(addr).wrapping_sub(1);
        bus.write(addr, value);
        self.p.set_zn(value);
        value
    }

    // Arithmetic Shift Left
    fn asl<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        if operand.mode == AddressingMode::Accumulator {
            self.p.set(Status::C, self.a & 0x80 != 0);
            self.a <<= 1;
            self.p.set_zn(self.a)
        } else {
            self.asl_mem(bus, operand.addr);
        }
    }

    fn asl_mem<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let mut value = bus.read(addr);
        self.p.set(Status::C, value & 0x80 != 0);
        value <<= 1;
        self.p.set_zn(value);
        bus.write(addr, value);
        value
    }

    // Logical Shift Right
    fn lsr<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        if operand.mode == AddressingMode::Accumulator {
            self.p.set(Status::C, self.a & 0x01 != 0);
            self.a >>= 1;
            self.p.set_zn(self.a)
        } else {
            self.lsr_mem(bus, operand.addr);
        }
    }

    fn lsr_mem<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let mut value = bus.read(addr);
        self.p.set(Status::C, value & 0x01 != 0);
        value >>= 1;
        self.p.set_zn(value);
        bus.write(addr, value);
        value
    }

    // ROtate Left, through the carry
    fn rol<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        if operand.mode == AddressingMode::Accumulator {
            let carry = u8::from(self.p.contains(Status::C));
            self.p.set(Status::C, self.a & 0x80 != 0);
            self.a = self.a << 1 | carry;
            self.p.set_zn(self.a)
        } else {
            self.rol_mem(bus, operand.addr);
        }
    }

    fn rol_mem<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let carry = u8::from(self.p.contains(Status::C));
        let mut value = bus.read(addr);
        self.p.set(Status::C, value & 0x80 != 0);
        value = value << 1 | carry;
        self.p.set_zn(value);
        bus.write(addr, value);
        value
    }

    // ROtate Right, through the carry
    fn ror<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
        if operand.mode == AddressingMode::Accumulator {
            let carry = u8::from(self.p.contains(Status::C)) << 7;
            self.p.set(Status::C, self.a & 0x01 != 0);
            self.a = self.a >> 1 | carry;
            self.p.set_zn(self.a)
        } else {
            self.ror_mem(bus, operand.addr);
        }
    }

    fn ror_mem<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let carry = u8::from(self.p.contains(Status::C)) << 7;
        let mut value = bus.read(addr);
        self.p.set(Status::C, value & 0x01 != 0);
        value = value >> 1 | carry;
        self.p.set_zn(value);
        bus.write(addr, value);
        value
    }

    // Jump to SubRoutine; the pushed address is the last byte of this
    // instruction, RTS compensates
    fn jsr<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.push_word(bus, self.pc.wrapping_sub(1));
        self.pc = addr
    }

    // ReTurn from Subroutine
    fn rts<B: Bus>(&mut self, bus: &mut B) {
        self.pc = self.pop_word(bus).wrapping_add(1)
    }

    // ReTurn from Interrupt
    fn rti<B: Bus>(&mut self, bus: &mut B) {
        let bits = self.pop(bus);
        self.p = Status::from_bits_truncate(bits) & !Status::B | Status::R;
        self.pc = self.pop_word(bus)
    }

    fn branch(&mut self, taken: bool, operand: Operand) {
        if taken {
            self.cycles += 1;
            if page_crossed(operand.pc, operand.addr) {
                self.cycles += 1;
            }
            self.pc = operand.addr
        }
    }

    // BReaK: the pushed status carries B, and the return address is wherever
    // the descriptor advance left the program counter
    fn brk<B: Bus>(&mut self, bus: &mut B) {
        self.push_word(bus, self.pc);
        self.push(bus, (self.p | Status::OPERATED_B).bits());
        self.p.insert(Status::I);
        self.pc = bus.read_word(IRQ_VECTOR)
    }

    // Load Accumulator and X register
    fn lax<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.a = value;
        self.x = value;
        self.p.set_zn(value)
    }

    // AND then copy N into C
    fn anc<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.and_value(value);
        self.p.set(Status::C, self.p.contains(Status::N))
    }

    // AND then shift right
    fn alr<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        self.a &= value;
        self.p.set(Status::C, self.a & 0x01 != 0);
        self.a >>= 1;
        self.p.set_zn(self.a)
    }

    // AND then rotate right; C and V come from bits 6 and 5 of the result
    fn arr<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        let carry = u8::from(self.p.contains(Status::C)) << 7;
        self.a = (self.a & value) >> 1 | carry;
        self.p.set_zn(self.a);
        self.p.set(Status::C, self.a & 0x40 != 0);
        self.p
            .set(Status::V, (self.a >> 6 ^ self.a >> 5) & 0x01 != 0)
    }

    // (A AND X) minus operand into X, without borrow-in
    fn axs<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let value = bus.read(addr);
        let masked = self.a & self.x;
        self.p.set(Status::C, masked >= value);
        self.x = masked.wrapping_sub(value);
        self.p.set_zn(self.x)
    }

    // Memory AND stack pointer into A, X and S
    fn las<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.s &= bus.read(addr);
        self.a = self.s;
        self.x = self.s;
        self.p.set_zn(self.a)
    }

    fn tas<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.s = self.a & self.x;
        let high = (addr >> 8) as u8;
        bus.write(addr, self.s & high.wrapping_add(1))
    }
}

// Stack discipline: the page at $0100, descending, pointer wraps modulo 256.
impl Cpu {
    fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_PAGE | u16::from(self.s), value);
        self.s = self.s.wrapping_sub(1);
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(STACK_PAGE | u16::from(self.s))
    }

    fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0x00FF) as u8);
    }

    fn pop_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = u16::from(self.pop(bus));
        let high = u16::from(self.pop(bus));
        high << 8 | low
    }
}

// Interrupt entry points. The system clock decides when these fire; the CPU
// only knows how to vector.
impl Cpu {
    // https://wiki.nesdev.com/w/index.php/CPU_power_up_state
    pub(crate) fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.s = STACK_RESET;
        self.p = Status::R | Status::I;
        self.pc = bus.read_word(RESET_VECTOR);

        self.cycles = 0;
        self.total_cycles = 0;
    }

    pub(crate) fn nmi<B: Bus>(&mut self, bus: &mut B) {
        self.push_word(bus, self.pc);
        self.p.remove(Status::B);
        self.p.insert(Status::I | Status::R);
        self.push(bus, self.p.bits());
        self.pc = bus.read_word(NMI_VECTOR);

        self.cycles = 8;
        self.total_cycles += u64::from(self.cycles);
        self.cycles -= 1;
    }

    pub(crate) fn irq<B: Bus>(&mut self, bus: &mut B) {
        if self.p.contains(Status::I) {
            return;
        }

        self.push_word(bus, self.pc);
        self.p.remove(Status::B);
        self.p.insert(Status::I | Status::R);
        self.push(bus, self.p.bits());
        self.pc = bus.read_word(IRQ_VECTOR);

        self.cycles = 7;
        self.total_cycles += u64::from(self.cycles);
        self.cycles -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatRam {
        ram: Vec<u8>,
    }

    impl FlatRam {
        fn new() -> Self {
            Self {
                ram: vec![0; 0x10000],
            }
        }
    }

    impl Bus for FlatRam {
        fn read(&mut self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.ram[addr as usize] = value;
        }
    }

    // Deterministic generator for the sampled invariant tests
    struct Lcg(u64);

    impl Lcg {
        fn next_byte(&mut self) -> u8 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 33) as u8
        }
    }

    // Run `clock` until the next instruction boundary.
    fn step_instruction<B: Bus>(cpu: &mut Cpu, bus: &mut B) {
        while !clock(cpu, bus) {}
    }

    fn cpu_at(pc: u16) -> Cpu {
        Cpu {
            pc,
            p: Status::R | Status::I,
            s: STACK_RESET,
            ..Default::default()
        }
    }

    #[test]
    fn reset_applies_power_up_state() {
        let mut ram = FlatRam::new();
        ram.write(RESET_VECTOR, 0x00);
        ram.write(RESET_VECTOR + 1, 0xC0);

        let mut cpu = Cpu::default();
        cpu.reset(&mut ram);

        assert_eq!(cpu.pc, 0xC000);
        assert_eq!(cpu.s, 0xFD);
        assert_eq!(cpu.p.bits(), 0x24);
        assert_eq!((cpu.a, cpu.x, cpu.y), (0, 0, 0));
        assert_eq!(cpu.cycles, 0);
        assert_eq!(cpu.total_cycles, 0);
    }

    #[test]
    fn lda_immediate() {
        let mut ram = FlatRam::new();
        ram.write(0xC000, 0xA9);
        ram.write(0xC001, 0x42);

        let mut cpu = cpu_at(0xC000);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.a, 0x42);
        assert!(!cpu.p.contains(Status::Z));
        assert!(!cpu.p.contains(Status::N));
        assert_eq!(cpu.pc, 0xC002);
        assert_eq!(cpu.total_cycles, 2);
    }

    #[test]
    fn branch_taken_page_crossed() {
        let mut ram = FlatRam::new();
        ram.write(0x00FE, 0xF0); // BEQ +2
        ram.write(0x00FF, 0x02);

        let mut cpu = cpu_at(0x00FE);
        cpu.p.insert(Status::Z);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.pc, 0x0102);
        assert_eq!(cpu.total_cycles, 4);
    }

    #[test]
    fn branch_taken_same_page() {
        let mut ram = FlatRam::new();
        ram.write(0x0180, 0xD0); // BNE +4
        ram.write(0x0181, 0x04);

        let mut cpu = cpu_at(0x0180);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.pc, 0x0186);
        assert_eq!(cpu.total_cycles, 3);
    }

    #[test]
    fn branch_not_taken() {
        let mut ram = FlatRam::new();
        ram.write(0x0180, 0xF0); // BEQ, Z clear
        ram.write(0x0181, 0x04);

        let mut cpu = cpu_at(0x0180);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.pc, 0x0182);
        assert_eq!(cpu.total_cycles, 2);
    }

    #[test]
    fn indirect_jmp_page_wrap() {
        let mut ram = FlatRam::new();
        ram.write(0x02FF, 0x29);
        ram.write(0x0300, 0x11);
        ram.write(0x0200, 0xFF);

        ram.write(0x0400, 0x6C); // JMP ($02FF)
        ram.write(0x0401, 0xFF);
        ram.write(0x0402, 0x02);

        let mut cpu = cpu_at(0x0400);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.pc, 0xFF29);
        assert_eq!(cpu.total_cycles, 5);
    }

    #[test]
    fn adc_overflow() {
        let mut ram = FlatRam::new();
        ram.write(0xC000, 0x69); // ADC #$50
        ram.write(0xC001, 0x50);

        let mut cpu = cpu_at(0xC000);
        cpu.a = 0x50;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.p.contains(Status::V));
        assert!(!cpu.p.contains(Status::C));
        assert!(cpu.p.contains(Status::N));
        assert!(!cpu.p.contains(Status::Z));
    }

    #[test]
    fn adc_overflow_formula_exhaustive() {
        for a in 0..=255u8 {
            for m in 0..=255u8 {
                for carry in 0..=1u8 {
                    let mut cpu = Cpu::default();
                    cpu.a = a;
                    cpu.p.set(Status::C, carry == 1);
                    cpu.adc_value(m);

                    let result = u16::from(a) + u16::from(m) + u16::from(carry);
                    let expected_v = !(a ^ m) & (a ^ result as u8) & 0x80 != 0;
                    assert_eq!(cpu.p.contains(Status::V), expected_v);
                    assert_eq!(cpu.p.contains(Status::C), result > 0xFF);
                    assert_eq!(cpu.a, result as u8);
                }
            }
        }
    }

    #[test]
    fn sbc_is_adc_of_complement() {
        for a in (0..=255u8).step_by(3) {
            for m in (0..=255u8).step_by(5) {
                for carry in 0..=1u8 {
                    let mut with_sbc = Cpu::default();
                    with_sbc.a = a;
                    with_sbc.p.set(Status::C, carry == 1);
                    with_sbc.sbc_value(m);

                    let mut with_adc = Cpu::default();
                    with_adc.a = a;
                    with_adc.p.set(Status::C, carry == 1);
                    with_adc.adc_value(m ^ 0xFF);

                    assert_eq!(with_sbc.a, with_adc.a);
                    assert_eq!(with_sbc.p, with_adc.p);

                    // and the result is the borrow-chain subtraction
                    let expected = a.wrapping_sub(m).wrapping_sub(1 - carry);
                    assert_eq!(with_sbc.a, expected);
                }
            }
        }
    }

    #[test]
    fn stack_round_trip() {
        let mut ram = FlatRam::new();
        let mut cpu = Cpu::default();
        cpu.s = 0xFF;

        for value in 0..=255u8 {
            let before = cpu.s;
            cpu.push(&mut ram, value);
            assert_eq!(cpu.pop(&mut ram), value);
            assert_eq!(cpu.s, before);
        }

        cpu.push(&mut ram, 0x83);
        cpu.push(&mut ram, 0x14);
        assert_eq!(cpu.pop(&mut ram), 0x14);
        assert_eq!(cpu.pop(&mut ram), 0x83);
    }

    #[test]
    fn stack_word_round_trip() {
        let mut ram = FlatRam::new();
        let mut cpu = Cpu::default();
        cpu.s = 0xFF;

        cpu.push_word(&mut ram, 0x98AF);
        cpu.push_word(&mut ram, 0x003A);

        // low byte sits at the numerically lower address
        assert_eq!(ram.read(0x01FF), 0x98);
        assert_eq!(ram.read(0x01FE), 0xAF);

        assert_eq!(cpu.pop_word(&mut ram), 0x003A);
        assert_eq!(cpu.pop_word(&mut ram), 0x98AF);
        assert_eq!(cpu.s, 0xFF);
    }

    #[test]
    fn stack_pointer_wraps() {
        let mut ram = FlatRam::new();
        let mut cpu = Cpu::default();
        cpu.s = 0x00;

        cpu.push(&mut ram, 0x77);
        assert_eq!(cpu.s, 0xFF);
        assert_eq!(cpu.pop(&mut ram), 0x77);
        assert_eq!(cpu.s, 0x00);
    }

    #[test]
    fn set_zn_cases() {
        let mut p = Status::default();

        p.set_zn(0x00);
        assert!(p.contains(Status::Z));
        assert!(!p.contains(Status::N));

        p.set_zn(0x80);
        assert!(!p.contains(Status::Z));
        assert!(p.contains(Status::N));

        p.set_zn(0x7F);
        assert!(!p.contains(Status::Z));
        assert!(!p.contains(Status::N));
    }

    #[test]
    fn php_pushes_b_and_unused() {
        let mut ram = FlatRam::new();
        ram.write(0x0200, 0x08); // PHP

        let mut cpu = cpu_at(0x0200);
        cpu.p = Status::R | Status::C;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(ram.read(0x01FD), 0x31); // C | B | R
        // the live register never holds B
        assert!(!cpu.p.contains(Status::B));
    }

    #[test]
    fn plp_clears_b_and_forces_unused() {
        let mut ram = FlatRam::new();
        ram.write(0x01FE, 0xDF); // everything except R
        ram.write(0x0200, 0x28); // PLP

        let mut cpu = cpu_at(0x0200);
        cpu.s = 0xFD;
        step_instruction(&mut cpu, &mut ram);

        assert!(!cpu.p.contains(Status::B));
        assert!(cpu.p.contains(Status::R));
        assert!(cpu.p.contains(Status::N));
        assert!(cpu.p.contains(Status::C));
    }

    #[test]
    fn txs_sets_no_flags_tsx_reads_s() {
        let mut ram = FlatRam::new();
        ram.write(0x0200, 0x9A); // TXS
        ram.write(0x0201, 0xBA); // TSX

        let mut cpu = cpu_at(0x0200);
        cpu.x = 0x00;
        cpu.y = 0x80; // must not leak into TSX flags
        cpu.p.remove(Status::Z);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.s, 0x00);
        assert!(!cpu.p.contains(Status::Z)); // TXS left flags alone

        step_instruction(&mut cpu, &mut ram);
        assert_eq!(cpu.x, 0x00);
        assert!(cpu.p.contains(Status::Z)); // TSX set them from S
        assert!(!cpu.p.contains(Status::N));
    }

    #[test]
    fn jsr_rts_round_trip() {
        let mut ram = FlatRam::new();
        ram.write(0x0200, 0x20); // JSR $0300
        ram.write(0x0201, 0x00);
        ram.write(0x0202, 0x03);
        ram.write(0x0300, 0x60); // RTS

        let mut cpu = cpu_at(0x0200);
        step_instruction(&mut cpu, &mut ram);
        assert_eq!(cpu.pc, 0x0300);

        step_instruction(&mut cpu, &mut ram);
        assert_eq!(cpu.pc, 0x0203);
        assert_eq!(cpu.s, STACK_RESET);
        assert_eq!(cpu.total_cycles, 12);
    }

    #[test]
    fn brk_vectors_and_rti_restores() {
        let mut ram = FlatRam::new();
        ram.write(IRQ_VECTOR, 0x00);
        ram.write(IRQ_VECTOR + 1, 0x80);
        ram.write(0x0200, 0x00); // BRK
        ram.write(0x8000, 0x40); // RTI

        let mut cpu = cpu_at(0x0200);
        cpu.p = Status::R | Status::C;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.pc, 0x8000);
        assert!(cpu.p.contains(Status::I));
        // pushed copy carries B
        assert_eq!(ram.read(0x01FB), (Status::R | Status::C | Status::OPERATED_B).bits());

        step_instruction(&mut cpu, &mut ram);
        assert_eq!(cpu.pc, 0x0201);
        assert!(!cpu.p.contains(Status::B));
        assert!(cpu.p.contains(Status::C));
    }

    #[test]
    fn nmi_pushes_and_vectors() {
        let mut ram = FlatRam::new();
        ram.write(NMI_VECTOR, 0x34);
        ram.write(NMI_VECTOR + 1, 0x12);

        let mut cpu = cpu_at(0xC123);
        cpu.p = Status::R | Status::C;
        cpu.nmi(&mut ram);

        assert_eq!(cpu.pc, 0x1234);
        assert!(cpu.p.contains(Status::I));
        assert_eq!(cpu.total_cycles, 8);
        assert_eq!(cpu.cycles, 7);

        // pushed status has B clear and the unused bit set
        let pushed = ram.read(0x01FB);
        assert_eq!(pushed & 0x30, 0x20);
        // return address
        assert_eq!(ram.read(0x01FD), 0xC1);
        assert_eq!(ram.read(0x01FC), 0x23);
    }

    #[test]
    fn irq_suppressed_by_interrupt_disable() {
        let mut ram = FlatRam::new();
        ram.write(IRQ_VECTOR, 0x00);
        ram.write(IRQ_VECTOR + 1, 0x90);

        let mut cpu = cpu_at(0xC123);
        cpu.p = Status::R | Status::I;
        cpu.irq(&mut ram);
        assert_eq!(cpu.pc, 0xC123);
        assert_eq!(cpu.total_cycles, 0);

        cpu.p.remove(Status::I);
        cpu.irq(&mut ram);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.total_cycles, 7);
    }

    #[test]
    fn jam_opcode_is_inert() {
        let mut ram = FlatRam::new();
        ram.write(0x0200, 0x02);

        let mut cpu = cpu_at(0x0200);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.pc, 0x0201);
        assert_eq!(cpu.total_cycles, 2);
    }

    #[test]
    fn zero_page_indexed_wraps() {
        let mut ram = FlatRam::new();
        ram.write(0x0010, 0x55); // ($80 + $90) & $FF
        ram.write(0x0200, 0xB5); // LDA $80,X
        ram.write(0x0201, 0x80);

        let mut cpu = cpu_at(0x0200);
        cpu.x = 0x90;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.a, 0x55);
        assert_eq!(cpu.total_cycles, 4);
    }

    #[test]
    fn indirect_x_pointer_wraps_in_zero_page() {
        let mut ram = FlatRam::new();
        ram.write(0x00FF, 0x00);
        ram.write(0x0000, 0x04); // target $0400, high byte wraps to $00
        ram.write(0x0400, 0x5A);

        ram.write(0x0200, 0xA1); // LDA ($FF,X), X = 0
        ram.write(0x0201, 0xFF);

        let mut cpu = cpu_at(0x0200);
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.a, 0x5A);
    }

    #[test]
    fn indirect_y_page_cross_penalty() {
        let mut ram = FlatRam::new();
        ram.write(0x0080, 0xFF);
        ram.write(0x0081, 0x02); // base $02FF
        ram.write(0x0380, 0x77); // $02FF + $81 crosses into $0380

        ram.write(0x0200, 0xB1); // LDA ($80),Y
        ram.write(0x0201, 0x80);

        let mut cpu = cpu_at(0x0200);
        cpu.y = 0x81;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(cpu.a, 0x77);
        assert_eq!(cpu.total_cycles, 6); // 5 + page cross
    }

    #[test]
    fn slo_composes_asl_and_ora() {
        let mut ram = FlatRam::new();
        ram.write(0x0040, 0b0100_0001);
        ram.write(0x0200, 0x07); // SLO $40
        ram.write(0x0201, 0x40);

        let mut cpu = cpu_at(0x0200);
        cpu.a = 0x01;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(ram.read(0x0040), 0b1000_0010);
        assert_eq!(cpu.a, 0b1000_0011);
        assert!(cpu.p.contains(Status::N));
        assert!(!cpu.p.contains(Status::C));
    }

    #[test]
    fn dcp_composes_dec_and_cmp() {
        let mut ram = FlatRam::new();
        ram.write(0x0040, 0x11);
        ram.write(0x0200, 0xC7); // DCP $40
        ram.write(0x0201, 0x40);

        let mut cpu = cpu_at(0x0200);
        cpu.a = 0x10;
        step_instruction(&mut cpu, &mut ram);

        assert_eq!(ram.read(0x0040), 0x10);
        assert!(cpu.p.contains(Status::C));
        assert!(cpu.p.contains(Status::Z));
    }

    #[test]
    fn cycle_accounting_matches_table() {
        let mut rng = Lcg(0x6502_C0DE);

        for opcode in 0..=255u8 {
            let instruction = &INSTRUCTIONS[opcode as usize];

            for _ in 0..16 {
                let mut ram = FlatRam::new();
                for addr in 0x0000..0x0200u16 {
                    let value = rng.next_byte();
                    ram.write(addr, value);
                }

                let pc = 0x4000;
                ram.write(pc, opcode);
                ram.write(pc + 1, rng.next_byte());
                ram.write(pc + 2, rng.next_byte());

                let mut cpu = Cpu {
                    a: rng.next_byte(),
                    x: rng.next_byte(),
                    y: rng.next_byte(),
                    s: rng.next_byte(),
                    p: Status::from_bits_truncate(rng.next_byte()) | Status::R,
                    pc,
                    ..Default::default()
                };

                step_instruction(&mut cpu, &mut ram);
                let spent = cpu.total_cycles;

                let base = u64::from(instruction.cycles);
                let slack = if instruction.mode == AddressingMode::Relative {
                    2
                } else if instruction.page_penalty {
                    1
                } else {
                    0
                };
                assert!(
                    spent >= base && spent <= base + slack,
                    "opcode {:02X}: spent {} cycles, table says {}..={}",
                    opcode,
                    spent,
                    base,
                    base + slack
                );
            }
        }
    }
}
