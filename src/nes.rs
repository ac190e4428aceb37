use crate::bus::SystemBus;
use crate::cpu::{self, Cpu};
use crate::rom::Cartridge;

/// The console. Owns the CPU and the bus (which owns RAM, PPU and
/// cartridge) and drives them at the hardware ratio of three PPU dots per
/// CPU cycle.
pub struct Nes {
    pub(crate) cpu: Cpu,
    pub(crate) bus: SystemBus,
    ticks: u64,
}

impl Nes {
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            cpu: Cpu::default(),
            bus: SystemBus::new(cartridge),
            ticks: 0,
        }
    }

    /// Power-up: clean RAM, registers per the 6502 power-up state, entry
    /// through the reset vector.
    pub fn power_on(&mut self) {
        self.bus.clear_ram();
        self.cpu.reset(&mut self.bus);
    }

    /// External reset line: the CPU re-vectors, memory keeps its contents.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    /// One master tick. The PPU advances one dot; on every third tick the
    /// CPU advances one cycle. After the CPU's cycle the PPU NMI line is
    /// sampled, so a raised edge is taken at the instruction boundary
    /// before the next cycle is accounted. Returns true when a CPU
    /// instruction retired on this tick.
    pub fn clock(&mut self) -> bool {
        self.bus.ppu.step();
        self.ticks += 1;

        let mut completed = false;
        if self.ticks % 3 == 0 {
            completed = cpu::clock(&mut self.cpu, &mut self.bus);
            if self.cpu.cycles == 0 && self.bus.ppu.take_nmi() {
                self.cpu.nmi(&mut self.bus);
            }
        }
        completed
    }

    /// Drive the clock until the CPU finishes an instruction.
    pub fn step_instruction(&mut self) {
        while !self.clock() {}
    }

    /// External IRQ line. Level-checked against the I flag by the CPU;
    /// nothing on an NROM board drives it, but mappers and frontends can.
    pub fn irq(&mut self) {
        self.cpu.irq(&mut self.bus);
    }

    pub fn cpu_cycles(&self) -> u64 {
        self.cpu.total_cycles
    }
}
