use super::inesfile::InesFile;
use super::{Mapper, Mirroring};

/// NROM: a fixed PRG window and CHR ROM, or 8 KiB of CHR RAM when the
/// header declares no CHR banks.
pub(super) struct Mapper0 {
    prg: Vec<u8>,
    chr: Vec<u8>,
    chr_writable: bool,
    mirroring: Mirroring,
}

impl Mapper0 {
    pub(super) fn new(ines: InesFile) -> Self {
        let mirroring = ines.mirroring();
        let chr_writable = ines.chr_rom.is_empty();
        let chr = if chr_writable {
            vec![0; 0x2000]
        } else {
            ines.chr_rom
        };

        Self {
            prg: ines.prg_rom,
            chr,
            chr_writable,
            mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    fn prg_read(&mut self, addr: u16) -> u8 {
        if addr >= 0x8000 {
            // a 16 KiB image mirrors through the whole 32 KiB window
            self.prg[(addr as usize - 0x8000) % self.prg.len()]
        } else {
            0
        }
    }

    fn prg_write(&mut self, _: u16, _: u8) {
        // PRG ROM; discarded
    }

    fn chr_read(&mut self, addr: u16) -> u8 {
        if addr <= 0x1FFF {
            self.chr[addr as usize]
        } else {
            0
        }
    }

    fn chr_write(&mut self, addr: u16, value: u8) {
        if self.chr_writable && addr <= 0x1FFF {
            self.chr[addr as usize] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
