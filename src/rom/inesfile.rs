use crate::rom::Mirroring;

/// iNES 1.0 image: 16-byte header, optional 512-byte trainer, then the PRG
/// and CHR banks back to back.
#[derive(BinRead, Debug)]
#[br(magic = b"NES\x1A")]
pub(super) struct InesFile {
    prg_rom_unit_size: u8,
    chr_rom_unit_size: u8,
    pub(super) flags6: Flags6,
    flags7: Flags7,

    // header bytes 8-15 carry nothing this core consumes
    #[allow(dead_code)]
    header_rest: [u8; 8],

    // the trainer, when present, is skipped the same way
    #[br(if(flags6.contains(Flags6::TRAINER)), count = 512)]
    #[allow(dead_code)]
    trainer: Option<Vec<u8>>,

    #[br(count = prg_rom_unit_size as u32 * 0x4000)]
    pub(super) prg_rom: Vec<u8>,
    #[br(count = chr_rom_unit_size as u32 * 0x2000)]
    pub(super) chr_rom: Vec<u8>,

    #[br(calc = (flags7.bits() & 0b1111_0000) | (flags6.bits() >> 4))]
    pub(super) mapper: u8,
}

impl InesFile {
    pub(super) fn mirroring(&self) -> Mirroring {
        if self.flags6.contains(Flags6::MIRRORING_VERTICAL) {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    pub(super) fn prg_units(&self) -> u8 {
        self.prg_rom_unit_size
    }

    pub(super) fn chr_units(&self) -> u8 {
        self.chr_rom_unit_size
    }
}

bitflags! {
    #[derive(BinRead, Default)]
    pub(super) struct Flags6: u8 {
        const MIRRORING_VERTICAL = 1 << 0;
        #[allow(dead_code)]
        const BATTERY_BACKED_PRG_RAM = 1 << 1;
        const TRAINER = 1 << 2;
        #[allow(dead_code)]
        const FOUR_SCREEN_VRAM = 1 << 3;
    }
}

bitflags! {
    #[derive(BinRead, Default)]
    struct Flags7: u8 {
        #[allow(dead_code)]
        const VS_UNISYSTEM = 1 << 0;
        #[allow(dead_code)]
        const PLAY_CHOICE_10 = 1 << 1;
        #[allow(dead_code)]
        const NES2_FORMAT = 0b1100;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::tests::build_ines;
    use binread::{io::Cursor, BinRead};

    #[test]
    fn parses_header_and_bank_counts() {
        let data = build_ines(2, 1, 0x01, 0x00);
        let ines = InesFile::read(&mut Cursor::new(data)).unwrap();

        assert_eq!(ines.prg_units(), 2);
        assert_eq!(ines.chr_units(), 1);
        assert_eq!(ines.prg_rom.len(), 0x8000);
        assert_eq!(ines.chr_rom.len(), 0x2000);
        assert_eq!(ines.mapper, 0);
        assert_eq!(ines.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn assembles_mapper_id_from_both_nibbles() {
        let data = build_ines(1, 1, 0x10, 0x20);
        let ines = InesFile::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(ines.mapper, 0x21);
    }

    #[test]
    fn skips_the_trainer() {
        let mut data = build_ines(1, 1, 0x04, 0x00);
        // first PRG byte sits after the 512-byte trainer
        data[16 + 512] = 0xA9;
        let ines = InesFile::read(&mut Cursor::new(data)).unwrap();
        assert_eq!(ines.prg_rom[0], 0xA9);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = build_ines(1, 1, 0x00, 0x00);
        data[0] = b'X';
        assert_matches!(InesFile::read(&mut Cursor::new(data)), Err(_));
    }

    #[test]
    fn rejects_truncated_image() {
        let mut data = build_ines(1, 1, 0x00, 0x00);
        data.truncate(data.len() - 0x1000);
        assert_matches!(InesFile::read(&mut Cursor::new(data)), Err(_));
    }
}
