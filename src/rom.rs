mod inesfile;
mod mapper_0;

use std::fmt;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use thiserror::Error;

use self::inesfile::InesFile;
use self::mapper_0::Mapper0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mirroring {
    Vertical,
    Horizontal,
}

impl Default for Mirroring {
    fn default() -> Self {
        Self::Vertical
    }
}

/// Cartridge-resident address decoding. The bus talks to the PRG side, the
/// PPU to the CHR side; bank switching lives behind this seam.
pub trait Mapper {
    fn prg_read(&mut self, addr: u16) -> u8;
    fn prg_write(&mut self, addr: u16, value: u8);
    fn chr_read(&mut self, addr: u16) -> u8;
    fn chr_write(&mut self, addr: u16, value: u8);
    fn mirroring(&self) -> Mirroring;
}

pub struct Cartridge {
    mapper_id: u8,
    mapper: Box<dyn Mapper>,
}

impl Cartridge {
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        use binread::{io::Cursor, BinRead};

        let mut cursor = Cursor::new(data);
        let ines = InesFile::read(&mut cursor).context("Failed to parse iNES image")?;

        if ines.prg_rom.is_empty() {
            return Err(CartridgeError::NoPrgRom.into());
        }

        info!(
            "cartridge: mapper {}, {} x 16 KiB PRG, {} x 8 KiB CHR",
            ines.mapper,
            ines.prg_units(),
            ines.chr_units()
        );

        let mapper_id = ines.mapper;
        let mapper = match mapper_id {
            0 => Ok(Mapper0::new(ines)),
            id => Err(CartridgeError::UnsupportedMapper(id)),
        }?;

        Ok(Cartridge {
            mapper_id,
            mapper: Box::new(mapper),
        })
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        use std::io::Read;

        let mut f = File::open(path.as_ref()).with_context(|| {
            format!(
                "Failed to open iNES file: {}",
                path.as_ref().to_str().unwrap_or("unknown")
            )
        })?;

        let mut buf = Vec::new();
        f.read_to_end(&mut buf).context("Failed to read iNES file")?;
        Self::from_data(buf)
    }

    pub(crate) fn prg_read(&mut self, addr: u16) -> u8 {
        self.mapper.prg_read(addr)
    }

    pub(crate) fn prg_write(&mut self, addr: u16, value: u8) {
        self.mapper.prg_write(addr, value)
    }

    pub(crate) fn chr_read(&mut self, addr: u16) -> u8 {
        self.mapper.chr_read(addr)
    }

    pub(crate) fn chr_write(&mut self, addr: u16, value: u8) {
        self.mapper.chr_write(addr, value)
    }

    pub(crate) fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring()
    }
}

impl fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cartridge {{ mapper: {:?} }}", self.mapper_id)
    }
}

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("mapper `{0}` is not supported")]
    UnsupportedMapper(u8),
    #[error("image declares no PRG banks")]
    NoPrgRom,
}
