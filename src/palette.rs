use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use thiserror::Error;

const FILE_LEN: usize = 192;

/// Master palette decoded from a .pal file: 64 RGB triplets widened to RGBA
/// with full alpha.
#[derive(Debug)]
pub struct Palette {
    pub colors: [[u8; 4]; 64],
}

impl Palette {
    pub fn from_data(data: &[u8]) -> Result<Self, PaletteError> {
        if data.len() != FILE_LEN {
            return Err(PaletteError::InvalidLength(data.len()));
        }

        let mut colors = [[0; 4]; 64];
        for (color, rgb) in colors.iter_mut().zip(data.chunks(3)) {
            *color = [rgb[0], rgb[1], rgb[2], 0xFF];
        }

        debug!("palette: {} colors", colors.len());
        Ok(Palette { colors })
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        use std::io::Read;

        let mut f = File::open(path.as_ref()).with_context(|| {
            format!(
                "Failed to open palette file: {}",
                path.as_ref().to_str().unwrap_or("unknown")
            )
        })?;

        let mut buf = Vec::new();
        f.read_to_end(&mut buf)
            .context("Failed to read palette file")?;
        Ok(Self::from_data(&buf)?)
    }
}

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("palette file is {0} bytes, expected 192")]
    InvalidLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_triplets_with_full_alpha() {
        let mut data = vec![0u8; FILE_LEN];
        data[0] = 0x11;
        data[1] = 0x22;
        data[2] = 0x33;
        data[3] = 0x44; // first byte of the second entry
        data[189] = 0xAA;
        data[190] = 0xBB;
        data[191] = 0xCC;

        let palette = Palette::from_data(&data).unwrap();
        assert_eq!(palette.colors[0], [0x11, 0x22, 0x33, 0xFF]);
        assert_eq!(palette.colors[1][0], 0x44);
        assert_eq!(palette.colors[63], [0xAA, 0xBB, 0xCC, 0xFF]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_matches!(
            Palette::from_data(&[0; 191]),
            Err(PaletteError::InvalidLength(191))
        );
        assert_matches!(
            Palette::from_data(&[0; 193]),
            Err(PaletteError::InvalidLength(193))
        );
        assert_matches!(Palette::from_data(&[0; 64]), Err(_));
    }
}
