#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate binread;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

extern crate anyhow;
extern crate thiserror;

pub mod nes;
pub mod palette;
pub mod rom;
pub mod trace;

mod bus;
mod cpu;
mod ppu;
