#![no_std]

extern crate alloc;

mod parser;
mod vtg;

pub use parser::{parse, Gga, Mode, ParseError, Rmc, Sentence, Status, Vtg};
pub use vtg::{checksum, encode_vtg, KMH_TO_KNOTS};

#[cfg(test)]
mod nmea_tests;
