#![no_std]

extern crate alloc;

mod fusion;
mod telemetry;
mod types;

pub use fusion::{initialize_heading, Fusion, Tick};
pub use telemetry::{Telemetry, TRAIL_LEN};
pub use types::{Fix, Position};
