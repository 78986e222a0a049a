#![no_std]

mod compass;
mod layout;

pub use compass::{normalize_degrees, Calibration, Compass, CompassError, MagSample};
pub use layout::Layout;
