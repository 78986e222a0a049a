#![no_std]

mod traits;

pub use traits::{HeadingSensor, SpeedSensor};
