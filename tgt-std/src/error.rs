use std::fmt::Debug;
use std::io;

use bypass_compass::CompassError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device init failed: {0}")]
    Init(String),

    #[error("device read failed: {0}")]
    Read(String),

    #[error("no compass on the bus")]
    CompassMissing,

    #[error("OBD adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("serial i/o: {0}")]
    Serial(#[from] io::Error),

    #[error("uart: {0}")]
    Uart(#[from] rppal::uart::Error),

    #[error("i2c: {0}")]
    I2c(#[from] rppal::i2c::Error),
}

impl<E: Debug> From<CompassError<E>> for DeviceError {
    fn from(e: CompassError<E>) -> Self {
        match e {
            CompassError::Init(e) => DeviceError::Init(format!("compass: {:?}", e)),
            CompassError::Read(e) => DeviceError::Read(format!("compass: {:?}", e)),
        }
    }
}
