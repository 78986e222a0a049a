use bypass_compass::Compass;
use bypass_traits::HeadingSensor;
use rppal::i2c::I2c;

use crate::config::Config;
use crate::error::DeviceError;

/// The compass, or nothing if the bus could not be opened.
/// Reads from a missing compass fail, so the fusion loop holds its last heading.
pub enum HeadingDevice {
    Compass(Compass<I2c>),
    Missing,
}

impl HeadingDevice {
    pub fn open(config: &Config) -> Self {
        match open_compass(config) {
            Ok(compass) => HeadingDevice::Compass(compass),
            Err(e) => {
                log::error!("no compass on i2c bus {}: {}", config.i2c_bus, e);
                HeadingDevice::Missing
            }
        }
    }
}

fn open_compass(config: &Config) -> Result<Compass<I2c>, DeviceError> {
    let i2c = I2c::with_bus(config.i2c_bus)?;
    Ok(Compass::new(i2c, config.compass.into()).with_calibration(config.calibration()))
}

impl HeadingSensor for HeadingDevice {
    type Error = DeviceError;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        match self {
            HeadingDevice::Compass(compass) => Ok(compass.initialize()?),
            HeadingDevice::Missing => Err(DeviceError::CompassMissing),
        }
    }

    fn read_heading(&mut self) -> Result<f64, Self::Error> {
        match self {
            HeadingDevice::Compass(compass) => Ok(compass.read_heading()?),
            HeadingDevice::Missing => Err(DeviceError::CompassMissing),
        }
    }
}
