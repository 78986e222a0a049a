use core::f64::consts::PI;

use embedded_hal::i2c::I2c;
use libm::{atan2, fmod};

use crate::layout::{AxisOrder, Endian, Layout};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompassError<E> {
    /// bus failure while configuring the device
    Init(E),
    /// bus failure while sampling
    Read(E),
}

/// One raw magnetometer sample, in device units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MagSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Hard iron offsets (raw units) and a fixed correction added to the heading.
/// The default applies no correction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Calibration {
    pub x_offset: f64,
    pub y_offset: f64,
    pub declination_deg: f64,
}

pub struct Compass<I2C> {
    i2c: I2C,
    layout: Layout,
    calibration: Calibration,
}

impl<I2C: I2c> Compass<I2C> {
    pub fn new(i2c: I2C, layout: Layout) -> Self {
        Self {
            i2c,
            layout,
            calibration: Calibration::default(),
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn initialize(&mut self) -> Result<(), CompassError<I2C::Error>> {
        let address = self.layout.address();
        for &(register, value) in self.layout.init_sequence() {
            self.i2c
                .write(address, &[register, value])
                .map_err(CompassError::Init)?;
        }
        log::info!(
            "compass {:?} configured at 0x{:02X}",
            self.layout,
            address
        );
        Ok(())
    }

    pub fn read_axes(&mut self) -> Result<MagSample, CompassError<I2C::Error>> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(
                self.layout.address(),
                &[self.layout.data_register()],
                &mut buf,
            )
            .map_err(CompassError::Read)?;

        let word = |i: usize| -> i16 {
            let pair = [buf[i], buf[i + 1]];
            // two's complement: anything >= 0x8000 is negative
            match self.layout.endian() {
                Endian::Big => i16::from_be_bytes(pair),
                Endian::Little => i16::from_le_bytes(pair),
            }
        };

        let (a, b, c) = (word(0), word(2), word(4));
        Ok(match self.layout.axis_order() {
            AxisOrder::Xzy => MagSample { x: a, y: c, z: b },
            AxisOrder::Xyz => MagSample { x: a, y: b, z: c },
        })
    }

    /// Degrees in [0, 360). Only the horizontal axes take part, the board is assumed level.
    pub fn read_heading(&mut self) -> Result<f64, CompassError<I2C::Error>> {
        let sample = self.read_axes()?;
        Ok(heading_of(&sample, &self.calibration))
    }
}

pub(crate) fn heading_of(sample: &MagSample, calibration: &Calibration) -> f64 {
    let x = sample.x as f64 - calibration.x_offset;
    let y = sample.y as f64 - calibration.y_offset;

    let heading = atan2(y, x) * 180.0 / PI;
    normalize_degrees(heading + calibration.declination_deg)
}

/// Wrap any angle into [0, 360)
pub fn normalize_degrees(deg: f64) -> f64 {
    let mut deg = fmod(deg, 360.0);
    if deg < 0.0 {
        deg += 360.0;
    }
    if deg >= 360.0 {
        deg -= 360.0;
    }
    // turn -0.0 into 0.0
    deg + 0.0
}

impl<I2C: I2c> bypass_traits::HeadingSensor for Compass<I2C> {
    type Error = CompassError<I2C::Error>;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        Compass::initialize(self)
    }

    fn read_heading(&mut self) -> Result<f64, Self::Error> {
        Compass::read_heading(self)
    }
}
