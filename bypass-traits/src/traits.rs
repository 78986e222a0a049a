use core::fmt::Debug;

/// A magnetometer (or anything else) that can report a heading.
pub trait HeadingSensor {
    type Error: Debug;

    /// Put the device into continuous measurement mode.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Current heading in degrees, normalized into [0, 360).
    fn read_heading(&mut self) -> Result<f64, Self::Error>;
}

/// A source of vehicle ground speed.
pub trait SpeedSensor {
    type Error: Debug;

    /// Returns:
    /// * Ok(Some(kmh)) when the device has a current reading
    /// * Ok(None) when it is reachable but has nothing to report (engine off, bus timeout)
    /// * Err(_) on transport failure
    fn read_speed_kmh(&mut self) -> Result<Option<f64>, Self::Error>;
}

impl<T: HeadingSensor + ?Sized> HeadingSensor for &mut T {
    type Error = T::Error;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        (**self).initialize()
    }

    fn read_heading(&mut self) -> Result<f64, Self::Error> {
        (**self).read_heading()
    }
}

impl<T: SpeedSensor + ?Sized> SpeedSensor for &mut T {
    type Error = T::Error;

    fn read_speed_kmh(&mut self) -> Result<Option<f64>, Self::Error> {
        (**self).read_speed_kmh()
    }
}
