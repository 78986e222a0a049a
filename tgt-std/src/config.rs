use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use bypass_compass::{Calibration, Layout};
use clap::{Parser, ValueEnum};

use crate::consts::DEFAULT_LISTEN;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CompassModel {
    Hmc5883l,
    Qmc5883l,
}

impl From<CompassModel> for Layout {
    fn from(model: CompassModel) -> Self {
        match model {
            CompassModel::Hmc5883l => Layout::Hmc5883l,
            CompassModel::Qmc5883l => Layout::Qmc5883l,
        }
    }
}

/// Car speed and heading out as NMEA VTG, GPS trail on a web map
#[derive(Parser, Debug, Clone)]
#[command(name = "bypass", version, about)]
pub struct Config {
    /// I2C bus the magnetometer hangs off
    #[arg(long, env = "BYPASS_I2C_BUS", default_value_t = 1)]
    pub i2c_bus: u8,

    #[arg(long, env = "BYPASS_COMPASS", value_enum, default_value_t = CompassModel::Hmc5883l)]
    pub compass: CompassModel,

    /// Hard iron offset, raw counts
    #[arg(long, env = "BYPASS_MAG_X_OFFSET", default_value_t = 0.0, allow_hyphen_values = true)]
    pub mag_x_offset: f64,

    /// Hard iron offset, raw counts
    #[arg(long, env = "BYPASS_MAG_Y_OFFSET", default_value_t = 0.0, allow_hyphen_values = true)]
    pub mag_y_offset: f64,

    /// Magnetic declination in degrees, east positive
    #[arg(long, env = "BYPASS_DECLINATION", default_value_t = 0.0, allow_hyphen_values = true)]
    pub declination: f64,

    /// Serial device of the ELM327 adapter
    #[arg(long, env = "BYPASS_OBD_PORT", default_value = "/dev/rfcomm0")]
    pub obd_port: PathBuf,

    #[arg(long, env = "BYPASS_OBD_BAUD", default_value_t = 38400)]
    pub obd_baud: u32,

    /// Serial device of the GPS receiver
    #[arg(long, env = "BYPASS_GPS_PORT", default_value = "/dev/serial0")]
    pub gps_port: PathBuf,

    #[arg(long, env = "BYPASS_GPS_BAUD", default_value_t = 9600)]
    pub gps_baud: u32,

    /// Run without a GPS receiver, the trail stays empty
    #[arg(long, env = "BYPASS_NO_GPS")]
    pub no_gps: bool,

    /// Time between VTG sentences
    #[arg(long, env = "BYPASS_PERIOD_MS", default_value_t = 500)]
    pub period_ms: u64,

    /// Pause before reconnecting a lost device
    #[arg(long, env = "BYPASS_RETRY_DELAY_SECS", default_value_t = 5)]
    pub retry_delay_secs: u64,

    #[arg(long, env = "BYPASS_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,
}

impl Config {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn calibration(&self) -> Calibration {
        Calibration {
            x_offset: self.mag_x_offset,
            y_offset: self.mag_y_offset,
            declination_deg: self.declination,
        }
    }
}
