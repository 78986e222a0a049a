use alloc::string::String;

use bypass_nmea::encode_vtg;
use bypass_traits::{HeadingSensor, SpeedSensor};

use crate::types::{Fix, Position};

/// Best effort, returns false if the compass could not be configured
pub fn initialize_heading<H: HeadingSensor>(heading: &mut H) -> bool {
    match heading.initialize() {
        Ok(()) => true,
        Err(e) => {
            log::error!("compass init failed, headings will be unreliable: {:?}", e);
            false
        }
    }
}

/// Result of one fusion tick
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// VTG sentence, no line terminator
    pub sentence: String,
    pub speed_kmh: f64,
    pub heading_deg: f64,
    /// only present when a position was known
    pub fix: Option<Fix>,
}

/// Combines speed and heading sensors into VTG sentences and trail fixes.
///
/// Sensor failures never stop a tick: missing speed reads as 0.0 and a failed
/// heading read repeats the last good heading (0.0 before the first one).
pub struct Fusion<H, S> {
    heading: H,
    speed: S,
    last_heading: f64,
    // warnings are logged on transitions only
    heading_failing: bool,
    speed_missing: bool,
}

impl<H, S> Fusion<H, S>
where
    H: HeadingSensor,
    S: SpeedSensor,
{
    pub fn new(heading: H, speed: S) -> Self {
        Self {
            heading,
            speed,
            last_heading: 0.0,
            heading_failing: false,
            speed_missing: false,
        }
    }

    pub fn tick(&mut self, position: Option<Position>, timestamp: u64) -> Tick {
        let speed_kmh = self.read_speed();
        let heading_deg = self.read_heading();

        let sentence = encode_vtg(heading_deg, speed_kmh);

        let fix = position.map(|position| Fix {
            latitude: Some(position.latitude),
            longitude: Some(position.longitude),
            speed_kmh,
            heading_deg,
            timestamp,
        });

        Tick {
            sentence,
            speed_kmh,
            heading_deg,
            fix,
        }
    }

    pub fn last_heading(&self) -> f64 {
        self.last_heading
    }

    fn read_speed(&mut self) -> f64 {
        match self.speed.read_speed_kmh() {
            Ok(Some(kmh)) => {
                if self.speed_missing {
                    log::info!("speed readings resumed");
                    self.speed_missing = false;
                }
                kmh
            }
            Ok(None) => {
                if !self.speed_missing {
                    log::warn!("no data from adapter, reporting 0 km/h");
                    self.speed_missing = true;
                }
                0.0
            }
            Err(e) => {
                if !self.speed_missing {
                    log::warn!("speed read failed, reporting 0 km/h: {:?}", e);
                    self.speed_missing = true;
                }
                0.0
            }
        }
    }

    fn read_heading(&mut self) -> f64 {
        match self.heading.read_heading() {
            Ok(heading) => {
                if self.heading_failing {
                    log::info!("compass readings resumed");
                    self.heading_failing = false;
                }
                self.last_heading = heading;
                heading
            }
            Err(e) => {
                if !self.heading_failing {
                    log::warn!(
                        "compass read failed, holding {:.1}: {:?}",
                        self.last_heading,
                        e
                    );
                    self.heading_failing = true;
                }
                self.last_heading
            }
        }
    }
}
