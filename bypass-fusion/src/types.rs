use ::serde::Serialize;

/// Signed decimal degrees, south and west negative
#[derive(Serialize, Copy, Clone, PartialEq, Debug, Default)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<(f64, f64)> for Position {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One point of the trail
#[derive(Serialize, Copy, Clone, PartialEq, Debug)]
pub struct Fix {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: f64,
    pub heading_deg: f64,
    /// ms since the Unix epoch
    pub timestamp: u64,
}
