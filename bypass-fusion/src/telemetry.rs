use heapless::Deque;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::fusion::Tick;
use crate::types::{Fix, Position};

pub const TRAIL_LEN: usize = 1000;

/// Everything the web page can see. Written by the fusion and GPS tasks.
pub struct Telemetry<const N: usize = TRAIL_LEN> {
    trail: Deque<Fix, N>,
    pub current_speed_kmh: f64,
    pub current_heading_deg: f64,
    pub current_position: Option<Position>,
}

impl<const N: usize> Default for Telemetry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Telemetry<N> {
    pub const fn new() -> Self {
        Self {
            trail: Deque::new(),
            current_speed_kmh: 0.0,
            current_heading_deg: 0.0,
            current_position: None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        self.current_position
    }

    pub fn set_position(&mut self, position: Position) {
        self.current_position = Some(position);
    }

    /// Append to the trail, dropping the oldest fix once full
    pub fn push_fix(&mut self, fix: Fix) {
        if self.trail.is_full() {
            self.trail.pop_front();
        }
        // can't fail, there is room now
        let _ = self.trail.push_back(fix);
    }

    /// Apply the outcome of a fusion tick. Ticks without a position leave the state alone.
    pub fn record(&mut self, tick: &Tick) {
        if let Some(fix) = tick.fix {
            self.push_fix(fix);
            self.current_speed_kmh = tick.speed_kmh;
            self.current_heading_deg = tick.heading_deg;
        }
    }

    /// Oldest first
    pub fn trail(&self) -> impl Iterator<Item = &Fix> {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

struct Points<'a, const N: usize>(&'a Deque<Fix, N>);

impl<'a, const N: usize> Serialize for Points<'a, N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl<const N: usize> Serialize for Telemetry<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Telemetry", 4)?;
        state.serialize_field("points", &Points(&self.trail))?;
        state.serialize_field("current_speed", &self.current_speed_kmh)?;
        state.serialize_field("current_heading", &self.current_heading_deg)?;
        state.serialize_field("current_position", &self.current_position)?;
        state.end()
    }
}
