use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bypass_fusion::Telemetry;

pub type SharedTelemetry = Arc<Mutex<Telemetry>>;

pub fn shared() -> SharedTelemetry {
    Arc::new(Mutex::new(Telemetry::new()))
}

/// Telemetry is plain data, so a panic elsewhere can't leave it half written
pub fn lock(state: &SharedTelemetry) -> MutexGuard<'_, Telemetry> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
