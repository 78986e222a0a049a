use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use bypass_fusion::{initialize_heading, Fusion, Tick};
use bypass_traits::{HeadingSensor, SpeedSensor};

use crate::config::Config;
use crate::consts::OBD_READ_TIMEOUT;
use crate::devices::HeadingDevice;
use crate::error::DeviceError;
use crate::obd::{Elm327, ObdLink};
use crate::retry::RetryPolicy;
use crate::state::{self, SharedTelemetry};
use crate::uart::UartPort;

/// Wall clock, ms since the Unix epoch
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

pub struct FusionTask<H, S, W> {
    fusion: Fusion<H, S>,
    state: SharedTelemetry,
    out: W,
    period: Duration,
}

impl<H, S, W> FusionTask<H, S, W>
where
    H: HeadingSensor,
    S: SpeedSensor,
    W: Write,
{
    pub fn new(fusion: Fusion<H, S>, state: SharedTelemetry, out: W, period: Duration) -> Self {
        Self {
            fusion,
            state,
            out,
            period,
        }
    }

    /// Read, emit one sentence, record. The lock is never held across device I/O.
    pub fn step(&mut self) -> Tick {
        let position = state::lock(&self.state).position();

        let tick = self.fusion.tick(position, now_ms());

        if let Err(e) = writeln!(self.out, "{}", tick.sentence).and_then(|_| self.out.flush()) {
            log::error!("failed to write sentence: {}", e);
        }

        state::lock(&self.state).record(&tick);
        tick
    }

    pub fn run(mut self) -> ! {
        log::info!("emitting VTG every {:?}", self.period);
        loop {
            let started = Instant::now();
            self.step();
            if let Some(rest) = self.period.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

/// Compass, then the OBD adapter (blocks until it first answers), then tick forever
pub fn fusion_task<W: Write>(config: &Config, state: SharedTelemetry, out: W) -> ! {
    let mut heading = HeadingDevice::open(config);
    initialize_heading(&mut heading);

    let retry = RetryPolicy::new(config.retry_delay());
    let mut connect = || -> Result<_, DeviceError> {
        let port = UartPort::open(&config.obd_port, config.obd_baud, OBD_READ_TIMEOUT)?;
        Elm327::connect(port)
    };
    let elm = retry.retry_forever("OBD connect", &mut connect);
    let speed = ObdLink::new(elm, connect, retry);

    FusionTask::new(Fusion::new(heading, speed), state, out, config.period()).run()
}
