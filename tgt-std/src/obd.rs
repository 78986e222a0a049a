use std::io::{self, Read, Write};
use std::time::Instant;

use bypass_traits::SpeedSensor;

use crate::consts::{MAX_OBD_FAILURES, MAX_REPLY_SIZE, OBD_READ_BUF_SIZE};
use crate::error::DeviceError;
use crate::retry::RetryPolicy;
use crate::uart::Purge;

const PROMPT: u8 = b'>';

const SETUP: [&str; 5] = ["ATE0", "ATL0", "ATS0", "ATH0", "ATSP0"];

/// Mode 01 PID 00, supported PIDs. Any ECU answers this.
const PROBE: &str = "0100";
const PROBE_REPLY: &str = "4100";

/// Mode 01 PID 0D, vehicle speed in km/h
const SPEED: &str = "010D";
const SPEED_REPLY: &str = "410D";

/// ELM327 OBD-II adapter on a byte stream
pub struct Elm327<P> {
    port: P,
}

impl<P: Read + Write + Purge> Elm327<P> {
    /// Reset, configure and check the car is talking
    pub fn connect(port: P) -> Result<Self, DeviceError> {
        let mut elm = Self { port };

        let banner = elm.command("ATZ")?;
        log::info!("adapter reset: {}", banner);

        for cmd in SETUP {
            let reply = elm.command(cmd)?;
            if !reply.contains("OK") {
                return Err(DeviceError::AdapterUnavailable(format!(
                    "{} rejected: {:?}",
                    cmd, reply
                )));
            }
        }

        let reply = elm.command(PROBE)?;
        if !reply.contains(PROBE_REPLY) {
            return Err(DeviceError::AdapterUnavailable(format!(
                "no reply from vehicle: {:?}",
                reply
            )));
        }

        log::info!("OBD adapter connected");
        Ok(elm)
    }

    /// Send one command and collect the reply up to the `>` prompt.
    /// Whitespace, the prompt and any echo are stripped.
    pub fn command(&mut self, cmd: &str) -> Result<String, DeviceError> {
        // a reply that arrived after an earlier timeout would otherwise answer this command
        self.port.purge_input()?;

        self.port.write_all(cmd.as_bytes())?;
        self.port.write_all(b"\r")?;
        self.port.flush()?;

        let mut raw = Vec::new();
        let mut buf = [0u8; OBD_READ_BUF_SIZE];
        while !raw.contains(&PROMPT) {
            let n = self.port.read(&mut buf)?;
            if n == 0 {
                return Err(DeviceError::Serial(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no prompt after {}", cmd),
                )));
            }
            raw.extend_from_slice(&buf[..n]);
            if raw.len() > MAX_REPLY_SIZE {
                return Err(DeviceError::AdapterUnavailable(format!(
                    "runaway reply to {}",
                    cmd
                )));
            }
        }

        let reply = clean_reply(cmd, &raw);
        log::trace!("{} -> {}", cmd, reply);
        Ok(reply)
    }

    pub fn read_speed_kmh(&mut self) -> Result<Option<f64>, DeviceError> {
        let reply = self.command(SPEED)?;
        let speed = decode_speed(&reply);
        if speed.is_none() {
            log::debug!("no speed in reply: {:?}", reply);
        }
        Ok(speed)
    }

    pub fn release(self) -> P {
        self.port
    }
}

impl<P: Read + Write + Purge> SpeedSensor for Elm327<P> {
    type Error = DeviceError;

    fn read_speed_kmh(&mut self) -> Result<Option<f64>, Self::Error> {
        Elm327::read_speed_kmh(self)
    }
}

/// An adapter that comes back after the link drops.
///
/// After `MAX_OBD_FAILURES` failed commands in a row the port is dropped. Reads
/// then fail fast while `connect` is retried, at most once per retry delay.
pub struct ObdLink<P, C> {
    elm: Option<Elm327<P>>,
    connect: C,
    retry: RetryPolicy,
    failures: u32,
    next_attempt: Instant,
}

impl<P, C> ObdLink<P, C>
where
    P: Read + Write + Purge,
    C: FnMut() -> Result<Elm327<P>, DeviceError>,
{
    pub fn new(elm: Elm327<P>, connect: C, retry: RetryPolicy) -> Self {
        Self {
            elm: Some(elm),
            connect,
            retry,
            failures: 0,
            next_attempt: Instant::now(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.elm.is_some()
    }

    pub fn read_speed_kmh(&mut self) -> Result<Option<f64>, DeviceError> {
        if self.elm.is_none() {
            self.elm = Some(self.reconnect()?);
        }

        let result = match self.elm.as_mut() {
            Some(elm) => elm.read_speed_kmh(),
            None => return Err(DeviceError::AdapterUnavailable("not connected".into())),
        };

        match result {
            Ok(speed) => {
                self.failures = 0;
                Ok(speed)
            }
            Err(e) => {
                self.failures += 1;
                if self.failures >= MAX_OBD_FAILURES {
                    log::warn!(
                        "dropping OBD adapter after {} failed reads: {}",
                        self.failures,
                        e
                    );
                    self.elm = None;
                    self.failures = 0;
                    self.next_attempt = Instant::now();
                }
                Err(e)
            }
        }
    }

    fn reconnect(&mut self) -> Result<Elm327<P>, DeviceError> {
        if Instant::now() < self.next_attempt {
            return Err(DeviceError::AdapterUnavailable(
                "waiting to reconnect".into(),
            ));
        }
        match (self.connect)() {
            Ok(elm) => {
                log::info!("OBD adapter reconnected");
                Ok(elm)
            }
            Err(e) => {
                self.next_attempt = Instant::now() + self.retry.delay;
                log::debug!("OBD reconnect failed: {}, next try in {:?}", e, self.retry.delay);
                Err(e)
            }
        }
    }
}

impl<P, C> SpeedSensor for ObdLink<P, C>
where
    P: Read + Write + Purge,
    C: FnMut() -> Result<Elm327<P>, DeviceError>,
{
    type Error = DeviceError;

    fn read_speed_kmh(&mut self) -> Result<Option<f64>, Self::Error> {
        ObdLink::read_speed_kmh(self)
    }
}

/// Upper case, no whitespace, no prompt, no echo, no "SEARCHING..."
pub(crate) fn clean_reply(cmd: &str, raw: &[u8]) -> String {
    let text: String = String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != PROMPT as char)
        .collect::<String>()
        .to_ascii_uppercase()
        .replace("SEARCHING...", "");

    match text.strip_prefix(cmd) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// `410DXX` to XX km/h. `NO DATA`, `STOPPED`, `UNABLE TO CONNECT`, `CAN ERROR`,
/// `BUS INIT: ...ERROR` and `?` carry no speed.
pub(crate) fn decode_speed(reply: &str) -> Option<f64> {
    let at = reply.find(SPEED_REPLY)? + SPEED_REPLY.len();
    let hex = reply.get(at..at + 2)?;
    u8::from_str_radix(hex, 16).ok().map(f64::from)
}
