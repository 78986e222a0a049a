use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use bypass_fusion::Position;
use bypass_nmea::parse;

use crate::consts::{GPS_READ_TIMEOUT, MAX_LINE_LEN};
use crate::error::DeviceError;
use crate::retry::RetryPolicy;
use crate::state::{self, SharedTelemetry};
use crate::uart::UartPort;

/// Something that yields a fresh NMEA byte stream each time it's called
pub trait PortOpener {
    type Port: Read;

    fn open(&mut self) -> Result<Self::Port, DeviceError>;
}

pub struct UartOpener {
    path: PathBuf,
    baud: u32,
}

impl UartOpener {
    pub fn new(path: PathBuf, baud: u32) -> Self {
        Self { path, baud }
    }
}

impl PortOpener for UartOpener {
    type Port = UartPort;

    fn open(&mut self) -> Result<UartPort, DeviceError> {
        let port = UartPort::open(&self.path, self.baud, GPS_READ_TIMEOUT)?;
        log::info!("reading GPS from {}", port.path().display());
        Ok(port)
    }
}

pub struct GpsTask<O> {
    opener: O,
    state: SharedTelemetry,
    retry: RetryPolicy,
    has_fix: bool,
}

impl<O: PortOpener> GpsTask<O> {
    pub fn new(opener: O, state: SharedTelemetry, retry: RetryPolicy) -> Self {
        Self {
            opener,
            state,
            retry,
            has_fix: false,
        }
    }

    pub fn run(mut self) -> ! {
        loop {
            match self.opener.open() {
                Ok(port) => {
                    let e = self.session(port);
                    log::warn!("GPS stream lost: {}, reopening in {:?}", e, self.retry.delay);
                }
                Err(e) => {
                    log::warn!("failed to open GPS: {}, retrying in {:?}", e, self.retry.delay);
                }
            }
            self.retry.wait();
        }
    }

    /// Consume sentences until the stream fails, and say why it did.
    /// A read timeout ends the stream like a disconnect. Lines longer than
    /// `MAX_LINE_LEN` are dropped whole.
    pub fn session<R: Read>(&mut self, port: R) -> DeviceError {
        let mut reader = BufReader::new(port);
        let mut line = Vec::with_capacity(MAX_LINE_LEN);
        let mut overlong = false;
        loop {
            line.clear();
            let mut limited = (&mut reader).take(MAX_LINE_LEN as u64);
            match limited.read_until(b'\n', &mut line) {
                Ok(0) => {
                    return DeviceError::Serial(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "no data",
                    ))
                }
                Ok(_) => {
                    let complete = line.last() == Some(&b'\n');
                    if !complete && line.len() >= MAX_LINE_LEN {
                        if !overlong {
                            log::trace!("discarding line over {} bytes", MAX_LINE_LEN);
                        }
                        overlong = true;
                    } else if overlong {
                        // tail of an over-long line
                        overlong = !complete;
                    } else {
                        self.handle_line(&line);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return DeviceError::Serial(e),
            }
        }
    }

    /// Returns true if the line moved the current position
    pub fn handle_line(&mut self, raw: &[u8]) -> bool {
        let Ok(text) = std::str::from_utf8(raw) else {
            log::trace!("skipping non-UTF-8 line");
            return false;
        };
        let text = text.trim();
        if !text.starts_with('$') {
            return false;
        }

        let sentence = match parse(text) {
            Ok(sentence) => sentence,
            Err(e) => {
                log::trace!("skipping {:?}: {}", text, e);
                return false;
            }
        };

        match sentence.position() {
            Some(position) => {
                let position = Position::from(position);
                state::lock(&self.state).set_position(position);
                if !self.has_fix {
                    log::info!(
                        "GPS fix at {:.6}, {:.6}",
                        position.latitude,
                        position.longitude
                    );
                    self.has_fix = true;
                }
                true
            }
            None => false,
        }
    }
}
