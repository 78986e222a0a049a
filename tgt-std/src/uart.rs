use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rppal::uart::{Parity, Queue, Uart};

use crate::error::DeviceError;

/// Drop whatever has been received but not read yet
pub trait Purge {
    fn purge_input(&mut self) -> io::Result<()>;
}

/// Blocking 8N1 serial line with a read timeout. A read that times out returns 0 bytes.
pub struct UartPort {
    uart: Uart,
    path: PathBuf,
}

impl UartPort {
    pub fn open(path: &Path, baud: u32, timeout: Duration) -> Result<Self, DeviceError> {
        let mut uart = Uart::with_path(path, baud, Parity::None, 8, 1)?;
        uart.set_read_mode(0, timeout)?;
        log::debug!("opened {} at {} baud", path.display(), baud);
        Ok(Self {
            uart,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn to_io(e: rppal::uart::Error) -> io::Error {
    match e {
        rppal::uart::Error::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

impl Read for UartPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.uart.read(buf).map_err(to_io)
    }
}

impl Write for UartPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.uart.write(buf).map_err(to_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.uart.drain().map_err(to_io)
    }
}

impl Purge for UartPort {
    fn purge_input(&mut self) -> io::Result<()> {
        self.uart.flush(Queue::Input).map_err(to_io)
    }
}
