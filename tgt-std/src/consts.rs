use std::time::Duration;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:5000";

// rppal caps VTIME at 25.5 s
pub const OBD_READ_TIMEOUT: Duration = Duration::from_secs(5);
pub const GPS_READ_TIMEOUT: Duration = Duration::from_secs(3);

pub const OBD_READ_BUF_SIZE: usize = 64;
pub const MAX_REPLY_SIZE: usize = 1024;

// consecutive failed OBD commands before the port is reopened
pub const MAX_OBD_FAILURES: u32 = 3;

// NMEA caps a sentence at 82 bytes
pub const MAX_LINE_LEN: usize = 512;

pub const INDEX_FILE: &str = "index.html";
