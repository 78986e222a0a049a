use core::str::FromStr;

use libm::round;

use crate::vtg::checksum;

const MAX_FIELDS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Active,
    Void,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Autonomous,
    Differential,
    Estimated,
    NotValid,
    Unknown,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Rmc {
    /// ms since midnight UTC
    pub utc_time: Option<u32>,
    pub status: Option<Status>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// knots
    pub speed_over_ground: Option<f64>,
    pub course_over_ground: Option<f64>,
    /// whole days since 1970-01-01
    pub date: Option<u32>,
    pub magnetic_variation: Option<f64>,
    pub mode: Option<Mode>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Gga {
    pub utc_time: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 0 = no fix, 1 = GPS, 2 = DGPS, ...
    pub fix_quality: Option<u8>,
    pub satellites: Option<u8>,
    pub hdop: Option<f64>,
    /// metres above mean sea level
    pub altitude: Option<f64>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Vtg {
    pub true_track: Option<f64>,
    pub magnetic_track: Option<f64>,
    pub speed_knots: Option<f64>,
    pub speed_kmh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    Rmc(Rmc),
    Gga(Gga),
    Vtg(Vtg),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseError {
    MissingStart,
    BadHeader,
    BadChecksum { expected: u8, actual: u8 },
    Truncated,
    InvalidField(&'static str),
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::MissingStart => write!(f, "sentence does not start with '$'"),
            ParseError::BadHeader => write!(f, "malformed sentence header"),
            ParseError::BadChecksum { expected, actual } => {
                write!(f, "checksum mismatch: expected {:02X}, got {:02X}", expected, actual)
            }
            ParseError::Truncated => write!(f, "sentence has too few fields"),
            ParseError::InvalidField(name) => write!(f, "invalid {} field", name),
        }
    }
}

impl Sentence {
    /// Signed (latitude, longitude) in decimal degrees, if this sentence carries a usable fix.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Sentence::Rmc(rmc) if rmc.status == Some(Status::Active) => {
                Some((rmc.latitude?, rmc.longitude?))
            }
            Sentence::Gga(gga) if gga.fix_quality.unwrap_or(0) > 0 => {
                Some((gga.latitude?, gga.longitude?))
            }
            _ => None,
        }
    }
}

/// Decode one NMEA-0183 line. The trailing checksum is verified when present.
pub fn parse(line: &str) -> Result<Sentence, ParseError> {
    let line = line.trim();
    let body = line.strip_prefix('$').ok_or(ParseError::MissingStart)?;

    let body = match body.split_once('*') {
        Some((body, sum)) => {
            let expected = sum
                .get(..2)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or(ParseError::InvalidField("checksum"))?;
            let actual = checksum(body);
            if expected != actual {
                return Err(ParseError::BadChecksum { expected, actual });
            }
            body
        }
        None => body,
    };

    let mut fields = body.split(',');
    let header = fields.next().unwrap_or("");
    if header.len() != 5 || !header.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ParseError::BadHeader);
    }

    // talker (GP, GN, GL, ...) is ignored
    let mut tokens = [""; MAX_FIELDS];
    let mut count = 0;
    for token in fields {
        if count < MAX_FIELDS {
            tokens[count] = token;
        }
        count += 1;
    }
    let tokens = &tokens[..count.min(MAX_FIELDS)];

    match &header[2..] {
        "RMC" => parse_rmc(tokens).map(Sentence::Rmc),
        "GGA" => parse_gga(tokens).map(Sentence::Gga),
        "VTG" => parse_vtg(tokens).map(Sentence::Vtg),
        _ => Ok(Sentence::Other),
    }
}

fn parse_rmc(tokens: &[&str]) -> Result<Rmc, ParseError> {
    if tokens.len() < 9 {
        return Err(ParseError::Truncated);
    }

    let mut rmc = Rmc::default();
    for (field, &token) in tokens.iter().enumerate() {
        match field {
            0 => rmc.utc_time = parse_time(token)?,
            1 => {
                rmc.status = match token {
                    "" => None,
                    "A" => Some(Status::Active),
                    "V" => Some(Status::Void),
                    _ => Some(Status::Unknown),
                }
            }
            2 => rmc.latitude = parse_coordinate(token, tokens[3], 'N', 'S', "latitude")?,
            4 => rmc.longitude = parse_coordinate(token, tokens[5], 'E', 'W', "longitude")?,
            6 => rmc.speed_over_ground = optional(token, "speed")?,
            7 => rmc.course_over_ground = optional(token, "course")?,
            8 => rmc.date = date_to_epoch(token)?,
            9 => {
                let variation: Option<f64> = optional(token, "magnetic variation")?;
                let west = tokens.get(10).map_or(false, |&ew| ew == "W");
                rmc.magnetic_variation = variation.map(|v| if west { -v } else { v });
            }
            11 => {
                rmc.mode = match token {
                    "" => None,
                    "A" => Some(Mode::Autonomous),
                    "D" => Some(Mode::Differential),
                    "E" => Some(Mode::Estimated),
                    "N" => Some(Mode::NotValid),
                    _ => Some(Mode::Unknown),
                }
            }
            _ => {}
        }
    }
    Ok(rmc)
}

fn parse_gga(tokens: &[&str]) -> Result<Gga, ParseError> {
    if tokens.len() < 6 {
        return Err(ParseError::Truncated);
    }

    let mut gga = Gga::default();
    for (field, &token) in tokens.iter().enumerate() {
        match field {
            0 => gga.utc_time = parse_time(token)?,
            1 => gga.latitude = parse_coordinate(token, tokens[2], 'N', 'S', "latitude")?,
            3 => gga.longitude = parse_coordinate(token, tokens[4], 'E', 'W', "longitude")?,
            5 => gga.fix_quality = optional(token, "fix quality")?,
            6 => gga.satellites = optional(token, "satellites")?,
            7 => gga.hdop = optional(token, "hdop")?,
            8 => gga.altitude = optional(token, "altitude")?,
            _ => {}
        }
    }
    Ok(gga)
}

fn parse_vtg(tokens: &[&str]) -> Result<Vtg, ParseError> {
    if tokens.len() < 8 {
        return Err(ParseError::Truncated);
    }

    Ok(Vtg {
        true_track: optional(tokens[0], "true track")?,
        magnetic_track: optional(tokens[2], "magnetic track")?,
        speed_knots: optional(tokens[4], "speed")?,
        speed_kmh: optional(tokens[6], "speed")?,
    })
}

fn optional<T: FromStr>(token: &str, name: &'static str) -> Result<Option<T>, ParseError> {
    if token.is_empty() {
        return Ok(None);
    }
    token
        .parse::<T>()
        .map(Some)
        .map_err(|_| ParseError::InvalidField(name))
}

/// hhmmss[.sss] to ms since midnight
fn parse_time(token: &str) -> Result<Option<u32>, ParseError> {
    if token.is_empty() {
        return Ok(None);
    }
    let invalid = ParseError::InvalidField("time");
    if token.len() < 6 || !token.is_ascii() {
        return Err(invalid);
    }

    let hours = token[0..2].parse::<u32>().map_err(|_| invalid)?;
    let minutes = token[2..4].parse::<u32>().map_err(|_| invalid)?;
    let seconds = token[4..6].parse::<u32>().map_err(|_| invalid)?;
    if hours > 23 || minutes > 59 || seconds > 60 {
        return Err(invalid);
    }

    let milliseconds = match &token[6..] {
        "" => 0,
        fraction if fraction.starts_with('.') => {
            let fraction = if fraction.len() > 1 {
                fraction.parse::<f64>().map_err(|_| invalid)?
            } else {
                0.0
            };
            (round(fraction * 1000.0) as u32).min(999)
        }
        _ => return Err(invalid),
    };

    Ok(Some(
        hours * 60 * 60_000 + minutes * 60_000 + seconds * 1_000 + milliseconds,
    ))
}

/// (d)ddmm.mmmm plus hemisphere to signed decimal degrees
fn parse_coordinate(
    token: &str,
    hemisphere: &str,
    positive: char,
    negative: char,
    name: &'static str,
) -> Result<Option<f64>, ParseError> {
    if token.is_empty() || hemisphere.is_empty() {
        return Ok(None);
    }
    let invalid = ParseError::InvalidField(name);

    let dot = token.find('.').unwrap_or(token.len());
    if dot < 3 || !token.is_ascii() {
        return Err(invalid);
    }
    let degrees = token[..dot - 2].parse::<f64>().map_err(|_| invalid)?;
    let minutes = token[dot - 2..].parse::<f64>().map_err(|_| invalid)?;
    if !(0.0..60.0).contains(&minutes) {
        return Err(invalid);
    }

    let value = degrees + minutes / 60.0;
    let mut chars = hemisphere.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == positive => Ok(Some(value)),
        (Some(c), None) if c == negative => Ok(Some(-value)),
        _ => Err(invalid),
    }
}

fn days_in_month(month: u32, year: u32) -> u32 {
    match month {
        2 if year % 4 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// ddmmyy to whole days since 1970-01-01
fn date_to_epoch(date_str: &str) -> Result<Option<u32>, ParseError> {
    if date_str.is_empty() {
        return Ok(None);
    }
    let invalid = ParseError::InvalidField("date");
    if date_str.len() != 6 || !date_str.is_ascii() {
        return Err(invalid);
    }

    static MONTH_DAY: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let day: u32 = date_str[0..2].parse().map_err(|_| invalid)?;
    let month: u32 = date_str[2..4].parse().map_err(|_| invalid)?;
    let year: u32 = date_str[4..6].parse().map_err(|_| invalid)?;
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(month, year) {
        return Err(invalid);
    }

    let days_in_months = if year % 4 == 0 && month > 2 {
        (MONTH_DAY[(month - 1) as usize] + 1) as u32
    } else {
        (MONTH_DAY[(month - 1) as usize]) as u32
    };

    // two digit years are 2000-2099
    let days_in_years = (year + 2000 - 1970) * 365;
    // leap years from 1972 up to the year before this one
    let leap_days = ((year + 2000 - 1) - 1972) / 4 + 1;

    Ok(Some(days_in_years + leap_days + days_in_months + day - 1))
}
