use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use libm::fmod;

pub const KMH_TO_KNOTS: f64 = 0.539957;

/// XOR of every byte between `$` and `*`
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Wrap `body` as `$body*HH`
pub(crate) fn frame(body: &str) -> String {
    let mut sentence = String::with_capacity(body.len() + 4);
    sentence.push('$');
    sentence.push_str(body);
    // writing to a String can't fail
    let _ = write!(sentence, "*{:02X}", checksum(body));
    sentence
}

/// Velocity made good. True track only, magnetic track is left empty.
pub fn encode_vtg(heading_deg: f64, speed_kmh: f64) -> String {
    let knots = speed_kmh * KMH_TO_KNOTS;
    let body = format!(
        "GPVTG,{:.1},T,,M,{:.2},N,{:.2},K",
        wrap_degrees(heading_deg),
        knots,
        speed_kmh
    );
    frame(&body)
}

fn wrap_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let mut deg = fmod(deg, 360.0);
    if deg < 0.0 {
        deg += 360.0;
    }
    if deg >= 360.0 {
        deg = 0.0;
    }
    // -0.0 would render as "-0.0"
    deg + 0.0
}
