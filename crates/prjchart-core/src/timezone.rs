//! Time zone used to turn editor timestamps into calendar days

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Zone in which millisecond timestamps are truncated to calendar days
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Timezone {
    /// The host's local time zone
    #[default]
    Local,
    Utc,
    /// A fixed offset east of UTC
    Fixed(FixedOffset),
}

impl Timezone {
    /// Convert milliseconds since the epoch to the calendar day they fall on.
    ///
    /// The value is first reduced to whole seconds (rounding toward negative
    /// infinity), then interpreted in this zone. Returns `None` when the
    /// timestamp, or its local time, is outside chrono's representable range.
    pub fn date_from_millis(&self, millis: i64) -> Option<NaiveDate> {
        let secs = millis.div_euclid(1000);
        let utc = DateTime::<Utc>::from_timestamp(secs, 0)?.naive_utc();
        let offset = match self {
            Timezone::Local => chrono::Local.offset_from_utc_datetime(&utc).fix(),
            Timezone::Utc => Utc.fix(),
            Timezone::Fixed(offset) => *offset,
        };
        utc.checked_add_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
            .map(|local| local.date())
    }
}

impl FromStr for Timezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Timezone::Utc);
        }
        parse_offset(s)
            .map(Timezone::Fixed)
            .ok_or_else(|| format!("unknown timezone '{}' (expected local, utc or +HH:MM)", s))
    }
}

impl TryFrom<String> for Timezone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Local => write!(f, "local"),
            Timezone::Utc => write!(f, "utc"),
            Timezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
