//! Cell normalization: canonical `HH:MM:SS` times and `DD/MM/YYYY` dates
//!
//! Spreadsheet cells carry either text typed by a person or a native date
//! serial. Nothing in here fails: input that cannot be interpreted comes back
//! as an empty string (bad serials) or unchanged (unrecognised text).

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use super::cell::CellValue;

/// Largest serial the 1900 date system can represent (31/12/9999)
pub const MAX_SERIAL: f64 = 2_958_465.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Calendar and clock components decoded from a date serial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialDateTime {
    pub year: i32,
    pub month: u32,
    /// Zero only for serials below 1 (time-only cells)
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl SerialDateTime {
    /// `DD/MM/YYYY`
    pub fn to_display_date(&self) -> String {
        format!("{:02}/{:02}/{}", self.day, self.month, self.year)
    }

    /// `YYYY-MM-DD`
    pub fn to_iso_date(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `HH:MM:SS`
    pub fn to_clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Decode a 1900-system date serial.
///
/// The integer part counts days, the fraction is the time of day. Serial 60
/// is the phantom 29/02/1900 that spreadsheet tools keep for compatibility.
/// Returns `None` for non-finite, negative, or out-of-range serials.
pub fn decode_serial(serial: f64) -> Option<SerialDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }

    let whole = serial.trunc();
    let mut days = whole as u64;

    let raw_seconds = (serial - whole) * SECONDS_PER_DAY;
    let mut seconds = raw_seconds.floor() as u32;
    if raw_seconds - raw_seconds.floor() > 0.9999 {
        seconds += 1;
        if seconds == SECONDS_PER_DAY as u32 {
            seconds = 0;
            days += 1;
        }
    }

    let (year, month, day) = match days {
        0 => (1900, 1, 0),
        60 => (1900, 2, 29),
        d => {
            // Serials after the phantom leap day are shifted back by one
            let epoch = if d < 60 {
                NaiveDate::from_ymd_opt(1899, 12, 31)?
            } else {
                NaiveDate::from_ymd_opt(1899, 12, 30)?
            };
            let date = epoch.checked_add_days(Days::new(d))?;
            (date.year(), date.month(), date.day())
        }
    };

    Some(SerialDateTime {
        year,
        month,
        day,
        hour: seconds / 3600,
        minute: (seconds % 3600) / 60,
        second: seconds % 60,
    })
}

/// Normalize a cell to `HH:MM:SS`.
///
/// - empty → `""`
/// - `"9:5"` → `"09:05:00"`, `"9:5:3"` → `"09:05:03"`, other colon shapes pass through
/// - text without a colon is parsed as a date-time and its clock is kept;
///   unparseable text passes through, trimmed
/// - numbers are date serials; invalid serials → `""`
pub fn normalize_time(value: &CellValue) -> String {
    if !value.is_present() {
        return String::new();
    }

    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(raw) => {
            let text = raw.trim();
            if text.contains(':') {
                pad_clock(text)
            } else {
                match parse_text_datetime(text) {
                    Some(dt) => dt.format("%H:%M:%S").to_string(),
                    None => text.to_string(),
                }
            }
        }
        CellValue::Numeric(serial) => decode_serial(*serial)
            .map(|dt| dt.to_clock())
            .unwrap_or_default(),
    }
}

/// Normalize a cell to `DD/MM/YYYY`.
///
/// Numbers are date serials (invalid → `""`); text is parsed as a date and
/// passed through unchanged when that fails.
pub fn normalize_date(value: &CellValue) -> String {
    if !value.is_present() {
        return String::new();
    }

    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(raw) => {
            let text = raw.trim();
            match parse_text_datetime(text) {
                Some(dt) => dt.format("%d/%m/%Y").to_string(),
                None => text.to_string(),
            }
        }
        CellValue::Numeric(serial) => decode_serial(*serial)
            .map(|dt| dt.to_display_date())
            .unwrap_or_default(),
    }
}

/// Pad a colon-separated clock to `HH:MM:SS`.
///
/// Two parts gain `:00` seconds, three parts are padded as-is, anything else
/// is returned untouched.
pub fn pad_clock(text: &str) -> String {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [h, m] => format!("{}:{}:00", pad2(h), pad2(m)),
        [h, m, s] => format!("{}:{}:{}", pad2(h), pad2(m), pad2(s)),
        _ => text.to_string(),
    }
}

fn pad2(part: &str) -> String {
    format!("{:0>2}", part.trim())
}

/// Parse a canonical (or near-canonical) clock string into a time of day
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let padded = pad_clock(text.trim());
    NaiveTime::parse_from_str(&padded, "%H:%M:%S").ok()
}

/// Generic date-time parsing for human-entered text.
///
/// Date-only forms resolve to midnight. Offsets are dropped, keeping the wall
/// clock as written.
pub fn parse_text_datetime(text: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_normalize_time_pads_components() {
        assert_eq!(normalize_time(&text("9:5")), "09:05:00");
        assert_eq!(normalize_time(&text("9:5:3")), "09:05:03");
        assert_eq!(normalize_time(&text("14:30")), "14:30:00");
        assert_eq!(normalize_time(&text("14:30:15")), "14:30:15");
    }

    #[test]
    fn test_normalize_time_empty() {
        assert_eq!(normalize_time(&text("")), "");
        assert_eq!(normalize_time(&CellValue::Empty), "");
        assert_eq!(normalize_time(&CellValue::Numeric(0.0)), "");
    }

    #[test]
    fn test_normalize_time_passthrough() {
        assert_eq!(normalize_time(&text("not-a-time")), "not-a-time");
        // Four colon-separated parts are not a clock
        assert_eq!(normalize_time(&text("1:2:3:4")), "1:2:3:4");
        // Surrounding whitespace is dropped on both paths
        assert_eq!(normalize_time(&text("  sem horário ")), "sem horário");
        assert_eq!(normalize_time(&text(" 9:5 ")), "09:05:00");
    }

    #[test]
    fn test_normalize_time_from_text_date() {
        assert_eq!(normalize_time(&text("2025-03-14")), "00:00:00");
        assert_eq!(normalize_time(&text("14/03/2025")), "00:00:00");
    }

    #[test]
    fn test_normalize_time_from_serial() {
        // 45730.75 is 14/03/2025 18:00
        assert_eq!(normalize_time(&CellValue::Numeric(45730.75)), "18:00:00");
        assert_eq!(normalize_time(&CellValue::Numeric(0.5)), "12:00:00");
        // 08:05:03 as a fraction of a day
        let serial = (8.0 * 3600.0 + 5.0 * 60.0 + 3.0) / 86_400.0;
        assert_eq!(normalize_time(&CellValue::Numeric(serial)), "08:05:03");
    }

    #[test]
    fn test_normalize_time_invalid_serial() {
        assert_eq!(normalize_time(&CellValue::Numeric(-1.0)), "");
        assert_eq!(normalize_time(&CellValue::Numeric(f64::INFINITY)), "");
        assert_eq!(normalize_time(&CellValue::Numeric(MAX_SERIAL + 1.0)), "");
    }

    #[test]
    fn test_normalize_date_from_serial() {
        assert_eq!(normalize_date(&CellValue::Numeric(45658.0)), "01/01/2025");
        assert_eq!(normalize_date(&CellValue::Numeric(45730.75)), "14/03/2025");
        assert_eq!(normalize_date(&CellValue::Numeric(1.0)), "01/01/1900");
        assert_eq!(normalize_date(&CellValue::Numeric(MAX_SERIAL)), "31/12/9999");
    }

    #[test]
    fn test_normalize_date_from_text() {
        assert_eq!(normalize_date(&text("2025-03-14")), "14/03/2025");
        assert_eq!(normalize_date(&text("2025-03-14T08:30:00Z")), "14/03/2025");
        assert_eq!(normalize_date(&text("14/03/2025")), "14/03/2025");
        assert_eq!(normalize_date(&text("amanhã")), "amanhã");
        assert_eq!(normalize_date(&text(" amanhã ")), "amanhã");
        assert_eq!(normalize_date(&CellValue::Empty), "");
    }

    #[test]
    fn test_decode_serial_leap_bug() {
        let feb28 = decode_serial(59.0).unwrap();
        assert_eq!((feb28.year, feb28.month, feb28.day), (1900, 2, 28));

        let phantom = decode_serial(60.0).unwrap();
        assert_eq!((phantom.year, phantom.month, phantom.day), (1900, 2, 29));

        let march1 = decode_serial(61.0).unwrap();
        assert_eq!((march1.year, march1.month, march1.day), (1900, 3, 1));
    }

    #[test]
    fn test_decode_serial_rounds_up_near_midnight() {
        let almost = decode_serial(45657.0 + 86_399.99995 / 86_400.0).unwrap();
        assert_eq!(almost.to_display_date(), "01/01/2025");
        assert_eq!(almost.to_clock(), "00:00:00");
    }

    #[test]
    fn test_serial_output_is_fixed_width() {
        let mut serial = 1.0;
        while serial < MAX_SERIAL {
            let date = normalize_date(&CellValue::Numeric(serial));
            let time = normalize_time(&CellValue::Numeric(serial));
            assert_eq!(date.len(), 10, "date for serial {}: {}", serial, date);
            assert_eq!(&date[2..3], "/");
            assert_eq!(&date[5..6], "/");
            assert_eq!(time.len(), 8, "time for serial {}: {}", serial, time);
            assert!(parse_clock(&time).is_some());
            serial += 7919.37;
        }
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("10:05:00"), NaiveTime::from_hms_opt(10, 5, 0));
        assert_eq!(parse_clock("9:5"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_clock("Destino Desconhecido"), None);
        assert_eq!(parse_clock(""), None);
    }
}
