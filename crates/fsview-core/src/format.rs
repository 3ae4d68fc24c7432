//! Display formatting helpers shared by frontends.

use std::fmt::Display;
use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with one decimal, stepping up a binary unit while
/// the value is strictly above 1024 (so `1024` stays `"1024.0 B"`).
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size > 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Formats `time` as `dd/mm/yyyy` in the time zone `tz`.
pub fn format_date<Tz>(time: SystemTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::<Utc>::from(time)
        .with_timezone(tz)
        .format("%d/%m/%Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn small_sizes_stay_in_bytes_with_a_decimal() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(10), "10.0 B");
        assert_eq!(format_size(1024), "1024.0 B");
    }

    #[test]
    fn sizes_step_up_above_each_boundary() {
        assert_eq!(format_size(1025), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn gigabytes_is_the_largest_unit() {
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024), "2048.0 GB");
    }

    #[test]
    fn date_is_day_month_year() {
        // 2023-11-14T22:13:20Z
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_date(time, &Utc), "14/11/2023");
    }

    #[test]
    fn date_follows_the_time_zone() {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(format_date(time, &east), "15/11/2023");
    }
}
