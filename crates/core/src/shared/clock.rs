use chrono::{DateTime, Local, TimeZone, Utc};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Formats epoch milliseconds in the machine's local time zone.
pub fn format_local(millis: u64) -> String {
    format_in(&Local, millis)
}

/// Formats epoch milliseconds in `tz`. Out-of-range values render as the
/// raw number.
pub fn format_in<Tz: TimeZone>(tz: &Tz, millis: u64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    i64::try_from(millis)
        .ok()
        .and_then(|ms| tz.timestamp_millis_opt(ms).single())
        .map(|dt: DateTime<Tz>| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use rstest::rstest;

    #[rstest]
    #[case(0, "1970-01-01 00:00:00")]
    #[case(951_782_400_000, "2000-02-29 00:00:00")]
    #[case(1_700_000_000_123, "2023-11-14 22:13:20")]
    fn test_format_in_utc(#[case] millis: u64, #[case] expected: &str) {
        assert_eq!(format_in(&Utc, millis), expected);
    }

    #[test]
    fn test_offset_shifts_wall_clock() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_in(&tokyo, 1_700_000_000_123), "2023-11-15 07:13:20");
    }

    #[test]
    fn test_local_matches_chrono_local() {
        let millis = 1_700_000_000_123;
        let expected = Local
            .timestamp_millis_opt(millis as i64)
            .unwrap()
            .format(DISPLAY_FORMAT)
            .to_string();
        assert_eq!(format_local(millis), expected);
    }

    #[test]
    fn test_out_of_range_falls_back_to_number() {
        assert_eq!(format_in(&Utc, u64::MAX), u64::MAX.to_string());
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
