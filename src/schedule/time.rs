//! Service-day time arithmetic.

use super::types::Timestamp;

/// Seconds in one service day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Scheduled running time between a departure and the next arrival.
///
/// Both values are seconds since midnight and may exceed one day for
/// overnight trips. When the arrival appears to precede the departure
/// (one side wrapped past midnight and the other did not), a single day is
/// added. Returns `None` when either side is missing or the corrected
/// difference is not positive.
pub fn running_time(departure: Option<Timestamp>, arrival: Option<Timestamp>) -> Option<f64> {
    let dep = departure? as i64;
    let arr = arrival? as i64;
    let mut diff = arr - dep;
    if diff < 0 {
        diff += SECONDS_PER_DAY;
    }
    (diff > 0).then_some(diff as f64)
}

/// Formats a timestamp as `HH:MM:SS`, keeping hours past 24.
pub fn format_time(time: Timestamp) -> String {
    let hours = time / 3600;
    let minutes = (time % 3600) / 60;
    let seconds = time % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_difference() {
        assert_eq!(running_time(Some(3600), Some(3720)), Some(120.0));
    }

    #[test]
    fn test_overnight_both_past_midnight() {
        // 24:58:00 -> 25:03:00
        assert_eq!(running_time(Some(89_880), Some(90_180)), Some(300.0));
    }

    #[test]
    fn test_overnight_wrapped_arrival() {
        // 23:58:00 -> 00:03:00 written without the 24h offset
        assert_eq!(running_time(Some(86_280), Some(180)), Some(300.0));
    }

    #[test]
    fn test_zero_or_missing_is_none() {
        assert_eq!(running_time(Some(100), Some(100)), None);
        assert_eq!(running_time(None, Some(100)), None);
        assert_eq!(running_time(Some(100), None), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(90_600), "25:10:00");
    }
}
