use chrono::DateTime;

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_S * 60 * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_S * 60 * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Convert a bucket width in milliseconds to a Binance-style shorthand (e.g. `30m`, `1h`).
    /// Widths that are not a standard kline interval are rendered as raw milliseconds.
    pub fn interval_to_string(interval_ms: i64) -> String {
        let label = match interval_ms {
            Self::MS_IN_S => "1s",
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_5_MIN => "5m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_30_MIN => "30m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_D => "1d",
            Self::MS_IN_W => "1w",
            _ => return format!("{}ms", interval_ms),
        };
        label.to_string()
    }
}

/// Used for log output only. Out-of-range timestamps fall back to the raw number.
pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::LOG_TIME_FORMAT).to_string(),
        None => format!("{}ms", epoch_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_labels() {
        assert_eq!(TimeUtils::interval_to_string(TimeUtils::MS_IN_H), "1h");
        assert_eq!(TimeUtils::interval_to_string(10), "10ms");
    }

    #[test]
    fn epoch_formatting() {
        assert_eq!(epoch_ms_to_utc(0), "1970-01-01 00:00:00");
        assert_eq!(epoch_ms_to_utc(i64::MAX), format!("{}ms", i64::MAX));
    }
}
