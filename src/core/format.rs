//! Display formatting for currency amounts and durations.

/// Compact currency display: `999`, `1.5K`, `2.3M`, `1.2B`.
pub fn format_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.floor() as i64)
    }
}

/// Precise display for small rates: four decimals below 1, two otherwise.
pub fn format_number_precise(value: f64) -> String {
    if value.abs() < 1.0 {
        format!("{:.4}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Human-readable duration: `1h 30m`, `5m 30s`, `45s`.
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    } else if minutes > 0 {
        if secs > 0 {
            format!("{}m {}s", minutes, secs)
        } else {
            format!("{}m", minutes)
        }
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_suffixes() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.9), "999");
        assert_eq!(format_number(1_500.0), "1.5K");
        assert_eq!(format_number(18_000.0), "18.0K");
        assert_eq!(format_number(2_300_000.0), "2.3M");
        assert_eq!(format_number(1_200_000_000.0), "1.2B");
    }

    #[test]
    fn test_format_number_precise() {
        assert_eq!(format_number_precise(0.05), "0.0500");
        assert_eq!(format_number_precise(12.3456), "12.35");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(45), "45s");
        assert_eq!(format_time(300), "5m");
        assert_eq!(format_time(330), "5m 30s");
        assert_eq!(format_time(1800), "30m");
        assert_eq!(format_time(3600), "1h");
        assert_eq!(format_time(5400), "1h 30m");
    }
}
