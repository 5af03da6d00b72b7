//! Human-readable sizes for reports and task summaries.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Base-1024 with at most two decimals and no trailing zeros:
/// `0 B`, `512 B`, `1.5 KB`, `2 MB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Lenient `retainDays` parsing for query strings and CLI input: anything
/// that isn't a non-negative integer becomes 0.
#[must_use]
pub fn parse_retain_days(input: &str) -> u32 {
    let trimmed = input.trim().trim_end_matches(['d', 'D']);
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(truncate))
        .map_or(0, clamp_u32)
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn truncate(value: f64) -> i64 {
    if value.is_finite() { value.trunc() as i64 } else { 0 }
}

pub(crate) fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_the_dashboard() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024 * 2), "2 MB");
        assert_eq!(format_size(1_288_490_189), "1.2 GB");
        assert_eq!(format_size(1024_u64.pow(5)), "1024 TB");
    }

    #[test]
    fn retain_days_defaults_to_zero() {
        assert_eq!(parse_retain_days("7"), 7);
        assert_eq!(parse_retain_days(" 30d "), 30);
        assert_eq!(parse_retain_days("2.9"), 2);
        assert_eq!(parse_retain_days("-3"), 0);
        assert_eq!(parse_retain_days("soon"), 0);
        assert_eq!(parse_retain_days(""), 0);
    }
}
