use crate::config::Settings;

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const TRILLION: f64 = 1_000_000_000_000.0;

/// Formats `value` with the style picked by the `truncate_numbers` setting.
/// The setting is read on every call.
pub fn format_value(value: f64, settings: &dyn Settings) -> String {
    format(value, settings.truncate_numbers())
}

pub fn format(value: f64, truncate: bool) -> String {
    if truncate {
        format_truncated(value)
    } else {
        format_readable(value)
    }
}

/// Formats a number with `,` separating every group of three digits and up to
/// two fraction digits, trailing zeros dropped.
///
/// `1000` becomes `1,000` and `1234.5` becomes `1,234.5`.
pub fn format_readable(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.2}", value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3);
    out.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

const SUFFIXES: [(f64, &str); 4] = [
    (THOUSAND, "K"),
    (MILLION, "M"),
    (BILLION, "B"),
    (TRILLION, "T"),
];

/// Scales a number down to thousands, millions, billions or trillions and
/// appends the matching suffix.
///
/// Everything below a million, including values under a thousand, is shown in
/// thousands: `500` is `0.5K` and `1000` is `1K`. `1,234,567` is `1.23M` and
/// `1,234,567,890.12` is `1.23B`. Anything from a trillion up stays in
/// trillions. A value that rounds up to `1000` of one unit moves to the next,
/// so `999,999` is `1M` rather than `1,000K`.
pub fn format_truncated(value: f64) -> String {
    let mut bucket = if value < MILLION {
        0
    } else if value < BILLION {
        1
    } else if value < TRILLION {
        2
    } else {
        3
    };
    while bucket + 1 < SUFFIXES.len() && round_hundredths(value / SUFFIXES[bucket].0) >= THOUSAND {
        bucket += 1;
    }
    let (scale, suffix) = SUFFIXES[bucket];
    format_readable(value / scale) + suffix
}

/// Rounds the way `format_readable` does before printing.
fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_groups_thousands() {
        assert_eq!(format_readable(0.0), "0");
        assert_eq!(format_readable(999.0), "999");
        assert_eq!(format_readable(1000.0), "1,000");
        assert_eq!(format_readable(123456.0), "123,456");
        assert_eq!(format_readable(1000000000.0), "1,000,000,000");
    }

    #[test]
    fn readable_keeps_two_fraction_digits() {
        assert_eq!(format_readable(1234.5), "1,234.5");
        assert_eq!(format_readable(0.125001), "0.13");
        assert_eq!(format_readable(2.999), "3");
        assert_eq!(format_readable(10.10), "10.1");
    }

    #[test]
    fn readable_negative() {
        assert_eq!(format_readable(-1234567.891), "-1,234,567.89");
        assert_eq!(format_readable(-100.0), "-100");
    }

    #[test]
    fn truncated_buckets() {
        assert_eq!(format_truncated(1000.0), "1K");
        assert_eq!(format_truncated(500.0), "0.5K");
        assert_eq!(format_truncated(1.0), "0K");
        assert_eq!(format_truncated(25_000.0), "25K");
        assert_eq!(format_truncated(1234567.0), "1.23M");
        assert_eq!(format_truncated(1234567890.12), "1.23B");
        assert_eq!(format_truncated(5_000_000_000_000.0), "5T");
        assert_eq!(format_truncated(2_500_000_000_000_000.0), "2,500T");
    }

    #[test]
    fn truncated_rounding_moves_to_next_unit() {
        assert_eq!(format_truncated(999_999.0), "1M");
        assert_eq!(format_truncated(1_000_000.0), "1M");
        assert_eq!(format_truncated(999_994.0), "999.99K");
        assert_eq!(format_truncated(999_999_999.0), "1B");
        assert_eq!(format_truncated(999_999_999_999.0), "1T");
        assert_eq!(format_truncated(1500.0), "1.5K");
    }

    #[test]
    fn format_follows_preference() {
        assert_eq!(format(1500.0, true), "1.5K");
        assert_eq!(format(1500.0, false), "1,500");
    }
}
