//! Human-readable magnitudes for dashboard metrics

/// Currency prefix used for revenue metrics
pub const CURRENCY_PREFIX: &str = "R$";

const UNITS: [&str; 2] = ["", "mil"];
const MILLIONS: &str = "milhões";

/// Format a value with a magnitude suffix
///
/// Below 1000 the value is shown as-is, up to a million it is shown in
/// thousands (`mil`), and above that in millions (`milhões`). Always two
/// decimals. The unit slot is kept even when empty, so `500` becomes
/// `"500.00 "`.
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut scaled = value;
    for unit in UNITS {
        if scaled < 1000.0 {
            return with_prefix(prefix, scaled, unit);
        }
        scaled /= 1000.0;
    }
    with_prefix(prefix, scaled, MILLIONS)
}

/// Revenue metric, e.g. `"R$ 1.50 mil"`
pub fn format_currency(value: f64) -> String {
    format_number(value, CURRENCY_PREFIX)
}

/// Sales count metric, e.g. `"2.50 mil"`
pub fn format_count(count: u64) -> String {
    format_number(count as f64, "")
}

fn with_prefix(prefix: &str, value: f64, unit: &str) -> String {
    if prefix.is_empty() {
        format!("{:.2} {}", value, unit)
    } else {
        format!("{} {:.2} {}", prefix, value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_units() {
        assert_eq!(format_number(500.0, ""), "500.00 ");
        assert_eq!(format_number(1500.0, ""), "1.50 mil");
        assert_eq!(format_number(2_500_000.0, ""), "2.50 milhões");
    }

    #[test]
    fn test_format_number_boundaries() {
        assert_eq!(format_number(0.0, ""), "0.00 ");
        assert_eq!(format_number(999.0, ""), "999.00 ");
        assert_eq!(format_number(1000.0, ""), "1.00 mil");
        assert_eq!(format_number(999_000.0, ""), "999.00 mil");
        assert_eq!(format_number(1_000_000.0, ""), "1.00 milhões");
        assert_eq!(format_number(3_000_000_000.0, ""), "3000.00 milhões");
    }

    #[test]
    fn test_format_with_prefix() {
        assert_eq!(format_number(500.0, "R$"), "R$ 500.00 ");
        assert_eq!(format_currency(12_345.678), "R$ 12.35 mil");
        assert_eq!(format_count(2500), "2.50 mil");
    }

    #[test]
    fn test_format_is_monotonic_after_normalization() {
        fn normalize(s: &str) -> f64 {
            let mut parts = s.split_whitespace();
            let number: f64 = parts.next().unwrap().parse().unwrap();
            match parts.next() {
                Some("mil") => number * 1e3,
                Some("milhões") => number * 1e6,
                _ => number,
            }
        }

        let values = [0.0, 1.0, 999.99, 1000.0, 1001.0, 45_000.0, 999_999.0, 1e6, 7.5e6];
        let normalized: Vec<f64> = values
            .iter()
            .map(|v| normalize(&format_number(*v, "")))
            .collect();
        assert!(normalized.windows(2).all(|w| w[0] <= w[1]));
    }
}
