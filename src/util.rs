// Parsing and small statistics helpers.
//
// Everything that touches raw CSV text or does arithmetic over a column lives
// here so the loader and the renderers can work with clean, typed values.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Parse a numeric cell, tolerating surrounding whitespace. Scientific
/// notation such as `1e-05` is accepted. Returns `None` for blanks and for
/// anything that is not a finite number.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a categorical code. Integral floats such as `"2.0"` are accepted
/// because spreadsheet exports often write codes that way.
pub fn parse_code(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

/// Look a code up in one of the fixed label tables.
pub fn map_code(table: &[(i64, &'static str)], code: Option<i64>) -> Option<&'static str> {
    let code = code?;
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Reverse lookup: label back to its code.
pub fn code_of(table: &[(i64, &'static str)], label: &str) -> Option<i64> {
    table.iter().find(|(_, l)| *l == label).map(|(c, _)| *c)
}

/// Round to 2 decimal places, ties to even, the same way the numeric
/// libraries behind the dashboards do it.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

pub fn average(v: &[f64]) -> f64 {
    // Returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Most frequent value; ties go to the smallest value in string order.
pub fn mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        // BTreeMap iterates in ascending order, so only a strictly larger
        // count may replace the current pick.
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v)
}

/// Linearly interpolated quantile of an already sorted slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Tukey box statistics: whiskers reach the most extreme observation that
/// lies within 1.5 IQR of the box, everything beyond is an outlier.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|v| *v >= low_fence)
        .unwrap_or(q1)
        .min(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_fence)
        .unwrap_or(q3)
        .max(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < whisker_low || *v > whisker_high)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, e.g. `1,500 rows loaded`.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OCCUPATION_LABELS;

    #[test]
    fn parses_numbers_and_rejects_text() {
        assert_eq!(parse_f64_safe(Some(" 7.25 ")), Some(7.25));
        assert_eq!(parse_f64_safe(Some("7.5E+00")), Some(7.5));
        assert_eq!(parse_f64_safe(Some("1e-05")), Some(0.00001));
        assert_eq!(parse_f64_safe(Some("1,204.5")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("seven")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn codes_accept_integral_floats_only() {
        assert_eq!(parse_code(Some("3")), Some(3));
        assert_eq!(parse_code(Some("3.0")), Some(3));
        assert_eq!(parse_code(Some("3.5")), None);
        assert_eq!(parse_code(Some("x")), None);
    }

    #[test]
    fn map_code_yields_none_outside_the_table() {
        assert_eq!(map_code(OCCUPATION_LABELS, Some(5)), Some("Retired"));
        assert_eq!(map_code(OCCUPATION_LABELS, Some(6)), None);
        assert_eq!(map_code(OCCUPATION_LABELS, None), None);
        assert_eq!(code_of(OCCUPATION_LABELS, "Student"), Some(2));
    }

    #[test]
    fn round2_matches_fixed_point_display() {
        assert_eq!(round2(7.456), 7.46);
        assert_eq!(round2(7.454), 7.45);
        assert_eq!(round2(3.0), 3.0);
        assert_eq!(round2(-1.239), -1.24);
        assert_eq!(format!("{:.2}", round2(2.0 / 3.0)), "0.67");
    }

    #[test]
    fn mode_breaks_ties_alphabetically() {
        assert_eq!(mode(["Poor", "Good", "Poor", "Good"]), Some("Good"));
        assert_eq!(mode(["Poor", "Good", "Poor"]), Some("Poor"));
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn box_stats_separates_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let stats = box_stats(&values).unwrap();
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 8.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(box_stats(&[]).is_none());
    }

    #[test]
    fn quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn format_int_groups_thousands() {
        assert_eq!(format_int(1500usize), "1,500");
    }
}
