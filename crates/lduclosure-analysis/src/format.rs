/// Formats `value` with `precision` decimals and `,` thousands separators.
///
/// # Examples
///
/// ```
/// # use lduclosure_analysis::format::grouped;
/// assert_eq!(grouped(1_234_567.891, 2), "1,234,567.89");
/// assert_eq!(grouped(-1234.4, 0), "-1,234");
/// assert_eq!(grouped(999.0, 3), "999.000");
/// ```
#[must_use]
pub fn grouped(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = format!("{:.precision$}", value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Like [`grouped`], with a trailing `%` when `percent` is set.
#[must_use]
pub fn grouped_value(value: f64, precision: usize, percent: bool) -> String {
    let mut s = grouped(value, precision);
    if percent {
        s.push('%');
    }
    s
}
