/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use royalty_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    // Handle the sign separately so the thousands grouping works on the
    // absolute value.
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by an epsilon before rounding so binary midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    // Build the thousands-separated integer portion.
    let int_str = integer_part.to_string();
    let grouped = group_thousands(&int_str);

    let result = if decimals == 0 {
        grouped
    } else {
        // Format the fractional part to the exact number of decimals.
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50". Strip the leading "0".
        let decimal_digits = &frac_str[1..]; // ".50"
        format!("{}{}", grouped, decimal_digits)
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount as a euro string with two decimal places and
/// thousands separators.
///
/// # Examples
///
/// ```
/// use royalty_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56),  "€1,234.56");
/// assert_eq!(format_currency(0.0),      "€0.00");
/// assert_eq!(format_currency(-9.99),    "€-9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("€-{}", format_number(amount.abs(), 2))
    } else {
        format!("€{}", format_number(amount, 2))
    }
}

/// Abbreviate a count into a human-readable magnitude with one decimal
/// place, scaling by 1000 through the K/M/B/T units and falling through
/// to P beyond that.
///
/// # Examples
///
/// ```
/// use royalty_core::formatting::abbreviate_count;
///
/// assert_eq!(abbreviate_count(0.0),         "0.0");
/// assert_eq!(abbreviate_count(950.0),       "950.0");
/// assert_eq!(abbreviate_count(1_500.0),     "1.5K");
/// assert_eq!(abbreviate_count(2_500_000.0), "2.5M");
/// ```
pub fn abbreviate_count(value: f64) -> String {
    let mut scaled = value;
    for unit in ["", "K", "M", "B", "T"] {
        if scaled.abs() < 1000.0 {
            return format!("{:.1}{}", scaled, unit);
        }
        scaled /= 1000.0;
    }
    format!("{:.1}P", scaled)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use royalty_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
