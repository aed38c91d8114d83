//! Number formatting for insight text.

/// Placeholder for statistics that cannot be computed.
pub const UNAVAILABLE: &str = "unavailable";

/// Two decimal places, or [`UNAVAILABLE`].
pub fn stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Percentage with two decimals, without the `%` sign.
pub fn percent(value: f64) -> String {
    format!("{value:.2}")
}

/// Integer with `,` thousands separators: `1234567` → `1,234,567`.
pub fn count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
