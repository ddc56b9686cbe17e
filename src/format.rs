//! Display formatting of coordinates
//!
//! Decimal ties round away from zero (`12.5` shows as `13`), the way
//! browsers format numbers, rather than to even as `{:.N}` does.

/// Formats `value` with `places` decimals, rounding ties away from zero
pub fn fixed(value: f64, places: usize) -> String {
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;

    // Only values that sit exactly on a tie format differently from `{:.N}`
    if scaled.is_finite() && scaled.fract().abs() == 0.5 && scaled / scale == value {
        return format!("{:.*}", places, scaled.round() / scale);
    }
    format!("{:.*}", places, value)
}

/// Formats meters with two decimals and comma thousands separators
/// (`325,798.36`). Non-finite values render as `0.00`.
pub fn meters(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }

    let rounded = fixed(value.abs(), 2);
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.001 rounds to 0.00 and must not keep its sign
    let sign = if value < 0.0 && rounded.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };

    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Formats degrees with a fixed number of decimals
pub fn degrees(value: f64, places: usize) -> String {
    fixed(value, places)
}

/// Formats an accuracy radius as `±12m`
pub fn accuracy(value: f64) -> String {
    format!("±{}m", fixed(value, 0))
}
