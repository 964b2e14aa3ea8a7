//! Numeric policy for constant folding.
//!
//! Numbers in the language are IEEE-754 doubles. The helpers here match the runtime's semantics for the
//! operators whose behavior differs from Rust's primitive operators.

/// Modulo whose result takes the sign of the divisor.
///
/// ## Examples
/// ```rust
/// use mtots_core::numeric::float_mod;
///
/// assert_eq!(float_mod(7.0, 3.0), 1.0);
/// assert_eq!(float_mod(-7.0, 3.0), 2.0);
/// assert_eq!(float_mod(7.0, -3.0), -2.0);
/// ```
pub fn float_mod(a: f64, b: f64) -> f64 {
    let f = a % b;
    if f == 0.0 {
        return 0.0;
    }
    if (a < 0.0) == (b < 0.0) {
        return f;
    }
    f + b
}

/// Floor division (`//`).
///
/// ## Examples
/// ```rust
/// use mtots_core::numeric::floor_div;
///
/// assert_eq!(floor_div(7.0, 2.0), 3.0);
/// assert_eq!(floor_div(-7.0, 2.0), -4.0);
/// ```
pub fn floor_div(a: f64, b: f64) -> f64 {
    (a / b).floor()
}

/// Render a number the way the language prints numeric constants (`1`, `1.5`, `-0.25`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{value}")
    }
}
