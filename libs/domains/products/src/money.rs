//! Conversions between decimal pounds and integer pence.
//!
//! Prices are stored and computed exclusively in minor units (pence) so that
//! no floating-point arithmetic ever touches persisted values. Decimal pounds
//! exist only at the API boundary: inbound payloads carry e.g. `49.99`, which
//! is converted once on the way in, and responses render the stored pence back
//! to a two-decimal string.

/// Convert a price in pounds to pence, rounding half away from zero.
///
/// `49.99` becomes `4999`, `0.01` becomes `1`. Inputs are validated as
/// positive before this is called, but the conversion itself is total.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Render a price in pence as a two-decimal string, e.g. `4999` -> `"49.99"`.
///
/// Pure integer arithmetic; no thousands separators or currency symbol.
pub fn to_display_string(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let magnitude = minor_units.unsigned_abs();
    format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
}
