//! Balance Normalization
//!
//! Converts raw integer token amounts into display-ready values using
//! the token's `decimals` metadata field.

/// Convert a raw on-chain balance to a display value.
///
/// Returns `None` when no raw balance is available (no viewer identity,
/// or the balance was never resolved); callers must render the absence
/// as a sentinel, never as zero.
///
/// The division is done in f64. For supplies around 10^33 (a billion
/// tokens at 24 decimals) the relative error stays within one f64 ulp,
/// about 1e-16; tests pin a 1e-9 relative tolerance.
pub fn normalize(raw: Option<u128>, decimals: u32) -> Option<f64> {
    raw.map(|value| value as f64 / 10f64.powi(decimals as i32))
}

/// Render a normalized balance, using `-` for an absent one.
pub fn display_amount(normalized: Option<f64>) -> String {
    match normalized {
        Some(value) => format!("{value}"),
        None => "-".to_string(),
    }
}
