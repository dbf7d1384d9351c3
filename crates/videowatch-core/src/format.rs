//! Display formatting helpers.
//!
//! The status templates show raw byte counters from the server (bandwidth,
//! totals per client). [`bytes_as_readable_size`] turns those into the
//! human-readable form the dashboard displays.

const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = 1024 * 1024;
const GIGABYTE: u64 = 1024 * 1024 * 1024;

/// Formats a byte count as a human-readable size.
///
/// Thresholds are binary prefixes and strictly greater-than: a value must
/// exceed a unit before that unit is used, so exactly 1024 still renders as
/// `"1024 Bytes"`. Scaled values carry exactly two decimals.
///
/// # Example
///
/// ```rust
/// use videowatch_core::bytes_as_readable_size;
///
/// assert_eq!(bytes_as_readable_size(500), "500 Bytes");
/// assert_eq!(bytes_as_readable_size(2048), "2.00 KB");
/// assert_eq!(bytes_as_readable_size(5242880), "5.00 MB");
/// assert_eq!(bytes_as_readable_size(2147483648), "2.00 GB");
/// ```
pub fn bytes_as_readable_size(bytes: u64) -> String {
    if bytes > GIGABYTE {
        format!("{:.2} GB", round2(bytes as f64 / GIGABYTE as f64))
    } else if bytes > MEGABYTE {
        format!("{:.2} MB", round2(bytes as f64 / MEGABYTE as f64))
    } else if bytes > KILOBYTE {
        format!("{:.2} KB", round2(bytes as f64 / KILOBYTE as f64))
    } else {
        format!("{bytes} Bytes")
    }
}

/// Rounds half-up at the hundredths place (for non-negative input).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
