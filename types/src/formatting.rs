//! Display formatting for effect state.
//!
//! All human-facing rendering of handles and shift amounts goes through this
//! module so REPL output and host overlays agree on how the same state looks.

/// Format the time left on a timed effect.
///
/// - Values >= 60s: `M:SS`
/// - Values >= 10s: whole seconds with an `s` suffix
/// - Values below 10s: one decimal place with an `s` suffix
/// - Values <= 0 (due but not yet swept): `0.0s`
///
/// # Examples
/// ```
/// use sigil_types::formatting::format_remaining;
/// assert_eq!(format_remaining(75.3), "1:15");
/// assert_eq!(format_remaining(15.7), "16s");
/// assert_eq!(format_remaining(3.55), "3.5s");
/// assert_eq!(format_remaining(-0.2), "0.0s");
/// ```
pub fn format_remaining(secs: f32) -> String {
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor() as u32;
        let remaining = (secs % 60.0).floor() as u32;
        format!("{}:{:02}", mins, remaining)
    } else if secs >= 10.0 {
        format!("{:.0}s", secs)
    } else {
        format!("{:.1}s", secs.max(0.0))
    }
}

/// Format a signed shift amount with an explicit sign.
///
/// Whole amounts print without a fractional part.
///
/// # Examples
/// ```
/// use sigil_types::formatting::format_signed;
/// assert_eq!(format_signed(50.0), "+50");
/// assert_eq!(format_signed(-12.5), "-12.5");
/// assert_eq!(format_signed(0.25), "+0.25");
/// ```
pub fn format_signed(amount: f64) -> String {
    format!("{:+}", amount)
}

/// Format an elapsed duration as `M:SS`.
///
/// # Examples
/// ```
/// use sigil_types::formatting::format_duration;
/// assert_eq!(format_duration(125), "2:05");
/// assert_eq!(format_duration(59), "0:59");
/// assert_eq!(format_duration(0), "0:00");
/// ```
pub fn format_duration(secs: i64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
