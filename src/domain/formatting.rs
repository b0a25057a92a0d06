//! Display helpers for the amount input.
//!
//! The form always stores the bare digit string; formatting is applied only
//! when rendering.

/// Keeps only ASCII digits, the way the amount input filters keystrokes.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Renders a digit string with `,` thousands separators.
///
/// Leading zeros are dropped like a numeric parse would; a string with no
/// digits renders as empty.
///
/// ```
/// use trackifi_onboarding::domain::format_amount;
///
/// assert_eq!(format_amount("10000"), "10,000");
/// assert_eq!(format_amount("$1,250"), "1,250");
/// assert_eq!(format_amount(""), "");
/// ```
pub fn format_amount(value: &str) -> String {
    let digits = digits_only(value);
    if digits.is_empty() {
        return String::new();
    }

    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };

    let mut grouped = String::with_capacity(significant.len() + significant.len() / 3);
    for (index, ch) in significant.chars().enumerate() {
        if index > 0 && (significant.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
