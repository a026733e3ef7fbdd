//! Amounts are stored as integer paise and shown as two-decimal strings.

/// Render minor units as a decimal string, e.g. `4550` -> `"45.50"`.
pub fn format_paise(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Convert a major-unit amount to paise, rounding to the nearest paisa.
pub fn paise_from_amount(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_paise() {
        assert_eq!(format_paise(0), "0.00");
        assert_eq!(format_paise(5), "0.05");
        assert_eq!(format_paise(4550), "45.50");
        assert_eq!(format_paise(-120), "-1.20");
    }

    #[test]
    fn test_paise_from_amount_rounds() {
        assert_eq!(paise_from_amount(12.346), 1235);
        assert_eq!(paise_from_amount(30.0), 3000);
    }
}
