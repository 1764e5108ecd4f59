//! Common utilities for document generation.
//!
//! Shared helpers for display formatting, XML escaping, and filenames.

use rust_decimal::Decimal;

/// Format a monetary amount with two decimals and thousands separators
/// (e.g. `12345.6` -> `"12,345.60"`).
pub fn format_money(value: Decimal) -> String {
    let raw = format!("{:.2}", value.round_dp(2));
    let (entero, fraccion) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let (signo, digitos) = match entero.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", entero),
    };

    let mut agrupado = String::with_capacity(digitos.len() + digitos.len() / 3);
    let total = digitos.len();
    for (i, ch) in digitos.chars().enumerate() {
        if i > 0 && (total - i) % 3 == 0 {
            agrupado.push(',');
        }
        agrupado.push(ch);
    }

    format!("{signo}{agrupado}.{fraccion}")
}

/// Format a non-monetary number as a plain decimal string, trailing zeros removed.
pub fn format_number(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Escape special characters for insertion into a DOCX XML part.
pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_grouping() {
        assert_eq!(format_money("12345.6".parse().unwrap()), "12,345.60");
        assert_eq!(format_money(Decimal::from(200)), "200.00");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
        assert_eq!(format_money("1234567.891".parse().unwrap()), "1,234,567.89");
    }

    #[test]
    fn test_format_number_normalizes() {
        assert_eq!(format_number("350.50".parse().unwrap()), "350.5");
        assert_eq!(format_number("350.00".parse().unwrap()), "350");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"Pérez & Hijos <S.A.>"#),
            "Pérez &amp; Hijos &lt;S.A.&gt;"
        );
        assert_eq!(escape_xml(r#"cita "doble""#), "cita &quot;doble&quot;");
    }
}
