//! Number format inspection
//!
//! Excel stores dates as serial numbers; only the cell's number format tells
//! them apart from quantities.

/// True when `code` renders a number as a date, time or duration.
///
/// Only the first (positive) section is inspected. Quoted literals, escaped
/// characters and bracketed modifiers such as `[Red]` or `[$-409]` are
/// ignored; elapsed-time brackets (`[h]`, `[mm]`, `[ss]`) count as time.
pub fn is_date_format(code: &str) -> bool {
    let section = code.split(';').next().unwrap_or_default();
    if section.eq_ignore_ascii_case("general") {
        return false;
    }

    let mut chars = section.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&b| b != ']').collect();
                if is_elapsed_token(&inner) {
                    return true;
                }
            }
            'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

fn is_elapsed_token(inner: &str) -> bool {
    let mut chars = inner.chars().map(|c| c.to_ascii_lowercase());
    match chars.next() {
        Some(first @ ('h' | 'm' | 's')) => chars.all(|c| c == first),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_and_time_formats() {
        assert!(is_date_format("yyyy-mm-dd"));
        assert!(is_date_format("m/d/yyyy"));
        assert!(is_date_format("d-mmm-yy"));
        assert!(is_date_format("h:mm AM/PM"));
        assert!(is_date_format("[h]:mm:ss"));
        assert!(is_date_format("[$-409]dd/mm/yyyy;@"));
    }

    #[test]
    fn test_number_formats() {
        assert!(!is_date_format("General"));
        assert!(!is_date_format("0"));
        assert!(!is_date_format("#,##0.00"));
        assert!(!is_date_format("0.00E+00"));
        assert!(!is_date_format("[Red]#,##0;[Blue]-#,##0"));
        assert!(!is_date_format("#,##0 \"days\""));
        assert!(!is_date_format("0\\m"));
        assert!(!is_date_format(""));
    }
}
