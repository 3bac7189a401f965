//! Per-field value normalization.
//!
//! None of these reject input: values that do not fit a known shape come
//! back as `None` (dates, postal codes) or unchanged (sex).

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn is_month(digits: &str) -> bool {
    matches!(digits.parse::<u8>(), Ok(1..=12))
}

/// Normalizes an 8 digit date to `YYYY-MM-DD`.
///
/// Non-digits are ignored. The value reads as `YYYYMMDD` when its fifth and
/// sixth digits form a month, else as `MMDDYYYY` when its first two do, and
/// as `YYYYMMDD` otherwise. Days are not checked.
pub fn normalize_date(value: &str) -> Option<String> {
    let d = digits(value);
    if d.len() != 8 {
        return None;
    }

    let (year, month, day) = if is_month(&d[4..6]) || !is_month(&d[0..2]) {
        (&d[0..4], &d[4..6], &d[6..8])
    } else {
        (&d[4..8], &d[0..2], &d[2..4])
    };

    Some(format!("{year}-{month}-{day}"))
}

/// Checks that `value` has the `YYYY-MM-DD` shape.
pub fn is_canonical_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Normalizes a US postal code to `NNNNN` or `NNNNN-NNNN`.
pub fn normalize_postal_code(value: &str) -> Option<String> {
    let d = digits(value);
    if d.len() >= 9 {
        Some(format!("{}-{}", &d[0..5], &d[5..9]))
    } else if d.len() >= 5 {
        Some(d[0..5].to_owned())
    } else {
        None
    }
}

/// Normalizes a sex code to `M`, `F` or `X`.
///
/// AAMVA uses `1`, `2` and `9`; spelled out or single letter forms are also
/// understood. Unknown values are kept as they are.
pub fn normalize_sex(value: &str) -> Option<String> {
    let v = value.trim();
    let code = match v.to_ascii_lowercase().as_str() {
        "" => return None,
        "1" | "m" | "male" => "M",
        "2" | "f" | "female" => "F",
        "9" | "x" | "n" | "u" => "X",
        _ => v,
    };

    Some(code.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_year_first() {
        assert_eq!(normalize_date("20240419").as_deref(), Some("2024-04-19"));
        assert_eq!(normalize_date("1988/04/19").as_deref(), Some("1988-04-19"));
    }

    #[test]
    fn date_month_first() {
        assert_eq!(normalize_date("01012000").as_deref(), Some("2000-01-01"));
        assert_eq!(normalize_date("04-19-1988").as_deref(), Some("1988-04-19"));
        assert_eq!(normalize_date("12312099").as_deref(), Some("2099-12-31"));
    }

    #[test]
    fn date_year_first_outside_19xx_20xx() {
        assert_eq!(normalize_date("18500101").as_deref(), Some("1850-01-01"));
        assert_eq!(normalize_date("21000101").as_deref(), Some("2100-01-01"));
        assert_eq!(normalize_date("18991231").as_deref(), Some("1899-12-31"));
    }

    #[test]
    fn date_without_calendar_check() {
        assert_eq!(normalize_date("20001301").as_deref(), Some("2000-13-01"));
        assert_eq!(normalize_date("12452000").as_deref(), Some("2000-12-45"));
        assert_eq!(normalize_date("13452000").as_deref(), Some("1345-20-00"));
    }

    #[test]
    fn date_needs_eight_digits() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("2024041"), None);
        assert_eq!(normalize_date("202404190"), None);
        assert_eq!(normalize_date("APRIL 19"), None);
    }

    #[test]
    fn canonical_date_is_stable() {
        for input in [
            "20240419", "04191988", "19000101", "12312099", "18500101", "21000101", "13452000",
        ] {
            let once = normalize_date(input).unwrap();
            assert!(is_canonical_date(&once));
            assert_eq!(normalize_date(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn canonical_date_shape() {
        assert!(is_canonical_date("2000-01-01"));
        assert!(!is_canonical_date("2000-1-01"));
        assert!(!is_canonical_date("2000/01/01"));
        assert!(!is_canonical_date("20000101"));
        assert!(!is_canonical_date("2000-01-0a"));
    }

    #[test]
    fn postal_code() {
        assert_eq!(normalize_postal_code("958160000").as_deref(), Some("95816-0000"));
        assert_eq!(normalize_postal_code("95816-1234 99").as_deref(), Some("95816-1234"));
        assert_eq!(normalize_postal_code("F87P20000").as_deref(), Some("87200"));
        assert_eq!(normalize_postal_code("95816").as_deref(), Some("95816"));
        assert_eq!(normalize_postal_code("9581612").as_deref(), Some("95816"));
        assert_eq!(normalize_postal_code("9581"), None);
        assert_eq!(normalize_postal_code(""), None);
    }

    #[test]
    fn sex_codes() {
        assert_eq!(normalize_sex("1").as_deref(), Some("M"));
        assert_eq!(normalize_sex("2").as_deref(), Some("F"));
        assert_eq!(normalize_sex("9").as_deref(), Some("X"));
        assert_eq!(normalize_sex("Male").as_deref(), Some("M"));
        assert_eq!(normalize_sex("f").as_deref(), Some("F"));
        assert_eq!(normalize_sex(" FEMALE ").as_deref(), Some("F"));
        assert_eq!(normalize_sex("n").as_deref(), Some("X"));
        assert_eq!(normalize_sex("U").as_deref(), Some("X"));
    }

    #[test]
    fn sex_passthrough() {
        assert_eq!(normalize_sex("3").as_deref(), Some("3"));
        assert_eq!(normalize_sex(" other ").as_deref(), Some("other"));
        assert_eq!(normalize_sex("  "), None);
    }
}
