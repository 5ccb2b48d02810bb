//! Parsing of raw form fields.
//!
//! Numbers may use either `.` or `,` as the decimal separator, so a single
//! comma is always a decimal comma: `"1,5"` is 1.5 in scalar and list fields
//! alike. List fields are split on `;` when one is present, otherwise on
//! whitespace. A bare token with two or more commas (`"1,2,3"`) is a
//! comma-separated list of numbers with decimal points.

use crate::compute::FloatValue;
use crate::errors::{GhgError, GhgResult};

fn invalid(field: &str, raw: &str) -> GhgError {
    GhgError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

/// Parse a single number, accepting a decimal comma.
pub fn parse_scalar(field: &str, raw: &str) -> GhgResult<FloatValue> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<FloatValue>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(field, raw)),
    }
}

/// Parse a delimiter-separated list of numbers.
pub fn parse_list(field: &str, raw: &str) -> GhgResult<Vec<FloatValue>> {
    let element = |part: &str| parse_scalar(field, part).map_err(|_| invalid(field, raw));
    let values = if raw.contains(';') {
        raw.split(';')
            .filter(|part| !part.trim().is_empty())
            .map(element)
            .collect::<GhgResult<Vec<_>>>()?
    } else if raw.trim().matches(',').count() >= 2 && !raw.trim().contains(char::is_whitespace) {
        raw.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| match part.trim().parse::<FloatValue>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(invalid(field, raw)),
            })
            .collect::<GhgResult<Vec<_>>>()?
    } else {
        // "1, 2, 3" separates with a comma and a space
        raw.split_whitespace()
            .map(|part| part.strip_suffix(',').unwrap_or(part))
            .filter(|part| !part.is_empty())
            .map(element)
            .collect::<GhgResult<Vec<_>>>()?
    };
    if values.is_empty() {
        return Err(invalid(field, raw));
    }
    Ok(values)
}

/// Parse `name = value` bindings separated by newlines or `;`.
///
/// Values accept a decimal comma. Blank lines are ignored.
pub fn parse_bindings(text: &str) -> GhgResult<Vec<(String, FloatValue)>> {
    text.split(['\n', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (name, value) = line.split_once('=').ok_or_else(|| invalid("binding", line))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid("binding", line));
            }
            Ok((name.to_string(), parse_scalar(name, value)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_scalar("x", "1,5").unwrap(), 1.5);
        assert_eq!(
            parse_scalar("x", "1,5").unwrap(),
            parse_scalar("x", "1.5").unwrap()
        );
        assert_eq!(parse_scalar("x", "  -2.25 ").unwrap(), -2.25);
        assert_eq!(parse_scalar("x", "1e3").unwrap(), 1000.0);
    }

    #[test]
    fn test_invalid_scalar() {
        for raw in ["abc", "", "1.000,5", "inf", "NaN", "1 2"] {
            match parse_scalar("Mass", raw) {
                Err(GhgError::InvalidNumber { field, value }) => {
                    assert_eq!(field, "Mass");
                    assert_eq!(value, raw);
                }
                other => panic!("expected InvalidNumber for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_list_with_commas_and_spaces() {
        assert_eq!(parse_list("W", "1, 2 3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_list("W", "1,2,3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_list("W", "1,5 2,5").unwrap(), vec![1.5, 2.5]);
        assert_eq!(parse_list("W", "4.5").unwrap(), vec![4.5]);
    }

    #[test]
    fn test_single_comma_is_decimal_in_lists() {
        assert_eq!(parse_list("W", "1,5").unwrap(), vec![1.5]);
        assert_eq!(
            parse_list("W", "1,5").unwrap(),
            vec![parse_scalar("W", "1.5").unwrap()]
        );
        assert_eq!(parse_list("W", " 1,5 ").unwrap(), vec![1.5]);
    }

    #[test]
    fn test_list_with_semicolons_keeps_decimal_comma() {
        assert_eq!(parse_list("W", "1,5; 2,5;").unwrap(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_invalid_list() {
        assert!(parse_list("W", "").is_err());
        assert!(parse_list("W", " ; ").is_err());
        assert!(parse_list("W", "1, x").is_err());
        assert!(parse_list("W", "1,5,x").is_err());
        assert!(parse_list("W", ",").is_err());
    }

    #[test]
    fn test_bindings() {
        let bindings = parse_bindings("a = 2\n\nb=3,5; c = -1").unwrap();
        assert_eq!(
            bindings,
            vec![
                ("a".to_string(), 2.0),
                ("b".to_string(), 3.5),
                ("c".to_string(), -1.0)
            ]
        );
        assert!(parse_bindings("a 2").is_err());
        assert!(parse_bindings("= 2").is_err());
        assert!(parse_bindings("a = x").is_err());
    }
}
