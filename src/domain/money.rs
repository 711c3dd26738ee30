use std::fmt;

/// Amounts are stored as integer cents so that totals add up exactly.
/// $15.50 is kept as 1550.
pub type Cents = i64;

/// Render cents as a plain decimal string with two places.
/// Example: 1550 -> "15.50", -7 -> "-0.07"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
}

/// Render a magnitude with a leading currency symbol, e.g. "$15.50".
pub fn format_dollars(cents: Cents) -> String {
    let magnitude = cents.unsigned_abs();
    format!("${}.{:02}", magnitude / 100, magnitude % 100)
}

/// Parse decimal text into cents.
///
/// Accepts an optional sign, whole units and up to any number of fractional
/// digits; anything past the second fractional digit is rounded half-up.
/// Example: "15.5" -> 1550, "-3" -> -300, "0.125" -> 13
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if units.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::Empty);
    }
    if !units.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }

    let units: i64 = if units.is_empty() {
        0
    } else {
        units
            .parse()
            .map_err(|_| ParseCentsError::OutOfRange(input.to_string()))?
    };

    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .ok_or_else(|| ParseCentsError::OutOfRange(input.to_string()))?;

    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "amount is empty"),
            ParseCentsError::InvalidFormat(s) => write!(f, "'{}' is not a valid amount", s),
            ParseCentsError::OutOfRange(s) => write!(f, "'{}' is too large", s),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1550), "15.50");
        assert_eq!(format_cents(100000), "1000.00");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-98450), "-984.50");
    }

    #[test]
    fn test_format_dollars_drops_sign() {
        assert_eq!(format_dollars(1550), "$15.50");
        assert_eq!(format_dollars(-1550), "$15.50");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("15.50"), Ok(1550));
        assert_eq!(parse_cents("15.5"), Ok(1550));
        assert_eq!(parse_cents("1000"), Ok(100000));
        assert_eq!(parse_cents(" 73.0 "), Ok(7300));
        assert_eq!(parse_cents(".25"), Ok(25));
        assert_eq!(parse_cents("5."), Ok(500));
        assert_eq!(parse_cents("-3"), Ok(-300));
        assert_eq!(parse_cents("+3"), Ok(300));
    }

    #[test]
    fn test_parse_cents_rounds_extra_precision() {
        assert_eq!(parse_cents("0.125"), Ok(13));
        assert_eq!(parse_cents("0.124"), Ok(12));
        assert_eq!(parse_cents("19.999"), Ok(2000));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents(""), Err(ParseCentsError::Empty));
        assert_eq!(parse_cents("."), Err(ParseCentsError::Empty));
        assert!(matches!(
            parse_cents("abc"),
            Err(ParseCentsError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_cents("1.2.3"),
            Err(ParseCentsError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::OutOfRange(_))
        ));
    }
}
