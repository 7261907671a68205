use crate::{
    category::{Category, CategoryError},
    expense::Expense,
};
use chrono::{Local, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum ValidationError {
    #[error("please fill in all fields")]
    MissingFields,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("please enter a valid amount")]
    InvalidAmount(String),
    #[error("the amount '{0}' is too large to record")]
    AmountOutOfRange(String),
}

impl From<CategoryError> for ValidationError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::Unknown(name) => ValidationError::UnknownCategory(name),
        }
    }
}

/// Returns the local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Build an `Expense` from raw form input.
///
/// Rules are checked in order and the first failure wins: the description must not be
/// blank, a category must be selected, then the amount must parse. No sign check is
/// made on the amount; only magnitudes a `Decimal` cannot hold are refused. A missing
/// date falls back to today.
pub fn validate(
    description: &str,
    amount: &str,
    category: Option<&str>,
    date: Option<NaiveDate>,
    now: Option<NaiveDate>, // This allows overriding the current date for testing
) -> Result<Expense, ValidationError> {
    if description.trim().is_empty() {
        debug!("rejecting expense with a blank description");
        return Err(ValidationError::MissingFields);
    }

    let category: Category = match category.map(str::trim) {
        Some(name) if !name.is_empty() => name.parse()?,
        _ => {
            debug!("rejecting expense without a category");
            return Err(ValidationError::MissingFields);
        }
    };

    let amount = parse_amount(amount)?;
    let date = date.unwrap_or_else(|| now.unwrap_or_else(today));

    Ok(Expense::new(description, amount, category, date))
}

/// Parse a user-entered amount. Surrounding whitespace is ignored and both plain
/// (`-12.50`) and scientific (`1.5e2`) notation are accepted.
///
/// Magnitudes too small for a `Decimal` round towards zero. Magnitudes too large are
/// reported as `AmountOutOfRange` rather than `InvalidAmount`.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let s = raw.trim();

    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let mantissa = match normalise_mantissa(mantissa) {
        Some(m) => m,
        None => return Err(invalid_amount(raw)),
    };

    let exponent = match exponent {
        Some(e) if is_signed_integer(e) => match e.parse::<i64>() {
            Ok(e) => e,
            Err(_) => return Err(out_of_range(raw)),
        },
        Some(_) => return Err(invalid_amount(raw)),
        None => 0,
    };

    Decimal::from_str(&mantissa)
        .ok()
        .and_then(|m| scale_by_power_of_ten(m, exponent))
        .ok_or_else(|| out_of_range(raw))
}

// Returns the mantissa in the form `[-]digits[.digits]`, or `None` if it isn't a plain
// decimal number. Only ASCII digits, one leading sign and one point are allowed.
fn normalise_mantissa(s: &str) -> Option<String> {
    let (sign, unsigned) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };

    let mut parts = unsigned.splitn(2, '.');
    let int = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");

    let is_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if (int.is_empty() && frac.is_empty()) || !is_digits(int) || !is_digits(frac) {
        return None;
    }

    let int = if int.is_empty() { "0" } else { int };
    if frac.is_empty() {
        Some(format!("{}{}", sign, int))
    } else {
        Some(format!("{}{}.{}", sign, int, frac))
    }
}

fn is_signed_integer(s: &str) -> bool {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// Multiplies `value` by 10^`exponent`. Returns `None` on overflow; underflow rounds
// towards zero.
fn scale_by_power_of_ten(mut value: Decimal, exponent: i64) -> Option<Decimal> {
    let ten = Decimal::from(10);

    if exponent >= 0 {
        for _ in 0..exponent {
            if value.is_zero() {
                break;
            }
            value = value.checked_mul(ten)?;
        }
    } else {
        for _ in 0..exponent.unsigned_abs() {
            if value.is_zero() {
                break;
            }
            value = value.checked_div(ten).unwrap_or(Decimal::ZERO);
        }
    }

    Some(value)
}

fn invalid_amount(raw: &str) -> ValidationError {
    warn!("invalid amount entered '{}'", raw);
    ValidationError::InvalidAmount(raw.into())
}

fn out_of_range(raw: &str) -> ValidationError {
    warn!("amount entered is out of range '{}'", raw);
    ValidationError::AmountOutOfRange(raw.into())
}
