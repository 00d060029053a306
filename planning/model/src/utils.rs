use std::fmt::{Display, Formatter};

use crate::RealValue;

/// Displays a rational as a PDDL number: an integer when possible, a decimal literal otherwise.
///
/// The literal is exact for values accepted by [`has_decimal_form`]. Other values (e.g. `1/3`) are
/// approximated through `f64`.
#[derive(Clone, Copy, Debug)]
pub struct DecimalValue(pub RealValue);

impl Display for DecimalValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = self.0;
        if v.is_integer() {
            return write!(f, "{}", v.to_integer());
        }
        match exact_decimal(v) {
            Some((scaled, digits)) => {
                let sign = if scaled < 0 { "-" } else { "" };
                let unit = 10u128.pow(digits);
                let abs = scaled.unsigned_abs();
                write!(f, "{sign}{}.{:0width$}", abs / unit, abs % unit, width = digits as usize)
            }
            None => write!(f, "{}", *v.numer() as f64 / *v.denom() as f64),
        }
    }
}

/// Number of fractional digits of the decimal form of `v`, if it has a finite one.
fn decimal_digits(v: RealValue) -> Option<u32> {
    let mut denom = *v.denom();
    let (mut twos, mut fives) = (0, 0);
    while denom % 2 == 0 {
        denom /= 2;
        twos += 1;
    }
    while denom % 5 == 0 {
        denom /= 5;
        fives += 1;
    }
    (denom == 1).then_some(twos.max(fives))
}

/// `v` as an integer number of `10^-digits` units.
fn exact_decimal(v: RealValue) -> Option<(i128, u32)> {
    let digits = decimal_digits(v)?;
    let unit = 10i128.checked_pow(digits)?;
    let scaled = (*v.numer() as i128).checked_mul(unit / *v.denom() as i128)?;
    Some((scaled, digits))
}

/// True if the value can be written as a PDDL number literal without loss.
pub fn has_decimal_form(v: RealValue) -> bool {
    exact_decimal(v).is_some()
}

/// Parses a PDDL number literal (`3`, `-2`, `0.25`) into an exact rational.
pub fn parse_decimal(s: &str) -> Option<RealValue> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let denom = 10i64.checked_pow(frac.len() as u32)?;
    let int: i64 = if int.is_empty() { 0 } else { int.parse().ok()? };
    let frac: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let numer = int.checked_mul(denom)?.checked_add(frac)?;
    let v = RealValue::new(numer, denom);
    Some(if neg { -v } else { v })
}
