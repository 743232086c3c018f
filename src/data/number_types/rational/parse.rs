//! # Parsing rationals from strings
//!
//! The accepted grammar:
//!
//! ```text
//! rat      := "inf" | "-inf" | signed
//! signed   := ['+'|'-'] mantissa [exp]
//! mantissa := digits | digits '.' digits | '.' digits | digits '.'
//! exp      := ('e'|'E') ['+'|'-'] digits
//! ```
//!
//! A string lacking `.`, `e` and `E` is parsed as `p/q` when it contains a `/` and as an integer
//! otherwise. "inf" and "-inf" parse to `±10^100`.
use std::fmt;
use std::str::FromStr;

use num::bigint::BigInt;
use num::rational::BigRational;
use num::{One, Zero};

use crate::data::number_types::rational::Rational;

/// A string did not match the rational grammar.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseRationalError {
    input: String,
}

impl ParseRationalError {
    fn new(input: &str) -> Self {
        Self { input: input.to_string() }
    }
}

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid rational literal: \"{}\"", self.input)
    }
}

impl std::error::Error for ParseRationalError {
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "inf" => return Ok(Self::bound_infinity()),
            "-inf" => return Ok(-Self::bound_infinity()),
            _ => {},
        }

        if !input.contains(['.', 'e', 'E']) {
            return match input.split_once('/') {
                Some((numer, denom)) => {
                    let numer = parse_integer(numer).ok_or_else(|| ParseRationalError::new(input))?;
                    let denom = parse_integer(denom).ok_or_else(|| ParseRationalError::new(input))?;
                    if denom.is_zero() {
                        return Err(ParseRationalError::new(input));
                    }
                    Ok(Self::from_parts(numer, denom))
                },
                None => parse_integer(input)
                    .map(|value| Self::from(value))
                    .ok_or_else(|| ParseRationalError::new(input)),
            };
        }

        // Base-10 decimal number, possibly with an exponent.
        let (mantissa, shift) = match input.find(['e', 'E']) {
            Some(position) => {
                let exponent = input[(position + 1)..].parse::<i32>()
                    .map_err(|_| ParseRationalError::new(input))?;
                (&input[..position], exponent)
            },
            None => (input, 0),
        };

        let mut mantissa = mantissa.to_string();
        if mantissa.starts_with('.') {
            mantissa.insert(0, '0');
        }

        let value = match mantissa.find('.') {
            Some(position) => {
                let decimals = mantissa.len() - 1 - position;
                mantissa.remove(position);

                // Strip padding zeros for a canonical numerator on both sign branches.
                if let Some(stripped) = mantissa.strip_prefix('-') {
                    let keep = stripped.find(|c| c != '0').unwrap_or(stripped.len() - 1);
                    mantissa.replace_range(1..(1 + keep), "");
                } else {
                    let keep = mantissa.find(|c| c != '0').unwrap_or(mantissa.len() - 1);
                    mantissa.replace_range(0..keep, "");
                }

                let numer = parse_integer(&mantissa).ok_or_else(|| ParseRationalError::new(input))?;
                BigRational::new(numer, BigInt::from(10).pow(decimals as u32))
            },
            None => {
                let numer = parse_integer(&mantissa).ok_or_else(|| ParseRationalError::new(input))?;
                BigRational::from_integer(numer)
            },
        };

        let scale = if shift >= 0 {
            BigRational::from_integer(BigInt::from(10).pow(shift as u32))
        } else {
            BigRational::new(BigInt::one(), BigInt::from(10).pow(-shift as u32))
        };

        Ok(Self::from_parts_of(value * scale))
    }
}

impl Rational {
    fn from_parts_of(inner: BigRational) -> Self {
        Self::from_parts(inner.numer().clone(), inner.denom().clone())
    }
}

fn parse_integer(digits: &str) -> Option<BigInt> {
    let unsigned = digits.strip_prefix('+').unwrap_or(digits);
    if unsigned.is_empty() {
        return None;
    }

    BigInt::from_str(unsigned).ok()
}

#[cfg(test)]
mod test {
    use num::Zero;

    use crate::data::number_types::rational::Rational;
    use crate::R;

    fn parse(input: &str) -> Rational {
        input.parse().unwrap()
    }

    #[test]
    fn integers_and_fractions() {
        assert_eq!(parse("0"), Rational::zero());
        assert_eq!(parse("42"), R!(42, 1));
        assert_eq!(parse("-42"), R!(-42, 1));
        assert_eq!(parse("+42"), R!(42, 1));
        assert_eq!(parse("1/3"), R!(1, 3));
        assert_eq!(parse("-2/4"), R!(-1, 2));
        assert_eq!(parse("+2/4"), R!(1, 2));
    }

    #[test]
    fn decimals() {
        assert_eq!(parse("0.5"), R!(1, 2));
        assert_eq!(parse(".5"), R!(1, 2));
        assert_eq!(parse("5."), R!(5, 1));
        assert_eq!(parse("-0.25"), R!(-1, 4));
        assert_eq!(parse("-.25"), R!(-1, 4));
        assert_eq!(parse("0.1"), R!(1, 10));
        assert_eq!(parse("00012.5"), R!(25, 2));
    }

    #[test]
    fn exponents() {
        assert_eq!(parse(".5e-2"), R!(1, 200));
        assert_eq!(parse("1.5e2"), R!(150, 1));
        assert_eq!(parse("1.5E+2"), R!(150, 1));
        assert_eq!(parse("2e3"), R!(2000, 1));
        assert_eq!(parse("-2.5e-1"), R!(-1, 4));
    }

    #[test]
    fn infinities() {
        let infinity = parse("inf");
        assert_eq!(infinity, Rational::bound_infinity());

        let negative = parse("-inf");
        assert!(negative < Rational::zero());
        assert!(negative > -1e200);
    }

    #[test]
    fn roundtrip_is_idempotent() {
        for input in ["1/3", "-7/2", "0", "42", "-42"] {
            let parsed = parse(input);
            assert_eq!(parsed.to_string(), input);
            assert_eq!(parse(&parsed.to_string()), parsed);
        }

        // Equivalent spellings of the same value agree.
        assert_eq!(parse("0.5"), parse("1/2"));
        assert_eq!(parse("5e-1"), parse("1/2"));
        assert_eq!(parse("0.05e1"), parse("1/2"));
    }

    #[test]
    fn rejects_malformed() {
        for input in ["", "abc", "1/0", "1//2", "1.2.3", "e5", "+", "--1", "1e", "+inf"] {
            assert!(input.parse::<Rational>().is_err(), "{}", input);
        }
    }
}
