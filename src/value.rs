//! Typed values and the coercion rules between them and raw INI text.
//!
//! INI stores every value as text. This module converts that text on demand:
//!
//! - [`Value`]: a typed value (boolean, integer, float, string)
//! - [`BoolLiterals`]: the case-insensitive truthy/falsy word lists
//! - [`FromValue`]: conversion from raw text into Rust primitives
//! - [`parse_bool`], [`parse_integer`], [`parse_float`]: the grammars themselves
//!
//! Coercion never touches the document it reads from.
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::value::{parse_integer, parse_bool, BoolLiterals};
//! use inidoc::Value;
//!
//! assert_eq!(parse_integer("0x1F").unwrap(), 31);
//! assert!(parse_bool("Yes", &BoolLiterals::default()).unwrap());
//! assert_eq!(Value::from(2.0).to_raw(), "2.0");
//! ```

use crate::{Error, Result};
use std::fmt;

/// A typed INI value.
///
/// # Examples
///
/// ```rust
/// use inidoc::Value;
///
/// let port = Value::from(8080);
/// assert!(port.is_integer());
/// assert_eq!(port.to_raw(), "8080");
///
/// let name = Value::from("demo");
/// assert_eq!(name.as_str(), Some("demo"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value in its canonical textual form.
    ///
    /// Booleans become `true`/`false`, integers plain decimal, floats the
    /// shortest text that parses back to the same number (integral floats keep a
    /// trailing `.0`). Strings are returned unchanged; quoting is decided when a
    /// document is rendered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::Value;
    ///
    /// assert_eq!(Value::Bool(true).to_raw(), "true");
    /// assert_eq!(Value::Integer(-7).to_raw(), "-7");
    /// assert_eq!(Value::Float(0.25).to_raw(), "0.25");
    /// assert_eq!(Value::Float(3.0).to_raw(), "3.0");
    /// ```
    #[must_use]
    pub fn to_raw(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => render_float(*f),
            Value::String(s) => s.clone(),
        }
    }

    /// Parses `raw` as the most specific type it matches: integer, then float,
    /// then boolean under the default literals, else string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::Value;
    ///
    /// assert_eq!(Value::infer("42"), Value::Integer(42));
    /// assert_eq!(Value::infer("off"), Value::Bool(false));
    /// assert_eq!(Value::infer("1.5"), Value::Float(1.5));
    /// assert_eq!(Value::infer("localhost"), Value::String("localhost".into()));
    /// ```
    #[must_use]
    pub fn infer(raw: &str) -> Value {
        if let Ok(i) = parse_integer(raw) {
            return Value::Integer(i);
        }
        if let Ok(f) = parse_float(raw) {
            return Value::Float(f);
        }
        if let Ok(b) = parse_bool(raw, &BoolLiterals::default()) {
            return Value::Bool(b);
        }
        Value::String(raw.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

/// Shortest round-trip text of a float, with `.0` kept on integral values.
pub(crate) fn render_float<F: fmt::Display>(f: F) -> String {
    let mut text = f.to_string();
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        text.push_str(".0");
    }
    text
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Truthy and falsy words recognised by boolean coercion, compared
/// case-insensitively.
///
/// The defaults are `true`/`yes`/`1`/`on` and `false`/`no`/`0`/`off`.
///
/// # Examples
///
/// ```rust
/// use inidoc::BoolLiterals;
///
/// let strict = BoolLiterals::new(["true"], ["false"]);
/// assert_eq!(strict.parse("TRUE"), Some(true));
/// assert_eq!(strict.parse("yes"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoolLiterals {
    truthy: Vec<String>,
    falsy: Vec<String>,
}

impl BoolLiterals {
    pub fn new<T, F>(truthy: T, falsy: F) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        BoolLiterals {
            truthy: truthy.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
            falsy: falsy.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
        }
    }

    /// Matches `raw` against both sets; `None` when it is in neither.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<bool> {
        let lowered = raw.to_lowercase();
        if self.truthy.iter().any(|t| *t == lowered) {
            Some(true)
        } else if self.falsy.iter().any(|f| *f == lowered) {
            Some(false)
        } else {
            None
        }
    }

    pub fn truthy(&self) -> &[String] {
        &self.truthy
    }

    pub fn falsy(&self) -> &[String] {
        &self.falsy
    }
}

impl Default for BoolLiterals {
    fn default() -> Self {
        BoolLiterals::new(["true", "yes", "1", "on"], ["false", "no", "0", "off"])
    }
}

/// Coerces `raw` to a boolean using `literals`.
///
/// # Errors
///
/// Returns [`Error::TypeCoercion`] when `raw` is in neither literal set.
pub fn parse_bool(raw: &str, literals: &BoolLiterals) -> Result<bool> {
    literals
        .parse(raw)
        .ok_or_else(|| Error::type_coercion(raw, "boolean", "not a recognised boolean literal"))
}

/// Coerces `raw` to a signed 64-bit integer.
///
/// Accepts an optional `+`/`-` sign followed by decimal digits or a `0x`,
/// `0o` or `0b` prefixed number. No surrounding whitespace is allowed.
///
/// # Errors
///
/// Returns [`Error::TypeCoercion`] on empty input, stray characters or overflow.
///
/// # Examples
///
/// ```rust
/// use inidoc::value::parse_integer;
///
/// assert_eq!(parse_integer("-0b101").unwrap(), -5);
/// assert!(parse_integer("12abc").is_err());
/// assert!(parse_integer("9223372036854775808").is_err());
/// ```
pub fn parse_integer(raw: &str) -> Result<i64> {
    parse_integer_as(raw, "integer")
}

/// Parses the literal into its sign and magnitude, then narrows it to `T`.
fn parse_integer_as<T>(raw: &str, expected: &str) -> Result<T>
where
    T: TryFrom<u128> + TryFrom<i128>,
{
    let out_of_range = || Error::type_coercion(raw, expected, "out of range");
    let (negative, magnitude) = parse_sign_magnitude(raw, expected)?;

    if !negative {
        return <T as TryFrom<u128>>::try_from(magnitude).map_err(|_| out_of_range());
    }
    let signed = if magnitude == 1u128 << 127 {
        i128::MIN
    } else {
        i128::try_from(magnitude)
            .map(|m| -m)
            .map_err(|_| out_of_range())?
    };
    <T as TryFrom<i128>>::try_from(signed).map_err(|_| out_of_range())
}

fn parse_sign_magnitude(raw: &str, expected: &str) -> Result<(bool, u128)> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    if digits.is_empty() {
        return Err(Error::type_coercion(raw, expected, "no digits"));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_digit(radix)) {
        return Err(Error::type_coercion(
            raw,
            expected,
            &format!("invalid digit {bad:?}"),
        ));
    }

    let magnitude = u128::from_str_radix(digits, radix)
        .map_err(|_| Error::type_coercion(raw, expected, "out of range"))?;
    Ok((negative, magnitude))
}

/// Coerces `raw` to a 64-bit float.
///
/// The grammar is an optional sign, digits with an optional fractional part
/// (at least one digit overall), and an optional `e`/`E` exponent. Words like
/// `inf` or `nan` are rejected, and so is a number too large to be finite.
///
/// # Errors
///
/// Returns [`Error::TypeCoercion`] for text outside the grammar or out of the
/// `f64` range.
///
/// # Examples
///
/// ```rust
/// use inidoc::value::parse_float;
///
/// assert_eq!(parse_float("1.5e3").unwrap(), 1500.0);
/// assert_eq!(parse_float(".5").unwrap(), 0.5);
/// assert!(parse_float("nan").is_err());
/// assert!(parse_float("1e400").is_err());
/// ```
pub fn parse_float(raw: &str) -> Result<f64> {
    check_float_grammar(raw, "float")?;
    let value = raw
        .parse::<f64>()
        .map_err(|e| Error::type_coercion(raw, "float", &e.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::type_coercion(raw, "float", "out of range"))
    }
}

fn check_float_grammar(raw: &str, expected: &str) -> Result<()> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return Err(Error::type_coercion(raw, expected, "no digits"));
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return Err(Error::type_coercion(raw, expected, "empty exponent"));
        }
    }

    if i != bytes.len() {
        return Err(Error::type_coercion(
            raw,
            expected,
            "unexpected characters after number",
        ));
    }
    Ok(())
}

/// Types that can be coerced from a raw INI value.
///
/// Implemented for `bool`, all primitive integers, `f32`, `f64`, `char` and
/// `String`. Integer conversions fail on overflow of the target type.
///
/// # Examples
///
/// ```rust
/// use inidoc::{BoolLiterals, FromValue};
///
/// let literals = BoolLiterals::default();
/// assert_eq!(u8::from_raw("255", &literals).unwrap(), 255);
/// assert!(u8::from_raw("256", &literals).is_err());
/// ```
pub trait FromValue: Sized {
    /// Converts `raw`, using `literals` when the target is boolean.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeCoercion`] when `raw` does not fit `Self`.
    fn from_raw(raw: &str, literals: &BoolLiterals) -> Result<Self>;
}

impl FromValue for bool {
    fn from_raw(raw: &str, literals: &BoolLiterals) -> Result<Self> {
        parse_bool(raw, literals)
    }
}

macro_rules! impl_from_value_integer {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_raw(raw: &str, _literals: &BoolLiterals) -> Result<Self> {
                    parse_integer_as::<$t>(raw, $name)
                }
            }
        )*
    };
}

impl_from_value_integer!(
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
);

impl FromValue for f64 {
    fn from_raw(raw: &str, _literals: &BoolLiterals) -> Result<Self> {
        parse_float(raw)
    }
}

impl FromValue for f32 {
    fn from_raw(raw: &str, _literals: &BoolLiterals) -> Result<Self> {
        check_float_grammar(raw, "f32")?;
        let value = raw
            .parse::<f32>()
            .map_err(|e| Error::type_coercion(raw, "f32", &e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::type_coercion(raw, "f32", "out of range"))
        }
    }
}

impl FromValue for char {
    fn from_raw(raw: &str, _literals: &BoolLiterals) -> Result<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::type_coercion(raw, "char", "expected exactly one character")),
        }
    }
}

impl FromValue for String {
    fn from_raw(raw: &str, _literals: &BoolLiterals) -> Result<Self> {
        Ok(raw.to_string())
    }
}

impl FromValue for Value {
    fn from_raw(raw: &str, _literals: &BoolLiterals) -> Result<Self> {
        Ok(Value::infer(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_bases() {
        assert_eq!(parse_integer("42").unwrap(), 42);
        assert_eq!(parse_integer("+42").unwrap(), 42);
        assert_eq!(parse_integer("-42").unwrap(), -42);
        assert_eq!(parse_integer("0xff").unwrap(), 255);
        assert_eq!(parse_integer("0o17").unwrap(), 15);
        assert_eq!(parse_integer("0b1010").unwrap(), 10);
        assert_eq!(parse_integer("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn test_parse_integer_rejects() {
        for raw in ["", "-", "0x", "abc", " 1", "1 ", "1.0", "0xfg", "--1", "1_000"] {
            assert!(
                matches!(parse_integer(raw), Err(Error::TypeCoercion { .. })),
                "{raw:?} should not parse"
            );
        }
        assert!(parse_integer("9223372036854775808").is_err());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("3.25").unwrap(), 3.25);
        assert_eq!(parse_float("-1e-2").unwrap(), -0.01);
        assert_eq!(parse_float("5.").unwrap(), 5.0);
        assert_eq!(parse_float("7").unwrap(), 7.0);
        for raw in ["", ".", "e5", "1e", "inf", "NaN", "1.2.3", "1,5"] {
            assert!(parse_float(raw).is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn test_bool_literals_default() {
        let literals = BoolLiterals::default();
        for raw in ["true", "Yes", "1", "ON"] {
            assert!(parse_bool(raw, &literals).unwrap(), "{raw}");
        }
        for raw in ["false", "NO", "0", "off"] {
            assert!(!parse_bool(raw, &literals).unwrap(), "{raw}");
        }
        assert!(parse_bool("maybe", &literals).is_err());
    }

    #[test]
    fn test_from_value_overflow() {
        let literals = BoolLiterals::default();
        assert_eq!(i8::from_raw("-128", &literals).unwrap(), -128);
        assert!(i8::from_raw("128", &literals).is_err());
        assert!(u32::from_raw("-1", &literals).is_err());
        assert_eq!(
            u64::from_raw("18446744073709551615", &literals).unwrap(),
            u64::MAX
        );
        assert!(f32::from_raw("1e60", &literals).is_err());
    }

    #[test]
    fn test_from_value_full_width_integers() {
        let literals = BoolLiterals::default();
        assert_eq!(
            u128::from_raw("340282366920938463463374607431768211455", &literals).unwrap(),
            u128::MAX
        );
        assert_eq!(u128::from_raw(&u128::MAX.to_string(), &literals).unwrap(), u128::MAX);
        assert!(u128::from_raw("340282366920938463463374607431768211456", &literals).is_err());
        assert!(u128::from_raw("-1", &literals).is_err());
        assert_eq!(u128::from_raw("-0", &literals).unwrap(), 0);
        assert_eq!(i128::from_raw(&i128::MIN.to_string(), &literals).unwrap(), i128::MIN);
        assert!(i128::from_raw("170141183460469231731687303715884105728", &literals).is_err());
    }

    #[test]
    fn test_overflowing_floats_are_rejected() {
        assert!(matches!(
            parse_float("1e400"),
            Err(Error::TypeCoercion { ref reason, .. }) if reason == "out of range"
        ));
        assert!(parse_float("-1e400").is_err());
        assert_eq!(Value::infer("1e400"), Value::String("1e400".to_string()));
        assert!(f64::from_raw("1e400", &BoolLiterals::default()).is_err());
        assert_eq!(parse_float("1e308").unwrap(), 1e308);
    }

    #[test]
    fn test_render_float_keeps_fraction() {
        assert_eq!(Value::Float(1.0).to_raw(), "1.0");
        assert_eq!(Value::Float(-0.5).to_raw(), "-0.5");
        assert_eq!(Value::Float(1e-7).to_raw(), "0.0000001");
        assert_eq!(parse_float(&Value::Float(1e-7).to_raw()).unwrap(), 1e-7);
    }

    #[test]
    fn test_value_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7u8), Value::Integer(7));
        assert_eq!(Value::from(2.5f32), Value::Float(2.5));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
    }
}
