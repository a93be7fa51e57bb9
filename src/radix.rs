//! Radix-tagged integers
//!
//! A [`Radix`] fixes the numeric base of one based-integer field at
//! schema-definition time: 0 selects prefix-driven auto-detection and
//! any value in `2..=36` selects that base outright. Radixes live in a
//! process-wide table built once on first touch, so requesting the same
//! base twice yields the identical `&'static` handle and parametrized
//! declarations can be compared by identity.
//!
//! Parsing follows the lexical rules of a standard integer literal:
//! optional surrounding ASCII whitespace, optional sign, an optional
//! `0x`/`0o`/`0b` prefix consistent with the base (or selecting it under
//! auto-detection), digits of the radix, and single underscores between
//! digits. Values are unbounded, carried as [`BigInt`].

use lazy_static::lazy_static;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter, Write};
#[cfg(feature = "serde_impls")]
use serde::Serialize;

/// Textual notation used when rendering a value back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Notation {
    Binary,
    Octal,
    LowerHex,
    /// Plain decimal digits, the fallback for every base without a
    /// dedicated prefixed form (10 itself, auto-detection, and all
    /// remaining bases).
    Plain,
}

impl Notation {
    const fn of_base(base: u8) -> Self {
        match base {
            2 => Self::Binary,
            8 => Self::Octal,
            16 => Self::LowerHex,
            _ => Self::Plain,
        }
    }
}

lazy_static! {
    /// Slot 0 holds the auto-detect radix, slot `b - 1` the radix for
    /// base `b` in `2..=36`. Built eagerly over the whole finite domain
    /// and read-only thereafter.
    static ref RADIXES: [Radix; 36] = core::array::from_fn(|slot| {
        let base = if slot == 0 { 0 } else { slot as u8 + 1 };
        Radix {
            base,
            notation: Notation::of_base(base),
        }
    });
}

/// The base of one based-integer field.
///
/// Values are only handed out as `&'static` references into the radix
/// table; there is no public constructor, so a based value cannot exist
/// without a concrete radix behind it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Radix {
    base: u8,
    notation: Notation,
}

impl Radix {
    /// Looks up the radix for `base`.
    ///
    /// Repeated lookups with the same base return the identical handle.
    ///
    /// # Errors
    ///
    /// Returns [`RadixError::OutOfRange`] unless `base` is 0 or in
    /// `2..=36`. This is a definition-time failure and never reaches
    /// input validation.
    pub fn new(base: u32) -> Result<&'static Radix, RadixError> {
        match base {
            0 => Ok(&RADIXES[0]),
            2..=36 => Ok(&RADIXES[base as usize - 1]),
            _ => Err(RadixError::OutOfRange { base }),
        }
    }

    /// Resolves an optional schema declaration, rejecting declarations
    /// that were left abstract.
    ///
    /// # Errors
    ///
    /// Returns [`RadixError::MustBeConcrete`] for `None`, otherwise
    /// behaves as [`Radix::new`].
    pub fn from_spec(base: Option<u32>) -> Result<&'static Radix, RadixError> {
        match base {
            Some(base) => Self::new(base),
            None => Err(RadixError::MustBeConcrete),
        }
    }

    /// Prefix-driven auto-detection (base 0).
    #[must_use]
    pub fn auto() -> &'static Radix {
        &RADIXES[0]
    }

    #[must_use]
    pub fn binary() -> &'static Radix {
        &RADIXES[1]
    }

    #[must_use]
    pub fn octal() -> &'static Radix {
        &RADIXES[7]
    }

    #[must_use]
    pub fn decimal() -> &'static Radix {
        &RADIXES[9]
    }

    #[must_use]
    pub fn hexadecimal() -> &'static Radix {
        &RADIXES[15]
    }

    /// The declared base: 0 for auto-detection, otherwise 2 to 36.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base as u32
    }

    #[must_use]
    pub const fn is_auto(&self) -> bool {
        self.base == 0
    }

    /// Wraps an already-numeric value under this radix, no parsing.
    pub fn of<V: Into<BigInt>>(&'static self, value: V) -> BasedInt {
        BasedInt {
            radix: self,
            val: value.into(),
        }
    }

    /// Parses a numeral string under this radix.
    ///
    /// # Errors
    ///
    /// Returns a [`NumeralError`] describing the offending literal when
    /// `literal` is empty, carries a digit invalid in the radix, or has
    /// a malformed prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fieldkit::radix::Radix;
    /// let fifteen = Radix::hexadecimal().parse("0xf").unwrap();
    /// assert_eq!(fifteen, Radix::auto().parse("15").unwrap());
    /// ```
    pub fn parse(&'static self, literal: &str) -> Result<BasedInt, NumeralError> {
        Ok(BasedInt {
            radix: self,
            val: lex_numeral(self.base, literal)?,
        })
    }
}

impl Display for Radix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_auto() {
            write!(f, "auto-detected base")
        } else {
            write!(f, "base {}", self.base)
        }
    }
}

/// Definition-time failure while parametrizing a based-integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadixError {
    /// The requested base falls outside the valid domain.
    OutOfRange { base: u32 },
    /// A declaration was left abstract instead of naming a base.
    MustBeConcrete,
}

impl Display for RadixError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { base } => write!(
                f,
                "radix base must be >= 2 and <= 36, or 0 for auto-detection (got {base})"
            ),
            Self::MustBeConcrete => {
                write!(f, "based-integer declaration must be concrete")
            }
        }
    }
}

impl Error for RadixError {}

/// Failure to parse a numeral string under a declared radix.
///
/// Each variant carries the offending literal (surrounding whitespace
/// already stripped) for error-message templating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumeralError {
    /// No digits where digits were required: an empty or whitespace-only
    /// string, a bare sign, or a prefix with nothing after it.
    Empty { literal: String },
    /// A character invalid as a digit of the effective base, including a
    /// misplaced underscore.
    InvalidDigit {
        digit: char,
        base: u32,
        literal: String,
    },
    /// A leading zero on a non-zero numeral under auto-detection, where
    /// it would be read as a radix prefix.
    MalformedPrefix { literal: String },
}

impl Display for NumeralError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { literal } => {
                write!(f, "numeral `{literal}` contains no digits")
            }
            Self::InvalidDigit {
                digit,
                base,
                literal,
            } => write!(
                f,
                "invalid digit {digit:?} for base {base} in numeral `{literal}`"
            ),
            Self::MalformedPrefix { literal } => write!(
                f,
                "numeral `{literal}` has a leading zero, which is ambiguous under base auto-detection"
            ),
        }
    }
}

impl Error for NumeralError {}

/// Lexer state between characters of the digit body.
#[derive(Clone, Copy, PartialEq, Eq)]
enum DigitState {
    /// Before the first digit, underscores not yet allowed.
    Start,
    /// Directly after a radix prefix, where one underscore is allowed.
    Prefix,
    Digit,
    Underscore,
}

/// Strips a case-insensitive `0<marker>` radix prefix, returning the
/// digit body that follows it.
fn strip_radix_prefix(unsigned: &str, marker: u8) -> Option<&str> {
    let rest = unsigned.get(2..)?;
    let head = unsigned.as_bytes();
    (head[0] == b'0' && head[1].eq_ignore_ascii_case(&marker)).then_some(rest)
}

fn lex_numeral(declared: u8, literal: &str) -> Result<BigInt, NumeralError> {
    let body = literal.trim_matches(|c: char| c.is_ascii_whitespace());

    let (sign, unsigned) = match body.as_bytes().first() {
        Some(b'+') => (Sign::Plus, &body[1..]),
        Some(b'-') => (Sign::Minus, &body[1..]),
        _ => (Sign::Plus, body),
    };

    // Resolve the effective base and strip a prefix when one applies.
    let (base, digits, auto_decimal) = match declared {
        0 => {
            if let Some(rest) = strip_radix_prefix(unsigned, b'x') {
                (16u32, rest, false)
            } else if let Some(rest) = strip_radix_prefix(unsigned, b'o') {
                (8, rest, false)
            } else if let Some(rest) = strip_radix_prefix(unsigned, b'b') {
                (2, rest, false)
            } else {
                (10, unsigned, true)
            }
        }
        16 => match strip_radix_prefix(unsigned, b'x') {
            Some(rest) => (16, rest, false),
            None => (16, unsigned, false),
        },
        8 => match strip_radix_prefix(unsigned, b'o') {
            Some(rest) => (8, rest, false),
            None => (8, unsigned, false),
        },
        2 => match strip_radix_prefix(unsigned, b'b') {
            Some(rest) => (2, rest, false),
            None => (2, unsigned, false),
        },
        other => (other as u32, unsigned, false),
    };
    let prefixed = digits.len() != unsigned.len();

    let mut values: Vec<u8> = Vec::with_capacity(digits.len());
    let mut state = if prefixed {
        DigitState::Prefix
    } else {
        DigitState::Start
    };
    for c in digits.chars() {
        if c == '_' {
            match state {
                DigitState::Digit | DigitState::Prefix => {
                    state = DigitState::Underscore;
                    continue;
                }
                _ => {
                    return Err(NumeralError::InvalidDigit {
                        digit: '_',
                        base,
                        literal: body.to_owned(),
                    })
                }
            }
        }
        match c.to_digit(base) {
            Some(value) => {
                values.push(value as u8);
                state = DigitState::Digit;
            }
            None => {
                return Err(NumeralError::InvalidDigit {
                    digit: c,
                    base,
                    literal: body.to_owned(),
                })
            }
        }
    }

    if values.is_empty() {
        return Err(NumeralError::Empty {
            literal: body.to_owned(),
        });
    }
    if state == DigitState::Underscore {
        return Err(NumeralError::InvalidDigit {
            digit: '_',
            base,
            literal: body.to_owned(),
        });
    }
    // Under auto-detection a leading zero on a non-zero numeral would
    // read as the start of a radix prefix.
    if auto_decimal && values[0] == 0 && values.iter().any(|&v| v != 0) {
        return Err(NumeralError::MalformedPrefix {
            literal: body.to_owned(),
        });
    }

    let magnitude = match BigUint::from_radix_be(&values, base) {
        Some(magnitude) => magnitude,
        None => unreachable!("digit values are validated against the radix"),
    };
    Ok(BigInt::from_biguint(sign, magnitude))
}

/// An unbounded integer tagged with the radix it was declared under.
///
/// Equality, ordering, and hashing consider only the numeric value, so
/// the same number parsed under different radixes compares equal.
#[derive(Clone)]
pub struct BasedInt {
    radix: &'static Radix,
    val: BigInt,
}

impl BasedInt {
    #[must_use]
    pub fn radix(&self) -> &'static Radix {
        self.radix
    }

    #[must_use]
    pub const fn as_inner(&self) -> &BigInt {
        &self.val
    }

    #[must_use]
    pub fn into_inner(self) -> BigInt {
        self.val
    }

    /// Renders the value in the notation of its radix.
    ///
    /// Base 2, 8, and 16 render with their `0b`/`0o`/`0x` prefixes (hex
    /// in lowercase), the sign ahead of the prefix; every other base
    /// renders as plain decimal digits.
    #[must_use]
    pub fn to_base_string(&self) -> String {
        let mut out = String::with_capacity(self.rendered_len_hint());
        match write!(&mut out, "{}", self) {
            Ok(_) => (),
            Err(_) => unreachable!("write to String should never fail"),
        };
        out
    }

    /// Upper bound on the length of [`to_base_string`](Self::to_base_string),
    /// used to size the render buffer in one allocation.
    #[must_use]
    pub fn rendered_len_hint(&self) -> usize {
        let bits = self.val.bits().max(1) as usize;
        let (digits, prefix) = match self.radix.notation {
            Notation::Binary => (bits, 2),
            Notation::Octal => (Integer::div_ceil(&bits, &3), 2),
            Notation::LowerHex => (Integer::div_ceil(&bits, &4), 2),
            Notation::Plain => (bits / 3 + 1, 0),
        };
        digits + prefix + usize::from(self.val.sign() == Sign::Minus)
    }
}

impl Display for BasedInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.radix.notation {
            Notation::Binary => write!(f, "{:#b}", self.val),
            Notation::Octal => write!(f, "{:#o}", self.val),
            Notation::LowerHex => write!(f, "{:#x}", self.val),
            Notation::Plain => Display::fmt(&self.val, f),
        }
    }
}

impl Debug for BasedInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BasedInt({} @ {})", self, self.radix)
    }
}

#[cfg(feature = "serde_impls")]
impl Serialize for BasedInt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base_string())
    }
}

impl PartialEq for BasedInt {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl Eq for BasedInt {}

impl PartialOrd for BasedInt {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BasedInt {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.val.cmp(&other.val)
    }
}

impl std::hash::Hash for BasedInt {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.val.hash(state);
    }
}

impl PartialEq<BigInt> for BasedInt {
    fn eq(&self, other: &BigInt) -> bool {
        self.val == *other
    }
}

impl From<BasedInt> for BigInt {
    fn from(val: BasedInt) -> Self {
        val.val
    }
}

macro_rules! impl_int_coerce {
    ($src:ty) => {
        impl TryFrom<BasedInt> for $src {
            type Error = <$src as TryFrom<BigInt>>::Error;

            fn try_from(val: BasedInt) -> Result<$src, Self::Error> {
                <$src as TryFrom<BigInt>>::try_from(val.val)
            }
        }
    };
}

impl_int_coerce!(i8);
impl_int_coerce!(i16);
impl_int_coerce!(i32);
impl_int_coerce!(i64);

impl_int_coerce!(u8);
impl_int_coerce!(u16);
impl_int_coerce!(u32);
impl_int_coerce!(u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn check_parse<const N: usize>(radix: &'static Radix, table: [(&'static str, i64); N]) {
        for (literal, expected) in table {
            let parsed = radix.parse(literal).unwrap();
            assert_eq!(parsed, BigInt::from(expected), "{radix} on {literal:?}");
        }
    }

    fn check_rejects<const N: usize>(radix: &'static Radix, table: [&'static str; N]) {
        for literal in table {
            assert!(
                radix.parse(literal).is_err(),
                "{radix} accepted {literal:?}"
            );
        }
    }

    #[test]
    fn radix_table_identity() {
        for base in (2..=36).chain([0]) {
            let first = Radix::new(base).unwrap();
            let second = Radix::new(base).unwrap();
            assert!(std::ptr::eq(first, second), "two handles for base {base}");
        }
        assert!(std::ptr::eq(Radix::hexadecimal(), Radix::new(16).unwrap()));
        assert!(std::ptr::eq(Radix::auto(), Radix::new(0).unwrap()));
        assert!(!std::ptr::eq(Radix::binary(), Radix::octal()));
    }

    #[test]
    fn invalid_bases_fail_at_definition() {
        for base in [1, 37, 100] {
            assert_eq!(Radix::new(base), Err(RadixError::OutOfRange { base }));
        }
        assert_eq!(
            Radix::new(37).unwrap_err().to_string(),
            "radix base must be >= 2 and <= 36, or 0 for auto-detection (got 37)"
        );
    }

    #[test]
    fn abstract_declarations_are_rejected() {
        assert_eq!(Radix::from_spec(None), Err(RadixError::MustBeConcrete));
        assert_eq!(
            Radix::from_spec(None).unwrap_err().to_string(),
            "based-integer declaration must be concrete"
        );
        assert!(std::ptr::eq(
            Radix::from_spec(Some(16)).unwrap(),
            Radix::hexadecimal()
        ));
    }

    #[test]
    fn hexadecimal_parsing() {
        check_parse(
            Radix::hexadecimal(),
            [
                ("0xf", 15),
                ("f", 15),
                ("a", 10),
                ("0XFF", 255),
                ("0x_ff", 255),
                ("-0xff", -255),
                ("  0x10  ", 16),
                ("0b1", 0xb1),
            ],
        );
        check_rejects(Radix::hexadecimal(), ["", "0x", "xyz", "0x1__2", "_1", "1_"]);
    }

    #[test]
    fn auto_detection() {
        check_parse(
            Radix::auto(),
            [
                ("0b101", 5),
                ("0o17", 15),
                ("0xf", 15),
                ("12", 12),
                ("+0b101", 5),
                ("-0o10", -8),
                ("0", 0),
                ("000", 0),
                ("0_0", 0),
                ("1_000", 1000),
            ],
        );
        check_rejects(Radix::auto(), ["012", "09", "0x", "0b", "ff"]);
        assert_eq!(
            Radix::auto().parse("012"),
            Err(NumeralError::MalformedPrefix {
                literal: String::from("012"),
            })
        );
    }

    #[test]
    fn fixed_base_edges() {
        check_parse(Radix::binary(), [("0b101", 5), ("101", 5), ("0B1", 1)]);
        check_parse(Radix::octal(), [("0o17", 15), ("17", 15)]);
        check_parse(Radix::decimal(), [("1_000", 1000), ("012", 12), ("-42", -42)]);
        check_parse(Radix::new(36).unwrap(), [("zz", 1295), ("Z", 35)]);
        check_rejects(Radix::binary(), ["2", "0x1"]);
        check_rejects(Radix::octal(), ["8", "0x1"]);
    }

    #[test]
    fn digit_error_payload() {
        assert_eq!(
            Radix::hexadecimal().parse("0xfg"),
            Err(NumeralError::InvalidDigit {
                digit: 'g',
                base: 16,
                literal: String::from("0xfg"),
            })
        );
        assert_eq!(
            Radix::hexadecimal().parse("").unwrap_err(),
            NumeralError::Empty {
                literal: String::new(),
            }
        );
    }

    #[test]
    fn rendering() {
        const CASES: [(u32, i64, &str); 8] = [
            (2, 5, "0b101"),
            (8, 15, "0o17"),
            (10, 255, "255"),
            (16, 15, "0xf"),
            (16, 255, "0xff"),
            (16, -255, "-0xff"),
            (36, 1295, "1295"),
            (0, 5, "5"),
        ];
        for (base, value, rendered) in CASES {
            let val = Radix::new(base).unwrap().of(value);
            assert_eq!(val.to_base_string(), rendered);
            assert_eq!(val.to_string(), rendered);
        }
    }

    #[test]
    fn parse_then_render() {
        let val = Radix::hexadecimal().parse("0xf").unwrap();
        assert_eq!(val.to_base_string(), "0xf");
        let auto = Radix::auto().parse("0b101").unwrap();
        assert_eq!(auto, BigInt::from(5));
        assert_eq!(auto.to_base_string(), "5");
    }

    #[test]
    fn render_hint_covers_output() {
        for (base, value) in [(2u32, 0i64), (2, -1024), (8, 511), (16, 65535), (10, -999), (36, 1295)] {
            let val = Radix::new(base).unwrap().of(value);
            assert!(
                val.to_base_string().len() <= val.rendered_len_hint(),
                "hint too small for {val:?}"
            );
        }
    }

    #[test]
    fn equality_ignores_radix() {
        let hex = Radix::hexadecimal().parse("0xa").unwrap();
        let dec = Radix::decimal().of(10);
        assert_eq!(hex, dec);
        assert_eq!(hex, BigInt::from(10));
        assert_eq!(i64::try_from(hex).unwrap(), 10);
    }

    #[test]
    fn sign_handling() {
        check_parse(
            Radix::auto(),
            [("-0", 0), ("+12", 12), ("-12", -12)],
        );
        assert_eq!(Radix::auto().of(-8).to_base_string(), "-8");
        assert_eq!(Radix::binary().of(-2).to_base_string(), "-0b10");
    }
}
