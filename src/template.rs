//! Placeholder-checked template strings
//!
//! A [`TemplateSpec`] is fixed once at schema-definition time and then
//! validates candidate strings by the replacement fields they contain.
//! Two modes exist and are never mixed: a required signature *set*
//! (order-insensitive, for named templates) or a required *count* of
//! bare anonymous `{}` placeholders. Successful validation returns the
//! input unchanged, wrapped as a [`TemplateString`].

use crate::format::{self, FormatError, Signature};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
#[cfg(feature = "serde_impls")]
use serde::Serialize;

/// Immutable validation spec for one template-string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSpec {
    /// The extracted signature set must equal this set exactly.
    Keys(BTreeSet<Signature>),
    /// The string must contain exactly this many placeholders, each a
    /// bare `{}`.
    Quantity(usize),
}

impl TemplateSpec {
    /// Spec requiring a single named key.
    pub fn key(key: impl Into<Signature>) -> Self {
        Self::Keys(BTreeSet::from([key.into()]))
    }

    /// Spec requiring an exact set of keys.
    ///
    /// An empty collection accepts exactly the strings with no
    /// placeholders at all, the same strings `quantity(0)` accepts.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Signature>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// Spec requiring `count` anonymous `{}` placeholders.
    #[must_use]
    pub const fn quantity(count: usize) -> Self {
        Self::Quantity(count)
    }

    /// Validates `raw` against this spec, returning it unchanged on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if `raw` is not lexable as a
    /// format string, and [`TemplateError::Mismatch`] when the extracted
    /// placeholders differ from the spec; the error carries both the
    /// expected and the actual side for message templating.
    pub fn validate_str(&self, raw: &str) -> Result<TemplateString, TemplateError> {
        let found = format::signatures(raw)?;
        match self {
            Self::Keys(expected) => {
                let actual: BTreeSet<Signature> = found.into_iter().collect();
                if *expected != actual {
                    return Err(TemplateError::Mismatch {
                        expected: Expectation::Keys(expected.clone()),
                        actual: Expectation::Keys(actual),
                    });
                }
            }
            Self::Quantity(count) => {
                if found.len() != *count {
                    return Err(TemplateError::Mismatch {
                        expected: Expectation::Count(*count),
                        actual: Expectation::Count(found.len()),
                    });
                }
                if found.iter().any(|sig| !sig.is_empty()) {
                    return Err(TemplateError::Mismatch {
                        expected: Expectation::Sequence(vec![
                            String::from("{}");
                            *count
                        ]),
                        actual: Expectation::Sequence(found),
                    });
                }
            }
        }
        Ok(TemplateString(raw.to_owned()))
    }
}

/// A string that passed placeholder validation.
///
/// The wrapped value is byte-for-byte the validated input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TemplateString(pub(crate) String);

impl TemplateString {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(feature = "serde_impls")]
impl Serialize for TemplateString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl Deref for TemplateString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for TemplateString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<TemplateString> for String {
    fn from(tmpl: TemplateString) -> Self {
        tmpl.0
    }
}

impl PartialEq<&str> for TemplateString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for TemplateString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One side of a [`TemplateError::Mismatch`] payload.
///
/// The shape depends on the validation mode: signature sets for key
/// validation, counts for a quantity miscount, and marker sequences for
/// quantity validation that found decorated placeholders. The sequence
/// of repeated `"{}"` markers on the expected side preserves the literal
/// payload shape of the original error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Keys(BTreeSet<Signature>),
    Count(usize),
    Sequence(Vec<Signature>),
}

impl Display for Expectation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keys(keys) => write!(f, "{keys:?}"),
            Self::Count(count) => write!(f, "{count}"),
            Self::Sequence(sigs) => write!(f, "{sigs:?}"),
        }
    }
}

/// Validation failure for a template-string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The extracted placeholders differ from the spec.
    Mismatch {
        expected: Expectation,
        actual: Expectation,
    },
    /// The candidate string is not a well-formed format string.
    Malformed(FormatError),
}

impl From<FormatError> for TemplateError {
    fn from(err: FormatError) -> Self {
        Self::Malformed(err)
    }
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch { expected, actual } => write!(
                f,
                "invalid template string, expected keys: {expected}, actual keys: {actual}"
            ),
            Self::Malformed(err) => {
                write!(f, "malformed template string: {err}")
            }
        }
    }
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mismatch { .. } => None,
            Self::Malformed(err) => Some(err),
        }
    }
}
