//! Seam between the leaf types and the surrounding validation pipeline
//!
//! The pipeline decodes untrusted input into loosely-typed values before
//! any leaf type sees them; [`RawInput`] models that handoff. Each leaf
//! spec implements [`Validator`], turning a raw value into its validated
//! form or a [`ValidationError`] for the pipeline's failure report.

use crate::error::ValidationError;
use crate::radix::{BasedInt, Radix};
use crate::template::{TemplateSpec, TemplateString};
use num_bigint::BigInt;
use std::fmt::{Display, Formatter};

/// A raw value as handed over by the pipeline, typically a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    Str(String),
    Int(BigInt),
}

impl Display for RawInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => Display::fmt(s, f),
            Self::Int(i) => Display::fmt(i, f),
        }
    }
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<BigInt> for RawInput {
    fn from(i: BigInt) -> Self {
        Self::Int(i)
    }
}

impl From<i64> for RawInput {
    fn from(i: i64) -> Self {
        Self::Int(BigInt::from(i))
    }
}

/// One leaf validation step: raw input in, validated value or error out.
pub trait Validator {
    type Output;

    /// # Errors
    ///
    /// Returns a [`ValidationError`] carrying the leaf-specific failure
    /// when `raw` does not satisfy this spec.
    fn validate(&self, raw: &RawInput) -> Result<Self::Output, ValidationError>;
}

impl Validator for TemplateSpec {
    type Output = TemplateString;

    /// Template validation works on the stringified form of the input,
    /// so integer inputs validate via their decimal rendering.
    fn validate(&self, raw: &RawInput) -> Result<TemplateString, ValidationError> {
        match raw {
            RawInput::Str(s) => Ok(self.validate_str(s)?),
            RawInput::Int(i) => Ok(self.validate_str(&i.to_string())?),
        }
    }
}

impl Validator for &'static Radix {
    type Output = BasedInt;

    /// Integer inputs wrap directly; string inputs parse under the
    /// declared base.
    fn validate(&self, raw: &RawInput) -> Result<BasedInt, ValidationError> {
        match raw {
            RawInput::Int(i) => Ok(self.of(i.clone())),
            RawInput::Str(s) => Ok(self.parse(s)?),
        }
    }
}
