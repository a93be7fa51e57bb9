//! Pipeline-facing error type
//!
//! Leaf-specific failures are defined next to the types that raise them
//! ([`TemplateError`] in [`template`](crate::template), [`NumeralError`]
//! and the definition-time [`RadixError`](crate::radix::RadixError) in
//! [`radix`](crate::radix)). This module defines the sum the validation
//! pipeline sees, with `From` lifts from each leaf error. All variants
//! are recoverable value errors; the definition-time `RadixError` is
//! deliberately excluded, as it must fail loudly when a schema is built
//! rather than travel inside a validation report.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use crate::format::FormatError;
pub use crate::radix::{NumeralError, RadixError};
pub use crate::template::TemplateError;

/// Any validation failure a leaf type can report to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Template-string validation failed.
    Template(TemplateError),
    /// Numeral parsing failed under the declared radix.
    Numeral(NumeralError),
}

impl From<TemplateError> for ValidationError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

impl From<NumeralError> for ValidationError {
    fn from(err: NumeralError) -> Self {
        Self::Numeral(err)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template(err) => Display::fmt(err, f),
            Self::Numeral(err) => Display::fmt(err, f),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            Self::Numeral(err) => Some(err),
        }
    }
}
