//! Validated leaf types for schema-driven input validation
//!
//! # Overview
//!
//! This library supplies two leaf value types to a surrounding
//! data-validation pipeline: a placeholder-checked template string and a
//! radix-tagged integer. Neither type is a system of its own. Both are
//! stateless validators that a pipeline invokes while decoding untrusted
//! input into a structured record, handing back either a validated value
//! or a structured error whose payload carries everything an error
//! message needs.
//!
//! The [`template`] module validates that a candidate string contains an
//! expected set of formatting placeholders, or an expected count of bare
//! anonymous ones. The placeholder grammar itself lives in [`format`], a
//! small dedicated lexer for the "new-style" curly-brace mini-language,
//! and is usable on its own.
//!
//! The [`radix`] module parses and renders integers under a numeric base
//! fixed at schema-definition time: 2 through 36, or 0 for prefix-driven
//! auto-detection. Base descriptors are memoized in a process-wide table
//! so that parametrizing twice with the same base yields the identical
//! handle.
//!
//! # Background
//!
//! Validation frameworks commonly let a schema field name a refined
//! type, with the refinement checked at decode time rather than encoded
//! in the host language's type system. The two refinements here cover a
//! pair of recurring schema needs that stock string and integer fields
//! cannot express: message templates that must keep an exact placeholder
//! contract (so that later formatting cannot fail), and integer fields
//! whose wire form is written in a non-decimal base. Both are fixed once
//! when the schema is defined and immutable for the life of the process.
//!
//! The seam to the pipeline is the [`Validator`] trait in [`validate`]:
//! raw decoded input in, validated value or [`ValidationError`] out.

pub mod error;
pub mod format;
pub mod prelude;
pub mod radix;
pub mod template;
pub mod validate;

pub use crate::error::ValidationError;
pub use crate::format::{signatures, FormatError, Placeholder, Placeholders, Signature};
pub use crate::radix::{BasedInt, NumeralError, Radix, RadixError};
pub use crate::template::{Expectation, TemplateError, TemplateSpec, TemplateString};
pub use crate::validate::{RawInput, Validator};
