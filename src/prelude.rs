//! Assorted imports for downstream schema modules

pub use crate::error::ValidationError;
pub use crate::format::{signatures, Signature};
pub use crate::radix::{BasedInt, Radix};
pub use crate::template::{TemplateSpec, TemplateString};
pub use crate::validate::{RawInput, Validator};
