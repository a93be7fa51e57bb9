//! Lexer for curly-brace format strings
//!
//! # Background
//!
//! The template-string leaf type defined in [`template`](crate::template)
//! validates candidate strings by the replacement fields they contain,
//! not by the literal text around them. That requires reproducing the
//! "new-style" formatting mini-language precisely: fields are delimited
//! by `{` and `}`, a field name may carry an attribute/index path, a
//! `!`-introduced single-character conversion may follow the name, and a
//! `:`-introduced format spec runs to the matching close brace and may
//! itself contain nested replacement fields. Doubled braces (`{{`, `}}`)
//! are escapes and belong to the literal text.
//!
//! No standard-library facility exposes this grammar, so this module
//! implements it as a small dedicated lexer. It is the one genuinely
//! reusable unit of the crate and is deliberately independent of the
//! validation layer built on top of it.
//!
//! # Signatures
//!
//! Downstream validation does not care about literal text at all; it
//! compares *signatures*, the textual rendering of one replacement field:
//! the field name, then `!c` when a conversion is present, then `:spec`
//! when the spec text is non-empty. A bare `{}` renders as the empty
//! signature. [`signatures`] produces the ordered signature sequence of
//! an entire source string, descending into format specs so that nested
//! replacement fields are extracted in their own right rather than being
//! swallowed as opaque spec text.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Textual rendering of a single replacement field.
///
/// The empty string is the signature of a bare `{}` placeholder.
pub type Signature = String;

/// One replacement field, borrowed from the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Field name, possibly empty, possibly carrying an attribute or
    /// index path (`user.name`, `row[0]`).
    pub name: &'a str,
    /// Conversion character following `!`, if present.
    pub conversion: Option<char>,
    /// Raw format-spec text following `:`, if present. Nested braces are
    /// kept verbatim.
    pub spec: Option<&'a str>,
}

impl<'a> Placeholder<'a> {
    /// Renders this field as a [`Signature`].
    ///
    /// An empty format spec (as in `"{x:}"`) is omitted from the
    /// rendering, matching the reference formatter's treatment of the
    /// two forms as equivalent.
    #[must_use]
    pub fn signature(&self) -> Signature {
        let mut sig = String::with_capacity(
            self.name.len() + self.spec.map_or(0, str::len) + 4,
        );
        sig.push_str(self.name);
        if let Some(conv) = self.conversion {
            sig.push('!');
            sig.push(conv);
        }
        match self.spec {
            Some(spec) if !spec.is_empty() => {
                sig.push(':');
                sig.push_str(spec);
            }
            _ => {}
        }
        sig
    }

    /// Returns `true` if this field is a bare `{}` with no name,
    /// conversion, or spec text.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.name.is_empty()
            && self.conversion.is_none()
            && self.spec.map_or(true, str::is_empty)
    }
}

/// Lexical errors over the format-string grammar.
///
/// Messages follow the diagnostics of the reference formatter so that
/// failures read the same to users migrating templates between stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// A `}` in literal text with no preceding `{` and no `}}` escape.
    SingleCloseBrace,
    /// A `{` as the final character of the source.
    SingleOpenBrace,
    /// A field opened by `{` ran to end of string without closing.
    UnterminatedField,
    /// A `{` inside a field name.
    NameBrace,
    /// The source ended directly after a `!`.
    MissingConversion,
    /// The character after a conversion was neither `:` nor `}`.
    ExpectedColon,
    /// A format spec ran to end of string with unbalanced braces.
    UnmatchedSpecBrace,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleCloseBrace => {
                write!(f, "single '}}' encountered in format string")
            }
            Self::SingleOpenBrace => {
                write!(f, "single '{{' encountered in format string")
            }
            Self::UnterminatedField => {
                write!(f, "expected '}}' before end of string")
            }
            Self::NameBrace => write!(f, "unexpected '{{' in field name"),
            Self::MissingConversion => {
                write!(f, "end of string while looking for conversion specifier")
            }
            Self::ExpectedColon => {
                write!(f, "expected ':' after conversion specifier")
            }
            Self::UnmatchedSpecBrace => {
                write!(f, "unmatched '{{' in format spec")
            }
        }
    }
}

impl Error for FormatError {}

/// Lazy iterator over the replacement fields of a source string.
///
/// Literal text segments, including `{{`/`}}` escapes, are consumed and
/// discarded. The iterator fuses after yielding an error.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    src: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Placeholders<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            done: false,
        }
    }

    /// Scans past literal text to the start of the next field body.
    ///
    /// Returns `Ok(false)` when the source is exhausted without another
    /// field, `Ok(true)` when `self.pos` rests on the first character
    /// after an opening `{`.
    fn skip_literal(&mut self) -> Result<bool, FormatError> {
        loop {
            let rest = &self.src[self.pos..];
            let Some(at) = rest.find(|c| c == '{' || c == '}') else {
                self.pos = self.src.len();
                return Ok(false);
            };
            let brace = rest.as_bytes()[at];
            let after = self.pos + at + 1;
            if self.src.as_bytes().get(after) == Some(&brace) {
                // escaped brace, part of the literal run
                self.pos = after + 1;
                continue;
            }
            if brace == b'}' {
                return Err(FormatError::SingleCloseBrace);
            }
            if after >= self.src.len() {
                return Err(FormatError::SingleOpenBrace);
            }
            self.pos = after;
            return Ok(true);
        }
    }

    /// Lexes one field body starting at `self.pos`, leaving `self.pos`
    /// just past the closing `}`.
    fn field(&mut self) -> Result<Placeholder<'a>, FormatError> {
        let src = self.src;
        let start = self.pos;

        // The name runs to the first top-level '!', ':' or '}'. An index
        // segment '[..]' is skipped verbatim, so markers inside it do not
        // terminate the name.
        let mut iter = src[start..].char_indices();
        let (name_end, terminator) = loop {
            let Some((at, c)) = iter.next() else {
                return Err(FormatError::UnterminatedField);
            };
            match c {
                '{' => return Err(FormatError::NameBrace),
                '[' => loop {
                    match iter.next() {
                        Some((_, ']')) => break,
                        Some(_) => continue,
                        None => return Err(FormatError::UnterminatedField),
                    }
                },
                '}' | ':' | '!' => break (start + at, c),
                _ => {}
            }
        };
        let name = &src[start..name_end];
        let mut cursor = name_end + 1;

        let mut conversion = None;
        if terminator == '!' {
            let Some(conv) = src[cursor..].chars().next() else {
                return Err(FormatError::MissingConversion);
            };
            conversion = Some(conv);
            cursor += conv.len_utf8();
            match src[cursor..].chars().next() {
                Some('}') => {
                    self.pos = cursor + 1;
                    return Ok(Placeholder {
                        name,
                        conversion,
                        spec: None,
                    });
                }
                Some(':') => cursor += 1,
                Some(_) => return Err(FormatError::ExpectedColon),
                // The reference parser falls through to an empty spec
                // scan here and reports the unbalanced brace.
                None => return Err(FormatError::UnmatchedSpecBrace),
            }
        } else if terminator == '}' {
            self.pos = cursor;
            return Ok(Placeholder {
                name,
                conversion: None,
                spec: None,
            });
        }

        // Format spec: runs to the matching '}' with brace-depth
        // tracking, so nested replacement fields stay inside the spec.
        let spec_start = cursor;
        let mut depth = 1usize;
        for (at, c) in src[spec_start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = spec_start + at + 1;
                        return Ok(Placeholder {
                            name,
                            conversion,
                            spec: Some(&src[spec_start..spec_start + at]),
                        });
                    }
                }
                _ => {}
            }
        }
        Err(FormatError::UnmatchedSpecBrace)
    }
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Result<Placeholder<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.skip_literal() {
            Ok(false) => {
                self.done = true;
                None
            }
            Ok(true) => match self.field() {
                Ok(ph) => Some(Ok(ph)),
                Err(e) => {
                    self.done = true;
                    Some(Err(e))
                }
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Extracts the ordered signature sequence of every replacement field in
/// `src`.
///
/// A field whose spec contains nested replacement fields contributes its
/// own signature first, then one signature per nested field in source
/// order. Nested fields are never treated as literal text.
///
/// # Errors
///
/// Returns the first [`FormatError`] encountered, if `src` is not a
/// well-formed format string.
///
/// # Examples
///
/// ```
/// # use fieldkit::format::signatures;
/// let sigs = signatures("dear {name!r}, balance {amount:{width}}").unwrap();
/// assert_eq!(sigs, vec!["name!r", "amount:{width}", "width"]);
/// ```
pub fn signatures(src: &str) -> Result<Vec<Signature>, FormatError> {
    let mut out = Vec::new();
    collect(src, &mut out)?;
    Ok(out)
}

fn collect(src: &str, out: &mut Vec<Signature>) -> Result<(), FormatError> {
    for item in Placeholders::new(src) {
        let ph = item?;
        out.push(ph.signature());
        if let Some(spec) = ph.spec {
            if spec.contains('{') {
                collect(spec, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_sigs<const N: usize>(table: [(&'static str, &'static [&'static str]); N]) {
        for (src, expected) in table {
            let actual = signatures(src).unwrap();
            assert_eq!(actual, *expected, "signatures of {src:?}");
        }
    }

    #[test]
    fn literal_only() {
        check_sigs([
            ("", &[]),
            ("plain text", &[]),
            ("{{}}", &[]),
            ("a {{escaped}} brace", &[]),
        ]);
    }

    #[test]
    fn simple_fields() {
        check_sigs([
            ("f{key}b", &["key"]),
            ("{}", &[""]),
            ("foo{}bar", &[""]),
            ("{}{}", &["", ""]),
            ("{:20}", &[":20"]),
            ("{!r}", &["!r"]),
            ("{x:}", &["x"]),
        ]);
    }

    #[test]
    fn conversions_and_specs() {
        check_sigs([
            ("f{key!r}{k}b", &["key!r", "k"]),
            (
                "foo{key.__class__!r:20}{key}bar{key}",
                &["key.__class__!r:20", "key", "key"],
            ),
            ("{a[0]:d}", &["a[0]:d"]),
            ("{a[x:y]}", &["a[x:y]"]),
            ("{a!r:>{w}}", &["a!r:>{w}", "w"]),
        ]);
    }

    #[test]
    fn nested_specs_are_extracted() {
        check_sigs([
            ("{a:{b}}", &["a:{b}", "b"]),
            ("{a:{b}{c}}", &["a:{b}{c}", "b", "c"]),
            ("{v:{w!s:{d}}}", &["v:{w!s:{d}}", "w!s:{d}", "d"]),
        ]);
    }

    #[test]
    fn placeholder_shape() {
        let all: Vec<_> = Placeholders::new("x{a.b!r:<{w}}y{}")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            all,
            vec![
                Placeholder {
                    name: "a.b",
                    conversion: Some('r'),
                    spec: Some("<{w}"),
                },
                Placeholder {
                    name: "",
                    conversion: None,
                    spec: None,
                },
            ]
        );
        assert!(!all[0].is_bare());
        assert!(all[1].is_bare());
    }

    #[test]
    fn malformed_sources() {
        const CASES: [(&str, FormatError); 9] = [
            ("foo}", FormatError::SingleCloseBrace),
            ("{a:b}c}d", FormatError::SingleCloseBrace),
            ("foo{", FormatError::SingleOpenBrace),
            ("{a", FormatError::UnterminatedField),
            ("{a[0}", FormatError::UnterminatedField),
            ("{a{b}", FormatError::NameBrace),
            ("{a!", FormatError::MissingConversion),
            ("{a!rx}", FormatError::ExpectedColon),
            ("{a:{b}", FormatError::UnmatchedSpecBrace),
        ];
        for (src, expected) in CASES {
            assert_eq!(signatures(src), Err(expected), "lexing {src:?}");
        }
    }

    #[test]
    fn conversion_at_end_of_string() {
        // the spec scan starts empty and immediately reports imbalance
        assert_eq!(signatures("{a!r"), Err(FormatError::UnmatchedSpecBrace));
    }

    #[test]
    fn fused_after_error() {
        let mut it = Placeholders::new("{a}}");
        assert_eq!(
            it.next(),
            Some(Ok(Placeholder {
                name: "a",
                conversion: None,
                spec: None,
            }))
        );
        assert_eq!(it.next(), Some(Err(FormatError::SingleCloseBrace)));
        assert_eq!(it.next(), None);
    }
}
