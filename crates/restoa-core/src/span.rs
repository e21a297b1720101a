//! Character spans and the `char=` fragment codec.
//!
//! OA targets address a range of a document with a URL fragment of the form
//! `char=n0,n1,n2,n3,...`. Consecutive integers pair up into `(start, end)`
//! spans, so `char=0,4,10,12` is the two spans `0..4` and `10..12`.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Fragment key for character offsets.
pub const CHAR_KEY: &str = "char";

/// A half-open range of character offsets, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Creates a span, rejecting empty and inverted ranges.
    pub fn new(start: usize, end: usize) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::MalformedSpanFormat(format!(
                "span {start},{end} is empty or inverted"
            )));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

/// Decodes a `char=n0,n1,...` fragment into ordered spans.
///
/// Fails when there is no `=`, the integer count is zero or odd, a token is
/// not an unsigned integer, or a pair is degenerate.
pub fn decode(fragment: &str) -> CoreResult<Vec<Span>> {
    let (_, list) = fragment.split_once('=').ok_or_else(|| {
        CoreError::MalformedSpanFormat(format!("expected `{CHAR_KEY}=...`, got {fragment:?}"))
    })?;

    let offsets = list
        .split(',')
        .map(|token| {
            token.trim().parse::<usize>().map_err(|_| {
                CoreError::MalformedSpanFormat(format!("{token:?} is not a character offset"))
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    if offsets.is_empty() || offsets.len() % 2 != 0 {
        return Err(CoreError::MalformedSpanFormat(format!(
            "expected an even, non-zero number of offsets, got {}",
            offsets.len()
        )));
    }

    offsets
        .chunks_exact(2)
        .map(|pair| Span::new(pair[0], pair[1]))
        .collect()
}

/// Encodes spans back into a `char=` fragment.
#[must_use]
pub fn encode(spans: &[Span]) -> String {
    let offsets: Vec<String> = spans.iter().map(Span::to_string).collect();
    format!("{CHAR_KEY}={}", offsets.join(","))
}
