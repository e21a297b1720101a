//! The brat standoff line format.
//!
//! One record per line, fields separated by tabs. Text-bound records are
//!
//! ```text
//! T1	Person 0 4	John
//! T2	Place 10 15;20 26	New York
//! ```
//!
//! i.e. id, then type and `;`-separated `start end` pairs, then the covered
//! text. Every other record kind is kept verbatim.

use std::path::Path;

use restoa_core::{Annotation, AnnotationId, OtherAnnotation, Span, TextBoundAnnotation};

use crate::error::{StoreError, StoreResult};

/// Parses the content of an annotation file.
///
/// `path` is only used in error messages. Blank lines are ignored.
pub fn parse(content: &str, path: &Path) -> StoreResult<Vec<Annotation>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).map_err(|reason| StoreError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Annotation, String> {
    let line = line.trim_end_matches('\r');
    let id = line.split('\t').next().unwrap_or(line);

    let is_text_bound = id.starts_with(AnnotationId::TEXT_BOUND_TAG)
        && AnnotationId::parse(id).is_ok();
    if !is_text_bound {
        return Ok(Annotation::Other(OtherAnnotation {
            id: id.to_string(),
            line: line.to_string(),
        }));
    }

    let mut fields = line.splitn(3, '\t');
    let id = AnnotationId::parse(fields.next().unwrap_or_default()).map_err(|e| e.to_string())?;
    let type_and_offsets = fields
        .next()
        .ok_or_else(|| format!("{id} has no type and offsets field"))?;
    let text = fields.next().unwrap_or_default();

    let (label, offsets) = type_and_offsets
        .split_once(' ')
        .ok_or_else(|| format!("{id} has no offsets"))?;

    let spans = offsets
        .split(';')
        .map(|pair| parse_span(pair).ok_or_else(|| format!("{id} has malformed span {pair:?}")))
        .collect::<Result<Vec<_>, _>>()?;

    TextBoundAnnotation::new(id, spans, label, text)
        .map(Annotation::TextBound)
        .map_err(|e| e.to_string())
}

fn parse_span(pair: &str) -> Option<Span> {
    let mut numbers = pair.split_whitespace().map(str::parse::<usize>);
    let start = numbers.next()?.ok()?;
    let end = numbers.next()?.ok()?;
    if numbers.next().is_some() {
        return None;
    }
    Span::new(start, end).ok()
}

/// Renders records back into file content, one line each.
#[must_use]
pub fn serialize(annotations: &[Annotation]) -> String {
    let mut out = String::new();
    for annotation in annotations {
        match annotation {
            Annotation::TextBound(tb) => {
                let offsets: Vec<String> = tb
                    .spans()
                    .iter()
                    .map(|span| format!("{} {}", span.start, span.end))
                    .collect();
                let text = tb.text.replace(['\n', '\r'], " ");
                out.push_str(&format!(
                    "{}\t{} {}\t{}",
                    tb.id(),
                    tb.label,
                    offsets.join(";"),
                    text
                ));
            }
            Annotation::Other(other) => out.push_str(&other.line),
        }
        out.push('\n');
    }
    out
}
