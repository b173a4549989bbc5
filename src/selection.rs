/*!
 * Range selection over a class catalog.
 *
 * The user answers the numbered catalog listing with either a single class
 * number ("3") or an inclusive span ("1-100"). Parsing is strict: anything
 * that is not a positive in-bounds number or a strictly increasing pair is
 * rejected with a message quoting the valid range, and the run aborts.
 */

use std::collections::HashSet;

use crate::catalog::LabelCatalog;
use crate::errors::SelectionError;
use crate::manifest::ManifestRow;

/// Inclusive 1-based span of catalog positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpan {
    /// First selected catalog position
    pub from: usize,
    /// Last selected catalog position
    pub to: usize,
}

impl RangeSpan {
    /// Number of catalog entries covered by the span
    pub fn entry_count(&self) -> usize {
        self.to - self.from + 1
    }
}

/// Concrete subset of manifest rows resolved from a user range
#[derive(Debug, Clone)]
pub struct Selection {
    /// The catalog span the user asked for
    pub span: RangeSpan,
    /// Labels of the selected catalog entries, in catalog order
    pub labels: Vec<String>,
    /// The manifest rows to process, in file order
    pub rows: Vec<ManifestRow>,
}

/// Parse a user-supplied range over a catalog of `catalog_len` entries.
///
/// Whitespace is stripped anywhere in the input. A single number selects one
/// entry; `a-b` selects the inclusive span and requires `a < b` strictly, so
/// "1-1" is rejected the same as "5-2".
pub fn parse_span(input: &str, catalog_len: usize) -> Result<RangeSpan, SelectionError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    let invalid = || SelectionError::InvalidRange {
        input: cleaned.clone(),
        catalog_len,
    };

    let segments: Vec<&str> = cleaned.split('-').collect();

    match segments.as_slice() {
        [single] => {
            let n: usize = single.parse().map_err(|_| invalid())?;
            if n < 1 || n > catalog_len {
                return Err(invalid());
            }
            Ok(RangeSpan { from: n, to: n })
        }
        [first, second] => {
            let a: usize = first.parse().map_err(|_| invalid())?;
            let b: usize = second.parse().map_err(|_| invalid())?;
            if a < 1 || b < 1 || a >= b || a > catalog_len || b > catalog_len {
                return Err(invalid());
            }
            Ok(RangeSpan { from: a, to: b })
        }
        _ => Err(invalid()),
    }
}

/// Resolve a user range against the catalog and the full row sequence.
///
/// Positional catalogs resolve to the contiguous row window spanned by the
/// chosen ranges. Frequency catalogs carry no positions, so the chosen labels
/// are collected and the full row sequence is filtered by membership.
pub fn select(
    catalog: &LabelCatalog,
    rows: &[ManifestRow],
    input: &str,
) -> Result<Selection, SelectionError> {
    let span = parse_span(input, catalog.len())?;

    match catalog {
        LabelCatalog::Positional(ranges) => {
            let chosen = &ranges[span.from - 1..span.to];
            let labels: Vec<String> = chosen.iter().map(|r| r.label.clone()).collect();

            let window_start = chosen[0].start_index;
            let window_end = chosen[chosen.len() - 1].end_index + 1;
            let rows = rows[window_start..window_end].to_vec();

            Ok(Selection { span, labels, rows })
        }
        LabelCatalog::Frequency(counts) => {
            let chosen = &counts[span.from - 1..span.to];
            let labels: Vec<String> = chosen.iter().map(|c| c.label.clone()).collect();

            let wanted: HashSet<&str> = labels.iter().map(|l| l.as_str()).collect();
            let rows = rows
                .iter()
                .filter(|row| wanted.contains(row.label.as_str()))
                .cloned()
                .collect();

            Ok(Selection { span, labels, rows })
        }
    }
}
