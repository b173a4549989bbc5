/*!
 * Class catalog construction from manifest rows.
 *
 * Two grouping strategies exist historically. The frequency strategy counts
 * occurrences per unique label and orders labels naturally; it is the default
 * because it tolerates labels that reappear non-contiguously. The positional
 * strategy is the legacy single-pass grouping into contiguous index ranges
 * and assumes the manifest is pre-sorted by label.
 */

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::app_config::GroupingStrategy;
use crate::manifest::ManifestRow;

/// Contiguous run of manifest rows sharing one label.
/// Indices are 0-based into the row sequence and inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRange {
    /// Class label shared by every row in the range
    pub label: String,
    /// Index of the first row of the run
    pub start_index: usize,
    /// Index of the last row of the run
    pub end_index: usize,
}

/// Occurrence count for one unique label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    /// Class label
    pub label: String,
    /// Number of manifest rows carrying this label
    pub count: usize,
}

/// Ordered catalog of the classes available in a manifest.
///
/// Entries are addressed by 1-based position, matching the numbered listing
/// shown to the user and the range syntax they type back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCatalog {
    /// Legacy contiguous-range entries, ordered by first occurrence
    Positional(Vec<LabelRange>),
    /// Per-label counts, naturally sorted by label
    Frequency(Vec<LabelCount>),
}

impl LabelCatalog {
    /// Build a catalog from the full row sequence using the given strategy
    pub fn build(rows: &[ManifestRow], strategy: GroupingStrategy) -> Self {
        match strategy {
            GroupingStrategy::Positional => Self::Positional(group_positional(rows)),
            GroupingStrategy::Frequency => Self::Frequency(group_frequency(rows)),
        }
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(ranges) => ranges.len(),
            Self::Frequency(counts) => counts.len(),
        }
    }

    /// True when the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label of the entry at the given 1-based position
    pub fn label_at(&self, position: usize) -> Option<&str> {
        match self {
            Self::Positional(ranges) => ranges.get(position - 1).map(|r| r.label.as_str()),
            Self::Frequency(counts) => counts.get(position - 1).map(|c| c.label.as_str()),
        }
    }

    /// Numbered `(position, label, row count)` listing for display
    pub fn listing(&self) -> Vec<(usize, &str, usize)> {
        match self {
            Self::Positional(ranges) => ranges
                .iter()
                .enumerate()
                .map(|(i, r)| (i + 1, r.label.as_str(), r.end_index - r.start_index + 1))
                .collect(),
            Self::Frequency(counts) => counts
                .iter()
                .enumerate()
                .map(|(i, c)| (i + 1, c.label.as_str(), c.count))
                .collect(),
        }
    }
}

/// Single left-to-right pass closing a range whenever the label changes.
///
/// The first row's "previous" label is itself, so a single-row sequence
/// yields exactly one range over index 0. A label that reappears after a
/// different one produces a second, separate entry; callers that assume one
/// entry per label must defend against that themselves.
pub fn group_positional(rows: &[ManifestRow]) -> Vec<LabelRange> {
    let mut ranges = Vec::new();

    if rows.is_empty() {
        return ranges;
    }

    let mut start_index = 0;
    for index in 1..rows.len() {
        if rows[index].label != rows[index - 1].label {
            ranges.push(LabelRange {
                label: rows[index - 1].label.clone(),
                start_index,
                end_index: index - 1,
            });
            start_index = index;
        }
    }

    // Close the final open range
    ranges.push(LabelRange {
        label: rows[rows.len() - 1].label.clone(),
        start_index,
        end_index: rows.len() - 1,
    });

    ranges
}

/// Count rows per unique label, then natural-sort the labels.
/// Contiguity does not matter; positional information is not retained.
pub fn group_frequency(rows: &[ManifestRow]) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.label.as_str()).or_insert(0) += 1;
    }

    let mut entries: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label: label.to_string(), count })
        .collect();
    entries.sort_by(|a, b| natural_cmp(&a.label, &b.label));

    entries
}

/// Compare two strings treating embedded digit runs by numeric value,
/// so "class2" orders before "class10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    while i < a_bytes.len() && j < b_bytes.len() {
        let ac = a_bytes[i];
        let bc = b_bytes[j];

        if ac.is_ascii_digit() && bc.is_ascii_digit() {
            let a_run = digit_run(a_bytes, i);
            let b_run = digit_run(b_bytes, j);
            match cmp_digit_runs(&a_bytes[i..a_run], &b_bytes[j..b_run]) {
                Ordering::Equal => {
                    i = a_run;
                    j = b_run;
                }
                ord => return ord,
            }
        } else {
            match ac.cmp(&bc) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ord => return ord,
            }
        }
    }

    (a_bytes.len() - i).cmp(&(b_bytes.len() - j))
}

/// End index (exclusive) of the digit run starting at `from`
fn digit_run(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

/// Compare two digit runs by numeric value without overflowing:
/// strip leading zeros, then longer run wins, then byte order decides.
/// Ties on value fall back to raw length so "01" and "1" stay ordered.
fn cmp_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a_trim = strip_leading_zeros(a);
    let b_trim = strip_leading_zeros(b);

    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());
    &digits[first..]
}
