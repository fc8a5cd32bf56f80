//! Labeled fields embedded in free-text remarks.
//!
//! Older recipe files often fold the yield and attribution into the notes:
//! `"Freezes well. Yield: 12 muffins. Source: Grandma."`. A label's value runs
//! from the label to the next label of the *other* kind, or to the end of the
//! text.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::util::{collapse_whitespace, fold};

static LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(yield|source)\s*:").expect("remarks label pattern is valid")
});

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Label {
    Yield,
    Source,
}

/// The result of [`extract()`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub remarks: Option<String>,
    pub yields: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug)]
struct Span {
    label: Label,
    whole: Range<usize>,
    value: Range<usize>,
}

fn spans(text: &str) -> Vec<Span> {
    let labels: Vec<_> = LABEL.captures_iter(text)
        .filter_map(|caps| {
            let (whole, name) = (caps.get(0)?, caps.get(1)?);
            let label = match name.as_str().eq_ignore_ascii_case("yield") {
                true => Label::Yield,
                false => Label::Source,
            };

            Some((label, whole.start(), whole.end()))
        })
        .collect();

    labels.iter()
        .enumerate()
        .map(|(i, &(label, start, value_start))| {
            let end = labels[i + 1..].iter()
                .find(|(other, ..)| *other != label)
                .map_or(text.len(), |&(_, other_start, _)| other_start);

            Span { label, whole: start..end, value: value_start..end }
        })
        .collect()
}

/// Pulls `Yield:` and/or `Source:` values out of `remarks`.
///
/// Only the labels asked for are extracted. Every span of an extracted label
/// is removed from the remarks; the residual is whitespace-collapsed and
/// `None` if nothing remains.
pub fn extract(remarks: &str, want_yield: bool, want_source: bool) -> Extracted {
    let spans = spans(remarks);
    let value_of = |label: Label| spans.iter()
        .filter(|span| span.label == label)
        .map(|span| remarks[span.value.clone()].trim())
        .find(|value| !value.is_empty())
        .map(String::from);

    let yields = want_yield.then(|| value_of(Label::Yield)).flatten();
    let source = want_source.then(|| value_of(Label::Source)).flatten();

    let removed = |label: Label| match label {
        Label::Yield => yields.is_some(),
        Label::Source => source.is_some(),
    };

    let mut residual = String::with_capacity(remarks.len());
    let mut cursor = 0;
    for span in spans.iter().filter(|span| removed(span.label)) {
        if span.whole.start >= cursor {
            residual.push_str(&remarks[cursor..span.whole.start]);
        }

        cursor = cursor.max(span.whole.end);
    }

    residual.push_str(&remarks[cursor.min(remarks.len())..]);
    let residual = match yields.is_some() || source.is_some() {
        true => collapse_whitespace(&residual),
        false => residual.trim().to_string(),
    };

    Extracted {
        remarks: (!residual.is_empty()).then_some(residual),
        yields,
        source,
    }
}

/// Drops a trailing repetition of `title` from `remarks`.
pub fn trim_trailing_title(remarks: &str, title: &str) -> Option<String> {
    let title = title.trim();
    let remarks = remarks.trim();
    if title.is_empty() || remarks.len() < title.len() {
        return Some(remarks.to_string()).filter(|r| !r.is_empty());
    }

    let split = remarks.len() - title.len();
    let trimmed = match remarks.is_char_boundary(split) {
        true if fold(&remarks[split..]) == fold(title) => remarks[..split].trim_end(),
        _ => remarks,
    };

    Some(trimmed.to_string()).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_labels() {
        let e = extract("Some note. Yield: 12 muffins. Source: Grandma.", true, true);
        assert_eq!(e.yields.as_deref(), Some("12 muffins."));
        assert_eq!(e.source.as_deref(), Some("Grandma."));
        assert_eq!(e.remarks.as_deref(), Some("Some note."));
    }

    #[test]
    fn source_before_yield() {
        let e = extract("source: The Joy of Cooking\nYIELD: 2 loaves", true, true);
        assert_eq!(e.source.as_deref(), Some("The Joy of Cooking"));
        assert_eq!(e.yields.as_deref(), Some("2 loaves"));
        assert_eq!(e.remarks, None);
    }

    #[test]
    fn only_requested_labels_are_removed() {
        let e = extract("Good cold. Yield: 4 Source: Aunt May", false, true);
        assert_eq!(e.yields, None);
        assert_eq!(e.source.as_deref(), Some("Aunt May"));
        assert_eq!(e.remarks.as_deref(), Some("Good cold. Yield: 4"));

        let e = extract("Good cold. Yield: 4 Source: Aunt May", false, false);
        assert_eq!(e.remarks.as_deref(), Some("Good cold. Yield: 4 Source: Aunt May"));
    }

    #[test]
    fn repeated_labels_stay_inside_the_first_value() {
        let e = extract("Yield: 6. Yield: really 6", true, false);
        assert_eq!(e.yields.as_deref(), Some("6. Yield: really 6"));
        assert_eq!(e.remarks, None);
    }

    #[test]
    fn empty_values_are_not_extracted() {
        let e = extract("Yield:   Source: Mom", true, true);
        assert_eq!(e.yields, None);
        assert_eq!(e.source.as_deref(), Some("Mom"));
        assert_eq!(e.remarks.as_deref(), Some("Yield:"));
    }

    #[test]
    fn words_containing_labels_are_ignored() {
        let e = extract("Outsource: nothing here", true, true);
        assert_eq!(e.source, None);
        assert_eq!(e.remarks.as_deref(), Some("Outsource: nothing here"));
    }

    #[test]
    fn trailing_title() {
        assert_eq!(trim_trailing_title("Best served warm. Apple Pie", "apple pie").as_deref(),
            Some("Best served warm."));
        assert_eq!(trim_trailing_title("Apple Pie", "Apple Pie"), None);
        assert_eq!(trim_trailing_title("Pie", "Apple Pie").as_deref(), Some("Pie"));
        assert_eq!(trim_trailing_title("Crème brûlée", "ée").as_deref(), Some("Crème brûl"));
    }
}
