//! Human readable labels for plural buckets
//!
//! A bucket sampled as `[2, 3, 4, 22, 23, 24]` with more values beyond the
//! sample becomes `"Plural, n = 2-4, 22-24, ..."`.

use super::buckets::{enumerate_buckets, PluralBucket, DEFAULT_MAX_N};
use super::header::{parse_nplurals, PluralForms};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Sample size used for labels, enough to show two runs of three
pub const HINT_SAMPLE_SIZE: usize = 6;

const MAX_RANGES: usize = 2;

/// Collapse a bucket sample into a label
pub fn format_hint(bucket: &PluralBucket) -> String {
    if bucket.sample_values.is_empty() {
        return generic_label(bucket.index);
    }

    let ranges = collapse_ranges(&bucket.sample_values);
    let more = ranges.len() > MAX_RANGES || bucket.truncated;
    let shown: Vec<String> = ranges.into_iter().take(MAX_RANGES).collect();

    let prefix = if bucket.sample_values.contains(&1) {
        "Singular"
    } else {
        "Plural"
    };

    format!(
        "{}, n = {}{}",
        prefix,
        shown.join(", "),
        if more { ", ..." } else { "" }
    )
}

/// Labels for every declared plural form of a catalog.
///
/// Degrades instead of failing: a malformed formula yields
/// `"Plural Form {i}"` labels, a missing header or `nplurals` yields the
/// two-form `Singular`/`Plural` default.
pub fn plural_hints(plural_forms: Option<&str>) -> BTreeMap<usize, String> {
    plural_hints_up_to(plural_forms, DEFAULT_MAX_N)
}

/// [`plural_hints`] sampling counts `0..=max_n`
pub fn plural_hints_up_to(plural_forms: Option<&str>, max_n: i64) -> BTreeMap<usize, String> {
    let Some(header) = plural_forms.filter(|h| !h.trim().is_empty()) else {
        debug!("No Plural-Forms header, using singular/plural hints");
        return default_hints();
    };

    let Some(nplurals) = parse_nplurals(header) else {
        warn!("Plural-Forms header {:?} has no usable nplurals", header);
        return default_hints();
    };

    let buckets = PluralForms::parse(header).map_err(|e| e.to_string()).and_then(|forms| {
        enumerate_buckets(&forms.expression, nplurals, max_n, HINT_SAMPLE_SIZE)
            .map_err(|e| e.to_string())
    });

    match buckets {
        Ok(buckets) => buckets
            .iter()
            .filter(|bucket| bucket.index < nplurals)
            .map(|bucket| (bucket.index, format_hint(bucket)))
            .collect(),
        Err(reason) => {
            warn!(
                "Cannot sample plural formula in {:?} ({}), using generic hints",
                header, reason
            );
            generic_hints(nplurals)
        }
    }
}

/// `{0: "Singular", 1: "Plural"}`
pub fn default_hints() -> BTreeMap<usize, String> {
    BTreeMap::from([(0, "Singular".to_string()), (1, "Plural".to_string())])
}

pub fn generic_hints(nplurals: usize) -> BTreeMap<usize, String> {
    (0..nplurals).map(|i| (i, generic_label(i))).collect()
}

pub fn generic_label(index: usize) -> String {
    format!("Plural Form {}", index + 1)
}

/// `[0, 2, 3, 4, 7]` -> `["0", "2-4", "7"]`
fn collapse_ranges(values: &[i64]) -> Vec<String> {
    let mut ranges = Vec::new();
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return ranges;
    };

    let (mut start, mut end) = (first, first);
    for value in iter {
        if value == end + 1 {
            end = value;
        } else {
            ranges.push(render_range(start, end));
            start = value;
            end = value;
        }
    }
    ranges.push(render_range(start, end));

    ranges
}

fn render_range(start: i64, end: i64) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}
