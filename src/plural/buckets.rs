//! Grouping of counts into plural buckets

use super::evaluator::Formula;
use super::header::PluralForms;
use crate::error::{FormulaError, PoxResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Largest count evaluated when sampling a formula
pub const DEFAULT_MAX_N: i64 = 999;

/// Values kept per bucket by default
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// One plural form and a sample of the counts that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluralBucket {
    pub index: usize,
    /// Ascending, deduplicated
    pub sample_values: Vec<i64>,
    /// More counts select this bucket than `sample_values` holds
    pub truncated: bool,
}

/// Evaluate `formula` for every count in `0..=max_n` and group the counts by
/// the bucket they select.
///
/// Every index in `0..nplurals` gets an entry even when no count reaches it.
/// Indices the formula produces beyond `nplurals` are reported as well.
pub fn enumerate_buckets(
    formula: &str,
    nplurals: usize,
    max_n: i64,
    sample_size: usize,
) -> Result<Vec<PluralBucket>, FormulaError> {
    let formula = Formula::parse(formula)?;

    let mut groups: BTreeMap<usize, Vec<i64>> = (0..nplurals).map(|i| (i, Vec::new())).collect();
    for n in 0..=max_n {
        let value = formula.evaluate(n)?.as_int();
        let index = usize::try_from(value).map_err(|_| FormulaError::InvalidBucket(value))?;
        groups.entry(index).or_default().push(n);
    }

    Ok(groups
        .into_iter()
        .map(|(index, values)| PluralBucket {
            index,
            truncated: values.len() > sample_size,
            sample_values: values.into_iter().take(sample_size).collect(),
        })
        .collect())
}

/// Bucket enumeration straight from a `Plural-Forms` header
pub fn buckets_for_header(
    header: &str,
    max_n: i64,
    sample_size: usize,
) -> PoxResult<Vec<PluralBucket>> {
    let forms = PluralForms::parse(header)?;
    Ok(enumerate_buckets(
        &forms.expression,
        forms.nplurals,
        max_n,
        sample_size,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoxError;

    const THREE_FORMS: &str = "n==1 ? 0 : n==2 ? 1 : 2";

    fn bucket(index: usize, sample_values: Vec<i64>, truncated: bool) -> PluralBucket {
        PluralBucket {
            index,
            sample_values,
            truncated,
        }
    }

    #[test]
    fn test_three_forms_small_range() {
        let buckets = enumerate_buckets(THREE_FORMS, 3, 6, 5).unwrap();
        assert_eq!(
            buckets,
            vec![
                bucket(0, vec![1], false),
                bucket(1, vec![2], false),
                bucket(2, vec![0, 3, 4, 5, 6], false),
            ]
        );
    }

    #[test]
    fn test_three_forms_default_range_truncates() {
        let buckets = enumerate_buckets(THREE_FORMS, 3, DEFAULT_MAX_N, DEFAULT_SAMPLE_SIZE).unwrap();
        assert_eq!(buckets[2], bucket(2, vec![0, 3, 4, 5, 6], true));
    }

    #[test]
    fn test_unreached_bucket_is_present_and_empty() {
        let buckets = enumerate_buckets("0", 2, 10, 5).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1], bucket(1, vec![], false));
    }

    #[test]
    fn test_boolean_formula_selects_buckets() {
        let buckets = enumerate_buckets("n != 1", 2, 3, 5).unwrap();
        assert_eq!(
            buckets,
            vec![bucket(0, vec![1], false), bucket(1, vec![0, 2, 3], false)]
        );
    }

    #[test]
    fn test_index_beyond_nplurals_is_reported() {
        let buckets = enumerate_buckets("n", 1, 2, 5).unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2], bucket(2, vec![2], false));
    }

    #[test]
    fn test_negative_index_is_an_error() {
        assert_eq!(
            enumerate_buckets("0 - 1", 2, 2, 5),
            Err(FormulaError::InvalidBucket(-1))
        );
    }

    #[test]
    fn test_formula_error_propagates() {
        assert!(matches!(
            enumerate_buckets("x", 2, 2, 5),
            Err(FormulaError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_buckets_for_header() {
        let buckets = buckets_for_header(
            "Plural-Forms: nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;",
            DEFAULT_MAX_N,
            DEFAULT_SAMPLE_SIZE,
        )
        .unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0], bucket(0, vec![1], false));
        assert_eq!(buckets[1], bucket(1, vec![2], false));
        assert!(buckets[2].truncated);
    }

    #[test]
    fn test_buckets_for_header_without_expression() {
        assert!(matches!(
            buckets_for_header("nplurals=2;", DEFAULT_MAX_N, DEFAULT_SAMPLE_SIZE),
            Err(PoxError::MissingHeader(_))
        ));
    }
}
