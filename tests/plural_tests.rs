//! Plural formula engine tests
//!
//! Real-world `Plural-Forms` formulas evaluated over ranges of counts, plus
//! the bucket enumeration and column labels derived from them.

use pox_convert::error::{FormulaError, PoxError};
use pox_convert::plural::{
    buckets_for_header, enumerate_buckets, evaluate, plural_hints, Formula, PluralBucket, Value,
};
use pretty_assertions::assert_eq;

const RUSSIAN: &str =
    "n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2";
const LATVIAN: &str = "n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2";
const SLOVENIAN: &str = "n%100==1 ? 0 : n%100==2 ? 1 : n%100==3 || n%100==4 ? 2 : 3";
const ARABIC: &str = "n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5";

fn bucket_of(formula: &Formula, n: i64) -> i64 {
    formula.evaluate(n).unwrap().as_int()
}

// ═══════════════════════════════════════════════════════════════════════════
// EVALUATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_not_equal_one_is_false_only_for_one() {
    for n in -50..500 {
        assert_eq!(
            evaluate("n != 1", n).unwrap(),
            Value::Bool(n != 1),
            "n = {}",
            n
        );
    }
}

#[test]
fn test_nested_ternary() {
    let formula = Formula::parse("(n == 1) ? 0 : (n == 2) ? 1 : 2").unwrap();
    for n in 0..200 {
        let expected = match n {
            1 => 0,
            2 => 1,
            _ => 2,
        };
        assert_eq!(bucket_of(&formula, n), expected, "n = {}", n);
    }
}

#[test]
fn test_division_and_modulo() {
    assert_eq!(evaluate("n / 2", 7).unwrap(), Value::Int(3));
    assert_eq!(evaluate("n % 10", 11).unwrap(), Value::Int(1));
    assert_eq!(evaluate("n % 100", 1234).unwrap(), Value::Int(34));
}

#[test]
fn test_russian() {
    let formula = Formula::parse(RUSSIAN).unwrap();
    for (n, expected) in [
        (1, 0),
        (21, 0),
        (101, 0),
        (2, 1),
        (4, 1),
        (22, 1),
        (0, 2),
        (5, 2),
        (11, 2),
        (12, 2),
        (14, 2),
        (111, 2),
    ] {
        assert_eq!(bucket_of(&formula, n), expected, "n = {}", n);
    }
}

#[test]
fn test_latvian() {
    let formula = Formula::parse(LATVIAN).unwrap();
    assert_eq!(bucket_of(&formula, 0), 2);
    assert_eq!(bucket_of(&formula, 1), 0);
    assert_eq!(bucket_of(&formula, 11), 1);
    assert_eq!(bucket_of(&formula, 21), 0);
    assert_eq!(bucket_of(&formula, 2), 1);
}

#[test]
fn test_slovenian() {
    let formula = Formula::parse(SLOVENIAN).unwrap();
    for (n, expected) in [(1, 0), (101, 0), (2, 1), (102, 1), (3, 2), (4, 2), (5, 3), (0, 3)] {
        assert_eq!(bucket_of(&formula, n), expected, "n = {}", n);
    }
}

#[test]
fn test_arabic_covers_all_six_forms() {
    let buckets = enumerate_buckets(ARABIC, 6, 200, 3).unwrap();
    assert_eq!(buckets.len(), 6);
    assert!(buckets.iter().all(|b| !b.sample_values.is_empty()));
    assert_eq!(buckets[3].sample_values, vec![3, 4, 5]);
    assert_eq!(buckets[4].sample_values, vec![11, 12, 13]);
}

// ═══════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_undefined_variable_is_an_error() {
    let err = evaluate("x != 1", 1).unwrap_err();
    assert!(matches!(
        err,
        FormulaError::InvalidCharacter { ch: 'x', .. } | FormulaError::UndefinedVariable(_)
    ));
}

#[test]
fn test_empty_formula_is_an_error() {
    assert!(matches!(
        evaluate("", 1),
        Err(FormulaError::InvalidSyntax { .. })
    ));
    assert!(evaluate("   ", 1).is_err());
}

#[test]
fn test_dangling_operator_is_an_error() {
    assert!(matches!(
        evaluate("n ==", 1),
        Err(FormulaError::InvalidSyntax { .. })
    ));
    assert!(matches!(
        evaluate("(n", 1),
        Err(FormulaError::InvalidSyntax { .. })
    ));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(evaluate("n / 0", 3), Err(FormulaError::DivisionByZero));
    assert_eq!(evaluate("n % (n - n)", 3), Err(FormulaError::DivisionByZero));
}

// ═══════════════════════════════════════════════════════════════════════════
// BUCKETS AND HINTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_three_bucket_enumeration() {
    let buckets = enumerate_buckets("n==1 ? 0 : n==2 ? 1 : 2", 3, 6, 5).unwrap();
    assert_eq!(
        buckets,
        vec![
            PluralBucket {
                index: 0,
                sample_values: vec![1],
                truncated: false,
            },
            PluralBucket {
                index: 1,
                sample_values: vec![2],
                truncated: false,
            },
            PluralBucket {
                index: 2,
                sample_values: vec![0, 3, 4, 5, 6],
                truncated: false,
            },
        ]
    );
}

#[test]
fn test_enumeration_truncates_beyond_sample() {
    let buckets = enumerate_buckets("n==1 ? 0 : n==2 ? 1 : 2", 3, 7, 5).unwrap();
    assert_eq!(buckets[2].sample_values, vec![0, 3, 4, 5, 6]);
    assert!(buckets[2].truncated);
}

#[test]
fn test_buckets_for_header_requires_nplurals() {
    assert!(matches!(
        buckets_for_header("plural=n != 1;", 10, 5),
        Err(PoxError::MissingHeader(_))
    ));
}

#[test]
fn test_hints_for_russian_header() {
    let header = format!("nplurals=3; plural=({});", RUSSIAN);
    let hints = plural_hints(Some(&header));
    assert_eq!(hints.len(), 3);
    assert_eq!(hints[&0], "Singular, n = 1, 21, ...");
    assert_eq!(hints[&1], "Plural, n = 2-4, 22-24, ...");
    assert_eq!(hints[&2], "Plural, n = 0, 5-9, ...");
}

#[test]
fn test_hints_fall_back_when_formula_is_broken() {
    let hints = plural_hints(Some("nplurals=3; plural=n ?? 1;"));
    assert_eq!(
        hints.values().cloned().collect::<Vec<_>>(),
        vec!["Plural Form 1", "Plural Form 2", "Plural Form 3"]
    );
}

#[test]
fn test_hints_default_without_header() {
    let hints = plural_hints(None);
    assert_eq!(hints[&0], "Singular");
    assert_eq!(hints[&1], "Plural");
}
