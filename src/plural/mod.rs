//! Plural formula engine
//!
//! Lexes, parses and evaluates the C-like `plural=` expression of a catalog's
//! `Plural-Forms` header, samples which counts land in which bucket, and turns
//! those samples into column labels for translators.

pub mod buckets;
pub mod evaluator;
pub mod header;
pub mod hints;
pub mod parser;
pub mod tokenizer;

pub use buckets::{
    buckets_for_header, enumerate_buckets, PluralBucket, DEFAULT_MAX_N, DEFAULT_SAMPLE_SIZE,
};
pub use evaluator::{evaluate, Bindings, Formula, Value};
pub use header::{parse_nplurals, PluralForms};
pub use hints::{default_hints, format_hint, generic_hints, plural_hints, plural_hints_up_to};
