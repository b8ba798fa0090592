//! `Plural-Forms` header parsing
//!
//! ```text
//! Plural-Forms: nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;
//! ```

use crate::error::{PoxError, PoxResult};
use std::fmt;

const HEADER_PREFIX: &str = "Plural-Forms:";

/// The two parts of a `Plural-Forms` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    /// Number of plural buckets declared by the catalog
    pub nplurals: usize,
    /// The `plural=` sub-expression, untouched
    pub expression: String,
}

impl PluralForms {
    /// Parse a header value, with or without the `Plural-Forms:` prefix
    pub fn parse(header: &str) -> PoxResult<Self> {
        let nplurals = parse_nplurals(header).ok_or_else(|| {
            PoxError::MissingHeader(format!("no 'nplurals=' in {:?}", header.trim()))
        })?;
        let expression = segment_value(header, "plural").ok_or_else(|| {
            PoxError::MissingHeader(format!("no 'plural=' in {:?}", header.trim()))
        })?;

        Ok(Self {
            nplurals,
            expression,
        })
    }
}

impl fmt::Display for PluralForms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nplurals={}; plural={};", self.nplurals, self.expression)
    }
}

/// The declared bucket count alone. `None` when it is missing, unparseable or zero.
pub fn parse_nplurals(header: &str) -> Option<usize> {
    segment_value(header, "nplurals")?
        .parse::<usize>()
        .ok()
        .filter(|&count| count > 0)
}

/// Value of the `key=value` segment of a `;`-separated header
fn segment_value(header: &str, key: &str) -> Option<String> {
    let header = header.trim();
    let header = header.strip_prefix(HEADER_PREFIX).unwrap_or(header);

    header.split(';').find_map(|segment| {
        let (name, value) = segment.split_once('=')?;
        let value = value.trim();
        (name.trim() == key && !value.is_empty()).then(|| value.to_string())
    })
}
