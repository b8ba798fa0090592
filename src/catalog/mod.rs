//! gettext catalog boundary
//!
//! `.po` syntax is handled by the `polib` crate behind a line-level pass
//! that checks the text, keeps the header values and carries `#~` entries.
//! This module maps messages to and from [`CatalogEntry`] records and builds
//! the [`CatalogContext`] handed to the table encoder.

mod reader;
mod source;
mod writer;

pub use reader::read_catalog;
pub use writer::write_catalog;

use crate::error::{PoxError, PoxResult};
use crate::plural::plural_hints;
use crate::types::{CatalogContext, CatalogEntry, Message};
use clap::ValueEnum;
use tracing::debug;

/// A catalog as read from disk
#[derive(Debug, Clone, Default)]
pub struct CatalogFile {
    /// `Language` header, if set
    pub language: Option<String>,
    /// `Plural-Forms` header value, if set
    pub plural_forms: Option<String>,
    pub entries: Vec<CatalogEntry>,
}

/// What to do with entries flagged `fuzzy`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FuzzyPolicy {
    /// Refuse to convert a catalog that contains fuzzy entries
    #[default]
    Stop,
    /// Leave fuzzy entries out
    Ignore,
    /// Convert fuzzy entries like any other
    Include,
}

impl FuzzyPolicy {
    pub fn apply(self, entries: Vec<CatalogEntry>) -> PoxResult<Vec<CatalogEntry>> {
        let fuzzy = entries.iter().filter(|e| e.fuzzy).count();
        if fuzzy == 0 {
            return Ok(entries);
        }

        match self {
            FuzzyPolicy::Stop => Err(PoxError::Validation(format!(
                "catalog contains {} fuzzy entries; remove them or choose another fuzzy policy",
                fuzzy
            ))),
            FuzzyPolicy::Ignore => {
                debug!("Skipping {} fuzzy entries", fuzzy);
                Ok(entries.into_iter().filter(|e| !e.fuzzy).collect())
            }
            FuzzyPolicy::Include => Ok(entries),
        }
    }
}

impl CatalogFile {
    /// Build the encoder input. `language` overrides the catalog's own header.
    pub fn into_context(
        self,
        language: Option<&str>,
        fuzzy: FuzzyPolicy,
    ) -> PoxResult<CatalogContext> {
        let language = language
            .map(str::to_string)
            .or(self.language)
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| {
                PoxError::Validation("catalog has no \"Language\" set in its metadata".to_string())
            })?;

        let messages: Vec<Message> = fuzzy
            .apply(self.entries)?
            .into_iter()
            .map(Message::from)
            .collect();

        Ok(CatalogContext::new(language, messages)
            .with_plural_hints(plural_hints(self.plural_forms.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, fuzzy: bool) -> CatalogEntry {
        CatalogEntry {
            source_text: source.to_string(),
            target_text: Some(String::new()),
            fuzzy,
            ..Default::default()
        }
    }

    #[test]
    fn test_fuzzy_stop() {
        let result = FuzzyPolicy::Stop.apply(vec![entry("a", false), entry("b", true)]);
        assert!(matches!(result, Err(PoxError::Validation(_))));
    }

    #[test]
    fn test_fuzzy_stop_without_fuzzy_entries() {
        let entries = FuzzyPolicy::Stop.apply(vec![entry("a", false)]).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_fuzzy_ignore() {
        let entries = FuzzyPolicy::Ignore
            .apply(vec![entry("a", false), entry("b", true)])
            .unwrap();
        assert_eq!(entries, vec![entry("a", false)]);
    }

    #[test]
    fn test_fuzzy_include() {
        let entries = FuzzyPolicy::Include
            .apply(vec![entry("a", false), entry("b", true)])
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_into_context_language_override() {
        let file = CatalogFile {
            language: Some("de".to_string()),
            plural_forms: Some("nplurals=2; plural=(n != 1);".to_string()),
            entries: vec![entry("a", false)],
        };
        let context = file.into_context(Some("pt_BR"), FuzzyPolicy::Stop).unwrap();
        assert_eq!(context.language, "pt_BR");
        assert_eq!(context.messages.len(), 1);
        assert_eq!(
            context.plural_hints.unwrap()[&0],
            "Singular, n = 1".to_string()
        );
    }

    #[test]
    fn test_into_context_without_language() {
        let file = CatalogFile {
            language: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            file.into_context(None, FuzzyPolicy::Stop),
            Err(PoxError::Validation(_))
        ));
    }
}
