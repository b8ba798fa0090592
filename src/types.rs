use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

//==============================================================================
// Message Model
//==============================================================================

/// The translated text(s) of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Translation {
    Singular {
        source_text: String,
        target_text: String,
    },
    Plural {
        source_text_plural: String,
        /// Dense plural-form indices `0..nplurals`
        target_by_form: BTreeMap<usize, String>,
    },
}

impl Translation {
    /// The text shown in the "Singular Form" column
    pub fn source_text(&self) -> &str {
        match self {
            Translation::Singular { source_text, .. } => source_text,
            Translation::Plural {
                source_text_plural, ..
            } => source_text_plural,
        }
    }
}

/// One catalog entry, independent of the file format it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub translation: Translation,
    pub context: Option<String>,
    /// Comment extracted from the source code
    pub source_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub obsolete: bool,
}

impl Message {
    pub fn singular(source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        Self::from_translation(Translation::Singular {
            source_text: source_text.into(),
            target_text: target_text.into(),
        })
    }

    pub fn plural<I, S>(source_text_plural: impl Into<String>, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_translation(Translation::Plural {
            source_text_plural: source_text_plural.into(),
            target_by_form: forms
                .into_iter()
                .map(Into::into)
                .enumerate()
                .collect(),
        })
    }

    fn from_translation(translation: Translation) -> Self {
        Self {
            translation,
            context: None,
            source_comment: None,
            translator_comment: None,
            obsolete: false,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_obsolete(mut self, obsolete: bool) -> Self {
        self.obsolete = obsolete;
        self
    }

    pub fn is_plural(&self) -> bool {
        matches!(self.translation, Translation::Plural { .. })
    }
}

/// Everything the table encoder needs for one catalog
#[derive(Debug, Clone)]
pub struct CatalogContext {
    pub language: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    /// Column label per plural-form index
    pub plural_hints: Option<BTreeMap<usize, String>>,
}

impl CatalogContext {
    pub fn new(language: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            language: language.into(),
            messages,
            created_at: Utc::now(),
            plural_hints: None,
        }
    }

    pub fn with_plural_hints(mut self, hints: BTreeMap<usize, String>) -> Self {
        self.plural_hints = Some(hints);
        self
    }

    pub fn has_plurals(&self) -> bool {
        self.messages.iter().any(Message::is_plural)
    }

    /// Plural forms per plural message: the declared count, widened when a
    /// message carries more forms than declared. Two when nothing is declared.
    pub fn nplurals(&self) -> usize {
        let declared = self.plural_hints.as_ref().map_or(2, BTreeMap::len);
        let carried = self
            .messages
            .iter()
            .filter_map(|m| match &m.translation {
                Translation::Plural { target_by_form, .. } => {
                    target_by_form.keys().next_back().map(|last| last + 1)
                }
                Translation::Singular { .. } => None,
            })
            .max()
            .unwrap_or(0);
        declared.max(carried)
    }

    /// Substitute `{lang}` and `{date}` (`YYYY-MM-DD`) in a filename template
    pub fn output_filename(&self, template: &str) -> String {
        render_filename(template, &self.language, self.created_at)
    }
}

/// `{lang}` and `{date}` substitution shared by both conversion directions
pub fn render_filename(template: &str, language: &str, date: DateTime<Utc>) -> String {
    template
        .replace("{lang}", language)
        .replace("{date}", &date.format("%Y-%m-%d").to_string())
}

//==============================================================================
// Catalog Boundary Record
//==============================================================================

/// An entry as exchanged with the catalog reader/writer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub source_text: String,
    pub source_text_plural: Option<String>,
    pub target_text: Option<String>,
    pub target_by_form: Option<BTreeMap<usize, String>>,
    pub context: Option<String>,
    pub comment: Option<String>,
    pub translator_comment: Option<String>,
    pub obsolete: bool,
    pub fuzzy: bool,
}

impl From<CatalogEntry> for Message {
    fn from(entry: CatalogEntry) -> Self {
        let translation = match entry.target_by_form {
            Some(target_by_form) if !target_by_form.is_empty() => Translation::Plural {
                source_text_plural: entry.source_text_plural.unwrap_or(entry.source_text),
                target_by_form,
            },
            _ => Translation::Singular {
                source_text: entry.source_text,
                target_text: entry.target_text.unwrap_or_default(),
            },
        };

        Message {
            translation,
            context: entry.context,
            source_comment: entry.comment,
            translator_comment: entry.translator_comment,
            obsolete: entry.obsolete,
        }
    }
}

impl From<Message> for CatalogEntry {
    fn from(message: Message) -> Self {
        let mut entry = CatalogEntry {
            context: message.context,
            comment: message.source_comment,
            translator_comment: message.translator_comment,
            obsolete: message.obsolete,
            ..Default::default()
        };

        match message.translation {
            Translation::Singular {
                source_text,
                target_text,
            } => {
                entry.source_text = source_text;
                entry.target_text = Some(target_text);
            }
            // Only the plural source survives in a spreadsheet, so it doubles as msgid
            Translation::Plural {
                source_text_plural,
                target_by_form,
            } => {
                entry.source_text = source_text_plural.clone();
                entry.source_text_plural = Some(source_text_plural);
                entry.target_by_form = Some(target_by_form);
            }
        }

        entry
    }
}

//==============================================================================
// Tabular Model
//==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    #[default]
    Empty,
}

impl CellValue {
    /// Text content; `None` for empty cells and empty strings
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(text) if !text.is_empty() => Some(text.clone()),
            CellValue::Int(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::Text(text)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

/// Closed set of style presets the spreadsheet writer knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    /// Header cell of the `id` column
    HeaderLight,
    Header,
    Id,
    Context,
    /// Source text
    MsgId,
    /// A filled translation
    MsgStr,
    /// A translation still to be filled in
    MsgStrEmpty,
    MsgStrObsolete,
}

/// Outline drawn around runs of empty translation cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Border {
    /// A run of one cell: all four edges
    Box,
    /// First cell of a longer run: top and sides
    Top,
    /// Inner cell of a run: sides only
    Sides,
    /// Last cell of a run: bottom and sides
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub value: CellValue,
    pub style: Option<StyleTag>,
    pub border: Option<Border>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>, style: StyleTag) -> Self {
        Self {
            value: value.into(),
            style: Some(style),
            border: None,
        }
    }

    /// An unstyled cell, as read back from a spreadsheet
    pub fn plain(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: None,
            border: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

pub type Row = Vec<Cell>;

/// Rows of cells; the first row is the header
pub type Grid = Vec<Row>;
