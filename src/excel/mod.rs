//! Excel import/export for translation workbooks
//!
//! - Export: catalog → `.xlsx` with one styled `Translations (<lang>)` sheet
//!   and a `Metadata` sheet
//! - Import: `.xlsx` → messages, language and `Plural-Forms`

mod exporter;
mod importer;

pub use exporter::SpreadsheetExporter;
pub use importer::{ImportedCatalog, SpreadsheetImporter, UNKNOWN_LANGUAGE};

/// Prefix of the translations sheet name
pub const TRANSLATIONS_SHEET: &str = "Translations";
pub const METADATA_SHEET: &str = "Metadata";

/// Metadata keys, shared by the Metadata sheet and the custom properties
pub const LANGUAGE_KEY: &str = "Language";
pub const PLURAL_FORMS_KEY: &str = "Plural-Forms";
pub const CREATED_KEY: &str = "Created";
pub const TOOL_KEY: &str = "PoxConvert";
