use super::source::obsolete_lines;
use crate::error::{PoxError, PoxResult};
use crate::plural::PluralForms;
use crate::types::CatalogEntry;
use polib::catalog::Catalog;
use polib::message::{Message as PoMessage, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Write entries to a `.po` file, overwriting it.
///
/// `plural_forms` is written as the `Plural-Forms` header when it parses.
/// Obsolete entries follow the active ones as a `#~` block.
pub fn write_catalog(
    path: &Path,
    language: &str,
    plural_forms: Option<&str>,
    entries: &[CatalogEntry],
) -> PoxResult<()> {
    let write_error = |e: &dyn std::fmt::Display| {
        PoxError::Catalog(format!("Failed to write \"{}\": {}", path.display(), e))
    };

    let mut metadata = CatalogMetadata::new();
    metadata.language = language.to_string();
    metadata.mime_version = "1.0".to_string();
    metadata.content_type = CONTENT_TYPE.to_string();
    metadata.content_transfer_encoding = "8bit".to_string();
    if let Some(header) = plural_forms {
        let forms = PluralForms::parse(header)?;
        metadata.plural_rules.nplurals = forms.nplurals;
        metadata.plural_rules.expr = forms.expression;
    }

    let (obsolete, active): (Vec<&CatalogEntry>, Vec<&CatalogEntry>) =
        entries.iter().partition(|entry| entry.obsolete);

    let catalog = build_catalog(metadata, &active, path);
    po_file::write(&catalog, path).map_err(|e| write_error(&e))?;

    if !obsolete.is_empty() {
        let block = render_obsolete(&obsolete, path).map_err(|e| write_error(&e))?;
        OpenOptions::new()
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(block.as_bytes()))
            .map_err(|e| write_error(&e))?;
    }

    debug!(
        "Wrote {} entries ({} obsolete) to {}",
        active.len() + obsolete.len(),
        obsolete.len(),
        path.display()
    );

    Ok(())
}

/// Rows sharing a context and source text collapse into one message; the
/// last one wins.
fn build_catalog(metadata: CatalogMetadata, entries: &[&CatalogEntry], path: &Path) -> Catalog {
    let mut catalog = Catalog::new(metadata);
    let mut replaced = 0;
    for entry in entries {
        let message = to_message(entry);
        let msgctxt = Some(message.msgctxt()).filter(|c| !c.is_empty());
        if catalog
            .find_message(msgctxt, message.msgid(), message.msgid_plural().ok())
            .is_some()
        {
            replaced += 1;
        }
        catalog.append_or_update(message);
    }
    if replaced > 0 {
        warn!(
            "{} entries repeat an earlier context and source text in {}; the later one was kept",
            replaced,
            path.display()
        );
    }
    catalog
}

/// `polib` has no obsolete entries: write them as ordinary messages to a
/// scratch file, then prefix everything but comments with `#~`.
fn render_obsolete(entries: &[&CatalogEntry], path: &Path) -> Result<String, String> {
    let catalog = build_catalog(CatalogMetadata::new(), entries, path);
    let scratch = NamedTempFile::new().map_err(|e| e.to_string())?;
    po_file::write(&catalog, scratch.path()).map_err(|e| e.to_string())?;
    let text = std::fs::read_to_string(scratch.path()).map_err(|e| e.to_string())?;

    let messages = text
        .trim_start_matches('\n')
        .split_once("\n\n")
        .map(|(_header, messages)| messages)
        .unwrap_or_default();
    Ok(obsolete_lines(messages))
}

fn to_message(entry: &CatalogEntry) -> PoMessage {
    let mut builder = match &entry.target_by_form {
        Some(forms) => {
            let mut builder = PoMessage::build_plural();
            builder
                .with_msgid_plural(
                    entry
                        .source_text_plural
                        .clone()
                        .unwrap_or_else(|| entry.source_text.clone()),
                )
                .with_msgstr_plural(forms.values().cloned().collect());
            builder
        }
        None => {
            let mut builder = PoMessage::build_singular();
            builder.with_msgstr(entry.target_text.clone().unwrap_or_default());
            builder
        }
    };

    builder.with_msgid(entry.source_text.clone());
    if let Some(context) = &entry.context {
        builder.with_msgctxt(context.clone());
    }
    if let Some(comment) = &entry.comment {
        builder.with_comments(comment.clone());
    }

    builder.done()
}
