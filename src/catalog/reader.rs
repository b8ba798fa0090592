use super::source::PoSource;
use super::CatalogFile;
use crate::error::{PoxError, PoxResult};
use crate::types::CatalogEntry;
use polib::catalog::Catalog;
use polib::message::MessageView;
use polib::po_file;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read a `.po` file into boundary records: active entries in file order,
/// then obsolete (`#~`) ones.
///
/// Header values are taken as written. A missing or malformed `Plural-Forms`
/// is left for the hint builder to degrade on.
pub fn read_catalog(path: &Path) -> PoxResult<CatalogFile> {
    let unreadable = |e: &dyn std::fmt::Display| {
        PoxError::Catalog(format!(
            "The po file \"{}\" is unreadable: {}",
            path.display(),
            e
        ))
    };

    let text = std::fs::read_to_string(path).map_err(|e| unreadable(&e))?;
    let source = PoSource::parse(&text).map_err(|e| unreadable(&e))?;

    let mut entries: Vec<CatalogEntry> = parse_text(&source.active)
        .map_err(|e| unreadable(&e))?
        .messages()
        .map(|message| to_entry(message, false))
        .collect();
    if source.obsolete_count > 0 {
        entries.extend(
            parse_text(&source.obsolete)
                .map_err(|e| unreadable(&e))?
                .messages()
                .map(|message| to_entry(message, true)),
        );
    }

    debug!(
        "Read {} entries ({} obsolete) from {} (language {:?})",
        entries.len(),
        source.obsolete_count,
        path.display(),
        source.language
    );

    Ok(CatalogFile {
        language: source.language,
        plural_forms: source.plural_forms,
        entries,
    })
}

/// `polib` only parses from a path
fn parse_text(text: &str) -> Result<Catalog, String> {
    let mut file = NamedTempFile::new().map_err(|e| e.to_string())?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| e.to_string())?;
    po_file::parse(file.path()).map_err(|e| e.to_string())
}

fn to_entry(message: &dyn MessageView, obsolete: bool) -> CatalogEntry {
    let target_by_form = if message.is_plural() {
        message
            .msgstr_plural()
            .ok()
            .map(|forms| forms.iter().cloned().enumerate().collect::<BTreeMap<_, _>>())
    } else {
        None
    };

    CatalogEntry {
        source_text: message.msgid().to_string(),
        source_text_plural: message.msgid_plural().ok().map(str::to_string),
        target_text: message.msgstr().ok().map(str::to_string),
        target_by_form,
        context: non_empty(message.msgctxt()),
        comment: non_empty(message.comments()),
        translator_comment: None,
        obsolete,
        fuzzy: message.is_fuzzy(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn read(text: &str) -> PoxResult<CatalogFile> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.po");
        std::fs::write(&path, text).unwrap();
        read_catalog(&path)
    }

    #[test]
    fn test_header_without_plural_forms() {
        let file = read(
            "msgid \"\"\nmsgstr \"Language: de\\n\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\n\
             msgid \"Hello\"\nmsgstr \"Hallo\"\n",
        )
        .unwrap();
        assert_eq!(file.language.as_deref(), Some("de"));
        assert_eq!(file.plural_forms, None);
        assert_eq!(file.entries.len(), 1);
    }

    #[test]
    fn test_plural_forms_without_nplurals_is_kept_raw() {
        let file = read(
            "msgid \"\"\nmsgstr \"Language: de\\n\"\n\"Plural-Forms: plural=(n != 1);\\n\"\n\n\
             msgid \"Hello\"\nmsgstr \"Hallo\"\n",
        )
        .unwrap();
        assert_eq!(file.plural_forms.as_deref(), Some("plural=(n != 1);"));
    }

    #[test]
    fn test_no_header_at_all() {
        let file = read("msgid \"Hello\"\nmsgstr \"Hallo\"\n").unwrap();
        assert_eq!(file.language, None);
        assert_eq!(file.entries[0].target_text.as_deref(), Some("Hallo"));
    }

    #[test]
    fn test_obsolete_entries_are_read() {
        let file = read(
            "msgid \"\"\nmsgstr \"Language: fr\\n\"\n\n\
             msgid \"New\"\nmsgstr \"Nouveau\"\n\n\
             #~ msgctxt \"menu\"\n#~ msgid \"Old\"\n#~ msgstr \"Vieux\"\n",
        )
        .unwrap();
        assert_eq!(file.entries.len(), 2);
        assert!(!file.entries[0].obsolete);
        let old = &file.entries[1];
        assert!(old.obsolete);
        assert_eq!(old.source_text, "Old");
        assert_eq!(old.context.as_deref(), Some("menu"));
        assert_eq!(old.target_text.as_deref(), Some("Vieux"));
    }

    #[test]
    fn test_malformed_line_is_a_catalog_error() {
        let result = read("msgid \"Hello\nmsgstr \"Hallo\"\n");
        match result {
            Err(PoxError::Catalog(message)) => assert!(message.contains("line 1"), "{}", message),
            other => panic!("expected a catalog error, got {:?}", other.map(|f| f.entries)),
        }
    }
}
