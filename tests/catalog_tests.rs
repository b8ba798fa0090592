//! .po catalog reading, writing and context building

use pox_convert::catalog::{read_catalog, write_catalog, FuzzyPolicy};
use pox_convert::error::PoxError;
use pox_convert::types::{CatalogEntry, Message, Translation};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

#[test]
fn test_read_german_catalog() {
    let file = read_catalog(&fixture("de.po")).unwrap();

    assert_eq!(file.language.as_deref(), Some("de"));
    assert_eq!(
        file.plural_forms.as_deref(),
        Some("nplurals=2; plural=(n != 1);")
    );
    assert_eq!(file.entries.len(), 5);

    assert_eq!(file.entries[0].source_text, "Hello World");
    assert_eq!(file.entries[0].target_text.as_deref(), Some("Hallo Welt"));
    assert_eq!(file.entries[1].context.as_deref(), Some("Keep short"));
    assert_eq!(file.entries[2].target_text.as_deref(), Some(""));

    let plural = &file.entries[3];
    assert_eq!(plural.source_text_plural.as_deref(), Some("%d files"));
    assert_eq!(
        plural.target_by_form,
        Some(BTreeMap::from([
            (0, "%d Datei".to_string()),
            (1, "%d Dateien".to_string()),
        ]))
    );
}

#[test]
fn test_read_polish_plural_forms() {
    let file = read_catalog(&fixture("pl.po")).unwrap();
    let header = file.plural_forms.unwrap();
    assert!(header.starts_with("nplurals=3; plural="));
    assert_eq!(
        file.entries[1].target_by_form.as_ref().map(BTreeMap::len),
        Some(3)
    );
}

#[test]
fn test_read_missing_file() {
    let result = read_catalog(Path::new("test-data/does-not-exist.po"));
    assert!(matches!(result, Err(PoxError::Catalog(_))));
}

#[test]
fn test_context_uses_plural_hints() {
    let context = read_catalog(&fixture("pl.po"))
        .unwrap()
        .into_context(None, FuzzyPolicy::Stop)
        .unwrap();

    assert_eq!(context.language, "pl");
    assert!(context.has_plurals());
    assert_eq!(context.nplurals(), 3);
    let hints = context.plural_hints.unwrap();
    assert_eq!(hints[&0], "Singular, n = 1");
    assert_eq!(hints[&1], "Plural, n = 2-4, 22-24, ...");
}

#[test]
fn test_context_without_language_fails() {
    let result = read_catalog(&fixture("nolang.po"))
        .unwrap()
        .into_context(None, FuzzyPolicy::Stop);
    assert!(matches!(result, Err(PoxError::Validation(_))));
}

#[test]
fn test_context_language_override() {
    let context = read_catalog(&fixture("nolang.po"))
        .unwrap()
        .into_context(Some("sv"), FuzzyPolicy::Stop)
        .unwrap();
    assert_eq!(context.language, "sv");
    assert_eq!(context.messages, vec![Message::singular("Hello World", "")]);
}

#[test]
fn test_fuzzy_policies() {
    let read = || read_catalog(&fixture("fuzzy.po")).unwrap();

    assert!(read().entries.iter().any(|e| e.fuzzy));
    assert!(matches!(
        read().into_context(None, FuzzyPolicy::Stop),
        Err(PoxError::Validation(_))
    ));
    assert_eq!(
        read()
            .into_context(None, FuzzyPolicy::Ignore)
            .unwrap()
            .messages
            .len(),
        1
    );
    assert_eq!(
        read()
            .into_context(None, FuzzyPolicy::Include)
            .unwrap()
            .messages
            .len(),
        2
    );
}

#[test]
fn test_imported_messages_write_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pl.po");
    let messages = vec![
        Message::singular("Cart", "Koszyk"),
        Message::plural("%d files", ["%d plik", "%d pliki", "%d plików"]).with_context("count"),
        Message::singular("Gone", "Nie ma").with_obsolete(true),
    ];
    let entries: Vec<CatalogEntry> = messages.into_iter().map(CatalogEntry::from).collect();
    let header = "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);";

    write_catalog(&path, "pl", Some(header), &entries).unwrap();

    let file = read_catalog(&path).unwrap();
    assert_eq!(file.language.as_deref(), Some("pl"));
    assert_eq!(file.plural_forms.as_deref(), Some(header));
    assert_eq!(file.entries.len(), 3);

    let back: Vec<Message> = file.entries.into_iter().map(Message::from).collect();
    assert_eq!(back[0], Message::singular("Cart", "Koszyk"));
    match &back[1].translation {
        Translation::Plural {
            source_text_plural,
            target_by_form,
        } => {
            assert_eq!(source_text_plural, "%d files");
            assert_eq!(target_by_form.len(), 3);
        }
        other => panic!("expected a plural message, got {:?}", other),
    }
    assert_eq!(back[1].context.as_deref(), Some("count"));
    assert_eq!(back[2], Message::singular("Gone", "Nie ma").with_obsolete(true));
}

// ═══════════════════════════════════════════════════════════════════════════
// INCOMPLETE HEADERS AND OBSOLETE ENTRIES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_read_catalog_without_plural_forms() {
    let file = read_catalog(&fixture("obsolete.po")).unwrap();
    assert_eq!(file.language.as_deref(), Some("it"));
    assert_eq!(file.plural_forms, None);

    let context = file.into_context(None, FuzzyPolicy::Stop).unwrap();
    assert_eq!(
        context.plural_hints,
        Some(BTreeMap::from([
            (0, "Singular".to_string()),
            (1, "Plural".to_string()),
        ]))
    );
}

#[test]
fn test_read_obsolete_entries() {
    let file = read_catalog(&fixture("obsolete.po")).unwrap();
    assert_eq!(file.entries.len(), 2);
    assert!(!file.entries[0].obsolete);

    let old = &file.entries[1];
    assert!(old.obsolete);
    assert_eq!(old.source_text, "Noodle");
    assert_eq!(old.context.as_deref(), Some("menu"));
    assert_eq!(old.target_text.as_deref(), Some("Tagliatella"));
}

#[test]
fn test_plural_forms_without_nplurals_degrades() {
    let file = read_catalog(&fixture("badplural.po")).unwrap();
    assert_eq!(file.plural_forms.as_deref(), Some("plural=(n != 1);"));

    let context = file.into_context(None, FuzzyPolicy::Stop).unwrap();
    let hints = context.plural_hints.unwrap();
    assert_eq!(hints[&0], "Singular");
    assert_eq!(hints[&1], "Plural");
}

#[test]
fn test_unterminated_string_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.po");
    std::fs::write(&path, "msgid \"Hello\"\nmsgstr \"Hallo\n").unwrap();

    match read_catalog(&path) {
        Err(PoxError::Catalog(message)) => {
            assert!(message.contains("broken.po"), "{}", message);
            assert!(message.contains("line 2"), "{}", message);
        }
        other => panic!("expected a catalog error, got {:?}", other.map(|f| f.entries)),
    }
}
