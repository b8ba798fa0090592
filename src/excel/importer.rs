//! Spreadsheet importer: .xlsx → messages

use super::{LANGUAGE_KEY, METADATA_SHEET, PLURAL_FORMS_KEY, TRANSLATIONS_SHEET};
use crate::error::{PoxError, PoxResult};
use crate::plural::PluralForms;
use crate::table::{decode, translation_columns};
use crate::types::{Cell, CellValue, Grid, Message, Row};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Workbook part holding custom document properties
const CUSTOM_PROPERTIES_PART: &str = "docProps/custom.xml";

pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// What a translated workbook gives back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedCatalog {
    pub language: String,
    /// `Plural-Forms` as exported, if the Metadata sheet survived
    pub plural_forms: Option<String>,
    /// Number of translation columns in the sheet
    pub translation_columns: usize,
    pub messages: Vec<Message>,
}

impl ImportedCatalog {
    /// The header to write back. Without an exported one, only the number of
    /// forms is known.
    pub fn resolved_plural_forms(&self) -> String {
        if let Some(header) = &self.plural_forms {
            if PluralForms::parse(header).is_ok() {
                return header.clone();
            }
            warn!(
                "Plural-Forms {:?} in the workbook is unusable; deriving one from the columns",
                header
            );
        }
        match self.translation_columns {
            0 | 1 => "nplurals=1; plural=0;".to_string(),
            2 => "nplurals=2; plural=(n != 1);".to_string(),
            n => {
                warn!(
                    "No Plural-Forms in the workbook; writing nplurals={} with a placeholder formula",
                    n
                );
                format!("nplurals={}; plural=0;", n)
            }
        }
    }
}

/// Reads one translated workbook
pub struct SpreadsheetImporter {
    path: PathBuf,
}

impl SpreadsheetImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn import(&self) -> PoxResult<ImportedCatalog> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| {
            PoxError::Import(format!(
                "Failed to open Excel file \"{}\": {}",
                self.path.display(),
                e
            ))
        })?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .iter()
            .find(|name| name.starts_with(TRANSLATIONS_SHEET))
            .ok_or_else(|| {
                PoxError::Shape(format!(
                    "no worksheet named \"{} (...)\" in \"{}\"",
                    TRANSLATIONS_SHEET,
                    self.path.display()
                ))
            })?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| PoxError::Import(format!("Failed to read \"{}\": {}", sheet_name, e)))?;
        let grid = to_grid(&range);
        let messages = decode(&grid)?;
        let columns = grid.first().map_or(0, translation_columns);

        let plural_forms = if sheet_names.iter().any(|name| name == METADATA_SHEET) {
            read_plural_forms(&mut workbook)?
        } else {
            None
        };

        let language = self.language()?;
        debug!(
            "Read {} messages ({} translation columns, language {}) from {}",
            messages.len(),
            columns,
            language,
            self.path.display()
        );

        Ok(ImportedCatalog {
            language,
            plural_forms,
            translation_columns: columns,
            messages,
        })
    }

    /// `Language` custom property, else the filename suffix, else `unknown`
    fn language(&self) -> PoxResult<String> {
        if let Some(language) = read_custom_property(&self.path, LANGUAGE_KEY)? {
            return Ok(language);
        }
        let language = language_from_filename(&self.path);
        warn!(
            "No \"{}\" property in {}; using \"{}\"",
            LANGUAGE_KEY,
            self.path.display(),
            language
        );
        Ok(language)
    }
}

fn read_plural_forms(workbook: &mut Xlsx<BufReader<File>>) -> PoxResult<Option<String>> {
    let range = workbook
        .worksheet_range(METADATA_SHEET)
        .map_err(|e| PoxError::Import(format!("Failed to read \"{}\": {}", METADATA_SHEET, e)))?;

    Ok(to_grid(&range).iter().find_map(|row| {
        let key = row.first()?.value.as_text()?;
        if key != PLURAL_FORMS_KEY {
            return None;
        }
        row.get(1)?.value.as_text()
    }))
}

/// Place a calamine range on an A1-anchored grid
fn to_grid(range: &Range<Data>) -> Grid {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Grid = vec![Vec::new(); first_row as usize];
    for data in range.rows() {
        let mut row: Row = vec![Cell::empty(); first_col as usize];
        row.extend(data.iter().map(|d| Cell::plain(to_cell_value(d))));
        grid.push(row);
    }
    grid
}

fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::Int(*value),
        // Numbers typed into a text column come back as floats
        Data::Float(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            CellValue::Int(*value as i64)
        }
        other => CellValue::Text(other.to_string()),
    }
}

/// A string custom document property, read straight from the package
fn read_custom_property(path: &Path, name: &str) -> PoxResult<Option<String>> {
    let zip_error = |e: ZipError| {
        PoxError::Import(format!(
            "Failed to read properties of \"{}\": {}",
            path.display(),
            e
        ))
    };

    let mut archive = ZipArchive::new(File::open(path)?).map_err(zip_error)?;
    let mut xml = String::new();
    match archive.by_name(CUSTOM_PROPERTIES_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(zip_error(e)),
    }

    let pattern = format!(
        r#"<property[^>]*\bname="{}"[^>]*>\s*<vt:lpwstr>([^<]*)</vt:lpwstr>"#,
        regex::escape(name)
    );
    let re = Regex::new(&pattern)
        .map_err(|e| PoxError::Import(format!("Invalid property pattern: {}", e)))?;

    let value = re
        .captures(&xml)
        .and_then(|caps| caps.get(1))
        .map(|value| unescape_xml(value.as_str()))
        .transpose()?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

fn unescape_xml(text: &str) -> PoxResult<String> {
    // Pattern: &#10; or &#x0A;
    let char_ref = Regex::new(r"&#(x[0-9A-Fa-f]+|[0-9]+);")
        .map_err(|e| PoxError::Import(format!("Regex error: {}", e)))?;
    let text = char_ref.replace_all(text, |caps: &regex::Captures| {
        let code = &caps[1];
        code.strip_prefix('x')
            .map(|hex| u32::from_str_radix(hex, 16))
            .unwrap_or_else(|| code.parse::<u32>())
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    Ok(text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&"))
}

/// `translations_pt_BR.xlsx` → `pt_BR`
fn language_from_filename(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.split_once('_'))
        .map(|(_, suffix)| suffix.to_string())
        .filter(|suffix| !suffix.is_empty())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}
