//! Grid → message model

use super::{
    CONTEXT_COLUMN, FIRST_TRANSLATION_COLUMN, OBSOLETE_MARKER, SOURCE_COLUMN, TRANSLATION_HEADER,
};
use crate::error::{PoxError, PoxResult};
use crate::types::{Cell, CellValue, Grid, Message, Row, Translation};
use std::collections::BTreeMap;

/// Rebuild messages from a header row plus data rows.
///
/// Rows without an id are skipped; cells missing at the end of a row read as
/// empty. With more than one translation column every row becomes a plural
/// message.
pub fn decode(grid: &Grid) -> PoxResult<Vec<Message>> {
    let Some((header, rows)) = grid.split_first() else {
        return Err(PoxError::Shape("sheet is empty".to_string()));
    };
    if rows.is_empty() {
        return Err(PoxError::Shape(
            "sheet has a header but no data rows".to_string(),
        ));
    }

    let columns = translation_columns(header);

    Ok(rows
        .iter()
        .filter(|row| !cell(row, 0).is_empty())
        .map(|row| decode_row(row, columns))
        .collect())
}

/// Number of `Translation...` header cells from the first translation column on
pub fn translation_columns(header: &Row) -> usize {
    header
        .iter()
        .skip(FIRST_TRANSLATION_COLUMN)
        .filter(|c| {
            c.value
                .as_text()
                .is_some_and(|text| text.starts_with(TRANSLATION_HEADER))
        })
        .count()
}

fn decode_row(row: &Row, translation_columns: usize) -> Message {
    let context = cell(row, CONTEXT_COLUMN).as_text();
    let obsolete = context.as_deref() == Some(OBSOLETE_MARKER);
    let source_text = text(row, SOURCE_COLUMN);

    let translation = if translation_columns > 1 {
        let target_by_form: BTreeMap<usize, String> = (0..translation_columns)
            .map(|form| (form, text(row, FIRST_TRANSLATION_COLUMN + form)))
            .collect();
        Translation::Plural {
            source_text_plural: source_text,
            target_by_form,
        }
    } else {
        Translation::Singular {
            source_text,
            target_text: text(row, FIRST_TRANSLATION_COLUMN),
        }
    };

    Message {
        translation,
        context: if obsolete { None } else { context },
        source_comment: None,
        translator_comment: None,
        obsolete,
    }
}

fn cell(row: &Row, column: usize) -> &CellValue {
    const EMPTY: &CellValue = &CellValue::Empty;
    row.get(column).map_or(EMPTY, |c: &Cell| &c.value)
}

fn text(row: &Row, column: usize) -> String {
    cell(row, column).as_text().unwrap_or_default()
}
