//! Spreadsheet exporter: encoded grid → .xlsx

use super::{
    CREATED_KEY, LANGUAGE_KEY, METADATA_SHEET, PLURAL_FORMS_KEY, TOOL_KEY, TRANSLATIONS_SHEET,
};
use crate::error::{PoxError, PoxResult};
use crate::table::encode;
use crate::types::{Border, CatalogContext, Cell, CellValue, Grid, StyleTag};
use rust_xlsxwriter::{
    Color, DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::path::Path;
use tracing::debug;

const FONT_NAME: &str = "Tahoma";
const FONT_SIZE: f64 = 10.0;

const HEADER_FILL: u32 = 0x1F4E78;
const HEADER_LIGHT_FILL: u32 = 0xD9E1F2;
const EMPTY_FILL: u32 = 0xFFF2CC;
const MUTED_FONT: u32 = 0x808080;

const ID_WIDTH: f64 = 6.0;
const CONTEXT_WIDTH: f64 = 20.0;
const TEXT_WIDTH: f64 = 50.0;

/// Writes one catalog as a translator-facing workbook
pub struct SpreadsheetExporter {
    context: CatalogContext,
    /// Raw `Plural-Forms` header, kept in the Metadata sheet for the way back
    plural_forms: Option<String>,
}

impl SpreadsheetExporter {
    pub fn new(context: CatalogContext) -> Self {
        Self {
            context,
            plural_forms: None,
        }
    }

    pub fn with_plural_forms(mut self, plural_forms: Option<String>) -> Self {
        self.plural_forms = plural_forms;
        self
    }

    pub fn sheet_name(&self) -> String {
        format!("{} ({})", TRANSLATIONS_SHEET, self.context.language)
    }

    /// Export the catalog to an .xlsx file
    pub fn export(&self, output_path: &Path) -> PoxResult<()> {
        let mut workbook = Workbook::new();

        let properties = DocProperties::new()
            .set_custom_property(LANGUAGE_KEY, self.context.language.as_str())
            .set_custom_property(TOOL_KEY, env!("CARGO_PKG_VERSION"));
        workbook.set_properties(&properties);

        let grid = encode(&self.context);
        self.export_translations(&mut workbook, &grid)?;
        self.export_metadata(&mut workbook)?;

        workbook
            .save(output_path)
            .map_err(|e| PoxError::Export(format!("Failed to save Excel file: {}", e)))?;
        debug!(
            "Wrote {} rows to {}",
            grid.len().saturating_sub(1),
            output_path.display()
        );

        Ok(())
    }

    fn export_translations(&self, workbook: &mut Workbook, grid: &Grid) -> PoxResult<()> {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(self.sheet_name())
            .map_err(|e| PoxError::Export(format!("Failed to set worksheet name: {}", e)))?;
        worksheet.set_screen_gridlines(false);
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| PoxError::Export(format!("Failed to freeze header row: {}", e)))?;

        let width = grid.first().map_or(0, Vec::len);
        for column in 0..width {
            let column_width = match column {
                0 => ID_WIDTH,
                1 => CONTEXT_WIDTH,
                _ => TEXT_WIDTH,
            };
            worksheet
                .set_column_width(column as u16, column_width)
                .map_err(|e| PoxError::Export(format!("Failed to set column width: {}", e)))?;
        }

        for (row_idx, row) in grid.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, row_idx as u32, col_idx as u16, cell)?;
            }
        }

        Ok(())
    }

    /// Key/value sheet carrying what the grid cannot
    fn export_metadata(&self, workbook: &mut Workbook) -> PoxResult<()> {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(METADATA_SHEET)
            .map_err(|e| PoxError::Export(format!("Failed to set Metadata worksheet name: {}", e)))?;

        let key_format = base_format().set_bold();
        let created = self.context.created_at.to_rfc3339();
        let rows = [
            (LANGUAGE_KEY, self.context.language.as_str()),
            (
                PLURAL_FORMS_KEY,
                self.plural_forms.as_deref().unwrap_or_default(),
            ),
            (CREATED_KEY, created.as_str()),
            (TOOL_KEY, env!("CARGO_PKG_VERSION")),
        ];

        for (row, (key, value)) in rows.iter().enumerate() {
            worksheet
                .write_string_with_format(row as u32, 0, *key, &key_format)
                .map_err(|e| PoxError::Export(format!("Failed to write metadata key: {}", e)))?;
            if !value.is_empty() {
                worksheet
                    .write_string(row as u32, 1, *value)
                    .map_err(|e| {
                        PoxError::Export(format!("Failed to write metadata value: {}", e))
                    })?;
            }
        }
        worksheet
            .set_column_width(0, CONTEXT_WIDTH)
            .and_then(|ws| ws.set_column_width(1, TEXT_WIDTH))
            .map_err(|e| PoxError::Export(format!("Failed to set column width: {}", e)))?;

        Ok(())
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> PoxResult<()> {
    if cell.style.is_none() && cell.border.is_none() && cell.value.is_empty() {
        return Ok(());
    }
    let format = cell_format(cell.style, cell.border);

    let written = match &cell.value {
        CellValue::Text(text) if !text.is_empty() => {
            worksheet.write_string_with_format(row, col, text, &format)
        }
        CellValue::Int(number) => {
            worksheet.write_number_with_format(row, col, *number as f64, &format)
        }
        _ => worksheet.write_blank(row, col, &format),
    };
    written.map_err(|e| PoxError::Export(format!("Failed to write cell: {}", e)))?;

    Ok(())
}

fn base_format() -> Format {
    Format::new()
        .set_font_name(FONT_NAME)
        .set_font_size(FONT_SIZE)
        .set_align(FormatAlign::Top)
}

/// Format for a style tag plus an optional outline piece
pub(crate) fn cell_format(style: Option<StyleTag>, border: Option<Border>) -> Format {
    let format = base_format();
    let format = match style {
        Some(StyleTag::Header) => format
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL)),
        Some(StyleTag::HeaderLight) => format
            .set_bold()
            .set_background_color(Color::RGB(HEADER_LIGHT_FILL)),
        Some(StyleTag::Id) => format
            .set_font_color(Color::RGB(MUTED_FONT))
            .set_align(FormatAlign::Center),
        Some(StyleTag::Context) => format.set_italic().set_text_wrap(),
        Some(StyleTag::MsgId) | Some(StyleTag::MsgStr) => format.set_text_wrap(),
        Some(StyleTag::MsgStrEmpty) => format
            .set_text_wrap()
            .set_background_color(Color::RGB(EMPTY_FILL)),
        Some(StyleTag::MsgStrObsolete) => format
            .set_text_wrap()
            .set_font_strikethrough()
            .set_font_color(Color::RGB(MUTED_FONT)),
        None => format,
    };

    match border {
        Some(Border::Box) => format.set_border(FormatBorder::Thin),
        Some(Border::Top) => format
            .set_border_top(FormatBorder::Thin)
            .set_border_left(FormatBorder::Thin)
            .set_border_right(FormatBorder::Thin),
        Some(Border::Sides) => format
            .set_border_left(FormatBorder::Thin)
            .set_border_right(FormatBorder::Thin),
        Some(Border::Bottom) => format
            .set_border_bottom(FormatBorder::Thin)
            .set_border_left(FormatBorder::Thin)
            .set_border_right(FormatBorder::Thin),
        None => format,
    }
}
