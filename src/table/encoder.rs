//! Message model → grid

use super::{
    CONTEXT_HEADER, FIRST_TRANSLATION_COLUMN, ID_HEADER, OBSOLETE_MARKER, SOURCE_HEADER,
    TRANSLATION_HEADER,
};
use crate::plural::hints::{default_hints, generic_label};
use crate::types::{Border, CatalogContext, Cell, CellValue, Grid, Message, Row, StyleTag, Translation};

/// Translation columns of one catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub translation_headers: Vec<String>,
}

impl ColumnPlan {
    /// One column per plural form when the catalog has plural messages and
    /// declares at least two forms, a single plain column otherwise.
    pub fn for_catalog(context: &CatalogContext) -> Self {
        let nplurals = context.nplurals();

        if !context.has_plurals() || nplurals < 2 {
            return Self {
                translation_headers: vec![TRANSLATION_HEADER.to_string()],
            };
        }

        let hints = context.plural_hints.clone().unwrap_or_else(default_hints);
        let translation_headers = (0..nplurals)
            .map(|form| {
                let hint = hints
                    .get(&form)
                    .cloned()
                    .unwrap_or_else(|| generic_label(form));
                format!("{} ({})", TRANSLATION_HEADER, hint)
            })
            .collect();

        Self {
            translation_headers,
        }
    }

    pub fn translation_columns(&self) -> usize {
        self.translation_headers.len()
    }

    pub fn width(&self) -> usize {
        FIRST_TRANSLATION_COLUMN + self.translation_columns()
    }
}

/// Project a catalog into a header row plus one row per message, in message order
pub fn encode(context: &CatalogContext) -> Grid {
    let plan = ColumnPlan::for_catalog(context);

    let mut grid = Vec::with_capacity(context.messages.len() + 1);
    grid.push(header_row(&plan));
    for (index, message) in context.messages.iter().enumerate() {
        grid.push(message_row(index as i64 + 1, message, &plan));
    }

    for column in FIRST_TRANSLATION_COLUMN..plan.width() {
        outline_empty_runs(&mut grid, column);
    }

    grid
}

fn header_row(plan: &ColumnPlan) -> Row {
    let mut row = vec![
        Cell::new(ID_HEADER, StyleTag::HeaderLight),
        Cell::new(CONTEXT_HEADER, StyleTag::Header),
        Cell::new(SOURCE_HEADER, StyleTag::Header),
    ];
    row.extend(
        plan.translation_headers
            .iter()
            .map(|header| Cell::new(header.as_str(), StyleTag::Header)),
    );
    row
}

fn message_row(id: i64, message: &Message, plan: &ColumnPlan) -> Row {
    let context = if message.obsolete {
        CellValue::from(OBSOLETE_MARKER)
    } else {
        message
            .context
            .as_deref()
            .map(CellValue::from)
            .unwrap_or_default()
    };

    let mut row = vec![
        Cell::new(id, StyleTag::Id),
        Cell::new(context, StyleTag::Context),
        Cell::new(message.translation.source_text(), StyleTag::MsgId),
    ];

    let columns = plan.translation_columns();
    match &message.translation {
        Translation::Singular { target_text, .. } => {
            let style = target_style(message.obsolete, target_text.is_empty());
            row.push(Cell::new(target_text.as_str(), style));
            row.extend((1..columns).map(|_| Cell::empty()));
        }
        Translation::Plural { target_by_form, .. } => {
            let forms: Vec<&str> = (0..columns)
                .map(|form| target_by_form.get(&form).map_or("", String::as_str))
                .collect();
            let style = target_style(message.obsolete, forms.iter().any(|f| f.is_empty()));
            row.extend(forms.into_iter().map(|form| Cell::new(form, style)));
        }
    }

    row
}

/// Obsolete wins over the needs-translation highlight, which wins over the default
fn target_style(obsolete: bool, any_empty: bool) -> StyleTag {
    if obsolete {
        StyleTag::MsgStrObsolete
    } else if any_empty {
        StyleTag::MsgStrEmpty
    } else {
        StyleTag::MsgStr
    }
}

/// Draw a box around each vertical run of needs-translation cells in `column`
fn outline_empty_runs(grid: &mut Grid, column: usize) {
    let is_empty_style = |row: &Row| {
        row.get(column)
            .is_some_and(|cell| cell.style == Some(StyleTag::MsgStrEmpty))
    };

    let mut start = 1;
    while start < grid.len() {
        if !is_empty_style(&grid[start]) {
            start += 1;
            continue;
        }

        let mut end = start;
        while end + 1 < grid.len() && is_empty_style(&grid[end + 1]) {
            end += 1;
        }

        for row in start..=end {
            let border = if start == end {
                Border::Box
            } else if row == start {
                Border::Top
            } else if row == end {
                Border::Bottom
            } else {
                Border::Sides
            };
            grid[row][column].border = Some(border);
        }

        start = end + 1;
    }
}
