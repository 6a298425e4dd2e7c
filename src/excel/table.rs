//! Read-only tabular view of the data sheet (calamine)

use crate::config::LayoutConfig;
use crate::error::{UpdaterError, UpdaterResult};
use crate::excel::address::HEADER_ROWS;
use crate::excel::header::HeaderSchema;
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;
use tracing::{debug, warn};

/// Flattened header plus every row below it, as display strings.
///
/// Row `i` of the view is worksheet row `i + 3`; blank rows are kept so the
/// mapping never drifts.
#[derive(Debug, Clone)]
pub struct TabularView {
    sheet: String,
    schema: HeaderSchema,
    rows: Vec<Vec<Option<String>>>,
}

impl TabularView {
    /// Build from a grid anchored at A1: the first two rows are the header.
    pub fn from_grid(sheet: impl Into<String>, mut grid: Vec<Vec<Option<String>>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        grid.resize(grid.len().max(HEADER_ROWS as usize), Vec::new());

        let rows = grid
            .split_off(HEADER_ROWS as usize)
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.filter(|v| !is_missing_marker(v)))
                    .collect()
            })
            .collect();
        let schema = HeaderSchema::flatten(&grid[0], &grid[1], width);

        Self {
            sheet: sheet.into(),
            schema,
            rows,
        }
    }

    pub fn from_range(sheet: impl Into<String>, range: &Range<Data>) -> Self {
        Self::from_grid(sheet, range_to_grid(range))
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn schema(&self) -> &HeaderSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, identifier: &str) -> Option<usize> {
        self.schema.position(identifier)
    }

    /// Non-missing value at data row `row`, column position `col`
    pub fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|v| v.as_deref())
    }

    /// Values of one column, `None` where the cell is missing
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.rows.len()).map(move |row| self.value(row, col))
    }

    /// First data row whose `key_cols` hold exactly `key_values`.
    pub fn find_row(&self, key_cols: (usize, usize), key_values: (&str, &str)) -> Option<usize> {
        let mut matches = (0..self.rows.len()).filter(|&row| {
            self.value(row, key_cols.0) == Some(key_values.0)
                && self.value(row, key_cols.1) == Some(key_values.1)
        });

        let first = matches.next()?;
        let extra = matches.count();
        if extra > 0 {
            warn!(
                sheet = %self.sheet,
                company = key_values.0,
                variety = key_values.1,
                duplicates = extra,
                "selection matches more than one row; using the first"
            );
        }
        Some(first)
    }
}

/// Open the uploaded bytes, check the required sheets and build the view of
/// the data sheet with its required columns present.
pub fn open_tabular_view(bytes: &[u8], layout: &LayoutConfig) -> UpdaterResult<TabularView> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| UpdaterError::Workbook(format!("Failed to open Excel file: {}", e)))?;

    let sheet_names = workbook.sheet_names();
    for required in layout.all_required_sheets() {
        if !sheet_names.iter().any(|name| name == required) {
            return Err(UpdaterError::MissingSheet(required.to_string()));
        }
    }

    let range = workbook
        .worksheet_range(&layout.data_sheet)
        .map_err(|e| {
            UpdaterError::Workbook(format!(
                "Failed to read sheet '{}': {}",
                layout.data_sheet, e
            ))
        })?;

    let view = TabularView::from_range(layout.data_sheet.clone(), &range);
    view.schema()
        .require(&layout.required_columns(), &layout.data_sheet)?;

    debug!(
        sheet = %layout.data_sheet,
        columns = view.schema().len(),
        rows = view.len(),
        "parsed data sheet"
    );
    Ok(view)
}

/// Copy a calamine range into a grid anchored at A1 (calamine ranges start at
/// the first used cell, which would shift physical positions).
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<Option<String>>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| range.get_value((row, col)).and_then(render_cell))
                .collect()
        })
        .collect()
}

/// Data cells holding one of these strings count as missing, like blanks.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Exact, case-sensitive match against [`MISSING_MARKERS`]
pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

/// Display string of a cell, `None` for blanks and error values.
pub fn render_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        other => Some(other.to_string()),
    }
}

/// Integral floats render without a fractional part (`2024`, not `2024.0`)
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
