//! Style-preserving workbook mutation (umya-spreadsheet)
//!
//! calamine is read-only, so the original bytes are re-opened here as a full
//! cell grid. Only the cells written through [`WorkbookEditor::write_number`]
//! change; every other cell, formula and style is carried over on save.

use crate::config::LayoutConfig;
use crate::error::{UpdaterError, UpdaterResult};
use crate::excel::address::CellAddress;
use crate::excel::number_format::is_date_format;
use crate::excel::table::TabularView;
use crate::types::{
    plan_write, CellKind, ExistingValue, FieldChange, SkipReason, SkippedField, UpdateReport,
    UpdateTarget, WriteOutcome,
};
use std::io::Cursor;
use tracing::{debug, info, warn};
use umya_spreadsheet::{Cell, Spreadsheet};

pub struct WorkbookEditor {
    book: Spreadsheet,
}

impl WorkbookEditor {
    pub fn open(bytes: &[u8]) -> UpdaterResult<Self> {
        let book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
            .map_err(|e| UpdaterError::Workbook(format!("Failed to open Excel file: {}", e)))?;
        Ok(Self { book })
    }

    pub fn has_sheet(&mut self, sheet: &str) -> bool {
        self.book.get_sheet_by_name_mut(sheet).is_some()
    }

    /// Current content of a cell, classified for the write policy
    pub fn existing_value(
        &mut self,
        sheet: &str,
        address: CellAddress,
    ) -> UpdaterResult<ExistingValue> {
        let worksheet = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| UpdaterError::MissingSheet(sheet.to_string()))?;

        Ok(match worksheet.get_cell(address.col_row()) {
            Some(cell) => classify_cell(cell),
            None => ExistingValue::Missing,
        })
    }

    pub fn write_number(
        &mut self,
        sheet: &str,
        address: CellAddress,
        value: f64,
    ) -> UpdaterResult<()> {
        let worksheet = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| UpdaterError::MissingSheet(sheet.to_string()))?;
        worksheet
            .get_cell_mut(address.col_row())
            .set_value_number(value);
        Ok(())
    }

    /// Serialize the workbook back to xlsx bytes
    pub fn to_bytes(&self) -> UpdaterResult<Vec<u8>> {
        let mut buffer = Vec::new();
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, Cursor::new(&mut buffer))
            .map_err(|e| UpdaterError::Workbook(format!("Failed to write Excel file: {}", e)))?;
        Ok(buffer)
    }
}

/// Booleans count as 1/0 and date-formatted numbers are not quantities, so
/// the stored type decides before the displayed text is parsed.
fn classify_cell(cell: &Cell) -> ExistingValue {
    let formula = cell.get_formula();
    let kind = match cell.get_data_type() {
        "b" => CellKind::Boolean,
        "n" if has_date_format(cell) => CellKind::DateTime,
        _ => CellKind::General,
    };

    match kind {
        CellKind::DateTime => {
            ExistingValue::classify_typed(kind, &cell.get_formatted_value(), formula)
        }
        _ => ExistingValue::classify_typed(kind, &cell.get_value(), formula),
    }
}

fn has_date_format(cell: &Cell) -> bool {
    cell.get_style()
        .get_number_format()
        .is_some_and(|format| is_date_format(format.get_format_code()))
}

/// Add `increments` to the row keyed by (`company`, `variety`).
///
/// Zero increments are skipped without touching the cell. A target whose
/// column cannot be resolved is skipped with a warning and the remaining
/// targets are still applied.
pub fn apply_increments(
    view: &TabularView,
    layout: &LayoutConfig,
    editor: &mut WorkbookEditor,
    company: &str,
    variety: &str,
    increments: &[(UpdateTarget, u64)],
) -> UpdaterResult<UpdateReport> {
    let company_col = view.column(&layout.company_column).ok_or_else(|| {
        UpdaterError::MissingColumn(layout.company_column.clone(), view.sheet().to_string())
    })?;
    let variety_col = view.column(&layout.variety_column).ok_or_else(|| {
        UpdaterError::MissingColumn(layout.variety_column.clone(), view.sheet().to_string())
    })?;

    let index = view
        .find_row((company_col, variety_col), (company, variety))
        .ok_or_else(|| UpdaterError::SelectionNotFound {
            company: company.to_string(),
            variety: variety.to_string(),
        })?;

    if !editor.has_sheet(view.sheet()) {
        return Err(UpdaterError::MissingSheet(view.sheet().to_string()));
    }

    let row = CellAddress::from_table_position(index, 0).row;
    debug!(company, variety, row, "resolved selection");

    let mut changes = Vec::new();
    let mut skipped = Vec::new();

    for &(target, increment) in increments {
        if increment == 0 {
            skipped.push(SkippedField {
                target,
                reason: SkipReason::ZeroIncrement,
            });
            continue;
        }

        let column = layout.column_for(target);
        let Some(position) = view.column(column) else {
            warn!(%target, column, "column not found in sheet; skipping");
            skipped.push(SkippedField {
                target,
                reason: SkipReason::ColumnMissing {
                    column: column.to_string(),
                },
            });
            continue;
        };

        let address = CellAddress::from_table_position(index, position);
        let existing = editor.existing_value(view.sheet(), address)?;
        let write = plan_write(&existing, increment);

        if let WriteOutcome::Overwrote { discarded } = &write.outcome {
            warn!(
                %target,
                cell = %address,
                discarded = discarded.as_str(),
                "existing value is not numeric; overwriting with the increment"
            );
        }

        editor.write_number(view.sheet(), address, write.value)?;
        info!(%target, cell = %address, increment, value = write.value, "updated cell");

        changes.push(FieldChange {
            target,
            column: column.to_string(),
            address: address.to_string(),
            increment,
            value: write.value,
            outcome: write.outcome,
        });
    }

    Ok(UpdateReport {
        company: company.to_string(),
        variety: variety.to_string(),
        row,
        changes,
        skipped,
    })
}
