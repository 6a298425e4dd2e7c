//! One operator session over one uploaded workbook
//!
//! The session owns the uploaded bytes and the tabular view parsed from them.
//! Operator state lives in [`Selections`]: every step takes the previous
//! selections and returns the next ones, so a caller (CLI, HTTP handler, UI)
//! can rebuild the same state from explicit input at any point.

use crate::config::LayoutConfig;
use crate::delivery::UpdatedWorkbook;
use crate::error::{UpdaterError, UpdaterResult};
use crate::excel::{apply_increments, open_tabular_view, TabularView, WorkbookEditor};
use crate::selection;
use crate::types::{Selections, UpdateReport, UpdateTarget};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub struct UpdateSession {
    layout: LayoutConfig,
    bytes: Vec<u8>,
    view: TabularView,
}

impl UpdateSession {
    /// Validate the upload (required sheets and columns) and parse the data sheet.
    pub fn open(bytes: Vec<u8>, layout: LayoutConfig) -> UpdaterResult<Self> {
        let view = open_tabular_view(&bytes, &layout)?;
        Ok(Self {
            layout,
            bytes,
            view,
        })
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn view(&self) -> &TabularView {
        &self.view
    }

    pub fn companies(&self) -> Vec<String> {
        selection::companies(&self.view, &self.layout)
    }

    pub fn varieties(&self, company: &str) -> Vec<String> {
        selection::varieties(&self.view, &self.layout, company)
    }

    /// Starting state: first company, its first variety, both targets, zero amounts.
    pub fn initial_selections(&self) -> Selections {
        let company = self.companies().into_iter().next();
        let variety = company
            .as_deref()
            .and_then(|c| self.varieties(c).into_iter().next());

        Selections {
            company,
            variety,
            ..Selections::default()
        }
    }

    /// Select a company. The variety list is rebuilt for it, so the variety
    /// always resets to the company's first one.
    pub fn choose_company(&self, prior: Selections, company: &str) -> UpdaterResult<Selections> {
        if !self.companies().iter().any(|c| c == company) {
            return Err(UpdaterError::UnknownChoice {
                kind: "company",
                value: company.to_string(),
            });
        }

        Ok(Selections {
            company: Some(company.to_string()),
            variety: self.varieties(company).into_iter().next(),
            ..prior
        })
    }

    pub fn choose_variety(&self, prior: Selections, variety: &str) -> UpdaterResult<Selections> {
        let company = prior.company.as_deref().ok_or(UpdaterError::NothingSelected("company"))?;
        if !self.varieties(company).iter().any(|v| v == variety) {
            return Err(UpdaterError::UnknownChoice {
                kind: "variety",
                value: variety.to_string(),
            });
        }

        Ok(Selections {
            variety: Some(variety.to_string()),
            ..prior
        })
    }

    /// Replace the target set. An empty set is accepted here and rejected
    /// when the update is confirmed, so the operator can correct it.
    pub fn choose_targets(&self, prior: Selections, targets: BTreeSet<UpdateTarget>) -> Selections {
        Selections { targets, ..prior }
    }

    pub fn set_increment(&self, mut prior: Selections, target: UpdateTarget, amount: u64) -> Selections {
        prior.increments.set(target, amount);
        prior
    }

    /// Apply the selections to a fresh copy of the workbook without
    /// serializing it.
    pub fn preview(&self, selections: &Selections) -> UpdaterResult<UpdateReport> {
        let (_, report) = self.apply(selections)?;
        Ok(report)
    }

    /// Apply the selections and serialize the result for download.
    pub fn confirm(&self, selections: &Selections, date: NaiveDate) -> UpdaterResult<UpdatedWorkbook> {
        let (editor, report) = self.apply(selections)?;
        let bytes = editor.to_bytes()?;
        Ok(UpdatedWorkbook::new(bytes, report, date))
    }

    fn apply(&self, selections: &Selections) -> UpdaterResult<(WorkbookEditor, UpdateReport)> {
        if selections.targets.is_empty() {
            return Err(UpdaterError::NoTargetsSelected);
        }
        let company = selections
            .company
            .as_deref()
            .ok_or(UpdaterError::NothingSelected("company"))?;
        let variety = selections
            .variety
            .as_deref()
            .ok_or(UpdaterError::NothingSelected("variety"))?;

        let mut editor = WorkbookEditor::open(&self.bytes)?;
        let report = apply_increments(
            &self.view,
            &self.layout,
            &mut editor,
            company,
            variety,
            &selections.planned_increments(),
        )?;
        Ok((editor, report))
    }
}
