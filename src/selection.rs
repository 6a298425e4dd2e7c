//! Choice lists derived from the tabular view

use crate::config::LayoutConfig;
use crate::excel::TabularView;
use crate::types::UpdateTarget;

/// Distinct non-missing companies, in first-occurrence order.
pub fn companies(view: &TabularView, layout: &LayoutConfig) -> Vec<String> {
    let Some(col) = view.column(&layout.company_column) else {
        return Vec::new();
    };
    distinct(view.column_values(col))
}

/// Distinct non-missing varieties among rows of `company`, in first-occurrence order.
pub fn varieties(view: &TabularView, layout: &LayoutConfig, company: &str) -> Vec<String> {
    let (Some(company_col), Some(variety_col)) = (
        view.column(&layout.company_column),
        view.column(&layout.variety_column),
    ) else {
        return Vec::new();
    };

    distinct(
        view.column_values(company_col)
            .zip(view.column_values(variety_col))
            .filter(|(c, _)| *c == Some(company))
            .map(|(_, v)| v),
    )
}

/// The fixed update-target choices
pub fn targets() -> Vec<UpdateTarget> {
    UpdateTarget::ALL.to_vec()
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values.flatten() {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
