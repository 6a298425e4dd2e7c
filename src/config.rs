//! Workbook layout configuration
//!
//! Names the sheets and flattened column identifiers the updater relies on.
//! The defaults match the daily sales workbook; a YAML file can override any
//! subset of them.

use crate::error::UpdaterResult;
use crate::types::UpdateTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sheet holding the company/variety rows
pub const DEFAULT_DATA_SHEET: &str = "SPECILA";
/// Companion sheet that must be present for the workbook to be accepted
pub const DEFAULT_SUMMARY_SHEET: &str = "total";

pub const DEFAULT_COMPANY_COLUMN: &str = "Name of the Company Unnamed: 1_level_1";
pub const DEFAULT_VARIETY_COLUMN: &str = "Name of the Hybrid Unnamed: 2_level_1";
pub const DEFAULT_STOCK_COLUMN: &str = "Chandra Mohan Stock positioned as on date";
pub const DEFAULT_SALES_COLUMN: &str = "Chandra Mohan Sales as on date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub data_sheet: String,
    /// Other sheets that must exist, checked before any parsing
    pub required_sheets: Vec<String>,
    pub company_column: String,
    pub variety_column: String,
    pub stock_column: String,
    pub sales_column: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            data_sheet: DEFAULT_DATA_SHEET.to_string(),
            required_sheets: vec![DEFAULT_SUMMARY_SHEET.to_string()],
            company_column: DEFAULT_COMPANY_COLUMN.to_string(),
            variety_column: DEFAULT_VARIETY_COLUMN.to_string(),
            stock_column: DEFAULT_STOCK_COLUMN.to_string(),
            sales_column: DEFAULT_SALES_COLUMN.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Load a layout from YAML; keys left out keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> UpdaterResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> UpdaterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> UpdaterResult<Self> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Every sheet the workbook must contain, data sheet first.
    pub fn all_required_sheets(&self) -> Vec<&str> {
        let mut sheets = vec![self.data_sheet.as_str()];
        for name in &self.required_sheets {
            if !sheets.contains(&name.as_str()) {
                sheets.push(name.as_str());
            }
        }
        sheets
    }

    /// The four identifiers the data sheet header must provide, in check order.
    pub fn required_columns(&self) -> [&str; 4] {
        [
            self.company_column.as_str(),
            self.variety_column.as_str(),
            self.stock_column.as_str(),
            self.sales_column.as_str(),
        ]
    }

    pub fn column_for(&self, target: UpdateTarget) -> &str {
        match target {
            UpdateTarget::Stock => &self.stock_column,
            UpdateTarget::Sales => &self.sales_column,
        }
    }
}
