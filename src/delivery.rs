//! Output naming and packaging of the updated workbook

use crate::types::UpdateReport;
use chrono::{Local, NaiveDate};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `updated_sales_<YYYY-MM-DD>.xlsx`
pub fn output_file_name(date: NaiveDate) -> String {
    format!("updated_sales_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Today's date on the local calendar
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A serialized workbook ready for download
#[derive(Debug, Clone)]
pub struct UpdatedWorkbook {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub report: UpdateReport,
}

impl UpdatedWorkbook {
    pub fn new(bytes: Vec<u8>, report: UpdateReport, date: NaiveDate) -> Self {
        Self {
            file_name: output_file_name(date),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
            report,
        }
    }

    /// `Content-Disposition` value for an attachment download
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}
