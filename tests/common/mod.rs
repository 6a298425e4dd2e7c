//! Workbook fixtures shared by the integration tests
//!
//! Workbooks are generated in memory with rust_xlsxwriter and read back with
//! calamine, so the updater never checks its own output with its own reader.

#![allow(dead_code)]

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;

pub const COMPANY_COLUMN: &str = "Name of the Company Unnamed: 1_level_1";
pub const VARIETY_COLUMN: &str = "Name of the Hybrid Unnamed: 2_level_1";

/// Stock lives in column D, sales in column E, balance formula in column F.
pub const STOCK_COL: u32 = 4;
pub const SALES_COL: u32 = 5;
pub const BALANCE_COL: u32 = 6;

#[derive(Debug, Clone, Copy)]
pub enum Value {
    Number(f64),
    Text(&'static str),
    Formula(&'static str),
    Bool(bool),
    /// Serial date number shown through a `yyyy-mm-dd` format
    Date(f64),
    Blank,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub company: &'static str,
    pub variety: &'static str,
    pub stock: Value,
    pub sales: Value,
}

pub fn entry(company: &'static str, variety: &'static str, stock: f64, sales: f64) -> Entry {
    Entry {
        company,
        variety,
        stock: Value::Number(stock),
        sales: Value::Number(sales),
    }
}

/// Daily sales workbook: `SPECILA` with the two-row header and a balance
/// formula per row, plus a `total` sheet summing the stock column.
pub fn sales_workbook(entries: &[Entry]) -> Vec<u8> {
    build_workbook(entries, &["SPECILA", "total"])
}

/// The single-row workbook of the end-to-end scenario
pub fn agrico_workbook() -> Vec<u8> {
    sales_workbook(&[entry("AgriCo", "Hybrid-9", 100.0, 50.0)])
}

/// Same data sheet, but only the listed sheets are created.
pub fn build_workbook(entries: &[Entry], sheets: &[&str]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for &name in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).unwrap();

        if name == "total" {
            sheet.write_string_with_format(0, 0, "Total stock", &bold).unwrap();
            sheet.write_formula(0, 1, "=SUM(SPECILA!D3:D100)").unwrap();
            continue;
        }

        sheet.write_string_with_format(0, 0, "Sl No", &bold).unwrap();
        sheet
            .write_string_with_format(0, 1, "Name of the Company", &bold)
            .unwrap();
        sheet
            .write_string_with_format(0, 2, "Name of the Hybrid", &bold)
            .unwrap();
        sheet.merge_range(0, 3, 0, 4, "Chandra Mohan", &bold).unwrap();
        sheet.write_string_with_format(0, 5, "Balance", &bold).unwrap();
        sheet
            .write_string_with_format(1, 3, "Stock positioned as on date", &bold)
            .unwrap();
        sheet
            .write_string_with_format(1, 4, "Sales as on date", &bold)
            .unwrap();

        for (i, e) in entries.iter().enumerate() {
            let row = i as u32 + 2;
            sheet.write_number(row, 0, (i + 1) as f64).unwrap();
            sheet.write_string(row, 1, e.company).unwrap();
            sheet.write_string(row, 2, e.variety).unwrap();
            write_value(sheet, row, 3, e.stock);
            write_value(sheet, row, 4, e.sales);
            let excel_row = row + 1;
            sheet
                .write_formula(row, 5, format!("=D{}-E{}", excel_row, excel_row).as_str())
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Data sheet with arbitrary header rows and text rows, plus `total`.
pub fn custom_workbook(top: &[&str], sub: &[&str], rows: &[Vec<Value>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("SPECILA").unwrap();
        for (col, label) in top.iter().enumerate() {
            if !label.is_empty() {
                sheet.write_string(0, col as u16, *label).unwrap();
            }
        }
        for (col, label) in sub.iter().enumerate() {
            if !label.is_empty() {
                sheet.write_string(1, col as u16, *label).unwrap();
            }
        }
        for (i, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                write_value(sheet, i as u32 + 2, col as u16, *value);
            }
        }
    }
    workbook.add_worksheet().set_name("total").unwrap();
    workbook.save_to_buffer().unwrap()
}

fn write_value(sheet: &mut rust_xlsxwriter::Worksheet, row: u32, col: u16, value: Value) {
    match value {
        Value::Number(n) => {
            sheet.write_number(row, col, n).unwrap();
        }
        Value::Text(s) => {
            sheet.write_string(row, col, s).unwrap();
        }
        Value::Formula(f) => {
            sheet.write_formula(row, col, f).unwrap();
        }
        Value::Bool(b) => {
            sheet.write_boolean(row, col, b).unwrap();
        }
        Value::Date(serial) => {
            let date = Format::new().set_num_format("yyyy-mm-dd");
            sheet.write_number_with_format(row, col, serial, &date).unwrap();
        }
        Value::Blank => {}
    }
}

fn open(bytes: &[u8]) -> Xlsx<Cursor<&[u8]>> {
    Xlsx::new(Cursor::new(bytes)).unwrap()
}

/// Cell value at a 1-based (row, col) address
pub fn read_cell(bytes: &[u8], sheet: &str, row: u32, col: u32) -> Data {
    let range = open(bytes).worksheet_range(sheet).unwrap();
    range
        .get_value((row - 1, col - 1))
        .cloned()
        .unwrap_or(Data::Empty)
}

/// Numeric value at a 1-based (row, col) address
pub fn read_number(bytes: &[u8], sheet: &str, row: u32, col: u32) -> f64 {
    match read_cell(bytes, sheet, row, col) {
        Data::Float(f) => f,
        Data::Int(i) => i as f64,
        Data::DateTime(d) => d.as_f64(),
        other => panic!("expected a number at ({}, {}), got {:?}", row, col, other),
    }
}

/// Formula text (without `=`) at a 1-based (row, col) address
pub fn read_formula(bytes: &[u8], sheet: &str, row: u32, col: u32) -> Option<String> {
    let range = open(bytes).worksheet_formula(sheet).ok()?;
    range
        .get_value((row - 1, col - 1))
        .filter(|f| !f.is_empty())
        .cloned()
}

pub fn sheet_names(bytes: &[u8]) -> Vec<String> {
    open(bytes).sheet_names()
}
