//! Physical cell addressing for the data sheet

use std::fmt;

/// Rows consumed by the two-level header
pub const HEADER_ROWS: u32 = 2;

/// 1-based worksheet coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Address of a tabular-view cell: data row `index` (0-based, below the
    /// header) and column `position` (0-based, in flattened-header order).
    pub fn from_table_position(index: usize, position: usize) -> Self {
        Self {
            row: index as u32 + HEADER_ROWS + 1,
            col: position as u32 + 1,
        }
    }

    /// `(col, row)` as umya-spreadsheet expects it
    pub fn col_row(&self) -> (u32, u32) {
        (self.col, self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col.saturating_sub(1) as usize), self.row)
    }
}

/// Convert a 0-based column index to Excel letters (0→A, 25→Z, 26→AA)
pub fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_first_data_row_is_row_three() {
        let addr = CellAddress::from_table_position(0, 3);
        assert_eq!(addr, CellAddress::new(3, 4));
        assert_eq!(addr.to_string(), "D3");
        assert_eq!(addr.col_row(), (4, 3));
    }

    #[test]
    fn test_table_position_offsets() {
        assert_eq!(CellAddress::from_table_position(9, 0).to_string(), "A12");
        assert_eq!(CellAddress::from_table_position(1, 27).to_string(), "AB4");
    }
}
