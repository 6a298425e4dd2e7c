//! Two-level header flattening
//!
//! The data sheet carries a group label row (often merged across several
//! columns) above a field label row. Each column gets one identifier made of
//! both labels joined by a space, e.g. `Chandra Mohan Sales as on date`.
//!
//! Blank header cells are resolved before joining:
//! - the group row is forward-filled, so a merged label covers its whole span
//! - the field row is forward-filled only under columns whose group cell was
//!   blank, i.e. inside a group continuation
//! - anything still blank becomes `Unnamed: {col}_level_{level}`

use crate::error::{UpdaterError, UpdaterResult};

/// Flattened column identifiers in physical column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSchema {
    identifiers: Vec<String>,
}

impl HeaderSchema {
    /// Build the schema from the two raw header rows. Shorter rows are padded
    /// with blanks up to `width`.
    pub fn flatten(top: &[Option<String>], sub: &[Option<String>], width: usize) -> Self {
        let width = width.max(top.len()).max(sub.len());
        let mut levels = [pad(top, width), pad(sub, width)];

        let mut control = vec![true; width];
        for level in levels.iter_mut() {
            fill_level(level, &mut control);
        }

        let identifiers = (0..width)
            .map(|col| {
                let parts: Vec<String> = levels
                    .iter()
                    .enumerate()
                    .map(|(level, row)| match &row[col] {
                        Some(label) => label.trim().to_string(),
                        None => format!("Unnamed: {}_level_{}", col, level),
                    })
                    .filter(|label| !label.is_empty())
                    .collect();
                parts.join(" ").trim().to_string()
            })
            .collect();

        Self { identifiers }
    }

    pub fn from_identifiers(identifiers: Vec<String>) -> Self {
        Self { identifiers }
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// 0-based position of `identifier`; the first occurrence wins.
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.identifiers.iter().position(|id| id == identifier)
    }

    /// Fail on the first identifier in `required` that the header lacks.
    pub fn require(&self, required: &[&str], sheet: &str) -> UpdaterResult<()> {
        for identifier in required {
            if self.position(identifier).is_none() {
                return Err(UpdaterError::MissingColumn(
                    identifier.to_string(),
                    sheet.to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn pad(row: &[Option<String>], width: usize) -> Vec<Option<String>> {
    let mut padded: Vec<Option<String>> = row
        .iter()
        .map(|cell| cell.clone().filter(|s| !s.is_empty()))
        .collect();
    padded.resize(width, None);
    padded
}

/// Forward-fill one header level. `control[i]` stays true while column `i`
/// has only seen blanks in the levels above, which is what allows the fill
/// to continue downward inside a merged group.
fn fill_level(row: &mut [Option<String>], control: &mut [bool]) {
    let Some(first) = row.first() else {
        return;
    };
    let mut last = first.clone();

    for i in 1..row.len() {
        if !control[i] {
            last = row[i].clone();
        }
        if row[i].is_none() {
            row[i] = last.clone();
        } else {
            control[i] = false;
            last = row[i].clone();
        }
    }
}
