use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Update targets
//==============================================================================

/// One of the two numeric fields an operator can add to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpdateTarget {
    Stock,
    Sales,
}

impl UpdateTarget {
    /// The fixed choice set, in display order
    pub const ALL: [UpdateTarget; 2] = [UpdateTarget::Stock, UpdateTarget::Sales];

    pub fn label(&self) -> &'static str {
        match self {
            UpdateTarget::Stock => "Stock",
            UpdateTarget::Sales => "Sales",
        }
    }

    /// Parse a comma separated list such as `"Stock,Sales"`, ignoring blanks.
    pub fn parse_list(input: &str) -> Result<BTreeSet<UpdateTarget>, String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(UpdateTarget::from_str)
            .collect()
    }
}

impl fmt::Display for UpdateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UpdateTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock" => Ok(UpdateTarget::Stock),
            "sales" => Ok(UpdateTarget::Sales),
            other => Err(format!(
                "unknown update target '{}' (expected Stock or Sales)",
                other
            )),
        }
    }
}

//==============================================================================
// Operator selections
//==============================================================================

/// Amounts to add, one per target. Zero means "leave the field alone".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Increments {
    pub stock: u64,
    pub sales: u64,
}

impl Increments {
    pub fn get(&self, target: UpdateTarget) -> u64 {
        match target {
            UpdateTarget::Stock => self.stock,
            UpdateTarget::Sales => self.sales,
        }
    }

    pub fn set(&mut self, target: UpdateTarget, amount: u64) {
        match target {
            UpdateTarget::Stock => self.stock = amount,
            UpdateTarget::Sales => self.sales = amount,
        }
    }
}

/// Everything the operator has chosen so far.
///
/// Each session step takes the previous `Selections` by value and hands back
/// the updated one; nothing is kept between steps apart from this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    pub company: Option<String>,
    pub variety: Option<String>,
    pub targets: BTreeSet<UpdateTarget>,
    pub increments: Increments,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            company: None,
            variety: None,
            targets: UpdateTarget::ALL.into_iter().collect(),
            increments: Increments::default(),
        }
    }
}

impl Selections {
    /// Increments for the selected targets only, in target order.
    pub fn planned_increments(&self) -> Vec<(UpdateTarget, u64)> {
        self.targets
            .iter()
            .map(|t| (*t, self.increments.get(*t)))
            .collect()
    }
}

//==============================================================================
// Cell write policy
//==============================================================================

/// Stored type of a target cell, as far as the write policy is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Text, plain numbers and blanks
    General,
    /// `TRUE`/`FALSE`; counts as 1 or 0
    Boolean,
    /// A number displayed through a date or time format. Not a quantity.
    DateTime,
}

/// What a target cell held before the update
#[derive(Debug, Clone, PartialEq)]
pub enum ExistingValue {
    Missing,
    Numeric(f64),
    NonNumeric(String),
}

impl ExistingValue {
    /// Classify a cell from its displayed value and formula text.
    ///
    /// Formula cells are never numeric: their content is the formula itself.
    pub fn classify(value: &str, formula: &str) -> Self {
        if !formula.is_empty() {
            return ExistingValue::NonNumeric(format!("={}", formula.trim_start_matches('=')));
        }
        if value.is_empty() {
            return ExistingValue::Missing;
        }
        match value.trim().parse::<f64>() {
            Ok(n) => ExistingValue::Numeric(n),
            Err(_) => ExistingValue::NonNumeric(value.to_string()),
        }
    }

    /// Classify a cell whose stored type is known. `value` is the displayed
    /// text (`TRUE`, `2024-01-01`, `40`, ...).
    pub fn classify_typed(kind: CellKind, value: &str, formula: &str) -> Self {
        if !formula.is_empty() || value.is_empty() {
            return Self::classify(value, formula);
        }
        match kind {
            CellKind::General => Self::classify(value, formula),
            CellKind::Boolean => {
                let truthy = value.eq_ignore_ascii_case("true") || value.trim() == "1";
                ExistingValue::Numeric(if truthy { 1.0 } else { 0.0 })
            }
            CellKind::DateTime => ExistingValue::NonNumeric(value.to_string()),
        }
    }
}

/// How the new value of a cell came about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The cell was empty; the increment was written as is
    Initialized,
    /// The increment was added to the existing number
    Accumulated { previous: f64 },
    /// Non-numeric content was replaced by the increment
    Overwrote { discarded: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub value: f64,
    pub outcome: WriteOutcome,
}

/// Decide the value to store for `increment` given what the cell holds now.
pub fn plan_write(existing: &ExistingValue, increment: u64) -> CellWrite {
    let amount = increment as f64;
    match existing {
        ExistingValue::Missing => CellWrite {
            value: amount,
            outcome: WriteOutcome::Initialized,
        },
        ExistingValue::Numeric(previous) => CellWrite {
            value: previous + amount,
            outcome: WriteOutcome::Accumulated {
                previous: *previous,
            },
        },
        ExistingValue::NonNumeric(raw) => CellWrite {
            value: amount,
            outcome: WriteOutcome::Overwrote {
                discarded: raw.clone(),
            },
        },
    }
}

//==============================================================================
// Update report
//==============================================================================

/// One cell written by an update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub target: UpdateTarget,
    pub column: String,
    /// A1 address, e.g. `D3`
    pub address: String,
    pub increment: u64,
    pub value: f64,
    pub outcome: WriteOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    ZeroIncrement,
    ColumnMissing { column: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub target: UpdateTarget,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Summary of one confirmed update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateReport {
    pub company: String,
    pub variety: String,
    /// 1-based worksheet row of the matched entry
    pub row: u32,
    pub changes: Vec<FieldChange>,
    pub skipped: Vec<SkippedField>,
}

impl UpdateReport {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn addresses(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.address.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse_case_insensitive() {
        assert_eq!("stock".parse::<UpdateTarget>(), Ok(UpdateTarget::Stock));
        assert_eq!(" SALES ".parse::<UpdateTarget>(), Ok(UpdateTarget::Sales));
        assert!("price".parse::<UpdateTarget>().is_err());
    }

    #[test]
    fn test_target_parse_list() {
        let targets = UpdateTarget::parse_list("Sales, stock").unwrap();
        assert_eq!(
            targets.into_iter().collect::<Vec<_>>(),
            vec![UpdateTarget::Stock, UpdateTarget::Sales]
        );
        assert!(UpdateTarget::parse_list("").unwrap().is_empty());
        assert!(UpdateTarget::parse_list("Stock,bogus").is_err());
    }

    #[test]
    fn test_selections_default_targets_both() {
        let selections = Selections::default();
        assert_eq!(selections.targets.len(), 2);
        assert_eq!(
            selections.planned_increments(),
            vec![(UpdateTarget::Stock, 0), (UpdateTarget::Sales, 0)]
        );
    }

    #[test]
    fn test_planned_increments_only_selected() {
        let mut selections = Selections::default();
        selections.increments.set(UpdateTarget::Stock, 7);
        selections.increments.set(UpdateTarget::Sales, 3);
        selections.targets.remove(&UpdateTarget::Stock);
        assert_eq!(
            selections.planned_increments(),
            vec![(UpdateTarget::Sales, 3)]
        );
    }

    #[test]
    fn test_classify_existing_values() {
        assert_eq!(ExistingValue::classify("", ""), ExistingValue::Missing);
        assert_eq!(ExistingValue::classify("100", ""), ExistingValue::Numeric(100.0));
        assert_eq!(ExistingValue::classify(" 12.5 ", ""), ExistingValue::Numeric(12.5));
        assert_eq!(
            ExistingValue::classify("n/a", ""),
            ExistingValue::NonNumeric("n/a".to_string())
        );
        assert_eq!(
            ExistingValue::classify("30", "SUM(A1:A2)"),
            ExistingValue::NonNumeric("=SUM(A1:A2)".to_string())
        );
    }

    #[test]
    fn test_classify_typed_cells() {
        assert_eq!(
            ExistingValue::classify_typed(CellKind::Boolean, "TRUE", ""),
            ExistingValue::Numeric(1.0)
        );
        assert_eq!(
            ExistingValue::classify_typed(CellKind::Boolean, "FALSE", ""),
            ExistingValue::Numeric(0.0)
        );
        assert_eq!(
            ExistingValue::classify_typed(CellKind::DateTime, "2024-01-01", ""),
            ExistingValue::NonNumeric("2024-01-01".to_string())
        );
        assert_eq!(
            ExistingValue::classify_typed(CellKind::DateTime, "", ""),
            ExistingValue::Missing
        );
        assert_eq!(
            ExistingValue::classify_typed(CellKind::General, "40", ""),
            ExistingValue::Numeric(40.0)
        );
        assert_eq!(
            ExistingValue::classify_typed(CellKind::Boolean, "TRUE", "A1>0"),
            ExistingValue::NonNumeric("=A1>0".to_string())
        );
    }

    #[test]
    fn test_plan_write_policies() {
        assert_eq!(
            plan_write(&ExistingValue::Missing, 5),
            CellWrite {
                value: 5.0,
                outcome: WriteOutcome::Initialized
            }
        );
        assert_eq!(
            plan_write(&ExistingValue::Numeric(100.0), 25),
            CellWrite {
                value: 125.0,
                outcome: WriteOutcome::Accumulated { previous: 100.0 }
            }
        );
        assert_eq!(
            plan_write(&ExistingValue::NonNumeric("pending".to_string()), 9),
            CellWrite {
                value: 9.0,
                outcome: WriteOutcome::Overwrote {
                    discarded: "pending".to_string()
                }
            }
        );
    }

    #[test]
    fn test_plan_write_accumulates_sequentially() {
        let once = plan_write(&ExistingValue::Numeric(10.0), 12);
        let first = plan_write(&ExistingValue::Numeric(10.0), 5);
        let second = plan_write(&ExistingValue::Numeric(first.value), 7);
        assert_eq!(once.value, second.value);
    }
}
