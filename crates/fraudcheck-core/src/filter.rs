//! Filter engine: per-column allowed-value sets plus the fraud-suspicion filter.
//!
//! Filtering only computes a visibility mask. It never reorders or removes
//! records, so it composes with sorting in either order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::column::{ColumnId, cell_value};
use crate::dataset::DatasetSnapshot;
use crate::error::CoreError;
use crate::flags::{NAO, SIM, derive_flags};
use crate::record::ProcessRecord;

/// Scalar fraud-suspicion filter ("Todos" / "Sim" / "Não").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FraudFilter {
    #[default]
    All,
    Yes,
    No,
}

impl FraudFilter {
    pub fn label(self) -> &'static str {
        match self {
            FraudFilter::All => "Todos",
            FraudFilter::Yes => SIM,
            FraudFilter::No => NAO,
        }
    }

    fn admits(self, fraud_suspected: bool) -> bool {
        match self {
            FraudFilter::All => true,
            FraudFilter::Yes => fraud_suspected,
            FraudFilter::No => !fraud_suspected,
        }
    }
}

impl fmt::Display for FraudFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FraudFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" => Ok(FraudFilter::All),
            "yes" | "sim" => Ok(FraudFilter::Yes),
            "no" | "não" | "nao" => Ok(FraudFilter::No),
            other => Err(CoreError::Validation(format!(
                "filtro de suspeita inválido: {other}"
            ))),
        }
    }
}

/// Active filters.
///
/// A column is only present in the map while its allowed set is non-empty;
/// setting an empty set clears the column filter rather than hiding every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    columns: BTreeMap<ColumnId, BTreeSet<String>>,
    pub fraud: FraudFilter,
}

impl FilterState {
    /// Replace the allowed values of a column. An empty set clears it.
    pub fn set_column<I, S>(&mut self, column: ColumnId, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, allowed);
        }
    }

    pub fn clear_column(&mut self, column: ColumnId) {
        self.columns.remove(&column);
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.fraud = FraudFilter::All;
    }

    pub fn allowed(&self, column: ColumnId) -> Option<&BTreeSet<String>> {
        self.columns.get(&column)
    }

    pub fn is_active(&self, column: ColumnId) -> bool {
        self.columns.contains_key(&column)
    }

    /// Columns with an active filter and the number of values each allows.
    pub fn active_columns(&self) -> impl Iterator<Item = (ColumnId, usize)> + '_ {
        self.columns.iter().map(|(c, v)| (*c, v.len()))
    }

    /// Whether a single record passes every active filter.
    pub fn admits(&self, record: &ProcessRecord) -> bool {
        if self.fraud != FraudFilter::All && !self.fraud.admits(derive_flags(record).fraud_suspected)
        {
            return false;
        }
        self.columns
            .iter()
            .all(|(column, allowed)| allowed.contains(&cell_value(record, *column)))
    }
}

/// One flag per snapshot record, in ingestion order; `true` means shown.
pub fn apply_filters(snapshot: &DatasetSnapshot, state: &FilterState) -> Vec<bool> {
    snapshot.records().iter().map(|r| state.admits(r)).collect()
}

/// Sorted distinct non-empty display values of a column, for filter menus.
pub fn unique_values(snapshot: &DatasetSnapshot, column: ColumnId) -> Vec<String> {
    snapshot
        .records()
        .iter()
        .map(|r| cell_value(r, column))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Narrow a value list by a case-insensitive substring, as the filter menu's
/// search box does.
pub fn search_values<'a>(values: &'a [String], term: &str) -> Vec<&'a str> {
    let needle = term.to_lowercase();
    values
        .iter()
        .filter(|v| v.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}
