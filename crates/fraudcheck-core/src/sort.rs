//! Sort engine.
//!
//! Rows are stably sorted ascending by the column's key, starting from the
//! order they are currently shown in. Descending is that ascending result
//! reversed, so rows with equal keys also swap their relative order.

use std::fmt;

use crate::column::{ColumnId, cell_value};
use crate::dataset::DatasetSnapshot;
use crate::sort_key::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Crescente",
            SortDirection::Descending => "Decrescente",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<ColumnId>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the same column flips direction, a new column starts
    /// ascending.
    pub fn click(&mut self, column: ColumnId) {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Reorder `current` (indices into the snapshot) by a column.
pub fn sort_indices(
    snapshot: &DatasetSnapshot,
    current: &[usize],
    column: ColumnId,
    direction: SortDirection,
) -> Vec<usize> {
    let kind = column.kind();
    let mut keyed: Vec<(SortKey, usize)> = current
        .iter()
        .filter_map(|&i| {
            let record = snapshot.get(i)?;
            Some((SortKey::from_display(kind, &cell_value(record, column)), i))
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.compare(b));
    if direction == SortDirection::Descending {
        keyed.reverse();
    }
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Sort the whole snapshot from ingestion order and return record ids.
pub fn sort(snapshot: &DatasetSnapshot, column: ColumnId, direction: SortDirection) -> Vec<String> {
    let all: Vec<usize> = (0..snapshot.len()).collect();
    sort_indices(snapshot, &all, column, direction)
        .into_iter()
        .filter_map(|i| snapshot.get(i).map(|r| r.id.clone()))
        .collect()
}
