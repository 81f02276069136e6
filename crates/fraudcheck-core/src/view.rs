//! The tabular view engine: sole owner of the dataset snapshot and of the
//! sort, filter and open-panel state layered over it.

use serde_json::Value;
use tracing::{debug, info};

use crate::column::{ColumnId, cell_value, display_text};
use crate::dataset::{self, DatasetPayload, DatasetSnapshot, LoadOutcome};
use crate::detail::{DetailCard, DetailPanel, DetailPanels};
use crate::error::CoreError;
use crate::export::{self, ExportFormat};
use crate::filter::{self, FilterState, FraudFilter};
use crate::flags::{DerivedFlags, derive_flags};
use crate::record::ProcessRecord;
use crate::sort::{self, SortDirection, SortState};

/// A visible row handed to the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    pub record: &'a ProcessRecord,
    pub flags: DerivedFlags,
}

impl RowView<'_> {
    pub fn cell(&self, column: ColumnId) -> String {
        cell_value(self.record, column)
    }
}

#[derive(Debug, Default)]
pub struct TabularViewEngine {
    snapshot: DatasetSnapshot,
    /// Display order as indices into the snapshot.
    order: Vec<usize>,
    sort: SortState,
    filters: FilterState,
    panels: DetailPanels,
}

impl TabularViewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Dataset lifecycle ──

    /// Replace the whole snapshot. Sort and filter state are reset; open
    /// panels keep their own copy of the payload and survive.
    pub fn load(&mut self, payload: DatasetPayload) -> LoadOutcome {
        let (snapshot, outcome) = dataset::load(payload);
        self.order = (0..snapshot.len()).collect();
        self.snapshot = snapshot;
        self.sort = SortState::default();
        self.filters.clear();
        outcome
    }

    pub fn load_json(&mut self, json: &str) -> Result<LoadOutcome, CoreError> {
        Ok(self.load(DatasetPayload::from_json(json)?))
    }

    /// Drop the snapshot, reset sort and filters, and close every panel.
    pub fn clear(&mut self) {
        self.snapshot = DatasetSnapshot::default();
        self.order.clear();
        self.sort = SortState::default();
        self.filters.clear();
        self.panels.clear();
        info!("dataset cleared");
    }

    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    // ── Sorting ──

    /// Header click on a column.
    pub fn click_sort(&mut self, column: ColumnId) -> SortState {
        self.sort.click(column);
        self.reorder();
        self.sort
    }

    /// Sort by a column in an explicit direction.
    pub fn sort_by(&mut self, column: ColumnId, direction: SortDirection) -> SortState {
        self.sort = SortState {
            column: Some(column),
            direction,
        };
        self.reorder();
        self.sort
    }

    fn reorder(&mut self) {
        if let Some(column) = self.sort.column {
            self.order = sort::sort_indices(&self.snapshot, &self.order, column, self.sort.direction);
            debug!(%column, direction = %self.sort.direction, "rows sorted");
        }
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    // ── Filtering ──

    pub fn set_column_filter<I, S>(&mut self, column: ColumnId, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set_column(column, values);
        debug!(%column, active = self.filters.is_active(column), "column filter set");
    }

    pub fn clear_column_filter(&mut self, column: ColumnId) {
        self.filters.clear_column(column);
    }

    pub fn set_fraud_filter(&mut self, fraud: FraudFilter) {
        self.filters.fraud = fraud;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    /// Visibility per snapshot record, in ingestion order.
    pub fn visibility_mask(&self) -> Vec<bool> {
        filter::apply_filters(&self.snapshot, &self.filters)
    }

    pub fn unique_values(&self, column: ColumnId) -> Vec<String> {
        filter::unique_values(&self.snapshot, column)
    }

    pub fn active_filter_count(&self, column: ColumnId) -> usize {
        self.filters.allowed(column).map_or(0, |v| v.len())
    }

    // ── Read-only views ──

    /// Visible rows in display order, flags derived afresh.
    pub fn visible_rows(&self) -> Vec<RowView<'_>> {
        let mask = self.visibility_mask();
        self.order
            .iter()
            .filter(|&&i| mask.get(i).copied().unwrap_or(false))
            .filter_map(|&i| self.snapshot.get(i))
            .map(|record| RowView {
                record,
                flags: derive_flags(record),
            })
            .collect()
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_rows()
            .iter()
            .map(|r| r.record.id.clone())
            .collect()
    }

    /// Render every record for a local export, in ingestion order. Sort and
    /// filter state do not apply.
    pub fn export_table(&self, format: ExportFormat) -> Result<Vec<u8>, CoreError> {
        let records: Vec<&ProcessRecord> = self.snapshot.records().iter().collect();
        export::render_process_table(&records, format)
    }

    pub fn sort_caption(&self) -> Option<String> {
        let column = self.sort.column?;
        Some(format!(
            "Ordenado por: {} ({})",
            column.header(),
            self.sort.direction
        ))
    }

    pub fn filter_caption(&self) -> Option<String> {
        let parts: Vec<String> = self
            .filters
            .active_columns()
            .map(|(column, count)| format!("{}: {} selecionado(s)", column.header(), count))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(format!("Filtros: {}", parts.join(", ")))
        }
    }

    // ── Detail ──

    pub fn raw_detail(&self, id: &str) -> Result<&Value, CoreError> {
        self.snapshot.raw_detail(id)
    }

    pub fn detail_card(&self, id: &str) -> Result<DetailCard, CoreError> {
        self.snapshot
            .find(id)
            .map(DetailCard::from_record)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// Open the raw-detail panel of a record.
    pub fn open_detail(&mut self, id: &str) -> Result<&DetailPanels, CoreError> {
        let payload = self.snapshot.raw_detail(id)?.clone();
        let numero = self
            .snapshot
            .find(id)
            .map_or("N/A", |r| display_text(&r.numero))
            .to_string();
        self.panels.open(DetailPanel {
            id: id.to_string(),
            numero,
            payload,
        });
        Ok(&self.panels)
    }

    pub fn panels(&self) -> &DetailPanels {
        &self.panels
    }
}
