//! Dataset ingestion: the backend's extraction response becomes a snapshot.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::record::{FinancialLedger, ProcessRecord};

pub const STATUS_SUCCESS: &str = "success";

/// Parsed extraction response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<ProcessRecord>>,
    /// Presentation rows, index-aligned with `data`.
    #[serde(default)]
    pub grid_data: Option<Vec<Vec<Value>>>,
    /// Opaque per-record detail, keyed by record id.
    #[serde(default)]
    pub raw_data: Option<HashMap<String, Value>>,
}

impl DatasetPayload {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// A missing status is treated as success; the backend only omits it on
    /// bare dataset dumps.
    pub fn is_success(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == STATUS_SUCCESS)
    }
}

/// What a load produced. An empty result is a valid outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Empty,
}

/// The engine's in-memory dataset: records in ingestion order plus the raw
/// detail payload of each record.
#[derive(Debug, Clone, Default)]
pub struct DatasetSnapshot {
    records: Vec<ProcessRecord>,
    raw: HashMap<String, Value>,
}

impl DatasetSnapshot {
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessRecord> {
        self.records.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&ProcessRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Raw detail payload for a record id.
    pub fn raw_detail(&self, id: &str) -> Result<&Value, CoreError> {
        self.raw
            .get(id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }
}

/// Build a snapshot from a payload, replacing nothing incrementally.
///
/// Grid rows are joined to records by position. A record without a ledger
/// inherits the one found in its raw detail payload.
pub fn load(payload: DatasetPayload) -> (DatasetSnapshot, LoadOutcome) {
    let raw = payload.raw_data.unwrap_or_default();
    let grid = payload.grid_data.unwrap_or_default();
    let mut records = payload.data.unwrap_or_default();

    for (index, record) in records.iter_mut().enumerate() {
        if let Some(row) = grid.get(index) {
            record.grid = row.iter().map(grid_cell).collect();
        }
        if record.financeiro.is_none()
            && let Some(ledger) = raw.get(&record.id).and_then(ledger_from_raw)
        {
            debug!(id = %record.id, "ledger taken from raw detail");
            record.financeiro = Some(ledger);
        }
    }

    let outcome = if records.is_empty() {
        LoadOutcome::Empty
    } else {
        LoadOutcome::Loaded(records.len())
    };
    info!(
        records = records.len(),
        grid_rows = grid.len(),
        raw_entries = raw.len(),
        "dataset loaded"
    );
    (DatasetSnapshot { records, raw }, outcome)
}

fn grid_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn ledger_from_raw(detail: &Value) -> Option<FinancialLedger> {
    let financeiro = detail.get("financeiro")?;
    serde_json::from_value(financeiro.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "status": "success",
        "data": [
            {"processo": {"id": "A1", "numero": "001"}, "partes": {}, "acordo": []},
            {"processo": {"id": "B2", "numero": "002"}, "acordo": [{"suspeita_fraude": "Sim"}]}
        ],
        "grid_data": [["A1", "001", "Fulano"]],
        "raw_data": {
            "A1": {"financeiro": {"lancamentos": [{"tipo": "ACORDO"}]}},
            "B2": {"processo": {"numero": "002"}}
        }
    }"#;

    #[test]
    fn loads_records_grid_and_raw() {
        let payload = DatasetPayload::from_json(PAYLOAD).unwrap();
        assert!(payload.is_success());
        let (snapshot, outcome) = load(payload);
        assert_eq!(outcome, LoadOutcome::Loaded(2));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.records()[0].grid, vec!["A1", "001", "Fulano"]);
        assert!(snapshot.records()[1].grid.is_empty());
        assert!(snapshot.raw_detail("B2").is_ok());
    }

    #[test]
    fn ledger_inherited_from_raw_detail() {
        let (snapshot, _) = load(DatasetPayload::from_json(PAYLOAD).unwrap());
        let a1 = snapshot.find("A1").unwrap();
        assert_eq!(a1.financeiro.as_ref().unwrap().lancamentos.len(), 1);
        assert!(snapshot.find("B2").unwrap().financeiro.is_none());
    }

    #[test]
    fn empty_data_is_a_valid_empty_result() {
        let payload = DatasetPayload::from_json(r#"{"status": "success", "data": []}"#).unwrap();
        let (snapshot, outcome) = load(payload);
        assert_eq!(outcome, LoadOutcome::Empty);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn absent_data_is_empty_too() {
        let (snapshot, outcome) = load(DatasetPayload::default());
        assert_eq!(outcome, LoadOutcome::Empty);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn missing_raw_detail_is_not_found() {
        let (snapshot, _) = load(DatasetPayload::from_json(PAYLOAD).unwrap());
        assert!(matches!(
            snapshot.raw_detail("ZZ"),
            Err(CoreError::NotFound(id)) if id == "ZZ"
        ));
    }

    #[test]
    fn error_status_is_not_success() {
        let payload =
            DatasetPayload::from_json(r#"{"status": "error", "message": "Sessão expirada"}"#)
                .unwrap();
        assert!(!payload.is_success());
        assert_eq!(payload.message.as_deref(), Some("Sessão expirada"));
    }
}
