//! Core of the fraud-check review tool: process records, derived flags, and
//! the sortable, filterable table view over the last extracted dataset.

pub mod assessment;
pub mod column;
pub mod criteria;
pub mod dataset;
pub mod detail;
mod error;
pub mod export;
pub mod filter;
pub mod flags;
pub mod record;
pub mod sort;
pub mod sort_key;
pub mod view;

pub use assessment::{
    AssessmentBoard, AssessmentRecord, AssessmentResult, AssessmentUpdate, Reason,
    SavedAssessment, SearchFilters,
};
pub use column::ColumnId;
pub use criteria::{ExtractionCriteria, parse_process_numbers};
pub use dataset::{DatasetPayload, DatasetSnapshot, LoadOutcome};
pub use detail::{DetailCard, DetailPanel, DetailPanels};
pub use error::CoreError;
pub use export::ExportFormat;
pub use filter::{FilterState, FraudFilter};
pub use flags::{DerivedFlags, derive_flags};
pub use record::ProcessRecord;
pub use sort::{SortDirection, SortState};
pub use view::{RowView, TabularViewEngine};
