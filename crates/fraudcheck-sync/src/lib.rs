//! Backend access for the fraud-check review tool: the gateway trait, the
//! extraction controller that feeds the table engine, and the assessment desk.

pub mod controller;
pub mod desk;
mod error;
pub mod gateway;
#[cfg(feature = "http")]
pub mod http;
pub mod notice;
#[cfg(test)]
mod testing;

pub use controller::{ExtractOutcome, ReviewController};
pub use desk::AssessmentDesk;
pub use error::SyncError;
pub use gateway::{BackendStatus, Gateway, RecertifyReport};
#[cfg(feature = "http")]
pub use http::HttpGateway;
pub use notice::{Notice, NoticeLevel, Notices};
