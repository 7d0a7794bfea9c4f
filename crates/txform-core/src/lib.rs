//! Form sessions, request assembly and backend dispatch

pub mod client;
pub mod controller;
pub mod error;
pub mod form;
pub mod models;
pub mod number;
pub mod session;
pub mod types;

pub use client::{BackendRef, CalculationBackend, HttpCalculationBackend};
pub use controller::{FormController, ResultView, SubmitOutcome, ALERT_PREFIX};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use form::{FormSession, FormSubmission, RowId, RowInput, ROW_FIELD};
pub use models::{CalculationRequest, CalculationResponse, CalculationResult, TransactionEntry};
pub use session::SessionStore;
pub use types::{Category, TransactionType};
