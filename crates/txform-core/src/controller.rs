//! Form controller: submission to rendered outcome
//!
//! Every failure on the submit path (unusable input, unreachable backend,
//! unparseable body, backend-reported error) ends in an alert message. Only a
//! well-formed summary produces a `ResultView`.

use serde::Serialize;
use std::sync::Arc;

use crate::client::BackendRef;
use crate::error::{CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::form::{FormSession, FormSubmission};
use crate::models::{CalculationRequest, CalculationResponse, CalculationResult};
use txform_utils::{display_json_value, display_number};

/// Prefix of every alert raised by a submission
pub const ALERT_PREFIX: &str = "Error: ";

/// Display-ready summary for the results region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub net_balance: String,
    pub final_balance: String,
    /// One `"<category>: <value>"` line per breakdown entry, in backend order
    pub category_items: Vec<String>,
}

impl From<&CalculationResult> for ResultView {
    fn from(result: &CalculationResult) -> Self {
        Self {
            net_balance: display_number(result.net_balance_before_interest),
            final_balance: display_number(result.final_balance_with_interest),
            category_items: result
                .category_breakdown
                .iter()
                .map(|(category, value)| format!("{}: {}", category, display_json_value(value)))
                .collect(),
        }
    }
}

/// What the page should do after a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Reveal the results region with this summary
    Rendered(ResultView),
    /// Raise a blocking alert; the results region is left as it is
    Alert(String),
}

impl SubmitOutcome {
    /// Build an alert outcome from a bare message
    pub fn alert(message: impl std::fmt::Display) -> Self {
        SubmitOutcome::Alert(format!("{}{}", ALERT_PREFIX, message))
    }
}

/// Turns submitted forms into backend calls and their outcomes
#[derive(Clone)]
pub struct FormController {
    backend: BackendRef,
    logger: Arc<dyn ErrorLogger>,
}

impl FormController {
    /// Create a controller with the default error logger
    pub fn new(backend: BackendRef) -> Self {
        Self {
            backend,
            logger: Arc::new(DefaultErrorLogger),
        }
    }

    /// Assemble the backend payload without sending it
    pub fn prepare(&self, session: &FormSession, submission: &FormSubmission) -> CoreResult<CalculationRequest> {
        session.collect(submission).map_err(|e| {
            self.logger.log_error(&e, &self.context("prepare", session));
            e
        })
    }

    /// Collect the form, send it, and decide what the page shows.
    ///
    /// One request, no retry. Input errors stop before anything is sent.
    pub async fn submit_form(&self, session: &FormSession, submission: &FormSubmission) -> SubmitOutcome {
        let request = match self.prepare(session, submission) {
            Ok(request) => request,
            Err(e) => return SubmitOutcome::alert(e),
        };

        match self.backend.process(&request).await {
            Ok(CalculationResponse::Success(result)) => {
                log::info!(
                    "Form {} calculated: {} transactions, {} categories",
                    session.id,
                    request.transactions.len(),
                    result.category_breakdown.len()
                );
                SubmitOutcome::Rendered(ResultView::from(&result))
            }
            Ok(CalculationResponse::Error(message)) => {
                self.logger.log_warning(
                    &format!("Backend rejected request: {}", message),
                    &self.context("submit_form", session),
                );
                SubmitOutcome::alert(message)
            }
            Err(e) => {
                self.logger.log_error(&e, &self.context("submit_form", session));
                SubmitOutcome::alert(e)
            }
        }
    }

    fn context(&self, operation: &str, session: &FormSession) -> ErrorContext {
        ErrorContext::new(operation)
            .with_session_id(session.id.to_string())
            .with_data("rows", serde_json::json!(session.rows().len()))
    }
}

// ==================== Tests ====================
