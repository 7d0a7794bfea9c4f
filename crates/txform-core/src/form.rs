//! Form session state and submission collection
//!
//! A `FormSession` is the state of one loaded page: the row counter and the
//! ordered list of rows it handed out. The browser owns the field values; on
//! submit they come back as an ordered list of form fields which
//! `FormSubmission` groups per row, and `FormSession::collect` turns into a
//! `CalculationRequest` in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{CalculationRequest, TransactionEntry};
use crate::number::{parse_float, parse_int, percent_to_fraction};
use crate::types::{Category, TransactionType};

/// Name of the hidden field that opens each transaction row
pub const ROW_FIELD: &str = "row";

/// Number identifying a transaction row within its session, starting at 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u32);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-page form state
#[derive(Debug, Clone)]
pub struct FormSession {
    /// Session identifier embedded in the page
    pub id: Uuid,
    next_row: u32,
    rows: Vec<RowId>,
    /// When the page was loaded
    pub created_at: DateTime<Utc>,
    /// Last add-row or submit against this session
    pub last_active: DateTime<Utc>,
}

impl FormSession {
    /// Create an empty session
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            next_row: 1,
            rows: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Hand out the next row number and remember it. Numbers are never reused.
    pub fn add_transaction_row(&mut self) -> RowId {
        let row = RowId(self.next_row);
        self.next_row += 1;
        self.rows.push(row);
        row
    }

    /// Rows in the order they were added
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    /// Record activity so the session is not pruned
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }

    /// Build the backend payload from a submitted form.
    ///
    /// Every row this session issued must be present, rows it never issued are
    /// rejected, and the transactions come out in insertion order. Values are not
    /// range-checked.
    pub fn collect(&self, submission: &FormSubmission) -> CoreResult<CalculationRequest> {
        if let Some(unknown) = submission.rows.iter().find(|r| !self.rows.contains(&r.row)) {
            return Err(CoreError::UnknownRow { row: unknown.row.0 });
        }

        let mut transactions = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let input = submission
                .rows
                .iter()
                .find(|r| r.row == *row)
                .ok_or(CoreError::MissingRow { row: row.0 })?;
            transactions.push(input.to_entry()?);
        }

        let years = parse_int(&submission.years).map_err(|e| CoreError::InvalidInput {
            field: "years".to_string(),
            message: e.to_string(),
        })?;
        let interest_rate = parse_float(&submission.interest_rate)
            .map(percent_to_fraction)
            .ok_or_else(|| not_a_number("interestRate"))?;
        let vat_rate = parse_float(&submission.vat_rate)
            .map(percent_to_fraction)
            .ok_or_else(|| not_a_number("vatRate"))?;

        Ok(CalculationRequest {
            transactions,
            years,
            interest_rate,
            vat_rate,
        })
    }
}

/// Raw field values of one submitted transaction row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowInput {
    pub row: RowId,
    pub amount: String,
    pub vat: String,
    pub kind: String,
    pub category: String,
}

impl RowInput {
    fn to_entry(&self) -> CoreResult<TransactionEntry> {
        let row = self.row;
        let amount = parse_float(&self.amount).ok_or_else(|| not_a_number(&format!("amount{}", row)))?;
        let vat = parse_float(&self.vat).ok_or_else(|| not_a_number(&format!("vat{}", row)))?;
        let kind = self.kind.parse::<TransactionType>().map_err(|e| CoreError::InvalidInput {
            field: format!("type{}", row),
            message: e,
        })?;
        let category = self.category.parse::<Category>().map_err(|e| CoreError::InvalidInput {
            field: format!("category{}", row),
            message: e,
        })?;

        Ok(TransactionEntry {
            amount,
            vat,
            kind,
            category,
        })
    }
}

/// A submitted form, grouped into rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSubmission {
    /// Rows in the order their fields were posted
    pub rows: Vec<RowInput>,
    pub years: String,
    /// Interest rate in percent, as typed
    pub interest_rate: String,
    /// VAT rate in percent, as typed
    pub vat_rate: String,
}

impl FormSubmission {
    /// Group an ordered list of form fields.
    ///
    /// A `row` field opens a new row; the `amount`, `vat`, `type` and `category`
    /// fields that follow belong to it. Unknown fields are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = FormSubmission::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value: String = value.into();
            match key {
                ROW_FIELD => {
                    let row = value.trim().parse::<u32>().map_err(|_| CoreError::InvalidInput {
                        field: ROW_FIELD.to_string(),
                        message: format!("'{}' is not a row number", value),
                    })?;
                    if submission.rows.iter().any(|r| r.row == RowId(row)) {
                        return Err(CoreError::InvalidInput {
                            field: ROW_FIELD.to_string(),
                            message: format!("transaction {} was submitted more than once", row),
                        });
                    }
                    submission.rows.push(RowInput {
                        row: RowId(row),
                        ..RowInput::default()
                    });
                }
                "amount" | "vat" | "type" | "category" => {
                    let current = submission.rows.last_mut().ok_or_else(|| CoreError::InvalidInput {
                        field: key.to_string(),
                        message: "field appears outside a transaction row".to_string(),
                    })?;
                    match key {
                        "amount" => current.amount = value,
                        "vat" => current.vat = value,
                        "type" => current.kind = value,
                        _ => current.category = value,
                    }
                }
                "years" => submission.years = value,
                "interestRate" => submission.interest_rate = value,
                "vatRate" => submission.vat_rate = value,
                _ => {}
            }
        }

        Ok(submission)
    }
}

fn not_a_number(field: &str) -> CoreError {
    CoreError::InvalidInput {
        field: field.to_string(),
        message: "not a number".to_string(),
    }
}
