//! Request and response shapes exchanged with the calculation backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::number::serialize_js_number;
use crate::types::{Category, TransactionType};

/// One transaction row as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// Transaction amount
    #[serde(serialize_with = "serialize_js_number")]
    pub amount: f64,
    /// VAT amount entered by the user
    #[serde(serialize_with = "serialize_js_number")]
    pub vat: f64,
    /// Credit or debit
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Goods, services or investment
    pub category: Category,
}

/// Payload posted to the calculation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// Transactions in the order the rows were added
    pub transactions: Vec<TransactionEntry>,
    /// Number of years for compound interest
    pub years: i64,
    /// Interest rate as a fraction (0.1 for 10%)
    #[serde(serialize_with = "serialize_js_number")]
    pub interest_rate: f64,
    /// VAT rate as a fraction (0.05 for 5%)
    #[serde(serialize_with = "serialize_js_number")]
    pub vat_rate: f64,
}

/// Successful calculation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub net_balance_before_interest: f64,
    pub final_balance_with_interest: f64,
    /// Category name to aggregated value, in the order the backend sent them
    #[serde(default)]
    pub category_breakdown: Map<String, Value>,
}

/// Everything the backend can answer with
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationResponse {
    /// The backend computed a summary
    Success(CalculationResult),
    /// The backend rejected the request with a message
    Error(String),
}

impl CalculationResponse {
    /// Interpret a response body.
    ///
    /// A present, truthy `error` field wins over everything else. Anything that is
    /// neither an error nor a well-formed summary is a `MalformedResponse`.
    pub fn from_json(body: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| CoreError::MalformedResponse {
            message: e.to_string(),
        })?;

        if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
            let message = match error {
                Value::String(s) => s.clone(),
                other => txform_utils::display_json_value(other),
            };
            return Ok(CalculationResponse::Error(message));
        }

        if !value.is_object() {
            return Err(CoreError::MalformedResponse {
                message: format!("expected a JSON object, got {}", value),
            });
        }

        serde_json::from_value(value)
            .map(CalculationResponse::Success)
            .map_err(|e| CoreError::MalformedResponse { message: e.to_string() })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
