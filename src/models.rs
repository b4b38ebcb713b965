//! Request and response models for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Greeting returned by the liveness endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HelloResponse {
    /// Fixed greeting.
    pub message: String,
}

impl Default for HelloResponse {
    fn default() -> Self {
        Self {
            message: "Hello, World!".to_string(),
        }
    }
}

/// One quarterly prediction record.
///
/// Field names follow the stored schema, hence the capitalized JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    /// Store-assigned identifier (hex ObjectId).
    pub id: String,
    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Fiscal year.
    #[serde(rename = "Year")]
    pub year: i32,
    /// Fiscal quarter (e.g., "Q1").
    #[serde(rename = "Quarter")]
    pub quarter: String,
    /// Timestamp of the source report.
    #[serde(rename = "Datetime")]
    pub datetime: DateTime<Utc>,
    /// Source URL.
    #[serde(rename = "Url")]
    pub url: String,
    /// Earnings per share.
    #[serde(rename = "EPS")]
    pub eps: f64,
    /// Closing price, when recorded.
    #[serde(
        rename = "ClosePrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub close_price: Option<f64>,
    /// Predicted price, when recorded.
    #[serde(
        rename = "PredictPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub predict_price: Option<f64>,
}

/// Paginated listing of prediction records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataListResponse {
    /// Records on the requested page.
    pub data: Vec<Record>,
    /// Number of records matching the filter, ignoring pagination.
    pub total: u64,
    /// Effective page number.
    pub page: u64,
    /// Effective page size.
    pub limit: u64,
}

/// Distinct symbols matching a search.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SymbolsResponse {
    /// Unique ticker symbols.
    pub symbols: Vec<String>,
}
