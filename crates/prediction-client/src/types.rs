//! Request and response types for the prediction API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


// ============================================================================
// Liveness
// ============================================================================

/// Liveness greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    /// Greeting message.
    pub message: String,
}

// ============================================================================
// Prediction Records
// ============================================================================

/// One quarterly prediction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: String,
    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Fiscal year.
    #[serde(rename = "Year")]
    pub year: i32,
    /// Fiscal quarter.
    #[serde(rename = "Quarter")]
    pub quarter: String,
    /// Report timestamp.
    #[serde(rename = "Datetime")]
    pub datetime: DateTime<Utc>,
    /// Source URL.
    #[serde(rename = "Url")]
    pub url: String,
    /// Earnings per share.
    #[serde(rename = "EPS")]
    pub eps: f64,
    /// Closing price.
    #[serde(rename = "ClosePrice", default)]
    pub close_price: Option<f64>,
    /// Predicted price.
    #[serde(rename = "PredictPrice", default)]
    pub predict_price: Option<f64>,
}

/// Paginated listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataListResponse {
    /// Records on the page.
    pub data: Vec<Record>,
    /// Total records matching the filter.
    pub total: u64,
    /// Effective page.
    pub page: u64,
    /// Effective page size.
    pub limit: u64,
}

/// Distinct symbols response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsResponse {
    /// Unique symbols.
    pub symbols: Vec<String>,
}

/// Query parameters for listing records.
///
/// Unset fields are left to the server's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataParams {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort order (`asc` or `desc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Symbol filter.
    #[serde(rename = "Symbol", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl DataParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets page size and page number.
    #[must_use]
    pub fn page(mut self, page: u64, limit: u64) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Sorts ascending by `field`.
    #[must_use]
    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort = Some(field.to_string());
        self.order = Some("asc".to_string());
        self
    }

    /// Sorts descending by `field`.
    #[must_use]
    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort = Some(field.to_string());
        self.order = Some("desc".to_string());
        self
    }

    /// Filters by symbol.
    #[must_use]
    pub fn symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.to_string());
        self
    }
}
