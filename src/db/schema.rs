//! Stored document shape.

use crate::models::Record;
use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Prediction document as stored in the `predict` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDocument {
    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
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
    pub datetime: DateTime,
    /// Source URL.
    #[serde(rename = "Url")]
    pub url: String,
    /// Earnings per share.
    #[serde(rename = "EPS")]
    pub eps: f64,
    /// Closing price (absent in older documents).
    #[serde(rename = "ClosePrice", default)]
    pub close_price: Option<f64>,
    /// Predicted price (absent in older documents).
    #[serde(rename = "PredictPrice", default)]
    pub predict_price: Option<f64>,
}

impl From<PredictionDocument> for Record {
    fn from(doc: PredictionDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            symbol: doc.symbol,
            year: doc.year,
            quarter: doc.quarter,
            datetime: doc.datetime.to_chrono(),
            url: doc.url,
            eps: doc.eps,
            close_price: doc.close_price,
            predict_price: doc.predict_price,
        }
    }
}
