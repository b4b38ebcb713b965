//! HTTP client library for the Stock Prediction API.
//!
//! This crate provides a typed HTTP client for the read-only prediction
//! endpoints.
//!
//! # Example
//!
//! ```no_run
//! use prediction_client::{ClientConfig, DataParams, PredictionClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), prediction_client::Error> {
//!     let client = PredictionClient::new(ClientConfig {
//!         base_url: "http://localhost:8080".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let page = client
//!         .list_data(&DataParams::new().symbol("PTT").sort_desc("EPS"))
//!         .await?;
//!     println!("{} of {} records", page.data.len(), page.total);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, PredictionClient};
pub use error::Error;
pub use types::*;
