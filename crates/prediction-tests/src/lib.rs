//! Integration test harness for the Stock Prediction API.
//!
//! Each test boots the real router on an ephemeral local port, backed by an
//! in-memory store, and talks to it through `prediction-client`.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use prediction_client::PredictionClient;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stock_prediction_api::api::create_router;
use stock_prediction_api::db::{RecordPage, RecordStore, StoreError};
use stock_prediction_api::models::Record;
use stock_prediction_api::query::{ListQuery, SymbolFilter};
use stock_prediction_api::state::AppState;
use tokio::net::TcpListener;

/// Starts the API on `127.0.0.1` with an ephemeral port.
///
/// # Panics
/// Panics if the listener cannot be bound or the client cannot be built.
pub async fn spawn_server(state: AppState) -> PredictionClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    let app = create_router(Arc::new(state));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    PredictionClient::with_base_url(&format!("http://{}", addr)).expect("Failed to create client")
}

/// Builds a record with a deterministic id, timestamp and URL.
#[must_use]
pub fn record(seq: u32, symbol: &str, eps: f64) -> Record {
    Record {
        id: format!("{:024x}", seq),
        symbol: symbol.to_string(),
        year: 2020 + (seq / 4) as i32,
        quarter: format!("Q{}", seq % 4 + 1),
        datetime: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::days(i64::from(seq)),
        url: format!("https://example.com/{}/{}", symbol, seq),
        eps,
        close_price: Some(10.0 + f64::from(seq)),
        predict_price: Some(11.0 + f64::from(seq)),
    }
}

/// Twelve `AAA` records with EPS 0..=11 followed by `BBB` and `AAX` records.
#[must_use]
pub fn sample_records() -> Vec<Record> {
    let mut records: Vec<Record> = (0..12).map(|i| record(i, "AAA", f64::from(i))).collect();
    records.push(record(12, "BBB", 2.5));
    records.push(record(13, "AAX", 0.75));
    records.push(record(14, "BBB", 1.5));
    records
}

/// Store that fails every call, as if the database were unreachable.
pub struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn list(&self, _query: &ListQuery) -> Result<RecordPage, StoreError> {
        Err(StoreError::Find("server selection timeout".to_string()))
    }

    async fn distinct_symbols(&self, _filter: &SymbolFilter) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Distinct("server selection timeout".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Connect("server selection timeout".to_string()))
    }
}

/// Store wrapper that counts list and distinct calls.
pub struct CountingStore<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S: RecordStore> CountingStore<S> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of store queries issued so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for CountingStore<S> {
    async fn list(&self, query: &ListQuery) -> Result<RecordPage, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list(query).await
    }

    async fn distinct_symbols(&self, filter: &SymbolFilter) -> Result<Vec<String>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.distinct_symbols(filter).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}
