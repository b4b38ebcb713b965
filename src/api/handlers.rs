//! API request handlers.

use crate::error::{ApiError, ErrorResponse};
use crate::models::{DataListResponse, HelloResponse, SymbolsResponse};
use crate::query::{ListQuery, SymbolsQuery};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Serves `key` from the cache when present, otherwise awaits `compute`,
/// caches and returns its payload. `compute` is not polled on a hit.
async fn cached_or_compute<T, Fut>(
    state: &AppState,
    key: String,
    compute: Fut,
) -> Result<Value, ApiError>
where
    T: Serialize,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if let Some(cache) = &state.cache
        && let Some(hit) = cache.get(&key)
    {
        debug!("Cache hit: {}", key);
        return Ok(hit);
    }

    let payload = serde_json::to_value(compute.await?)?;

    if let Some(cache) = &state.cache {
        cache.set(key, payload.clone());
    }

    Ok(payload)
}

// ============================================================================
// Liveness
// ============================================================================

/// Liveness greeting.
#[utoipa::path(
    get,
    path = "/api/v1/hello",
    responses(
        (status = 200, description = "Service is up", body = HelloResponse)
    ),
    tag = "Health"
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse::default())
}

// ============================================================================
// Prediction Records
// ============================================================================

/// List prediction records with pagination, sorting and an optional symbol filter.
///
/// Malformed parameters are replaced by their defaults rather than rejected.
#[utoipa::path(
    get,
    path = "/api/v1/data",
    params(
        ("limit" = Option<u64>, Query, description = "Page size (default: 10)"),
        ("page" = Option<u64>, Query, description = "Page number, 1-based (default: 1)"),
        ("sort" = Option<String>, Query, description = "Field to sort by (default: id)"),
        ("order" = Option<String>, Query, description = "'desc' for descending, anything else ascending"),
        ("Symbol" = Option<String>, Query, description = "Symbol filter")
    ),
    responses(
        (status = 200, description = "Page of prediction records", body = DataListResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Predictions"
)]
pub async fn list_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery::from_params(&params, state.query.data_match);

    let payload = cached_or_compute(&state, query.cache_key(), async {
        let page = state.store.list(&query).await?;
        Ok::<_, ApiError>(DataListResponse {
            data: page.records,
            total: page.total,
            page: query.page,
            limit: query.limit,
        })
    })
    .await?;

    Ok(Json(payload))
}

/// List distinct symbols matching an optional search term.
#[utoipa::path(
    get,
    path = "/api/v1/symbols",
    params(
        ("query" = Option<String>, Query, description = "Symbol search term")
    ),
    responses(
        (status = 200, description = "Distinct symbols", body = SymbolsResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Predictions"
)]
pub async fn list_symbols(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = SymbolsQuery::from_params(&params, state.query.symbols_match);

    let payload = cached_or_compute(&state, query.cache_key(), async {
        let symbols = state.store.distinct_symbols(&query.filter).await?;
        Ok::<_, ApiError>(SymbolsResponse { symbols })
    })
    .await?;

    Ok(Json(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::config::QueryConfig;
    use crate::db::{MemoryStore, RecordPage, RecordStore, StoreError};
    use crate::models::Record;
    use crate::query::{SymbolFilter, SymbolMatch};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(id: u32, symbol: &str, eps: f64) -> Record {
        Record {
            id: format!("{:024x}", id),
            symbol: symbol.to_string(),
            year: 2024,
            quarter: "Q1".to_string(),
            datetime: Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
            url: format!("https://example.com/{}", id),
            eps,
            close_price: Some(10.0),
            predict_price: Some(11.0),
        }
    }

    /// Counts store calls and delegates to a memory store.
    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn list(&self, query: &ListQuery) -> Result<RecordPage, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list(query).await
        }

        async fn distinct_symbols(
            &self,
            filter: &SymbolFilter,
        ) -> Result<Vec<String>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.distinct_symbols(filter).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn params(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
        Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn create_test_state(store: Arc<dyn RecordStore>) -> Arc<AppState> {
        Arc::new(AppState::new(store, QueryConfig::default()))
    }

    #[tokio::test]
    async fn test_hello() {
        let response = hello().await;
        assert_eq!(response.0.message, "Hello, World!");
    }

    #[tokio::test]
    async fn test_list_data_response_shape() {
        let store = MemoryStore::new(vec![record(1, "AAA", 1.0), record(2, "BBB", 2.0)]);
        let state = create_test_state(Arc::new(store));

        let Json(body) = list_data(State(state), params(&[])).await.unwrap();
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        for key in ["data", "total", "page", "limit"] {
            assert!(body.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(body["total"], 2);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["data"][0]["Symbol"], "AAA");
        assert_eq!(body["data"][0]["ClosePrice"], 10.0);
    }

    #[tokio::test]
    async fn test_list_data_pagination_and_sort() {
        let records = (0..12).map(|i| record(i, "AAA", f64::from(i))).collect();
        let state = create_test_state(Arc::new(MemoryStore::new(records)));

        let Json(body) = list_data(
            State(state),
            params(&[
                ("limit", "5"),
                ("page", "2"),
                ("sort", "EPS"),
                ("order", "desc"),
                ("Symbol", "AAA"),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(body["total"], 12);
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 5);
        let eps: Vec<f64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["EPS"].as_f64().unwrap())
            .collect();
        assert_eq!(eps, vec![6.0, 5.0, 4.0, 3.0, 2.0]);
    }

    #[tokio::test]
    async fn test_list_data_malformed_params_use_defaults() {
        let state = create_test_state(Arc::new(MemoryStore::new(vec![record(1, "AAA", 1.0)])));

        let Json(body) = list_data(
            State(state),
            params(&[("limit", "-1"), ("page", "first")]),
        )
        .await
        .unwrap();

        assert_eq!(body["limit"], 10);
        assert_eq!(body["page"], 1);
    }

    #[tokio::test]
    async fn test_list_symbols_substring() {
        let store = MemoryStore::new(vec![
            record(1, "AAA", 1.0),
            record(2, "BBB", 1.0),
            record(3, "AAX", 1.0),
        ]);
        let query = QueryConfig {
            symbols_match: SymbolMatch::SubstringCi,
            ..QueryConfig::default()
        };
        let state = Arc::new(AppState::new(Arc::new(store), query));

        let Json(body) = list_symbols(State(state), params(&[("query", "aa")]))
            .await
            .unwrap();
        assert_eq!(body, serde_json::json!({"symbols": ["AAA", "AAX"]}));
    }

    #[tokio::test]
    async fn test_cache_serves_repeated_queries() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(vec![record(1, "AAA", 1.0)]),
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(
            AppState::new(store.clone(), QueryConfig::default())
                .with_cache(Arc::new(ResponseCache::default())),
        );

        let Json(first) = list_data(State(state.clone()), params(&[("limit", "5")]))
            .await
            .unwrap();
        let Json(second) = list_data(State(state.clone()), params(&[("limit", "5")]))
            .await
            .unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );

        list_data(State(state.clone()), params(&[("limit", "6")]))
            .await
            .unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);

        list_symbols(State(state.clone()), params(&[])).await.unwrap();
        list_symbols(State(state), params(&[])).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cache_expiry_triggers_fresh_query() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(vec![record(1, "AAA", 1.0)]),
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(
            AppState::new(store.clone(), QueryConfig::default())
                .with_cache(Arc::new(ResponseCache::new(Duration::from_millis(20)))),
        );

        list_data(State(state.clone()), params(&[])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        list_data(State(state), params(&[])).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_without_cache_every_request_hits_store() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::default(),
            calls: AtomicUsize::new(0),
        });
        let state = create_test_state(store.clone());

        list_data(State(state.clone()), params(&[])).await.unwrap();
        list_data(State(state), params(&[])).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}
