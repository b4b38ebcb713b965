//! MongoDB-backed record store.

use crate::config::StoreConfig;
use crate::db::schema::PredictionDocument;
use crate::db::store::{RecordPage, RecordStore, StoreError};
use crate::models::Record;
use crate::query::{ListQuery, SortSpec, SymbolFilter};
use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Stored field holding the ticker symbol.
const SYMBOL_FIELD: &str = "Symbol";

/// MongoDB record store.
///
/// Cloning is cheap; the driver client shares one connection pool.
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
    collection: Collection<Document>,
    request_timeout: Duration,
}

impl MongoStore {
    /// Connects to MongoDB and verifies the connection with a ping.
    ///
    /// Parsing, connecting and the ping are bounded together by the configured
    /// connect timeout; the per-request timeout does not apply here.
    ///
    /// # Errors
    /// Returns an error if the URI is missing or invalid, or the server cannot
    /// be reached in time.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| StoreError::Connect("MONGO_URI is not set".to_string()))?;
        let connect_timeout = config.connect_timeout();

        let store = with_timeout(connect_timeout, async {
            let mut options = ClientOptions::parse(uri)
                .await
                .map_err(|e| StoreError::Connect(e.to_string()))?;
            options.connect_timeout = Some(connect_timeout);
            options.server_selection_timeout = Some(connect_timeout);
            options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

            let client =
                Client::with_options(options).map_err(|e| StoreError::Connect(e.to_string()))?;
            let database = client.database(&config.database);
            let collection = database.collection::<Document>(&config.collection);

            let store = Self {
                database,
                collection,
                request_timeout: config.request_timeout(),
            };
            // bounded by the startup deadline only
            ping_database(&store.database).await?;
            Ok::<Self, StoreError>(store)
        })
        .await?;

        info!(
            "Connected to MongoDB (database: {}, collection: {})",
            config.database, config.collection
        );

        Ok(store)
    }

    /// Translates a symbol filter into a query document.
    #[must_use]
    pub fn filter_document(filter: &SymbolFilter) -> Document {
        match filter {
            SymbolFilter::None => Document::new(),
            SymbolFilter::Exact(term) => doc! { SYMBOL_FIELD: term.as_str() },
            SymbolFilter::FullText(term) => doc! { "$text": { "$search": term.as_str() } },
            SymbolFilter::SubstringCi(term) => doc! {
                SYMBOL_FIELD: { "$regex": regex::escape(term), "$options": "i" }
            },
        }
    }

    /// Translates a sort specification into a sort document.
    ///
    /// The API-level `id` field maps to the store's `_id`.
    #[must_use]
    pub fn sort_document(sort: &SortSpec) -> Document {
        let field = if sort.field == "id" {
            "_id"
        } else {
            sort.field.as_str()
        };
        doc! { field: sort.direction.as_i32() }
    }

    /// Decodes raw documents, skipping (and logging) any that do not match the
    /// canonical schema.
    fn decode_documents(raw: Vec<Document>) -> Vec<Record> {
        raw.into_iter()
            .filter_map(
                |document| match bson::from_document::<PredictionDocument>(document) {
                    Ok(decoded) => Some(Record::from(decoded)),
                    Err(e) => {
                        warn!("Failed to decode document: {}", e);
                        None
                    }
                },
            )
            .collect()
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn list(&self, query: &ListQuery) -> Result<RecordPage, StoreError> {
        let filter = Self::filter_document(&query.filter);
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let find = async {
            let cursor = self
                .collection
                .find(filter.clone())
                .sort(Self::sort_document(&query.sort))
                .skip(query.skip())
                .limit(limit)
                .await
                .map_err(|e| StoreError::Find(e.to_string()))?;
            cursor
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| StoreError::Find(e.to_string()))
        };
        let count = async {
            self.collection
                .count_documents(filter.clone())
                .await
                .map_err(|e| StoreError::Count(e.to_string()))
        };

        let (raw, total) = find_and_count(self.request_timeout, find, count).await?;

        Ok(RecordPage {
            records: Self::decode_documents(raw),
            total,
        })
    }

    async fn distinct_symbols(&self, filter: &SymbolFilter) -> Result<Vec<String>, StoreError> {
        let filter = Self::filter_document(filter);

        let values = with_timeout(self.request_timeout, async {
            self.collection
                .distinct(SYMBOL_FIELD, filter)
                .await
                .map_err(|e| StoreError::Distinct(e.to_string()))
        })
        .await?;

        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(symbol) => Some(symbol),
                other => {
                    warn!("Ignoring non-string symbol value: {}", other);
                    None
                }
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        with_timeout(self.request_timeout, ping_database(&self.database)).await
    }
}

async fn ping_database(database: &Database) -> Result<(), StoreError> {
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map(drop)
        .map_err(|e| StoreError::Connect(e.to_string()))
}

/// Runs the page query, then its count, under one shared deadline.
async fn find_and_count<F, C>(
    limit: Duration,
    find: F,
    count: C,
) -> Result<(Vec<Document>, u64), StoreError>
where
    F: Future<Output = Result<Vec<Document>, StoreError>>,
    C: Future<Output = Result<u64, StoreError>>,
{
    with_timeout(limit, async {
        let raw = find.await?;
        let total = count.await?;
        Ok((raw, total))
    })
    .await
}

/// Runs `operation`, abandoning it after `limit`.
async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
