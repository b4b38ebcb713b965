//! # Stock Prediction API - REST API Server
//!
//! A small read-only REST API over a MongoDB collection of quarterly stock
//! prediction records. Built with [Axum](https://crates.io/crates/axum) and
//! documented with OpenAPI/Swagger via [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Paginated listing**: `limit`/`page` pagination with a total match count.
//!
//! - **Sorting**: any stored field, ascending or descending.
//!
//! - **Configurable symbol matching**: exact, full-text or case-insensitive
//!   substring, chosen per endpoint at deployment time.
//!
//! - **Response cache**: optional fixed-TTL cache keyed by the normalized query.
//!
//! - **Forgiving input**: malformed query parameters fall back to defaults
//!   instead of producing client errors.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`cache`] | Fixed-TTL response cache |
//! | [`config`] | TOML and environment configuration |
//! | [`db`] | Record store trait with MongoDB and in-memory backends |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`query`] | Query parameter normalization |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/hello` | Liveness greeting |
//! | GET | `/api/v1/data` | Paginated prediction records |
//! | GET | `/api/v1/symbols` | Distinct symbols |
//!
//! ### `/api/v1/data` parameters
//!
//! | Parameter | Default | Notes |
//! |-----------|---------|-------|
//! | `limit` | 10 | positive integer |
//! | `page` | 1 | positive integer, 1-based |
//! | `sort` | `id` | any field name |
//! | `order` | ascending | `desc` for descending |
//! | `Symbol` | none | symbol filter |
//!
//! ## Example Usage
//!
//! ```bash
//! # Start the server
//! MONGO_URI=mongodb://localhost:27017 cargo run
//!
//! # Second page of five AAA records, highest EPS first
//! curl "http://localhost:8080/api/v1/data?limit=5&page=2&sort=EPS&order=desc&Symbol=AAA"
//!
//! # Symbols matching a search term
//! curl "http://localhost:8080/api/v1/symbols?query=ptt"
//! ```
//!
//! ## Swagger UI
//!
//! ```text
//! http://localhost:8080/swagger-ui/
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod state;
