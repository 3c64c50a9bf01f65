//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! Brand records live in a thread-safe in-memory store that is the
//! source of truth at request time. When `DATABASE_URL` is configured,
//! every mutation is written through to Postgres and the store is
//! hydrated from the database at startup; when it is absent, the API
//! runs in-memory only.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db;

/// A stored brand record.
///
/// `created_by`/`modified_by` come from session-token claims when a
/// caller presents one; the audit columns are not part of the wire
/// representation of a brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Thread-safe, cloneable in-memory brand store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// A `BTreeMap` keeps records ordered by id, so listing is stable
/// without a sort.
#[derive(Debug)]
pub struct BrandStore {
    data: Arc<RwLock<BTreeMap<i64, BrandRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl Clone for BrandStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl BrandStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Allocate the next brand id.
    pub fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Insert a record, returning the previous value if the id existed.
    pub fn insert(&self, record: BrandRecord) -> Option<BrandRecord> {
        self.data.write().insert(record.id, record)
    }

    /// Retrieve a record by id.
    pub fn get(&self, id: i64) -> Option<BrandRecord> {
        self.data.read().get(&id).cloned()
    }

    /// List all records in ascending id order.
    pub fn list(&self) -> Vec<BrandRecord> {
        self.data.read().values().cloned().collect()
    }

    /// Find a record by exact code.
    pub fn find_by_code(&self, code: &str) -> Option<BrandRecord> {
        self.data
            .read()
            .values()
            .find(|record| record.code == code)
            .cloned()
    }

    /// Update a record in place. Returns the updated record, or `None`
    /// if not found.
    pub fn update(&self, id: i64, f: impl FnOnce(&mut BrandRecord)) -> Option<BrandRecord> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(&id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Remove a record by id.
    pub fn remove(&self, id: i64) -> Option<BrandRecord> {
        self.data.write().remove(&id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the store's contents with records loaded from the
    /// database and advance the id counter past the highest loaded id.
    pub fn hydrate(&self, records: Vec<BrandRecord>) {
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        let mut guard = self.data.write();
        guard.clear();
        for record in records {
            guard.insert(record.id, record);
        }
        self.next_id.store(max_id + 1, Ordering::SeqCst);
    }
}

impl Default for BrandStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Application configuration built from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// HMAC secret used to verify session-token cookies.
    pub session_secret: Vec<u8>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            session_secret: b"dev-session-secret".to_vec(),
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub brands: BrandStore,
    pub db_pool: Option<PgPool>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// In-memory state with default configuration. Used by tests and by
    /// deployments without a database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// State with explicit configuration and an optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            brands: BrandStore::new(),
            db_pool,
            config: Arc::new(config),
        }
    }

    /// Hydrate the in-memory store from the database, when connected.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };
        let records = db::brands::load_all(pool).await?;
        tracing::info!(count = records.len(), "hydrated brands from database");
        self.brands.hydrate(records);
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
