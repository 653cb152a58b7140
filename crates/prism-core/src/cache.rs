//! A staleness-tolerant cache in front of any `CatalogSource`.
//!
//! Only the condition list is cached: it is the expensive, multi-table load.
//! Products and patient types pass straight through. A full fetch that misses
//! the cache is handed to the inner source's `load_catalog` whole, so sources
//! that read one document keep reading it once.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use prism_contracts::{
    catalog::{PatientType, Product},
    condition::Condition,
    error::PrismResult,
};

use crate::traits::{CatalogSource, FetchedCatalog};

/// Default time a cached condition list stays fresh.
pub const DEFAULT_TTL_SECONDS: i64 = 30;

struct CachedConditions {
    fetched_at: DateTime<Utc>,
    conditions: Vec<Condition>,
}

/// Wraps a `CatalogSource`, reusing a recent condition list unless the caller
/// forces a refresh.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    cache: Mutex<Option<CachedConditions>>,
}

impl<S: CatalogSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn with_default_ttl(inner: S) -> Self {
        Self::new(inner, Duration::seconds(DEFAULT_TTL_SECONDS))
    }

    /// Drop the cached list so the next load goes to the inner source.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = None;
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn fresh_copy(&self) -> Option<Vec<Condition>> {
        let cache = self.cache.lock().ok()?;
        let cached = cache.as_ref()?;
        (Utc::now() - cached.fetched_at < self.ttl).then(|| cached.conditions.clone())
    }

    fn store(&self, conditions: &[Condition]) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some(CachedConditions {
                fetched_at: Utc::now(),
                conditions: conditions.to_vec(),
            });
        }
    }
}

impl<S: CatalogSource> CatalogSource for CachedSource<S> {
    fn load_conditions(&self, force_refresh: bool) -> PrismResult<Vec<Condition>> {
        if !force_refresh {
            if let Some(conditions) = self.fresh_copy() {
                debug!(count = conditions.len(), "using cached conditions");
                return Ok(conditions);
            }
        }

        debug!(force_refresh, "loading conditions from source");
        let conditions = self.inner.load_conditions(force_refresh)?;
        self.store(&conditions);
        Ok(conditions)
    }

    fn load_products(&self) -> PrismResult<Vec<Product>> {
        self.inner.load_products()
    }

    fn load_patient_types(&self) -> PrismResult<Vec<PatientType>> {
        self.inner.load_patient_types()
    }

    fn load_catalog(&self, force_refresh: bool) -> FetchedCatalog {
        if !force_refresh {
            if let Some(conditions) = self.fresh_copy() {
                debug!(count = conditions.len(), "using cached conditions");
                return FetchedCatalog {
                    conditions: Ok(conditions),
                    products: self.inner.load_products(),
                    patient_types: self.inner.load_patient_types(),
                };
            }
        }

        debug!(force_refresh, "loading catalog from source");
        let fetched = self.inner.load_catalog(force_refresh);
        if let Ok(conditions) = &fetched.conditions {
            self.store(conditions);
        }
        fetched
    }
}
