//! `CatalogSource` implementations for the reference runtime.
//!
//! - `MockCatalogSource` serves an in-memory catalog and can be told to fail
//!   any dataset, to stand in for an unreliable backend.
//! - `JsonFileSource` reads a JSON catalog document from disk, once per
//!   catalog fetch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use prism_contracts::{
    catalog::{CatalogDocument, Dataset, PatientType, Product},
    condition::Condition,
    error::{PrismError, PrismResult},
};
use prism_core::traits::{CatalogSource, FetchedCatalog};

// ── In-memory source ──────────────────────────────────────────────────────────

/// An in-memory catalog with injectable failures.
#[derive(Debug, Default)]
pub struct MockCatalogSource {
    catalog: Mutex<CatalogDocument>,
    failing: Mutex<HashSet<Dataset>>,
    condition_loads: AtomicUsize,
}

impl MockCatalogSource {
    pub fn new(catalog: CatalogDocument) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            ..Self::default()
        }
    }

    /// Make every subsequent load of `dataset` fail.
    pub fn fail(&self, dataset: Dataset) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(dataset);
        }
    }

    /// Undo `fail(dataset)`.
    pub fn recover(&self, dataset: Dataset) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(&dataset);
        }
    }

    /// Apply `edit` to the backing catalog, as an editor would between
    /// reloads.
    pub fn edit(&self, edit: impl FnOnce(&mut CatalogDocument)) {
        if let Ok(mut catalog) = self.catalog.lock() {
            edit(&mut catalog);
        }
    }

    /// Number of `load_conditions` calls that reached this source.
    pub fn condition_loads(&self) -> usize {
        self.condition_loads.load(Ordering::SeqCst)
    }

    fn read<T>(
        &self,
        dataset: Dataset,
        project: impl FnOnce(&CatalogDocument) -> Vec<T>,
    ) -> PrismResult<Vec<T>> {
        let failing = self.failing.lock().map_err(|_| poisoned(dataset))?;
        if failing.contains(&dataset) {
            return Err(PrismError::LoadFailed {
                dataset,
                reason: "simulated backend outage".to_string(),
            });
        }
        drop(failing);

        let catalog = self.catalog.lock().map_err(|_| poisoned(dataset))?;
        Ok(project(&catalog))
    }
}

fn poisoned(dataset: Dataset) -> PrismError {
    PrismError::LoadFailed {
        dataset,
        reason: "catalog lock poisoned".to_string(),
    }
}

impl CatalogSource for MockCatalogSource {
    fn load_conditions(&self, force_refresh: bool) -> PrismResult<Vec<Condition>> {
        self.condition_loads.fetch_add(1, Ordering::SeqCst);
        debug!(force_refresh, "mock source loading conditions");
        self.read(Dataset::Conditions, |c| c.conditions.clone())
    }

    fn load_products(&self) -> PrismResult<Vec<Product>> {
        self.read(Dataset::Products, |c| c.products.clone())
    }

    fn load_patient_types(&self) -> PrismResult<Vec<PatientType>> {
        self.read(Dataset::PatientTypes, |c| c.patient_types.clone())
    }
}

// ── JSON file source ──────────────────────────────────────────────────────────

/// Loads every dataset from a JSON catalog document on disk.
///
/// `load_catalog` reads and validates the file once and splits it into the
/// three datasets, so a reload never mixes two versions of the document. The
/// single-dataset loaders each read the file on their own.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    reads: Arc<AtomicUsize>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the document has been read from disk.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn document(&self) -> Result<CatalogDocument, String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("failed to read '{}': {}", self.path.display(), e))?;
        prism_validate::import_str(&text).map_err(|e| e.to_string())
    }

    fn read(&self, dataset: Dataset) -> PrismResult<CatalogDocument> {
        self.document()
            .map_err(|reason| PrismError::LoadFailed { dataset, reason })
    }
}

impl CatalogSource for JsonFileSource {
    fn load_conditions(&self, _force_refresh: bool) -> PrismResult<Vec<Condition>> {
        Ok(self.read(Dataset::Conditions)?.conditions)
    }

    fn load_products(&self) -> PrismResult<Vec<Product>> {
        Ok(self.read(Dataset::Products)?.products)
    }

    fn load_patient_types(&self) -> PrismResult<Vec<PatientType>> {
        Ok(self.read(Dataset::PatientTypes)?.patient_types)
    }

    fn load_catalog(&self, force_refresh: bool) -> FetchedCatalog {
        debug!(force_refresh, path = %self.path.display(), "reading catalog document");
        match self.document() {
            Ok(document) => FetchedCatalog {
                conditions: Ok(document.conditions),
                products: Ok(document.products),
                patient_types: Ok(document.patient_types),
            },
            Err(reason) => {
                let failed = |dataset| PrismError::LoadFailed {
                    dataset,
                    reason: reason.clone(),
                };
                FetchedCatalog {
                    conditions: Err(failed(Dataset::Conditions)),
                    products: Err(failed(Dataset::Products)),
                    patient_types: Err(failed(Dataset::PatientTypes)),
                }
            }
        }
    }
}
