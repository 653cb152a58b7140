//! Boundary traits between the engine and its collaborators.
//!
//! - `CatalogSource`: the external data-access layer (may do I/O)
//! - `ConditionValidator`: the data-validation boundary applied on reload
//!
//! The `Browser` calls both from `reload()`. Everything downstream of them is
//! pure and synchronous.
//!
//! `load_concurrently` is the default fetch: the three loaders run on scoped
//! threads and nothing is returned until all of them have finished.

use std::thread;

use prism_contracts::{
    catalog::{Dataset, PatientType, Product},
    condition::Condition,
    error::{PrismError, PrismResult},
    validation::ValidationReport,
};

/// Raw results of the three loader calls for one reload.
#[derive(Debug)]
pub struct FetchedCatalog {
    pub conditions: PrismResult<Vec<Condition>>,
    pub products: PrismResult<Vec<Product>>,
    pub patient_types: PrismResult<Vec<PatientType>>,
}

/// Loader functions provided by the external data-access layer.
///
/// The three calls are independent and may run concurrently; the engine
/// applies their results together as one snapshot.
pub trait CatalogSource: Send + Sync {
    /// Fetch every condition.
    ///
    /// With `force_refresh` the implementation must bypass any cache and
    /// return the freshest backing data.
    fn load_conditions(&self, force_refresh: bool) -> PrismResult<Vec<Condition>>;

    /// Fetch the product-availability catalog.
    fn load_products(&self) -> PrismResult<Vec<Product>>;

    /// Fetch the patient-type catalog.
    fn load_patient_types(&self) -> PrismResult<Vec<PatientType>>;

    /// Fetch all three datasets for one reload.
    ///
    /// The default runs the three loaders concurrently. Sources backed by a
    /// single document override this to read it once, so the three results
    /// always come from the same version.
    fn load_catalog(&self, force_refresh: bool) -> FetchedCatalog {
        load_concurrently(self, force_refresh)
    }
}

/// Run the three loader calls of `source` concurrently and wait for all of
/// them.
pub fn load_concurrently<S>(source: &S, force_refresh: bool) -> FetchedCatalog
where
    S: CatalogSource + ?Sized,
{
    thread::scope(|scope| {
        let conditions = scope.spawn(|| source.load_conditions(force_refresh));
        let products = scope.spawn(|| source.load_products());
        let patient_types = source.load_patient_types();

        FetchedCatalog {
            conditions: join_loader(conditions.join(), Dataset::Conditions),
            products: join_loader(products.join(), Dataset::Products),
            patient_types,
        }
    })
}

fn join_loader<T>(joined: thread::Result<PrismResult<T>>, dataset: Dataset) -> PrismResult<T> {
    joined.unwrap_or_else(|_| {
        Err(PrismError::LoadFailed {
            dataset,
            reason: "loader panicked".to_string(),
        })
    })
}

/// Semantic checks applied to each condition before it enters the catalog.
///
/// A failing report removes the condition from the snapshot. Implementations
/// must not mutate or reorder anything.
pub trait ConditionValidator: Send + Sync {
    fn validate(&self, condition: &Condition) -> ValidationReport;
}
