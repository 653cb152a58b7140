//! The availability annotator.
//!
//! Cross-references resolved identifiers against the product-availability
//! catalog. Lookups use the bare identifier, and unknown products count as
//! available: the product catalog can lag behind condition edits, and hiding
//! a recommendation is worse than showing one that is not stocked.

use serde::Serialize;

use prism_contracts::{
    catalog::Product,
    condition::{Condition, ProductDetail},
    settings::ResolutionSettings,
};

use crate::details::product_details;

/// Whether `product_id` is available according to `products`.
pub fn is_available(product_id: &str, products: &[Product], settings: &ResolutionSettings) -> bool {
    let bare = settings.bare_product_id(product_id);
    products
        .iter()
        .find(|p| p.name == bare)
        .map_or(true, |p| p.is_available)
}

/// A resolved recommendation ready for the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedProduct {
    /// Identifier exactly as resolved, marker included.
    pub id: String,
    /// Bare identifier used for display and joins.
    pub name: String,
    /// True if the identifier carried the restriction marker.
    pub restricted: bool,
    pub available: bool,
    pub details: Option<ProductDetail>,
}

/// Annotate every resolved identifier for `condition`.
pub fn annotate(
    resolved: &[String],
    condition: &Condition,
    products: &[Product],
    settings: &ResolutionSettings,
) -> Vec<AnnotatedProduct> {
    resolved
        .iter()
        .map(|id| AnnotatedProduct {
            id: id.clone(),
            name: settings.bare_product_id(id).to_string(),
            restricted: settings.is_restricted(id),
            available: is_available(id, products, settings),
            details: product_details(condition, id, settings).cloned(),
        })
        .collect()
}
