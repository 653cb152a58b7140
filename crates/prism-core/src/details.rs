//! Product detail and research lookups for resolved identifiers.

use prism_contracts::{
    condition::{Condition, ProductDetail, ResearchArticle},
    settings::ResolutionSettings,
};

/// Descriptive record for `product_id`, looked up by its bare identifier.
pub fn product_details<'c>(
    condition: &'c Condition,
    product_id: &str,
    settings: &ResolutionSettings,
) -> Option<&'c ProductDetail> {
    condition
        .product_details
        .get(settings.bare_product_id(product_id))
}

/// Research for `product_id` within `condition`.
///
/// Condition-specific research wins over the product's general list.
pub fn product_research<'c>(
    condition: &'c Condition,
    product_id: &str,
    settings: &ResolutionSettings,
) -> &'c [ResearchArticle] {
    let bare = settings.bare_product_id(product_id);
    if let Some(articles) = condition.condition_specific_research.get(bare) {
        if !articles.is_empty() {
            return articles;
        }
    }
    product_details(condition, product_id, settings)
        .map(|detail| detail.research_articles.as_slice())
        .unwrap_or_default()
}

/// Usage instructions for `product_id` in `phase`, if any.
pub fn usage_for_phase<'c>(
    condition: &'c Condition,
    product_id: &str,
    phase: &str,
    settings: &ResolutionSettings,
) -> Option<&'c str> {
    product_details(condition, product_id, settings).and_then(|d| d.usage.for_phase(phase))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn condition() -> Condition {
        serde_json::from_value(json!({
            "id": "c1",
            "name": "Implant Placement",
            "phases": ["Pre-op", "Post-op"],
            "patientSpecificConfig": {},
            "productDetails": {
                "Rinse": {
                    "usage": { "Post-op": "Rinse twice daily for 14 days" },
                    "researchArticles": [{ "title": "General rinse study" }]
                },
                "Gel": {
                    "researchArticles": [{ "title": "Gel overview" }]
                }
            },
            "conditionSpecificResearch": {
                "Rinse": [{ "title": "Rinse after implant surgery", "author": "Lee et al." }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn condition_specific_research_takes_precedence() {
        let settings = ResolutionSettings::default();
        let condition = condition();

        let rinse = product_research(&condition, "Rinse", &settings);
        assert_eq!(rinse.len(), 1);
        assert_eq!(rinse[0].title, "Rinse after implant surgery");

        let gel = product_research(&condition, "Gel (Type 3/4 Only)", &settings);
        assert_eq!(gel[0].title, "Gel overview");

        assert!(product_research(&condition, "Unknown", &settings).is_empty());
    }

    #[test]
    fn usage_is_looked_up_per_phase() {
        let settings = ResolutionSettings::default();
        let condition = condition();

        assert_eq!(
            usage_for_phase(&condition, "Rinse", "Post-op", &settings),
            Some("Rinse twice daily for 14 days")
        );
        assert_eq!(usage_for_phase(&condition, "Rinse", "Pre-op", &settings), None);
        assert_eq!(usage_for_phase(&condition, "Gel", "Pre-op", &settings), None);
    }
}
