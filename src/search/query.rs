//! Attribute-to-query translation
//!
//! Pure functions that turn one [`DetectedItem`] into the three pieces of a
//! search request: a free-text query, conjunctive facet filters, and an
//! optional numeric price filter. Brand, primary colour, and subcategory are
//! deliberately excluded from the text query — they travel as exact-match
//! facet filters instead.

use crate::analysis::models::DetectedItem;

/// Facet attribute carrying the brand value.
pub const BRAND_FACET: &str = "webbrand.en-GB";
/// Facet attribute carrying the primary colour value.
pub const COLOUR_FACET: &str = "cleancolour.en-GB";
/// Facet attribute carrying the subcategory value.
pub const SUBCATEGORY_FACET: &str = "subcategory.en-GB";

/// Default currency when a price bound arrives without one.
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Build the free-text search query for an item.
///
/// Joins the descriptive fields not used as facet filters: gender, secondary
/// colours, style, fit, material, pattern, sleeve length. Falls back to the
/// category, then to `"<color> <productType>"`, so the query is never empty.
pub fn build_search_query(item: &DetectedItem) -> String {
    let mut terms: Vec<&str> = Vec::new();

    if let Some(gender) = item.gender {
        terms.push(gender.as_str());
    }
    if let Some(colors) = &item.secondary_colors {
        terms.extend(colors.iter().map(String::as_str));
    }
    if let Some(style) = &item.style {
        terms.push(style);
    }
    if let Some(fit) = item.fit {
        terms.push(fit.as_str());
    }
    if let Some(material) = &item.material {
        terms.push(material);
    }
    if let Some(pattern) = &item.pattern {
        terms.push(pattern);
    }
    if let Some(sleeve) = item.sleeve_length {
        terms.push(sleeve.as_str());
    }

    terms.retain(|term| !term.trim().is_empty());
    if !terms.is_empty() {
        return terms.join(" ");
    }

    let category = item.category.trim();
    if !category.is_empty() {
        return category.to_string();
    }

    format!("{} {}", item.color, item.product_type)
}

/// Build the conjunctive facet filter groups for an item.
///
/// Each group is a single-element list; every emitted group must match for a
/// record to qualify. Values keep the exact casing and string form of the
/// analyzed attribute.
pub fn build_attribute_filters(item: &DetectedItem) -> Vec<Vec<String>> {
    let mut facet_filters = Vec::new();

    if let Some(brand) = &item.brand {
        if !brand.trim().is_empty() {
            facet_filters.push(vec![format!("{BRAND_FACET}:{brand}")]);
        }
    }
    if !item.color.trim().is_empty() {
        facet_filters.push(vec![format!("{COLOUR_FACET}:{}", item.color)]);
    }
    if let Some(subcategory) = &item.subcategory {
        if !subcategory.trim().is_empty() {
            facet_filters.push(vec![format!("{SUBCATEGORY_FACET}:{subcategory}")]);
        }
    }

    facet_filters
}

/// Build the numeric price filter expression for an item, if any bound is set.
///
/// The field path is a function of the currency (explicit, else GBP); values
/// are emitted as given, with no rounding or conversion. An inverted range
/// passes through unchanged.
pub fn build_price_filter(item: &DetectedItem) -> Option<String> {
    if item.max_price.is_none() && item.min_price.is_none() {
        return None;
    }

    let currency = item.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let field = format!("prices.{currency}.sellingPrice");

    match (item.min_price, item.max_price) {
        (Some(min), Some(max)) => Some(format!("{field} >= {min} AND {field} <= {max}")),
        (None, Some(max)) => Some(format!("{field} <= {max}")),
        (Some(min), None) => Some(format!("{field} >= {min}")),
        (None, None) => None,
    }
}
