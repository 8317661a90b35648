//! Data models for catalog search

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A string localized per storefront locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedString {
    #[serde(rename = "en-GB", skip_serializing_if = "Option::is_none")]
    pub en_gb: Option<String>,
}

/// A string list localized per storefront locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedList {
    #[serde(rename = "en-GB", skip_serializing_if = "Option::is_none")]
    pub en_gb: Option<Vec<String>>,
}

/// Price details for one currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetails {
    pub selling_price: f64,
    pub ticket_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_percentage: Option<f64>,
}

/// One catalog record, limited to the retrieved attribute set.
///
/// Only `object_id` participates in core logic (dedup identity); everything
/// else is display data passed through to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour_name: Option<LocalizedString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<HashMap<String, PriceDetails>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<f64>,
    #[serde(rename = "cleansize", skip_serializing_if = "Option::is_none")]
    pub clean_size: Option<LocalizedList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<LocalizedList>,
    #[serde(rename = "activitygroup", skip_serializing_if = "Option::is_none")]
    pub activity_group: Option<LocalizedList>,
    #[serde(rename = "sleevelength", skip_serializing_if = "Option::is_none")]
    pub sleeve_length: Option<LocalizedList>,
    #[serde(rename = "garmentcare", skip_serializing_if = "Option::is_none")]
    pub garment_care: Option<LocalizedList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_price_group_value: Option<String>,
}

impl SearchRecord {
    /// Minimal record for tests.
    #[cfg(test)]
    pub fn stub(object_id: &str) -> Self {
        Self {
            object_id: object_id.to_string(),
            name: None,
            brand: None,
            colour_name: None,
            colour_code: None,
            alternative_images: None,
            prices: None,
            ticket_price: None,
            clean_size: None,
            product_link: None,
            category: None,
            activity_group: None,
            sleeve_length: None,
            garment_care: None,
            has_inventory: None,
            is_hidden: None,
            selling_price_group_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_wire_names() {
        let record: SearchRecord = serde_json::from_value(json!({
            "objectID": "12345",
            "name": {"en-GB": "Slim Fit T-Shirt"},
            "brand": "Boss",
            "colourName": {"en-GB": "Red"},
            "prices": {"GBP": {"sellingPrice": 39.0, "ticketPrice": 49.0}},
            "cleansize": {"en-GB": ["S", "M", "L"]},
            "hasInventory": true
        }))
        .unwrap();

        assert_eq!(record.object_id, "12345");
        assert_eq!(record.name.unwrap().en_gb.unwrap(), "Slim Fit T-Shirt");
        assert_eq!(record.prices.unwrap()["GBP"].selling_price, 39.0);
        assert_eq!(record.has_inventory, Some(true));

        let value = serde_json::to_value(SearchRecord::stub("A")).unwrap();
        assert_eq!(value, json!({"objectID": "A"}));
    }

    #[test]
    fn test_unknown_record_fields_are_ignored() {
        let record: SearchRecord = serde_json::from_value(json!({
            "objectID": "1",
            "someNewIndexField": {"nested": true}
        }))
        .unwrap();
        assert_eq!(record.object_id, "1");
    }
}
