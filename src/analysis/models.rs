//! Data models for product image analysis

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Intended demographic for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Mens,
    Womens,
    Unisex,
    Kids,
    Boys,
    Girls,
    #[serde(rename = "Unisex Adults")]
    UnisexAdults,
    #[serde(rename = "Unisex Kids")]
    UnisexKids,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mens => "Mens",
            Self::Womens => "Womens",
            Self::Unisex => "Unisex",
            Self::Kids => "Kids",
            Self::Boys => "Boys",
            Self::Girls => "Girls",
            Self::UnisexAdults => "Unisex Adults",
            Self::UnisexKids => "Unisex Kids",
        }
    }
}

/// Fit type, when discernible from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fit {
    #[serde(rename = "Slim Fit")]
    Slim,
    #[serde(rename = "Regular Fit")]
    Regular,
    #[serde(rename = "Relaxed Fit")]
    Relaxed,
    Oversized,
    Tailored,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slim => "Slim Fit",
            Self::Regular => "Regular Fit",
            Self::Relaxed => "Relaxed Fit",
            Self::Oversized => "Oversized",
            Self::Tailored => "Tailored",
        }
    }
}

/// Sleeve length for tops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleeveLength {
    Sleeveless,
    #[serde(rename = "Short Sleeve")]
    Short,
    #[serde(rename = "3/4 Sleeve")]
    ThreeQuarter,
    #[serde(rename = "Long Sleeve")]
    Long,
}

impl SleeveLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sleeveless => "Sleeveless",
            Self::Short => "Short Sleeve",
            Self::ThreeQuarter => "3/4 Sleeve",
            Self::Long => "Long Sleeve",
        }
    }
}

/// Distinguishes the main subject of an image from incidental items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prominence {
    Primary,
    Secondary,
}

/// One product-like entity identified in an image.
///
/// Produced by the external analysis capability; immutable once created.
/// Price bounds are consumed as given — an inconsistent user-stated range
/// (`min_price > max_price`) passes through unfiltered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedItem {
    pub product_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<Fit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleeve_length: Option<SleeveLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prominence: Option<Prominence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Full result of analyzing one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAnalysis {
    /// Detected items, most prominent first. Non-empty on success.
    pub items: Vec<DetectedItem>,
    /// Visual elements not captured per item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_context: Option<String>,
}

/// Conversation role accepted from clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One sanitized conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    /// Filter a raw message list down to well-formed entries.
    ///
    /// Entries with an unknown role or non-string content are dropped, not
    /// treated as fatal — a malformed history must not fail the request.
    pub fn sanitize(raw: &[Value]) -> Vec<ConversationMessage> {
        raw.iter()
            .filter_map(|msg| serde_json::from_value(msg.clone()).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detected_item_wire_names() {
        let item: DetectedItem = serde_json::from_value(json!({
            "productType": "t-shirt",
            "category": "Clothing",
            "color": "Red",
            "secondaryColors": ["White"],
            "gender": "Mens",
            "fit": "Slim Fit",
            "sleeveLength": "3/4 Sleeve",
            "prominence": "primary",
            "maxPrice": 50,
            "currency": "GBP"
        }))
        .unwrap();

        assert_eq!(item.product_type, "t-shirt");
        assert_eq!(item.gender, Some(Gender::Mens));
        assert_eq!(item.fit, Some(Fit::Slim));
        assert_eq!(item.sleeve_length, Some(SleeveLength::ThreeQuarter));
        assert_eq!(item.prominence, Some(Prominence::Primary));
        assert_eq!(item.max_price, Some(50.0));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["productType"], "t-shirt");
        assert_eq!(value["sleeveLength"], "3/4 Sleeve");
        assert!(value.get("minPrice").is_none());
    }

    #[test]
    fn test_later_revision_gender_values() {
        for raw in ["Boys", "Girls", "Unisex Adults", "Unisex Kids"] {
            let gender: Gender = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(gender.as_str(), raw);
        }
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let result: Result<Gender, _> = serde_json::from_value(json!("Toddlers"));
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_price_range_passes_through() {
        let item: DetectedItem = serde_json::from_value(json!({
            "productType": "jeans",
            "category": "Clothing",
            "color": "Blue",
            "minPrice": 80,
            "maxPrice": 20
        }))
        .unwrap();
        assert_eq!(item.min_price, Some(80.0));
        assert_eq!(item.max_price, Some(20.0));
    }

    #[test]
    fn test_sanitize_drops_malformed_entries() {
        let raw = vec![
            json!({"role": "user", "content": "blue only"}),
            json!({"role": "tool", "content": "nope"}),
            json!({"role": "user", "content": 42}),
            json!("not an object"),
            json!({"role": "assistant", "content": "found 3 items"}),
        ];

        let messages = ConversationMessage::sanitize(&raw);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "blue only");
        assert_eq!(messages[1].role, Role::Assistant);
    }
}
