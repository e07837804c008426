//! Item and claim records
//!
//! Field names serialize in camelCase to match what the browser client
//! reads (`dateFound`, `detectedObjects`, `itemId`, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Category of a found item
///
/// Unrecognized strings are kept verbatim in `Unrecognized` rather than
/// rejected, so a client sending an unknown category still gets its item
/// stored with exactly that value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemCategory {
    Phone,
    Book,
    Bottle,
    Wallet,
    Bag,
    Electronics,
    Accessories,
    Other,
    Unrecognized(String),
}

impl ItemCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ItemCategory::Phone => "phone",
            ItemCategory::Book => "book",
            ItemCategory::Bottle => "bottle",
            ItemCategory::Wallet => "wallet",
            ItemCategory::Bag => "bag",
            ItemCategory::Electronics => "electronics",
            ItemCategory::Accessories => "accessories",
            ItemCategory::Other => "other",
            ItemCategory::Unrecognized(s) => s,
        }
    }
}

impl From<String> for ItemCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "phone" => ItemCategory::Phone,
            "book" => ItemCategory::Book,
            "bottle" => ItemCategory::Bottle,
            "wallet" => ItemCategory::Wallet,
            "bag" => ItemCategory::Bag,
            "electronics" => ItemCategory::Electronics,
            "accessories" => ItemCategory::Accessories,
            "other" => ItemCategory::Other,
            _ => ItemCategory::Unrecognized(s),
        }
    }
}

impl From<ItemCategory> for String {
    fn from(c: ItemCategory) -> Self {
        match c {
            ItemCategory::Unrecognized(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Pending,
    Claimed,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemStatus::Available => "available",
            ItemStatus::Pending => "pending",
            ItemStatus::Claimed => "claimed",
        };
        f.write_str(s)
    }
}

/// Decision state of a claim
///
/// `Other` holds any status string outside the three known ones. Whether
/// such a value is accepted is a claim-policy decision made by the
/// service, not by deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl ClaimStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Other(s) => s,
        }
    }

    /// Approved and rejected claims have no further defined transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }

    /// Item status implied by this claim decision, if any
    pub fn item_effect(&self) -> Option<ItemStatus> {
        match self {
            ClaimStatus::Approved => Some(ItemStatus::Claimed),
            ClaimStatus::Rejected => Some(ItemStatus::Available),
            _ => None,
        }
    }
}

impl From<String> for ClaimStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => ClaimStatus::Pending,
            "approved" => ClaimStatus::Approved,
            "rejected" => ClaimStatus::Rejected,
            _ => ClaimStatus::Other(s),
        }
    }
}

impl From<ClaimStatus> for String {
    fn from(s: ClaimStatus) -> Self {
        match s {
            ClaimStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One object recognized by the external detector
///
/// Stored exactly as the detector reported it. The detector usually sends
/// `class`, `confidence` and an `[x1, y1, x2, y2]` `bbox`, but nothing here
/// depends on that shape; the accessors return `None` when a key is absent
/// or has an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedObject(Value);

impl DetectedObject {
    pub fn class(&self) -> Option<&str> {
        self.0.get("class").and_then(Value::as_str)
    }

    pub fn confidence(&self) -> Option<f64> {
        self.0.get("confidence").and_then(Value::as_f64)
    }

    /// Box corners as numbers; integer and float boxes both convert
    pub fn bbox(&self) -> Option<Vec<f64>> {
        self.0
            .get("bbox")?
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for DetectedObject {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A found item reported to the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub category: ItemCategory,
    /// Public path of the stored photo, empty when none was uploaded
    pub image: String,
    pub location: String,
    pub date_found: String,
    pub description: String,
    pub status: ItemStatus,
    pub detected_objects: Vec<DetectedObject>,
}

/// A student's ownership claim over an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    pub item_id: String,
    pub item_title: String,
    pub item_image: String,
    pub student_name: String,
    pub student_id: String,
    pub description: String,
    pub submitted_date: String,
    pub status: ClaimStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_category_is_preserved() {
        let cat: ItemCategory = serde_json::from_value(json!("umbrella")).unwrap();
        assert_eq!(cat, ItemCategory::Unrecognized("umbrella".to_string()));
        assert_eq!(serde_json::to_value(&cat).unwrap(), json!("umbrella"));
    }

    #[test]
    fn test_known_category_parses() {
        let cat: ItemCategory = serde_json::from_value(json!("wallet")).unwrap();
        assert_eq!(cat, ItemCategory::Wallet);
    }

    #[test]
    fn test_claim_status_item_effect() {
        assert_eq!(ClaimStatus::Approved.item_effect(), Some(ItemStatus::Claimed));
        assert_eq!(ClaimStatus::Rejected.item_effect(), Some(ItemStatus::Available));
        assert_eq!(ClaimStatus::Pending.item_effect(), None);
        assert_eq!(ClaimStatus::from("maybe".to_string()).item_effect(), None);
    }

    #[test]
    fn test_claim_status_terminal() {
        assert!(ClaimStatus::Approved.is_terminal());
        assert!(ClaimStatus::Rejected.is_terminal());
        assert!(!ClaimStatus::Pending.is_terminal());
        assert!(!ClaimStatus::Other("x".into()).is_terminal());
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = Item {
            id: "1".into(),
            title: "Black Wallet".into(),
            category: ItemCategory::Wallet,
            image: String::new(),
            location: "Library".into(),
            date_found: "2025-11-21".into(),
            description: "No description provided".into(),
            status: ItemStatus::Available,
            detected_objects: vec![],
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["dateFound"], "2025-11-21");
        assert_eq!(value["status"], "available");
        assert_eq!(value["detectedObjects"], json!([]));
        assert_eq!(value["category"], "wallet");
    }

    #[test]
    fn test_detected_object_keeps_extra_fields() {
        let raw = json!({
            "class": "cell phone",
            "confidence": 0.91,
            "bbox": [10, 20, 110, 220],
            "track_id": 4
        });
        let obj: DetectedObject = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(obj.class(), Some("cell phone"));
        assert_eq!(obj.confidence(), Some(0.91));
        assert_eq!(obj.bbox(), Some(vec![10.0, 20.0, 110.0, 220.0]));
        assert_eq!(serde_json::to_value(&obj).unwrap(), raw);
    }

    #[test]
    fn test_detected_object_float_box_is_kept_verbatim() {
        let raw = json!({ "class": "cup", "confidence": 0.9, "bbox": [1.5, 2.0, 3.0, 4.25] });
        let obj = DetectedObject::from(raw.clone());
        assert_eq!(obj.bbox(), Some(vec![1.5, 2.0, 3.0, 4.25]));
        assert_eq!(serde_json::to_value(&obj).unwrap(), raw);
    }

    #[test]
    fn test_detected_object_with_other_keys() {
        let raw = json!({ "label": "book", "score": "high", "bbox": "n/a" });
        let obj: DetectedObject = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(obj.class(), None);
        assert_eq!(obj.confidence(), None);
        assert_eq!(obj.bbox(), None);
        assert_eq!(obj.as_value(), &raw);
    }
}
