//! Item/claim lifecycle
//!
//! The coordinator owns both stores and is the only place item and claim
//! statuses change. Every mutation publishes its events while still
//! holding the store lock, so subscribers see events in mutation order.
//!
//! Status rules:
//! - a new claim moves its item to `pending`
//! - `approved` moves the item to `claimed`, `rejected` back to `available`
//! - under [`ClaimPolicy::Strict`] claims on unavailable items,
//!   re-decisions, double approvals and unknown statuses are refused

use lostfound_common::config::ClaimPolicy;
use lostfound_common::events::{EventBus, LostFoundEvent};
use lostfound_common::models::{
    Claim, ClaimStatus, DetectedObject, Item, ItemCategory, ItemStatus,
};
use lostfound_common::time::today;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::detector::Detector;
use crate::store::LostFoundStore;
use crate::uploads::store_upload;

const DEFAULT_TITLE: &str = "Unknown Item";
const DEFAULT_LOCATION: &str = "Unknown Location";
const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Lifecycle operation failures
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Item not found")]
    ItemNotFound,

    #[error("Claim not found")]
    ClaimNotFound,

    /// Refused by the strict claim policy
    #[error("{0}")]
    Conflict(String),

    /// Status value outside approved/rejected under the strict policy
    #[error("Invalid claim status: {0}")]
    InvalidStatus(String),

    /// Writing the uploaded photo failed
    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

/// Item fields as submitted; empty strings count as absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewItem {
    pub title: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub date_found: Option<String>,
}

/// Photo attached to a new item
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Claim fields as submitted; missing values are stored as empty strings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewClaim {
    pub item_id: String,
    pub item_title: String,
    pub item_image: String,
    pub student_name: String,
    pub student_id: String,
    pub description: String,
}

fn or_default(value: Option<String>, default: impl FnOnce() -> String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(default)
}

/// Coordinates item and claim state and publishes live updates
pub struct LifecycleCoordinator {
    store: RwLock<LostFoundStore>,
    event_bus: EventBus,
    detector: Arc<dyn Detector>,
    uploads_dir: PathBuf,
    policy: ClaimPolicy,
}

impl LifecycleCoordinator {
    pub fn new(
        event_bus: EventBus,
        detector: Arc<dyn Detector>,
        uploads_dir: PathBuf,
        policy: ClaimPolicy,
    ) -> Self {
        Self {
            store: RwLock::new(LostFoundStore::new()),
            event_bus,
            detector,
            uploads_dir,
            policy,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn policy(&self) -> ClaimPolicy {
        self.policy
    }

    /// Register a newly found item
    ///
    /// The photo, if any, is stored and run through the detector before the
    /// item is created. Detection problems never fail the request.
    pub async fn create_item(
        &self,
        fields: NewItem,
        image: Option<ImageUpload>,
    ) -> Result<Item, LifecycleError> {
        let (image_path, detected_objects) = match image {
            Some(upload) => {
                let stored =
                    store_upload(&self.uploads_dir, &upload.filename, &upload.bytes).await?;
                let detected = self.detect(stored.path).await;
                (stored.public_path, detected)
            }
            None => (String::new(), Vec::new()),
        };

        let mut store = self.store.write().await;
        let item = store.items.create(|id| Item {
            id,
            title: or_default(fields.title, || DEFAULT_TITLE.to_string()),
            category: ItemCategory::from(or_default(fields.category, || "other".to_string())),
            image: image_path,
            location: or_default(fields.location, || DEFAULT_LOCATION.to_string()),
            date_found: or_default(fields.date_found, today),
            description: or_default(fields.description, || DEFAULT_DESCRIPTION.to_string()),
            status: ItemStatus::Available,
            detected_objects,
        });

        info!(
            item_id = %item.id,
            category = %item.category,
            detections = item.detected_objects.len(),
            "Item added"
        );
        self.event_bus.publish(LostFoundEvent::ItemAdded(item.clone()));
        Ok(item)
    }

    async fn detect(&self, image_path: PathBuf) -> Vec<DetectedObject> {
        let detector = Arc::clone(&self.detector);
        match tokio::task::spawn_blocking(move || detector.detect(&image_path)).await {
            Ok(objects) => objects,
            Err(e) => {
                warn!("Detector task failed: {}", e);
                Vec::new()
            }
        }
    }

    /// All items in the order they were added
    pub async fn list_items(&self) -> Vec<Item> {
        self.store.read().await.items.all().to_vec()
    }

    pub async fn get_item(&self, id: &str) -> Result<Item, LifecycleError> {
        self.store
            .read()
            .await
            .items
            .get(id)
            .cloned()
            .ok_or(LifecycleError::ItemNotFound)
    }

    /// File a claim and mark the referenced item pending
    ///
    /// The referenced item does not have to exist.
    pub async fn create_claim(&self, fields: NewClaim) -> Result<Claim, LifecycleError> {
        let mut store = self.store.write().await;

        if self.policy == ClaimPolicy::Strict {
            if let Some(item) = store.items.get(&fields.item_id) {
                if item.status != ItemStatus::Available {
                    return Err(LifecycleError::Conflict(format!(
                        "Item is not available (status: {})",
                        item.status
                    )));
                }
            }
        }

        let claim = store.claims.create(|id| Claim {
            id,
            item_id: fields.item_id,
            item_title: fields.item_title,
            item_image: fields.item_image,
            student_name: fields.student_name,
            student_id: fields.student_id,
            description: fields.description,
            submitted_date: today(),
            status: ClaimStatus::Pending,
        });

        let item = store
            .items
            .update(&claim.item_id, |item| item.status = ItemStatus::Pending);

        match &item {
            Some(_) => info!(claim_id = %claim.id, item_id = %claim.item_id, "Claim submitted"),
            None => warn!(
                claim_id = %claim.id,
                item_id = %claim.item_id,
                "Claim submitted for unknown item"
            ),
        }

        if let Some(item) = item {
            self.event_bus.publish(LostFoundEvent::ItemUpdated(item));
        }
        self.event_bus.publish(LostFoundEvent::ClaimAdded(claim.clone()));
        Ok(claim)
    }

    /// Record an admin decision on a claim and apply it to the item
    pub async fn set_claim_status(
        &self,
        claim_id: &str,
        status: ClaimStatus,
    ) -> Result<Claim, LifecycleError> {
        let mut store = self.store.write().await;

        let current = store
            .claims
            .get(claim_id)
            .ok_or(LifecycleError::ClaimNotFound)?;

        if self.policy == ClaimPolicy::Strict {
            if !status.is_terminal() {
                return Err(LifecycleError::InvalidStatus(status.to_string()));
            }
            if current.status != ClaimStatus::Pending {
                return Err(LifecycleError::Conflict(format!(
                    "Claim has already been {}",
                    current.status
                )));
            }
            if status == ClaimStatus::Approved {
                let item_claimed = store
                    .items
                    .get(&current.item_id)
                    .is_some_and(|item| item.status == ItemStatus::Claimed);
                if item_claimed {
                    return Err(LifecycleError::Conflict(
                        "Item has already been claimed".to_string(),
                    ));
                }
            }
        }

        let effect = status.item_effect();
        let claim = store
            .claims
            .update(claim_id, |claim| claim.status = status)
            .ok_or(LifecycleError::ClaimNotFound)?;

        let item = store.items.update(&claim.item_id, |item| {
            if let Some(new_status) = effect {
                item.status = new_status;
            }
        });

        info!(
            claim_id = %claim.id,
            item_id = %claim.item_id,
            status = %claim.status,
            item_status = item.as_ref().map(|i| i.status.to_string()).unwrap_or_default(),
            "Claim status updated"
        );

        if let Some(item) = item {
            self.event_bus.publish(LostFoundEvent::ItemUpdated(item));
        }
        self.event_bus.publish(LostFoundEvent::ClaimUpdated(claim.clone()));
        Ok(claim)
    }

    pub async fn get_claim(&self, id: &str) -> Result<Claim, LifecycleError> {
        self.store
            .read()
            .await
            .claims
            .get(id)
            .cloned()
            .ok_or(LifecycleError::ClaimNotFound)
    }

    /// All claims in the order they were filed
    pub async fn list_claims(&self) -> Vec<Claim> {
        self.store.read().await.claims.all().to_vec()
    }
}
