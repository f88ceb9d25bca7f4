//! Resources returned by search and batch deletion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single remote asset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Identifier of the asset, unique within the account.
    pub public_id: String,
    /// File format, e.g. `jpg`.
    #[serde(default)]
    pub format: String,
    /// Version number assigned on upload.
    #[serde(default)]
    pub version: i64,
    /// Resource type, e.g. `image`.
    #[serde(default)]
    pub resource_type: String,
    /// Delivery type, e.g. `upload`.
    #[serde(default, rename = "type")]
    pub delivery_type: String,
}

/// Per-identifier result of a batch deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStatus {
    /// The asset was removed.
    Deleted,
    /// The asset did not exist (already removed or never uploaded).
    NotFound,
    /// Any other status string reported by the service.
    #[serde(untagged)]
    Other(String),
}

/// A page of resources, as returned by search and batch deletion.
///
/// Batch deletion mirrors the search shape and additionally fills
/// [`deleted`](Self::deleted) and [`partial`](Self::partial).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourcePage {
    /// Total number of matches, which may exceed the returned page.
    #[serde(default)]
    pub total_count: u64,
    /// Opaque continuation token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Returned resources, at most the requested cap.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Deletion outcome keyed by public identifier.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deleted: BTreeMap<String, DeletionStatus>,
    /// Whether the service stopped before processing every identifier.
    #[serde(default)]
    pub partial: bool,
}

impl ResourcePage {
    /// Returns the public identifiers of the returned resources, in order.
    pub fn public_ids(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|resource| resource.public_id.clone())
            .collect()
    }

    /// Returns whether the page carries no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the continuation token, treating an empty one as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }

    /// Returns whether more matches exist than were returned.
    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some() || (self.resources.len() as u64) < self.total_count
    }

    /// Number of identifiers reported as deleted.
    pub fn deleted_count(&self) -> usize {
        self.count_status(|status| *status == DeletionStatus::Deleted)
    }

    /// Number of identifiers reported as not found.
    pub fn not_found_count(&self) -> usize {
        self.count_status(|status| *status == DeletionStatus::NotFound)
    }

    fn count_status(&self, predicate: impl Fn(&DeletionStatus) -> bool) -> usize {
        self.deleted.values().filter(|status| predicate(status)).count()
    }
}
