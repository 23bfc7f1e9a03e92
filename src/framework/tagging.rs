//! Shared tagging component.
//!
//! One [`TaggingService`] lives inside each backend. It is keyed by whatever string
//! the owning service's tagging API addresses resources with (an id or an ARN), and
//! its lifecycle is independent of the records it tags: backends must call
//! [`TaggingService::delete_all_tags_for_resource`] when they delete a record.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::framework::validation::{matches, max_length, Pattern, ValidationError, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

static TAG_KEY: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"^([\p{L}\p{Z}\p{N}_.:/=+\-@]*)$"));

#[derive(Debug, Default)]
pub struct TaggingService {
    tags: HashMap<String, Vec<Tag>>,
}

impl TaggingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts: an existing key keeps its position and takes the new value.
    pub fn tag_resource(&mut self, resource: &str, tags: &[Tag]) {
        if tags.is_empty() {
            return;
        }
        let current = self.tags.entry(resource.to_string()).or_default();
        for tag in tags {
            match current.iter_mut().find(|t| t.key == tag.key) {
                Some(existing) => existing.value = tag.value.clone(),
                None => current.push(tag.clone()),
            }
        }
    }

    pub fn untag_resource_using_names(&mut self, resource: &str, keys: &[String]) {
        if let Some(current) = self.tags.get_mut(resource) {
            current.retain(|t| !keys.contains(&t.key));
            if current.is_empty() {
                self.tags.remove(resource);
            }
        }
    }

    pub fn delete_all_tags_for_resource(&mut self, resource: &str) {
        self.tags.remove(resource);
    }

    pub fn list_tags_for_resource(&self, resource: &str) -> Vec<Tag> {
        self.tags.get(resource).cloned().unwrap_or_default()
    }

    /// Tags as a key → value map, for services whose APIs speak maps.
    pub fn tag_map_for_resource(&self, resource: &str) -> BTreeMap<String, String> {
        self.tags
            .get(resource)
            .map(|tags| tags.iter().map(|t| (t.key.clone(), t.value.clone())).collect())
            .unwrap_or_default()
    }

    pub fn tag_count(&self, resource: &str) -> usize {
        self.tags.get(resource).map_or(0, Vec::len)
    }

    pub fn has_tags(&self, resource: &str) -> bool {
        self.tags.contains_key(resource)
    }

    /// Number of resources with at least one tag.
    pub fn tagged_resources(&self) -> usize {
        self.tags.len()
    }
}

/// Converts a tag map into the list form used internally.
pub fn tags_from_map(map: &BTreeMap<String, String>) -> Vec<Tag> {
    map.iter().map(|(k, v)| Tag::new(k.clone(), v.clone())).collect()
}

/// Checks every key and value, then the total count when `limit` is non-zero.
pub fn validate_tags(tags: &[Tag], limit: usize) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    for (idx, tag) in tags.iter().enumerate() {
        let key_field = format!("tags.{}.member.key", idx + 1);
        v.check(&key_field, tag.key.as_str(), max_length(128));
        v.check(&key_field, tag.key.as_str(), matches(&TAG_KEY));
        v.check(
            &format!("tags.{}.member.value", idx + 1),
            tag.value.as_str(),
            max_length(256),
        );
    }
    if limit > 0 && tags.len() > limit {
        let keys: Vec<String> = tags.iter().map(|t| t.key.clone()).collect();
        v.violation("tags", keys, format!("have length less than or equal to {limit}"));
    }
    v.finish()
}
