//! # Resource Registry
//!
//! The generic store every service backend keeps its live records in.
//!
//! ## Key Types
//!
//! - [`Resource`]: the trait every record type implements.
//! - [`ResourceRegistry`]: ordered id → record map with collision-checked id generation.
//! - [`Scope`]: the (account, region, partition) a backend instance belongs to.
//! - [`paginate`]: offset-token pagination shared by the list/describe operations.

use std::collections::HashMap;
use std::fmt::Debug;

use rand::Rng;
use tracing::debug;

/// Trait that any record must implement to live in a [`ResourceRegistry`].
///
/// Identity is the generated id and nothing else; two records with the same id
/// are the same resource.
pub trait Resource: Clone + Debug + Send + 'static {
    /// Short noun used in log fields (`kind = "directory"`).
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// In-memory store of live records for one backend.
///
/// Listing preserves insertion order so describe/list responses are stable.
#[derive(Debug)]
pub struct ResourceRegistry<T: Resource> {
    store: HashMap<String, T>,
    order: Vec<String>,
}

impl<T: Resource> Default for ResourceRegistry<T> {
    fn default() -> Self {
        Self {
            store: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Resource> ResourceRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws candidate ids from `make` until one is not already live.
    pub fn generate_id(&self, mut make: impl FnMut() -> String) -> String {
        loop {
            let candidate = make();
            if !self.store.contains_key(&candidate) {
                return candidate;
            }
            debug!(kind = T::KIND, id = %candidate, "Id collision, regenerating");
        }
    }

    /// Commits a fully-constructed record and returns its id.
    pub fn insert(&mut self, record: T) -> String {
        let id = record.id().to_string();
        if self.store.insert(id.clone(), record).is_none() {
            self.order.push(id.clone());
        }
        id
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.store.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.store.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let record = self.store.remove(id)?;
        self.order.retain(|live| live != id);
        Some(record)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.contains_key(id)
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.store.get(id))
    }

    pub fn list(&self, filter: impl Fn(&T) -> bool) -> Vec<&T> {
        self.iter().filter(|r| filter(r)).collect()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.iter().find(|r| predicate(r))
    }

    pub fn count(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.store.values().filter(|r| predicate(r)).count()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Lower-case random hex, used for every generated resource id suffix.
pub fn random_hex(len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

/// The (account, region, partition) a backend instance serves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub account_id: String,
    pub region: String,
    pub partition: String,
}

impl Scope {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            partition: partition.into(),
        }
    }

    /// `arn:{partition}:{service}:{region}:{account}:{resource}`
    pub fn arn(&self, service: &str, resource: &str) -> String {
        format!(
            "arn:{}:{}:{}:{}:{}",
            self.partition, service, self.region, self.account_id, resource
        )
    }

    /// The zones every simulated region exposes: `{region}a`, `{region}b`, `{region}c`.
    pub fn availability_zones(&self) -> Vec<String> {
        ["a", "b", "c"]
            .iter()
            .map(|suffix| format!("{}{}", self.region, suffix))
            .collect()
    }
}

/// The supplied pagination token is not one this backend issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value passed for the NextToken parameter")]
pub struct InvalidNextToken;

/// Slices `items` starting at the offset encoded in `next_token`.
///
/// Returns the page and, when more items remain, the token for the next one.
pub fn paginate<T: Clone>(
    items: &[T],
    next_token: Option<&str>,
    limit: usize,
) -> Result<(Vec<T>, Option<String>), InvalidNextToken> {
    let start = match next_token {
        None => 0,
        Some(token) => token
            .parse::<usize>()
            .ok()
            .filter(|offset| *offset <= items.len())
            .ok_or(InvalidNextToken)?,
    };
    let end = start.saturating_add(limit.max(1)).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    Ok((items[start..end].to_vec(), next))
}
