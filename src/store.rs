//! Storage collaborator boundary.
//!
//! The engines never query a datastore directly; they go through
//! [`RecordStore`]. Detail lookups return a [`LookupOutcome`] so the
//! duplicate-resolution policy is explicit branching rather than
//! exception handling.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::record::Record;

/// Result of a detail lookup by canonical identifier.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(Record),
    NotFound,
    /// More than one record carries the identifier. A rare data-quality
    /// condition: typically an active record colliding with a superseded
    /// one that kept the same ID.
    Ambiguous,
}

/// Record storage and query execution, consumed by the engines.
///
/// Collections are addressed by catalog and entity: the same entity model
/// name may exist in several catalogs (ATT&CK and MBC both browse
/// techniques) without their records mixing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The full collection for an entity, in the store's natural order.
    async fn list(&self, catalog: &str, entity: &str) -> Vec<Record>;

    /// Look up one record by canonical identifier. With `visible_only`,
    /// deprecated and revoked records are excluded from consideration.
    async fn lookup(
        &self,
        catalog: &str,
        entity: &str,
        mitre_id: &str,
        visible_only: bool,
    ) -> LookupOutcome;
}

type Dataset = HashMap<String, HashMap<String, Vec<Record>>>;

/// In-memory store, used by the server binary (loaded from a JSON dataset)
/// and by tests.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, catalog: &str, entity: &str, record: Record) {
        self.records
            .write()
            .expect("record map poisoned")
            .entry(catalog.to_string())
            .or_default()
            .entry(entity.to_string())
            .or_default()
            .push(record);
    }

    /// Load a dataset of the shape
    /// `{ "<catalog>": { "<entity>": [ <record>, ... ] } }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let parsed: Dataset = serde_json::from_str(&raw)?;
        let total: usize = parsed
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum();
        tracing::info!(
            catalogs = parsed.len(),
            records = total,
            "loaded dataset from {}",
            path.as_ref().display()
        );
        Ok(Self {
            records: RwLock::new(parsed),
        })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, catalog: &str, entity: &str) -> Vec<Record> {
        self.records
            .read()
            .expect("record map poisoned")
            .get(catalog)
            .and_then(|c| c.get(entity))
            .cloned()
            .unwrap_or_default()
    }

    async fn lookup(
        &self,
        catalog: &str,
        entity: &str,
        mitre_id: &str,
        visible_only: bool,
    ) -> LookupOutcome {
        let records = self.records.read().expect("record map poisoned");
        let mut matches = records
            .get(catalog)
            .and_then(|c| c.get(entity))
            .map(|rs| {
                rs.iter()
                    .filter(|r| r.mitre_id == mitre_id)
                    .filter(|r| !visible_only || r.is_visible())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        match matches.len() {
            0 => LookupOutcome::NotFound,
            1 => LookupOutcome::Found(matches.remove(0)),
            _ => LookupOutcome::Ambiguous,
        }
    }
}
