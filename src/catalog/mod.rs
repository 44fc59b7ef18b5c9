use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

use crate::models::{normalize_name, CatalogEntry, FeatureVector, SongIdentity, FEATURE_COUNT};

pub mod loader;

pub use loader::SnapshotError;

/// Immutable in-memory feature catalog
///
/// Built once from a snapshot and shared read-only for the rest of the
/// process. Lookups go through a precomputed `name_key -> rows` index; the
/// feature norm and the self-exclusion identity of every row are cached for
/// the scorer.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    norms: Vec<f64>,
    identities: Vec<SongIdentity>,
    name_index: HashMap<String, Vec<usize>>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Builds a catalog from entries already in memory
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let norms = entries.iter().map(|entry| entry.features.norm()).collect();
        let identities = entries.iter().map(CatalogEntry::identity).collect();

        let mut name_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            name_index.entry(entry.name_key()).or_default().push(idx);
        }

        Self {
            entries,
            norms,
            identities,
            name_index,
            loaded_at: Utc::now(),
        }
    }

    /// Loads and validates a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let entries = loader::load_snapshot(path.as_ref())?;
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Cached feature norms, aligned with `entries()`
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// Cached `(lowercase name, year)` identities, aligned with `entries()`
    pub fn identities(&self) -> &[SongIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn distinct_names(&self) -> usize {
        self.name_index.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Finds the most recent release of a title, case-insensitively.
    ///
    /// When several rows share the title the one with the highest year wins;
    /// equal years resolve to the earliest row in catalog order.
    pub fn find_latest(&self, name: &str) -> Option<&CatalogEntry> {
        self.find_latest_index(name).map(|idx| &self.entries[idx])
    }

    /// Row index variant of [`Catalog::find_latest`]
    pub fn find_latest_index(&self, name: &str) -> Option<usize> {
        let rows = self.name_index.get(&normalize_name(name))?;

        let mut best: Option<usize> = None;
        for &idx in rows {
            match best {
                Some(current) if self.entries[idx].year <= self.entries[current].year => {}
                _ => best = Some(idx),
            }
        }
        best
    }

    /// Mean of every feature column (all zeros for an empty catalog)
    pub fn feature_means(&self) -> FeatureVector {
        let mut sums = [0.0; FEATURE_COUNT];
        if self.entries.is_empty() {
            return FeatureVector(sums);
        }

        for entry in &self.entries {
            for (sum, value) in sums.iter_mut().zip(entry.features.values()) {
                *sum += value;
            }
        }

        let count = self.entries.len() as f64;
        FeatureVector(sums.map(|sum| sum / count))
    }
}
