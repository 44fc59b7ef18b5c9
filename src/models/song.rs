use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of audio features carried by every catalog entry
pub const FEATURE_COUNT: usize = 11;

/// Column names of the standardized audio features, in scoring order.
///
/// The snapshot loader resolves columns by these names and the scorer reads
/// vectors in this order, so both sides always agree on the layout.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
];

/// Standardized audio features of a single song
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Euclidean norm, scaled by the largest magnitude so that squaring
    /// large finite values cannot overflow
    pub fn norm(&self) -> f64 {
        let scale = self.0.iter().fold(0.0_f64, |max, v| max.max(v.abs()));
        if scale == 0.0 {
            return 0.0;
        }
        scale * self.0.iter().map(|v| (v / scale).powi(2)).sum::<f64>().sqrt()
    }

    /// Pairs every value with its column name
    pub fn named(&self) -> Vec<NamedFeature> {
        FEATURE_NAMES
            .iter()
            .zip(self.0.iter())
            .map(|(name, value)| NamedFeature {
                name: (*name).to_string(),
                value: *value,
            })
            .collect()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedFeature {
    pub name: String,
    pub value: f64,
}

/// Identity used for self-exclusion: lowercased name plus release year.
///
/// Deliberately not a row index. Every catalog row sharing the pair is
/// treated as the same song.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongIdentity {
    pub name_lower: String,
    pub year: i32,
}

impl Display for SongIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name_lower, self.year)
    }
}

/// A song row of the feature catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    /// Artist credit exactly as stored in the snapshot (often a serialized list)
    pub artists: String,
    pub year: i32,
    pub features: FeatureVector,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        artists: impl Into<String>,
        year: i32,
        features: impl Into<FeatureVector>,
    ) -> Self {
        Self {
            name: name.into(),
            artists: artists.into(),
            year,
            features: features.into(),
        }
    }

    /// Lookup key: trimmed and lowercased name
    pub fn name_key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn identity(&self) -> SongIdentity {
        SongIdentity {
            name_lower: self.name.to_lowercase(),
            year: self.year,
        }
    }
}

/// Normalizes a user supplied or stored title for lookup
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Public view of a catalog entry returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub name: String,
    pub artists: String,
    pub year: i32,
}

impl From<&CatalogEntry> for Song {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name.clone(),
            artists: entry.artists.clone(),
            year: entry.year,
        }
    }
}
