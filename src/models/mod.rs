use serde::{Deserialize, Serialize};

pub mod recommendation;
pub mod song;

pub use recommendation::{
    Recommendation, RecommendationRequest, RecommendationResponse, Recommendations,
    NO_VALID_SEEDS_MESSAGE,
};
pub use song::{
    normalize_name, CatalogEntry, FeatureVector, NamedFeature, Song, SongIdentity, FEATURE_COUNT,
    FEATURE_NAMES,
};

// ============================================================================
// Song Lookup Types
// ============================================================================

/// Query string for title lookups
#[derive(Debug, Deserialize)]
pub struct SongQuery {
    pub q: String,
}

/// Query string for feature comparison
#[derive(Debug, Deserialize)]
pub struct FeatureQuery {
    pub name: String,
}

/// A song with its standardized feature values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongDetails {
    #[serde(flatten)]
    pub song: Song,
    pub features: Vec<NamedFeature>,
}

impl From<&CatalogEntry> for SongDetails {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            song: Song::from(entry),
            features: entry.features.named(),
        }
    }
}

/// One feature of a song next to the catalog-wide mean
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureComparisonRow {
    pub feature: String,
    pub song: f64,
    pub average: f64,
}

/// Song features compared against the catalog average
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureComparison {
    #[serde(flatten)]
    pub song: Song,
    pub features: Vec<FeatureComparisonRow>,
}

impl FeatureComparison {
    pub fn new(entry: &CatalogEntry, averages: &FeatureVector) -> Self {
        let features = FEATURE_NAMES
            .iter()
            .zip(entry.features.values().iter().zip(averages.values().iter()))
            .map(|(name, (song, average))| FeatureComparisonRow {
                feature: (*name).to_string(),
                song: *song,
                average: *average,
            })
            .collect();

        Self {
            song: Song::from(entry),
            features,
        }
    }
}
