use serde::{Deserialize, Serialize};

use super::Song;

/// A single scored recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub name: String,
    pub artists: String,
    pub year: i32,
    pub similarity_score: f64,
}

/// Outcome of a scoring run
///
/// `seeds` holds the resolved seed songs in request order and `missing` the
/// inputs that did not resolve. An empty `seeds` list is the "no valid input"
/// signal; an empty `items` list with resolved seeds means nothing in the
/// catalog was eligible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub seeds: Vec<Song>,
    pub missing: Vec<String>,
    pub items: Vec<Recommendation>,
}

impl Recommendations {
    pub fn no_valid_seeds(&self) -> bool {
        self.seeds.is_empty()
    }
}

// ============================================================================
// HTTP Types
// ============================================================================

/// Body of a recommendation request
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub songs: Vec<String>,
    /// Number of recommendations to return, falls back to the configured default
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub recommendations: Vec<Recommendation>,
    pub seeds: Vec<Song>,
    pub missing: Vec<String>,
}

pub const NO_VALID_SEEDS_MESSAGE: &str = "No valid input songs found";

impl From<Recommendations> for RecommendationResponse {
    fn from(result: Recommendations) -> Self {
        let message = result
            .no_valid_seeds()
            .then(|| NO_VALID_SEEDS_MESSAGE.to_string());

        Self {
            message,
            recommendations: result.items,
            seeds: result.seeds,
            missing: result.missing,
        }
    }
}
