use std::collections::HashSet;
use std::time::Instant;

use crate::{
    catalog::Catalog,
    models::{Recommendation, Recommendations, Song, SongIdentity},
    services::similarity::cosine_with_norms,
};

/// Default number of recommendations returned per request
pub const DEFAULT_RECOMMENDATIONS: usize = 10;

/// Recommends catalog songs similar to the given seed titles
///
/// Each seed is resolved to its latest release; unknown titles are dropped
/// and reported in `missing`. Every catalog row is scored by the mean cosine
/// similarity against all resolved seeds (duplicates count once per
/// occurrence), rows sharing a seed's `(lowercase name, year)` identity are
/// excluded, and the top `k` rows by descending score are returned. Ties keep
/// catalog order.
pub fn recommend<S: AsRef<str>>(catalog: &Catalog, seed_names: &[S], k: usize) -> Recommendations {
    let start = Instant::now();

    let mut seed_rows = Vec::with_capacity(seed_names.len());
    let mut missing = Vec::new();
    for seed in seed_names {
        let seed = seed.as_ref();
        match catalog.find_latest_index(seed) {
            Some(idx) => {
                let entry = &catalog.entries()[idx];
                tracing::debug!(
                    input = seed,
                    name = %entry.name,
                    year = entry.year,
                    artists = %entry.artists,
                    "Seed song found"
                );
                seed_rows.push(idx);
            }
            None => {
                tracing::debug!(input = seed, "Seed song not found in catalog");
                missing.push(seed.to_string());
            }
        }
    }

    if seed_rows.is_empty() {
        tracing::info!(requested = seed_names.len(), "No valid input songs found");
        return Recommendations {
            seeds: Vec::new(),
            missing,
            items: Vec::new(),
        };
    }

    let scores = mean_similarities(catalog, &seed_rows);

    let excluded: HashSet<&SongIdentity> = seed_rows
        .iter()
        .map(|&idx| &catalog.identities()[idx])
        .collect();

    let items = rank(catalog, &scores, &excluded, k);

    tracing::info!(
        seeds = seed_rows.len(),
        missing = missing.len(),
        returned = items.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Recommendations computed"
    );

    Recommendations {
        seeds: seed_rows
            .iter()
            .map(|&idx| Song::from(&catalog.entries()[idx]))
            .collect(),
        missing,
        items,
    }
}

/// Mean cosine similarity of every catalog row against the seed rows
fn mean_similarities(catalog: &Catalog, seed_rows: &[usize]) -> Vec<f64> {
    let entries = catalog.entries();
    let norms = catalog.norms();
    let seed_count = seed_rows.len() as f64;

    entries
        .iter()
        .zip(norms.iter())
        .map(|(candidate, &candidate_norm)| {
            let total: f64 = seed_rows
                .iter()
                .map(|&seed| {
                    cosine_with_norms(
                        &entries[seed].features,
                        norms[seed],
                        &candidate.features,
                        candidate_norm,
                    )
                })
                .sum();
            total / seed_count
        })
        .collect()
}

/// Filters out seed identities and keeps the `k` best scores
fn rank(
    catalog: &Catalog,
    scores: &[f64],
    excluded: &HashSet<&SongIdentity>,
    k: usize,
) -> Vec<Recommendation> {
    if k == 0 {
        return Vec::new();
    }

    let entries = catalog.entries();
    let mut candidates: Vec<(usize, f64)> = catalog
        .identities()
        .iter()
        .zip(scores.iter())
        .enumerate()
        .filter(|(_, (identity, _))| !excluded.contains(identity))
        .map(|(idx, (_, &score))| (idx, score))
        .collect();

    // sort_by is stable, equal scores stay in catalog order
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(k);

    candidates
        .into_iter()
        .map(|(idx, score)| {
            let entry = &entries[idx];
            Recommendation {
                name: entry.name.clone(),
                artists: entry.artists.clone(),
                year: entry.year,
                similarity_score: score,
            }
        })
        .collect()
}
