use crate::models::FeatureVector;

/// Cosine similarity with precomputed norms.
///
/// Both vectors are normalized term by term before multiplying, so every
/// product stays within [-1, 1] even for very large components. Returns 0.0
/// when either norm is zero.
pub fn cosine_with_norms(a: &FeatureVector, a_norm: f64, b: &FeatureVector, b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    a.values()
        .iter()
        .zip(b.values().iter())
        .map(|(x, y)| (x / a_norm) * (y / b_norm))
        .sum()
}

/// Cosine similarity of two feature vectors, 0.0 for zero-norm inputs
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    cosine_with_norms(a, a.norm(), b, b.norm())
}
