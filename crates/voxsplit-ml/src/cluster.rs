//! Speaker clustering
//!
//! Bottom-up agglomerative clustering of voice embeddings with average
//! linkage over cosine distance.

use crate::error::DiarizeError;

/// Calculate cosine similarity between two vectors
///
/// Returns a value from -1 to 1, where 1 = identical
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;

    for i in 0..a.len() {
        let a_val = a[i] as f64;
        let b_val = b[i] as f64;
        dot_product += a_val * b_val;
        norm_a += a_val * a_val;
        norm_b += b_val * b_val;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

/// Calculate cosine distance (1 - similarity)
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b) as f64
}

/// Group voice embeddings into `num_speakers` clusters.
///
/// Returns one label per input vector, in input order. Labels are
/// arbitrary cluster indices with no identity or ordering guarantee
/// across runs: label 0 here and label 0 in another run on the same
/// audio need not be the same voice. The result is deterministic for
/// identical inputs.
///
/// `num_speakers` is clamped to `[1, embeddings.len()]`: there cannot
/// be more clusters than points, and engine-side auto-detect (0) never
/// reaches this layer.
pub fn cluster_embeddings(
    embeddings: &[Vec<f32>],
    num_speakers: usize,
) -> Result<Vec<usize>, DiarizeError> {
    let n = embeddings.len();
    if n < 2 {
        return Err(DiarizeError::InsufficientData { usable: n });
    }

    let dim = embeddings[0].len();
    if dim == 0 || embeddings.iter().any(|e| e.len() != dim) {
        return Err(DiarizeError::Clustering(
            "embedding dimensions are inconsistent".to_string(),
        ));
    }

    let target = num_speakers.clamp(1, n);

    // Pairwise distances, computed once.
    let mut dist = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = cosine_distance(&embeddings[i], &embeddings[j]);
            dist[i * n + j] = d;
            dist[j * n + i] = d;
        }
    }

    // Every point starts as its own cluster; merge the closest pair
    // (average linkage) until the target count remains.
    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    while clusters.len() > target {
        let mut best_pair = (0usize, 1usize);
        let mut best_dist = f64::INFINITY;

        for a in 0..clusters.len() {
            for b in (a + 1)..clusters.len() {
                let d = average_linkage(&dist, n, &clusters[a], &clusters[b]);
                if d < best_dist {
                    best_dist = d;
                    best_pair = (a, b);
                }
            }
        }

        let merged = clusters.remove(best_pair.1);
        clusters[best_pair.0].extend(merged);
    }

    let mut labels = vec![0usize; n];
    for (id, members) in clusters.iter().enumerate() {
        for &m in members {
            labels[m] = id;
        }
    }

    Ok(labels)
}

/// Mean pairwise distance between two clusters.
fn average_linkage(dist: &[f64], n: usize, a: &[usize], b: &[usize]) -> f64 {
    let mut sum = 0.0;
    for &i in a {
        for &j in b {
            sum += dist[i * n + j];
        }
    }
    sum / (a.len() * b.len()) as f64
}
