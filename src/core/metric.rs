//! Similarity kernels over pairs of host buffer views.
//!
//! Used for identity-free correlation: matching this tick's observation
//! against last tick's by similarity instead of by a stable id. Because the
//! caller leans on the numeric result, the degenerate inputs are pinned down
//! rather than left to floating-point accident:
//!
//! - [`cosine_similarity`] returns `0.0` when either magnitude is exactly
//!   zero (an all-zero vector is orthogonal to everything by convention).
//! - [`fuzzy_jaccard`] returns `1.0` when the union sum is exactly zero
//!   (two sets empty of truth are fully coherent).
//!
//! Both kernels read the common prefix `min(len(a), len(b))` and never write.
//! The batched path keeps four running lanes per accumulator and folds them
//! before the scalar tail; that reduction order is part of the batched
//! variant, so its rounding may differ from the scalar form in the last ulp.

#[cfg(feature = "simd")]
use wide::f64x4;

/// Cosine similarity: `dot(a, b) / sqrt(sumsq(a) * sumsq(b))`.
///
/// Returns `0.0` if either input has exactly zero magnitude.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    #[cfg(feature = "simd")]
    return cosine_similarity_simd(&a[..n], &b[..n]);
    #[cfg(not(feature = "simd"))]
    cosine_similarity_scalar(&a[..n], &b[..n])
}

/// Fuzzy Jaccard index: `Σ min(a[i], b[i]) / Σ max(a[i], b[i])`.
///
/// Returns `1.0` if the union sum is exactly zero.
#[inline]
pub fn fuzzy_jaccard(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    #[cfg(feature = "simd")]
    return fuzzy_jaccard_simd(&a[..n], &b[..n]);
    #[cfg(not(feature = "simd"))]
    fuzzy_jaccard_scalar(&a[..n], &b[..n])
}

#[allow(dead_code)]
fn cosine_similarity_scalar(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut mag_a = 0.0;
    let mut mag_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b).sqrt()
}

#[allow(dead_code)]
fn fuzzy_jaccard_scalar(a: &[f64], b: &[f64]) -> f64 {
    let mut intersection_sum = 0.0;
    let mut union_sum = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        intersection_sum += x.min(*y);
        union_sum += x.max(*y);
    }

    if union_sum == 0.0 {
        return 1.0;
    }
    intersection_sum / union_sum
}

#[cfg(feature = "simd")]
fn cosine_similarity_simd(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    let simd_end = n - (n % 4);

    let mut dot_acc = f64x4::splat(0.0);
    let mut mag_a_acc = f64x4::splat(0.0);
    let mut mag_b_acc = f64x4::splat(0.0);

    for i in (0..simd_end).step_by(4) {
        let x = f64x4::from([a[i], a[i + 1], a[i + 2], a[i + 3]]);
        let y = f64x4::from([b[i], b[i + 1], b[i + 2], b[i + 3]]);
        dot_acc += x * y;
        mag_a_acc += x * x;
        mag_b_acc += y * y;
    }

    let dot_lanes = dot_acc.to_array();
    let mag_a_lanes = mag_a_acc.to_array();
    let mag_b_lanes = mag_b_acc.to_array();

    let mut dot = dot_lanes[0] + dot_lanes[1] + dot_lanes[2] + dot_lanes[3];
    let mut mag_a = mag_a_lanes[0] + mag_a_lanes[1] + mag_a_lanes[2] + mag_a_lanes[3];
    let mut mag_b = mag_b_lanes[0] + mag_b_lanes[1] + mag_b_lanes[2] + mag_b_lanes[3];

    for i in simd_end..n {
        dot += a[i] * b[i];
        mag_a += a[i] * a[i];
        mag_b += b[i] * b[i];
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b).sqrt()
}

#[cfg(feature = "simd")]
fn fuzzy_jaccard_simd(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    let simd_end = n - (n % 4);

    let mut intersection_acc = f64x4::splat(0.0);
    let mut union_acc = f64x4::splat(0.0);

    for i in (0..simd_end).step_by(4) {
        let x = f64x4::from([a[i], a[i + 1], a[i + 2], a[i + 3]]);
        let y = f64x4::from([b[i], b[i + 1], b[i + 2], b[i + 3]]);
        intersection_acc += x.min(y);
        union_acc += x.max(y);
    }

    let intersection_lanes = intersection_acc.to_array();
    let union_lanes = union_acc.to_array();

    let mut intersection_sum =
        intersection_lanes[0] + intersection_lanes[1] + intersection_lanes[2] + intersection_lanes[3];
    let mut union_sum = union_lanes[0] + union_lanes[1] + union_lanes[2] + union_lanes[3];

    for i in simd_end..n {
        intersection_sum += a[i].min(b[i]);
        union_sum += a[i].max(b[i]);
    }

    if union_sum == 0.0 {
        return 1.0;
    }
    intersection_sum / union_sum
}
