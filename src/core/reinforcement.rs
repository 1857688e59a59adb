//! Remorse-driven weight updates.
//!
//! "Remorse" is the regret signal for a tick: optimal reward minus actual
//! reward. Computing it belongs to the caller; this module only applies the
//! resulting gradient-style adjustment to a weight view, in place, in a
//! single pass with no allocation.

#[cfg(feature = "simd")]
use wide::f64x4;

/// Applies a remorse-scaled update to `weights`:
/// `weights[i] += (learning_rate * remorse) * features[i]`
/// over `min(len(weights), len(features))` elements.
#[inline]
pub fn apply_remorse_update(weights: &mut [f64], features: &[f64], remorse: f64, learning_rate: f64) {
    let n = weights.len().min(features.len());
    // Pre-multiply once; the loop only pays for a fused scale-and-add.
    let adjustment = learning_rate * remorse;

    #[cfg(feature = "simd")]
    apply_simd(&mut weights[..n], &features[..n], adjustment);
    #[cfg(not(feature = "simd"))]
    apply_scalar(&mut weights[..n], &features[..n], adjustment);
}

#[allow(dead_code)]
fn apply_scalar(weights: &mut [f64], features: &[f64], adjustment: f64) {
    for (w, f) in weights.iter_mut().zip(features.iter()) {
        *w += adjustment * f;
    }
}

#[cfg(feature = "simd")]
fn apply_simd(weights: &mut [f64], features: &[f64], adjustment: f64) {
    let n = weights.len();
    let factor = f64x4::splat(adjustment);
    let simd_end = n - (n % 4);
    for i in (0..simd_end).step_by(4) {
        let w = f64x4::from([weights[i], weights[i + 1], weights[i + 2], weights[i + 3]]);
        let f = f64x4::from([features[i], features[i + 1], features[i + 2], features[i + 3]]);
        weights[i..(i + 4)].copy_from_slice(&(w + factor * f).to_array());
    }
    for i in simd_end..n {
        weights[i] += adjustment * features[i];
    }
}
