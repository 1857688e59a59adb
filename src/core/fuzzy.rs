//! Fuzzy-set kernels over host buffer views.
//!
//! Zadeh operators (union = max, intersection = min, complement = 1 - x) and
//! the two classic linguistic hedges (concentration "very" = x², dilation
//! "somewhat" = √x). All kernels mutate the target slice in place; binary
//! kernels process the common prefix `min(len(target), len(source))` and leave
//! the rest of the target untouched.
//!
//! These run per agent, per tick, so each kernel has a four-lane batched path
//! (`simd` feature) next to its scalar form. Every operation here is purely
//! element-wise — no cross-element reductions — so the batched path produces
//! bit-identical results to the scalar definition, and the batch width is a
//! performance knob only.

#[cfg(feature = "simd")]
use wide::f64x4;

/// Fuzzy union: `target[i] = max(target[i], source[i])`.
#[inline]
pub fn union(target: &mut [f64], source: &[f64]) {
    let n = target.len().min(source.len());
    #[cfg(feature = "simd")]
    union_simd(&mut target[..n], &source[..n]);
    #[cfg(not(feature = "simd"))]
    union_scalar(&mut target[..n], &source[..n]);
}

/// Fuzzy intersection: `target[i] = min(target[i], source[i])`.
#[inline]
pub fn intersect(target: &mut [f64], source: &[f64]) {
    let n = target.len().min(source.len());
    #[cfg(feature = "simd")]
    intersect_simd(&mut target[..n], &source[..n]);
    #[cfg(not(feature = "simd"))]
    intersect_scalar(&mut target[..n], &source[..n]);
}

/// Fuzzy complement: `target[i] = 1.0 - target[i]`.
#[inline]
pub fn complement(target: &mut [f64]) {
    #[cfg(feature = "simd")]
    complement_simd(target);
    #[cfg(not(feature = "simd"))]
    complement_scalar(target);
}

/// Concentration hedge ("very"): `target[i] = target[i]²`.
///
/// Pulls membership degrees below 1.0 toward 0.
#[inline]
pub fn concentrate(target: &mut [f64]) {
    #[cfg(feature = "simd")]
    concentrate_simd(target);
    #[cfg(not(feature = "simd"))]
    concentrate_scalar(target);
}

/// Dilation hedge ("somewhat"): `target[i] = √target[i]`.
///
/// Inputs are assumed to already sit in `[0, 1]`; negative inputs are
/// undefined and not guarded.
#[inline]
pub fn dilate(target: &mut [f64]) {
    #[cfg(feature = "simd")]
    dilate_simd(target);
    #[cfg(not(feature = "simd"))]
    dilate_scalar(target);
}

// Scalar forms are the reference semantics for the batched paths below.

#[allow(dead_code)]
fn union_scalar(target: &mut [f64], source: &[f64]) {
    for (t, s) in target.iter_mut().zip(source.iter()) {
        *t = t.max(*s);
    }
}

#[allow(dead_code)]
fn intersect_scalar(target: &mut [f64], source: &[f64]) {
    for (t, s) in target.iter_mut().zip(source.iter()) {
        *t = t.min(*s);
    }
}

#[allow(dead_code)]
fn complement_scalar(target: &mut [f64]) {
    for t in target.iter_mut() {
        *t = 1.0 - *t;
    }
}

#[allow(dead_code)]
fn concentrate_scalar(target: &mut [f64]) {
    for t in target.iter_mut() {
        *t = *t * *t;
    }
}

#[allow(dead_code)]
fn dilate_scalar(target: &mut [f64]) {
    for t in target.iter_mut() {
        *t = t.sqrt();
    }
}

#[cfg(feature = "simd")]
fn union_simd(target: &mut [f64], source: &[f64]) {
    let n = target.len();
    let simd_end = n - (n % 4);
    for i in (0..simd_end).step_by(4) {
        let t = f64x4::from([target[i], target[i + 1], target[i + 2], target[i + 3]]);
        let s = f64x4::from([source[i], source[i + 1], source[i + 2], source[i + 3]]);
        target[i..(i + 4)].copy_from_slice(&t.max(s).to_array());
    }
    for i in simd_end..n {
        target[i] = target[i].max(source[i]);
    }
}

#[cfg(feature = "simd")]
fn intersect_simd(target: &mut [f64], source: &[f64]) {
    let n = target.len();
    let simd_end = n - (n % 4);
    for i in (0..simd_end).step_by(4) {
        let t = f64x4::from([target[i], target[i + 1], target[i + 2], target[i + 3]]);
        let s = f64x4::from([source[i], source[i + 1], source[i + 2], source[i + 3]]);
        target[i..(i + 4)].copy_from_slice(&t.min(s).to_array());
    }
    for i in simd_end..n {
        target[i] = target[i].min(source[i]);
    }
}

#[cfg(feature = "simd")]
fn complement_simd(target: &mut [f64]) {
    let n = target.len();
    let one = f64x4::splat(1.0);
    let simd_end = n - (n % 4);
    for i in (0..simd_end).step_by(4) {
        let t = f64x4::from([target[i], target[i + 1], target[i + 2], target[i + 3]]);
        target[i..(i + 4)].copy_from_slice(&(one - t).to_array());
    }
    for i in simd_end..n {
        target[i] = 1.0 - target[i];
    }
}

#[cfg(feature = "simd")]
fn concentrate_simd(target: &mut [f64]) {
    let n = target.len();
    let simd_end = n - (n % 4);
    for i in (0..simd_end).step_by(4) {
        let t = f64x4::from([target[i], target[i + 1], target[i + 2], target[i + 3]]);
        target[i..(i + 4)].copy_from_slice(&(t * t).to_array());
    }
    for i in simd_end..n {
        target[i] = target[i] * target[i];
    }
}

#[cfg(feature = "simd")]
fn dilate_simd(target: &mut [f64]) {
    let n = target.len();
    let simd_end = n - (n % 4);
    for i in (0..simd_end).step_by(4) {
        let t = f64x4::from([target[i], target[i + 1], target[i + 2], target[i + 3]]);
        target[i..(i + 4)].copy_from_slice(&t.sqrt().to_array());
    }
    for i in simd_end..n {
        target[i] = target[i].sqrt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deterministic membership degrees in [0, 1).
    fn degrees(len: usize, salt: f64) -> Vec<f64> {
        (0..len)
            .map(|i| ((i as f64) * 0.6180339887 + salt).fract())
            .collect()
    }

    #[cfg(feature = "simd")]
    #[test]
    fn batched_paths_match_scalar_bit_for_bit() {
        // Lengths chosen to exercise full batches, remainders, and both.
        for &len in &[1usize, 4, 5, 7, 1000, 1003] {
            let a = degrees(len, 0.12);
            let b = degrees(len, 0.77);

            let mut scalar = a.clone();
            let mut simd = a.clone();
            union_scalar(&mut scalar, &b);
            union_simd(&mut simd, &b);
            assert_eq!(scalar, simd, "union, len {len}");

            let mut scalar = a.clone();
            let mut simd = a.clone();
            intersect_scalar(&mut scalar, &b);
            intersect_simd(&mut simd, &b);
            assert_eq!(scalar, simd, "intersect, len {len}");

            let mut scalar = a.clone();
            let mut simd = a.clone();
            complement_scalar(&mut scalar);
            complement_simd(&mut simd);
            assert_eq!(scalar, simd, "complement, len {len}");

            let mut scalar = a.clone();
            let mut simd = a.clone();
            concentrate_scalar(&mut scalar);
            concentrate_simd(&mut simd);
            assert_eq!(scalar, simd, "concentrate, len {len}");

            let mut scalar = a.clone();
            let mut simd = a.clone();
            dilate_scalar(&mut scalar);
            dilate_simd(&mut simd);
            assert_eq!(scalar, simd, "dilate, len {len}");
        }
    }

    #[test]
    fn union_and_intersect_are_idempotent() {
        let a = degrees(37, 0.3);

        let mut u = a.clone();
        union(&mut u, &a);
        assert_eq!(u, a);

        let mut i = a.clone();
        intersect(&mut i, &a);
        assert_eq!(i, a);
    }

    #[test]
    fn complement_is_an_involution() {
        let a = degrees(41, 0.9);
        let mut t = a.clone();
        complement(&mut t);
        complement(&mut t);
        for (orig, twice) in a.iter().zip(t.iter()) {
            assert!((orig - twice).abs() < 1e-12);
        }
    }

    #[test]
    fn binary_ops_stop_at_the_shorter_operand() {
        let mut target = vec![0.2, 0.2, 0.2, 0.2, 0.2, 0.9];
        let source = vec![0.5; 5];

        union(&mut target, &source);
        assert_eq!(target, vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.9]);

        let mut target = vec![0.8; 3];
        let source = vec![0.1; 100];
        intersect(&mut target, &source);
        assert_eq!(target, vec![0.1, 0.1, 0.1]);
    }

    #[test]
    fn hedges_shift_membership_the_right_way() {
        let mut very = vec![0.5, 0.9, 1.0, 0.0];
        concentrate(&mut very);
        assert_eq!(very, vec![0.25, 0.81, 1.0, 0.0]);

        let mut somewhat = vec![0.25, 0.81, 1.0, 0.0];
        dilate(&mut somewhat);
        assert_eq!(somewhat, vec![0.5, 0.9, 1.0, 0.0]);
    }
}
