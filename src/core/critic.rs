//! The pluggable value-estimation seam.
//!
//! A critic turns an observed state into a scalar value estimate. Models hold
//! it as an optional trait object so hosts can plug in estimators of any
//! shape without the registry caring which one.

use crate::view::HostView;

/// State-value estimator: evaluate an observation, return `V(state)`.
///
/// Implementations must be `Send + Sync`; critics are consulted from inside
/// the parallel tick fan-out.
pub trait Critic: Send + Sync {
    fn evaluate(&self, state: &[f64]) -> f64;
}

/// Linear state-value critic over a host-owned weight view.
///
/// `V(state) = Σ weights[i] * state[i]` over the common prefix. The weight
/// buffer is the one the host hands over at agent registration; the critic
/// never owns or resizes it.
#[derive(Debug)]
pub struct LinearValueCritic {
    weights: HostView,
}

impl LinearValueCritic {
    pub fn new(weights: HostView) -> Self {
        Self { weights }
    }
}

impl Critic for LinearValueCritic {
    fn evaluate(&self, state: &[f64]) -> f64 {
        // SAFETY: the weight buffer stays valid while the owning model is
        // registered, which bounds the critic's lifetime.
        let weights = unsafe { self.weights.as_slice() };
        weights
            .iter()
            .zip(state.iter())
            .map(|(w, s)| w * s)
            .sum()
    }
}
