//! The host-shared hyperparameter record.
//!
//! The host allocates one `HyperparameterConfig` per agent (or shares one
//! across a cohort) in memory it owns, and passes a raw pointer at
//! registration. Both sides read the same bytes with zero serialization, so
//! the struct is C-layout and trivially copyable. The engine never writes it,
//! never frees it, and validates nothing beyond non-nullness at the boundary.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::ptr::NonNull;

/// Tunable hyperparameters for one agent model.
///
/// C-compatible layout so the host can map it directly into engine memory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct HyperparameterConfig {
    /// Step size for gradient-style updates. Typical range `[1e-5, 1e-1]`.
    pub learning_rate: f64,

    /// Discount factor for future rewards. Range `[0.0, 1.0]`.
    pub gamma: f64,

    /// Current exploration probability for epsilon-greedy policies.
    pub epsilon: f64,

    /// Floor the exploration probability never decays below.
    pub epsilon_min: f64,

    /// Multiplicative decay applied to epsilon per episode.
    pub epsilon_decay: f64,

    /// Training mode (true) versus inference-only (false).
    pub is_training: bool,
}

/// Non-null, read-only handle to a host-owned [`HyperparameterConfig`].
///
/// Created at the boundary after the null check, so the core never sees a
/// bare hyperparameter pointer.
#[derive(Debug, Clone, Copy)]
pub struct HyperRef {
    ptr: NonNull<HyperparameterConfig>,
}

// SAFETY: the record is host-owned and stable for the lifetime of the
// registration; the engine only reads it.
unsafe impl Send for HyperRef {}
unsafe impl Sync for HyperRef {}

impl HyperRef {
    /// Wraps a host pointer, rejecting null.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a valid `HyperparameterConfig` that the
    /// host keeps alive and unmodified-while-read for as long as the handle
    /// is bound to a model.
    #[inline]
    pub unsafe fn new(ptr: *const HyperparameterConfig) -> Option<Self> {
        NonNull::new(ptr.cast_mut()).map(|ptr| Self { ptr })
    }

    /// Reads the current record.
    ///
    /// # Safety
    ///
    /// The host memory behind the handle must still be valid.
    #[inline]
    pub unsafe fn get(&self) -> &HyperparameterConfig {
        self.ptr.as_ref()
    }
}
