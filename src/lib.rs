//! # horde
//!
//! An embedded, low-latency substrate for driving many simultaneously active
//! decision-making agents, one discrete time step ("tick") at a time.
//!
//! The host process owns every buffer. Each tick it hands the engine raw
//! pointer/length pairs; the engine wraps them into non-owning views, fans the
//! tick out across all registered agent models, and runs vectorized fuzzy-set,
//! similarity, and gradient kernels directly on the host's memory. Nothing is
//! copied unless a caller explicitly asks for an owned copy.
//!
//! ## Quick Start
//!
//! ```
//! use horde::prelude::*;
//!
//! let registry = ModelRegistry::new();
//!
//! let hyper = HyperparameterConfig {
//!     learning_rate: 0.01,
//!     gamma: 0.95,
//!     epsilon: 1.0,
//!     epsilon_min: 0.05,
//!     epsilon_decay: 0.995,
//!     is_training: false,
//! };
//!
//! let mut weights = vec![0.0f64; 16];
//! let context = vec![0.0f64; 16];
//! let mut action = vec![0.0f64; 4];
//!
//! // SAFETY: the buffers above outlive the registration.
//! let binding = unsafe {
//!     ModelBinding::new(
//!         HyperRef::new(&hyper).unwrap(),
//!         None,
//!         HostViewMut::from_raw(weights.as_mut_ptr(), weights.len()),
//!         HostView::from_raw(context.as_ptr(), context.len()),
//!         HostViewMut::from_raw(action.as_mut_ptr(), action.len()),
//!     )
//! };
//!
//! registry.register(42, binding);
//! registry.tick_all();
//! registry.unregister(42);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): fan the per-tick dispatch out across rayon workers
//! - `simd` (default): four-lane kernel paths via the `wide` crate
//! - `serde` (default): serialization support for config and stats types
//!
//! All kernels keep a scalar path; disabling every feature yields the same
//! results on a single thread.
//!
//! ## Modules
//!
//! - [`view`]: non-owning views over host-owned buffers
//! - [`fuzzy`]: fuzzy-set kernels (union, intersection, complement, hedges)
//! - [`metric`]: similarity kernels (cosine, fuzzy Jaccard)
//! - [`reinforcement`]: remorse-driven weight updates
//! - [`hyper`]: the host-shared hyperparameter record
//! - [`critic`]: the pluggable value-estimation seam
//! - [`model`]: per-agent model state and lifecycle
//! - [`registry`]: agent-model registry, idle pool, and tick dispatch

#[path = "core/view.rs"]
pub mod view;

#[path = "core/fuzzy.rs"]
pub mod fuzzy;

#[path = "core/metric.rs"]
pub mod metric;

#[path = "core/reinforcement.rs"]
pub mod reinforcement;

#[path = "core/hyper.rs"]
pub mod hyper;

#[path = "core/critic.rs"]
pub mod critic;

#[path = "core/model.rs"]
pub mod model;

#[path = "core/registry.rs"]
pub mod registry;

/// Prelude module for convenient imports.
///
/// ```
/// use horde::prelude::*;
/// ```
pub mod prelude {
    pub use crate::critic::{Critic, LinearValueCritic};
    pub use crate::hyper::{HyperRef, HyperparameterConfig};
    pub use crate::model::{AgentModel, Learner, ModelBinding};
    pub use crate::registry::{ModelRegistry, RegistryStats};
    pub use crate::view::{HostView, HostViewMut};
}
