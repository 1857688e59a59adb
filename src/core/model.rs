//! Per-agent model state and lifecycle.
//!
//! An [`AgentModel`] is the unit the registry owns per live agent: an id plus
//! a binding to host memory. The lifecycle is deliberately small:
//!
//! - **Bound**: holds a hyperparameter handle and the weight/context/action
//!   views for one registered agent.
//! - **Unbound**: every reference dropped; the shell sits in the idle pool
//!   waiting to be rebound for the next agent that registers.
//!
//! `rebind` is destroy-and-reconstruct without the allocation, which is what
//! makes pooled reuse free.

use crate::critic::Critic;
use crate::hyper::{HyperRef, HyperparameterConfig};
use crate::view::{HostView, HostViewMut};

/// Pluggable per-tick training update.
///
/// The engine fixes *when* an update runs (training mode, once per tick) but
/// not *what* it computes; that stays behind this seam, mirroring the
/// optional critic. Implementations are consulted from the parallel fan-out.
pub trait Learner: Send + Sync {
    fn update(
        &self,
        hyper: &HyperparameterConfig,
        critic: Option<&dyn Critic>,
        weights: &mut [f64],
        context: &[f64],
        action: &mut [f64],
    );
}

/// The full reference set binding a model to one agent's host buffers.
pub struct ModelBinding {
    hyper: HyperRef,
    critic: Option<Box<dyn Critic>>,
    weights: HostViewMut,
    context: HostView,
    action: HostViewMut,
    learner: Option<Box<dyn Learner>>,
}

impl ModelBinding {
    /// Assembles a binding from boundary-validated parts.
    pub fn new(
        hyper: HyperRef,
        critic: Option<Box<dyn Critic>>,
        weights: HostViewMut,
        context: HostView,
        action: HostViewMut,
    ) -> Self {
        Self {
            hyper,
            critic,
            weights,
            context,
            action,
            learner: None,
        }
    }

    /// Installs a training-update hook.
    pub fn with_learner(mut self, learner: Box<dyn Learner>) -> Self {
        self.learner = Some(learner);
        self
    }
}

/// One agent's model: identity plus an optional binding to host memory.
pub struct AgentModel {
    id: u64,
    binding: Option<ModelBinding>,
}

impl AgentModel {
    /// Constructs directly into the bound state.
    pub fn bound(id: u64, binding: ModelBinding) -> Self {
        Self {
            id,
            binding: Some(binding),
        }
    }

    /// The agent id this model currently (or most recently) served.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Replaces the whole reference set and reassigns the id.
    ///
    /// Equivalent to destroying and reconstructing the model, minus the
    /// allocation; this is the pooled-reuse path.
    pub fn rebind(&mut self, id: u64, binding: ModelBinding) {
        self.id = id;
        self.binding = Some(binding);
    }

    /// Drops every host reference, returning the shell to the unbound state.
    pub fn unbind(&mut self) {
        self.binding = None;
    }

    /// Runs this model's share of one tick.
    ///
    /// Inference-only agents (training flag off) never mutate their own
    /// weights, so this is a no-op for them. In training mode the installed
    /// [`Learner`] hook runs against the bound views; without a hook there is
    /// nothing to do.
    ///
    /// Takes `&self`: mutation goes through the views, and exclusivity over
    /// the underlying buffers is the host's partitioning guarantee.
    pub fn process_tick(&self) {
        let Some(binding) = &self.binding else {
            return;
        };

        // SAFETY: the hyperparameter record and the three buffers below stay
        // valid while this agent is registered, and no other model touches
        // them during the fan-out.
        let hyper = unsafe { binding.hyper.get() };
        if !hyper.is_training {
            return;
        }

        if let Some(learner) = &binding.learner {
            unsafe {
                learner.update(
                    hyper,
                    binding.critic.as_deref(),
                    binding.weights.as_mut_slice(),
                    binding.context.as_slice(),
                    binding.action.as_mut_slice(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reinforcement;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Buffers {
        hyper: Box<HyperparameterConfig>,
        weights: Vec<f64>,
        context: Vec<f64>,
        action: Vec<f64>,
    }

    impl Buffers {
        fn new(is_training: bool) -> Self {
            Self {
                hyper: Box::new(HyperparameterConfig {
                    learning_rate: 0.5,
                    gamma: 0.9,
                    epsilon: 0.1,
                    epsilon_min: 0.01,
                    epsilon_decay: 0.99,
                    is_training,
                }),
                weights: vec![0.0; 8],
                context: vec![0.25; 8],
                action: vec![0.0; 4],
            }
        }

        fn binding(&mut self) -> ModelBinding {
            unsafe {
                ModelBinding::new(
                    HyperRef::new(&*self.hyper).unwrap(),
                    None,
                    HostViewMut::from_raw(self.weights.as_mut_ptr(), self.weights.len()),
                    HostView::from_raw(self.context.as_ptr(), self.context.len()),
                    HostViewMut::from_raw(self.action.as_mut_ptr(), self.action.len()),
                )
            }
        }
    }

    struct CountingLearner {
        calls: Arc<AtomicUsize>,
    }

    impl Learner for CountingLearner {
        fn update(
            &self,
            _hyper: &HyperparameterConfig,
            _critic: Option<&dyn Critic>,
            _weights: &mut [f64],
            _context: &[f64],
            _action: &mut [f64],
        ) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A minimal concrete update: fixed remorse through the gradient kernel.
    struct RemorseLearner {
        remorse: f64,
    }

    impl Learner for RemorseLearner {
        fn update(
            &self,
            hyper: &HyperparameterConfig,
            _critic: Option<&dyn Critic>,
            weights: &mut [f64],
            context: &[f64],
            _action: &mut [f64],
        ) {
            reinforcement::apply_remorse_update(weights, context, self.remorse, hyper.learning_rate);
        }
    }

    #[test]
    fn lifecycle_bound_unbound_rebound() {
        let mut bufs = Buffers::new(false);
        let mut model = AgentModel::bound(7, bufs.binding());
        assert!(model.is_bound());
        assert_eq!(model.id(), 7);

        model.unbind();
        assert!(!model.is_bound());

        model.rebind(9, bufs.binding());
        assert!(model.is_bound());
        assert_eq!(model.id(), 9);
    }

    #[test]
    fn unbound_tick_is_a_noop() {
        let mut bufs = Buffers::new(true);
        let mut model = AgentModel::bound(1, bufs.binding());
        model.unbind();
        model.process_tick();
    }

    #[test]
    fn inference_mode_never_invokes_the_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut bufs = Buffers::new(false);
        let binding = bufs
            .binding()
            .with_learner(Box::new(CountingLearner { calls: calls.clone() }));
        let model = AgentModel::bound(1, binding);

        model.process_tick();
        model.process_tick();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn training_mode_invokes_the_hook_once_per_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut bufs = Buffers::new(true);
        let binding = bufs
            .binding()
            .with_learner(Box::new(CountingLearner { calls: calls.clone() }));
        let model = AgentModel::bound(1, binding);

        model.process_tick();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        model.process_tick();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn a_learner_can_drive_the_gradient_kernel() {
        let mut bufs = Buffers::new(true);
        let binding = bufs
            .binding()
            .with_learner(Box::new(RemorseLearner { remorse: 1.0 }));
        let model = AgentModel::bound(1, binding);

        model.process_tick();
        drop(model);

        // learning_rate 0.5 * remorse 1.0 * context 0.25
        for w in &bufs.weights {
            assert!((w - 0.125).abs() < 1e-15);
        }
    }
}
