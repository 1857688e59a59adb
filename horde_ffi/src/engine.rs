//! The engine context behind the foreign-call surface.
//!
//! One [`Engine`] owns the model registry for the process. The boundary layer
//! constructs it explicitly at startup (or on first use) and routes every
//! entry point through it, so engine state has a nameable owner instead of
//! living in scattered statics.

use std::time::Instant;

use tracing::info;

use horde::critic::{Critic, LinearValueCritic};
use horde::fuzzy;
use horde::hyper::HyperRef;
use horde::model::ModelBinding;
use horde::registry::ModelRegistry;
use horde::view::{HostView, HostViewMut};

/// Process-wide engine state: the agent-model registry plus the operations
/// the host drives through the boundary.
pub struct Engine {
    registry: ModelRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registry: ModelRegistry::new(),
        }
    }

    /// Forwards a host-supplied line into the engine's log stream.
    pub fn log(&self, message: &str) {
        info!(target: "horde", "{message}");
    }

    /// Runs the fuzzy union kernel in place on `target` and reports the
    /// elapsed wall-clock time in nanoseconds.
    ///
    /// The host uses the timing to sanity-check the call path, so it is
    /// measured here around the kernel rather than guessed at by the caller.
    pub fn compute_fuzzy_union(&self, target: &HostViewMut, source: &HostView) -> i64 {
        let start = Instant::now();

        // SAFETY: both views were boundary-validated this call; the kernel
        // stops at the shorter operand.
        unsafe {
            fuzzy::union(target.as_mut_slice(), source.as_slice());
        }

        start.elapsed().as_nanos() as i64
    }

    /// Registers (or re-registers) an agent with its full reference set.
    ///
    /// The critic-weights buffer becomes a [`LinearValueCritic`] bound to
    /// this agent; the registry decides whether to recycle a pooled model or
    /// construct a fresh one.
    #[allow(clippy::too_many_arguments)]
    pub fn register_agent(
        &self,
        agent_id: u64,
        hyper: HyperRef,
        critic_weights: HostView,
        weights: HostViewMut,
        context: HostView,
        action: HostViewMut,
    ) {
        let critic: Box<dyn Critic> = Box::new(LinearValueCritic::new(critic_weights));
        let binding = ModelBinding::new(hyper, Some(critic), weights, context, action);
        self.registry.register(agent_id, binding);
    }

    /// Retires an agent. Absent ids are a no-op.
    pub fn unregister_agent(&self, agent_id: u64) {
        self.registry.unregister(agent_id);
        info!(target: "horde", "unregistered agent {agent_id}");
    }

    /// Dispatches one tick across every registered agent.
    pub fn tick_all_agents(&self, rewards: HostView) {
        // TODO: slice per-model rewards out of `rewards` once the host-side
        // reward layout (per-agent offsets) is finalized.
        let _ = rewards;
        self.registry.tick_all();
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}
