//! Agent-model registry, idle pool, and per-tick dispatch.
//!
//! The registry owns every live [`AgentModel`]. Two collections sit behind
//! one mutex: the *active* map (agent id → model) and the *idle pool* of
//! unbound shells kept for O(1) reuse. A model instance is always in exactly
//! one of the two.
//!
//! Locking discipline: `register`, `unregister`, and the whole of
//! [`ModelRegistry::tick_all`] — snapshot *and* fan-out — run under the same
//! lock. That makes "at most one tick in flight, membership frozen during a
//! tick" a structural guarantee rather than a convention. Holding the lock
//! across the fan-out caps tick throughput; that trade is deliberate
//! (consistency first) and only worth revisiting if concurrent registration
//! during ticks ever becomes a requirement.

use hashbrown::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{AgentModel, ModelBinding};

/// Counters describing the registry's population and allocation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegistryStats {
    /// Models currently bound to a live agent.
    pub active: usize,
    /// Unbound shells waiting in the idle pool.
    pub idle: usize,
    /// Models ever constructed (pool reuse does not increment this).
    pub constructed: u64,
}

struct RegistryState {
    active: HashMap<u64, AgentModel>,
    idle: Vec<AgentModel>,
    constructed: u64,
}

/// Concurrency-safe owner of all live agent models.
pub struct ModelRegistry {
    state: Mutex<RegistryState>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                active: HashMap::new(),
                idle: Vec::new(),
                constructed: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // A panic inside the lock can only come from a host-contract
        // violation; the registry state itself stays consistent, so poisoning
        // is recovered rather than propagated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers (or re-registers) the agent `id` with a fresh reference set.
    ///
    /// Reuses an idle pooled shell when one is available, constructing a new
    /// model only when the pool is empty. The last registration for an id
    /// wins; a model displaced by re-registration is unbound and recycled.
    /// Never fails.
    pub fn register(&self, id: u64, binding: ModelBinding) {
        let mut state = self.lock();

        let model = match state.idle.pop() {
            Some(mut shell) => {
                shell.rebind(id, binding);
                shell
            }
            None => {
                state.constructed += 1;
                AgentModel::bound(id, binding)
            }
        };

        if let Some(mut displaced) = state.active.insert(id, model) {
            displaced.unbind();
            state.idle.push(displaced);
        }
    }

    /// Retires the agent `id` if it is registered; absence is a no-op.
    ///
    /// The retired model is unbound and returned to the idle pool so that
    /// steady-state churn reuses shells instead of growing the allocator's
    /// working set.
    pub fn unregister(&self, id: u64) {
        let mut state = self.lock();
        if let Some(mut model) = state.active.remove(&id) {
            model.unbind();
            state.idle.push(model);
        }
    }

    /// Runs one tick across every active model.
    ///
    /// Snapshots the active set and dispatches `process_tick` per model —
    /// across rayon workers under the `parallel` feature, sequentially
    /// otherwise. Per-model order is unspecified. The registry lock is held
    /// until every model has finished, so membership cannot change mid-tick
    /// and at most one tick is ever in flight.
    pub fn tick_all(&self) {
        let state = self.lock();
        let models: Vec<&AgentModel> = state.active.values().collect();

        // Models touch only their own host buffers here (host partitioning
        // contract), so the fan-out needs no further synchronization.
        #[cfg(feature = "parallel")]
        models.par_iter().for_each(|model| model.process_tick());

        #[cfg(not(feature = "parallel"))]
        for model in &models {
            model.process_tick();
        }
    }

    /// Whether a pooled shell is available for rebinding.
    pub fn has_idle_available(&self) -> bool {
        !self.lock().idle.is_empty()
    }

    /// Pops a shell from the idle pool; `None` when the pool is empty.
    ///
    /// The caller takes ownership and must rebind before use. `register`
    /// does this internally; the primitive is exposed for hosts that manage
    /// warm-up themselves.
    pub fn take_idle_for_rebind(&self) -> Option<AgentModel> {
        self.lock().idle.pop()
    }

    /// Number of currently active models.
    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.lock();
        RegistryStats {
            active: state.active.len(),
            idle: state.idle.len(),
            constructed: state.constructed,
        }
    }
}
