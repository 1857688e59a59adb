//! Foreign-call boundary for the horde engine.
//!
//! The host process (game server, simulation runtime) drives the engine
//! exclusively through the `extern "C"` entry points in this crate. Each
//! entry point does exactly three things: validate raw inputs (null pointers,
//! non-positive counts), wrap the survivors into bounds-carrying views, and
//! delegate to the [`Engine`]. Rejections produce a log line and a sentinel
//! status value; nothing ever unwinds across the boundary.
//!
//! The engine context itself is constructed once per process — eagerly by
//! [`horde_init`], or lazily by whichever entry point the host calls first —
//! and lives until process teardown.

mod engine;
mod error;

pub use engine::Engine;
pub use error::BoundaryError;

use std::ffi::{c_char, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use tracing::{error, info};

use horde::hyper::{HyperRef, HyperparameterConfig};
use horde::view::{HostView, HostViewMut};

/// Status code for an accepted call.
pub const STATUS_OK: i32 = 0;
/// Status code for a call rejected at the boundary.
pub const STATUS_INVALID: i32 = -1;
/// Sentinel returned instead of a nanosecond timing when inputs are invalid.
pub const TIMING_INVALID: i64 = -1;

static ENGINE: OnceLock<Engine> = OnceLock::new();

fn engine() -> &'static Engine {
    ENGINE.get_or_init(Engine::new)
}

/// Runs a boundary closure, converting any panic into the sentinel value.
///
/// Unwinding across an `extern "C"` frame is undefined behavior, so a panic
/// in the core (a host-contract violation) degrades to a logged failure code
/// instead.
fn ffi_guard<T: Copy>(sentinel: T, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            error!(target: "horde", "panic reached the foreign-call boundary; returning sentinel");
            sentinel
        }
    }
}

fn checked_view(
    ptr: *const f64,
    count: i32,
    name: &'static str,
) -> Result<HostView, BoundaryError> {
    if ptr.is_null() {
        return Err(BoundaryError::NullPointer(name));
    }
    if count <= 0 {
        return Err(BoundaryError::NonPositiveCount(name));
    }
    // SAFETY: non-null and positive count were just checked; element validity
    // is the host's side of the contract.
    Ok(unsafe { HostView::from_raw(ptr, count as usize) })
}

fn checked_view_mut(
    ptr: *mut f64,
    count: i32,
    name: &'static str,
) -> Result<HostViewMut, BoundaryError> {
    if ptr.is_null() {
        return Err(BoundaryError::NullPointer(name));
    }
    if count <= 0 {
        return Err(BoundaryError::NonPositiveCount(name));
    }
    // SAFETY: as above.
    Ok(unsafe { HostViewMut::from_raw(ptr, count as usize) })
}

/// Constructs the engine and signals readiness.
///
/// Hosts call this once at plugin load as a health check; calling it again
/// is harmless. Also installs the process log subscriber when none is set.
#[no_mangle]
pub extern "C" fn horde_init() {
    let _ = tracing_subscriber::fmt::try_init();
    let _ = engine();
    info!(target: "horde", "engine ready");
}

/// Forwards a null-terminated UTF-8 line into the engine log.
///
/// A null pointer is itself logged as a boundary error, never dereferenced.
///
/// # Safety
///
/// `message`, when non-null, must point to a null-terminated string valid for
/// the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn horde_log(message: *const c_char) {
    ffi_guard((), || {
        if message.is_null() {
            error!(target: "horde", "received null log message pointer");
            return;
        }
        let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
        engine().log(&message);
    })
}

/// Fuzzy union of two host sets, in place on `target`, over
/// `min(size_a, size_b)` elements.
///
/// Returns the elapsed time in nanoseconds, or [`TIMING_INVALID`] if either
/// pointer is null or either size non-positive.
///
/// # Safety
///
/// Non-null pointers must address at least their stated counts of
/// initialized `f64` values, valid and un-aliased for the duration of the
/// call.
#[no_mangle]
pub unsafe extern "C" fn horde_compute_union(
    target: *mut f64,
    source: *const f64,
    size_a: i32,
    size_b: i32,
) -> i64 {
    ffi_guard(TIMING_INVALID, || {
        let target = match checked_view_mut(target, size_a, "target set") {
            Ok(view) => view,
            Err(reject) => {
                error!(target: "horde", "{reject}");
                return TIMING_INVALID;
            }
        };
        let source = match checked_view(source, size_b, "source set") {
            Ok(view) => view,
            Err(reject) => {
                error!(target: "horde", "{reject}");
                return TIMING_INVALID;
            }
        };

        engine().compute_fuzzy_union(&target, &source)
    })
}

/// Registers (or re-registers) agent `agent_id` with its hyperparameter
/// record and the four buffers the host partitions for it.
///
/// Returns [`STATUS_OK`] on acceptance, [`STATUS_INVALID`] when any pointer
/// is null or any count non-positive.
///
/// # Safety
///
/// Every non-null buffer must stay valid — and disjoint from every other
/// agent's buffers — from this call until the matching unregistration. The
/// hyperparameter record must stay valid over the same window.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn horde_register_agent(
    agent_id: u64,
    hyperparams: *const HyperparameterConfig,
    critic_weights: *const f64,
    critic_weights_count: i32,
    model_weights: *mut f64,
    model_weights_count: i32,
    context: *const f64,
    context_count: i32,
    action_output: *mut f64,
    action_output_count: i32,
) -> i32 {
    ffi_guard(STATUS_INVALID, || {
        // SAFETY: null is rejected here; validity is the host contract.
        let hyper = match unsafe { HyperRef::new(hyperparams) } {
            Some(hyper) => hyper,
            None => {
                error!(target: "horde", "{}", BoundaryError::NullPointer("hyperparameter record"));
                return STATUS_INVALID;
            }
        };

        let critic_weights =
            match checked_view(critic_weights, critic_weights_count, "critic weights") {
                Ok(view) => view,
                Err(reject) => {
                    error!(target: "horde", "{reject}");
                    return STATUS_INVALID;
                }
            };
        let weights = match checked_view_mut(model_weights, model_weights_count, "model weights") {
            Ok(view) => view,
            Err(reject) => {
                error!(target: "horde", "{reject}");
                return STATUS_INVALID;
            }
        };
        let context = match checked_view(context, context_count, "context buffer") {
            Ok(view) => view,
            Err(reject) => {
                error!(target: "horde", "{reject}");
                return STATUS_INVALID;
            }
        };
        let action = match checked_view_mut(action_output, action_output_count, "action buffer") {
            Ok(view) => view,
            Err(reject) => {
                error!(target: "horde", "{reject}");
                return STATUS_INVALID;
            }
        };

        engine().register_agent(agent_id, hyper, critic_weights, weights, context, action);
        STATUS_OK
    })
}

/// Retires agent `agent_id`. Removal is idempotent, so this always reports
/// success.
#[no_mangle]
pub extern "C" fn horde_unregister_agent(agent_id: u64) -> i32 {
    ffi_guard(STATUS_INVALID, || {
        engine().unregister_agent(agent_id);
        STATUS_OK
    })
}

/// Dispatches one tick across all registered agents, given the tick's global
/// reward buffer.
///
/// Returns [`STATUS_OK`], or [`STATUS_INVALID`] if the reward buffer fails
/// validation.
///
/// # Safety
///
/// A non-null `global_rewards` must address `count` initialized `f64` values
/// valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn horde_tick_all_agents(global_rewards: *const f64, count: i32) -> i32 {
    ffi_guard(STATUS_INVALID, || {
        let rewards = match checked_view(global_rewards, count, "reward buffer") {
            Ok(view) => view,
            Err(reject) => {
                error!(target: "horde", "{reject}");
                return STATUS_INVALID;
            }
        };

        engine().tick_all_agents(rewards);
        STATUS_OK
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    static HYPER: HyperparameterConfig = HyperparameterConfig {
        learning_rate: 0.01,
        gamma: 0.95,
        epsilon: 0.3,
        epsilon_min: 0.01,
        epsilon_decay: 0.999,
        is_training: false,
    };

    struct AgentBufs {
        critic: Vec<f64>,
        weights: Vec<f64>,
        context: Vec<f64>,
        action: Vec<f64>,
    }

    impl AgentBufs {
        fn new() -> Self {
            Self {
                critic: vec![1.0; 4],
                weights: vec![0.0; 8],
                context: vec![0.5; 8],
                action: vec![0.0; 4],
            }
        }

        unsafe fn register(&mut self, id: u64) -> i32 {
            horde_register_agent(
                id,
                &HYPER,
                self.critic.as_ptr(),
                self.critic.len() as i32,
                self.weights.as_mut_ptr(),
                self.weights.len() as i32,
                self.context.as_ptr(),
                self.context.len() as i32,
                self.action.as_mut_ptr(),
                self.action.len() as i32,
            )
        }
    }

    #[test]
    fn compute_union_rejects_null_and_bad_sizes() {
        let mut target = vec![0.0; 4];
        let source = vec![0.0; 4];

        unsafe {
            assert_eq!(
                horde_compute_union(ptr::null_mut(), source.as_ptr(), 4, 4),
                TIMING_INVALID
            );
            assert_eq!(
                horde_compute_union(target.as_mut_ptr(), ptr::null(), 4, 4),
                TIMING_INVALID
            );
            assert_eq!(
                horde_compute_union(target.as_mut_ptr(), source.as_ptr(), 0, 4),
                TIMING_INVALID
            );
            assert_eq!(
                horde_compute_union(target.as_mut_ptr(), source.as_ptr(), 4, -1),
                TIMING_INVALID
            );
        }
    }

    #[test]
    fn compute_union_runs_over_the_common_prefix() {
        let mut target = vec![0.2, 0.8, 0.1, 0.9];
        let source = vec![0.6, 0.3, 0.7];

        let elapsed = unsafe {
            horde_compute_union(target.as_mut_ptr(), source.as_ptr(), 4, 3)
        };

        assert!(elapsed >= 0);
        assert_eq!(target, vec![0.6, 0.8, 0.7, 0.9]);
    }

    #[test]
    fn register_rejects_each_invalid_parameter() {
        let mut bufs = AgentBufs::new();

        unsafe {
            assert_eq!(
                horde_register_agent(
                    1,
                    ptr::null(),
                    bufs.critic.as_ptr(),
                    4,
                    bufs.weights.as_mut_ptr(),
                    8,
                    bufs.context.as_ptr(),
                    8,
                    bufs.action.as_mut_ptr(),
                    4,
                ),
                STATUS_INVALID
            );
            assert_eq!(
                horde_register_agent(
                    1,
                    &HYPER,
                    ptr::null(),
                    4,
                    bufs.weights.as_mut_ptr(),
                    8,
                    bufs.context.as_ptr(),
                    8,
                    bufs.action.as_mut_ptr(),
                    4,
                ),
                STATUS_INVALID
            );
            assert_eq!(
                horde_register_agent(
                    1,
                    &HYPER,
                    bufs.critic.as_ptr(),
                    4,
                    bufs.weights.as_mut_ptr(),
                    -8,
                    bufs.context.as_ptr(),
                    8,
                    bufs.action.as_mut_ptr(),
                    4,
                ),
                STATUS_INVALID
            );
        }
    }

    #[test]
    fn register_tick_unregister_through_the_boundary() {
        let mut bufs = AgentBufs::new();
        let rewards = vec![0.0; 2];

        unsafe {
            assert_eq!(bufs.register(7_000_001), STATUS_OK);
            assert_eq!(
                horde_tick_all_agents(rewards.as_ptr(), rewards.len() as i32),
                STATUS_OK
            );
        }

        assert_eq!(horde_unregister_agent(7_000_001), STATUS_OK);
        // Unregistering an id that was never registered still succeeds.
        assert_eq!(horde_unregister_agent(7_000_002), STATUS_OK);
    }

    #[test]
    fn tick_rejects_an_invalid_reward_buffer() {
        let rewards = vec![0.0; 2];
        unsafe {
            assert_eq!(horde_tick_all_agents(ptr::null(), 2), STATUS_INVALID);
            assert_eq!(
                horde_tick_all_agents(rewards.as_ptr(), 0),
                STATUS_INVALID
            );
        }
    }

    #[test]
    fn log_accepts_text_and_survives_null() {
        let line = CString::new("host says hello").unwrap();
        unsafe {
            horde_log(line.as_ptr());
            horde_log(ptr::null());
        }
    }

    #[test]
    fn init_is_idempotent() {
        horde_init();
        horde_init();
    }
}
