//! Non-owning views over host-owned buffers.
//!
//! The host supplies raw pointer/length pairs across the foreign-call
//! boundary. The boundary wraps them into [`HostView`]/[`HostViewMut`]
//! immediately, so bare pointers never travel further into the engine. A view
//! is a bounds-carrying window: it performs no allocation, no copy, and never
//! frees the memory it describes.
//!
//! Validity is a host contract, not something this layer can check:
//! a view is valid from the call that supplied it until the host revokes the
//! buffer (for per-tick buffers, the end of the tick; for registration
//! buffers, the matching unregistration). State that must survive past that
//! window is detached with [`HostView::copy_to_vec`].

use core::ptr::NonNull;

/// Read-only view over a contiguous run of host-owned `f64` values.
#[derive(Clone, Copy, Debug)]
pub struct HostView {
    ptr: *const f64,
    len: usize,
}

/// Mutable view over a contiguous run of host-owned `f64` values.
///
/// Deliberately not `Copy`: duplicating a mutable window invites aliased
/// writes. The owner hands out short-lived slices instead.
#[derive(Debug)]
pub struct HostViewMut {
    ptr: *mut f64,
    len: usize,
}

// SAFETY: the host guarantees that every buffer handed to the engine is
// disjoint per agent and stays valid while registered. Views only move
// between threads inside the tick fan-out, where each model touches its own
// buffers exclusively.
unsafe impl Send for HostView {}
unsafe impl Sync for HostView {}
unsafe impl Send for HostViewMut {}
unsafe impl Sync for HostViewMut {}

impl HostView {
    /// Wraps `len` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and point to at least `len`
    /// initialized `f64` values that stay valid (and unwritten by others while
    /// read here) for the lifetime of the view. Boundary validation rejects
    /// null pointers and non-positive sizes before this is reached.
    #[inline]
    pub unsafe fn from_raw(ptr: *const f64, len: usize) -> Self {
        debug_assert!(!ptr.is_null());
        Self { ptr, len }
    }

    /// A view over no elements; a placeholder where nothing is bound yet.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::<f64>::dangling().as_ptr(),
            len: 0,
        }
    }

    /// Number of elements covered by the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the viewed elements.
    ///
    /// # Safety
    ///
    /// The host memory behind the view must still be valid, and nothing may
    /// write to it while the slice is alive.
    #[inline]
    pub unsafe fn as_slice(&self) -> &[f64] {
        core::slice::from_raw_parts(self.ptr, self.len)
    }

    /// Detaches an owned copy of the viewed elements.
    ///
    /// This is the one sanctioned way for engine state to outlive the view's
    /// validity window.
    ///
    /// # Safety
    ///
    /// Same requirements as [`HostView::as_slice`].
    pub unsafe fn copy_to_vec(&self) -> Vec<f64> {
        self.as_slice().to_vec()
    }
}

impl HostViewMut {
    /// Wraps `len` mutable elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Same requirements as [`HostView::from_raw`], plus: this view must be
    /// the only writer to the range while bound.
    #[inline]
    pub unsafe fn from_raw(ptr: *mut f64, len: usize) -> Self {
        debug_assert!(!ptr.is_null());
        Self { ptr, len }
    }

    /// An unbound, zero-length view.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::<f64>::dangling().as_ptr(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the viewed elements read-only.
    ///
    /// # Safety
    ///
    /// The host memory behind the view must still be valid; no other writer
    /// may touch it while the slice is alive.
    #[inline]
    pub unsafe fn as_slice(&self) -> &[f64] {
        core::slice::from_raw_parts(self.ptr, self.len)
    }

    /// Borrows the viewed elements mutably.
    ///
    /// Takes `&self` because tick processing mutates host memory through a
    /// shared model reference; exclusivity comes from the host's
    /// buffer-partitioning contract, not the borrow checker.
    ///
    /// # Safety
    ///
    /// The host memory behind the view must still be valid, and the caller
    /// must be the only reader/writer of the range for the slice's lifetime.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn as_mut_slice(&self) -> &mut [f64] {
        core::slice::from_raw_parts_mut(self.ptr, self.len)
    }

    /// Read-only downgrade over the same range.
    #[inline]
    pub fn as_view(&self) -> HostView {
        HostView {
            ptr: self.ptr,
            len: self.len,
        }
    }
}
