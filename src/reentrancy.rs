//! Reentrancy tracking for the map internals.
//!
//! Two trackers live here:
//! - `DebugReentrancy` guards structural sections of `LinkedIndex`. While a
//!   section runs the link ring and the key index may disagree for a few
//!   instructions, and the only user code that can run there is `K: Eq` /
//!   `K: Hash`. Entering twice panics in debug builds; release builds
//!   compile the check away.
//! - `FmtRecursion` is always on. `Debug` for a map uses it to render a
//!   value that leads back into the same map as `...` instead of recursing
//!   until the stack overflows.
//!
//! Both are `Send` and `!Sync`: a map may move between threads, shared
//! access from several threads needs outside synchronisation.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            _nosync: PhantomData,
        }
    }

    /// Enter a structural section. Panics in debug builds if one is
    /// already active on this instance.
    #[inline]
    pub(crate) fn enter(&self) -> Section<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(d == 0, "reentrancy detected: nested entry into slice map");
            self.depth.set(d + 1);
            Section { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            Section { _z: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Section<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}

/// Marks a map as "being formatted".
#[derive(Debug, Default)]
pub(crate) struct FmtRecursion {
    active: Cell<bool>,
}

impl FmtRecursion {
    pub(crate) const fn new() -> Self {
        Self {
            active: Cell::new(false),
        }
    }

    /// `None` when formatting of the owner is already in progress further up
    /// the stack.
    pub(crate) fn try_enter(&self) -> Option<FmtToken<'_>> {
        if self.active.replace(true) {
            return None;
        }
        Some(FmtToken { owner: self })
    }
}

pub(crate) struct FmtToken<'a> {
    owner: &'a FmtRecursion,
}

impl Drop for FmtToken<'_> {
    fn drop(&mut self) {
        self.owner.active.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::{DebugReentrancy, FmtRecursion};

    #[test]
    fn enter_and_exit_is_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter();
            let _g2 = r.enter();
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn reentrancy_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter();
        let _g2 = r.enter();
    }

    #[test]
    fn fmt_recursion_rejects_nested_entry() {
        let f = FmtRecursion::new();
        let outer = f.try_enter();
        assert!(outer.is_some());
        assert!(f.try_enter().is_none());
        drop(outer);
        assert!(f.try_enter().is_some());
    }
}
