//! Key-bounded slice descriptors.
//!
//! A `Slice` names a run of entries by keys instead of integer positions:
//! `start` is inclusive, `stop` is exclusive, and either may be left open.
//! The step only selects a walk direction; `None` and `1` walk forward,
//! `-1` walks backward, anything else is rejected when the slice is used.

use crate::error::SliceError;
use core::ops::{Range, RangeFrom, RangeFull, RangeTo};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_step(step: Option<isize>) -> Result<Self, SliceError> {
        match step {
            None | Some(1) => Ok(Direction::Forward),
            Some(-1) => Ok(Direction::Backward),
            Some(0) => Err(SliceError::ZeroStep),
            Some(other) => Err(SliceError::UnsupportedStep(other)),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// `(start, stop, step)` triple over the keys of a map.
pub struct Slice<'a, Q: ?Sized> {
    pub start: Option<&'a Q>,
    pub stop: Option<&'a Q>,
    pub step: Option<isize>,
}

impl<'a, Q: ?Sized> Slice<'a, Q> {
    /// Every entry, in forward order.
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: None,
        }
    }

    /// Entries from `start` up to but excluding `stop`.
    pub const fn new(start: &'a Q, stop: &'a Q) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    pub const fn starting_at(start: &'a Q) -> Self {
        Self {
            start: Some(start),
            stop: None,
            step: None,
        }
    }

    pub const fn ending_before(stop: &'a Q) -> Self {
        Self {
            start: None,
            stop: Some(stop),
            step: None,
        }
    }

    pub fn with_start(mut self, start: &'a Q) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_stop(mut self, stop: &'a Q) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Set the raw step. Validation is deferred to the operation using the
    /// slice so that a bad step surfaces as a `SliceError`.
    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Walk backward (step `-1`).
    pub fn rev(self) -> Self {
        self.with_step(-1)
    }

    pub fn direction(&self) -> Result<Direction, SliceError> {
        Direction::from_step(self.step)
    }
}

impl<Q: ?Sized> Clone for Slice<'_, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q: ?Sized> Copy for Slice<'_, Q> {}

impl<Q: ?Sized> Default for Slice<'_, Q> {
    fn default() -> Self {
        Self::full()
    }
}

impl<Q: ?Sized + core::fmt::Debug> core::fmt::Debug for Slice<'_, Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slice")
            .field("start", &self.start)
            .field("stop", &self.stop)
            .field("step", &self.step)
            .finish()
    }
}

impl<Q: ?Sized> From<RangeFull> for Slice<'_, Q> {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

impl<'a, Q: ?Sized> From<Range<&'a Q>> for Slice<'a, Q> {
    fn from(r: Range<&'a Q>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl<'a, Q: ?Sized> From<RangeFrom<&'a Q>> for Slice<'a, Q> {
    fn from(r: RangeFrom<&'a Q>) -> Self {
        Self::starting_at(r.start)
    }
}

impl<'a, Q: ?Sized> From<RangeTo<&'a Q>> for Slice<'a, Q> {
    fn from(r: RangeTo<&'a Q>) -> Self {
        Self::ending_before(r.end)
    }
}
