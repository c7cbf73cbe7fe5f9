//! Self-scrolling horizontal regions.
//!
//! Each `[data-auto-scroll]` container becomes a [`ScrollRegion`] driven at a
//! constant speed by a per-frame task, paused by user interaction and
//! resumed after an idle delay.

pub mod controller;
pub mod messages;
pub mod update;

pub use controller::{AutoScrollController, RegionPhase, ScrollRegion};
pub use messages::AutoScrollMessage;
pub use update::update;

/// Stable index of a region inside its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}
