use std::time::Duration;

use super::RegionId;
use crate::scheduler::TaskHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoScrollMessage {
    /// Pointer-down or touch-start on the region.
    InteractionStart(RegionId),
    /// Pointer-up/cancel/leave or touch-end on the region.
    InteractionEnd(RegionId),
    /// Wheel over the region: pause, then immediately arm the resume timer.
    Wheel(RegionId),
    /// Frame-synchronized driver step.
    Frame {
        region: RegionId,
        handle: TaskHandle,
        now: Duration,
    },
    /// The idle delay after the last interaction elapsed.
    ResumeElapsed { region: RegionId, handle: TaskHandle },
    /// Viewport resized or content changed; recompute every region.
    Remeasure,
}
