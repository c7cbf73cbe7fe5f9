//! Frame and timer scheduling.
//!
//! A single-threaded stand-in for `requestAnimationFrame` and `setTimeout`.
//! Work is identified by a [`Wake`] tag instead of a closure; the runtime
//! routes fired tasks back to the owning controller. Callbacks requested
//! while a frame is being processed run on the following frame.
//!
//! Controllers keep each kind of pending work in a [`TaskSlot`], which
//! cancels the previous task whenever a new one is armed. A fired task is
//! only honoured if its handle is still the one held by the slot, so a
//! canceled or superseded task can never run.

use std::time::Duration;

use crate::auto_scroll::RegionId;

/// What a scheduled task should do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Per-frame auto-scroll driver step.
    AutoScrollFrame(RegionId),
    /// Idle delay after the last interaction elapsed.
    AutoScrollResume(RegionId),
    /// Coalesced parallax recomputation.
    ParallaxFrame,
    /// Smooth in-page scroll step.
    SmoothScrollFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// A task handed back to the runtime for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TaskHandle,
    pub wake: Wake,
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TaskHandle,
    due: Duration,
    wake: Wake,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_handle: u64,
    frames: Vec<Fired>,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskHandle {
        self.next_handle += 1;
        TaskHandle(self.next_handle)
    }

    /// Run `wake` on the next frame.
    pub fn request_frame(&mut self, wake: Wake) -> TaskHandle {
        let handle = self.allocate();
        self.frames.push(Fired { handle, wake });
        handle
    }

    /// Run `wake` once `delay` has elapsed after `now`.
    pub fn set_timeout(&mut self, now: Duration, delay: Duration, wake: Wake) -> TaskHandle {
        let handle = self.allocate();
        self.timers.push(Timer {
            handle,
            due: now + delay,
            wake,
        });
        handle
    }

    /// Remove a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.frames.len() + self.timers.len();
        self.frames.retain(|task| task.handle != handle);
        self.timers.retain(|timer| timer.handle != handle);
        before != self.frames.len() + self.timers.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.frames.iter().any(|task| task.handle == handle)
            || self.timers.iter().any(|timer| timer.handle == handle)
    }

    /// Drain the callbacks registered for the current frame.
    pub fn take_frame_callbacks(&mut self) -> Vec<Fired> {
        std::mem::take(&mut self.frames)
    }

    /// Drain timers due at or before `now`, earliest first.
    pub fn take_due_timers(&mut self, now: Duration) -> Vec<Fired> {
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.due <= now);
        self.timers = pending;
        due.sort_by_key(|timer| (timer.due, timer.handle));
        due.into_iter()
            .map(|timer| Fired {
                handle: timer.handle,
                wake: timer.wake,
            })
            .collect()
    }

    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

/// Holder for at most one pending task of a given kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskSlot(Option<TaskHandle>);

impl TaskSlot {
    /// Arm the slot with `handle`, canceling whatever it held before.
    pub fn replace(&mut self, scheduler: &mut Scheduler, handle: TaskHandle) {
        self.cancel(scheduler);
        self.0 = Some(handle);
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(previous) = self.0.take() {
            scheduler.cancel(previous);
        }
    }

    /// Consume a fired task. Returns false for a task this slot no longer
    /// owns, which must then be ignored.
    pub fn fire(&mut self, handle: TaskHandle) -> bool {
        if self.0 == Some(handle) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn frame_callbacks_drain_once() {
        let mut scheduler = Scheduler::new();
        scheduler.request_frame(Wake::ParallaxFrame);
        scheduler.request_frame(Wake::SmoothScrollFrame);
        assert_eq!(scheduler.take_frame_callbacks().len(), 2);
        assert!(scheduler.take_frame_callbacks().is_empty());
    }

    #[test]
    fn timers_fire_in_due_order_and_only_when_due() {
        let mut scheduler = Scheduler::new();
        let region = RegionId::new(0);
        scheduler.set_timeout(ms(0), ms(300), Wake::AutoScrollResume(region));
        scheduler.set_timeout(ms(0), ms(100), Wake::ParallaxFrame);

        assert!(scheduler.take_due_timers(ms(50)).is_empty());
        assert_eq!(scheduler.next_timer_due(), Some(ms(100)));

        let fired = scheduler.take_due_timers(ms(400));
        let wakes: Vec<Wake> = fired.iter().map(|f| f.wake).collect();
        assert_eq!(
            wakes,
            vec![Wake::ParallaxFrame, Wake::AutoScrollResume(region)]
        );
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn slot_replacement_cancels_previous_task() {
        let mut scheduler = Scheduler::new();
        let mut slot = TaskSlot::default();

        let first = scheduler.set_timeout(ms(0), ms(100), Wake::ParallaxFrame);
        slot.replace(&mut scheduler, first);
        let second = scheduler.set_timeout(ms(50), ms(100), Wake::ParallaxFrame);
        slot.replace(&mut scheduler, second);

        assert!(!scheduler.is_pending(first));
        assert!(scheduler.is_pending(second));
        assert_eq!(scheduler.pending_timers(), 1);
    }

    #[test]
    fn slot_ignores_stale_handles() {
        let mut scheduler = Scheduler::new();
        let mut slot = TaskSlot::default();
        let stale = scheduler.request_frame(Wake::ParallaxFrame);
        let live = scheduler.request_frame(Wake::ParallaxFrame);
        slot.replace(&mut scheduler, live);

        assert!(!slot.fire(stale));
        assert!(slot.is_armed());
        assert!(slot.fire(live));
        assert!(!slot.is_armed());
        assert!(!slot.fire(live));
    }
}
