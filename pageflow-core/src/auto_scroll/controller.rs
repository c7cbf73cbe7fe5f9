use std::collections::HashMap;
use std::time::Duration;

use pageflow_config::AutoScrollConfig;

use super::RegionId;
use crate::motion::MotionPreference;
use crate::page::{ElementId, Page};
use crate::scheduler::{Scheduler, TaskHandle, TaskSlot, Wake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPhase {
    /// No overflow (or motion disabled); the driver is not scheduled.
    Stopped,
    /// Driver running and advancing the offset.
    Active,
    /// Driver running but holding the offset until the resume timer fires.
    Paused,
}

#[derive(Debug, Clone)]
pub struct ScrollRegion {
    pub element: ElementId,
    /// Scrollable overflow, `scroll_width - client_width` floored at 0.
    max_scroll: f64,
    running: bool,
    /// Held by user interaction. Independent of `running` so a pause that
    /// lands while the region is stopped still holds once it restarts.
    paused: bool,
    /// Timestamp of the previous driver step; `None` right after a start.
    last_frame: Option<Duration>,
    driver: TaskSlot,
    resume: TaskSlot,
}

impl ScrollRegion {
    fn new(element: ElementId) -> Self {
        Self {
            element,
            max_scroll: 0.0,
            running: false,
            paused: false,
            last_frame: None,
            driver: TaskSlot::default(),
            resume: TaskSlot::default(),
        }
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    pub fn phase(&self) -> RegionPhase {
        match (self.running, self.paused) {
            (false, _) => RegionPhase::Stopped,
            (true, true) => RegionPhase::Paused,
            (true, false) => RegionPhase::Active,
        }
    }

    pub fn is_driver_scheduled(&self) -> bool {
        self.driver.is_armed()
    }

    pub fn is_resume_pending(&self) -> bool {
        self.resume.is_armed()
    }
}

#[derive(Debug)]
pub struct AutoScrollController {
    motion: MotionPreference,
    /// Pixels per second.
    speed: f64,
    resume_delay: Duration,
    regions: Vec<ScrollRegion>,
    by_element: HashMap<ElementId, RegionId>,
}

impl AutoScrollController {
    pub fn new(config: &AutoScrollConfig, motion: MotionPreference) -> Self {
        Self {
            motion,
            speed: config.speed,
            resume_delay: Duration::from_millis(config.resume_delay_ms),
            regions: Vec::new(),
            by_element: HashMap::new(),
        }
    }

    /// Adopt `containers` as regions (already known ones are skipped), then
    /// measure everything and start or stop each driver accordingly.
    pub fn setup(
        &mut self,
        page: &mut Page,
        scheduler: &mut Scheduler,
        containers: &[ElementId],
    ) -> usize {
        let mut added = 0;
        for &element in containers {
            if self.by_element.contains_key(&element) || page.element(element).is_none() {
                continue;
            }
            let id = RegionId::new(self.regions.len());
            self.regions.push(ScrollRegion::new(element));
            self.by_element.insert(element, id);
            added += 1;
        }
        if added > 0 {
            log::debug!("auto-scroll: adopted {added} regions");
        }
        self.refresh(page, scheduler);
        added
    }

    /// Recompute metrics after a resize or content change: regions with
    /// overflow run, the rest stop with their offset pinned to 0.
    pub fn refresh(&mut self, page: &mut Page, scheduler: &mut Scheduler) {
        if self.motion.is_reduced() {
            for region in &mut self.regions {
                stop(region, scheduler);
            }
            return;
        }

        for (index, region) in self.regions.iter_mut().enumerate() {
            update_metrics(region, page);
            if region.max_scroll > 0.0 {
                start(region, scheduler, RegionId::new(index));
            } else {
                stop(region, scheduler);
            }
        }
    }

    /// User interaction began: hold the offset and drop any pending resume.
    pub fn pause(&mut self, scheduler: &mut Scheduler, id: RegionId) {
        if self.motion.is_reduced() {
            return;
        }
        let Some(region) = self.regions.get_mut(id.index()) else {
            return;
        };
        if !region.paused {
            log::trace!("auto-scroll: region {} paused", id.index());
        }
        region.paused = true;
        region.resume.cancel(scheduler);
    }

    /// User interaction ended: (re)arm the single resume timer.
    pub fn schedule_resume(&mut self, scheduler: &mut Scheduler, id: RegionId, now: Duration) {
        if self.motion.is_reduced() {
            return;
        }
        let Some(region) = self.regions.get_mut(id.index()) else {
            return;
        };
        let handle = scheduler.set_timeout(now, self.resume_delay, Wake::AutoScrollResume(id));
        region.resume.replace(scheduler, handle);
    }

    pub fn resume_elapsed(&mut self, id: RegionId, handle: TaskHandle) {
        let Some(region) = self.regions.get_mut(id.index()) else {
            return;
        };
        if region.resume.fire(handle) {
            region.paused = false;
            log::trace!("auto-scroll: region {} resumed", id.index());
        }
    }

    /// One driver step. Advances by the time since the previous step and
    /// wraps to 0 on reaching the end, then schedules the next frame.
    pub fn step(
        &mut self,
        page: &mut Page,
        scheduler: &mut Scheduler,
        id: RegionId,
        handle: TaskHandle,
        now: Duration,
    ) {
        let speed = self.speed;
        let Some(region) = self.regions.get_mut(id.index()) else {
            return;
        };
        if !region.driver.fire(handle) || !region.running {
            return;
        }

        let last = region.last_frame.unwrap_or(now);
        let elapsed = now.saturating_sub(last).as_secs_f64();
        region.last_frame = Some(now);

        if !region.paused && region.max_scroll > 0.0 {
            let next = page.scroll_left(region.element) + elapsed * speed;
            let next = if next >= region.max_scroll { 0.0 } else { next };
            page.set_scroll_left(region.element, next);
        }

        let handle = scheduler.request_frame(Wake::AutoScrollFrame(id));
        region.driver.replace(scheduler, handle);
    }

    pub fn region(&self, id: RegionId) -> Option<&ScrollRegion> {
        self.regions.get(id.index())
    }

    pub fn region_for(&self, element: ElementId) -> Option<RegionId> {
        self.by_element.get(&element).copied()
    }

    /// The region `element` belongs to, walking up from descendants.
    pub fn region_containing(&self, page: &Page, element: ElementId) -> Option<RegionId> {
        let mut current = Some(element);
        while let Some(id) = current {
            if let Some(region) = self.region_for(id) {
                return Some(region);
            }
            current = page.parent(id);
        }
        None
    }

    pub fn phase(&self, id: RegionId) -> Option<RegionPhase> {
        self.region(id).map(ScrollRegion::phase)
    }

    pub fn max_scroll(&self, id: RegionId) -> Option<f64> {
        self.region(id).map(ScrollRegion::max_scroll)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &ScrollRegion)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(index, region)| (RegionId::new(index), region))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn update_metrics(region: &mut ScrollRegion, page: &mut Page) {
    let max_scroll = page
        .element(region.element)
        .map(|element| element.max_scroll_left())
        .unwrap_or(0.0);
    region.max_scroll = max_scroll;
    if max_scroll == 0.0 {
        page.set_scroll_left(region.element, 0.0);
    }
}

fn start(region: &mut ScrollRegion, scheduler: &mut Scheduler, id: RegionId) {
    if region.running {
        return;
    }
    region.running = true;
    region.last_frame = None;
    let handle = scheduler.request_frame(Wake::AutoScrollFrame(id));
    region.driver.replace(scheduler, handle);
    log::debug!(
        "auto-scroll: region {} running (max scroll {}px)",
        id.index(),
        region.max_scroll
    );
}

fn stop(region: &mut ScrollRegion, scheduler: &mut Scheduler) {
    if region.running {
        log::debug!("auto-scroll: region on {:?} stopped", region.element);
    }
    region.running = false;
    region.driver.cancel(scheduler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_scroll::{AutoScrollMessage, update};
    use crate::page::{ElementLayout, PageLayout, Viewport};

    fn carousel(content: f64, visible: f64) -> (Page, ElementId) {
        let page = Page::from_layout(PageLayout::new(
            Viewport::new(1280.0, 800.0),
            vec![
                ElementLayout::new("div")
                    .attr("data-auto-scroll", "")
                    .rect(0.0, 100.0, visible, 300.0)
                    .scroll_extent(content, visible),
            ],
        ));
        let id = page.ids().next().unwrap();
        (page, id)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Route everything the scheduler has due at `now` back to the controller.
    fn pump(
        controller: &mut AutoScrollController,
        page: &mut Page,
        scheduler: &mut Scheduler,
        now: Duration,
    ) {
        for fired in scheduler.take_due_timers(now) {
            if let Wake::AutoScrollResume(region) = fired.wake {
                update(
                    controller,
                    page,
                    scheduler,
                    now,
                    AutoScrollMessage::ResumeElapsed {
                        region,
                        handle: fired.handle,
                    },
                );
            }
        }
        for fired in scheduler.take_frame_callbacks() {
            if let Wake::AutoScrollFrame(region) = fired.wake {
                update(
                    controller,
                    page,
                    scheduler,
                    now,
                    AutoScrollMessage::Frame {
                        region,
                        handle: fired.handle,
                        now,
                    },
                );
            }
        }
    }

    fn controller(motion: MotionPreference) -> AutoScrollController {
        AutoScrollController::new(&AutoScrollConfig::default(), motion)
    }

    #[test]
    fn region_without_overflow_is_stopped() {
        let (mut page, element) = carousel(400.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::FULL);

        controller.setup(&mut page, &mut scheduler, &[element]);
        let id = controller.region_for(element).unwrap();
        assert_eq!(controller.phase(id), Some(RegionPhase::Stopped));
        assert_eq!(controller.max_scroll(id), Some(0.0));
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn first_frame_has_no_elapsed_time() {
        let (mut page, element) = carousel(1000.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::FULL);
        controller.setup(&mut page, &mut scheduler, &[element]);

        pump(&mut controller, &mut page, &mut scheduler, ms(5_000));
        assert_eq!(page.scroll_left(element), 0.0);
        pump(&mut controller, &mut page, &mut scheduler, ms(5_500));
        assert_eq!(page.scroll_left(element), 12.0);
    }

    #[test]
    fn paused_region_holds_until_idle_delay_passes() {
        let (mut page, element) = carousel(1000.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::FULL);
        controller.setup(&mut page, &mut scheduler, &[element]);
        let id = controller.region_for(element).unwrap();

        pump(&mut controller, &mut page, &mut scheduler, ms(0));
        controller.pause(&mut scheduler, id);
        controller.schedule_resume(&mut scheduler, id, ms(0));
        assert_eq!(controller.phase(id), Some(RegionPhase::Paused));

        for tick in 1..=3 {
            pump(&mut controller, &mut page, &mut scheduler, ms(500 * tick));
        }
        assert_eq!(page.scroll_left(element), 0.0);

        // 1.8 s after the interaction ended the resume timer fires first,
        // so this frame already advances.
        pump(&mut controller, &mut page, &mut scheduler, ms(2_000));
        assert_eq!(controller.phase(id), Some(RegionPhase::Active));
        assert_eq!(page.scroll_left(element), 12.0);
    }

    #[test]
    fn new_interaction_replaces_pending_resume() {
        let (mut page, element) = carousel(1000.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::FULL);
        controller.setup(&mut page, &mut scheduler, &[element]);
        let id = controller.region_for(element).unwrap();

        controller.schedule_resume(&mut scheduler, id, ms(0));
        controller.schedule_resume(&mut scheduler, id, ms(1_000));
        assert_eq!(scheduler.pending_timers(), 1);
        assert_eq!(scheduler.next_timer_due(), Some(ms(2_800)));

        controller.pause(&mut scheduler, id);
        assert_eq!(scheduler.pending_timers(), 0);
        assert!(!controller.region(id).unwrap().is_resume_pending());
    }

    #[test]
    fn resize_transitions_between_running_and_stopped() {
        let (mut page, element) = carousel(1000.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::FULL);
        controller.setup(&mut page, &mut scheduler, &[element]);
        let id = controller.region_for(element).unwrap();
        page.set_scroll_left(element, 250.0);

        page.element_mut(element).unwrap().client_width = 1000.0;
        update(
            &mut controller,
            &mut page,
            &mut scheduler,
            ms(0),
            AutoScrollMessage::Remeasure,
        );
        assert_eq!(controller.phase(id), Some(RegionPhase::Stopped));
        assert_eq!(page.scroll_left(element), 0.0);
        assert_eq!(scheduler.pending_frames(), 0);

        page.element_mut(element).unwrap().client_width = 500.0;
        controller.refresh(&mut page, &mut scheduler);
        assert_eq!(controller.phase(id), Some(RegionPhase::Active));
        assert_eq!(controller.max_scroll(id), Some(500.0));
        assert_eq!(scheduler.pending_frames(), 1);
    }

    #[test]
    fn reduced_motion_keeps_every_region_stopped() {
        let (mut page, element) = carousel(1000.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::REDUCED);
        controller.setup(&mut page, &mut scheduler, &[element]);
        let id = controller.region_for(element).unwrap();

        controller.pause(&mut scheduler, id);
        controller.schedule_resume(&mut scheduler, id, ms(0));
        assert_eq!(controller.phase(id), Some(RegionPhase::Stopped));
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn setup_is_idempotent_per_container() {
        let (mut page, element) = carousel(1000.0, 400.0);
        let mut scheduler = Scheduler::new();
        let mut controller = controller(MotionPreference::FULL);

        assert_eq!(controller.setup(&mut page, &mut scheduler, &[element]), 1);
        assert_eq!(controller.setup(&mut page, &mut scheduler, &[element]), 0);
        assert_eq!(controller.len(), 1);
        assert_eq!(scheduler.pending_frames(), 1);
    }
}
