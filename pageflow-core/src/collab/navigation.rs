//! In-page navigation: anchor links and `[data-scroll]` buttons scroll the
//! window so the target's top lines up with the viewport top.

use std::time::Duration;

use pageflow_config::NavigationConfig;

use crate::error::CoreError;
use crate::motion::MotionPreference;
use crate::page::{ElementId, Page, Selector};
use crate::scheduler::{Scheduler, TaskHandle, TaskSlot, Wake};

pub const SCROLL_ATTRIBUTE: &str = "data-scroll";

/// Time-based tween for the window scroll position.
#[derive(Debug, Clone, Copy)]
struct SmoothScroll {
    from: f64,
    to: f64,
    /// Set on the first frame so the tween starts when rendering does.
    started: Option<Duration>,
    duration: Duration,
}

impl SmoothScroll {
    /// Position at `now` and whether the tween is finished.
    fn sample(&mut self, now: Duration) -> (f64, bool) {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_sub(started);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        (self.from + (self.to - self.from) * ease_in_out(t), false)
    }
}

/// Quadratic ease-in-out.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

#[derive(Debug)]
pub struct Navigation {
    anchors: Selector,
    buttons: Selector,
    motion: MotionPreference,
    duration: Duration,
    active: Option<SmoothScroll>,
    frame: TaskSlot,
}

impl Navigation {
    pub fn new(config: &NavigationConfig, motion: MotionPreference) -> Result<Self, CoreError> {
        Ok(Self {
            anchors: CoreError::selector("navigation.anchor_selector", &config.anchor_selector)?,
            buttons: CoreError::selector(
                "navigation.scroll_button_selector",
                &config.scroll_button_selector,
            )?,
            motion,
            duration: Duration::from_millis(config.smooth_scroll_ms),
            active: None,
            frame: TaskSlot::default(),
        })
    }

    /// Handle a click on `target`. Returns whether it was a navigation click.
    pub fn on_click(&mut self, page: &mut Page, scheduler: &mut Scheduler, target: ElementId) -> bool {
        let Some(destination) = self.destination(page, target) else {
            return false;
        };
        let Some(element) = resolve(page, &destination) else {
            log::warn!("navigation: no element matches {destination:?}");
            return true;
        };
        self.scroll_to(page, scheduler, element);
        true
    }

    /// Selector the clicked link or button points at.
    fn destination(&self, page: &Page, target: ElementId) -> Option<String> {
        if let Some(link) = page.closest(target, &self.anchors) {
            let href = page.attribute(link, "href")?;
            if href.is_empty() || href == "#" {
                return None;
            }
            return Some(href.to_string());
        }
        let button = page.closest(target, &self.buttons)?;
        page.attribute(button, SCROLL_ATTRIBUTE)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Scroll the window to `element`'s top edge; instant under reduced
    /// motion or with a zero duration.
    pub fn scroll_to(&mut self, page: &mut Page, scheduler: &mut Scheduler, element: ElementId) {
        let Some(rect) = page.bounding_rect(element) else {
            return;
        };
        let target = (page.scroll_y() + rect.y).clamp(0.0, page.max_scroll_y());

        if self.motion.is_reduced() || self.duration.is_zero() {
            self.cancel(scheduler);
            page.set_scroll_y(target);
            return;
        }

        log::debug!("navigation: smooth scroll {} -> {target}", page.scroll_y());
        self.active = Some(SmoothScroll {
            from: page.scroll_y(),
            to: target,
            started: None,
            duration: self.duration,
        });
        let handle = scheduler.request_frame(Wake::SmoothScrollFrame);
        self.frame.replace(scheduler, handle);
    }

    /// Advance the tween. Returns whether the window scroll changed.
    pub fn on_frame(
        &mut self,
        page: &mut Page,
        scheduler: &mut Scheduler,
        handle: TaskHandle,
        now: Duration,
    ) -> bool {
        if !self.frame.fire(handle) {
            return false;
        }
        let Some(tween) = self.active.as_mut() else {
            return false;
        };
        let (y, done) = tween.sample(now);
        let before = page.scroll_y();
        page.set_scroll_y(y);
        if done {
            self.active = None;
        } else {
            let handle = scheduler.request_frame(Wake::SmoothScrollFrame);
            self.frame.replace(scheduler, handle);
        }
        page.scroll_y() != before
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        self.active = None;
        self.frame.cancel(scheduler);
    }

    pub fn is_scrolling(&self) -> bool {
        self.active.is_some()
    }
}

fn resolve(page: &Page, destination: &str) -> Option<ElementId> {
    match Selector::parse(destination) {
        Ok(selector) => page.query_first(&selector),
        Err(err) => {
            log::warn!("navigation: invalid target {destination:?}: {err}");
            None
        }
    }
}
