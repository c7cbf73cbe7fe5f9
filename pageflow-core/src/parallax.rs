//! Scroll-linked parallax offsets.

use pageflow_config::ParallaxConfig;

use crate::motion::MotionPreference;
use crate::page::{ElementId, Page, Rect};
use crate::scheduler::{Scheduler, TaskHandle, TaskSlot, Wake};

pub const PARALLAX_CLASS: &str = "parallax";
pub const STRENGTH_PROPERTY: &str = "--parallax-strength";
pub const OFFSET_PROPERTY: &str = "--parallax-offset";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxItem {
    pub element: ElementId,
    pub strength: f64,
    offset: f64,
}

impl ParallaxItem {
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// Vertical offset for an element whose viewport-relative box is `rect`.
/// Negative below the viewport center, positive above, zero when centered.
pub fn offset_for(rect: Rect, viewport_height: f64, strength: f64, range: f64) -> f64 {
    if viewport_height <= 0.0 {
        return 0.0;
    }
    let distance = (rect.center_y() - viewport_height / 2.0) / viewport_height;
    -distance * strength * range
}

fn format_offset(offset: f64) -> String {
    let rounded = (offset * 100.0).round() / 100.0;
    // Normalise -0 so a centered element reads "0.00px".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}px")
}

#[derive(Debug)]
pub struct ParallaxController {
    motion: MotionPreference,
    range: f64,
    items: Vec<ParallaxItem>,
    pending: TaskSlot,
}

impl ParallaxController {
    pub fn new(config: &ParallaxConfig, motion: MotionPreference) -> Self {
        Self {
            motion,
            range: config.range,
            items: Vec::new(),
            pending: TaskSlot::default(),
        }
    }

    /// Register `element` with a fixed `strength`. Elements already carrying
    /// the parallax marker are skipped, and nothing is registered at all
    /// under reduced motion.
    pub fn register_item(&mut self, page: &mut Page, element: ElementId, strength: f64) -> bool {
        if self.motion.is_reduced()
            || page.element(element).is_none()
            || page.has_class(element, PARALLAX_CLASS)
        {
            return false;
        }
        page.add_class(element, PARALLAX_CLASS);
        page.set_style(element, STRENGTH_PROPERTY, strength.to_string());
        self.items.push(ParallaxItem {
            element,
            strength,
            offset: 0.0,
        });
        true
    }

    pub fn register_all(&mut self, page: &mut Page, elements: &[ElementId], strength: f64) -> usize {
        let added = elements
            .iter()
            .filter(|element| self.register_item(page, **element, strength))
            .count();
        if added > 0 {
            log::debug!("parallax: registered {added} items at strength {strength}");
        }
        added
    }

    /// Scroll or resize signal. Schedules one recomputation for the next
    /// frame unless one is already pending.
    pub fn request_update(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.items.is_empty() || self.pending.is_armed() {
            return false;
        }
        let handle = scheduler.request_frame(Wake::ParallaxFrame);
        self.pending.replace(scheduler, handle);
        true
    }

    pub fn on_frame(&mut self, page: &mut Page, handle: TaskHandle) -> bool {
        if !self.pending.fire(handle) {
            return false;
        }
        self.evaluate(page);
        true
    }

    /// Recompute and write every item's offset from current geometry.
    pub fn evaluate(&mut self, page: &mut Page) {
        let viewport_height = page.viewport().height;
        for item in &mut self.items {
            let Some(rect) = page.bounding_rect(item.element) else {
                continue;
            };
            item.offset = offset_for(rect, viewport_height, item.strength, self.range);
            page.set_style(item.element, OFFSET_PROPERTY, format_offset(item.offset));
        }
        log::trace!("parallax: evaluated {} items", self.items.len());
    }

    pub fn offset(&self, element: ElementId) -> Option<f64> {
        self.items
            .iter()
            .find(|item| item.element == element)
            .map(ParallaxItem::offset)
    }

    pub fn items(&self) -> &[ParallaxItem] {
        &self.items
    }

    pub fn is_update_pending(&self) -> bool {
        self.pending.is_armed()
    }
}
