//! Height transitions.
//!
//! Stands in for the rendering layer's CSS transition on `max-height`: it
//! writes the target value immediately, tracks the in-flight animation, and
//! reports completion when the duration has elapsed. Retargeting an element
//! mid-flight replaces its transition, so only the latest one ever completes.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::page::{ElementId, Page};

pub const MAX_HEIGHT: &str = "max-height";

const EPSILON: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct HeightTransition {
    from: f64,
    to: f64,
    started: Duration,
    ends: Duration,
}

impl HeightTransition {
    /// Linear interpolation of the animated value at `now`.
    fn value_at(&self, now: Duration) -> f64 {
        let total = self.ends.saturating_sub(self.started).as_secs_f64();
        if total <= 0.0 {
            return self.to;
        }
        let t = (now.saturating_sub(self.started).as_secs_f64() / total).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
}

/// Whether setting a new target started an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStart {
    /// Completion will be reported by [`Transitions::poll`].
    Running,
    /// Already at the target (or zero duration); no completion will follow.
    Instant,
}

#[derive(Debug)]
pub struct Transitions {
    duration: Duration,
    active: BTreeMap<ElementId, HeightTransition>,
}

impl Transitions {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: BTreeMap::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current animated `max-height` of `id`, or `None` when it has no
    /// inline `max-height` yet.
    pub fn current_max_height(&self, page: &Page, id: ElementId, now: Duration) -> Option<f64> {
        if let Some(transition) = self.active.get(&id) {
            return Some(transition.value_at(now));
        }
        page.style(id, MAX_HEIGHT).and_then(parse_px)
    }

    /// Set `max-height` to `target` px and start animating towards it.
    pub fn animate_max_height(
        &mut self,
        page: &mut Page,
        id: ElementId,
        target: f64,
        now: Duration,
    ) -> TransitionStart {
        let current = self.current_max_height(page, id, now);
        page.set_style(id, MAX_HEIGHT, format_px(target));

        let Some(from) = current else {
            self.active.remove(&id);
            return TransitionStart::Instant;
        };
        if self.duration.is_zero() || (from - target).abs() < EPSILON {
            self.active.remove(&id);
            return TransitionStart::Instant;
        }

        self.active.insert(
            id,
            HeightTransition {
                from,
                to: target,
                started: now,
                ends: now + self.duration,
            },
        );
        TransitionStart::Running
    }

    /// Set `max-height` without animating and drop any in-flight transition.
    pub fn jump_max_height(&mut self, page: &mut Page, id: ElementId, target: f64) {
        self.active.remove(&id);
        page.set_style(id, MAX_HEIGHT, format_px(target));
    }

    /// Elements whose transition finished at or before `now`.
    pub fn poll(&mut self, now: Duration) -> Vec<ElementId> {
        let finished: Vec<ElementId> = self
            .active
            .iter()
            .filter(|(_, transition)| transition.ends <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &finished {
            self.active.remove(id);
        }
        finished
    }

    pub fn is_animating(&self, id: ElementId) -> bool {
        self.active.contains_key(&id)
    }
}

pub fn format_px(value: f64) -> String {
    format!("{}px", value)
}

pub fn parse_px(raw: &str) -> Option<f64> {
    raw.trim().strip_suffix("px")?.trim().parse().ok()
}
