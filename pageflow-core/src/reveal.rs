//! Reveal-on-visibility controller.
//!
//! Elements are registered in groups (one group per selector). Each new
//! item is tagged for its entrance animation and given a stagger delay from
//! its position in the group. Once registration is done the controller
//! either reveals everything at once (reduced motion, or no visibility
//! detection) or watches each item and reveals it the first time enough of
//! it is on screen. Reveal is one-way: an item is never hidden again and
//! stops being watched as soon as it is revealed.

use std::collections::HashMap;
use std::time::Duration;

use pageflow_config::RevealConfig;

use crate::motion::MotionPreference;
use crate::observer::IntersectionObserver;
use crate::page::{ElementId, Page};

pub const REVEAL_CLASS: &str = "reveal";
pub const VISIBLE_CLASS: &str = "is-visible";
pub const DELAY_PROPERTY: &str = "--reveal-delay";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealItem {
    pub element: ElementId,
    /// Position inside its registration group; only drives the stagger.
    pub group_index: usize,
    pub revealed: bool,
}

/// How registered items get revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Still registering; nothing is revealed yet.
    Pending,
    /// Everything is shown immediately.
    Immediate,
    /// Items are revealed as they scroll into view.
    Observe,
}

#[derive(Debug)]
pub struct RevealController {
    motion: MotionPreference,
    stagger_step: Duration,
    max_delay: Duration,
    observer: IntersectionObserver,
    items: Vec<RevealItem>,
    by_element: HashMap<ElementId, usize>,
    policy: RevealPolicy,
}

impl RevealController {
    pub fn new(config: &RevealConfig, motion: MotionPreference) -> Self {
        Self {
            motion,
            stagger_step: Duration::from_millis(config.stagger_step_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            observer: IntersectionObserver::new(
                config.threshold,
                config.root_margin_bottom,
            ),
            items: Vec::new(),
            by_element: HashMap::new(),
            policy: RevealPolicy::Pending,
        }
    }

    /// Stagger delay for the `group_index`-th item of a group.
    pub fn delay_for(&self, group_index: usize) -> Duration {
        self.stagger_step
            .saturating_mul(group_index as u32)
            .min(self.max_delay)
    }

    /// Register one group in order. Already registered elements are skipped
    /// and do not consume a stagger position. Returns how many were added.
    pub fn register_group(&mut self, page: &mut Page, elements: &[ElementId]) -> usize {
        let mut group_index = 0;
        for &element in elements {
            if self.by_element.contains_key(&element) || page.element(element).is_none() {
                continue;
            }

            page.add_class(element, REVEAL_CLASS);
            if self.motion.allows_motion() {
                let delay = self.delay_for(group_index);
                page.set_style(element, DELAY_PROPERTY, format!("{}s", delay.as_secs_f64()));
            }

            self.by_element.insert(element, self.items.len());
            self.items.push(RevealItem {
                element,
                group_index,
                revealed: false,
            });
            group_index += 1;

            // Late registrations follow whatever policy is already active.
            match self.policy {
                RevealPolicy::Pending => {}
                RevealPolicy::Immediate => {
                    self.reveal(page, element);
                }
                RevealPolicy::Observe => self.observer.observe(element),
            }
        }
        if group_index > 0 {
            log::debug!("reveal: registered group of {group_index}");
        }
        group_index
    }

    /// Pick the reveal policy once registration is complete and apply it.
    /// Returns the items revealed right away.
    pub fn activate(&mut self, page: &mut Page, supports_observer: bool) -> Vec<ElementId> {
        if self.policy != RevealPolicy::Pending || self.items.is_empty() {
            return Vec::new();
        }

        if self.motion.is_reduced() || !supports_observer {
            self.policy = RevealPolicy::Immediate;
            log::debug!(
                "reveal: showing {} items immediately (reduced motion: {}, observer: {})",
                self.items.len(),
                self.motion.is_reduced(),
                supports_observer
            );
            let elements: Vec<ElementId> = self.items.iter().map(|item| item.element).collect();
            return elements
                .into_iter()
                .filter(|element| self.reveal(page, *element))
                .collect();
        }

        self.policy = RevealPolicy::Observe;
        for item in &self.items {
            self.observer.observe(item.element);
        }
        self.check(page)
    }

    /// Reveal every watched item that is now sufficiently visible.
    pub fn check(&mut self, page: &mut Page) -> Vec<ElementId> {
        if self.policy != RevealPolicy::Observe || self.observer.is_empty() {
            return Vec::new();
        }
        let hits = self.observer.intersecting(page);
        for element in &hits {
            self.observer.unobserve(*element);
            self.reveal(page, *element);
        }
        if !hits.is_empty() {
            log::trace!("reveal: {} items entered the viewport", hits.len());
        }
        hits
    }

    fn reveal(&mut self, page: &mut Page, element: ElementId) -> bool {
        let Some(&index) = self.by_element.get(&element) else {
            return false;
        };
        let item = &mut self.items[index];
        if item.revealed {
            return false;
        }
        item.revealed = true;
        page.add_class(element, VISIBLE_CLASS);
        true
    }

    pub fn policy(&self) -> RevealPolicy {
        self.policy
    }

    pub fn items(&self) -> &[RevealItem] {
        &self.items
    }

    pub fn item(&self, element: ElementId) -> Option<&RevealItem> {
        self.by_element.get(&element).map(|index| &self.items[*index])
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.by_element.contains_key(&element)
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.item(element).is_some_and(|item| item.revealed)
    }

    pub fn is_watching(&self, element: ElementId) -> bool {
        self.observer.is_observing(element)
    }

    pub fn revealed_count(&self) -> usize {
        self.items.iter().filter(|item| item.revealed).count()
    }
}
