//! Single-open FAQ accordion with animated panel heights.
//!
//! Opening an entry first closes every other open one in the same call, so
//! at most one entry is expanded at any time. A closing panel stays in
//! layout until its height transition completes and is only hidden then if
//! it was not re-opened in the meantime.

use std::time::Duration;

use pageflow_config::AccordionConfig;

use crate::page::{ElementId, Page, Selector};
use crate::transition::{TransitionStart, Transitions};

pub const OPEN_CLASS: &str = "is-open";
pub const ARIA_EXPANDED: &str = "aria-expanded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

impl EntryState {
    pub fn is_expanded(self) -> bool {
        matches!(self, EntryState::Expanding | EntryState::Expanded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionEntry {
    pub item: ElementId,
    pub trigger: ElementId,
    pub panel: ElementId,
    state: EntryState,
}

impl AccordionEntry {
    pub fn state(&self) -> EntryState {
        self.state
    }
}

#[derive(Debug)]
pub struct AccordionController {
    entries: Vec<AccordionEntry>,
    transitions: Transitions,
}

impl AccordionController {
    pub fn new(config: &AccordionConfig) -> Self {
        Self {
            entries: Vec::new(),
            transitions: Transitions::new(Duration::from_millis(config.transition_ms)),
        }
    }

    /// Build entries from `items`. Items missing their trigger or panel are
    /// skipped; every adopted panel starts collapsed and hidden.
    pub fn init(
        &mut self,
        page: &mut Page,
        items: &[ElementId],
        trigger: &Selector,
        panel: &Selector,
    ) -> usize {
        let before = self.entries.len();
        for &item in items {
            if self.entries.iter().any(|entry| entry.item == item) {
                continue;
            }
            let (Some(trigger), Some(panel)) = (
                page.query_first_within(item, trigger),
                page.query_first_within(item, panel),
            ) else {
                log::warn!(
                    "accordion: skipping {} without trigger or panel",
                    page.describe(item)
                );
                continue;
            };

            self.transitions.jump_max_height(page, panel, 0.0);
            page.set_hidden(panel, true);
            self.entries.push(AccordionEntry {
                item,
                trigger,
                panel,
                state: EntryState::Collapsed,
            });
        }
        let added = self.entries.len() - before;
        if added > 0 {
            log::debug!("accordion: initialised {added} entries");
        }
        added
    }

    /// Entry whose trigger is `target` or contains it.
    pub fn entry_for_click(&self, page: &Page, target: ElementId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.trigger == target || page.contains(entry.trigger, target))
    }

    /// Click on a trigger: close everything, then open the clicked entry if
    /// it was not already open. Returns false when `target` is not inside a
    /// trigger.
    pub fn on_click(&mut self, page: &mut Page, target: ElementId, now: Duration) -> bool {
        let Some(index) = self.entry_for_click(page, target) else {
            return false;
        };
        self.toggle(page, index, now);
        true
    }

    pub fn toggle(&mut self, page: &mut Page, index: usize, now: Duration) {
        let Some(clicked) = self.entries.get(index).copied() else {
            return;
        };
        let was_open = clicked.state.is_expanded();

        for other in 0..self.entries.len() {
            if self.entries[other].state.is_expanded() {
                self.collapse(page, other, now);
            }
        }
        if !was_open {
            self.expand(page, index, now);
        }
    }

    fn expand(&mut self, page: &mut Page, index: usize, now: Duration) {
        let entry = self.entries[index];
        page.add_class(entry.item, OPEN_CLASS);
        page.set_attribute(entry.trigger, ARIA_EXPANDED, "true");
        page.set_hidden(entry.panel, false);

        let measured = content_height(page, entry.panel);
        let state = match self.transitions.animate_max_height(page, entry.panel, measured, now) {
            TransitionStart::Running => EntryState::Expanding,
            TransitionStart::Instant => EntryState::Expanded,
        };
        self.entries[index].state = state;
        log::debug!("accordion: {} -> {state:?}", page.describe(entry.item));
    }

    fn collapse(&mut self, page: &mut Page, index: usize, now: Duration) {
        let entry = self.entries[index];
        page.remove_class(entry.item, OPEN_CLASS);
        page.set_attribute(entry.trigger, ARIA_EXPANDED, "false");

        match self.transitions.animate_max_height(page, entry.panel, 0.0, now) {
            TransitionStart::Running => {
                self.entries[index].state = EntryState::Collapsing;
            }
            TransitionStart::Instant => {
                self.entries[index].state = EntryState::Collapsing;
                self.finish(page, entry.panel);
            }
        }
        log::debug!("accordion: {} -> collapsing", page.describe(entry.item));
    }

    /// Drive transition completion for everything finished by `now`.
    pub fn on_transitions(&mut self, page: &mut Page, now: Duration) -> usize {
        let finished = self.transitions.poll(now);
        for panel in &finished {
            self.on_transition_end(page, *panel);
        }
        finished.len()
    }

    /// Completion signal for `panel`'s height transition.
    pub fn on_transition_end(&mut self, page: &mut Page, panel: ElementId) {
        self.finish(page, panel);
    }

    fn finish(&mut self, page: &mut Page, panel: ElementId) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.panel == panel) else {
            return;
        };
        match entry.state {
            EntryState::Collapsing => {
                // Re-opened while closing: leave it visible.
                if !page.has_class(entry.item, OPEN_CLASS) {
                    page.set_hidden(panel, true);
                    entry.state = EntryState::Collapsed;
                }
            }
            EntryState::Expanding => entry.state = EntryState::Expanded,
            EntryState::Collapsed | EntryState::Expanded => {}
        }
    }

    /// Re-measure open panels so a reflow does not leave them clipped.
    pub fn on_resize(&mut self, page: &mut Page, now: Duration) {
        for index in 0..self.entries.len() {
            let entry = self.entries[index];
            if !entry.state.is_expanded() {
                continue;
            }
            let measured = content_height(page, entry.panel);
            let start = self
                .transitions
                .animate_max_height(page, entry.panel, measured, now);
            // An in-flight expand that lands on its target is replaced
            // without a completion signal.
            if start == TransitionStart::Instant {
                self.finish(page, entry.panel);
            }
        }
    }

    pub fn state(&self, index: usize) -> Option<EntryState> {
        self.entries.get(index).map(AccordionEntry::state)
    }

    pub fn state_of(&self, item: ElementId) -> Option<EntryState> {
        self.entries
            .iter()
            .find(|entry| entry.item == item)
            .map(AccordionEntry::state)
    }

    pub fn expanded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state.is_expanded())
            .count()
    }

    pub fn entries(&self) -> &[AccordionEntry] {
        &self.entries
    }

    pub fn is_animating(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| self.transitions.is_animating(entry.panel))
    }
}

fn content_height(page: &Page, panel: ElementId) -> f64 {
    page.element(panel)
        .map(|element| element.scroll_height)
        .unwrap_or(0.0)
}
