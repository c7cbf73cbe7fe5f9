//! Viewport intersection checks.
//!
//! A polling counterpart of `IntersectionObserver` with a single threshold
//! and a bottom root margin. The runtime re-evaluates observed targets
//! whenever geometry can have changed (startup, scroll, resize, frames).

use std::collections::BTreeSet;

use crate::page::{ElementId, Page, Rect, Viewport};

/// Share of `target` that lies inside `root`. A zero-area target counts as
/// fully visible when it touches the root.
pub fn visible_fraction(target: Rect, root: Rect) -> f64 {
    let Some(overlap) = target.intersection(&root) else {
        return 0.0;
    };
    let area = target.area();
    if area <= 0.0 {
        return 1.0;
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    threshold: f64,
    root_margin_bottom: f64,
    targets: BTreeSet<ElementId>,
}

impl IntersectionObserver {
    /// `root_margin_bottom` is a signed fraction of the viewport height;
    /// negative values pull the bottom edge of the root upwards.
    pub fn new(threshold: f64, root_margin_bottom: f64) -> Self {
        Self {
            threshold,
            root_margin_bottom,
            targets: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, id: ElementId) {
        self.targets.insert(id);
    }

    pub fn unobserve(&mut self, id: ElementId) {
        self.targets.remove(&id);
    }

    pub fn is_observing(&self, id: ElementId) -> bool {
        self.targets.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn root(&self, viewport: Viewport) -> Rect {
        let height = viewport.height * (1.0 + self.root_margin_bottom);
        Rect::new(0.0, 0.0, viewport.width, height.max(0.0))
    }

    pub fn is_intersecting(&self, page: &Page, id: ElementId) -> bool {
        if !page.is_displayed(id) {
            return false;
        }
        let Some(rect) = page.bounding_rect(id) else {
            return false;
        };
        let root = self.root(page.viewport());
        if rect.intersection(&root).is_none() {
            return false;
        }
        visible_fraction(rect, root) >= self.threshold
    }

    /// Observed targets currently at or above the threshold, in document order.
    pub fn intersecting(&self, page: &Page) -> Vec<ElementId> {
        self.targets
            .iter()
            .copied()
            .filter(|id| self.is_intersecting(page, *id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementLayout, PageLayout};

    #[test]
    fn fraction_of_partially_visible_target() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(visible_fraction(Rect::new(0.0, 80.0, 100.0, 100.0), root), 0.2);
        assert_eq!(visible_fraction(Rect::new(0.0, 200.0, 10.0, 10.0), root), 0.0);
        assert_eq!(visible_fraction(Rect::new(5.0, 5.0, 0.0, 0.0), root), 1.0);
    }

    #[test]
    fn bottom_margin_shrinks_root() {
        let observer = IntersectionObserver::new(0.2, -0.10);
        let root = observer.root(Viewport::new(1000.0, 800.0));
        assert_eq!(root.height, 720.0);
    }

    #[test]
    fn threshold_applies_to_viewport_relative_rect() {
        let mut page = Page::from_layout(PageLayout::new(
            Viewport::new(1000.0, 1000.0),
            vec![
                ElementLayout::new("div").rect(0.0, 850.0, 100.0, 100.0),
                ElementLayout::new("div").rect(0.0, 3000.0, 100.0, 100.0),
                ElementLayout::new("footer").rect(0.0, 5000.0, 100.0, 100.0),
            ],
        ));
        let ids: Vec<ElementId> = page.ids().collect();
        let mut observer = IntersectionObserver::new(0.2, -0.10);
        observer.observe(ids[0]);
        observer.observe(ids[1]);

        // Root ends at 900px: 50% of the first box is inside.
        assert_eq!(observer.intersecting(&page), vec![ids[0]]);

        page.set_scroll_y(1500.0);
        assert!(observer.intersecting(&page).is_empty());
        page.set_scroll_y(2850.0);
        assert_eq!(observer.intersecting(&page), vec![ids[1]]);
    }

    #[test]
    fn hidden_targets_never_intersect() {
        let page = Page::from_layout(PageLayout::new(
            Viewport::new(1000.0, 1000.0),
            vec![ElementLayout::new("div").rect(0.0, 0.0, 100.0, 100.0).child({
                let mut child = ElementLayout::new("p").rect(0.0, 0.0, 100.0, 50.0);
                child.hidden = true;
                child
            })],
        ));
        let ids: Vec<ElementId> = page.ids().collect();
        let observer = IntersectionObserver::new(0.2, 0.0);
        assert!(observer.is_intersecting(&page, ids[0]));
        assert!(!observer.is_intersecting(&page, ids[1]));
    }
}
