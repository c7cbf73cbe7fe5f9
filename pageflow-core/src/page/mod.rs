//! In-memory page model.
//!
//! The page is an arena of elements in document order. Controllers locate
//! elements through [`Selector`]s once at startup and afterwards address them
//! by [`ElementId`]. Everything the engine produces (classes, attributes,
//! inline style, `hidden`, horizontal scroll offsets, window scroll) is
//! written back here; hosts read it to render.

mod layout;
mod selector;

pub use layout::{ElementLayout, PageLayout};
pub use selector::{Selector, SelectorError};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Stable handle to an element for the lifetime of the page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two rects, `None` when they do not touch.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// The window: its size and vertical scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    /// Inline style properties, including custom properties (`--name`).
    pub style: BTreeMap<String, String>,
    pub hidden: bool,
    /// Layout box in document coordinates.
    pub rect: Rect,
    pub client_width: f64,
    pub scroll_width: f64,
    pub scroll_left: f64,
    pub scroll_height: f64,
    #[serde(skip)]
    parent: Option<ElementId>,
    #[serde(skip)]
    children: Vec<ElementId>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// Horizontal overflow available to scroll through.
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    elements: Vec<Element>,
    viewport: Viewport,
}

impl Page {
    pub fn from_layout(layout: PageLayout) -> Self {
        let mut page = Self {
            elements: Vec::new(),
            viewport: layout.viewport,
        };
        for element in layout.elements {
            page.insert(element, None);
        }
        page
    }

    fn insert(&mut self, layout: ElementLayout, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        let ElementLayout {
            tag,
            id: element_id,
            class,
            attributes,
            text,
            hidden,
            rect,
            client_width,
            scroll_width,
            scroll_height,
            children,
        } = layout;

        let client_width = client_width.unwrap_or(rect.width);
        self.elements.push(Element {
            tag,
            id: element_id,
            classes: class.split_whitespace().map(String::from).collect(),
            attributes,
            text,
            style: BTreeMap::new(),
            hidden,
            rect,
            client_width,
            scroll_width: scroll_width.unwrap_or(client_width).max(client_width),
            scroll_left: 0.0,
            scroll_height: scroll_height.unwrap_or(rect.height),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.elements[parent.index()].children.push(id);
        }
        for child in children {
            self.insert(child, Some(id));
        }
        id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.elements.len() as u32).map(ElementId)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Direct access for hosts that relayout (content or size changes).
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|element| element.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.element(id)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    /// `tag.class.class` label used in logs and snapshots.
    pub fn describe(&self, id: ElementId) -> String {
        let Some(element) = self.element(id) else {
            return format!("<missing {}>", id.index());
        };
        let mut label = element.tag.clone();
        if let Some(html_id) = &element.id {
            label.push('#');
            label.push_str(html_id);
        }
        for class in &element.classes {
            label.push('.');
            label.push_str(class);
        }
        label
    }

    // Queries

    pub fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.ids().filter(|id| selector.matches(self, *id)).collect()
    }

    pub fn query_first(&self, selector: &Selector) -> Option<ElementId> {
        self.ids().find(|id| selector.matches(self, *id))
    }

    /// Matching descendants of `root` (exclusive), in document order.
    pub fn query_within(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    pub fn query_first_within(
        &self,
        root: ElementId,
        selector: &Selector,
    ) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|id| selector.matches(self, *id))
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, id: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut cursor = self.element(id).map(|_| id);
        while let Some(current) = cursor {
            if selector.matches(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Whether `id` is `ancestor` or sits below it.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> =
            self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // Geometry

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    /// Bottom edge of the lowest element.
    pub fn document_height(&self) -> f64 {
        self.elements
            .iter()
            .map(|element| element.rect.bottom())
            .fold(self.viewport.height, f64::max)
    }

    pub fn max_scroll_y(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    /// Set the window scroll, clamped to the document. Returns the applied value.
    pub fn set_scroll_y(&mut self, y: f64) -> f64 {
        let clamped = y.clamp(0.0, self.max_scroll_y());
        self.viewport.scroll_y = clamped;
        clamped
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        let y = self.viewport.scroll_y;
        self.set_scroll_y(y);
    }

    /// Rect relative to the viewport, after window scroll and the horizontal
    /// scroll of every ancestor.
    pub fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        let element = self.element(id)?;
        let mut rect = element.rect;
        rect.y -= self.viewport.scroll_y;
        let mut cursor = element.parent;
        while let Some(ancestor) = cursor {
            let ancestor = &self.elements[ancestor.index()];
            rect.x -= ancestor.scroll_left;
            cursor = ancestor.parent;
        }
        Some(rect)
    }

    // Mutation

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.remove(class);
        }
    }

    /// `classList.toggle` semantics: flips the class, or forces it with
    /// `force`. Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, id: ElementId, class: &str, force: Option<bool>) -> bool {
        let present = self.has_class(id, class);
        let want = force.unwrap_or(!present);
        if want {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
        want && self.element(id).is_some()
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attribute(name))
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.style(property))
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.style.insert(property.to_string(), value.into());
        }
    }

    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|element| element.hidden)
    }

    /// False when the element or any ancestor is `hidden`.
    pub fn is_displayed(&self, id: ElementId) -> bool {
        let mut cursor = self.element(id).map(|_| id);
        while let Some(current) = cursor {
            if self.elements[current.index()].hidden {
                return false;
            }
            cursor = self.parent(current);
        }
        self.element(id).is_some()
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(element) = self.element_mut(id) {
            element.hidden = hidden;
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|element| element.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.text = text.into();
        }
    }

    pub fn scroll_left(&self, id: ElementId) -> f64 {
        self.element(id).map(|element| element.scroll_left).unwrap_or(0.0)
    }

    /// Set a container's horizontal scroll, clamped to its overflow.
    /// Returns the applied value.
    pub fn set_scroll_left(&mut self, id: ElementId, x: f64) -> f64 {
        let Some(element) = self.element_mut(id) else {
            return 0.0;
        };
        let clamped = x.clamp(0.0, element.max_scroll_left());
        element.scroll_left = clamped;
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel_page() -> Page {
        Page::from_layout(PageLayout::new(
            Viewport::new(800.0, 600.0),
            vec![
                ElementLayout::new("div")
                    .class("track")
                    .rect(0.0, 1000.0, 400.0, 200.0)
                    .scroll_extent(1000.0, 400.0)
                    .children((0..5).map(|i| {
                        ElementLayout::new("article").class("card").rect(
                            i as f64 * 200.0,
                            1000.0,
                            200.0,
                            200.0,
                        )
                    })),
                ElementLayout::new("footer").rect(0.0, 1800.0, 800.0, 200.0),
            ],
        ))
    }

    #[test]
    fn builds_tree_in_document_order() {
        let page = carousel_page();
        assert_eq!(page.len(), 7);
        let track = page.ids().next().unwrap();
        assert_eq!(page.children(track).len(), 5);
        assert_eq!(page.parent(page.children(track)[2]), Some(track));
        assert_eq!(page.describe(track), "div.track");
    }

    #[test]
    fn scroll_left_is_clamped_to_overflow() {
        let mut page = carousel_page();
        let track = page.ids().next().unwrap();
        assert_eq!(page.element(track).unwrap().max_scroll_left(), 600.0);
        assert_eq!(page.set_scroll_left(track, 900.0), 600.0);
        assert_eq!(page.set_scroll_left(track, -5.0), 0.0);
    }

    #[test]
    fn bounding_rect_follows_window_and_container_scroll() {
        let mut page = carousel_page();
        let track = page.ids().next().unwrap();
        let third = page.children(track)[2];

        page.set_scroll_y(700.0);
        page.set_scroll_left(track, 150.0);

        let rect = page.bounding_rect(third).unwrap();
        assert_eq!(rect.y, 300.0);
        assert_eq!(rect.x, 250.0);
    }

    #[test]
    fn window_scroll_is_clamped_to_document() {
        let mut page = carousel_page();
        assert_eq!(page.max_scroll_y(), 1400.0);
        assert_eq!(page.set_scroll_y(5000.0), 1400.0);
        page.set_viewport_size(800.0, 1900.0);
        assert_eq!(page.scroll_y(), 100.0);
    }

    #[test]
    fn toggle_class_matches_class_list_semantics() {
        let mut page = carousel_page();
        let track = page.ids().next().unwrap();
        assert!(page.toggle_class(track, "is-open", None));
        assert!(!page.toggle_class(track, "is-open", None));
        assert!(page.toggle_class(track, "is-open", Some(true)));
        assert!(page.toggle_class(track, "is-open", Some(true)));
        assert!(!page.toggle_class(track, "is-open", Some(false)));
    }

    #[test]
    fn rect_intersection_handles_edges() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        let touching = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&touching).map(|r| r.area()), Some(0.0));
        assert!(a.intersection(&Rect::new(200.0, 0.0, 1.0, 1.0)).is_none());
    }
}
