//! Serializable page description used to build a [`Page`](super::Page).
//!
//! Hosts hand over the laid-out element tree once; geometry is in document
//! coordinates (the rect an element would have with the window scrolled to
//! the top).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Rect, Viewport};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageLayout {
    pub viewport: Viewport,
    pub elements: Vec<ElementLayout>,
}

impl PageLayout {
    pub fn new(viewport: Viewport, elements: Vec<ElementLayout>) -> Self {
        Self { viewport, elements }
    }
}

fn default_tag() -> String {
    "div".to_string()
}

/// One node of the element tree.
///
/// `client_width` and `scroll_width` default to the rect width, and
/// `scroll_height` to the rect height, so only overflowing containers and
/// collapsible panels need to spell them out.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ElementLayout {
    #[serde(default = "default_tag")]
    pub tag: String,
    pub id: Option<String>,
    /// Space separated class list.
    pub class: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub hidden: bool,
    pub rect: Rect,
    pub client_width: Option<f64>,
    pub scroll_width: Option<f64>,
    pub scroll_height: Option<f64>,
    pub children: Vec<ElementLayout>,
}

impl Default for ElementLayout {
    fn default() -> Self {
        Self::new(default_tag())
    }
}

impl ElementLayout {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class: String::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            hidden: false,
            rect: Rect::default(),
            client_width: None,
            scroll_width: None,
            scroll_height: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    /// Horizontal overflow: `content` px of content inside a `visible` px box.
    pub fn scroll_extent(mut self, content: f64, visible: f64) -> Self {
        self.scroll_width = Some(content);
        self.client_width = Some(visible);
        self
    }

    /// Natural height of the content, independent of any `max-height`.
    pub fn content_height(mut self, height: f64) -> Self {
        self.scroll_height = Some(height);
        self
    }

    pub fn child(mut self, child: ElementLayout) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementLayout>) -> Self {
        self.children.extend(children);
        self
    }
}
