//! Configuration models.
//!
//! Defaults mirror the values the landing page shipped with, so an empty
//! document yields the production behaviour.

mod motion;
mod page;

pub use motion::{AutoScrollConfig, ParallaxConfig, ParallaxTarget, RevealConfig};
pub use page::{
    AccordionConfig, FormTemplate, HeaderConfig, InterestTemplate,
    NavigationConfig, OutboundConfig,
};

use serde::{Deserialize, Serialize};

/// Top-level configuration for a page runtime.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageflowConfig {
    /// Entrance animations for content blocks.
    pub reveal: RevealConfig,
    /// Self-scrolling horizontal carousels.
    pub auto_scroll: AutoScrollConfig,
    /// Scroll-linked background offsets.
    pub parallax: ParallaxConfig,
    /// Single-open FAQ panel.
    pub accordion: AccordionConfig,
    /// In-page anchors, scroll buttons and the mobile menu.
    pub navigation: NavigationConfig,
    /// Sticky header state and footer year stamp.
    pub header: HeaderConfig,
    /// Prefilled chat links built from the contact form and price cards.
    pub outbound: OutboundConfig,
}
