use serde::{Deserialize, Serialize};

fn default_reveal_selectors() -> Vec<String> {
    [
        ".section-heading",
        ".hero-text > *",
        ".hero-tags > *",
        ".hero-actions > *",
        ".hero-note",
        ".hero-portrait",
        ".services-grid > *",
        ".price-grid > *",
        ".group-title",
        ".options-card",
        ".terms-grid > *",
        ".terms-note",
        ".cases-grid > *",
        ".process-step",
        ".audience-tags > *",
        ".audience-grid > *",
        ".faq-item",
        ".contact-info",
        ".contact-form-card",
        ".about",
        ".footer-inner",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Reveal-on-visibility settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Registration groups, in registration order. Each selector forms one
    /// group; its matches are staggered by their position in the group.
    #[serde(default = "default_reveal_selectors")]
    pub selectors: Vec<String>,
    /// Delay added per position inside a group (ms).
    pub stagger_step_ms: u64,
    /// Upper bound for the stagger delay (ms) so long groups do not lag.
    pub max_delay_ms: u64,
    /// Visible fraction of an element that triggers its reveal.
    pub threshold: f64,
    /// Signed bottom root margin as a fraction of viewport height. Negative
    /// values shrink the observed area from the bottom edge.
    pub root_margin_bottom: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: default_reveal_selectors(),
            stagger_step_ms: 80,
            max_delay_ms: 320,
            threshold: 0.2,
            root_margin_bottom: -0.10,
        }
    }
}

/// Auto-scrolling carousel settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Containers driven by the auto-scroller.
    pub selector: String,
    /// Constant advance speed in px per second.
    pub speed: f64,
    /// Idle window after the last interaction before driving resumes (ms).
    pub resume_delay_ms: u64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            selector: "[data-auto-scroll]".to_string(),
            speed: 24.0,
            resume_delay_ms: 1_800,
        }
    }
}

/// One parallax registration: every element matching `selector` moves with
/// the given strength.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParallaxTarget {
    pub selector: String,
    /// Coefficient in `(0, 1]`.
    pub strength: f64,
}

impl ParallaxTarget {
    pub fn new(selector: impl Into<String>, strength: f64) -> Self {
        Self {
            selector: selector.into(),
            strength,
        }
    }
}

fn default_parallax_targets() -> Vec<ParallaxTarget> {
    vec![
        ParallaxTarget::new(".hero-bg", 0.35),
        ParallaxTarget::new(".hero-inner", 0.12),
        ParallaxTarget::new(".section > .container-tight", 0.08),
    ]
}

/// Scroll-linked parallax settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Maximum displacement in px for an element one viewport away from
    /// center at strength 1.
    pub range: f64,
    #[serde(default = "default_parallax_targets")]
    pub targets: Vec<ParallaxTarget>,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            range: 120.0,
            targets: default_parallax_targets(),
        }
    }
}
