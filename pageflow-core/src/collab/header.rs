use chrono::Datelike;
use pageflow_config::HeaderConfig;

use crate::error::CoreError;
use crate::page::{ElementId, Page};

pub const SCROLLED_CLASS: &str = "is-scrolled";

/// Site header that gets a compact style once the page is scrolled.
#[derive(Debug)]
pub struct Header {
    element: Option<ElementId>,
    threshold: f64,
}

impl Header {
    pub fn new(page: &Page, config: &HeaderConfig) -> Result<Self, CoreError> {
        let selector = CoreError::selector("header.selector", &config.selector)?;
        Ok(Self {
            element: page.query_first(&selector),
            threshold: config.scrolled_threshold,
        })
    }

    /// Sync the scrolled class with the current window scroll.
    pub fn sync(&self, page: &mut Page) {
        if let Some(header) = self.element {
            let scrolled = page.scroll_y() > self.threshold;
            page.toggle_class(header, SCROLLED_CLASS, Some(scrolled));
        }
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }
}

/// Write `year` into the first element matching the configured year
/// selector. Returns the stamped element, if any.
pub fn stamp_year(
    page: &mut Page,
    config: &HeaderConfig,
    year: i32,
) -> Result<Option<ElementId>, CoreError> {
    let selector = CoreError::selector("header.year_selector", &config.year_selector)?;
    let target = page.query_first(&selector);
    if let Some(target) = target {
        page.set_text(target, year.to_string());
    }
    Ok(target)
}

/// Current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
