use pageflow_config::NavigationConfig;

use crate::error::CoreError;
use crate::page::{ElementId, Page, Selector};

pub const OPEN_CLASS: &str = "is-open";

/// Mobile menu toggled by a hamburger button. Only wired when both the
/// toggle and the menu exist.
#[derive(Debug)]
pub struct MobileMenu {
    toggle: ElementId,
    menu: ElementId,
    closers: Selector,
}

impl MobileMenu {
    pub fn new(page: &Page, config: &NavigationConfig) -> Result<Option<Self>, CoreError> {
        let toggle = CoreError::selector("navigation.menu_toggle", &config.menu_toggle)?;
        let menu = CoreError::selector("navigation.mobile_menu", &config.mobile_menu)?;
        let closers = CoreError::selector("navigation.mobile_menu", "a, button")?;

        Ok(match (page.query_first(&toggle), page.query_first(&menu)) {
            (Some(toggle), Some(menu)) => Some(Self {
                toggle,
                menu,
                closers,
            }),
            _ => None,
        })
    }

    /// Handle a click. Returns whether the menu consumed it.
    pub fn on_click(&self, page: &mut Page, target: ElementId) -> bool {
        if page.contains(self.toggle, target) {
            let open = page.toggle_class(self.toggle, OPEN_CLASS, None);
            self.apply(page, open);
            return true;
        }
        if page.contains(self.menu, target)
            && let Some(closer) = page.closest(target, &self.closers)
            && page.contains(self.menu, closer)
        {
            self.apply(page, false);
            return true;
        }
        false
    }

    fn apply(&self, page: &mut Page, open: bool) {
        page.toggle_class(self.toggle, OPEN_CLASS, Some(open));
        page.set_attribute(self.toggle, "aria-expanded", open.to_string());
        page.toggle_class(self.menu, OPEN_CLASS, Some(open));
        log::debug!("menu: {}", if open { "opened" } else { "closed" });
    }

    pub fn is_open(&self, page: &Page) -> bool {
        page.has_class(self.toggle, OPEN_CLASS)
    }
}
