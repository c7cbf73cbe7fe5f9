//! Headless interaction engine for a single marketing page.
//!
//! A [`PageRuntime`] owns an in-memory [`Page`] and four independent motion
//! controllers that share only the page and a [`MotionPreference`]:
//!
//! - [`RevealController`] fades content in the first time it scrolls into view.
//! - [`AutoScrollController`] drives horizontal carousels, pausing on
//!   interaction and resuming after an idle delay.
//! - [`ParallaxController`] offsets background layers by scroll position.
//! - [`AccordionController`] keeps a single FAQ entry open with animated
//!   panel heights.
//!
//! Work that browsers run on animation frames and timers goes through the
//! [`Scheduler`]; hosts advance time explicitly.

pub mod accordion;
pub mod auto_scroll;
pub mod collab;
pub mod error;
pub mod motion;
pub mod observer;
pub mod page;
pub mod parallax;
pub mod reveal;
pub mod runtime;
pub mod scheduler;
pub mod transition;

pub use accordion::{AccordionController, EntryState};
pub use auto_scroll::{AutoScrollController, RegionId, RegionPhase};
pub use error::CoreError;
pub use motion::{Environment, MotionPreference};
pub use page::{
    ElementId, ElementLayout, Page, PageLayout, Rect, Selector, SelectorError,
    Viewport,
};
pub use parallax::ParallaxController;
pub use reveal::{RevealController, RevealPolicy};
pub use runtime::{Interaction, PageEffect, PageEvent, PageRuntime};
pub use scheduler::{Scheduler, TaskHandle, TaskSlot, Wake};
