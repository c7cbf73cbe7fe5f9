//! Page lifecycle: wires every controller to one page and routes host
//! events, timers and frames to them.
//!
//! The host drives time. Events passed to [`PageRuntime::dispatch`] happen at
//! the runtime's current time; [`PageRuntime::advance`] moves the clock
//! forward, fires due timers, runs one frame's callbacks, completes finished
//! transitions and polls visibility.

use std::time::Duration;

use pageflow_config::PageflowConfig;
use serde::{Deserialize, Serialize};

use crate::accordion::AccordionController;
use crate::auto_scroll::{self, AutoScrollController, AutoScrollMessage, RegionId};
use crate::collab::{Header, MobileMenu, Navigation, Outbound, current_year, stamp_year};
use crate::error::CoreError;
use crate::motion::{Environment, MotionPreference};
use crate::page::{ElementId, Page};
use crate::parallax::ParallaxController;
use crate::reveal::RevealController;
use crate::scheduler::{Fired, Scheduler, Wake};

/// User interactions that hold an auto-scroll region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    PointerDown,
    PointerUp,
    PointerCancel,
    PointerLeave,
    TouchStart,
    TouchEnd,
    Wheel,
}

impl Interaction {
    fn message(self, region: RegionId) -> AutoScrollMessage {
        match self {
            Interaction::PointerDown | Interaction::TouchStart => {
                AutoScrollMessage::InteractionStart(region)
            }
            Interaction::PointerUp
            | Interaction::PointerCancel
            | Interaction::PointerLeave
            | Interaction::TouchEnd => AutoScrollMessage::InteractionEnd(region),
            Interaction::Wheel => AutoScrollMessage::Wheel(region),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Window scrolled (by the user) to `y`.
    Scroll { y: f64 },
    /// Viewport resized.
    Resize { width: f64, height: f64 },
    Interaction {
        kind: Interaction,
        target: ElementId,
    },
    /// The user scrolled a horizontal container (or something inside one)
    /// to `x`. Paused regions move too; only the automatic driver holds.
    RegionScroll { target: ElementId, x: f64 },
    Click { target: ElementId },
    /// A form containing `target` was submitted.
    Submit { target: ElementId },
    /// Element geometry changed without a viewport resize.
    ContentChanged,
}

/// Side effects the host has to carry out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEffect {
    /// Open `url` in a new tab.
    OpenUrl { url: String },
}

#[derive(Debug)]
pub struct PageRuntime {
    page: Page,
    scheduler: Scheduler,
    env: Environment,
    motion: MotionPreference,
    now: Duration,
    reveal: RevealController,
    auto_scroll: AutoScrollController,
    parallax: ParallaxController,
    accordion: AccordionController,
    navigation: Navigation,
    header: Header,
    menu: Option<MobileMenu>,
    outbound: Outbound,
    effects: Vec<PageEffect>,
}

impl PageRuntime {
    /// Scan `page`, build every controller and apply the initial state.
    pub fn start(
        mut page: Page,
        config: &PageflowConfig,
        env: Environment,
    ) -> Result<Self, CoreError> {
        let motion = MotionPreference::from_environment(&env);
        let mut scheduler = Scheduler::new();
        log::debug!(
            "runtime: starting on {} elements (reduced motion: {})",
            page.len(),
            motion.is_reduced()
        );

        let header = Header::new(&page, &config.header)?;

        let mut reveal = RevealController::new(&config.reveal, motion);
        for raw in &config.reveal.selectors {
            let selector = CoreError::selector("reveal.selectors", raw)?;
            let group = page.query_all(&selector);
            reveal.register_group(&mut page, &group);
        }
        reveal.activate(&mut page, env.supports_intersection_observer);

        let mut auto_scroll = AutoScrollController::new(&config.auto_scroll, motion);
        let containers =
            page.query_all(&CoreError::selector("auto_scroll.selector", &config.auto_scroll.selector)?);
        auto_scroll.setup(&mut page, &mut scheduler, &containers);

        let mut parallax = ParallaxController::new(&config.parallax, motion);
        if motion.allows_motion() {
            for target in &config.parallax.targets {
                let selector = CoreError::selector("parallax.targets", &target.selector)?;
                let elements = page.query_all(&selector);
                parallax.register_all(&mut page, &elements, target.strength);
            }
        }
        parallax.evaluate(&mut page);

        let mut accordion = AccordionController::new(&config.accordion);
        let items = page.query_all(&CoreError::selector("accordion.item", &config.accordion.item)?);
        accordion.init(
            &mut page,
            &items,
            &CoreError::selector("accordion.trigger", &config.accordion.trigger)?,
            &CoreError::selector("accordion.panel", &config.accordion.panel)?,
        );

        let navigation = Navigation::new(&config.navigation, motion)?;
        let menu = MobileMenu::new(&page, &config.navigation)?;
        let outbound = Outbound::new(&page, &config.outbound)?;

        stamp_year(&mut page, &config.header, current_year())?;
        header.sync(&mut page);

        Ok(Self {
            page,
            scheduler,
            env,
            motion,
            now: Duration::ZERO,
            reveal,
            auto_scroll,
            parallax,
            accordion,
            navigation,
            header,
            menu,
            outbound,
            effects: Vec::new(),
        })
    }

    pub fn dispatch(&mut self, event: PageEvent) {
        log::trace!("runtime: {event:?} at {:?}", self.now);
        match event {
            PageEvent::Scroll { y } => {
                self.page.set_scroll_y(y);
                self.on_scrolled();
            }
            PageEvent::Resize { width, height } => {
                self.page.set_viewport_size(width, height);
                self.update_auto_scroll(AutoScrollMessage::Remeasure);
                self.parallax.request_update(&mut self.scheduler);
                self.accordion.on_resize(&mut self.page, self.now);
            }
            PageEvent::Interaction { kind, target } => {
                if let Some(region) = self.auto_scroll.region_containing(&self.page, target) {
                    self.update_auto_scroll(kind.message(region));
                }
            }
            PageEvent::RegionScroll { target, x } => {
                let container = self
                    .auto_scroll
                    .region_containing(&self.page, target)
                    .and_then(|region| self.auto_scroll.region(region))
                    .map_or(target, |region| region.element);
                self.page.set_scroll_left(container, x);
            }
            PageEvent::Click { target } => self.on_click(target),
            PageEvent::Submit { target } => {
                if let Some(url) = self.outbound.on_submit(&mut self.page, target) {
                    self.effects.push(PageEffect::OpenUrl { url });
                }
            }
            PageEvent::ContentChanged => {
                self.update_auto_scroll(AutoScrollMessage::Remeasure);
                self.parallax.request_update(&mut self.scheduler);
            }
        }
    }

    /// Every click listener sees the click; they do not stop propagation.
    fn on_click(&mut self, target: ElementId) {
        if let Some(menu) = &self.menu {
            menu.on_click(&mut self.page, target);
        }
        self.navigation
            .on_click(&mut self.page, &mut self.scheduler, target);
        self.accordion.on_click(&mut self.page, target, self.now);
        if let Some(url) = self.outbound.on_click(&self.page, target) {
            self.effects.push(PageEffect::OpenUrl { url });
        }
    }

    fn on_scrolled(&mut self) {
        self.header.sync(&mut self.page);
        self.parallax.request_update(&mut self.scheduler);
    }

    fn update_auto_scroll(&mut self, msg: AutoScrollMessage) {
        auto_scroll::update(
            &mut self.auto_scroll,
            &mut self.page,
            &mut self.scheduler,
            self.now,
            msg,
        );
    }

    /// Move the clock to `now` and run one frame. Earlier timestamps are
    /// treated as the current time.
    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);

        for fired in self.scheduler.take_due_timers(self.now) {
            self.route(fired);
        }
        for fired in self.scheduler.take_frame_callbacks() {
            self.route(fired);
        }
        self.accordion.on_transitions(&mut self.page, self.now);
        self.reveal.check(&mut self.page);
    }

    /// Advance in `frame` steps until `duration` has passed.
    pub fn run_for(&mut self, duration: Duration, frame: Duration) {
        let end = self.now + duration;
        let frame = frame.max(Duration::from_millis(1));
        while self.now < end {
            self.advance((self.now + frame).min(end));
        }
    }

    fn route(&mut self, fired: Fired) {
        match fired.wake {
            Wake::AutoScrollFrame(region) => self.update_auto_scroll(AutoScrollMessage::Frame {
                region,
                handle: fired.handle,
                now: self.now,
            }),
            Wake::AutoScrollResume(region) => {
                self.update_auto_scroll(AutoScrollMessage::ResumeElapsed {
                    region,
                    handle: fired.handle,
                })
            }
            Wake::ParallaxFrame => {
                self.parallax.on_frame(&mut self.page, fired.handle);
            }
            Wake::SmoothScrollFrame => {
                if self.navigation.on_frame(
                    &mut self.page,
                    &mut self.scheduler,
                    fired.handle,
                    self.now,
                ) {
                    self.on_scrolled();
                }
            }
        }
    }

    pub fn take_effects(&mut self) -> Vec<PageEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Direct page access for hosts that reflow content; follow up with
    /// [`PageEvent::ContentChanged`].
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    pub fn environment(&self) -> Environment {
        self.env
    }

    pub fn motion(&self) -> MotionPreference {
        self.motion
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn auto_scroll(&self) -> &AutoScrollController {
        &self.auto_scroll
    }

    pub fn parallax(&self) -> &ParallaxController {
        &self.parallax
    }

    pub fn accordion(&self) -> &AccordionController {
        &self.accordion
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }
}
