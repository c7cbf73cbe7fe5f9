use std::time::Duration;

use pageflow_config::PageflowConfig;
use pageflow_core::{
    ElementId, ElementLayout, EntryState, Environment, Interaction, Page, PageEvent,
    PageRuntime, PageLayout, RegionPhase, Selector, Viewport,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn find(page: &Page, selector: &str) -> ElementId {
    page.query_first(&Selector::parse(selector).unwrap())
        .unwrap_or_else(|| panic!("no element for {selector}"))
}

fn find_all(page: &Page, selector: &str) -> Vec<ElementId> {
    page.query_all(&Selector::parse(selector).unwrap())
}

fn landing_page() -> Page {
    let cards = (0..6).map(|i| {
        ElementLayout::new("article")
            .class("service")
            .rect(0.0, 1200.0 + i as f64 * 400.0, 400.0, 300.0)
    });
    let faq = (0..3).map(|i| {
        ElementLayout::new("div")
            .class("faq-item")
            .rect(0.0, 4000.0 + i as f64 * 100.0, 800.0, 80.0)
            .children([
                ElementLayout::new("button").class("faq-question"),
                ElementLayout::new("div").class("faq-answer").content_height(160.0),
            ])
    });
    Page::from_layout(PageLayout::new(
        Viewport::new(1200.0, 800.0),
        vec![
            ElementLayout::new("header").class("site-header").rect(0.0, 0.0, 1200.0, 80.0),
            ElementLayout::new("section").class("hero").rect(0.0, 0.0, 1200.0, 800.0).children([
                ElementLayout::new("div").class("hero-bg").rect(0.0, 0.0, 1200.0, 800.0),
                ElementLayout::new("div").class("hero-note").rect(100.0, 500.0, 400.0, 100.0),
            ]),
            ElementLayout::new("div")
                .class("services-grid")
                .rect(0.0, 1200.0, 1200.0, 2400.0)
                .children(cards),
            ElementLayout::new("div")
                .class("cases")
                .attr("data-auto-scroll", "")
                .rect(0.0, 3700.0, 400.0, 250.0)
                .scroll_extent(1000.0, 400.0)
                .child(ElementLayout::new("div").class("case").rect(0.0, 3700.0, 1000.0, 250.0)),
            ElementLayout::new("section")
                .class("section")
                .rect(0.0, 1400.0, 1200.0, 200.0)
                .child(
                    ElementLayout::new("div")
                        .class("container-tight")
                        .rect(0.0, 1400.0, 1200.0, 200.0),
                ),
            ElementLayout::new("section").class("faq").children(faq),
            ElementLayout::new("footer").rect(0.0, 6000.0, 1200.0, 400.0),
        ],
    ))
}

fn start(env: Environment) -> PageRuntime {
    PageRuntime::start(landing_page(), &PageflowConfig::default(), env).expect("runtime starts")
}

#[test]
fn reveal_is_monotonic_across_scrolling() {
    let mut runtime = start(Environment::default());
    let cards = find_all(runtime.page(), ".services-grid > *");
    let mut seen = vec![false; cards.len()];

    for (step, y) in [0.0, 900.0, 1800.0, 300.0, 3000.0, 0.0, 5600.0, 0.0]
        .into_iter()
        .enumerate()
    {
        runtime.dispatch(PageEvent::Scroll { y });
        runtime.advance(ms(16 * (step as u64 + 1)));
        for (index, card) in cards.iter().enumerate() {
            let revealed = runtime.reveal().is_revealed(*card);
            assert!(!(seen[index] && !revealed), "card {index} was hidden again");
            assert_eq!(revealed, runtime.page().has_class(*card, "is-visible"));
            seen[index] = revealed;
        }
    }
    assert!(seen.iter().all(|revealed| *revealed));
    assert_eq!(runtime.reveal().revealed_count(), runtime.reveal().items().len());
}

#[test]
fn reduced_motion_reveals_everything_at_startup() {
    let runtime = start(Environment::reduced_motion());
    let reveal = runtime.reveal();

    assert!(!reveal.items().is_empty());
    assert_eq!(reveal.revealed_count(), reveal.items().len());
    for item in reveal.items() {
        assert_eq!(runtime.page().style(item.element, "--reveal-delay"), None);
    }
}

#[test]
fn missing_observer_reveals_everything_at_startup() {
    let runtime = start(Environment {
        supports_intersection_observer: false,
        ..Environment::default()
    });
    assert_eq!(
        runtime.reveal().revealed_count(),
        runtime.reveal().items().len()
    );
}

#[test]
fn auto_scroll_wraps_exactly_to_zero_after_25_seconds() {
    let mut runtime = start(Environment::default());
    let carousel = find(runtime.page(), "[data-auto-scroll]");
    let region = runtime.auto_scroll().region_for(carousel).unwrap();
    assert_eq!(runtime.auto_scroll().max_scroll(region), Some(600.0));

    let mut max_seen: f64 = 0.0;
    for frame in 0..=50u64 {
        runtime.advance(ms(frame * 500));
        let offset = runtime.page().scroll_left(carousel);
        assert!((0.0..600.0).contains(&offset), "offset {offset} escaped");
        max_seen = max_seen.max(offset);
    }
    assert_eq!(max_seen, 588.0);
    // 25 s × 24 px/s lands exactly on the end, which wraps to 0.
    assert_eq!(runtime.page().scroll_left(carousel), 0.0);

    runtime.advance(ms(25_500));
    assert_eq!(runtime.page().scroll_left(carousel), 12.0);
}

#[test]
fn interaction_churn_never_advances_a_paused_region() {
    let mut runtime = start(Environment::default());
    let carousel = find(runtime.page(), "[data-auto-scroll]");
    let inner = find(runtime.page(), ".case");
    let region = runtime.auto_scroll().region_for(carousel).unwrap();

    runtime.advance(ms(0));
    runtime.advance(ms(500));
    let held = runtime.page().scroll_left(carousel);
    assert_eq!(held, 12.0);

    let sequence = [
        Interaction::PointerDown,
        Interaction::PointerUp,
        Interaction::Wheel,
        Interaction::TouchStart,
        Interaction::TouchEnd,
        Interaction::PointerLeave,
        Interaction::Wheel,
    ];
    let mut now = 500;
    for kind in sequence.into_iter().cycle().take(28) {
        runtime.dispatch(PageEvent::Interaction { kind, target: inner });
        now += 400;
        runtime.advance(ms(now));
        assert_eq!(runtime.page().scroll_left(carousel), held);
        assert_eq!(
            runtime.auto_scroll().phase(region),
            Some(RegionPhase::Paused)
        );
    }
    // Only ever one resume timer pending.
    assert_eq!(runtime.scheduler().pending_timers(), 1);

    runtime.advance(ms(now + 1_800));
    assert_eq!(runtime.auto_scroll().phase(region), Some(RegionPhase::Active));
    assert!(runtime.page().scroll_left(carousel) > held);
}

#[test]
fn auto_scroll_follows_resize() {
    let mut runtime = start(Environment::default());
    let carousel = find(runtime.page(), "[data-auto-scroll]");
    let region = runtime.auto_scroll().region_for(carousel).unwrap();

    runtime.page_mut().element_mut(carousel).unwrap().client_width = 1000.0;
    runtime.dispatch(PageEvent::Resize {
        width: 2000.0,
        height: 800.0,
    });
    assert_eq!(runtime.auto_scroll().phase(region), Some(RegionPhase::Stopped));

    runtime.page_mut().element_mut(carousel).unwrap().client_width = 600.0;
    runtime.dispatch(PageEvent::ContentChanged);
    assert_eq!(runtime.auto_scroll().phase(region), Some(RegionPhase::Active));
    assert_eq!(runtime.auto_scroll().max_scroll(region), Some(400.0));
}

#[test]
fn reduced_motion_keeps_regions_stopped() {
    let mut runtime = start(Environment::reduced_motion());
    let carousel = find(runtime.page(), "[data-auto-scroll]");
    let region = runtime.auto_scroll().region_for(carousel).unwrap();

    runtime.run_for(ms(5_000), ms(100));
    assert_eq!(runtime.auto_scroll().phase(region), Some(RegionPhase::Stopped));
    assert_eq!(runtime.page().scroll_left(carousel), 0.0);
}

#[test]
fn accordion_never_has_two_open_entries() {
    let mut runtime = start(Environment::default());
    let triggers = find_all(runtime.page(), ".faq-question");
    let clicks = [0, 1, 1, 2, 0, 0, 2, 1, 2, 2, 0, 1];

    let mut now = 0;
    for (step, index) in clicks.into_iter().enumerate() {
        runtime.dispatch(PageEvent::Click {
            target: triggers[index],
        });
        assert!(runtime.accordion().expanded_count() <= 1);
        // Alternate between clicking mid-transition and after it settles.
        now += if step % 2 == 0 { 100 } else { 500 };
        runtime.advance(ms(now));
        assert!(runtime.accordion().expanded_count() <= 1);
    }
}

#[test]
fn opening_b_closes_a_in_the_same_dispatch() {
    let mut runtime = start(Environment::default());
    let items = find_all(runtime.page(), ".faq-item");
    let triggers = find_all(runtime.page(), ".faq-question");
    let panels = find_all(runtime.page(), ".faq-answer");

    runtime.dispatch(PageEvent::Click { target: triggers[0] });
    runtime.advance(ms(400));
    assert_eq!(runtime.accordion().state_of(items[0]), Some(EntryState::Expanded));

    runtime.dispatch(PageEvent::Click { target: triggers[1] });
    assert_eq!(runtime.accordion().state_of(items[0]), Some(EntryState::Collapsing));
    assert_eq!(runtime.accordion().state_of(items[1]), Some(EntryState::Expanding));
    assert!(!runtime.page().is_hidden(panels[0]));
    assert!(!runtime.page().is_hidden(panels[1]));
    assert_eq!(runtime.page().attribute(triggers[0], "aria-expanded"), Some("false"));
    assert_eq!(runtime.page().attribute(triggers[1], "aria-expanded"), Some("true"));

    runtime.advance(ms(600));
    assert!(!runtime.page().is_hidden(panels[0]));

    runtime.advance(ms(750));
    assert_eq!(runtime.accordion().state_of(items[0]), Some(EntryState::Collapsed));
    assert!(runtime.page().is_hidden(panels[0]));
    assert_eq!(runtime.accordion().state_of(items[1]), Some(EntryState::Expanded));
    assert_eq!(runtime.page().style(panels[1], "max-height"), Some("160px"));
}

#[test]
fn parallax_offset_is_odd_around_the_viewport_center() {
    let mut runtime = start(Environment::default());
    let bg = find(runtime.page(), ".hero-bg");
    let container = find(runtime.page(), ".section > .container-tight");

    // Hero background is centered in the viewport at startup.
    assert_eq!(runtime.parallax().offset(bg), Some(0.0));
    assert_eq!(runtime.page().style(bg, "--parallax-offset"), Some("0.00px"));

    // Container center sits at 1500px; the viewport center at scroll + 400.
    runtime.dispatch(PageEvent::Scroll { y: 1_100.0 });
    runtime.advance(ms(16));
    assert_eq!(runtime.parallax().offset(container), Some(0.0));

    runtime.dispatch(PageEvent::Scroll { y: 900.0 });
    runtime.advance(ms(32));
    let below = runtime.parallax().offset(container).unwrap();

    runtime.dispatch(PageEvent::Scroll { y: 1_300.0 });
    runtime.advance(ms(48));
    let above = runtime.parallax().offset(container).unwrap();

    assert!(below < 0.0);
    assert!(above > 0.0);
    assert!((above + below).abs() < 1e-9, "{above} vs {below}");
}

#[test]
fn header_tracks_window_scroll() {
    let mut runtime = start(Environment::reduced_motion());
    let header = find(runtime.page(), ".site-header");
    assert!(!runtime.page().has_class(header, "is-scrolled"));

    runtime.dispatch(PageEvent::Scroll { y: 120.0 });
    assert!(runtime.page().has_class(header, "is-scrolled"));
}

#[test]
fn page_fixture_deserializes_from_json() {
    let json = r#"{
        "viewport": { "width": 390, "height": 844 },
        "elements": [
            { "tag": "div", "attributes": { "data-auto-scroll": "" },
              "rect": { "x": 0, "y": 100, "width": 390, "height": 200 },
              "scroll_width": 900, "client_width": 390 }
        ]
    }"#;
    let layout: PageLayout = serde_json::from_str(json).unwrap();
    let runtime = PageRuntime::start(
        Page::from_layout(layout),
        &PageflowConfig::default(),
        Environment::default(),
    )
    .unwrap();

    let carousel = find(runtime.page(), "[data-auto-scroll]");
    let region = runtime.auto_scroll().region_for(carousel).unwrap();
    assert_eq!(runtime.auto_scroll().max_scroll(region), Some(510.0));
}
