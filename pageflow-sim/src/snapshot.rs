//! JSON view of the page after a run.

use std::collections::{BTreeMap, BTreeSet};

use pageflow_core::{PageEffect, PageRuntime, RegionPhase};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub elapsed_ms: u128,
    pub reduced_motion: bool,
    pub scroll_y: f64,
    pub viewport: ViewportSnapshot,
    pub reveal: RevealSnapshot,
    pub regions: Vec<RegionSnapshot>,
    pub elements: Vec<ElementSnapshot>,
    pub effects: Vec<PageEffect>,
}

#[derive(Debug, Serialize)]
pub struct ViewportSnapshot {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct RevealSnapshot {
    pub registered: usize,
    pub revealed: usize,
}

#[derive(Debug, Serialize)]
pub struct RegionSnapshot {
    pub element: String,
    pub phase: &'static str,
    pub max_scroll: f64,
    pub scroll_left: f64,
}

/// Elements without any engine-visible state are left out.
#[derive(Debug, Serialize)]
pub struct ElementSnapshot {
    pub index: usize,
    pub element: String,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub hidden: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn phase_name(phase: RegionPhase) -> &'static str {
    match phase {
        RegionPhase::Stopped => "stopped",
        RegionPhase::Active => "active",
        RegionPhase::Paused => "paused",
    }
}

impl Snapshot {
    pub fn capture(runtime: &PageRuntime, effects: Vec<PageEffect>) -> Self {
        let page = runtime.page();
        let viewport = page.viewport();

        let regions = runtime
            .auto_scroll()
            .regions()
            .map(|(_, region)| RegionSnapshot {
                element: page.describe(region.element),
                phase: phase_name(region.phase()),
                max_scroll: region.max_scroll(),
                scroll_left: page.scroll_left(region.element),
            })
            .collect();

        let elements = page
            .ids()
            .filter_map(|id| {
                let element = page.element(id)?;
                let interesting = !element.style.is_empty()
                    || element.hidden
                    || !element.classes.is_empty()
                    || !element.attributes.is_empty();
                interesting.then(|| ElementSnapshot {
                    index: id.index(),
                    element: page.describe(id),
                    classes: element.classes.clone(),
                    style: element.style.clone(),
                    attributes: element.attributes.clone(),
                    text: element.text.clone(),
                    hidden: element.hidden,
                })
            })
            .collect();

        Self {
            elapsed_ms: runtime.now().as_millis(),
            reduced_motion: runtime.motion().is_reduced(),
            scroll_y: page.scroll_y(),
            viewport: ViewportSnapshot {
                width: viewport.width,
                height: viewport.height,
            },
            reveal: RevealSnapshot {
                registered: runtime.reveal().items().len(),
                revealed: runtime.reveal().revealed_count(),
            },
            regions,
            elements,
            effects,
        }
    }
}
