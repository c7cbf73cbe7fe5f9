//! Event scripts: timed page events addressed by selector.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use pageflow_core::{
    CoreError, ElementId, Interaction, Page, PageEvent, PageRuntime, Selector,
};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Offset from the start of the run, e.g. `"1.5s"` or `"250ms"`.
    #[serde(deserialize_with = "human_duration")]
    pub at: Duration,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Scroll { y: f64 },
    Resize { width: f64, height: f64 },
    Interaction { kind: Interaction, target: String },
    /// Scroll a horizontal container by hand.
    RegionScroll { target: String, x: f64 },
    Click { target: String },
    Submit { target: String },
    /// Type into a form field.
    SetValue { target: String, value: String },
    /// Change a container's content width, then report the reflow.
    SetScrollWidth { target: String, scroll_width: f64 },
    ContentChanged,
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let mut script: Script = serde_json::from_str(&raw)
            .with_context(|| format!("invalid script {}", path.display()))?;
        // Stable: steps sharing a timestamp keep their file order.
        script.steps.sort_by_key(|step| step.at);
        Ok(script)
    }
}

fn resolve(page: &Page, target: &str) -> Result<ElementId> {
    let selector = Selector::parse(target)
        .with_context(|| format!("invalid target selector {target:?}"))?;
    let element = page
        .query_first(&selector)
        .ok_or_else(|| CoreError::UnresolvedTarget(target.to_string()))?;
    Ok(element)
}

/// Apply one step to the runtime at its current time.
pub fn apply(runtime: &mut PageRuntime, action: &Action) -> Result<()> {
    let event = match action {
        Action::Scroll { y } => PageEvent::Scroll { y: *y },
        Action::Resize { width, height } => PageEvent::Resize {
            width: *width,
            height: *height,
        },
        Action::Interaction { kind, target } => PageEvent::Interaction {
            kind: *kind,
            target: resolve(runtime.page(), target)?,
        },
        Action::RegionScroll { target, x } => PageEvent::RegionScroll {
            target: resolve(runtime.page(), target)?,
            x: *x,
        },
        Action::Click { target } => PageEvent::Click {
            target: resolve(runtime.page(), target)?,
        },
        Action::Submit { target } => PageEvent::Submit {
            target: resolve(runtime.page(), target)?,
        },
        Action::SetValue { target, value } => {
            let element = resolve(runtime.page(), target)?;
            runtime.page_mut().set_attribute(element, "value", value.clone());
            return Ok(());
        }
        Action::SetScrollWidth {
            target,
            scroll_width,
        } => {
            let element = resolve(runtime.page(), target)?;
            if let Some(element) = runtime.page_mut().element_mut(element) {
                element.scroll_width = scroll_width.max(element.client_width);
            }
            PageEvent::ContentChanged
        }
        Action::ContentChanged => PageEvent::ContentChanged,
    };
    runtime.dispatch(event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pageflow_config::PageflowConfig;
    use pageflow_core::{ElementLayout, Environment, PageLayout, Viewport};

    use super::*;

    #[test]
    fn parses_steps_with_human_durations() {
        let script: Script = serde_json::from_str(
            r#"{ "steps": [
                { "at": "1.5s", "type": "scroll", "y": 400 },
                { "at": "250ms", "type": "interaction", "kind": "pointer_down", "target": ".cases" },
                { "at": "2s", "type": "content_changed" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[0].at, Duration::from_millis(1_500));
        assert!(matches!(
            script.steps[1].action,
            Action::Interaction {
                kind: Interaction::PointerDown,
                ..
            }
        ));
        assert!(matches!(script.steps[2].action, Action::ContentChanged));
    }

    #[test]
    fn rejects_bad_duration() {
        let err = serde_json::from_str::<Script>(
            r#"{ "steps": [ { "at": "soon", "type": "content_changed" } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("soon") || err.is_data());
    }

    fn runtime() -> PageRuntime {
        let page = Page::from_layout(PageLayout::new(
            Viewport::new(390.0, 844.0),
            vec![ElementLayout::new("button").class("cta").rect(0.0, 100.0, 200.0, 48.0)],
        ));
        PageRuntime::start(page, &PageflowConfig::default(), Environment::default()).unwrap()
    }

    #[test]
    fn missing_target_is_an_unresolved_target_error() {
        let mut runtime = runtime();
        let err = apply(
            &mut runtime,
            &Action::Click {
                target: ".missing".to_string(),
            },
        )
        .unwrap_err();

        match err.downcast_ref::<CoreError>() {
            Some(CoreError::UnresolvedTarget(target)) => assert_eq!(target, ".missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn existing_target_is_dispatched() {
        let mut runtime = runtime();
        apply(
            &mut runtime,
            &Action::Click {
                target: ".cta".to_string(),
            },
        )
        .unwrap();
    }

    #[test]
    fn region_scroll_moves_the_carousel() {
        let page = Page::from_layout(PageLayout::new(
            Viewport::new(390.0, 844.0),
            vec![
                ElementLayout::new("div")
                    .class("cases")
                    .attr("data-auto-scroll", "")
                    .rect(0.0, 100.0, 390.0, 200.0)
                    .scroll_extent(900.0, 390.0),
            ],
        ));
        let mut runtime =
            PageRuntime::start(page, &PageflowConfig::default(), Environment::reduced_motion())
                .unwrap();
        let script: Script = serde_json::from_str(
            r#"{ "steps": [ { "at": "0ms", "type": "region_scroll", "target": ".cases", "x": 120 } ] }"#,
        )
        .unwrap();

        apply(&mut runtime, &script.steps[0].action).unwrap();
        let carousel = runtime
            .page()
            .query_first(&Selector::parse(".cases").unwrap())
            .unwrap();
        assert_eq!(runtime.page().scroll_left(carousel), 120.0);
    }
}
