use std::collections::HashSet;

use thiserror::Error;

use super::models::{PageflowConfig, ParallaxConfig, RevealConfig};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigGuardRailError {
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("reveal threshold must be within [0, 1], got {0}")]
    RevealThreshold(f64),
    #[error("reveal root margin must be within [-1, 1], got {0}")]
    RootMargin(f64),
    #[error("parallax strength for '{selector}' must be in (0, 1], got {strength}")]
    ParallaxStrength { selector: String, strength: f64 },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &PageflowConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    validate_reveal(&config.reveal, &mut warnings)?;
    validate_parallax(&config.parallax, &mut warnings)?;

    positive("auto_scroll.speed", config.auto_scroll.speed)?;
    if config.auto_scroll.resume_delay_ms == 0 {
        warnings.push_with_hint(
            "auto_scroll.resume_delay_ms is 0; carousels resume on the next frame after every interaction",
            "Use a delay of at least a few hundred milliseconds so users can read a paused carousel",
        );
    }

    if config.accordion.transition_ms == 0 {
        warnings.push(
            "accordion.transition_ms is 0; panels open and close without animation",
        );
    }

    if config.header.scrolled_threshold < 0.0 {
        warnings.push(
            "header.scrolled_threshold is negative; the header is always marked as scrolled",
        );
    }

    if config.outbound.phone.trim().is_empty() {
        warnings.push_with_hint(
            "outbound.phone is empty; generated chat links have no destination",
            "Set outbound.phone to the international number without '+'",
        );
    }

    Ok(warnings)
}

fn validate_reveal(
    reveal: &RevealConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if !(0.0..=1.0).contains(&reveal.threshold) {
        return Err(ConfigGuardRailError::RevealThreshold(reveal.threshold));
    }
    if !(-1.0..=1.0).contains(&reveal.root_margin_bottom) {
        return Err(ConfigGuardRailError::RootMargin(reveal.root_margin_bottom));
    }
    if reveal.selectors.is_empty() {
        warnings.push("reveal.selectors is empty; no entrance animations will run");
    }
    if reveal.max_delay_ms < reveal.stagger_step_ms {
        warnings.push_with_hint(
            "reveal.max_delay_ms is below reveal.stagger_step_ms; only the first item of a group is staggered",
            "Raise max_delay_ms to a multiple of stagger_step_ms",
        );
    }
    Ok(())
}

fn validate_parallax(
    parallax: &ParallaxConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    positive("parallax.range", parallax.range)?;

    let mut seen = HashSet::new();
    for target in &parallax.targets {
        if !(target.strength > 0.0 && target.strength <= 1.0) {
            return Err(ConfigGuardRailError::ParallaxStrength {
                selector: target.selector.clone(),
                strength: target.strength,
            });
        }
        if !seen.insert(target.selector.as_str()) {
            warnings.push(format!(
                "parallax target '{}' is listed more than once; only the first strength applies",
                target.selector
            ));
        }
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigGuardRailError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigGuardRailError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParallaxTarget;

    #[test]
    fn defaults_pass_without_warnings() {
        let warnings = apply_guard_rails(&PageflowConfig::default())
            .expect("defaults are valid");
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn rejects_out_of_range_strength() {
        let mut config = PageflowConfig::default();
        config.parallax.targets.push(ParallaxTarget::new(".bg", 1.5));
        let err = apply_guard_rails(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigGuardRailError::ParallaxStrength {
                selector: ".bg".into(),
                strength: 1.5
            }
        );
    }

    #[test]
    fn rejects_zero_strength() {
        let mut config = PageflowConfig::default();
        config.parallax.targets = vec![ParallaxTarget::new(".bg", 0.0)];
        assert!(apply_guard_rails(&config).is_err());
    }

    #[test]
    fn rejects_non_positive_speed() {
        let mut config = PageflowConfig::default();
        config.auto_scroll.speed = 0.0;
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::NonPositive {
                field: "auto_scroll.speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_threshold_above_one() {
        let mut config = PageflowConfig::default();
        config.reveal.threshold = 1.2;
        assert_eq!(
            apply_guard_rails(&config).unwrap_err(),
            ConfigGuardRailError::RevealThreshold(1.2)
        );
    }

    #[test]
    fn warns_on_duplicate_parallax_selector() {
        let mut config = PageflowConfig::default();
        config.parallax.targets.push(ParallaxTarget::new(".hero-bg", 0.2));
        let warnings = apply_guard_rails(&config).expect("still valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].message.contains(".hero-bg"));
    }

    #[test]
    fn warns_on_instant_accordion_and_zero_resume() {
        let mut config = PageflowConfig::default();
        config.accordion.transition_ms = 0;
        config.auto_scroll.resume_delay_ms = 0;
        let warnings = apply_guard_rails(&config).expect("still valid");
        assert_eq!(warnings.len(), 2);
        assert!(warnings.items.iter().any(|w| w.hint.is_some()));
    }
}
