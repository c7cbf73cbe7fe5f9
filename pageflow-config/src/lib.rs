//! Shared configuration library for pageflow.
//!
//! This crate owns the tunables of the page motion engine (reveal stagger and
//! visibility threshold, auto-scroll speed and idle delay, parallax range and
//! targets, accordion transition timing) together with the page collaborators
//! (navigation, header, outbound links). Every section deserializes with
//! defaults, so a partial TOML or JSON document only overrides what it names.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::{
    AccordionConfig, AutoScrollConfig, FormTemplate, HeaderConfig,
    InterestTemplate, NavigationConfig, OutboundConfig, PageflowConfig,
    ParallaxConfig, ParallaxTarget, RevealConfig,
};
pub use validation::{
    ConfigGuardRailError, ConfigWarning, ConfigWarnings, apply_guard_rails,
};
