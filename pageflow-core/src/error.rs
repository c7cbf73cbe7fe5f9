use thiserror::Error;

use crate::page::{Selector, SelectorError};

/// Failures while wiring a runtime to a page.
///
/// Page data never produces errors once the runtime is running; these only
/// come from configuration that cannot be applied at all.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid selector {selector:?} in {field}: {source}")]
    Selector {
        field: &'static str,
        selector: String,
        #[source]
        source: SelectorError,
    },
    #[error("no element matches {0:?}")]
    UnresolvedTarget(String),
}

impl CoreError {
    /// Parse a configured selector, tagging failures with the config field.
    pub fn selector(field: &'static str, raw: &str) -> Result<Selector, CoreError> {
        Selector::parse(raw).map_err(|source| CoreError::Selector {
            field,
            selector: raw.to_string(),
            source,
        })
    }
}
