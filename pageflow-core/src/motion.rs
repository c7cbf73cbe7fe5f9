//! Platform capabilities and the reduced-motion policy.

use serde::{Deserialize, Serialize};

/// What the host platform reports at startup. Read once; later changes to
/// the user's preference are not observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Environment {
    /// `prefers-reduced-motion: reduce`.
    pub prefers_reduced_motion: bool,
    /// Whether visibility detection is available. Without it every reveal
    /// target is shown immediately.
    pub supports_intersection_observer: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            prefers_reduced_motion: false,
            supports_intersection_observer: true,
        }
    }
}

impl Environment {
    pub fn reduced_motion() -> Self {
        Self {
            prefers_reduced_motion: true,
            ..Self::default()
        }
    }
}

/// Page-wide motion policy, fixed for the lifetime of a runtime and handed
/// to every controller at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionPreference {
    reduced: bool,
}

impl MotionPreference {
    pub const FULL: Self = Self { reduced: false };
    pub const REDUCED: Self = Self { reduced: true };

    pub fn from_environment(env: &Environment) -> Self {
        Self {
            reduced: env.prefers_reduced_motion,
        }
    }

    #[inline]
    pub fn is_reduced(self) -> bool {
        self.reduced
    }

    #[inline]
    pub fn allows_motion(self) -> bool {
        !self.reduced
    }
}
