//! Lifecycle states

use core::fmt;

use serde::{Deserialize, Serialize};

/// Where a coordinator is in its shutdown lifecycle
///
/// Transitions only move forward: `Active` to `ShuttingDown` to `Shutdown`,
/// or straight from `Active` to `Shutdown` when nothing is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownState {
    /// Accepting new operations
    #[default]
    Active,
    /// Rejecting new operations, waiting for in-flight ones to finish
    ShuttingDown,
    /// Rejecting new operations with nothing left in flight
    Shutdown,
}

impl ShutdownState {
    /// Whether new operations are accepted
    pub fn is_active(self) -> bool {
        self == ShutdownState::Active
    }

    /// Stable lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            ShutdownState::Active => "active",
            ShutdownState::ShuttingDown => "shutting_down",
            ShutdownState::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for ShutdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
