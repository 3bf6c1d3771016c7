//! # Lifecycle Stage
//!
//! The product lifecycle state machine. Stages advance strictly forward,
//! one step at a time, and `Distribution` is terminal:
//!
//! ```text
//! NotStarted -> RawMaterial -> Production -> Packaging -> Distribution
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product's position in the lifecycle state machine.
///
/// `NotStarted` is the default for ids that were never created; a product
/// that exists is always `RawMaterial` or later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Stage {
    /// No product exists under this id.
    #[default]
    NotStarted,
    /// Created and available for consumption by production batches.
    RawMaterial,
    /// Inputs consumed; an owning batch records the consumption.
    Production,
    /// Certified and packaged; quantities are frozen.
    Packaging,
    /// Terminal stage: shipped with distribution details.
    Distribution,
}

impl Stage {
    /// The only legal successor stage, or `None` for the terminal stage.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::RawMaterial),
            Self::RawMaterial => Some(Self::Production),
            Self::Production => Some(Self::Packaging),
            Self::Packaging => Some(Self::Distribution),
            Self::Distribution => None,
        }
    }

    /// Returns true if `target` is exactly one step forward from `self`.
    ///
    /// Backward moves and stage-skipping are never legal.
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns true if this stage is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Distribution)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "NotStarted",
            Self::RawMaterial => "RawMaterial",
            Self::Production => "Production",
            Self::Packaging => "Packaging",
            Self::Distribution => "Distribution",
        };
        f.write_str(name)
    }
}
