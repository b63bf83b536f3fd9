use std::fmt;

use serde::{Deserialize, Serialize};

/// Wizard steps in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStep {
    Target,
    Period,
    Scoring,
    Narrative,
    Summary,
}

impl ReviewStep {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Target,
            Self::Period,
            Self::Scoring,
            Self::Narrative,
            Self::Summary,
        ]
    }

    /// 1-based position shown in the progress indicator.
    pub const fn number(self) -> u8 {
        match self {
            Self::Target => 1,
            Self::Period => 2,
            Self::Scoring => 3,
            Self::Narrative => 4,
            Self::Summary => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Target => "Who are we reviewing?",
            Self::Period => "Contract period",
            Self::Scoring => "Criteria scores",
            Self::Narrative => "Your story",
            Self::Summary => "Review summary",
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Target => Some(Self::Period),
            Self::Period => Some(Self::Scoring),
            Self::Scoring => Some(Self::Narrative),
            Self::Narrative => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Target => None,
            Self::Period => Some(Self::Target),
            Self::Scoring => Some(Self::Period),
            Self::Narrative => Some(Self::Scoring),
            Self::Summary => Some(Self::Narrative),
        }
    }
}

impl fmt::Display for ReviewStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}
