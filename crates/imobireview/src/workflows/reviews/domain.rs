use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Participant kinds in a rental relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tenant,
    Landlord,
    Agency,
}

impl Role {
    pub const fn ordered() -> [Self; 3] {
        [Self::Tenant, Self::Landlord, Self::Agency]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tenant => "Tenant",
            Self::Landlord => "Landlord",
            Self::Agency => "Agency",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected tenant, landlord, or agency)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tenant" => Ok(Self::Tenant),
            "landlord" => Ok(Self::Landlord),
            "agency" => Ok(Self::Agency),
            _ => Err(UnknownRole(raw.to_string())),
        }
    }
}

/// A single star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarScore(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("star score must be between 1 and 5, found {0}")]
pub struct ScoreOutOfRange(pub u8);

impl StarScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ScoreOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// All five positions in display order.
    pub fn positions() -> impl Iterator<Item = StarScore> {
        (Self::MIN..=Self::MAX).map(StarScore)
    }
}

impl TryFrom<u8> for StarScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StarScore> for u8 {
    fn from(score: StarScore) -> Self {
        score.0
    }
}

impl fmt::Display for StarScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text tax identifier (CPF/CNPJ) of the party being reviewed.
///
/// No format validation is applied; the value is only trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevieweeIdentifier(pub String);

impl RevieweeIdentifier {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevieweeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for published reviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub String);

/// Contract window declared by the reviewer. Ordering of the two dates is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One scored dimension of a published review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: String,
    pub score: StarScore,
    pub condominium: bool,
}

/// Review record produced when the submission wizard completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedReview {
    pub id: ReviewId,
    pub reviewee: RevieweeIdentifier,
    pub reviewer_role: Role,
    pub reviewee_role: Role,
    pub contract: ContractPeriod,
    pub criteria: Vec<CriterionScore>,
    pub overall_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condo_score: Option<f32>,
    pub title: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    pub is_anonymous: bool,
    pub submitted_at: DateTime<Utc>,
}

impl SubmittedReview {
    /// Name shown on the public feed.
    pub fn author_label(&self) -> String {
        if self.is_anonymous {
            "Anonymous".to_string()
        } else {
            format!("Verified {}", self.reviewer_role.label())
        }
    }
}
