//! Analysis payload contract shared by templates and the schema check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The twelve Officer-Like Quality dimensions every analysis must rate.
pub const OLQ_RATING_KEYS: [&str; 12] = [
    "effective_intelligence",
    "reasoning_ability",
    "organising_ability",
    "power_of_expression",
    "social_adaptability",
    "cooperation",
    "sense_of_responsibility",
    "initiative",
    "self_confidence",
    "speed_of_decision",
    "ability_to_influence_the_group",
    "determination",
];

pub const MIN_OLQ_RATING: f64 = 1.0;
pub const MAX_OLQ_RATING: f64 = 5.0;

/// Analysis prompt/output contract revision.
///
/// `V1` asks an encouraging coach for a `selection_potential_analysis`;
/// `V2` asks a skeptical assessor for a `final_verdict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVersion {
    V1,
    #[default]
    V2,
}

impl TemplateVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateVersion::V1 => "v1",
            TemplateVersion::V2 => "v2",
        }
    }

    /// Key of the closing free-text judgement in this version's output.
    pub fn closing_key(&self) -> &'static str {
        match self {
            TemplateVersion::V1 => "selection_potential_analysis",
            TemplateVersion::V2 => "final_verdict",
        }
    }

    /// Every top-level key the model must return.
    pub fn output_keys(&self) -> [&'static str; 5] {
        [
            "overall_summary",
            "positive_traits",
            "areas_for_improvement",
            "olq_rating",
            self.closing_key(),
        ]
    }
}

impl fmt::Display for TemplateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" => Ok(TemplateVersion::V1),
            "v2" | "2" => Ok(TemplateVersion::V2),
            _ => Err(format!("Invalid analysis template version: {}", s)),
        }
    }
}
