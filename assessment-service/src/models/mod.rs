//! Domain models for the assessment service.

pub mod analysis;
pub mod prompt;
pub mod session;

pub use analysis::{TemplateVersion, MAX_OLQ_RATING, MIN_OLQ_RATING, OLQ_RATING_KEYS};
pub use prompt::{Prompt, SrtSituation, TestType, WatWord};
pub use session::{ResponseItem, SituationResponse, TestSession, WordResponse};
