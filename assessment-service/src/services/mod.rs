pub mod analysis;
pub mod database;
pub mod identity;
pub mod metrics;
pub mod providers;
pub mod provisioner;
pub mod recorder;
pub mod repository;

pub use analysis::{AnalysisError, AnalysisRequester};
pub use database::MongoDb;
pub use identity::{
    HttpIdentityVerifier, Identity, IdentityError, IdentityVerifier, JwtIdentityVerifier,
    StaticIdentityVerifier,
};
pub use self::metrics::{get_metrics, init_metrics};
pub use providers::{GeminiConfig, GeminiTextProvider, MockTextProvider, TextProvider};
pub use provisioner::{TestProvisioner, MAX_TEST_PROMPTS};
pub use recorder::SessionRecorder;
pub use repository::{InMemoryStore, PromptRepository, SessionRepository};
