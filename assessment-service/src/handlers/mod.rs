pub mod analysis;
pub mod health;
pub mod provision;
pub mod sessions;

pub use analysis::analyze_session;
pub use health::{health_check, metrics_endpoint, readiness_check, root};
pub use provision::{new_srt_test, new_wat_test};
pub use sessions::{save_srt_session, save_wat_session};
