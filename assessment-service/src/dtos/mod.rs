pub mod assessments;

pub use assessments::{
    AnalyzeSessionResponse, NewSrtTestResponse, NewWatTestResponse, SaveSessionResponse,
    SaveSrtSessionRequest, SaveWatSessionRequest, SessionResponse,
};
