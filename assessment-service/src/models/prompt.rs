//! Test prompts: WAT words and SRT situations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which psychological test a prompt or session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    /// Word Association Test.
    #[serde(rename = "WAT")]
    Wat,
    /// Situation Reaction Test.
    #[serde(rename = "SRT")]
    Srt,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Wat => "WAT",
            TestType::Srt => "SRT",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored prompt, independent of which collection it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub category: Option<String>,
}

impl Prompt {
    pub fn new(text: impl Into<String>, category: Option<String>) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Row shape of the `wat_words` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatWord {
    pub word_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Row shape of the `srt_situations` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrtSituation {
    pub situation_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_olq_theme: Option<String>,
}

impl From<WatWord> for Prompt {
    fn from(word: WatWord) -> Self {
        Prompt::new(word.word_text, word.category)
    }
}

impl From<SrtSituation> for Prompt {
    fn from(situation: SrtSituation) -> Self {
        Prompt::new(situation.situation_text, situation.primary_olq_theme)
    }
}
