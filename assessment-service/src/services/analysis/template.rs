//! Analysis prompt templates, keyed by template version and test type.

use crate::models::{ResponseItem, TemplateVersion, TestType, OLQ_RATING_KEYS};

/// Render answered items in the layout the templates expect.
///
/// Unanswered items are left out so the model only judges what was written.
pub fn format_responses(test_type: TestType, responses: &[ResponseItem]) -> String {
    let answered = responses.iter().filter(|item| item.is_answered());

    match test_type {
        TestType::Wat => answered
            .map(|item| format!("- {}: {}", item.prompt(), item.response().trim()))
            .collect::<Vec<_>>()
            .join("\n"),
        TestType::Srt => answered
            .map(|item| {
                format!(
                    "- Situation: {}\n  - Response: {}",
                    item.prompt(),
                    item.response().trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Template for one (version, test type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTemplate {
    pub version: TemplateVersion,
    pub test_type: TestType,
}

impl AnalysisTemplate {
    pub fn new(version: TemplateVersion, test_type: TestType) -> Self {
        Self { version, test_type }
    }

    /// Full instruction text with the candidate's formatted responses embedded.
    pub fn render(&self, formatted_responses: &str) -> String {
        format!(
            "{persona}\n\n\
             **Candidate's Responses:**\n{responses}\n\n\
             **Your Task:**\n{task}\n\n\
             **Output Format:**\n{output}",
            persona = self.persona(),
            responses = formatted_responses,
            task = self.task(),
            output = self.output_contract(),
        )
    }

    fn test_name(&self) -> &'static str {
        match self.test_type {
            TestType::Wat => "Word Association Test (WAT)",
            TestType::Srt => "Situation Reaction Test (SRT)",
        }
    }

    fn persona(&self) -> String {
        match self.version {
            TemplateVersion::V1 => format!(
                "You are an experienced and encouraging defence psychologist coaching a \
                 candidate for an officer selection board. You are reviewing their {} responses.",
                self.test_name()
            ),
            TemplateVersion::V2 => format!(
                "You are a strict, skeptical selection board psychologist. You have seen \
                 thousands of rehearsed answers and you do not give credit that has not been \
                 earned. You are evaluating a candidate's {} responses.",
                self.test_name()
            ),
        }
    }

    fn task(&self) -> &'static str {
        match (self.version, self.test_type) {
            (TemplateVersion::V1, TestType::Wat) => {
                "Identify the thought patterns behind each response. Highlight what the \
                 candidate does well, point out negative or passive associations, and suggest \
                 how to turn them into positive, action-oriented thoughts. Keep the tone \
                 constructive and motivating."
            }
            (TemplateVersion::V1, TestType::Srt) => {
                "Analyze the candidate's reactions. Assess their problem-solving skills, sense \
                 of responsibility, calmness under pressure and social adaptability. The \
                 responses should ideally be practical, optimistic and show officer-like \
                 qualities. Keep the tone constructive and motivating."
            }
            (TemplateVersion::V2, TestType::Wat) => {
                "Judge each response for spontaneity, positivity and practicality. Penalise \
                 clichés, moralising slogans, negative or fearful associations and answers that \
                 merely repeat the word. Rate only what the responses demonstrate; do not \
                 assume qualities that are not shown. Be direct and unsparing."
            }
            (TemplateVersion::V2, TestType::Srt) => {
                "Judge each reaction for practicality, completeness and ownership of the \
                 problem. Penalise unrealistic heroics, passing responsibility to others, \
                 incomplete actions and vague intentions. Rate only what the reactions \
                 demonstrate; do not assume qualities that are not shown. Be direct and \
                 unsparing."
            }
        }
    }

    fn output_contract(&self) -> String {
        let ratings = OLQ_RATING_KEYS
            .iter()
            .map(|key| format!("    \"{}\": <integer 1-5>", key))
            .collect::<Vec<_>>()
            .join(",\n");

        let closing = match self.version {
            TemplateVersion::V1 => {
                "<a short, encouraging assessment of the candidate's selection potential>"
            }
            TemplateVersion::V2 => {
                "<a blunt one-paragraph verdict on whether the candidate is ready>"
            }
        };

        format!(
            "Return ONLY a single valid JSON object, with no commentary, using exactly these keys:\n\
             {{\n  \
             \"overall_summary\": \"<string>\",\n  \
             \"positive_traits\": [\"<string>\", ...],\n  \
             \"areas_for_improvement\": [\"<string>\", ...],\n  \
             \"olq_rating\": {{\n{ratings}\n  }},\n  \
             \"{closing_key}\": \"{closing}\"\n\
             }}\n\
             Every olq_rating value must be an integer from 1 (very weak) to 5 (outstanding).",
            ratings = ratings,
            closing_key = self.version.closing_key(),
            closing = closing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SituationResponse, WordResponse};

    fn wat(word: &str, response: &str) -> ResponseItem {
        WordResponse {
            word: word.to_string(),
            response: response.to_string(),
        }
        .into()
    }

    fn srt(situation: &str, response: &str) -> ResponseItem {
        SituationResponse {
            situation: situation.to_string(),
            response: response.to_string(),
        }
        .into()
    }

    #[test]
    fn wat_lines_skip_unanswered_words() {
        let text = format_responses(
            TestType::Wat,
            &[wat("Fear", "I freeze"), wat("Team", "  "), wat("Duty", "first")],
        );
        assert_eq!(text, "- Fear: I freeze\n- Duty: first");
    }

    #[test]
    fn srt_lines_pair_situation_and_response() {
        let text = format_responses(
            TestType::Srt,
            &[srt("Your friend is injured on a trek", "Give first aid, call for help")],
        );
        assert_eq!(
            text,
            "- Situation: Your friend is injured on a trek\n  - Response: Give first aid, call for help"
        );
    }

    #[test]
    fn rendered_prompt_lists_every_output_key() {
        for version in [TemplateVersion::V1, TemplateVersion::V2] {
            for test_type in [TestType::Wat, TestType::Srt] {
                let prompt = AnalysisTemplate::new(version, test_type).render("- Fear: I freeze");

                assert!(prompt.contains("- Fear: I freeze"));
                for key in version.output_keys() {
                    assert!(prompt.contains(key), "{:?}/{:?} misses {}", version, test_type, key);
                }
                for key in OLQ_RATING_KEYS {
                    assert!(prompt.contains(key));
                }
            }
        }
    }

    #[test]
    fn versions_use_their_own_closing_key() {
        let v1 = AnalysisTemplate::new(TemplateVersion::V1, TestType::Wat).render("");
        let v2 = AnalysisTemplate::new(TemplateVersion::V2, TestType::Wat).render("");

        assert!(v1.contains("selection_potential_analysis"));
        assert!(!v1.contains("final_verdict"));
        assert!(v2.contains("final_verdict"));
        assert!(!v2.contains("selection_potential_analysis"));
    }

    #[test]
    fn persona_follows_version() {
        let v1 = AnalysisTemplate::new(TemplateVersion::V1, TestType::Srt).render("");
        let v2 = AnalysisTemplate::new(TemplateVersion::V2, TestType::Srt).render("");

        assert!(v1.contains("encouraging"));
        assert!(v2.contains("skeptical"));
        assert!(v2.contains("Situation Reaction Test"));
    }
}
