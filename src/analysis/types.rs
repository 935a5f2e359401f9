use serde::{Deserialize, Serialize};

/// One difficult word surfaced by vocabulary analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub word: String,
    pub definition: String,
    pub usage_example: String,
}

/// A multiple-choice comprehension question. `options` always holds exactly
/// four entries and `correct_answer_index` is a valid index into it; both
/// invariants are enforced where gateway payloads are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

pub const QUESTION_OPTION_COUNT: usize = 4;

impl Question {
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == QUESTION_OPTION_COUNT
            && self.correct_answer_index < self.options.len()
    }
}
