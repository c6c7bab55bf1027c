use serde::Serialize;
use serde_json::Value;

use super::experiment::VariantLabel;
use super::ids::QuestionId;
use super::session::{Completion, HintFeedbackTarget};

pub const HINT_FEEDBACK_EVENT: &str = "hint-feedback";
pub const PROBLEM_COMPLETED_EVENT: &str = "problem-completed";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintFeedback {
    pub question_id: QuestionId,
    pub variant: VariantLabel,
    pub hint_index: usize,
    pub helpful: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemCompleted {
    pub question_id: QuestionId,
    pub variant: VariantLabel,
    pub solved: bool,
    pub hints_used_count: usize,
}

/// Named engagement event sent to the reporter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngagementEvent {
    HintFeedback(HintFeedback),
    ProblemCompleted(ProblemCompleted),
}

impl EngagementEvent {
    #[must_use]
    pub fn hint_feedback(target: HintFeedbackTarget, variant: VariantLabel, helpful: bool) -> Self {
        Self::HintFeedback(HintFeedback {
            question_id: target.question_id,
            variant,
            hint_index: target.hint_index,
            helpful,
        })
    }

    #[must_use]
    pub fn problem_completed(completion: &Completion, variant: VariantLabel) -> Self {
        Self::ProblemCompleted(ProblemCompleted {
            question_id: completion.question_id,
            variant,
            solved: completion.solved,
            hints_used_count: completion.hints_used_count,
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EngagementEvent::HintFeedback(_) => HINT_FEEDBACK_EVENT,
            EngagementEvent::ProblemCompleted(_) => PROBLEM_COMPLETED_EVENT,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        match self {
            EngagementEvent::HintFeedback(e) => e.question_id,
            EngagementEvent::ProblemCompleted(e) => e.question_id,
        }
    }

    /// Key-value payload in the reporter's wire shape.
    #[must_use]
    pub fn payload(&self) -> Value {
        let payload = match self {
            EngagementEvent::HintFeedback(e) => serde_json::to_value(e),
            EngagementEvent::ProblemCompleted(e) => serde_json::to_value(e),
        };
        // Plain structs of strings, numbers and bools always serialize.
        payload.unwrap_or(Value::Null)
    }
}
