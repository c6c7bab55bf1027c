mod answer;
mod bank;
mod event;
mod experiment;
mod hints;
mod ids;
mod question;
mod session;

pub use answer::{answers_match, normalize_answer};
pub use bank::{QuestionBank, QuestionBankError};
pub use event::{
    EngagementEvent, HINT_FEEDBACK_EVENT, HintFeedback, PROBLEM_COMPLETED_EVENT, ProblemCompleted,
};
pub use experiment::{
    Arm, ArmLabels, CONTROL_VARIANT, ExperimentAssignment, UserKey, UserKeyError, VariantLabel,
};
pub use hints::select_hints;
pub use ids::{ParseIdError, QuestionId};
pub use question::{HintSource, Question, VariantHints};
pub use session::{
    Completion, HintFeedbackTarget, HintRequest, LoadOutcome, QuestionPhase, QuizError,
    QuizSession, SessionStats, SubmitOutcome,
};
