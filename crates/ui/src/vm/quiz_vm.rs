use quiz_core::model::{HintRequest, QuizError, SessionStats, SubmitOutcome};
use services::QuizController;

use super::markup::sanitize_html;

pub const SOLUTION_UNAVAILABLE: &str = "Solution unavailable.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Submit(String),
    RevealHint,
    HintFeedback { helpful: bool },
    NextQuestion,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    Correct,
    Hint,
    OutOfHints,
    Warning,
}

impl NoticeTone {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            NoticeTone::Correct => "feedback correct",
            NoticeTone::Hint => "feedback hint",
            NoticeTone::OutOfHints => "feedback out-of-hints",
            NoticeTone::Warning => "feedback warning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub tone: NoticeTone,
    pub title: &'static str,
    pub body: &'static str,
}

impl Notice {
    const BLANK: Self = Self {
        tone: NoticeTone::Warning,
        title: "Enter an answer",
        body: "Type your answer before submitting.",
    };
    const CORRECT: Self = Self {
        tone: NoticeTone::Correct,
        title: "Correct!",
        body: "Well done! Your answer is correct.",
    };
    const FIRST_HINT: Self = Self {
        tone: NoticeTone::Hint,
        title: "Not quite right",
        body: "Here are the hints to help you:",
    };
    const MORE_HINTS: Self = Self {
        tone: NoticeTone::Hint,
        title: "Not quite right",
        body: "Here are all the hints so far:",
    };
    const REQUESTED_HINT: Self = Self {
        tone: NoticeTone::Hint,
        title: "Hint",
        body: "Here are all the hints so far:",
    };
    const OUT_OF_HINTS: Self = Self {
        tone: NoticeTone::OutOfHints,
        title: "Out of hints",
        body: "No more hints available. Here's the solution:",
    };
    const NO_MORE_HINTS: Self = Self {
        tone: NoticeTone::Warning,
        title: "No more hints",
        body: "No more hints available. Try to solve the problem!",
    };
}

/// Presentation state for the quiz screen, layered over the controller.
pub struct QuizVm {
    controller: QuizController,
    notice: Option<Notice>,
    feedback_prompt: bool,
    feedback_sent: bool,
    solution_visible: bool,
    revision: u64,
}

impl QuizVm {
    /// Wrap the controller and present the first question.
    #[must_use]
    pub fn start(mut controller: QuizController) -> Self {
        controller.load_question(0);
        Self {
            controller,
            notice: None,
            feedback_prompt: false,
            feedback_sent: false,
            solution_visible: false,
            revision: 0,
        }
    }

    pub fn dispatch(&mut self, intent: QuizIntent) {
        match intent {
            QuizIntent::Submit(answer) => self.submit(&answer),
            QuizIntent::RevealHint => self.reveal_hint(),
            QuizIntent::HintFeedback { helpful } => {
                if self.controller.record_hint_feedback(helpful).is_ok() {
                    self.feedback_prompt = false;
                    self.feedback_sent = true;
                }
            }
            QuizIntent::NextQuestion => {
                if self.can_advance() {
                    self.controller.advance_to_next_question();
                    self.on_question_changed();
                }
            }
            QuizIntent::Reset => {
                self.controller.reset_session();
                self.on_question_changed();
            }
        }
        self.revision = self.revision.wrapping_add(1);
    }

    fn submit(&mut self, answer: &str) {
        match self.controller.submit_answer(answer) {
            Ok(SubmitOutcome::Correct { .. }) => {
                self.notice = Some(Notice::CORRECT);
                self.solution_visible = self
                    .controller
                    .session()
                    .current_question()
                    .is_some_and(|q| q.solution().is_some());
            }
            Ok(SubmitOutcome::HintRevealed { number, .. }) => {
                self.notice = Some(if number == 1 {
                    Notice::FIRST_HINT
                } else {
                    Notice::MORE_HINTS
                });
                self.show_feedback_prompt_again();
            }
            Ok(SubmitOutcome::SolutionRevealed { .. }) => {
                self.notice = Some(Notice::OUT_OF_HINTS);
                self.solution_visible = true;
                self.feedback_prompt = false;
            }
            Err(QuizError::BlankAnswer) => self.notice = Some(Notice::BLANK),
            // Resolved or missing questions have their inputs disabled.
            Err(_) => {}
        }
    }

    fn reveal_hint(&mut self) {
        match self.controller.request_hint() {
            Ok(HintRequest::Revealed { .. }) => {
                self.notice = Some(Notice::REQUESTED_HINT);
                self.show_feedback_prompt_again();
            }
            Ok(HintRequest::Exhausted) => self.notice = Some(Notice::NO_MORE_HINTS),
            Err(_) => {}
        }
    }

    fn show_feedback_prompt_again(&mut self) {
        self.feedback_prompt = true;
        self.feedback_sent = false;
    }

    fn on_question_changed(&mut self) {
        self.notice = None;
        self.feedback_prompt = false;
        self.feedback_sent = false;
        self.solution_visible = false;
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.controller.session().is_completed()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.controller.session().question_count()
    }

    /// "Problem i of n" while a question is showing.
    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        let session = self.controller.session();
        session.current_question().map(|_| {
            format!(
                "Problem {} of {}",
                session.current_index() + 1,
                session.question_count()
            )
        })
    }

    #[must_use]
    pub fn prompt_html(&self) -> Option<String> {
        self.controller
            .session()
            .current_question()
            .map(|q| sanitize_html(q.prompt()))
    }

    /// Every hint revealed so far for the current question.
    #[must_use]
    pub fn hints_html(&self) -> Vec<String> {
        self.controller
            .session()
            .hints_shown()
            .iter()
            .map(|hint| sanitize_html(hint))
            .collect()
    }

    #[must_use]
    pub fn solution_html(&self) -> Option<String> {
        if !self.solution_visible {
            return None;
        }
        let question = self.controller.session().current_question()?;
        Some(sanitize_html(
            question.solution().unwrap_or(SOLUTION_UNAVAILABLE),
        ))
    }

    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    #[must_use]
    pub fn show_feedback_prompt(&self) -> bool {
        self.feedback_prompt
    }

    #[must_use]
    pub fn feedback_sent(&self) -> bool {
        self.feedback_sent
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.controller
            .session()
            .phase()
            .is_some_and(|phase| !phase.is_resolved())
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.controller
            .session()
            .phase()
            .is_some_and(|phase| phase.is_resolved())
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        self.controller.session().stats()
    }

    /// Bumped on every intent; the view re-typesets math when it changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
