use tracing::debug;

use quiz_core::model::{
    EngagementEvent, HintRequest, LoadOutcome, QuestionBank, QuizError, QuizSession,
    SubmitOutcome, VariantLabel,
};

use crate::event_reporter::EventSink;
use crate::experiment_service::AssignmentHandle;

/// Drives a `QuizSession` and turns its outcomes into engagement events.
///
/// The variant label is read from the assignment handle whenever a question
/// loads, so an assignment that arrives mid-session applies from the next
/// question on. Events report the label captured at load, which is the one
/// whose hints are on screen.
pub struct QuizController {
    session: QuizSession,
    assignment: AssignmentHandle,
    events: EventSink,
    shown_variant: VariantLabel,
}

impl QuizController {
    #[must_use]
    pub fn new(bank: QuestionBank, assignment: AssignmentHandle, events: EventSink) -> Self {
        let shown_variant = assignment.variant();
        Self {
            session: QuizSession::new(bank),
            assignment,
            events,
            shown_variant,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Label the current question's hints were selected for.
    #[must_use]
    pub fn variant(&self) -> &VariantLabel {
        &self.shown_variant
    }

    pub fn load_question(&mut self, index: usize) -> LoadOutcome {
        self.shown_variant = self.assignment.variant();
        let outcome = self.session.load_question(index, &self.shown_variant);
        log_load(&outcome, &self.shown_variant);
        outcome
    }

    pub fn advance_to_next_question(&mut self) -> LoadOutcome {
        self.shown_variant = self.assignment.variant();
        let outcome = self.session.advance_to_next_question(&self.shown_variant);
        log_load(&outcome, &self.shown_variant);
        outcome
    }

    pub fn reset_session(&mut self) -> LoadOutcome {
        self.shown_variant = self.assignment.variant();
        let outcome = self.session.reset(&self.shown_variant);
        debug!("session reset");
        log_load(&outcome, &self.shown_variant);
        outcome
    }

    /// # Errors
    ///
    /// Propagates `QuizError` from the session; nothing is emitted on error.
    pub fn submit_answer(&mut self, input: &str) -> Result<SubmitOutcome, QuizError> {
        let outcome = self.session.submit_answer(input)?;
        match &outcome {
            SubmitOutcome::Correct {
                first_try,
                completion,
            } => {
                debug!(question = %completion.question_id, first_try, "answer correct");
                self.events.emit(EngagementEvent::problem_completed(
                    completion,
                    self.shown_variant.clone(),
                ));
            }
            SubmitOutcome::HintRevealed { number, .. } => {
                debug!(hint = number, "answer incorrect, hint revealed");
            }
            SubmitOutcome::SolutionRevealed { completion } => {
                debug!(question = %completion.question_id, "hints exhausted, solution revealed");
                self.events.emit(EngagementEvent::problem_completed(
                    completion,
                    self.shown_variant.clone(),
                ));
            }
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Propagates `QuizError` from the session.
    pub fn request_hint(&mut self) -> Result<HintRequest, QuizError> {
        let outcome = self.session.request_hint()?;
        if let HintRequest::Revealed { number, .. } = &outcome {
            debug!(hint = number, "hint requested");
        }
        Ok(outcome)
    }

    /// Report whether the most recent hint helped. Quiz state is untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuestion` when no question is loaded.
    pub fn record_hint_feedback(&self, helpful: bool) -> Result<(), QuizError> {
        let target = self.session.hint_feedback_target()?;
        self.events
            .emit(EngagementEvent::hint_feedback(
                target,
                self.shown_variant.clone(),
                helpful,
            ));
        Ok(())
    }
}

fn log_load(outcome: &LoadOutcome, variant: &VariantLabel) {
    match outcome {
        LoadOutcome::Loaded { index, total } => {
            debug!(index, total, variant = %variant, "question loaded");
        }
        LoadOutcome::Completed { total } => debug!(total, "question list completed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{
        Arm, ArmLabels, ExperimentAssignment, HintSource, Question, QuestionId, UserKey,
        VariantHints,
    };
    use tokio::sync::mpsc::UnboundedReceiver;

    fn variant_question() -> Question {
        Question::new(QuestionId::new(1), "What is $2^3$?", "8").with_hints(HintSource::Variants(
            vec![
                VariantHints::new("control", vec!["c1".into()]),
                VariantHints::new("chatgpt", vec!["g1".into(), "g2".into()]),
            ],
        ))
    }

    fn controller() -> (QuizController, AssignmentHandle, UnboundedReceiver<EngagementEvent>) {
        let bank = QuestionBank::new(vec![
            variant_question(),
            Question::new(QuestionId::new(2), "What is 3 + 3?", "6"),
        ])
        .unwrap();
        let handle = AssignmentHandle::new();
        let (sink, rx) = EventSink::channel();
        (QuizController::new(bank, handle.clone(), sink), handle, rx)
    }

    #[test]
    fn hints_follow_the_assignment_at_load_time() {
        let (mut controller, handle, _rx) = controller();
        controller.load_question(0);
        assert_eq!(controller.session().active_hints(), ["c1".to_string()]);

        let key = UserKey::parse("k").unwrap();
        assert!(handle.set(ExperimentAssignment::new(key, Arm::B, &ArmLabels::default())));
        assert_eq!(controller.session().active_hints().len(), 1);

        controller.load_question(0);
        assert_eq!(controller.session().active_hints(), ["g1".to_string(), "g2".to_string()]);
    }

    #[test]
    fn events_carry_the_label_whose_hints_were_shown() {
        let (mut controller, handle, mut rx) = controller();
        controller.load_question(0);
        controller.submit_answer("1").unwrap();

        let key = UserKey::parse("k").unwrap();
        assert!(handle.set(ExperimentAssignment::new(key, Arm::B, &ArmLabels::default())));
        assert_eq!(controller.variant(), &VariantLabel::control());

        controller.record_hint_feedback(true).unwrap();
        controller.submit_answer("8").unwrap();

        let EngagementEvent::HintFeedback(feedback) = rx.try_recv().unwrap() else {
            panic!("expected hint-feedback");
        };
        assert_eq!(feedback.variant, VariantLabel::control());
        let EngagementEvent::ProblemCompleted(completed) = rx.try_recv().unwrap() else {
            panic!("expected problem-completed");
        };
        assert_eq!(completed.variant, VariantLabel::control());

        controller.advance_to_next_question();
        assert_eq!(controller.variant().as_str(), "chatgpt");
    }

    #[test]
    fn correct_answer_emits_problem_completed() {
        let (mut controller, _handle, mut rx) = controller();
        controller.load_question(0);

        controller.submit_answer("8").unwrap();

        let EngagementEvent::ProblemCompleted(event) = rx.try_recv().unwrap() else {
            panic!("expected problem-completed");
        };
        assert!(event.solved);
        assert_eq!(event.hints_used_count, 0);
        assert_eq!(event.variant, VariantLabel::control());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn exhausted_hints_emit_unsolved_completion() {
        let (mut controller, _handle, mut rx) = controller();
        controller.load_question(0);

        assert!(matches!(
            controller.submit_answer("1").unwrap(),
            SubmitOutcome::HintRevealed { number: 1, .. }
        ));
        assert!(rx.try_recv().is_err());
        assert!(matches!(
            controller.submit_answer("2").unwrap(),
            SubmitOutcome::SolutionRevealed { .. }
        ));

        let EngagementEvent::ProblemCompleted(event) = rx.try_recv().unwrap() else {
            panic!("expected problem-completed");
        };
        assert!(!event.solved);
        assert_eq!(event.hints_used_count, 1);
    }

    #[test]
    fn blank_answer_emits_nothing() {
        let (mut controller, _handle, mut rx) = controller();
        controller.load_question(0);
        assert_eq!(controller.submit_answer("   "), Err(QuizError::BlankAnswer));
        assert!(rx.try_recv().is_err());
        assert!(controller.session().is_first_attempt());
    }

    #[test]
    fn hint_feedback_reports_cursor_without_mutation() {
        let (mut controller, _handle, mut rx) = controller();
        controller.load_question(0);
        controller.request_hint().unwrap();

        controller.record_hint_feedback(false).unwrap();

        let EngagementEvent::HintFeedback(event) = rx.try_recv().unwrap() else {
            panic!("expected hint-feedback");
        };
        assert_eq!(event.question_id, QuestionId::new(1));
        assert_eq!(event.hint_index, 1);
        assert!(!event.helpful);
        assert_eq!(controller.session().hint_cursor(), 1);
        assert_eq!(controller.request_hint().unwrap(), HintRequest::Exhausted);
    }

    #[test]
    fn advancing_past_the_end_completes_and_reset_restarts() {
        let (mut controller, _handle, _rx) = controller();
        controller.load_question(0);
        controller.submit_answer("8").unwrap();
        assert_eq!(
            controller.advance_to_next_question(),
            LoadOutcome::Loaded { index: 1, total: 2 }
        );
        controller.submit_answer("6").unwrap();
        assert_eq!(
            controller.advance_to_next_question(),
            LoadOutcome::Completed { total: 2 }
        );
        assert_eq!(controller.session().stats().correct_first_try, 2);

        assert_eq!(
            controller.reset_session(),
            LoadOutcome::Loaded { index: 0, total: 2 }
        );
        assert_eq!(controller.session().stats().total_questions, 0);
    }
}
