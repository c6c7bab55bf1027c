use thiserror::Error;

use super::answer::answers_match;
use super::bank::QuestionBank;
use super::experiment::VariantLabel;
use super::hints::select_hints;
use super::ids::QuestionId;
use super::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no question is currently loaded")]
    NoActiveQuestion,

    #[error("the current question has already been resolved")]
    QuestionResolved,

    #[error("answer must not be blank")]
    BlankAnswer,
}

/// Where the current question is in its attempt cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionPhase {
    AwaitingFirstAnswer,
    HintCycle,
    Solved,
    SolutionRevealed,
}

impl QuestionPhase {
    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, QuestionPhase::Solved | QuestionPhase::SolutionRevealed)
    }
}

/// Aggregate counters for the whole session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_questions: u32,
    pub correct_first_try: u32,
    pub hints_used: u32,
    pub final_hint_before_solve: Option<String>,
}

/// Facts about a question that just reached a terminal phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub question_id: QuestionId,
    pub solved: bool,
    pub hints_used_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { index: usize, total: usize },
    Completed { total: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct {
        first_try: bool,
        completion: Completion,
    },
    /// `number` is 1-based.
    HintRevealed { number: usize, hint: String },
    SolutionRevealed { completion: Completion },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintRequest {
    Revealed { number: usize, hint: String },
    Exhausted,
}

/// Payload for a hint-helpfulness report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintFeedbackTarget {
    pub question_id: QuestionId,
    pub hint_index: usize,
}

#[derive(Debug, Clone)]
struct Attempt {
    active_hints: Vec<String>,
    hint_cursor: usize,
    is_first_attempt: bool,
    hints_shown: Vec<String>,
    phase: QuestionPhase,
}

impl Attempt {
    fn new(active_hints: Vec<String>) -> Self {
        Self {
            active_hints,
            hint_cursor: 0,
            is_first_attempt: true,
            hints_shown: Vec::new(),
            phase: QuestionPhase::AwaitingFirstAnswer,
        }
    }

    fn has_more_hints(&self) -> bool {
        self.hint_cursor < self.active_hints.len()
    }

    /// Caller checks `has_more_hints` first.
    fn reveal_next(&mut self) -> (usize, String) {
        let hint = self.active_hints[self.hint_cursor].clone();
        self.hints_shown.push(hint.clone());
        self.hint_cursor += 1;
        self.is_first_attempt = false;
        self.phase = QuestionPhase::HintCycle;
        (self.hint_cursor, hint)
    }
}

/// Quiz progression state for one run through a question bank.
///
/// Transitions are synchronous and side-effect free; callers turn the
/// returned outcomes into events and rendering.
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: QuestionBank,
    current_index: usize,
    attempt: Option<Attempt>,
    stats: SessionStats,
}

impl QuizSession {
    /// A session positioned before its first question. Call `load_question`
    /// to present something.
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            current_index: 0,
            attempt: None,
            stats: SessionStats::default(),
        }
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.attempt.as_ref()?;
        self.bank.get(self.current_index)
    }

    #[must_use]
    pub fn phase(&self) -> Option<QuestionPhase> {
        self.attempt.as_ref().map(|a| a.phase)
    }

    /// True once the index has run past the last question.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.current_index >= self.bank.len()
    }

    #[must_use]
    pub fn active_hints(&self) -> &[String] {
        self.attempt
            .as_ref()
            .map_or(&[][..], |a| a.active_hints.as_slice())
    }

    #[must_use]
    pub fn hint_cursor(&self) -> usize {
        self.attempt.as_ref().map_or(0, |a| a.hint_cursor)
    }

    #[must_use]
    pub fn hints_shown(&self) -> &[String] {
        self.attempt
            .as_ref()
            .map_or(&[][..], |a| a.hints_shown.as_slice())
    }

    #[must_use]
    pub fn is_first_attempt(&self) -> bool {
        self.attempt.as_ref().is_some_and(|a| a.is_first_attempt)
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Present the question at `index`, resolving its hints for `variant`.
    ///
    /// An index past the end moves the session into the completed state.
    pub fn load_question(&mut self, index: usize, variant: &VariantLabel) -> LoadOutcome {
        self.current_index = index;
        let total = self.bank.len();
        let Some(question) = self.bank.get(index) else {
            self.attempt = None;
            return LoadOutcome::Completed { total };
        };

        self.attempt = Some(Attempt::new(select_hints(question, variant)));
        LoadOutcome::Loaded { index, total }
    }

    pub fn advance_to_next_question(&mut self, variant: &VariantLabel) -> LoadOutcome {
        let next = self.current_index.saturating_add(1);
        self.load_question(next, variant)
    }

    pub fn reset(&mut self, variant: &VariantLabel) -> LoadOutcome {
        self.stats = SessionStats::default();
        self.load_question(0, variant)
    }

    /// Evaluate a submitted answer against the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::BlankAnswer` for whitespace-only input,
    /// `QuizError::NoActiveQuestion` when nothing is loaded and
    /// `QuizError::QuestionResolved` once the question is solved or revealed.
    /// No state changes on error.
    pub fn submit_answer(&mut self, input: &str) -> Result<SubmitOutcome, QuizError> {
        if input.trim().is_empty() {
            return Err(QuizError::BlankAnswer);
        }
        let question_id = self.open_question()?;
        let expected = self
            .bank
            .get(self.current_index)
            .map(|q| q.answer().to_string())
            .ok_or(QuizError::NoActiveQuestion)?;
        let attempt = self.attempt.as_mut().ok_or(QuizError::NoActiveQuestion)?;

        if answers_match(input, &expected) {
            let first_try = attempt.is_first_attempt;
            attempt.phase = QuestionPhase::Solved;
            if first_try {
                self.stats.correct_first_try += 1;
            }
            let completion = self.record_completion(question_id, true);
            return Ok(SubmitOutcome::Correct {
                first_try,
                completion,
            });
        }

        attempt.is_first_attempt = false;
        if attempt.has_more_hints() {
            let (number, hint) = attempt.reveal_next();
            return Ok(SubmitOutcome::HintRevealed { number, hint });
        }

        attempt.phase = QuestionPhase::SolutionRevealed;
        let completion = self.record_completion(question_id, false);
        Ok(SubmitOutcome::SolutionRevealed { completion })
    }

    /// Reveal the next hint outside of an answer submission.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuestion` or `QuizError::QuestionResolved`.
    pub fn request_hint(&mut self) -> Result<HintRequest, QuizError> {
        self.open_question()?;
        let attempt = self.attempt.as_mut().ok_or(QuizError::NoActiveQuestion)?;
        if !attempt.has_more_hints() {
            return Ok(HintRequest::Exhausted);
        }
        let (number, hint) = attempt.reveal_next();
        Ok(HintRequest::Revealed { number, hint })
    }

    /// Identify what a helpfulness report refers to. Does not mutate state.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuestion` when no question is loaded.
    pub fn hint_feedback_target(&self) -> Result<HintFeedbackTarget, QuizError> {
        let question = self.current_question().ok_or(QuizError::NoActiveQuestion)?;
        Ok(HintFeedbackTarget {
            question_id: question.id(),
            hint_index: self.hint_cursor(),
        })
    }

    fn open_question(&self) -> Result<QuestionId, QuizError> {
        let attempt = self.attempt.as_ref().ok_or(QuizError::NoActiveQuestion)?;
        if attempt.phase.is_resolved() {
            return Err(QuizError::QuestionResolved);
        }
        self.current_question()
            .map(Question::id)
            .ok_or(QuizError::NoActiveQuestion)
    }

    fn record_completion(&mut self, question_id: QuestionId, solved: bool) -> Completion {
        let shown = self.hints_shown();
        let hints_used_count = shown.len();
        let last = shown.last().cloned();

        self.stats.total_questions += 1;
        if let Some(last) = last {
            let used = u32::try_from(hints_used_count).unwrap_or(u32::MAX);
            self.stats.hints_used = self.stats.hints_used.saturating_add(used);
            self.stats.final_hint_before_solve = Some(last);
        }

        Completion {
            question_id,
            solved,
            hints_used_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HintSource, VariantHints};

    fn hints(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            Question::new(QuestionId::new(1), "What is 2 + 2?", "4")
                .with_solution("2 + 2 = 4")
                .with_hints(HintSource::Flat(hints(&["h1", "h2", "h3"]))),
            Question::new(QuestionId::new(2), "Expand $(x+1)^2$", "x^2 + 2x + 1").with_hints(
                HintSource::Variants(vec![
                    VariantHints::new("claude", hints(&["c1"])),
                    VariantHints::new("chatgpt", hints(&["g1", "g2"])),
                ]),
            ),
            Question::new(QuestionId::new(3), "No hints here", "0"),
        ])
        .unwrap()
    }

    fn started() -> QuizSession {
        let mut session = QuizSession::new(bank());
        session.load_question(0, &VariantLabel::control());
        session
    }

    #[test]
    fn exact_answer_on_first_try() {
        let mut session = started();
        let outcome = session.submit_answer(" 4 ").unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Correct {
                first_try: true,
                completion: Completion {
                    question_id: QuestionId::new(1),
                    solved: true,
                    hints_used_count: 0,
                },
            }
        );
        assert_eq!(session.stats().correct_first_try, 1);
        assert_eq!(session.stats().total_questions, 1);
        assert_eq!(session.stats().hints_used, 0);
        assert_eq!(session.stats().final_hint_before_solve, None);
        assert_eq!(session.phase(), Some(QuestionPhase::Solved));
        assert!(session.hints_shown().is_empty());
    }

    #[test]
    fn wrong_answers_then_correct_consume_exactly_n_hints() {
        let mut session = started();
        for n in 1..=2 {
            let outcome = session.submit_answer("5").unwrap();
            assert_eq!(
                outcome,
                SubmitOutcome::HintRevealed {
                    number: n,
                    hint: format!("h{n}"),
                }
            );
        }
        assert_eq!(session.phase(), Some(QuestionPhase::HintCycle));
        let outcome = session.submit_answer("4").unwrap();

        assert!(matches!(outcome, SubmitOutcome::Correct { first_try: false, .. }));
        assert_eq!(session.hints_shown(), hints(&["h1", "h2"]).as_slice());
        assert_eq!(session.stats().correct_first_try, 0);
        assert_eq!(session.stats().total_questions, 1);
        assert_eq!(session.stats().hints_used, 2);
        assert_eq!(session.stats().final_hint_before_solve.as_deref(), Some("h2"));
    }

    #[test]
    fn fourth_wrong_answer_reveals_solution_not_a_fourth_hint() {
        let mut session = started();
        for _ in 0..3 {
            assert!(matches!(
                session.submit_answer("wrong").unwrap(),
                SubmitOutcome::HintRevealed { .. }
            ));
            assert!(session.hint_cursor() <= session.active_hints().len());
        }
        assert_eq!(session.hint_cursor(), 3);

        let outcome = session.submit_answer("still wrong").unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::SolutionRevealed {
                completion: Completion {
                    question_id: QuestionId::new(1),
                    solved: false,
                    hints_used_count: 3,
                },
            }
        );
        assert_eq!(session.hint_cursor(), 3);
        assert_eq!(session.phase(), Some(QuestionPhase::SolutionRevealed));
        assert_eq!(session.stats().total_questions, 1);
        assert_eq!(session.stats().hints_used, 3);
        assert_eq!(session.stats().final_hint_before_solve.as_deref(), Some("h3"));
    }

    #[test]
    fn resolved_question_rejects_further_answers() {
        let mut session = started();
        session.submit_answer("4").unwrap();
        assert_eq!(session.submit_answer("4"), Err(QuizError::QuestionResolved));
        assert_eq!(session.request_hint(), Err(QuizError::QuestionResolved));
        assert_eq!(session.stats().total_questions, 1);
    }

    #[test]
    fn blank_answer_is_rejected_without_mutation() {
        let mut session = started();
        assert_eq!(session.submit_answer("   "), Err(QuizError::BlankAnswer));
        assert!(session.is_first_attempt());
        assert_eq!(session.hint_cursor(), 0);
        assert_eq!(session.phase(), Some(QuestionPhase::AwaitingFirstAnswer));
    }

    #[test]
    fn requesting_hint_past_the_end_is_a_no_op() {
        let mut session = started();
        for n in 1..=3 {
            assert_eq!(
                session.request_hint().unwrap(),
                HintRequest::Revealed {
                    number: n,
                    hint: format!("h{n}"),
                }
            );
        }
        let before = session.clone();
        assert_eq!(session.request_hint().unwrap(), HintRequest::Exhausted);
        assert_eq!(session.hint_cursor(), before.hint_cursor());
        assert_eq!(session.hints_shown(), before.hints_shown());
        assert!(!session.is_first_attempt());
    }

    #[test]
    fn manual_hint_forfeits_first_try_credit() {
        let mut session = started();
        session.request_hint().unwrap();
        session.request_hint().unwrap();
        assert!(!session.is_first_attempt());

        let outcome = session.submit_answer("4").unwrap();
        match outcome {
            SubmitOutcome::Correct { first_try, completion } => {
                assert!(!first_try);
                assert_eq!(completion.hints_used_count, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(session.stats().correct_first_try, 0);
        assert_eq!(session.stats().hints_used, 2);
    }

    #[test]
    fn first_wrong_answer_without_hints_reveals_solution() {
        let mut session = QuizSession::new(bank());
        session.load_question(2, &VariantLabel::control());
        let outcome = session.submit_answer("1").unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::SolutionRevealed { completion } if !completion.solved
        ));
        assert_eq!(session.hint_cursor(), 0);
    }

    #[test]
    fn hints_are_resolved_for_the_variant_at_load_time() {
        let mut session = QuizSession::new(bank());
        session.load_question(1, &VariantLabel::new("chatgpt"));
        assert_eq!(session.active_hints(), hints(&["g1", "g2"]).as_slice());

        session.load_question(1, &VariantLabel::control());
        assert_eq!(session.active_hints(), hints(&["c1"]).as_slice());
    }

    #[test]
    fn caret_answers_match_after_normalization() {
        let mut session = QuizSession::new(bank());
        session.load_question(1, &VariantLabel::control());
        let outcome = session.submit_answer("X^2+2X+1").unwrap();
        assert!(matches!(outcome, SubmitOutcome::Correct { first_try: true, .. }));
    }

    #[test]
    fn advancing_resets_per_question_state() {
        let mut session = started();
        session.submit_answer("nope").unwrap();
        session.submit_answer("4").unwrap();

        let outcome = session.advance_to_next_question(&VariantLabel::new("chatgpt"));
        assert_eq!(outcome, LoadOutcome::Loaded { index: 1, total: 3 });
        assert_eq!(session.hint_cursor(), 0);
        assert!(session.hints_shown().is_empty());
        assert!(session.is_first_attempt());
        assert_eq!(session.phase(), Some(QuestionPhase::AwaitingFirstAnswer));
        assert_eq!(session.stats().total_questions, 1);
    }

    #[test]
    fn loading_past_the_end_completes_without_error() {
        let mut session = started();
        let outcome = session.load_question(3, &VariantLabel::control());
        assert_eq!(outcome, LoadOutcome::Completed { total: 3 });
        assert!(session.is_completed());
        assert!(session.current_question().is_none());
        assert_eq!(session.submit_answer("4"), Err(QuizError::NoActiveQuestion));
        assert_eq!(session.hint_feedback_target(), Err(QuizError::NoActiveQuestion));
    }

    #[test]
    fn reset_zeroes_stats_and_reloads_first_question() {
        let mut session = started();
        session.submit_answer("x").unwrap();
        session.submit_answer("4").unwrap();
        session.advance_to_next_question(&VariantLabel::control());

        let outcome = session.reset(&VariantLabel::control());
        assert_eq!(outcome, LoadOutcome::Loaded { index: 0, total: 3 });
        assert_eq!(session.stats(), &SessionStats::default());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_question().unwrap().id(), QuestionId::new(1));
    }

    #[test]
    fn final_hint_survives_a_hintless_solve() {
        let mut session = started();
        session.submit_answer("x").unwrap();
        session.submit_answer("4").unwrap();
        session.advance_to_next_question(&VariantLabel::control());
        session.submit_answer("x^2+2x+1").unwrap();

        assert_eq!(session.stats().total_questions, 2);
        assert_eq!(session.stats().final_hint_before_solve.as_deref(), Some("h1"));
    }

    #[test]
    fn feedback_target_reports_hint_cursor() {
        let mut session = started();
        session.submit_answer("x").unwrap();
        session.submit_answer("y").unwrap();
        let target = session.hint_feedback_target().unwrap();
        assert_eq!(target.question_id, QuestionId::new(1));
        assert_eq!(target.hint_index, 2);
    }
}
