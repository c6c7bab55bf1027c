use std::sync::Arc;

use quiz_core::model::QuestionBank;
use services::{AssignmentHandle, EventSink, QuestionBankService, QuizController};

/// What the desktop shell hands to the views.
pub trait UiApp: Send + Sync {
    fn question_bank(&self) -> Arc<QuestionBankService>;
    fn assignment(&self) -> AssignmentHandle;
    fn events(&self) -> EventSink;
}

#[derive(Clone)]
pub struct AppContext {
    question_bank: Arc<QuestionBankService>,
    assignment: AssignmentHandle,
    events: EventSink,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            question_bank: app.question_bank(),
            assignment: app.assignment(),
            events: app.events(),
        }
    }

    #[must_use]
    pub fn question_bank(&self) -> Arc<QuestionBankService> {
        Arc::clone(&self.question_bank)
    }

    #[must_use]
    pub fn assignment(&self) -> AssignmentHandle {
        self.assignment.clone()
    }

    /// A fresh controller over `bank` sharing this app's assignment and event sink.
    #[must_use]
    pub fn controller(&self, bank: QuestionBank) -> QuizController {
        QuizController::new(bank, self.assignment.clone(), self.events.clone())
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
