use dioxus::prelude::*;

use crate::vm::QuizVm;

/// Quiz state shared by the quiz and stats screens.
///
/// `None` until the question bank has loaded.
#[derive(Clone, Copy, PartialEq)]
pub struct QuizState {
    pub vm: Signal<Option<QuizVm>>,
}

impl QuizState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vm: Signal::new(None),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.vm.read().is_some()
    }
}

/// Provide a `QuizState` to every descendant of the calling component.
pub fn use_quiz_state_provider() -> QuizState {
    use_context_provider(QuizState::new)
}
