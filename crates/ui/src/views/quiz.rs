use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::QuizState;
use crate::vm::{QuizIntent, QuizVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TYPESET_DELAY: Duration = Duration::from_millis(100);

const TYPESET_SCRIPT: &str = r"(function() {
    if (window.MathJax && window.MathJax.typesetPromise) {
        window.MathJax.typesetPromise().catch(function() {});
    }
})();";

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<QuizState>();
    let mut answer = use_signal(String::new);

    let _bank_loader = use_resource(move || {
        let ctx = ctx.clone();
        let mut vm = state.vm;
        async move {
            if vm.peek().is_some() {
                return;
            }
            let loaded = ctx.question_bank().load_or_fallback().await;
            vm.set(Some(QuizVm::start(ctx.controller(loaded.bank))));
        }
    });

    // Math is typeset after every content change; a missing typesetter is ignored.
    use_effect(move || {
        if !state.is_loaded() {
            return;
        }
        spawn(async move {
            tokio::time::sleep(TYPESET_DELAY).await;
            let _ = eval(TYPESET_SCRIPT);
        });
    });

    let dispatch = use_callback(move |intent: QuizIntent| {
        let mut vm = state.vm;
        let clears_input = matches!(intent, QuizIntent::NextQuestion | QuizIntent::Reset);
        if let Some(vm) = vm.write().as_mut() {
            vm.dispatch(intent);
        }
        if clears_input {
            answer.set(String::new());
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, answer);
            }
        }
    }

    let vm_guard = state.vm.read();
    let Some(vm) = vm_guard.as_ref() else {
        return rsx! {
            div { class: "page quiz-page",
                p { class: "quiz-loading", "Loading questions..." }
            }
        };
    };

    if vm.is_completed() {
        let total = vm.question_count();
        return rsx! {
            CompletionPanel { total, on_reset: move |()| dispatch.call(QuizIntent::Reset) }
        };
    }

    let progress = vm.progress_label().unwrap_or_default();
    let prompt_html = vm.prompt_html().unwrap_or_default();
    let hints = vm.hints_html();
    let solution = vm.solution_html();
    let notice = vm
        .notice()
        .map(|notice| (notice.tone.class(), notice.title, notice.body));
    let show_feedback = vm.show_feedback_prompt();
    let feedback_sent = vm.feedback_sent();
    let can_submit = vm.can_submit();
    let can_advance = vm.can_advance();
    drop(vm_guard);

    rsx! {
        div { class: "page quiz-page", id: "quiz-root",
            p { class: "quiz-progress", "{progress}" }
            div { class: "quiz-question", id: "question-text", dangerous_inner_html: "{prompt_html}" }

            div { class: "quiz-answer",
                input {
                    id: "answer-input",
                    r#type: "text",
                    placeholder: "Your answer",
                    autocomplete: "off",
                    value: "{answer}",
                    disabled: !can_submit,
                    oninput: move |evt| answer.set(evt.value()),
                    onkeydown: move |evt| {
                        if evt.key() == Key::Enter {
                            evt.prevent_default();
                            dispatch.call(QuizIntent::Submit(answer()));
                        }
                    },
                }
                button {
                    id: "submit-btn",
                    class: "btn btn-primary",
                    disabled: !can_submit,
                    onclick: move |_| dispatch.call(QuizIntent::Submit(answer())),
                    "Submit"
                }
                button {
                    id: "hint-btn",
                    class: "btn btn-secondary",
                    disabled: !can_submit,
                    onclick: move |_| dispatch.call(QuizIntent::RevealHint),
                    "Show hint"
                }
            }

            if let Some((class, title, body)) = notice {
                div { class: "{class}", id: "feedback-container",
                    h3 { "{title}" }
                    p { "{body}" }
                }
            }

            if !hints.is_empty() {
                div { class: "hint-list",
                    for (number, hint) in hints.iter().enumerate().map(|(i, h)| (i + 1, h)) {
                        div { key: "{number}", class: "hint-content",
                            strong { "Hint {number}: " }
                            span { dangerous_inner_html: "{hint}" }
                        }
                    }
                }
            }

            if show_feedback {
                div { class: "hint-feedback", id: "hint-feedback-container",
                    p { "Was this hint helpful?" }
                    button {
                        class: "btn",
                        onclick: move |_| dispatch.call(QuizIntent::HintFeedback { helpful: true }),
                        "Yes"
                    }
                    button {
                        class: "btn",
                        onclick: move |_| dispatch.call(QuizIntent::HintFeedback { helpful: false }),
                        "No"
                    }
                }
            } else if feedback_sent {
                p { class: "hint-feedback-thanks", "Thanks for the feedback!" }
            }

            if let Some(solution) = solution {
                div { class: "solution",
                    h4 { "Solution:" }
                    p { dangerous_inner_html: "{solution}" }
                }
            }

            if can_advance {
                button {
                    id: "next-question-btn",
                    class: "btn btn-primary",
                    onclick: move |_| dispatch.call(QuizIntent::NextQuestion),
                    "Next Question"
                }
            }
        }
    }
}

#[component]
fn CompletionPanel(total: usize, on_reset: EventHandler<()>) -> Element {
    rsx! {
        div { class: "page quiz-complete", id: "quiz-complete",
            h2 { "Congratulations!" }
            p { "You've completed all {total} math problems!" }
            p { "Great job working through each one systematically." }
            button {
                id: "reset-btn",
                class: "btn btn-primary",
                onclick: move |_| on_reset.call(()),
                "Start Over"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    answer: Rc<RefCell<Option<Signal<String>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, answer: Signal<String>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.answer.borrow_mut() = Some(answer);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn answer(&self) -> Signal<String> {
        (*self.answer.borrow()).expect("quiz answer registered")
    }
}
