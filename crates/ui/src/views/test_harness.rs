use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::EngagementEvent;
use services::{AssignmentHandle, EventSink, QuestionBankService, QuestionSource};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::context::{UiApp, build_app_context};
use crate::views::{QuizTestHandles, QuizView, StatsView, use_quiz_state_provider};

#[derive(Clone)]
struct TestApp {
    question_bank: Arc<QuestionBankService>,
    assignment: AssignmentHandle,
    events: EventSink,
}

impl UiApp for TestApp {
    fn question_bank(&self) -> Arc<QuestionBankService> {
        Arc::clone(&self.question_bank)
    }

    fn assignment(&self) -> AssignmentHandle {
        self.assignment.clone()
    }

    fn events(&self) -> EventSink {
        self.events.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Quiz,
    Stats,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.handles.clone());
    use_quiz_state_provider();
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Stats => rsx! {
            QuizView {}
            StatsView {}
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub handles: QuizTestHandles,
    pub events: UnboundedReceiver<EngagementEvent>,
}

impl ViewHarness {
    pub async fn drive_async(&mut self) {
        for _ in 0..5 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn dispatch(&mut self, intent: crate::vm::QuizIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn type_answer(&mut self, text: &str) {
        let mut answer = self.handles.answer();
        self.dom.in_runtime(|| answer.set(text.to_string()));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over the built-in fallback bank (a missing question file).
pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let source = QuestionSource::File(PathBuf::from("definitely-missing-questions.json"));
    let (events, rx) = EventSink::channel();
    let app = Arc::new(TestApp {
        question_bank: Arc::new(QuestionBankService::new(source)),
        assignment: AssignmentHandle::new(),
        events,
    });
    let handles = QuizTestHandles::default();

    let mut dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();

    let mut harness = ViewHarness {
        dom,
        handles,
        events: rx,
    };
    harness.drive_async().await;
    harness
}
