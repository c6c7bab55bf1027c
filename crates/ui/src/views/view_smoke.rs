use quiz_core::model::EngagementEvent;

use super::test_harness::{ViewKind, setup_view_harness};
use crate::vm::QuizIntent;

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_renders_first_problem() {
    let harness = setup_view_harness(ViewKind::Quiz).await;
    let html = harness.render();
    assert!(html.contains("Problem 1 of 1"), "missing progress in {html}");
    assert!(html.contains("What is 2 + 2?"), "missing prompt in {html}");
    assert!(!html.contains("feedback-container"), "unexpected notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn wrong_answer_reveals_hint_and_feedback_prompt() {
    let mut harness = setup_view_harness(ViewKind::Quiz).await;
    harness.type_answer("5");
    harness.dispatch(QuizIntent::Submit("5".into()));

    let html = harness.render();
    assert!(html.contains("Not quite right"), "missing notice in {html}");
    assert!(html.contains("Hint 1: "), "missing hint in {html}");
    assert!(html.contains("Was this hint helpful?"), "missing prompt in {html}");

    harness.dispatch(QuizIntent::HintFeedback { helpful: true });
    let html = harness.render();
    assert!(!html.contains("Was this hint helpful?"), "prompt still shown in {html}");
    assert!(html.contains("Thanks for the feedback!"), "missing thanks in {html}");

    let event = harness.events.try_recv().expect("hint feedback emitted");
    assert!(matches!(event, EngagementEvent::HintFeedback(ref e) if e.helpful && e.hint_index == 1));
}

#[tokio::test(flavor = "current_thread")]
async fn blank_submission_prompts_for_answer() {
    let mut harness = setup_view_harness(ViewKind::Quiz).await;
    harness.dispatch(QuizIntent::Submit("   ".into()));
    let html = harness.render();
    assert!(html.contains("Enter an answer"), "missing blank notice in {html}");
    assert!(harness.events.try_recv().is_err());
}

#[tokio::test(flavor = "current_thread")]
async fn finishing_the_bank_shows_completion_and_reset() {
    let mut harness = setup_view_harness(ViewKind::Quiz).await;
    harness.dispatch(QuizIntent::Submit("4".into()));
    let html = harness.render();
    assert!(html.contains("Correct!"), "missing correct notice in {html}");
    assert!(html.contains("2 + 2 = 4"), "missing solution in {html}");
    assert!(html.contains("Next Question"), "missing next button in {html}");

    harness.dispatch(QuizIntent::NextQuestion);
    let html = harness.render();
    assert!(
        html.contains("You've completed all 1 math problems!"),
        "missing completion in {html}"
    );
    assert!(html.contains("Start Over"), "missing reset in {html}");

    harness.dispatch(QuizIntent::Reset);
    let html = harness.render();
    assert!(html.contains("Problem 1 of 1"), "missing progress after reset in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stats_view_tracks_session() {
    let mut harness = setup_view_harness(ViewKind::Stats).await;
    harness.dispatch(QuizIntent::Submit("3".into()));
    harness.dispatch(QuizIntent::Submit("4".into()));

    let html = harness.render();
    assert!(html.contains("Session Stats"), "missing title in {html}");
    assert!(html.contains("Last hint before solving"), "missing label in {html}");
    assert!(
        html.contains("<dd>This is a basic arithmetic question.</dd>"),
        "last hint should be recorded in {html}"
    );
}
