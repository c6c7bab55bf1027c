use dioxus::prelude::*;

use quiz_core::model::SessionStats;

use crate::views::QuizState;

#[component]
pub fn StatsView() -> Element {
    let state = use_context::<QuizState>();
    let stats = state
        .vm
        .read()
        .as_ref()
        .map_or_else(SessionStats::default, |vm| vm.stats().clone());
    let SessionStats {
        total_questions,
        correct_first_try,
        hints_used,
        final_hint_before_solve,
    } = stats;
    let last_hint = final_hint_before_solve.unwrap_or_else(|| "None".to_string());

    rsx! {
        div { class: "page stats-page", id: "stats-container",
            h2 { "Session Stats" }
            dl { class: "stats",
                dt { "Problems finished" }
                dd { "{total_questions}" }
                dt { "Correct on first try" }
                dd { "{correct_first_try}" }
                dt { "Hints used" }
                dd { "{hints_used}" }
                dt { "Last hint before solving" }
                dd { "{last_hint}" }
            }
        }
    }
}
