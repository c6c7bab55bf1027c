use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{QuizView, StatsView, use_quiz_state_provider};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizView)] Quiz {},
        #[route("/stats", StatsView)] Stats {},
}

#[component]
fn Layout() -> Element {
    // Lives above the outlet so quiz progress survives route changes.
    use_quiz_state_provider();

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Math Tutor" }
            ul {
                li { Link { to: Route::Quiz {}, "Practice" } }
                li { Link { to: Route::Stats {}, "Stats" } }
            }
        }
    }
}
