use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

const MATHJAX_CONFIG: &str = r"window.MathJax = {
    tex: { inlineMath: [['$', '$'], ['\\(', '\\)']] },
    startup: { typeset: false }
};";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Math Tutor" }
        document::Script { "{MATHJAX_CONFIG}" }
        document::Script { src: "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
