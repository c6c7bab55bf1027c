mod markup;
mod quiz_vm;

pub use markup::sanitize_html;
pub use quiz_vm::{Notice, NoticeTone, QuizIntent, QuizVm, SOLUTION_UNAVAILABLE};
