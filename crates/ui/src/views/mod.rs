mod quiz;
mod state;
mod stats;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use quiz::QuizView;
pub use state::{QuizState, use_quiz_state_provider};
pub use stats::StatsView;

#[cfg(test)]
pub(crate) use quiz::QuizTestHandles;
