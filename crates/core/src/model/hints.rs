use super::experiment::{CONTROL_VARIANT, VariantLabel};
use super::question::{HintSource, Question};

impl HintSource {
    /// Resolve the ordered hint list for a variant label. Never fails.
    #[must_use]
    pub fn select(&self, variant: &str) -> Vec<String> {
        match self {
            HintSource::Flat(hints) => hints.clone(),
            HintSource::Variants(entries) => entries
                .iter()
                .find(|entry| entry.variant() == Some(variant))
                .or_else(|| {
                    entries
                        .iter()
                        .find(|entry| entry.variant() == Some(CONTROL_VARIANT))
                })
                .or_else(|| entries.first())
                .and_then(|entry| entry.steps())
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        }
    }
}

/// Hint sequence for `question` under the assigned variant.
#[must_use]
pub fn select_hints(question: &Question, variant: &VariantLabel) -> Vec<String> {
    question.hints().select(variant.as_str())
}
