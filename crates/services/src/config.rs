use std::env;
use std::path::PathBuf;

use quiz_core::model::{Arm, ArmLabels, VariantLabel};

pub const DEFAULT_QUESTIONS: &str = "questions.json";
pub const DEFAULT_FLAG_NAME: &str = "hint-variant-experiment";

/// Where the question bank is fetched from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionSource {
    File(PathBuf),
    Url(String),
}

impl QuestionSource {
    /// `http://` and `https://` values are URLs, anything else is a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl Default for QuestionSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_QUESTIONS))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagServiceConfig {
    pub base_url: String,
    pub client_key: String,
    pub flag_name: String,
}

/// Runtime configuration read from `QUIZ_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub questions: QuestionSource,
    /// `None` keeps every user on the control label.
    pub flag_service: Option<FlagServiceConfig>,
    pub events_url: Option<String>,
    pub arm_labels: ArmLabels,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions: QuestionSource::default(),
            flag_service: None,
            events_url: None,
            arm_labels: ArmLabels::default(),
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let questions = get("QUIZ_QUESTIONS")
            .map(|raw| QuestionSource::parse(&raw))
            .unwrap_or_default();

        let flag_service = get("QUIZ_FLAG_URL").and_then(|base_url| {
            let client_key = get("QUIZ_FLAG_KEY")?;
            Some(FlagServiceConfig {
                base_url,
                client_key,
                flag_name: get("QUIZ_FLAG_NAME").unwrap_or_else(|| DEFAULT_FLAG_NAME.into()),
            })
        });

        let defaults = ArmLabels::default();
        let label = |name: &str, arm: Arm| {
            get(name).map_or_else(|| defaults.label_for(arm).clone(), VariantLabel::new)
        };
        let arm_labels = ArmLabels::new(
            label("QUIZ_ARM_A_LABEL", Arm::A),
            label("QUIZ_ARM_B_LABEL", Arm::B),
        );

        Self {
            questions,
            flag_service,
            events_url: get("QUIZ_EVENTS_URL"),
            arm_labels,
        }
    }
}
