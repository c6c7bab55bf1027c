use serde::Deserialize;
use serde_json::Value;

use super::bank::QuestionBankError;
use super::ids::QuestionId;

/// One labelled hint sequence in the variant schema.
///
/// Both fields are optional because the ingestion boundary keeps malformed
/// entries in place: a non-object entry still counts as "the first entry"
/// during selection, it just has nothing to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantHints {
    variant: Option<String>,
    steps: Option<Vec<String>>,
}

impl VariantHints {
    #[must_use]
    pub fn new(variant: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            variant: Some(variant.into()),
            steps: Some(steps),
        }
    }

    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// `None` when the source did not carry a list. Non-string elements are dropped.
    #[must_use]
    pub fn steps(&self) -> Option<&[String]> {
        self.steps.as_deref()
    }

    fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                variant: None,
                steps: None,
            };
        };

        let variant = obj.get("variant").and_then(Value::as_str).map(str::to_owned);
        let steps = obj.get("steps").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        });

        Self { variant, steps }
    }
}

/// Hint content for a question, in one of the two authoring schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintSource {
    /// `hints: ["...", "..."]`
    Flat(Vec<String>),
    /// `hints: [{ "variant": "...", "steps": ["..."] }, ...]`
    Variants(Vec<VariantHints>),
}

impl Default for HintSource {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl HintSource {
    /// Classify raw `hints` JSON. The element type of the first entry decides
    /// the schema; anything that is not an array yields an empty source.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(items) = value.as_array() else {
            return Self::default();
        };

        match items.first() {
            None => Self::default(),
            Some(Value::String(_)) => Self::Flat(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
            ),
            Some(_) => Self::Variants(items.iter().map(VariantHints::from_json).collect()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            HintSource::Flat(items) => items.is_empty(),
            HintSource::Variants(items) => items.is_empty(),
        }
    }
}

/// A quiz problem. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    answer: String,
    solution: Option<String>,
    hints: HintSource,
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            answer: answer.into(),
            solution: None,
            hints: HintSource::default(),
        }
    }

    #[must_use]
    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        let solution = solution.into();
        self.solution = (!solution.trim().is_empty()).then_some(solution);
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: HintSource) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    #[must_use]
    pub fn hints(&self) -> &HintSource {
        &self.hints
    }
}

/// Wire shape of a question in the bank file.
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionRecord {
    id: u64,
    #[serde(alias = "prompt")]
    question: String,
    answer: Value,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default)]
    hints: Value,
}

impl QuestionRecord {
    pub(crate) fn into_question(self) -> Result<Question, QuestionBankError> {
        let answer = match self.answer {
            Value::String(text) => text,
            Value::Number(number) => numeric_answer(&number),
            _ => return Err(QuestionBankError::InvalidAnswer { id: self.id }),
        };

        let mut question = Question::new(QuestionId::new(self.id), self.question, answer)
            .with_hints(HintSource::from_json(&self.hints));
        if let Some(solution) = self.solution {
            question = question.with_solution(solution);
        }
        Ok(question)
    }
}

/// Largest magnitude below which every integer is exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Integral floats such as `1e3` or `8.0` render without a fractional part.
fn numeric_answer(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value)
            if number.is_f64() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER =>
        {
            format!("{value:.0}")
        }
        _ => number.to_string(),
    }
}
