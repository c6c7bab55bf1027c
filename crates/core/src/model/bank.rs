use std::collections::HashSet;

use thiserror::Error;

use super::ids::QuestionId;
use super::question::{HintSource, Question, QuestionRecord};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("malformed question bank: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("question {id} has an answer that is neither text nor a number")]
    InvalidAnswer { id: u64 },

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error("question bank is empty")]
    Empty,
}

/// Ordered list of questions presented by a quiz session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `QuestionBankError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionBankError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of question records.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` when the document is malformed, a record is
    /// invalid, ids collide, or the array is empty.
    pub fn from_json_str(raw: &str) -> Result<Self, QuestionBankError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
        if records.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        let questions = records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// Single built-in question used when the real bank cannot be loaded.
    #[must_use]
    pub fn fallback() -> Self {
        let question = Question::new(QuestionId::new(1), "What is 2 + 2?", "4")
            .with_solution("This is a basic arithmetic question. 2 + 2 = 4.")
            .with_hints(HintSource::Flat(vec![
                "This is a basic arithmetic question.".into(),
                "Add the two numbers together.".into(),
                "The answer is 4.".into(),
            ]));
        Self {
            questions: vec![question],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn find_by_id(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Append a question to the end of the bank.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::DuplicateId` if the id is already present.
    pub fn push(&mut self, question: Question) -> Result<(), QuestionBankError> {
        if self.find_by_id(question.id()).is_some() {
            return Err(QuestionBankError::DuplicateId(question.id()));
        }
        self.questions.push(question);
        Ok(())
    }
}
