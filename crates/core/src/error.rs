use thiserror::Error;

use crate::model::{QuestionBankError, QuizError, UserKeyError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    UserKey(#[from] UserKeyError),
}
