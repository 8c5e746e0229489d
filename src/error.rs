use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Question {id} is malformed: {reason}")]
    MalformedQuestion { id: u32, reason: String },

    #[error("Question ids must run from 1 without gaps, expected {expected} but found {found}")]
    NonSequentialId { expected: u32, found: u32 },

    #[error("Question bank is empty")]
    EmptyBank,

    #[error("Question bank holds {0} questions, more than an id can address")]
    TooManyQuestions(usize),

    #[error("Unknown question {0}")]
    UnknownQuestion(u32),

    #[error("Failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

impl QuizError {
    pub(crate) fn malformed(id: u32, reason: impl Into<String>) -> Self {
        QuizError::MalformedQuestion {
            id,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("Invalid {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("Dialogue storage error: {0}")]
    Storage(String),
}
