use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::QuizError;
use crate::quiz::Question;

/// Ordered, validated question list keyed by ids `1..=len`.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    count: u32,
}

impl QuestionBank {
    pub fn new(mut questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let count = u32::try_from(questions.len())
            .map_err(|_| QuizError::TooManyQuestions(questions.len()))?;
        questions.sort_by_key(|q| q.id);

        for (expected, question) in (1u32..).zip(&questions) {
            question.validate()?;
            if question.id != expected {
                return Err(QuizError::NonSequentialId {
                    expected,
                    found: question.id,
                });
            }
        }

        Ok(Self { questions, count })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_reader(reader)?;
        Self::new(questions)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.questions.get(index)
    }

    pub fn require(&self, id: u32) -> Result<&Question, QuizError> {
        self.get(id).ok_or(QuizError::UnknownQuestion(id))
    }

    pub fn len(&self) -> u32 {
        self.count
    }
}
