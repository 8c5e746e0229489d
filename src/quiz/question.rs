use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Separates sub-answers inside a canonical answer, one per input field.
pub const ANSWER_DELIMITER: char = ';';

/// Authoring convention: the first three options of a multiple choice pool are the correct ones.
pub const DEFAULT_CORRECT_COUNT: usize = 3;

/// Where the free-response grader takes its expected answers from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerSpec {
    /// One alternate canonical string per input field.
    ByField(Vec<String>),
    /// The canonical answer, split on [`ANSWER_DELIMITER`].
    Delimited(String),
}

impl AnswerSpec {
    /// Trimmed expected answer for field `index`, or `None` past the last part.
    pub fn expected(&self, index: usize) -> Option<&str> {
        match self {
            AnswerSpec::ByField(answers) => answers.get(index).map(|a| a.trim()),
            AnswerSpec::Delimited(text) => text.split(ANSWER_DELIMITER).nth(index).map(str::trim),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnswerSpec::ByField(answers) => answers.len(),
            AnswerSpec::Delimited(text) => text.split(ANSWER_DELIMITER).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoice {
    pub options: Vec<String>,
    /// Options `[0, correct_count)` are correct, the rest are distractors.
    pub correct_count: usize,
}

impl MultipleChoice {
    pub fn is_correct(&self, index: usize) -> bool {
        index < self.correct_count && index < self.options.len()
    }
}

/// One training question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub canonical_answer: String,
    pub answers: AnswerSpec,
    pub field_count: usize,
    pub choices: Option<MultipleChoice>,
}

impl Question {
    pub fn new(id: u32, prompt: impl Into<String>, canonical_answer: impl Into<String>) -> Self {
        let canonical_answer = canonical_answer.into();
        Self {
            id,
            prompt: prompt.into(),
            answers: AnswerSpec::Delimited(canonical_answer.clone()),
            canonical_answer,
            field_count: 1,
            choices: None,
        }
    }

    pub fn with_field_count(mut self, field_count: usize) -> Self {
        self.field_count = field_count;
        self
    }

    pub fn with_acceptable_answers<S: Into<String>>(mut self, answers: Vec<S>) -> Self {
        self.answers = AnswerSpec::ByField(answers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_choices<S: Into<String>>(mut self, options: Vec<S>, correct_count: usize) -> Self {
        self.choices = Some(MultipleChoice {
            options: options.into_iter().map(Into::into).collect(),
            correct_count,
        });
        self
    }

    /// Rejects records whose free-response fields would have no comparison target,
    /// and multiple choice pools whose correct prefix doesn't fit.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.id == 0 {
            return Err(QuizError::malformed(self.id, "id must be positive"));
        }
        if self.field_count == 0 {
            return Err(QuizError::malformed(self.id, "field_count must be at least 1"));
        }

        let parts = self.answers.len();
        if parts != self.field_count {
            let source = match self.answers {
                AnswerSpec::ByField(_) => "acceptable_answers",
                AnswerSpec::Delimited(_) => "canonical_answer parts",
            };
            return Err(QuizError::malformed(
                self.id,
                format!(
                    "{} has {} entries but field_count is {}",
                    source, parts, self.field_count
                ),
            ));
        }

        if let Some(choices) = &self.choices {
            if choices.options.is_empty() {
                return Err(QuizError::malformed(
                    self.id,
                    "multiple_choice_options must not be empty",
                ));
            }
            if choices.correct_count == 0 || choices.correct_count > choices.options.len() {
                return Err(QuizError::malformed(
                    self.id,
                    format!(
                        "correct_count {} is outside 1..={}",
                        choices.correct_count,
                        choices.options.len()
                    ),
                ));
            }
        }

        Ok(())
    }
}

// Shape of a question in the bank file
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    id: u32,
    prompt: String,
    canonical_answer: String,
    #[serde(default)]
    acceptable_answers: Option<Vec<String>>,
    #[serde(default = "default_field_count")]
    field_count: usize,
    #[serde(default)]
    multiple_choice_options: Option<Vec<String>>,
    #[serde(default = "default_correct_count")]
    correct_count: usize,
}

fn default_field_count() -> usize {
    1
}

fn default_correct_count() -> usize {
    DEFAULT_CORRECT_COUNT
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuizError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let mut question = Question::new(record.id, record.prompt, record.canonical_answer)
            .with_field_count(record.field_count);
        if let Some(answers) = record.acceptable_answers {
            question = question.with_acceptable_answers(answers);
        }
        if let Some(options) = record.multiple_choice_options {
            question = question.with_choices(options, record.correct_count);
        }

        question.validate()?;
        Ok(question)
    }
}
