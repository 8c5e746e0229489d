use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::quiz::{AccessLevel, Advance, Cursor, Direction, ExerciseSession, Mode, Question, QuestionBank};

/// Result of checking the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub mode: Mode,
    pub correct: bool,
    /// Set when a demo user checked an answer; the caller decides how to nudge them.
    pub upsell: bool,
}

/// One user's walk through the question bank: where they are, what they entered,
/// and which mode they are answering in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drill {
    cursor: Cursor,
    session: ExerciseSession,
    mode: Mode,
    seed: u64,
}

impl Drill {
    pub fn new(bank: &QuestionBank, cursor: Cursor, seed: u64) -> Result<Self, QuizError> {
        let question = bank.require(cursor.current())?;
        Ok(Self {
            cursor,
            session: session_for(question, seed),
            mode: Mode::default(),
            seed,
        })
    }

    /// Restricted drill pinned to `demo_id`.
    pub fn demo(bank: &QuestionBank, demo_id: u32, seed: u64) -> Result<Self, QuizError> {
        bank.require(demo_id)?;
        Self::new(bank, Cursor::new(demo_id, bank.len(), AccessLevel::Restricted), seed)
    }

    pub fn question<'a>(&self, bank: &'a QuestionBank) -> Result<&'a Question, QuizError> {
        bank.require(self.cursor.current())
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ExerciseSession {
        &mut self.session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_restricted(&self) -> bool {
        self.cursor.access() == AccessLevel::Restricted
    }

    /// Multiple choice is only offered for questions that carry options.
    pub fn set_mode(&mut self, mode: Mode, bank: &QuestionBank) -> Result<bool, QuizError> {
        if mode == Mode::MultipleChoice && self.question(bank)?.choices.is_none() {
            return Ok(false);
        }
        self.mode = mode;
        Ok(true)
    }

    pub fn check(&mut self, bank: &QuestionBank) -> Result<CheckOutcome, QuizError> {
        let question = bank.require(self.cursor.current())?;
        let correct = self.session.check(self.mode, question);
        Ok(CheckOutcome {
            mode: self.mode,
            correct,
            upsell: self.is_restricted(),
        })
    }

    /// Moves to the neighbouring question and starts it from a clean session.
    pub fn advance(&mut self, direction: Direction, bank: &QuestionBank) -> Result<Advance, QuizError> {
        let advance = self.cursor.advance(direction);
        if let Advance::Moved(id) = advance {
            let question = bank.require(id)?;
            self.session = session_for(question, self.seed);
            if self.mode == Mode::MultipleChoice && question.choices.is_none() {
                self.mode = Mode::default();
            }
        }
        Ok(advance)
    }

    pub fn grant_full_access(&mut self) {
        self.cursor.grant_full_access();
    }
}

fn session_for(question: &Question, seed: u64) -> ExerciseSession {
    ExerciseSession::shuffled(question, seed ^ u64::from(question.id))
}
