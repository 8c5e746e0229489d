use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::grading::{self, FieldVerdicts};
use super::question::Question;
use super::word_bank::WordBank;

/// The three parallel ways a question can be answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    FreeResponse,
    WordBank,
    MultipleChoice,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ChoiceState {
    selected: BTreeSet<usize>,
    option_count: usize,
    verdict: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct WordBankState {
    bank: WordBank,
    verdict: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct FreeResponseState {
    fields: Vec<String>,
    checked: bool,
}

/// Input and grading state of one question across all modes.
///
/// Each mode is either untouched or checked. Any change to a mode's input puts it
/// back to untouched, so a verdict always describes the input currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSession {
    question_id: u32,
    choice: ChoiceState,
    words: WordBankState,
    free: FreeResponseState,
    reveal_answer: bool,
}

impl ExerciseSession {
    #[cfg(test)]
    pub fn new(question: &Question) -> Self {
        Self::with_word_bank(question, WordBank::new(&question.canonical_answer))
    }

    pub fn shuffled(question: &Question, seed: u64) -> Self {
        Self::with_word_bank(
            question,
            WordBank::shuffled(&question.canonical_answer, seed),
        )
    }

    fn with_word_bank(question: &Question, bank: WordBank) -> Self {
        Self {
            question_id: question.id,
            choice: ChoiceState {
                option_count: question.choices.as_ref().map_or(0, |c| c.options.len()),
                ..Default::default()
            },
            words: WordBankState {
                bank,
                verdict: None,
            },
            free: FreeResponseState {
                fields: vec![String::new(); question.field_count],
                checked: false,
            },
            reveal_answer: false,
        }
    }

    pub fn question_id(&self) -> u32 {
        self.question_id
    }

    pub fn is_checked(&self, mode: Mode) -> bool {
        match mode {
            Mode::MultipleChoice => self.choice.verdict.is_some(),
            Mode::WordBank => self.words.verdict.is_some(),
            Mode::FreeResponse => self.free.checked,
        }
    }

    /// Grades `mode` against its current input. Returns whether it is fully correct.
    pub fn check(&mut self, mode: Mode, question: &Question) -> bool {
        match mode {
            Mode::MultipleChoice => self.check_choices(question),
            Mode::WordBank => self.check_words(question),
            Mode::FreeResponse => self.check_fields(question).all_correct(),
        }
    }

    // Multiple choice

    pub fn selected_choices(&self) -> &BTreeSet<usize> {
        &self.choice.selected
    }

    pub fn toggle_choice(&mut self, index: usize) -> bool {
        if index >= self.choice.option_count {
            return false;
        }
        if !self.choice.selected.remove(&index) {
            self.choice.selected.insert(index);
        }
        self.choice.verdict = None;
        true
    }

    pub fn check_choices(&mut self, question: &Question) -> bool {
        let correct = grading::grade_multiple_choice(question, &self.choice.selected);
        self.choice.verdict = Some(correct);
        correct
    }

    pub fn choice_verdict(&self) -> Option<bool> {
        self.choice.verdict
    }

    // Word bank

    pub fn word_bank(&self) -> &WordBank {
        &self.words.bank
    }

    pub fn place_word(&mut self, token: &str) -> bool {
        let moved = self.words.bank.place_token(token);
        if moved {
            self.words.verdict = None;
        }
        moved
    }

    pub fn unplace_word(&mut self, token: &str) -> bool {
        let moved = self.words.bank.unplace_token(token);
        if moved {
            self.words.verdict = None;
        }
        moved
    }

    pub fn clear_words(&mut self) -> bool {
        let moved = self.words.bank.clear();
        if moved {
            self.words.verdict = None;
        }
        moved
    }

    pub fn check_words(&mut self, question: &Question) -> bool {
        let correct = grading::grade_word_bank(question, self.words.bank.placed());
        self.words.verdict = Some(correct);
        correct
    }

    pub fn word_verdict(&self) -> Option<bool> {
        self.words.verdict
    }

    // Free response

    pub fn fields(&self) -> &[String] {
        &self.free.fields
    }

    #[cfg(test)]
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) -> bool {
        let Some(field) = self.free.fields.get_mut(index) else {
            return false;
        };
        *field = value.into();
        self.free.checked = false;
        true
    }

    /// Replaces every field from `lines` in order. Fields past the last line are cleared,
    /// lines past the last field are dropped.
    pub fn fill_fields(&mut self, lines: Vec<String>) {
        let mut lines = lines.into_iter();
        for field in self.free.fields.iter_mut() {
            *field = lines.next().unwrap_or_default();
        }
        self.free.checked = false;
    }

    pub fn check_fields(&mut self, question: &Question) -> FieldVerdicts {
        self.free.checked = true;
        grading::grade_free_response(question, &self.free.fields)
    }

    /// Per-field verdicts, recomputed on each call, once the fields have been checked.
    pub fn field_verdicts(&self, question: &Question) -> Option<FieldVerdicts> {
        self.free
            .checked
            .then(|| grading::grade_free_response(question, &self.free.fields))
    }

    // Reveal

    pub fn reveal_answer(&self) -> bool {
        self.reveal_answer
    }

    pub fn toggle_reveal(&mut self) -> bool {
        self.reveal_answer = !self.reveal_answer;
        self.reveal_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(1, "What do you hold when mounting?", "Handrail")
            .with_choices(vec!["a", "b", "c", "d"], 3)
    }

    #[test]
    fn test_new_session_is_untouched() {
        let question = question();
        let session = ExerciseSession::new(&question);
        assert_eq!(session.question_id(), 1);
        assert!(!session.is_checked(Mode::MultipleChoice));
        assert!(!session.is_checked(Mode::WordBank));
        assert!(!session.is_checked(Mode::FreeResponse));
        assert_eq!(session.fields(), [String::new()]);
        assert_eq!(session.word_bank().available(), ["Handrail"]);
        assert!(!session.reveal_answer());
    }

    #[test]
    fn test_toggling_choice_resets_verdict() {
        let question = question();
        let mut session = ExerciseSession::new(&question);
        for i in 0..3 {
            assert!(session.toggle_choice(i));
        }
        assert!(session.check_choices(&question));
        assert_eq!(session.choice_verdict(), Some(true));

        assert!(session.toggle_choice(3));
        assert_eq!(session.choice_verdict(), None);
        assert!(!session.check(Mode::MultipleChoice, &question));

        assert!(session.toggle_choice(3));
        assert!(session.check(Mode::MultipleChoice, &question));
    }

    #[test]
    fn test_out_of_range_choice_leaves_verdict() {
        let question = question();
        let mut session = ExerciseSession::new(&question);
        session.check_choices(&question);
        assert!(!session.toggle_choice(9));
        assert_eq!(session.choice_verdict(), Some(false));
    }

    #[test]
    fn test_moving_word_resets_verdict() {
        let question = question();
        let mut session = ExerciseSession::new(&question);
        assert!(!session.check_words(&question));

        assert!(session.place_word("Handrail"));
        assert!(!session.is_checked(Mode::WordBank));
        assert!(session.check_words(&question));

        assert!(session.unplace_word("Handrail"));
        assert_eq!(session.word_verdict(), None);

        assert!(session.place_word("Handrail"));
        session.check_words(&question);
        assert!(session.clear_words());
        assert_eq!(session.word_verdict(), None);
    }

    #[test]
    fn test_unknown_word_leaves_verdict() {
        let question = question();
        let mut session = ExerciseSession::new(&question);
        session.check_words(&question);
        assert!(!session.place_word("Seatbelt"));
        assert_eq!(session.word_verdict(), Some(false));
    }

    #[test]
    fn test_editing_field_resets_check() {
        let question = question();
        let mut session = ExerciseSession::new(&question);
        assert!(session.field_verdicts(&question).is_none());

        assert!(session.set_field(0, "handrail "));
        assert!(session.check(Mode::FreeResponse, &question));
        assert!(session.field_verdicts(&question).unwrap().all_correct());

        assert!(session.set_field(0, "rail"));
        assert!(!session.is_checked(Mode::FreeResponse));
        assert!(session.field_verdicts(&question).is_none());
        assert!(!session.set_field(1, "nope"));
    }

    #[test]
    fn test_fill_clears_fields_not_covered() {
        let question = Question::new(2, "Name both", "mast; carriage").with_field_count(2);
        let mut session = ExerciseSession::new(&question);
        session.fill_fields(vec!["mast".to_string(), "forks".to_string()]);
        session.check(Mode::FreeResponse, &question);

        session.fill_fields(vec!["carriage".to_string()]);
        assert_eq!(session.fields(), ["carriage", ""]);
        assert!(!session.is_checked(Mode::FreeResponse));

        session.fill_fields(vec!["mast".into(), "carriage".into(), "extra".into()]);
        assert_eq!(session.fields(), ["mast", "carriage"]);
        assert!(session.check(Mode::FreeResponse, &question));
    }

    #[test]
    fn test_modes_are_independent() {
        let question = question();
        let mut session = ExerciseSession::new(&question);
        session.check_words(&question);
        session.toggle_choice(0);
        assert!(session.is_checked(Mode::WordBank));
    }

    #[test]
    fn test_reveal_toggles() {
        let mut session = ExerciseSession::new(&question());
        assert!(session.toggle_reveal());
        assert!(!session.toggle_reveal());
    }
}
