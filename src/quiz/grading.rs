use std::collections::BTreeSet;

use super::question::Question;
use super::word_bank::normalize_canonical;

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Correct iff exactly the options `[0, correct_count)` are selected. No partial credit.
pub fn grade_multiple_choice(question: &Question, selected: &BTreeSet<usize>) -> bool {
    let Some(choices) = &question.choices else {
        return false;
    };
    selected.len() == choices.correct_count && selected.iter().all(|&i| choices.is_correct(i))
}

/// Correct iff the placed tokens spell the canonical answer, ignoring case.
pub fn grade_word_bank(question: &Question, placed: &[String]) -> bool {
    normalize_canonical(&question.canonical_answer).to_lowercase() == placed.join(" ").to_lowercase()
}

/// Per-field outcome of a free-response check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVerdicts(Vec<bool>);

impl FieldVerdicts {
    pub fn all_correct(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&correct| correct)
    }

    pub fn is_correct(&self, field: usize) -> bool {
        self.0.get(field).copied().unwrap_or(false)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}

/// Grades every field independently against its expected answer, trimmed and case-folded.
/// A field without an expected answer or without input is incorrect.
pub fn grade_free_response(question: &Question, fields: &[String]) -> FieldVerdicts {
    let verdicts = (0..question.field_count)
        .map(|i| match (question.answers.expected(i), fields.get(i)) {
            (Some(expected), Some(input)) => fold(input) == fold(expected),
            _ => false,
        })
        .collect();
    FieldVerdicts(verdicts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn choice_question() -> Question {
        Question::new(1, "Which are part of a pre-shift check?", "")
            .with_choices(vec!["Tyres", "Horn", "Forks", "Radio"], 3)
    }

    #[test]
    fn test_multiple_choice_exact_selection() {
        let question = choice_question();
        assert!(grade_multiple_choice(&question, &BTreeSet::from([0, 1, 2])));
    }

    #[test]
    fn test_multiple_choice_over_and_under_selection() {
        let question = choice_question();
        assert!(!grade_multiple_choice(&question, &BTreeSet::from([0, 1, 2, 3])));
        assert!(!grade_multiple_choice(&question, &BTreeSet::from([0, 1])));
        assert!(!grade_multiple_choice(&question, &BTreeSet::from([0, 1, 3])));
        assert!(!grade_multiple_choice(&question, &BTreeSet::new()));
    }

    #[test]
    fn test_multiple_choice_without_options_is_incorrect() {
        let question = Question::new(1, "p", "a");
        assert!(!grade_multiple_choice(&question, &BTreeSet::new()));
    }

    #[test]
    fn test_word_bank_exact_order_case_insensitive() {
        let question = Question::new(1, "p", "Handrail");
        assert!(grade_word_bank(&question, &strings(&["handrail"])));
        assert!(!grade_word_bank(&question, &[]));

        let question = Question::new(2, "p", "Lower the forks; tilt back").with_field_count(2);
        assert!(grade_word_bank(
            &question,
            &strings(&["lower", "the", "forks", "tilt", "back"])
        ));
        assert!(!grade_word_bank(
            &question,
            &strings(&["the", "lower", "forks", "tilt", "back"])
        ));
        assert!(!grade_word_bank(&question, &strings(&["lower", "the", "forks"])));
    }

    #[test]
    fn test_free_response_fields_are_independent() {
        let question = Question::new(1, "p", "foo; bar").with_field_count(2);

        let verdicts = grade_free_response(&question, &strings(&["Foo", " bar "]));
        assert!(verdicts.all_correct());

        let verdicts = grade_free_response(&question, &strings(&["foo", "baz"]));
        assert!(verdicts.is_correct(0));
        assert!(!verdicts.is_correct(1));
        assert!(!verdicts.all_correct());
    }

    #[test]
    fn test_free_response_prefers_acceptable_answers() {
        let question = Question::new(1, "p", "unused; unused")
            .with_field_count(2)
            .with_acceptable_answers(vec!["Mast", "Carriage"]);
        let verdicts = grade_free_response(&question, &strings(&["mast", "CARRIAGE"]));
        assert_eq!(verdicts.iter().collect::<Vec<_>>(), vec![true, true]);
    }

    #[test]
    fn test_free_response_missing_target_or_input_is_incorrect() {
        let question = Question::new(1, "p", "only").with_field_count(2);
        let verdicts = grade_free_response(&question, &strings(&["only", "extra"]));
        assert_eq!(verdicts.iter().collect::<Vec<_>>(), vec![true, false]);

        let question = Question::new(1, "p", "a; b").with_field_count(2);
        assert!(!grade_free_response(&question, &strings(&["a"])).all_correct());
    }

    #[test]
    fn test_empty_input_only_matches_empty_answer() {
        let question = Question::new(1, "p", "Handrail");
        assert!(!grade_free_response(&question, &strings(&[""])).all_correct());

        let question = Question::new(1, "p", "");
        assert!(grade_free_response(&question, &strings(&["  "])).all_correct());
    }
}
