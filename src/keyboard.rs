use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::utils::html::escape;

use crate::quiz::{Direction, Drill, Mode, Question};

pub const MODE_FREE_RESPONSE: &str = "✍️ Type answer";
pub const MODE_WORD_BANK: &str = "🧩 Word bank";
pub const MODE_MULTIPLE_CHOICE: &str = "☑️ Choices";
pub const CHECK: &str = "✅ Check";
pub const REVEAL: &str = "👁 Show answer";
pub const HIDE: &str = "🙈 Hide answer";
pub const PREV: &str = "⬅️ Prev";
pub const NEXT: &str = "Next ➡️";
pub const CLEAR: &str = "🧹 Clear";
pub const CREATE_ACCOUNT: &str = "📝 Create account";

const SELECTED: &str = "🔘 ";
const UNSELECTED: &str = "⚪ ";
const PLACE: &str = "➕ ";
const UNPLACE: &str = "➖ ";

const WORDS_PER_ROW: usize = 3;

/// What a message in the practice dialogue asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Switch(Mode),
    Check,
    ToggleReveal,
    Navigate(Direction),
    CreateAccount,
    ToggleChoice(usize),
    PlaceWord(String),
    UnplaceWord(String),
    ClearWords,
    /// One entry per line of a typed answer.
    Fill(Vec<String>),
    Unknown,
}

impl Action {
    pub fn parse(text: &str, mode: Mode) -> Self {
        match text {
            MODE_FREE_RESPONSE => return Action::Switch(Mode::FreeResponse),
            MODE_WORD_BANK => return Action::Switch(Mode::WordBank),
            MODE_MULTIPLE_CHOICE => return Action::Switch(Mode::MultipleChoice),
            CHECK => return Action::Check,
            REVEAL | HIDE => return Action::ToggleReveal,
            PREV => return Action::Navigate(Direction::Prev),
            NEXT => return Action::Navigate(Direction::Next),
            CREATE_ACCOUNT => return Action::CreateAccount,
            _ => {}
        }

        match mode {
            Mode::MultipleChoice => text
                .strip_prefix(SELECTED)
                .or_else(|| text.strip_prefix(UNSELECTED))
                .and_then(|rest| rest.split_once(". "))
                .and_then(|(number, _)| number.parse::<usize>().ok())
                .and_then(|number| number.checked_sub(1))
                .map_or(Action::Unknown, Action::ToggleChoice),
            Mode::WordBank => {
                if text == CLEAR {
                    Action::ClearWords
                } else if let Some(token) = text.strip_prefix(PLACE) {
                    Action::PlaceWord(token.to_string())
                } else if let Some(token) = text.strip_prefix(UNPLACE) {
                    Action::UnplaceWord(token.to_string())
                } else {
                    Action::Unknown
                }
            }
            Mode::FreeResponse => Action::Fill(text.lines().map(str::to_string).collect()),
        }
    }
}

fn choice_label(index: usize, option: &str, selected: bool) -> String {
    let mark = if selected { SELECTED } else { UNSELECTED };
    format!("{}{}. {}", mark, index + 1, option)
}

/// Button labels, row by row, for the drill's current state.
pub fn layout(question: &Question, drill: &Drill) -> Vec<Vec<String>> {
    let session = drill.session();
    let mut rows = Vec::new();

    let mut modes = vec![MODE_FREE_RESPONSE.to_string(), MODE_WORD_BANK.to_string()];
    if question.choices.is_some() {
        modes.push(MODE_MULTIPLE_CHOICE.to_string());
    }
    rows.push(modes);

    match drill.mode() {
        Mode::FreeResponse => {}
        Mode::WordBank => {
            let bank = session.word_bank();
            for chunk in bank.available().chunks(WORDS_PER_ROW) {
                rows.push(chunk.iter().map(|t| format!("{PLACE}{t}")).collect());
            }
            for chunk in bank.placed().chunks(WORDS_PER_ROW) {
                rows.push(chunk.iter().map(|t| format!("{UNPLACE}{t}")).collect());
            }
            if !bank.placed().is_empty() {
                rows.push(vec![CLEAR.to_string()]);
            }
        }
        Mode::MultipleChoice => {
            if let Some(choices) = &question.choices {
                let selected = session.selected_choices();
                for (i, option) in choices.options.iter().enumerate() {
                    rows.push(vec![choice_label(i, option, selected.contains(&i))]);
                }
            }
        }
    }

    let reveal = if session.reveal_answer() { HIDE } else { REVEAL };
    rows.push(vec![CHECK.to_string(), reveal.to_string()]);

    if drill.is_restricted() {
        rows.push(vec![CREATE_ACCOUNT.to_string()]);
    } else {
        rows.push(vec![PREV.to_string(), NEXT.to_string()]);
    }

    rows
}

pub fn markup(question: &Question, drill: &Drill) -> KeyboardMarkup {
    KeyboardMarkup::new(
        layout(question, drill)
            .into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

fn verdict_line(correct: bool) -> &'static str {
    if correct {
        "✅ Correct!"
    } else {
        "❌ Not quite, try again."
    }
}

/// HTML message showing the question and the state of the active mode.
pub fn render(question: &Question, drill: &Drill) -> String {
    let session = drill.session();
    let mut text = format!(
        "<b>Question {}/{}</b>\n{}\n\n",
        question.id,
        drill.cursor().total(),
        escape(&question.prompt)
    );

    match drill.mode() {
        Mode::FreeResponse => {
            if question.field_count > 1 {
                text.push_str(&format!(
                    "Type {} answers, one per line.\n",
                    question.field_count
                ));
            } else {
                text.push_str("Type your answer.\n");
            }
            let checked = session.is_checked(Mode::FreeResponse);
            let verdicts = session.field_verdicts(question);
            for (i, value) in session.fields().iter().enumerate() {
                if value.is_empty() && !checked {
                    continue;
                }
                let mark = match &verdicts {
                    Some(v) if v.is_correct(i) => " ✅",
                    Some(_) => " ❌",
                    None => "",
                };
                text.push_str(&format!("{}. {}{}\n", i + 1, escape(value), mark));
            }
            if let Some(verdicts) = verdicts {
                text.push_str(verdict_line(verdicts.all_correct()));
                text.push('\n');
            }
        }
        Mode::WordBank => {
            let guess = session.word_bank().guess();
            text.push_str("Build the answer from the words below.\n");
            text.push_str(&format!(
                "Your answer: <i>{}</i>\n",
                if guess.is_empty() { "…".to_string() } else { escape(&guess) }
            ));
            if let Some(correct) = session.word_verdict() {
                text.push_str(verdict_line(correct));
                text.push('\n');
            }
        }
        Mode::MultipleChoice => {
            if let Some(choices) = &question.choices {
                text.push_str(&format!(
                    "Select all {} correct options.\n",
                    choices.correct_count
                ));
            }
            if let Some(correct) = session.choice_verdict() {
                text.push_str(verdict_line(correct));
                text.push('\n');
            }
        }
    }

    if session.reveal_answer() {
        text.push_str(&format!(
            "\nAnswer: <b>{}</b>\n",
            escape(&question.canonical_answer)
        ));
    }
    if drill.is_restricted() {
        text.push_str("\n<i>This is a demo question. Create an account to unlock the full course.</i>");
    }

    text
}
