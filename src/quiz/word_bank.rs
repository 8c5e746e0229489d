use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::question::ANSWER_DELIMITER;

/// Canonical answer with every `;` segment trimmed and rejoined by single spaces.
pub fn normalize_canonical(answer: &str) -> String {
    answer
        .split(ANSWER_DELIMITER)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word tokens of a canonical answer, in answer order.
pub fn tokenize(answer: &str) -> Vec<String> {
    normalize_canonical(answer)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Pool of answer tokens split between the ones still on offer and the user's guess.
///
/// Tokens are only ever moved between the two sides, so together they always
/// hold exactly the tokens of the answer the bank was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordBank {
    available: Vec<String>,
    placed: Vec<String>,
}

impl WordBank {
    pub fn new(answer: &str) -> Self {
        Self {
            available: tokenize(answer),
            placed: Vec::new(),
        }
    }

    /// Same tokens as [`WordBank::new`], offered in an order fixed by `seed`.
    pub fn shuffled(answer: &str, seed: u64) -> Self {
        let mut bank = Self::new(answer);
        bank.available.shuffle(&mut StdRng::seed_from_u64(seed));
        bank
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn placed(&self) -> &[String] {
        &self.placed
    }

    /// The user's current guess, tokens joined by single spaces.
    pub fn guess(&self) -> String {
        self.placed.join(" ")
    }

    /// Moves `available[index]` to the end of the guess.
    pub fn place(&mut self, index: usize) -> bool {
        if index >= self.available.len() {
            return false;
        }
        let token = self.available.remove(index);
        self.placed.push(token);
        true
    }

    /// Moves `placed[index]` back to the end of the available tokens.
    pub fn unplace(&mut self, index: usize) -> bool {
        if index >= self.placed.len() {
            return false;
        }
        let token = self.placed.remove(index);
        self.available.push(token);
        true
    }

    pub fn place_token(&mut self, token: &str) -> bool {
        match self.available.iter().position(|t| t == token) {
            Some(index) => self.place(index),
            None => false,
        }
    }

    pub fn unplace_token(&mut self, token: &str) -> bool {
        match self.placed.iter().rposition(|t| t == token) {
            Some(index) => self.unplace(index),
            None => false,
        }
    }

    /// Returns every placed token to the pool. `false` if nothing was placed.
    pub fn clear(&mut self) -> bool {
        if self.placed.is_empty() {
            return false;
        }
        self.available.append(&mut self.placed);
        true
    }
}
