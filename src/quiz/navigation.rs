use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Demo access: one fixed question, no navigation.
    Restricted,
    /// The whole ordered question list.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(u32),
    /// Already at the first or last question.
    Stayed,
    /// Navigation is not available under restricted access.
    AuthenticationRequired,
}

/// Position in an ordered question list with ids `1..=total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    current: u32,
    total: u32,
    access: AccessLevel,
}

impl Cursor {
    /// `current` is clamped into `[1, total]`.
    pub fn new(current: u32, total: u32, access: AccessLevel) -> Self {
        let total = total.max(1);
        Self {
            current: current.clamp(1, total),
            total,
            access,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn access(&self) -> AccessLevel {
        self.access
    }

    pub fn grant_full_access(&mut self) {
        self.access = AccessLevel::Full;
    }

    pub fn advance(&mut self, direction: Direction) -> Advance {
        if self.access == AccessLevel::Restricted {
            return Advance::AuthenticationRequired;
        }

        let target = match direction {
            Direction::Prev => self.current.saturating_sub(1),
            Direction::Next => self.current.saturating_add(1),
        };
        if target < 1 || target > self.total {
            return Advance::Stayed;
        }

        self.current = target;
        Advance::Moved(target)
    }
}
