pub mod bank;
pub mod drill;
pub mod grading;
pub mod navigation;
pub mod question;
pub mod session;
pub mod word_bank;

pub use bank::QuestionBank;
pub use drill::Drill;
pub use navigation::{AccessLevel, Advance, Cursor, Direction};
pub use question::Question;
pub use session::{ExerciseSession, Mode};
