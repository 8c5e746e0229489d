use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub questions_path: String,
    pub database_path: String,
    pub demo_question_id: u32,
    pub upsell_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            questions_path: try_load("QUESTIONS_PATH", "questions.json")?,
            database_path: try_load("DATABASE_PATH", "db.sqlite")?,
            demo_question_id: try_load("DEMO_QUESTION_ID", "1")?,
            upsell_delay: Duration::from_millis(try_load("UPSELL_DELAY_MS", "1500")?),
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, &value)
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value {value:?}: {e}");
        AppError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}
