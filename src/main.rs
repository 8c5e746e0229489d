mod config;
mod error;
mod keyboard;
mod quiz;
mod upsell;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use error::AppError;
use keyboard::Action;
use log::{debug, error, info, warn};
use quiz::{Advance, Drill, QuestionBank};
use rand::Rng;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardRemove, ParseMode},
};
use upsell::UpsellDebouncer;

type DrillDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type DrillStorage = Arc<ErasedStorage<State>>;
type Upsell = Arc<UpsellDebouncer<ChatId>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveFullName {
        drill: Drill,
    },
    Practice {
        drill: Drill,
    },
}

#[tokio::main]
async fn main() {
    let env_file = dotenv();
    pretty_env_logger::init();
    if env_file.is_err() {
        info!("No .env file found, reading configuration from the environment");
    }

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::load()?;

    info!("Loading question bank from {}", config.questions_path);
    let bank = Arc::new(QuestionBank::open(&config.questions_path)?);
    bank.require(config.demo_question_id)?;
    info!("Loaded {} questions", bank.len());

    info!("Opening dialogue storage at {}", config.database_path);
    let storage: DrillStorage = SqliteStorage::open(&config.database_path, Json)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .erase();

    let upsell: Upsell = Arc::new(UpsellDebouncer::new(config.upsell_delay));
    let config = Arc::new(config);

    info!("Starting forklift drill bot...");
    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveFullName { drill }].endpoint(receive_full_name))
            .branch(dptree::case![State::Practice { drill }].endpoint(practice)),
    )
    .dependencies(dptree::deps![storage, bank, upsell, config])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const GREETING_TEXT: &str = "Hi! I'm the forklift licence drill bot. Here's a demo question to get you started. \
Answer it by typing, by building it from a word bank, or by picking options where a question has them.";
const NAME_PROMPT: &str = "Great! What's your name?";
const UPSELL_TEXT: &str = "Enjoying the drill? Create an account to unlock every question in the course.";

async fn show(bot: &Bot, chat_id: ChatId, bank: &QuestionBank, drill: &Drill) -> HandlerResult {
    let question = drill.question(bank)?;
    bot.send_message(chat_id, keyboard::render(question, drill))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard::markup(question, drill))
        .await?;
    Ok(())
}

// Prompts after the debounce window, once per burst of signals from the same chat
fn schedule_upsell(bot: Bot, chat_id: ChatId, upsell: Upsell) {
    let ticket = upsell.signal(chat_id);
    tokio::spawn(async move {
        if !upsell.wait(&ticket).await {
            return;
        }
        if let Err(e) = bot.send_message(chat_id, UPSELL_TEXT).await {
            warn!("Failed to send upsell prompt to chat {}: {}", chat_id.0, e);
        }
    });
}

async fn start(
    bot: Bot,
    dialogue: DrillDialogue,
    msg: Message,
    bank: Arc<QuestionBank>,
    config: Arc<Config>,
) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    let drill = Drill::demo(&bank, config.demo_question_id, rand::thread_rng().gen())?;
    show(&bot, msg.chat.id, &bank, &drill).await?;

    dialogue.update(State::Practice { drill }).await?;
    Ok(())
}

async fn receive_full_name(
    bot: Bot,
    dialogue: DrillDialogue,
    mut drill: Drill,
    msg: Message,
    bank: Arc<QuestionBank>,
    upsell: Upsell,
) -> HandlerResult {
    match msg.text().map(str::trim).filter(|name| !name.is_empty()) {
        Some(full_name) => {
            bot.send_message(
                msg.chat.id,
                format!("Nice to meet you, {}! Every question is unlocked now.", full_name),
            )
            .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please enter your name (as text)")
                .await?;
            return Ok(());
        }
    }

    drill.grant_full_access();
    upsell.cancel(&msg.chat.id);
    info!("Chat {} created an account", msg.chat.id.0);

    show(&bot, msg.chat.id, &bank, &drill).await?;
    dialogue.update(State::Practice { drill }).await?;
    Ok(())
}

async fn practice(
    bot: Bot,
    dialogue: DrillDialogue,
    mut drill: Drill,
    msg: Message,
    bank: Arc<QuestionBank>,
    upsell: Upsell,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please answer with text or use the keyboard")
            .await?;
        return Ok(());
    };

    let action = Action::parse(text, drill.mode());
    debug!("Chat {}: {:?}", msg.chat.id.0, action);

    match action {
        Action::Switch(mode) => {
            if !drill.set_mode(mode, &bank)? {
                bot.send_message(msg.chat.id, "This question has no options to choose from.")
                    .await?;
            }
        }
        Action::Check => {
            let outcome = drill.check(&bank)?;
            debug!(
                "Chat {} checked question {} in {:?}: correct = {}",
                msg.chat.id.0,
                drill.cursor().current(),
                outcome.mode,
                outcome.correct
            );
            if outcome.upsell {
                schedule_upsell(bot.clone(), msg.chat.id, upsell);
            }
        }
        Action::ToggleReveal => {
            drill.session_mut().toggle_reveal();
        }
        Action::Navigate(direction) => match drill.advance(direction, &bank)? {
            Advance::Moved(id) => debug!("Chat {} moved to question {}", msg.chat.id.0, id),
            Advance::Stayed => {
                bot.send_message(msg.chat.id, "There are no more questions that way.")
                    .await?;
                return Ok(());
            }
            Advance::AuthenticationRequired => {
                schedule_upsell(bot.clone(), msg.chat.id, upsell);
                return Ok(());
            }
        },
        Action::CreateAccount => {
            bot.send_message(msg.chat.id, NAME_PROMPT)
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.update(State::ReceiveFullName { drill }).await?;
            return Ok(());
        }
        Action::ToggleChoice(index) => {
            if !drill.session_mut().toggle_choice(index) {
                warn!("Chat {} toggled unknown option {}", msg.chat.id.0, index);
            }
        }
        Action::PlaceWord(token) => {
            drill.session_mut().place_word(&token);
        }
        Action::UnplaceWord(token) => {
            drill.session_mut().unplace_word(&token);
        }
        Action::ClearWords => {
            drill.session_mut().clear_words();
        }
        Action::Fill(lines) => {
            drill.session_mut().fill_fields(lines);
        }
        Action::Unknown => {
            bot.send_message(msg.chat.id, "Please use the keyboard buttons")
                .await?;
            return Ok(());
        }
    }

    show(&bot, msg.chat.id, &bank, &drill).await?;
    dialogue.update(State::Practice { drill }).await?;
    Ok(())
}
