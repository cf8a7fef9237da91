//! Telegram bot module - log workouts and move backups from a chat

use std::sync::Arc;
use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatId, Document, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId},
    utils::command::BotCommands,
    dispatching::dialogue::{InMemStorage, Dialogue},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::Database;
use crate::format::format_last_trained;
use crate::muscles::{Muscle, MAIN_GROUPS};
use crate::session::{superset_options, Pick, SupersetSelection};
use crate::tracker::Tracker;

type MyDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SharedTracker = Arc<Mutex<Tracker>>;

/// Telegram rejects text messages longer than this
const MESSAGE_LIMIT: usize = 4096;
/// Largest backup file accepted by /import
const MAX_BACKUP_BYTES: u32 = 1024 * 1024;
const BACKUP_FILE_NAME: &str = "supersets.json";

/// How a backup code is sent back to the chat
#[derive(Debug)]
enum BackupDelivery {
    Text(String),
    Document(Vec<u8>),
}

fn backup_delivery(code: String) -> BackupDelivery {
    if code.chars().count() <= MESSAGE_LIMIT {
        BackupDelivery::Text(code)
    } else {
        BackupDelivery::Document(code.into_bytes())
    }
}

/// Main muscle carried by a `main:` callback
fn parse_main_callback(data: &str) -> Option<Muscle> {
    data.strip_prefix("main:")
        .and_then(|s| s.parse::<Muscle>().ok())
        .filter(Muscle::is_main)
}

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    /// Main muscle chosen, superset picker open
    PickingSupersets {
        main: Muscle,
        selection: SupersetSelection,
    },
    /// Next message is a backup code, as text or a file
    WaitingForImport,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "Start")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Recommended workout")]
    Next,
    #[command(description = "Log today's workout")]
    Log,
    #[command(description = "Workout history")]
    History,
    #[command(description = "Backup code")]
    Export,
    #[command(description = "Restore from a backup code")]
    Import,
}

/// Keyboard with one button per main muscle group
fn make_main_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = MAIN_GROUPS
        .chunks(2)
        .map(|chunk| {
            chunk.iter().map(|m| {
                InlineKeyboardButton::callback(m.label(), format!("main:{}", m.name()))
            }).collect()
        })
        .collect();

    InlineKeyboardMarkup::new(buttons)
}

/// Superset picker keyboard reflecting the current selection
fn make_superset_keyboard(main: Muscle, selection: &SupersetSelection) -> InlineKeyboardMarkup {
    let none_selected = matches!(selection, SupersetSelection::NoneSelected);
    let none_label = if none_selected { "✅ None" } else { "None" };
    let mut rows = vec![vec![InlineKeyboardButton::callback(none_label, "ss:none")]];

    for (_, muscles) in superset_options(main) {
        rows.push(
            muscles.iter().map(|m| {
                let label = if selection.is_selected(*m) {
                    format!("✅ {}", m.label())
                } else {
                    m.label().to_string()
                };
                InlineKeyboardButton::callback(label, format!("ss:{}", m.name()))
            }).collect(),
        );
    }

    rows.push(vec![
        InlineKeyboardButton::callback("Cancel", "cancel"),
        InlineKeyboardButton::callback("Save Workout", "save"),
    ]);
    InlineKeyboardMarkup::new(rows)
}

fn recommendation_text(tracker: &Tracker) -> String {
    let rec = tracker.recommendation();
    let supersets: Vec<_> = rec.supersets.iter().map(|(m, _)| m.name()).collect();
    format!(
        "📅 Recommended Workout\n\n{} (last trained: {})\nSuggested supersets: {}",
        rec.main.label(),
        rec.main_days,
        supersets.join(", ")
    )
}

fn history_text(tracker: &Tracker) -> String {
    let mut text = String::from("🕒 Workout History\n\n");
    for status in tracker.report() {
        text.push_str(&format!(
            "• {} - {}\n",
            status.muscle.label(),
            format_last_trained(status.last_trained, status.days)
        ));
    }
    text
}

/// Start the Telegram bot
pub async fn run_bot(token: String, db_path: &str) -> anyhow::Result<()> {
    let bot = Bot::new(token);
    let tracker: SharedTracker = Arc::new(Mutex::new(Tracker::open(Database::open(db_path)?)?));

    let handler = dptree::entry()
        .enter_dialogue::<Update, InMemStorage<State>, State>()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            Update::filter_message()
                .endpoint(handle_message),
        )
        .branch(
            Update::filter_callback_query()
                .endpoint(handle_callback),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<State>::new(), tracker])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: MyDialogue,
    tracker: SharedTracker,
) -> HandlerResult {
    match cmd {
        Command::Start => {
            let text = "💪 supersets\n\n\
                Workout rotation tracker\n\n\
                /next - recommended workout\n\
                /log - log today's workout\n\
                /history - last trained dates\n\
                /export - backup code\n\
                /import - restore from backup";
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }

        Command::Next => {
            let text = recommendation_text(&*tracker.lock().await);
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Log => {
            dialogue.reset().await?;
            bot.send_message(msg.chat.id, "Log Today's Workout:")
                .reply_markup(make_main_keyboard())
                .await?;
        }

        Command::History => {
            let text = history_text(&*tracker.lock().await);
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Export => {
            let code = tracker.lock().await.export()?;
            bot.send_message(
                msg.chat.id,
                "Copy this code and save it somewhere safe. You can use it to restore your data later.",
            ).await?;
            match backup_delivery(code) {
                BackupDelivery::Text(code) => {
                    bot.send_message(msg.chat.id, code).await?;
                }
                BackupDelivery::Document(bytes) => {
                    let file = InputFile::memory(bytes).file_name(BACKUP_FILE_NAME);
                    bot.send_document(msg.chat.id, file).await?;
                }
            }
        }

        Command::Import => {
            dialogue.update(State::WaitingForImport).await?;
            bot.send_message(msg.chat.id, "Paste your backup code or send the backup file:").await?;
        }
    }

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    tracker: SharedTracker,
) -> HandlerResult {
    let target = q.message.as_ref().map(|m| (m.chat().id, m.id()));

    if let (Some(data), Some((chat_id, message_id))) = (q.data.as_deref(), target) {
        let state = dialogue.get().await?.unwrap_or_default();

        if let Some(main) = parse_main_callback(data) {
            let selection = SupersetSelection::Empty;
            show_picker(&bot, chat_id, message_id, main, &selection).await?;
            dialogue.update(State::PickingSupersets { main, selection }).await?;
        } else if let State::PickingSupersets { main, mut selection } = state {
            match data {
                "save" => {
                    let record = tracker.lock().await.log_workout(main, &selection)?;
                    let text = match record {
                        Some(r) => {
                            let names: Vec<_> = r.superset_muscles.iter().map(|m| m.name()).collect();
                            format!("Saved {} with {}", main.name(), names.join(", "))
                        }
                        None => format!("Saved {}", main.name()),
                    };
                    bot.edit_message_text(chat_id, message_id, text).await?;
                    dialogue.reset().await?;
                }
                "cancel" => {
                    bot.edit_message_text(chat_id, message_id, "Cancelled").await?;
                    dialogue.reset().await?;
                }
                _ => {
                    if let Some(pick) = data.strip_prefix("ss:").and_then(|s| s.parse::<Pick>().ok()) {
                        selection.pick(pick);
                        bot.edit_message_reply_markup(chat_id, message_id)
                            .reply_markup(make_superset_keyboard(main, &selection))
                            .await?;
                        dialogue.update(State::PickingSupersets { main, selection }).await?;
                    }
                }
            }
        } else {
            warn!("Stale callback {:?} in chat {}", data, chat_id);
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

async fn show_picker(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    main: Muscle,
    selection: &SupersetSelection,
) -> HandlerResult {
    bot.edit_message_text(chat_id, message_id, format!("Select Supersets for {}", main.name()))
        .reply_markup(make_superset_keyboard(main, selection))
        .await?;
    Ok(())
}

/// Fetch an uploaded backup file. The inner error is a reply for the user.
async fn download_backup(bot: &Bot, doc: &Document) -> Result<Result<String, String>, Box<dyn std::error::Error + Send + Sync>> {
    if doc.file.size > MAX_BACKUP_BYTES {
        return Ok(Err("Backup file is too large".to_string()));
    }

    let file = bot.get_file(doc.file.id.clone()).await?;
    let mut bytes = Vec::new();
    bot.download_file(&file.path, &mut bytes).await?;

    Ok(String::from_utf8(bytes).map_err(|_| "Backup file is not text".to_string()))
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    tracker: SharedTracker,
) -> HandlerResult {
    let state = dialogue.get().await?.unwrap_or_default();

    match state {
        State::WaitingForImport => {
            let raw = if let Some(text) = msg.text() {
                text.to_string()
            } else if let Some(doc) = msg.document() {
                match download_backup(&bot, doc).await? {
                    Ok(raw) => raw,
                    Err(reason) => {
                        bot.send_message(msg.chat.id, reason).await?;
                        return Ok(());
                    }
                }
            } else {
                bot.send_message(msg.chat.id, "Paste the backup code or send the backup file").await?;
                return Ok(());
            };

            let result = tracker.lock().await.import(&raw);
            match result {
                Ok(()) => {
                    info!("Chat {} restored a backup", msg.chat.id);
                    bot.send_message(msg.chat.id, "Data imported successfully!").await?;
                }
                Err(e) => {
                    bot.send_message(msg.chat.id, e.to_string()).await?;
                }
            }
            dialogue.reset().await?;
        }

        State::PickingSupersets { .. } => {
            bot.send_message(msg.chat.id, "Use the buttons above, or /log to start over")
                .await?;
        }

        State::Start => {
            bot.send_message(msg.chat.id, "Send /next to see what to train")
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callbacks(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_short_backup_goes_as_text() {
        let code = "x".repeat(MESSAGE_LIMIT);
        assert!(matches!(backup_delivery(code), BackupDelivery::Text(_)));
    }

    #[test]
    fn test_long_backup_goes_as_document() {
        let mut tracker = Tracker::open(Database::open_in_memory().unwrap()).unwrap();
        let selection = SupersetSelection::Partial(vec![Muscle::Biceps, Muscle::Triceps]);
        for _ in 0..100 {
            tracker.log_workout(Muscle::Chest, &selection).unwrap();
        }
        let code = tracker.export().unwrap();
        assert!(code.chars().count() > MESSAGE_LIMIT);

        match backup_delivery(code.clone()) {
            BackupDelivery::Document(bytes) => assert_eq!(bytes, code.into_bytes()),
            other => panic!("expected a document, got {:?}", other),
        }
    }

    #[test]
    fn test_main_callback_only_accepts_main_groups() {
        assert_eq!(parse_main_callback("main:legs"), Some(Muscle::Legs));
        assert_eq!(parse_main_callback("main:biceps"), None);
        assert_eq!(parse_main_callback("main:glutes"), None);
        assert_eq!(parse_main_callback("ss:chest"), None);
    }

    #[test]
    fn test_main_keyboard_offers_main_groups() {
        let data = callbacks(&make_main_keyboard());
        assert_eq!(data, vec!["main:chest", "main:back", "main:shoulders", "main:legs"]);
    }

    #[test]
    fn test_superset_keyboard_hides_main() {
        let data = callbacks(&make_superset_keyboard(Muscle::Shoulders, &SupersetSelection::Empty));
        assert!(data.contains(&"ss:none".to_string()));
        assert!(data.contains(&"ss:chest".to_string()));
        assert!(!data.contains(&"ss:shoulders".to_string()));
        assert_eq!(data.last().map(String::as_str), Some("save"));
    }

    #[test]
    fn test_superset_keyboard_marks_selection() {
        let selection = SupersetSelection::Partial(vec![Muscle::Core]);
        let markup = make_superset_keyboard(Muscle::Chest, &selection);
        let labels: Vec<_> = markup.inline_keyboard.iter().flatten().map(|b| b.text.clone()).collect();
        assert!(labels.contains(&"✅ Core".to_string()));
        assert!(labels.contains(&"Biceps".to_string()));
        assert!(labels.contains(&"None".to_string()));
    }
}
