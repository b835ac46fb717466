//! Bot front end: Discord gateway glue around the dispatch engine.

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use banter::core::Config;
use banter::engine::{CoreError, Engine, InboundMessage};
use banter::features::conversation::ConversationStore;
use banter::features::personas::Mode;
use banter::features::quiz::{QuizCatalog, QuizSessionManager};
use banter::services::discord::DiscordNotifier;
use banter::services::openai::OpenAiGenerator;
use banter::services::{notify_best_effort, DeliveryTarget};

const COMMAND_PREFIX: char = '!';

struct Handler {
    engine: Arc<Engine>,
    notifier: Arc<DiscordNotifier>,
    allowed_channel_id: Option<u64>,
}

impl Handler {
    /// Render a hook result: errors carry their own user-facing text.
    fn render(result: Result<String, CoreError>) -> String {
        result.unwrap_or_else(|e| e.to_string())
    }

    fn handle_command(&self, command: &str, msg: &Message) -> String {
        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or_default() {
            "quiz" => match (parts.next(), parts.next()) {
                (Some(genre), Some(difficulty)) => Self::render(self.engine.on_quiz_start(
                    genre,
                    difficulty,
                    msg.channel_id.0,
                    msg.author.id.0,
                )),
                _ => "Usage: `!quiz <genre> <difficulty>`".to_string(),
            },
            "stopquiz" => Self::render(self.engine.on_quiz_stop()),
            "hint" => Self::render(self.engine.on_hint()),
            "mode" => match parts.next() {
                Some(key) => Self::render(
                    self.engine
                        .on_mode_change(msg.author.id.0, key)
                        .map(|mode| format!("Mode set to `{mode}`.")),
                ),
                None => format!("Usage: `!mode <key>` where key is one of: {}", Mode::available_keys()),
            },
            "titles" => self.engine.on_titles(msg.author.id.0),
            _ => "Commands: `!quiz <genre> <difficulty>`, `!stopquiz`, `!hint`, `!mode <key>`, `!titles`"
                .to_string(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let is_direct = msg.guild_id.is_none();
        if !is_direct {
            if let Some(allowed) = self.allowed_channel_id {
                if msg.channel_id.0 != allowed {
                    return;
                }
            }
        }

        let content = msg.content.trim().to_string();
        let reply = if let Some(command) = content.strip_prefix(COMMAND_PREFIX) {
            Some(self.handle_command(command, &msg))
        } else {
            let event = InboundMessage {
                sender_id: msg.author.id.0,
                sender_name: msg.author.name.clone(),
                text: content,
                channel_id: msg.channel_id.0,
                is_direct,
            };
            match self.engine.on_message(&event).await {
                Ok(reply) => reply,
                Err(e) => Some(e.to_string()),
            }
        };

        if let Some(text) = reply {
            notify_best_effort(
                self.notifier.as_ref(),
                DeliveryTarget::Channel(msg.channel_id.0),
                &text,
                Uuid::new_v4(),
            )
            .await;
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Connected as {}", ready.user.name);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads its key from env vars, not from our config.
    // Set both OPENAI_API_KEY and OPENAI_KEY for compatibility.
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Banter...");

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading question catalog from {}", path.display());
            QuizCatalog::load(path)?
        }
        None => QuizCatalog::embedded()?,
    };

    let http = Arc::new(Http::new(&config.discord_token));
    let notifier = Arc::new(DiscordNotifier::new(http));
    let generator = Arc::new(OpenAiGenerator::new(config.openai_model.clone()));

    let engine = Arc::new(Engine::new(
        ConversationStore::new(Duration::from_secs(config.cooldown_secs)),
        QuizSessionManager::new(catalog, config.quiz_round_cap),
        generator,
        notifier.clone(),
        config.owner_id,
    ));

    let handler = Handler {
        engine,
        notifier,
        allowed_channel_id: config.allowed_channel_id,
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("client creation failed: {e}")
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("gateway connection failed: {e}"))
}
