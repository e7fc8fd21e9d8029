use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use audioscribe::commands::CommandRouter;
use audioscribe::connector::{AttachmentMeta, ChatId, DiscordConnector, InboundMessage};
use audioscribe::core::Config;
use audioscribe::dispatcher::Dispatcher;
use audioscribe::features::transcription::{Pipeline, WhisperClient};

/// Fixed attachment name Discord gives voice messages
const VOICE_MESSAGE_FILENAME: &str = "voice-message.ogg";

struct Handler {
    dispatcher: Arc<Dispatcher>,
}

impl Handler {
    /// Convert a serenity message into the platform-neutral shape
    fn to_inbound(msg: &Message) -> InboundMessage {
        let attachment = msg.attachments.first().map(|a| AttachmentMeta {
            filename: a.filename.clone(),
            mime_type: a.content_type.clone(),
            is_voice_note: a.filename == VOICE_MESSAGE_FILENAME,
            download_url: a.url.clone(),
        });

        let received_at = chrono::DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(chrono::Utc::now);

        InboundMessage {
            chat: ChatId(msg.channel_id.0),
            user_id: msg.author.id.0,
            text: msg.content.clone(),
            attachment,
            received_at,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        // Detached run; dispatch must stay free for the next message
        let _ = self.dispatcher.dispatch(Self::to_inbound(&msg)).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting audioscribe bot...");

    tokio::fs::create_dir_all(&config.work_dir).await?;
    info!("Working directory: {}", config.work_dir);

    let http = Arc::new(Http::new(&config.discord_token));
    let connector = Arc::new(DiscordConnector::new(http)?);
    let transcriber = Arc::new(WhisperClient::new(
        config.openai_api_key.clone(),
        config.whisper_model.clone(),
    ));

    let pipeline = Pipeline::new(connector.clone(), transcriber, &config.work_dir);
    let dispatcher = Arc::new(Dispatcher::new(connector, CommandRouter::new(), pipeline));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler { dispatcher })
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
