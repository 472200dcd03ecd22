// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (SQLite, the status webhook)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::ledger::{should_record, LedgerService};
use crate::core::presence::PresenceController;
use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use crate::infra::ledger::SqliteLedgerStore;
use crate::infra::status::WebhookStatusReporter;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Every qualifying message earns XP here, before command dispatch.
async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        let guild_id = new_message.guild_id.map(|id| id.get());

        // Ignore bot messages (including our own) and DMs
        if let Some(guild_id) = should_record(new_message.author.bot, guild_id) {
            let user_id = new_message.author.id.get();

            // Losing one increment is acceptable, so storage errors are logged and dropped.
            if let Err(e) = data.ledger.record_activity(guild_id, user_id).await {
                tracing::warn!(guild_id, user_id, "Dropped XP update: {}", e);
            }
        }
    }

    Ok(())
}

/// The single error boundary for commands. Handlers propagate with `?` and
/// end up here.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                user_id = ctx.author().id.get(),
                "Command failed: {}",
                error
            );
            if let Err(e) = ctx.say("❌ Something went wrong.").await {
                tracing::warn!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    // Storage failures are only fatal here, at startup.
    let ledger_db_path = config.ledger_db_path();
    let ledger_store = SqliteLedgerStore::new(&ledger_db_path.to_string_lossy())
        .await
        .with_context(|| format!("Failed to open ledger at {}", ledger_db_path.display()))?;
    let ledger_service = Arc::new(LedgerService::new(ledger_store));

    // No secret, no webhook.
    let reporter =
        WebhookStatusReporter::from_secret(&config.webhook_url, config.webhook_secret.as_deref())
            .context("Failed to build status webhook client")?;
    if reporter.is_none() {
        tracing::info!("WEBHOOK_SECRET not set, status webhook disabled");
    }
    let presence_controller = Arc::new(PresenceController::new(config.presence.clone(), reporter));

    let data = Data {
        ledger: Arc::clone(&ledger_service),
        presence: Arc::clone(&presence_controller),
        access: config.access,
        link_url: config.link_url.clone(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read prefix commands
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("$".into()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                // Only the slash commands are registered, prefix commands need no registration.
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Slash commands synced");

                presence::on_ready(ctx, &data).await;
                tracing::info!("{} is online", ready.user.name);

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    tracing::info!("Bot stopped");
    Ok(())
}
