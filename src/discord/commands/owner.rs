// Owner-only commands for steering the bot's presence and lifecycle.
//
// All of these are prefix commands that only run in a DM with the owner.

use crate::core::presence::StatusMode;
use crate::discord::access::{authorize, require_direct_message};
use crate::discord::{Context, Error};

/// Both gates every owner command goes through: the owner account, then DM only.
async fn owner_in_dm(ctx: Context<'_>) -> Result<bool, Error> {
    let owner = ctx.data().access.owner();
    Ok(authorize(ctx, &owner).await? && require_direct_message(ctx).await?)
}

/// Change the status line.
#[poise::command(prefix_command, category = "Owner")]
pub async fn setstatus(ctx: Context<'_>, #[rest] text: String) -> Result<(), Error> {
    if !owner_in_dm(ctx).await? {
        return Ok(());
    }

    ctx.data()
        .presence
        .set_activity(ctx.serenity_context(), text)
        .await;
    ctx.say("✅ Status updated").await?;
    Ok(())
}

/// Change the stream URL shown with the status.
#[poise::command(prefix_command, category = "Owner")]
pub async fn seturl(ctx: Context<'_>, url: String) -> Result<(), Error> {
    if !owner_in_dm(ctx).await? {
        return Ok(());
    }

    ctx.data()
        .presence
        .set_stream_url(ctx.serenity_context(), url)
        .await;
    ctx.say("✅ URL updated").await?;
    Ok(())
}

/// Switch between online, idle and do-not-disturb.
#[poise::command(prefix_command, category = "Owner")]
pub async fn setpresence(ctx: Context<'_>, mode: String) -> Result<(), Error> {
    if !owner_in_dm(ctx).await? {
        return Ok(());
    }

    let mode = match mode.parse::<StatusMode>() {
        Ok(mode) => mode,
        Err(e) => {
            ctx.say(format!("❌ {}", e)).await?;
            return Ok(());
        }
    };

    ctx.data()
        .presence
        .set_status_mode(ctx.serenity_context(), mode)
        .await;
    ctx.say("✅ Presence updated").await?;
    Ok(())
}

/// Report offline and stop the bot.
#[poise::command(prefix_command, category = "Owner")]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    if !owner_in_dm(ctx).await? {
        return Ok(());
    }

    ctx.say("📴 Shutting down...").await?;
    tracing::info!(user_id = ctx.author().id.get(), "Shutdown requested by owner");

    ctx.data().presence.notify_online_status(false).await;
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
