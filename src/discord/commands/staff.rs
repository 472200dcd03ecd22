// Staff commands: announcements and moderation.
//
// Role checks happen in the handler against the configured role ids rather
// than Discord permissions, so the gates follow the server's staff roles.

use crate::core::messaging::{
    parse_embed_color, purge_batch_size, purge_fetch_limits, split_purge_page,
};
use crate::discord::access::authorize;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

const EMBED_FOOTER: &str = "Texas State Roleplay Utilities Bot";
const DEFAULT_REASON: &str = "No reason";

/// How long the purge confirmation stays up.
const PURGE_NOTICE_TTL: Duration = Duration::from_secs(3);

/// Create staff embed
#[poise::command(slash_command, guild_only, category = "Staff")]
pub async fn embed(
    ctx: Context<'_>,
    #[description = "Title"] title: String,
    #[description = "Message"] description: String,
    #[description = "Hex color"] color: Option<String>,
) -> Result<(), Error> {
    let staff = ctx.data().access.staff();
    if !authorize(ctx, &staff).await? {
        return Ok(());
    }

    let embed = serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(parse_embed_color(color.as_deref()))
        .footer(serenity::CreateEmbedFooter::new(EMBED_FOOTER))
        .timestamp(serenity::Timestamp::now());

    ctx.channel_id()
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await?;

    ctx.send(
        poise::CreateReply::default()
            .content("Embed sent")
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Kick a member from the server.
#[poise::command(prefix_command, guild_only, category = "Staff")]
pub async fn kick(
    ctx: Context<'_>,
    member: serenity::Member,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let moderator = ctx.data().access.moderator();
    if !authorize(ctx, &moderator).await? {
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| DEFAULT_REASON.to_string());
    if let Err(e) = member.kick_with_reason(ctx.http(), &reason).await {
        tracing::warn!(target_id = member.user.id.get(), "Kick failed: {}", e);
        ctx.say(format!("❌ Could not kick {}", member.user.name)).await?;
        return Ok(());
    }

    tracing::info!(
        guild_id = member.guild_id.get(),
        target_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        reason = %reason,
        "Member kicked"
    );
    ctx.say(format!("👢 {} kicked", member.user.name)).await?;
    Ok(())
}

/// Ban a member from the server.
#[poise::command(prefix_command, guild_only, category = "Staff")]
pub async fn ban(
    ctx: Context<'_>,
    member: serenity::Member,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let moderator = ctx.data().access.moderator();
    if !authorize(ctx, &moderator).await? {
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| DEFAULT_REASON.to_string());
    if let Err(e) = member.ban_with_reason(ctx.http(), 0, &reason).await {
        tracing::warn!(target_id = member.user.id.get(), "Ban failed: {}", e);
        ctx.say(format!("❌ Could not ban {}", member.user.name)).await?;
        return Ok(());
    }

    tracing::info!(
        guild_id = member.guild_id.get(),
        target_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        reason = %reason,
        "Member banned"
    );
    ctx.say(format!("🔨 {} banned", member.user.name)).await?;
    Ok(())
}

/// Delete recent messages in this channel.
#[poise::command(prefix_command, guild_only, category = "Staff")]
pub async fn purge(ctx: Context<'_>, amount: u64) -> Result<(), Error> {
    let ownership = ctx.data().access.ownership();
    if !authorize(ctx, &ownership).await? {
        return Ok(());
    }

    let Some(total) = purge_batch_size(amount) else {
        ctx.say("❌ Amount must be at least 1").await?;
        return Ok(());
    };

    let channel_id = ctx.channel_id();
    let mut before: Option<serenity::MessageId> = None;
    let mut deleted = 0usize;

    // Pages come newest first; the first one includes the invoking message.
    for limit in purge_fetch_limits(total) {
        let mut request = serenity::GetMessages::new().limit(limit);
        if let Some(oldest) = before {
            request = request.before(oldest);
        }

        let messages = channel_id.messages(ctx.http(), request).await?;
        let Some(last) = messages.last() else {
            break;
        };
        before = Some(last.id);

        let now = serenity::Timestamp::now().unix_timestamp();
        let page = split_purge_page(
            messages.iter().map(|m| (m.id, m.timestamp.unix_timestamp())),
            now,
        );

        if !page.bulk.is_empty() {
            channel_id.delete_messages(ctx.http(), &page.bulk).await?;
        }
        for id in &page.single {
            channel_id.delete_message(ctx.http(), *id).await?;
        }
        deleted += page.bulk.len() + page.single.len();

        if messages.len() < usize::from(limit) {
            break;
        }
    }

    tracing::info!(channel_id = channel_id.get(), deleted, "Purged messages");

    let notice = ctx.say(format!("🗑️ Purged {}", amount)).await?;
    tokio::time::sleep(PURGE_NOTICE_TTL).await;
    if let Err(e) = notice.delete(ctx).await {
        tracing::debug!("Could not remove purge notice: {}", e);
    }
    Ok(())
}
