// Commands any member can use.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result

use crate::core::ledger::format_rank;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Show a member's XP and level.
#[poise::command(prefix_command, guild_only, category = "User")]
pub async fn rank(
    ctx: Context<'_>,
    #[description = "Member to check (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();
    let target = member
        .as_ref()
        .map(|m| &m.user)
        .unwrap_or_else(|| ctx.author());

    match ctx
        .data()
        .ledger
        .get_entry(guild_id, target.id.get())
        .await?
    {
        Some(entry) => ctx.say(format_rank(&target.name, &entry)).await?,
        None => ctx.say("❌ No XP data").await?,
    };

    Ok(())
}

/// Link to the utilities site.
#[poise::command(prefix_command, category = "User")]
pub async fn link(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(format!("🔗 {}", ctx.data().link_url)).await?;
    Ok(())
}

/// Gateway round-trip latency.
#[poise::command(prefix_command, category = "User")]
pub async fn pong(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    ctx.say(format!("🏓 {}ms", latency.as_millis())).await?;
    Ok(())
}
