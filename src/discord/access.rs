// Discord-side glue for authorization.
//
// Collects the caller's ids once per invocation and applies the configured
// denial policy. Owner commands stay silent towards everyone else.

use crate::core::access::{is_authorized, CallerIdentity, DenialPolicy, RoleRequirement};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Build the caller's identity. Outside a guild there are no roles.
pub async fn caller_identity(ctx: Context<'_>) -> CallerIdentity {
    let user_id = ctx.author().id.get();

    let role_ids: Vec<u64> = if ctx.guild_id().is_some() {
        match ctx.author_member().await {
            Some(member) => member.roles.iter().map(|r| r.get()).collect(),
            None => {
                tracing::warn!(user_id, "Could not resolve guild member for role check");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    CallerIdentity::new(user_id, role_ids)
}

/// Check the caller against `required`. Returns `false` (after answering per
/// the denial policy) when the command must not proceed.
pub async fn authorize(ctx: Context<'_>, required: &RoleRequirement) -> Result<bool, Error> {
    let caller = caller_identity(ctx).await;
    if is_authorized(&caller, required) {
        return Ok(true);
    }

    tracing::info!(
        user_id = caller.user_id,
        command = %ctx.command().qualified_name,
        "Rejected unauthorized command"
    );
    let policy = ctx.data().access.denial_for(required);
    deny(ctx, policy, "❌ No permission").await?;
    Ok(false)
}

/// Answer a rejected invocation according to `policy`.
async fn deny(ctx: Context<'_>, policy: DenialPolicy, message: &str) -> Result<(), Error> {
    match policy {
        DenialPolicy::Silent => Ok(()),
        DenialPolicy::Reply => {
            ctx.send(
                poise::CreateReply::default()
                    .content(message)
                    .ephemeral(true),
            )
            .await?;
            Ok(())
        }
    }
}

/// Owner commands only run in direct messages. Used inside a guild, the owner
/// gets a DM pointing that out and the command stops.
pub async fn require_direct_message(ctx: Context<'_>) -> Result<bool, Error> {
    if ctx.guild_id().is_none() {
        return Ok(true);
    }

    ctx.author()
        .direct_message(
            ctx.http(),
            serenity::CreateMessage::new().content("❌ Use in DMs only."),
        )
        .await?;
    Ok(false)
}
