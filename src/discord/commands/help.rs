use crate::core::messaging::{help_sections, CommandListing};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// List the bot's commands.
#[poise::command(prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let listings: Vec<CommandListing> = ctx
        .framework()
        .options()
        .commands
        .iter()
        .map(|command| CommandListing {
            name: command.name.clone(),
            category: command.category.clone(),
            slash_only: command.prefix_action.is_none(),
        })
        .collect();

    let mut embed = serenity::CreateEmbed::new()
        .title("TXRP Commands")
        .color(serenity::Color::PURPLE)
        .timestamp(serenity::Timestamp::now());

    // The staff line sits inline, the rest get their own rows.
    for (index, (heading, line)) in help_sections(&listings).into_iter().enumerate() {
        embed = embed.field(heading, line, index == 0);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
