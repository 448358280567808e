use std::sync::atomic::Ordering;
use std::time::Duration;

use poise::serenity_prelude::{
    CreateAllowedMentions, CreateEmbed, CreateEmbedFooter, CreateMessage, Mentionable, Message,
    MessageCollector, Timestamp,
};
use tokio::time::sleep;
use tracing::info;

use crate::data;
use crate::emoji::{self, EmojiGroup};

use super::{Context, Error};

// How long the embed builder waits for the title and description replies.
const TITLE_TIMEOUT: Duration = Duration::from_secs(60);
const DESCRIPTION_TIMEOUT: Duration = Duration::from_secs(300);

// How long the update-emojis feedback stays on screen.
const PROGRESS_DELAY: Duration = Duration::from_secs(1);
const DONE_NOTICE_TTL: Duration = Duration::from_secs(2);

const STAFF_FOOTER: &str = "Server Staff";
const EMOJI_THUMBNAIL: &str = "https://emoji.gg/assets/emoji/1030-stand-with-ukraine.png";

/// Echo a message back as an embed
#[poise::command(slash_command, guild_only)]
pub async fn echo(
    ctx: Context<'_>,
    #[description = "Message to echo back"] message: String,
) -> Result<(), Error> {
    info!("Channel {}: echo for {}", ctx.channel_id(), ctx.author().name);
    ctx.send(
        poise::CreateReply::default()
            .embed(CreateEmbed::new().title(message).colour(data::BLUE)),
    )
    .await?;
    Ok(())
}

/// Build an embed from a prompted title and description
#[poise::command(slash_command, guild_only)]
pub async fn embed(ctx: Context<'_>) -> Result<(), Error> {
    info!(
        "Channel {}: embed builder opened by {}",
        ctx.channel_id(),
        ctx.author().name
    );

    let title_prompt = ctx
        .send(poise::CreateReply::default().embed(prompt_embed(
            "Embed Title",
            "Please provide a title for the embed",
        )))
        .await?;
    let Some(title) = await_reply(ctx, TITLE_TIMEOUT).await else {
        info!(
            "Channel {}: embed builder timed out waiting for a title",
            ctx.channel_id()
        );
        return send_timeout_notice(ctx).await;
    };

    let description_prompt = ctx
        .channel_id()
        .send_message(
            ctx.http(),
            CreateMessage::new().add_embed(prompt_embed(
                "Embed Description",
                "Please provide a description for the embed",
            )),
        )
        .await?;
    let Some(description) = await_reply(ctx, DESCRIPTION_TIMEOUT).await else {
        info!(
            "Channel {}: embed builder timed out waiting for a description",
            ctx.channel_id()
        );
        return send_timeout_notice(ctx).await;
    };

    let announcement = ctx.data().config.announcement_channel == Some(ctx.channel_id());
    let message = if announcement {
        let bot_face = ctx.serenity_context().cache.current_user().face();
        CreateMessage::new()
            .content("@everyone")
            .add_embed(final_embed(
                &title.content,
                &description.content,
                STAFF_FOOTER,
                &bot_face,
            ))
            .allowed_mentions(CreateAllowedMentions::new().everyone(true))
    } else {
        CreateMessage::new()
            .content(ctx.author().mention().to_string())
            .add_embed(final_embed(
                &title.content,
                &description.content,
                &ctx.author().name,
                &ctx.author().face(),
            ))
    };
    ctx.channel_id().send_message(ctx.http(), message).await?;

    // Tidy up the prompts and the captured replies.
    title_prompt.delete(ctx).await?;
    title.delete(ctx.http()).await?;
    description_prompt.delete(ctx.http()).await?;
    description.delete(ctx.http()).await?;
    Ok(())
}

/// Refresh the emoji cache. Run this after adding new server emojis
#[poise::command(slash_command, rename = "update-emojis", guild_only)]
pub async fn update_emojis(ctx: Context<'_>) -> Result<(), Error> {
    info!("Channel {}: updating server emojis", ctx.channel_id());
    let emoji_group = &ctx.data().emoji_group;

    let loading = emoji_group.read().await.mention("loading_dots");
    let progress = ctx
        .send(poise::CreateReply::default().embed(
            CreateEmbed::new()
                .title(decorated_title("Updating emojis", loading))
                .colour(data::GOLD),
        ))
        .await?;

    let fetched = ctx.data().config.guild_id.emojis(ctx.http()).await?;
    info!(
        "Channel {}: emoji cache refreshed with {} emojis",
        ctx.channel_id(),
        fetched.len()
    );
    *emoji_group.write().await = EmojiGroup::new(fetched);

    // Keep the progress embed on screen long enough to be seen.
    sleep(PROGRESS_DELAY).await;

    let done = emoji_group.read().await.mention("done");
    progress
        .edit(
            ctx,
            poise::CreateReply::default().embed(
                CreateEmbed::new()
                    .title(decorated_title("Emojis updated", done))
                    .colour(data::GREEN),
            ),
        )
        .await?;

    sleep(DONE_NOTICE_TTL).await;
    progress.delete(ctx).await?;
    Ok(())
}

/// List the server emojis everyone can use
#[poise::command(slash_command, guild_only)]
pub async fn emojis(ctx: Context<'_>) -> Result<(), Error> {
    info!(
        "Channel {}: emoji list for {}",
        ctx.channel_id(),
        ctx.author().name
    );

    let (normal, animated) = ctx.data().emoji_group.read().await.listing();
    let embed = listing_embed(
        &normal,
        &animated,
        ctx.author().display_name(),
        &ctx.author().face(),
    );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Toggle maintenance mode for this server
#[poise::command(slash_command, guild_only, owners_only)]
pub async fn maintenance(ctx: Context<'_>) -> Result<(), Error> {
    let was_active = ctx.data().maintenance.fetch_xor(true, Ordering::SeqCst);
    let active = !was_active;
    info!(
        "Channel {}: maintenance mode {} by {}",
        ctx.channel_id(),
        if active { "enabled" } else { "disabled" },
        ctx.author().name
    );

    let maintenance_channel = ctx.data().config.maintenance_channel;
    let embed = if active {
        CreateEmbed::new()
            .title("Maintenance mode enabled")
            .description(format!(
                "Commands are now restricted to {}.",
                maintenance_channel.mention()
            ))
            .colour(data::GOLD)
    } else {
        CreateEmbed::new()
            .title("Maintenance mode disabled")
            .description("All commands are available again.")
            .colour(data::GREEN)
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Waits for the next message from the invoking user in the invoking
/// channel; `None` once the window elapses.
async fn await_reply(ctx: Context<'_>, timeout: Duration) -> Option<Message> {
    MessageCollector::new(&ctx.serenity_context().shard)
        .channel_id(ctx.channel_id())
        .author_id(ctx.author().id)
        .timeout(timeout)
        .await
}

async fn send_timeout_notice(ctx: Context<'_>) -> Result<(), Error> {
    ctx.channel_id()
        .send_message(ctx.http(), CreateMessage::new().add_embed(timeout_embed()))
        .await?;
    Ok(())
}

fn prompt_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(data::BLUE)
}

fn timeout_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("TIMEOUT")
        .description("No response in time")
        .colour(data::RED)
}

fn final_embed(
    title: &str,
    description: &str,
    footer_text: &str,
    footer_icon: &str,
) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .timestamp(Timestamp::now())
        .colour(data::GREEN)
        .footer(CreateEmbedFooter::new(footer_text).icon_url(footer_icon))
}

fn listing_embed(
    normal: &[String],
    animated: &[String],
    footer_text: &str,
    footer_icon: &str,
) -> CreateEmbed {
    CreateEmbed::new()
        .title("Server Emojis")
        .description("Everyone can use below listed emojis!")
        .timestamp(Timestamp::now())
        .colour(data::GOLD)
        .field("Normal Emojis", emoji::field_text(normal), true)
        .field("Animated Emojis", emoji::field_text(animated), true)
        .footer(CreateEmbedFooter::new(footer_text).icon_url(footer_icon))
        .thumbnail(EMOJI_THUMBNAIL)
}

fn decorated_title(title: &str, emoji: Option<String>) -> String {
    match emoji {
        Some(emoji) => format!("{title} {emoji}"),
        None => title.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embed_is_blue_with_instructions() {
        let value =
            serde_json::to_value(prompt_embed("Embed Title", "Please provide a title")).unwrap();
        assert_eq!(value["title"], "Embed Title");
        assert_eq!(value["description"], "Please provide a title");
        assert_eq!(value["color"], 0x3498DB);
    }

    #[test]
    fn timeout_embed_matches_the_notice_contract() {
        let value = serde_json::to_value(timeout_embed()).unwrap();
        assert_eq!(value["title"], "TIMEOUT");
        assert_eq!(value["description"], "No response in time");
        assert_eq!(value["color"], 0xE74C3C);
    }

    #[test]
    fn final_embed_composes_replies_and_footer() {
        let value = serde_json::to_value(final_embed(
            "release notes",
            "everything shipped",
            "somebody",
            "https://cdn.example/avatar.png",
        ))
        .unwrap();
        assert_eq!(value["title"], "release notes");
        assert_eq!(value["description"], "everything shipped");
        assert_eq!(value["color"], 0x2ECC71);
        assert_eq!(value["footer"]["text"], "somebody");
        assert_eq!(value["footer"]["icon_url"], "https://cdn.example/avatar.png");
        assert!(value["timestamp"].is_string(), "final embed carries a timestamp");
    }

    #[test]
    fn decorated_title_appends_the_emoji_when_cached() {
        assert_eq!(
            decorated_title("Updating emojis", Some("<a:loading_dots:8>".to_owned())),
            "Updating emojis <a:loading_dots:8>"
        );
        assert_eq!(decorated_title("Updating emojis", None), "Updating emojis");
    }

    #[test]
    fn listing_embed_fields_are_inline_and_never_empty() {
        let normal = vec!["<:tada:1> • `:tada:`".to_owned()];
        let value = serde_json::to_value(listing_embed(
            &normal,
            &[],
            "somebody",
            "https://cdn.example/avatar.png",
        ))
        .unwrap();
        assert_eq!(value["title"], "Server Emojis");
        assert_eq!(value["description"], "Everyone can use below listed emojis!");
        assert_eq!(value["color"], 0xF1C40F);
        assert_eq!(value["fields"][0]["name"], "Normal Emojis");
        assert_eq!(value["fields"][0]["value"], "<:tada:1> • `:tada:`");
        assert_eq!(value["fields"][0]["inline"], true);
        assert_eq!(value["fields"][1]["name"], "Animated Emojis");
        assert_eq!(value["fields"][1]["value"], "*none*");
        assert_eq!(value["footer"]["text"], "somebody");
        assert_eq!(value["thumbnail"]["url"], EMOJI_THUMBNAIL);
    }
}
