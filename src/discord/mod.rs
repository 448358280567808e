pub mod commands;
pub mod framework;

use std::sync::atomic::Ordering;

use poise::serenity_prelude::{ChannelId, CreateEmbed, Mentionable};
use tracing::{debug, error, info};

use crate::data::{self, BotData};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// True when maintenance mode locks commands out of `channel`.
pub fn maintenance_blocks(
    active: bool,
    channel: ChannelId,
    maintenance_channel: ChannelId,
) -> bool {
    active && channel != maintenance_channel
}

fn maintenance_embed(maintenance_channel: ChannelId) -> CreateEmbed {
    CreateEmbed::new()
        .title("Under maintenance")
        .description(format!(
            "The bot is under maintenance right now. Commands are only available in {}.",
            maintenance_channel.mention()
        ))
        .colour(data::RED)
}

/// Framework-wide command check: while maintenance mode is active, every
/// command outside the designated channel gets a notice instead of running.
pub async fn enforce_maintenance(ctx: Context<'_>) -> Result<bool, Error> {
    let maintenance_channel = ctx.data().config.maintenance_channel;
    let active = ctx.data().maintenance.load(Ordering::SeqCst);
    if !maintenance_blocks(active, ctx.channel_id(), maintenance_channel) {
        return Ok(true);
    }

    info!(
        "Channel {}: '{}' blocked by maintenance mode",
        ctx.channel_id(),
        ctx.command().name
    );
    ctx.send(
        poise::CreateReply::default()
            .embed(maintenance_embed(maintenance_channel))
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

/// Framework error hook: command failures are logged, everything else falls
/// through to the poise builtin handling.
pub async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Channel {}: command '{}' failed: {}",
                ctx.channel_id(),
                ctx.command().name,
                error
            );
        }
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            debug!(
                "Channel {}: '{}' stopped by the maintenance check",
                ctx.channel_id(),
                ctx.command().name
            );
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling command error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_blocks_everywhere_but_the_designated_channel() {
        let maintenance_channel = ChannelId::new(10);
        assert!(maintenance_blocks(true, ChannelId::new(11), maintenance_channel));
        assert!(!maintenance_blocks(true, maintenance_channel, maintenance_channel));
    }

    #[test]
    fn inactive_maintenance_blocks_nothing() {
        let maintenance_channel = ChannelId::new(10);
        assert!(!maintenance_blocks(false, ChannelId::new(11), maintenance_channel));
        assert!(!maintenance_blocks(false, maintenance_channel, maintenance_channel));
    }

    #[test]
    fn maintenance_notice_names_the_open_channel() {
        let value = serde_json::to_value(maintenance_embed(ChannelId::new(10))).unwrap();
        assert_eq!(value["title"], "Under maintenance");
        assert_eq!(value["color"], 0xE74C3C);
        assert!(
            value["description"].as_str().unwrap().contains("<#10>"),
            "notice should mention the maintenance channel"
        );
    }
}
