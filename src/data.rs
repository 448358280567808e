use std::env;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result, bail};
use poise::serenity_prelude::{ChannelId, Colour, GuildId};
use tokio::sync::RwLock;

use crate::emoji::EmojiGroup;

// Embed palette, mirroring the colours the Discord client renders for
// informational/success/failure/highlight responses.
pub const BLUE: Colour = Colour(0x3498DB);
pub const GREEN: Colour = Colour(0x2ECC71);
pub const RED: Colour = Colour(0xE74C3C);
pub const GOLD: Colour = Colour(0xF1C40F);

/// Static bot configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The single guild this bot serves.
    pub guild_id: GuildId,
    /// The only channel that stays usable while maintenance mode is active.
    pub maintenance_channel: ChannelId,
    /// Channel whose built embeds go out as @everyone staff announcements.
    pub announcement_channel: Option<ChannelId>,
    /// Raise the maintenance flag right away on boot.
    pub start_in_maintenance: bool,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Ok(BotConfig {
            guild_id: GuildId::new(required_id("GUILD_ID")?),
            maintenance_channel: ChannelId::new(required_id("MAINTENANCE_CHANNEL_ID")?),
            announcement_channel: optional_id("ANNOUNCEMENT_CHANNEL_ID")?.map(ChannelId::new),
            start_in_maintenance: env::var("MAINTENANCE_MODE")
                .map(|raw| parse_flag(&raw))
                .unwrap_or(false),
        })
    }
}

/// Shared state available to every command through the poise context.
pub struct BotData {
    pub config: BotConfig,
    /// Global maintenance flag; only the owner toggle writes it.
    pub maintenance: AtomicBool,
    /// Name-keyed cache of the guild emojis, replaced on every refresh.
    pub emoji_group: RwLock<EmojiGroup>,
}

impl BotData {
    pub fn new(config: BotConfig, emoji_group: EmojiGroup) -> Self {
        let maintenance = AtomicBool::new(config.start_in_maintenance);
        BotData {
            config,
            maintenance,
            emoji_group: RwLock::new(emoji_group),
        }
    }
}

fn required_id(name: &str) -> Result<u64> {
    let raw = env::var(name).with_context(|| format!("{name} is not set"))?;
    parse_id(name, &raw)
}

fn optional_id(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => parse_id(name, &raw).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{name} is not valid unicode")),
    }
}

fn parse_id(name: &str, raw: &str) -> Result<u64> {
    let id: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{name} is not a valid snowflake: {raw:?}"))?;
    if id == 0 {
        bail!("{name} must be a non-zero snowflake");
    }
    Ok(id)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_snowflakes() {
        assert_eq!(parse_id("GUILD_ID", "923530976947224596").unwrap(), 923530976947224596);
        assert_eq!(parse_id("GUILD_ID", " 42 ").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_zero_and_garbage() {
        assert!(parse_id("GUILD_ID", "0").is_err());
        assert!(parse_id("GUILD_ID", "general").is_err());
        assert!(parse_id("GUILD_ID", "").is_err());
    }

    #[test]
    fn parse_flag_recognises_truthy_spellings() {
        for raw in ["1", "true", "TRUE", "yes", "On "] {
            assert!(parse_flag(raw), "{raw:?} should enable the flag");
        }
        for raw in ["0", "false", "off", "", "maybe"] {
            assert!(!parse_flag(raw), "{raw:?} should not enable the flag");
        }
    }
}
