use poise::serenity_prelude::{self as serenity, Client, GatewayIntents};
use tracing::info;

use crate::data::{BotConfig, BotData};
use crate::emoji::EmojiGroup;

pub struct DiscordClient {
    pub serenity_client: Client,
}

impl DiscordClient {
    pub async fn new(
        token: &str,
        intents: GatewayIntents,
        config: BotConfig,
    ) -> anyhow::Result<Self> {
        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: vec![
                    super::commands::echo(),
                    super::commands::embed(),
                    super::commands::emojis(),
                    super::commands::update_emojis(),
                    super::commands::maintenance(),
                ],
                command_check: Some(|ctx| Box::pin(super::enforce_maintenance(ctx))),
                on_error: |error| Box::pin(super::on_error(error)),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Connected as {}", ready.user.name);

                    // Single-server bot: the commands only exist in the
                    // configured guild.
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        config.guild_id,
                    )
                    .await?;

                    let emojis = config.guild_id.emojis(&ctx.http).await?;
                    info!(
                        "Seeded the emoji cache with {} emojis from guild {}",
                        emojis.len(),
                        config.guild_id
                    );

                    Ok(BotData::new(config, EmojiGroup::new(emojis)))
                })
            })
            .build();

        let serenity_client = serenity::ClientBuilder::new(token, intents)
            .framework(framework)
            .await?;

        Ok(DiscordClient { serenity_client })
    }
}
