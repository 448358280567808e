mod data;
mod discord;
mod emoji;
mod signal;

use std::env;

use data::BotConfig;
use discord::framework::DiscordClient;

use poise::serenity_prelude::GatewayIntents;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env variables if it exists.
    dotenvy::dotenv().ok();

    // Initialize the logger to use environment variables.
    tracing_subscriber::fmt::init();

    let discord_token = env::var("DISCORD_TOKEN")?;
    let config = BotConfig::from_env()?;

    if config.start_in_maintenance {
        info!(
            "Starting in maintenance mode, commands limited to channel {}",
            config.maintenance_channel
        );
    }

    // MESSAGE_CONTENT is needed to read the replies of the embed builder.
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut client = DiscordClient::new(&discord_token, intents, config).await?;

    tokio::select! {
        Err(why) = client.serenity_client.start() => {
            error!("Client error: {:?}", why);
        },
        _ = signal::wait_for_signal() => {}
    }
    Ok(())
}
