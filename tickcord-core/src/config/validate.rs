//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.discord.token.trim().is_empty() {
        errors.push("discord.token must not be empty".to_string());
    }
    if config.discord.console.guild_id.trim().is_empty()
        || config.discord.console.channel_id.trim().is_empty()
    {
        errors.push("discord.console guild_id and channel_id are required".to_string());
    }
    if config.discord.chat.guild_id.trim().is_empty()
        || config.discord.chat.channel_id.trim().is_empty()
    {
        errors.push("discord.chat guild_id and channel_id are required".to_string());
    }
    if config.host.capture_period_ticks == 0 {
        errors.push("host.capture_period_ticks must be > 0".to_string());
    }
    if config.host.dispatch_period_ticks == 0 {
        errors.push("host.dispatch_period_ticks must be > 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Config(errors.join("; ")))
    }
}
