//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration for tickcord
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote chat platform connection
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Host scheduler intervals
    #[serde(default)]
    pub host: HostConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// A (guild, channel) address pair for one traffic class.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelRoute {
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub channel_id: String,
}

/// Discord connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot credential token
    #[serde(default)]
    pub token: String,
    /// Presence/activity string published once the session is ready
    #[serde(default = "default_activity")]
    pub activity: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_intents")]
    pub intents: u64,
    /// Console traffic route
    #[serde(default)]
    pub console: ChannelRoute,
    /// Chat traffic route
    #[serde(default)]
    pub chat: ChannelRoute,
}

fn default_activity() -> String {
    "on the server".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_intents() -> u64 {
    // GUILDS + GUILD_MEMBERS + GUILD_MESSAGES + MESSAGE_CONTENT
    33283
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            activity: default_activity(),
            gateway_url: default_gateway_url(),
            intents: default_intents(),
            console: ChannelRoute::default(),
            chat: ChannelRoute::default(),
        }
    }
}

/// Host-side scheduling intervals, in host ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Delay before console capture begins, letting startup output settle
    #[serde(default = "default_capture_delay")]
    pub capture_delay_ticks: u64,
    /// Period of the console capture task
    #[serde(default = "default_capture_period")]
    pub capture_period_ticks: u64,
    /// Period of the inbound dispatch task
    #[serde(default = "default_dispatch_period")]
    pub dispatch_period_ticks: u64,
}

fn default_capture_delay() -> u64 {
    10
}

fn default_capture_period() -> u64 {
    1
}

fn default_dispatch_period() -> u64 {
    10
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            capture_delay_ticks: default_capture_delay(),
            capture_period_ticks: default_capture_period(),
            dispatch_period_ticks: default_dispatch_period(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
        }
    }
}
