//! Remediation decisions for classified requests
//!
//! The manager only classifies; what happens to a bot request is the host's
//! call. This module turns a configuration plus a classification into the
//! [`Remediation`] the host should carry out, including the canned JSON body
//! for blocked responses. Nothing here touches the request itself.

use crate::config::Config;
use crate::manager::BotMatch;
use serde::{Deserialize, Serialize};

/// Remediation configured for requests classified as bots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum BotAction {
    /// Forward the request untouched
    Pass,
    /// Forward the request and log the bot's identity
    #[default]
    Log,
    /// Reject the request with the configured status code
    Block,
    /// Forward the request to the configured backend instead
    Proxy,
}

/// Body of a blocked response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockBody {
    /// Canonical reason phrase of the response status
    pub error: String,
    /// The configured block message
    pub message: String,
}

/// What the host should do with one classified request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Forward the request untouched
    Pass,
    /// Reject with this status code and optional JSON body
    Block { status: u16, body: Option<BlockBody> },
    /// Send the request to this backend instead
    Proxy { url: String },
}

impl Remediation {
    /// Decides the remediation for a classification result
    ///
    /// Disabled middleware and unmatched requests always pass. LOG logs the
    /// bot's catalog metadata and passes; BLOCK carries the configured status
    /// and body (no body when the configured message is empty); PROXY carries
    /// the configured backend URL.
    ///
    /// # Arguments
    ///
    /// * `config` - The active configuration
    /// * `bot` - The classification result for the request's User-Agent
    pub fn decide(config: &Config, bot: Option<&BotMatch>) -> Self {
        if !config.enabled {
            return Remediation::Pass;
        }
        let Some(bot) = bot else {
            return Remediation::Pass;
        };

        match config.bot_action {
            BotAction::Pass => Remediation::Pass,
            BotAction::Log => {
                log_match(bot);
                Remediation::Pass
            }
            BotAction::Block => {
                log_match(bot);
                Remediation::Block {
                    status: config.bot_block_http_code,
                    body: block_body(config),
                }
            }
            BotAction::Proxy => {
                log_match(bot);
                Remediation::Proxy {
                    url: config.bot_proxy_url.clone(),
                }
            }
        }
    }
}

/// Builds the JSON block body, or nothing when no message is configured
fn block_body(config: &Config) -> Option<BlockBody> {
    if config.bot_block_http_response.is_empty() {
        return None;
    }
    let reason = reqwest::StatusCode::from_u16(config.bot_block_http_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Error");
    Some(BlockBody {
        error: reason.to_string(),
        message: config.bot_block_http_response.clone(),
    })
}

/// Logs the identity of a matched bot
fn log_match(bot: &BotMatch) {
    match &bot.entry.metadata {
        Some(metadata) => tracing::info!(
            bot = %bot.name,
            operator = %metadata.operator,
            respects_robots_txt = %metadata.respects_robots_txt,
            function = %metadata.function,
            "request classified as AI robot"
        ),
        None => tracing::info!(bot = %bot.name, "request classified as robot"),
    }
}
