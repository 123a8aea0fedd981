use crate::action::BotAction;
use serde::Deserialize;

/// Default robots.txt source: the ai-robots-txt JSON catalog pinned on a CDN.
pub const DEFAULT_SOURCE_URL: &str =
    "https://cdn.jsdelivr.net/gh/ai-robots-txt/ai.robots.txt@v1.42/robots.json";

/// Default response body sent alongside a BLOCK action.
pub const DEFAULT_BLOCK_RESPONSE: &str = "Your user agent is associated with a large language \
     model (LLM) and is blocked from accessing this resource";

/// Main configuration structure for Bot-Warden
///
/// Field names in the TOML file are kebab-case. All keys are optional and fall
/// back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// When false, classification is skipped entirely and all traffic passes.
    /// Robots.txt rendering still works.
    pub enabled: bool,

    /// Remediation applied to requests classified as bots
    #[serde(rename = "bot-action")]
    pub bot_action: BotAction,

    /// HTTP status code returned for the BLOCK action
    #[serde(rename = "bot-block-http-code")]
    pub bot_block_http_code: u16,

    /// Response body for the BLOCK action; empty means no body
    #[serde(rename = "bot-block-http-response")]
    pub bot_block_http_response: String,

    /// Backend URL for the PROXY action; empty means unset
    #[serde(rename = "bot-proxy-url")]
    pub bot_proxy_url: String,

    /// Capacity of the User-Agent result cache
    #[serde(rename = "cache-size")]
    pub cache_size: usize,

    /// How long a successfully refreshed bot index stays valid (e.g. "24h")
    #[serde(rename = "cache-update-interval")]
    pub cache_update_interval: String,

    /// How long to wait before retrying after a failed refresh (e.g. "1m")
    #[serde(rename = "robots-source-retry-interval")]
    pub robots_source_retry_interval: String,

    /// Comma-joined ordered list of bot source URLs
    #[serde(rename = "robots-source-url")]
    pub robots_source_url: String,

    /// Path to a custom robots.txt template file; empty selects the built-in
    #[serde(rename = "robots-txt-file-path")]
    pub robots_txt_file_path: String,

    /// When true, robots.txt disallows all user agents instead of listing bots
    #[serde(rename = "robots-txt-disallow-all")]
    pub robots_txt_disallow_all: bool,

    /// Selects the Aho-Corasick matcher; false falls back to a linear scan
    #[serde(rename = "use-fast-match")]
    pub use_fast_match: bool,

    /// Log verbosity
    #[serde(rename = "log-level")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_action: BotAction::Log,
            bot_block_http_code: 403,
            bot_block_http_response: DEFAULT_BLOCK_RESPONSE.to_string(),
            bot_proxy_url: String::new(),
            cache_size: 500,
            cache_update_interval: "24h".to_string(),
            robots_source_retry_interval: "1m".to_string(),
            robots_source_url: DEFAULT_SOURCE_URL.to_string(),
            robots_txt_file_path: String::new(),
            robots_txt_disallow_all: false,
            use_fast_match: true,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Splits the comma-joined source list into individual URLs
    ///
    /// Order is preserved; on merge collisions later sources overwrite earlier
    /// ones, so callers should order authoritative sources last.
    pub fn source_urls(&self) -> Vec<String> {
        self.robots_source_url
            .split(',')
            .map(|u| u.trim().to_string())
            .collect()
    }
}

/// Log verbosity levels, in increasing order of severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the tracing filter directive matching this level
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
