//! Bot manager: source refresh, snapshot publication, and classification
//!
//! The [`BotManager`] owns the whole classification pipeline. All state a
//! request can observe lives in one immutable [`Snapshot`] (index, matcher,
//! User-Agent cache, rendered robots.txt) published through an `ArcSwap`, so
//! classification never takes a lock against the refresher. Refresh
//! bookkeeping is serialized behind an async mutex: one refresh in flight per
//! manager, late arrivers wait, observe the moved deadline, and skip.
//!
//! A failed refresh leaves the previous snapshot in service and schedules a
//! retry; a successful one replaces index, matcher, cache, and rendered
//! template together, so no request can see a new matcher against a stale
//! index.

use crate::cache::UaCache;
use crate::config::{parse_duration, validate, Config};
use crate::index::{BotEntry, BotIndex};
use crate::matcher::AhoCorasick;
use crate::source::Source;
use crate::template::RobotsTemplate;
use crate::{ConfigError, Result, WardenError};
use arc_swap::ArcSwap;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A positive classification: the matched name and its index entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMatch {
    /// The bot name found inside the User-Agent string
    pub name: String,
    /// Everything the index knows about that bot
    pub entry: BotEntry,
}

/// The state one refresh produces, observed atomically by every request
#[derive(Debug)]
struct Snapshot {
    index: BotIndex,
    /// Index keys in sorted order; drives linear scans and template renders
    names: Vec<String>,
    matcher: Option<AhoCorasick>,
    ua_cache: UaCache,
    robots_txt: String,
    /// False only for the placeholder installed before the first refresh
    primed: bool,
}

impl Snapshot {
    fn empty(cache_size: usize) -> Self {
        Self {
            index: BotIndex::new(),
            names: Vec::new(),
            matcher: None,
            ua_cache: UaCache::new(cache_size),
            robots_txt: String::new(),
            primed: false,
        }
    }
}

/// Mutable refresh bookkeeping, guarded by the refresh mutex
#[derive(Debug)]
struct RefreshState {
    next_update: DateTime<Utc>,
    sources: Vec<Source>,
}

/// Management layer around the bot index, its sources, and the UA cache
pub struct BotManager {
    state: ArcSwap<Snapshot>,
    refresh: Mutex<RefreshState>,
    client: Client,
    template: RobotsTemplate,
    cache_size: usize,
    use_fast_match: bool,
    cache_update_interval: ChronoDuration,
    retry_interval: ChronoDuration,
}

impl BotManager {
    /// Initializes a manager and performs the initial refresh synchronously
    ///
    /// Configuration problems, unreachable sources, and malformed payloads
    /// all fail construction; a manager that exists has served at least one
    /// good index.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated plugin configuration
    pub async fn new(config: &Config) -> Result<Self> {
        validate(config)?;
        let template = RobotsTemplate::from_config(config)?;
        let sources = config.source_urls().into_iter().map(Source::new).collect();

        let manager = Self {
            state: ArcSwap::from_pointee(Snapshot::empty(config.cache_size)),
            refresh: Mutex::new(RefreshState {
                next_update: DateTime::<Utc>::MIN_UTC,
                sources,
            }),
            client: Source::build_client()?,
            template,
            cache_size: config.cache_size,
            use_fast_match: config.use_fast_match,
            cache_update_interval: interval(&config.cache_update_interval)?,
            retry_interval: interval(&config.robots_source_retry_interval)?,
        };
        manager.refresh_if_due().await?;
        Ok(manager)
    }

    /// Classifies a User-Agent string against the current bot index
    ///
    /// Triggers a lazy refresh first; a runtime refresh failure is logged and
    /// classification proceeds against the prior index. Results, including
    /// negative ones, are memoized in the UA cache.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The request's User-Agent header value
    ///
    /// # Returns
    ///
    /// * `Ok(Some(BotMatch))` - A known bot name occurs in the User-Agent
    /// * `Ok(None)` - No known bot name matches
    /// * `Err(WardenError)` - Only when a refresh failed and no previously
    ///   published index exists
    pub async fn classify(&self, user_agent: &str) -> Result<Option<BotMatch>> {
        if let Err(e) = self.refresh_if_due().await {
            if !self.state.load().primed {
                return Err(e);
            }
            // already logged; the previous snapshot stays in service
        }

        let snapshot = self.state.load_full();
        let name = match snapshot.ua_cache.get(user_agent) {
            Some(name) => {
                tracing::debug!(user_agent, bot = %name, "classification cache hit");
                name
            }
            None => {
                tracing::debug!(user_agent, "classification cache miss");
                let name = match &snapshot.matcher {
                    Some(matcher) => matcher.find(user_agent).unwrap_or("").to_string(),
                    None => snapshot
                        .names
                        .iter()
                        .find(|name| user_agent.contains(name.as_str()))
                        .cloned()
                        .unwrap_or_default(),
                };
                snapshot.ua_cache.set(user_agent, &name);
                name
            }
        };

        if name.is_empty() {
            return Ok(None);
        }
        Ok(snapshot.index.get(&name).map(|entry| BotMatch {
            name: name.clone(),
            entry: entry.clone(),
        }))
    }

    /// Renders the robots exclusion list for the current index
    ///
    /// # Arguments
    ///
    /// * `writer` - Destination for the rendered text
    /// * `use_cache` - Stream the rendering cached at refresh time instead of
    ///   rendering fresh from the current index
    pub async fn render_robots_txt<W: Write>(&self, writer: &mut W, use_cache: bool) -> Result<()> {
        if let Err(e) = self.refresh_if_due().await {
            if !self.state.load().primed {
                return Err(e);
            }
        }

        let snapshot = self.state.load_full();
        if use_cache {
            writer.write_all(snapshot.robots_txt.as_bytes())?;
        } else {
            writer.write_all(self.template.render(&snapshot.names).as_bytes())?;
        }
        Ok(())
    }

    /// Returns the number of bots in the currently published index
    pub fn bot_count(&self) -> usize {
        self.state.load().index.len()
    }

    /// Refreshes the index when the update deadline has passed
    ///
    /// Serialized through the refresh mutex; the fetch happens while holding
    /// it, which caps how often sources are hit no matter how many requests
    /// pile up. On failure the deadline moves by the retry interval and the
    /// published snapshot is left untouched.
    async fn refresh_if_due(&self) -> Result<()> {
        let mut refresh = self.refresh.lock().await;
        if Utc::now() < refresh.next_update {
            tracing::debug!("bot index is fresh, next update due {}", refresh.next_update);
            return Ok(());
        }

        tracing::info!(
            "bot index expired, refreshing from {} source(s)",
            refresh.sources.len()
        );
        match self.rebuild(&mut refresh.sources).await {
            Ok(snapshot) => {
                refresh.next_update = Utc::now() + self.cache_update_interval;
                if snapshot.index.is_empty() {
                    tracing::warn!("bot index is empty, review source data");
                }
                self.state.store(Arc::new(snapshot));
                tracing::debug!("bot index refreshed, next update due {}", refresh.next_update);
                Ok(())
            }
            Err(e) => {
                refresh.next_update = Utc::now() + self.retry_interval;
                tracing::warn!(
                    "bot index failed to refresh, will retry after {}. Error: {}",
                    refresh.next_update,
                    e
                );
                Err(e)
            }
        }
    }

    /// Fetches and merges all sources into a fresh snapshot
    ///
    /// Any source error fails the whole rebuild. On collision, later sources
    /// overwrite earlier ones.
    async fn rebuild(&self, sources: &mut [Source]) -> Result<Snapshot> {
        let mut index = BotIndex::new();
        for source in sources.iter_mut() {
            let parsed = source.fetch_index(&self.client).await?;
            index.extend(parsed);
        }

        let mut names: Vec<String> = index.keys().cloned().collect();
        names.sort();

        let matcher = self
            .use_fast_match
            .then(|| AhoCorasick::new(names.iter().map(String::as_str)));
        let robots_txt = self.template.render(&names);

        Ok(Snapshot {
            index,
            names,
            matcher,
            ua_cache: UaCache::new(self.cache_size),
            robots_txt,
            primed: true,
        })
    }
}

/// Parses a config interval into the wall-clock delta used for deadlines
fn interval(value: &str) -> Result<ChronoDuration> {
    let parsed = parse_duration(value)?;
    ChronoDuration::from_std(parsed).map_err(|_| {
        WardenError::Config(ConfigError::InvalidDuration(format!(
            "interval '{}' is out of range",
            value
        )))
    })
}
