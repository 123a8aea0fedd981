//! Bot index data model
//!
//! The [`BotIndex`] is the authoritative classification dictionary: a map from
//! bot name (the literal, case-sensitive substring matched against User-Agent
//! headers) to everything known about that bot. Indices are built by the
//! parsers in [`crate::parser`], merged across sources, and published
//! atomically by the manager; they are never mutated in place.

use std::collections::HashMap;

/// Descriptive metadata about a bot, populated from JSON catalog sources
///
/// All fields are informational and only used for logging; none of them
/// affect classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BotMetadata {
    /// Who operates the bot
    pub operator: String,
    /// Whether the operator claims to respect robots.txt
    pub respects_robots_txt: String,
    /// What the bot is used for
    pub function: String,
    /// How often the bot crawls
    pub frequency: String,
    /// Free-form description
    pub description: String,
}

/// One recognized bot: optional metadata plus any path rules its source carried
///
/// Entries from JSON catalogs carry metadata; entries from exclusion-format
/// sources carry allow/disallow path lists; plaintext entries carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BotEntry {
    /// Catalog metadata, present only for JSON sources
    pub metadata: Option<BotMetadata>,
    /// Allowed path prefixes from an exclusion-format source
    pub allow: Vec<String>,
    /// Disallowed path prefixes from an exclusion-format source
    pub disallow: Vec<String>,
}

/// Map from bot name to its entry; keys are unique by construction
pub type BotIndex = HashMap<String, BotEntry>;
