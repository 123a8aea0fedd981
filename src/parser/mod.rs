//! Bot source parsers
//!
//! Sources publish their catalogs in three shapes: a JSON object of per-bot
//! metadata, the line-oriented robots exclusion format of RFC 9309, or a bare
//! newline-separated name list. Each parser converts its shape into the same
//! [`BotIndex`](crate::index::BotIndex); the fetcher decides which parser to
//! run via content-kind detection.

mod exclusion;
mod json;
mod plaintext;

pub use exclusion::{is_user_agent_line, parse_exclusion};
pub use json::parse_json;
pub use plaintext::parse_plaintext;

use crate::index::BotIndex;
use crate::source::ContentKind;
use crate::Result;

/// Parses a source body according to its detected content kind
///
/// # Arguments
///
/// * `kind` - The content kind detected for (or remembered by) the source
/// * `body` - The full response body
/// * `url` - The source URL, used only for error context
pub fn parse(kind: ContentKind, body: &str, url: &str) -> Result<BotIndex> {
    match kind {
        ContentKind::Json => parse_json(body, url),
        ContentKind::Exclusion => Ok(parse_exclusion(body)),
        ContentKind::Plaintext => Ok(parse_plaintext(body)),
    }
}
