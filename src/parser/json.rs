use crate::index::{BotEntry, BotIndex, BotMetadata};
use crate::{Result, WardenError};
use serde::Deserialize;
use std::collections::HashMap;

/// Wire form of one catalog entry; all five fields are required but the
/// catalog is hand-maintained, so absence is reported as a validation error
/// rather than a deserialization failure
#[derive(Debug, Deserialize)]
struct RawMetadata {
    operator: Option<String>,
    respect: Option<String>,
    function: Option<String>,
    frequency: Option<String>,
    description: Option<String>,
}

/// Parses a JSON bot catalog into a [`BotIndex`]
///
/// The expected shape is an object whose keys are bot names and whose values
/// carry the five metadata fields (`operator`, `respect`, `function`,
/// `frequency`, `description`). Unknown extra fields are ignored; a missing
/// or null required field fails the whole parse with an error naming the
/// field and the offending entry.
///
/// # Arguments
///
/// * `body` - The raw JSON text
/// * `url` - The source URL, used only for error context
pub fn parse_json(body: &str, url: &str) -> Result<BotIndex> {
    let raw: HashMap<String, RawMetadata> =
        serde_json::from_str(body).map_err(|e| WardenError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let mut index = BotIndex::with_capacity(raw.len());
    for (name, metadata) in raw {
        let metadata = validate_metadata(&name, metadata).map_err(|message| WardenError::Parse {
            url: url.to_string(),
            message,
        })?;
        index.insert(
            name,
            BotEntry {
                metadata: Some(metadata),
                ..BotEntry::default()
            },
        );
    }
    Ok(index)
}

/// Checks that every required metadata field is present
fn validate_metadata(name: &str, raw: RawMetadata) -> std::result::Result<BotMetadata, String> {
    let missing = |field: &str| {
        format!(
            "missing required field '{}' on bot index entry '{}'",
            field, name
        )
    };
    Ok(BotMetadata {
        operator: raw.operator.ok_or_else(|| missing("operator"))?,
        respects_robots_txt: raw.respect.ok_or_else(|| missing("respect"))?,
        function: raw.function.ok_or_else(|| missing("function"))?,
        frequency: raw.frequency.ok_or_else(|| missing("frequency"))?,
        description: raw.description.ok_or_else(|| missing("description"))?,
    })
}
