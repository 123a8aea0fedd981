use crate::index::{BotEntry, BotIndex};

/// One directive recognized by the exclusion-format parser
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    UserAgent(&'a str),
    Allow(&'a str),
    Disallow(&'a str),
}

/// A group of User-agent lines with the rules that apply to all of them
#[derive(Debug, Default)]
struct PendingGroup {
    user_agents: Vec<String>,
    allow: Vec<String>,
    disallow: Vec<String>,
    seen_rules: bool,
}

impl PendingGroup {
    fn commit(&mut self, index: &mut BotIndex) {
        for ua in self.user_agents.drain(..) {
            index.insert(
                ua,
                BotEntry {
                    metadata: None,
                    allow: self.allow.clone(),
                    disallow: self.disallow.clone(),
                },
            );
        }
        self.allow.clear();
        self.disallow.clear();
        self.seen_rules = false;
    }
}

/// Parses robots-exclusion-format text (RFC 9309) into a [`BotIndex`]
///
/// Contiguous `User-agent` lines accumulate into a group; `Allow` and
/// `Disallow` lines apply to every agent of the group. A `User-agent` line
/// after rules, or any non-directive line, closes the group. Comments and
/// blank lines are skipped without closing anything, rules that precede any
/// `User-agent` are dropped, and whatever group is pending at end of input
/// is committed even when it accumulated no rules.
pub fn parse_exclusion(body: &str) -> BotIndex {
    let mut index = BotIndex::new();
    let mut group = PendingGroup::default();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match directive(trimmed) {
            Some(Directive::UserAgent(token)) => {
                if group.seen_rules {
                    group.commit(&mut index);
                }
                if !token.is_empty() {
                    group.user_agents.push(token.to_string());
                }
            }
            Some(Directive::Allow(path)) => {
                if !group.user_agents.is_empty() {
                    group.allow.push(path.to_string());
                    group.seen_rules = true;
                }
            }
            Some(Directive::Disallow(path)) => {
                if !group.user_agents.is_empty() {
                    group.disallow.push(path.to_string());
                    group.seen_rules = true;
                }
            }
            None => {
                group.commit(&mut index);
            }
        }
    }
    group.commit(&mut index);

    index
}

/// Splits a line into a recognized directive, if it is one
///
/// Directive names are case-insensitive and whitespace around the colon is
/// tolerated, matching what catalogs in the wild actually serve.
fn directive(line: &str) -> Option<Directive<'_>> {
    let (key, value) = line.split_once(':')?;
    let value = value.trim();
    match key.trim().to_ascii_lowercase().as_str() {
        "user-agent" => Some(Directive::UserAgent(value)),
        "allow" => Some(Directive::Allow(value)),
        "disallow" => Some(Directive::Disallow(value)),
        _ => None,
    }
}

/// Returns true when the line is a `User-agent` directive
///
/// Used by content-kind detection to decide whether a body that is neither
/// JSON nor sniffed as JSON looks like exclusion-format text.
pub fn is_user_agent_line(line: &str) -> bool {
    matches!(directive(line.trim()), Some(Directive::UserAgent(_)))
}
