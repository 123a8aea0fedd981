//! Robots.txt template renderer
//!
//! Rendering is line-oriented: any template line containing the
//! `{{user-agent}}` marker is emitted once per bot name with the marker
//! substituted; every other line is emitted verbatim. Two templates are
//! built in (the per-bot default and a blanket disallow-all); a custom
//! template file can replace them. The rendered text is cached by the
//! manager and regenerated on every successful index refresh.

use crate::config::Config;
use crate::{Result, WardenError};

/// Marker replaced by each bot name in turn
pub const AGENT_MARKER: &str = "{{user-agent}}";

/// Default template: one User-agent line per indexed bot, one Disallow
pub const DEFAULT_TEMPLATE: &str = "User-agent: {{user-agent}}\nDisallow: /\n";

/// Disallow-all template: a single wildcard block
pub const DISALLOW_ALL_TEMPLATE: &str = "User-agent: *\nDisallow: /\n";

/// A parsed robots.txt template
#[derive(Debug, Clone)]
pub struct RobotsTemplate {
    lines: Vec<TemplateLine>,
}

#[derive(Debug, Clone)]
enum TemplateLine {
    Literal(String),
    PerAgent(String),
}

impl RobotsTemplate {
    /// Selects and loads the template dictated by the configuration
    ///
    /// `robots-txt-disallow-all` wins over a custom file path; a custom file
    /// that cannot be read is a construction-time error.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.robots_txt_disallow_all {
            tracing::info!("robots-txt-disallow-all set, robots.txt will disallow all user agents");
            return Ok(Self::parse(DISALLOW_ALL_TEMPLATE));
        }
        if config.robots_txt_file_path.is_empty() {
            return Ok(Self::parse(DEFAULT_TEMPLATE));
        }
        tracing::info!(
            "loading custom robots.txt template from '{}'",
            config.robots_txt_file_path
        );
        let text = std::fs::read_to_string(&config.robots_txt_file_path).map_err(|e| {
            WardenError::Template(format!(
                "failed to read template file '{}': {}",
                config.robots_txt_file_path, e
            ))
        })?;
        Ok(Self::parse(&text))
    }

    /// Parses template text into its line plan
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| {
                if line.contains(AGENT_MARKER) {
                    TemplateLine::PerAgent(line.to_string())
                } else {
                    TemplateLine::Literal(line.to_string())
                }
            })
            .collect();
        Self { lines }
    }

    /// Renders the template over the given bot names
    ///
    /// Deterministic for a fixed name order; the manager passes its sorted
    /// name list so consecutive renderings of the same index are
    /// byte-identical.
    pub fn render(&self, names: &[String]) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                TemplateLine::Literal(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                TemplateLine::PerAgent(text) => {
                    for name in names {
                        out.push_str(&text.replace(AGENT_MARKER, name));
                        out.push('\n');
                    }
                }
            }
        }
        out
    }
}
