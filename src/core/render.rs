//! Renderer module
//!
//! Renders command output to different formats: jsonl, json, raw

use serde::Serialize;
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for lists of serializable items
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render items to a string
    pub fn render<T: Serialize>(&self, items: &[T]) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(items),
            OutputFormat::Json => self.render_json(items),
            OutputFormat::Raw => self.render_raw(items),
        }
    }

    /// Render to a writer, terminated by a newline when non-empty
    pub fn render_to<T: Serialize, W: Write>(
        &self,
        items: &[T],
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(items);
        if output.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{}", output)
    }

    /// Render as JSON Lines (one JSON value per line)
    fn render_jsonl<T: Serialize>(&self, items: &[T]) -> String {
        items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json<T: Serialize>(&self, items: &[T]) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render plain values: strings unquoted, single-field objects as their
    /// value, anything else as compact JSON
    fn render_raw<T: Serialize>(&self, items: &[T]) -> String {
        items
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .map(|value| raw_value(&value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn raw_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) if map.len() == 1 => {
            map.values().next().map(raw_value).unwrap_or_default()
        }
        other => other.to_string(),
    }
}
