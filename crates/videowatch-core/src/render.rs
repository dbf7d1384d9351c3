//! Snapshot rendering.
//!
//! The render seam mirrors the dashboard display contract: a renderer takes
//! each parsed snapshot and either displays it or reports failure, and shows
//! a placeholder notice while the connection is down. Two implementations
//! cover the CLI surfaces:
//!
//! - [`TextRenderer`]: human-readable sections for a terminal
//! - [`JsonRenderer`]: one JSON line per snapshot for machine consumption
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use videowatch_core::{Render, RenderOptions, StatusSnapshot, TextRenderer};
//!
//! let options = RenderOptions {
//!     timestamps: false,
//!     ..RenderOptions::default()
//! };
//! let mut renderer = TextRenderer::new(Vec::new(), options);
//!
//! let snapshot = StatusSnapshot::new(json!({"clientsInfo": {"count": 3}}));
//! renderer.render(&snapshot).unwrap();
//!
//! let output = String::from_utf8(renderer.into_inner()).unwrap();
//! assert_eq!(output, "clientsInfo:\n  count: 3\n");
//! ```

use std::io::Write;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::format::bytes_as_readable_size;
use crate::snapshot::StatusSnapshot;

/// Sections the server is known to publish, in display order.
///
/// Known sections render first, in this order; unknown sections follow
/// alphabetically. Unknown shapes still render generically.
const PREFERRED_SECTIONS: [&str; 6] = [
    "appInfo",
    "memoryUsageInfo",
    "bandwidthInfo",
    "clientsInfo",
    "channelsInfo",
    "webSocketsInfo",
];

/// ANSI sequence clearing the screen and homing the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Errors a renderer can report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the render sink failed.
    #[error("render sink error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be re-serialized for output.
    #[error("render serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The output format for snapshot display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON lines.
    Json,
}

/// Configuration options for snapshot rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Clear the screen before each update (dashboard mode).
    pub clear_screen: bool,
    /// Prepend an update timestamp line to each snapshot.
    pub timestamps: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            clear_screen: false,
            timestamps: true,
        }
    }
}

/// Receives parsed snapshots and connection notices for display.
pub trait Render {
    /// Renders one status snapshot.
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), RenderError>;

    /// Shows a connection-state notice in place of fresh data.
    fn connection_lost(&mut self, notice: &str) -> Result<(), RenderError>;
}

/// Human-readable renderer for terminal output.
pub struct TextRenderer<W> {
    writer: W,
    options: RenderOptions,
}

impl TextRenderer<std::io::Stdout> {
    /// Creates a renderer writing to stdout.
    pub fn stdout(options: RenderOptions) -> Self {
        Self::new(std::io::stdout(), options)
    }
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer writing to the given sink.
    pub fn new(writer: W, options: RenderOptions) -> Self {
        Self { writer, options }
    }

    /// Unwraps the renderer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders a snapshot with an explicit timestamp.
    ///
    /// This variant is useful for testing with a fixed time.
    pub fn render_at(
        &mut self,
        snapshot: &StatusSnapshot,
        now: DateTime<Local>,
    ) -> Result<(), RenderError> {
        if self.options.clear_screen {
            self.writer.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        if self.options.timestamps {
            writeln!(self.writer, "Updated {}", now.format("%H:%M:%S"))?;
            writeln!(self.writer)?;
        }

        match snapshot.value() {
            Value::Object(map) if map.is_empty() => {
                writeln!(self.writer, "(no status data)")?;
            }
            Value::Object(_) => {
                for (key, value) in ordered_sections(snapshot) {
                    self.write_entry(key, value, 0)?;
                }
            }
            other => writeln!(self.writer, "{other}")?,
        }

        self.writer.flush()?;
        Ok(())
    }

    fn write_entry(&mut self, key: &str, value: &Value, depth: usize) -> Result<(), RenderError> {
        let pad = "  ".repeat(depth);
        match value {
            Value::Object(map) if map.is_empty() => writeln!(self.writer, "{pad}{key}:")?,
            Value::Object(map) => {
                writeln!(self.writer, "{pad}{key}:")?;
                for (child_key, child) in map {
                    self.write_entry(child_key, child, depth + 1)?;
                }
            }
            Value::Array(items) if items.is_empty() => {
                writeln!(self.writer, "{pad}{key}: []")?;
            }
            Value::Array(items) => {
                writeln!(self.writer, "{pad}{key}:")?;
                for item in items {
                    self.write_item(item, depth + 1)?;
                }
            }
            scalar => {
                writeln!(self.writer, "{pad}{key}: {}", display_scalar(key, scalar))?;
            }
        }
        Ok(())
    }

    fn write_item(&mut self, item: &Value, depth: usize) -> Result<(), RenderError> {
        let pad = "  ".repeat(depth);
        match item {
            Value::Object(map) => {
                writeln!(self.writer, "{pad}-")?;
                for (key, value) in map {
                    self.write_entry(key, value, depth + 1)?;
                }
            }
            other => writeln!(self.writer, "{pad}- {}", display_scalar("", other))?,
        }
        Ok(())
    }
}

impl<W: Write> Render for TextRenderer<W> {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), RenderError> {
        self.render_at(snapshot, Local::now())
    }

    fn connection_lost(&mut self, notice: &str) -> Result<(), RenderError> {
        if self.options.clear_screen {
            self.writer.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        writeln!(self.writer, "{notice}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Machine-readable renderer emitting one JSON line per update.
pub struct JsonRenderer<W> {
    writer: W,
}

impl JsonRenderer<std::io::Stdout> {
    /// Creates a renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonRenderer<W> {
    /// Creates a renderer writing to the given sink.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwraps the renderer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), RenderError> {
        let line = serde_json::to_string(snapshot.value())?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn connection_lost(&mut self, notice: &str) -> Result<(), RenderError> {
        let line = serde_json::to_string(&serde_json::json!({ "notice": notice }))?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects top-level sections, known ones first in publication order.
fn ordered_sections(snapshot: &StatusSnapshot) -> Vec<(&String, &Value)> {
    let mut sections: Vec<(&String, &Value)> = snapshot.sections().collect();
    sections.sort_by(|a, b| section_rank(a.0).cmp(&section_rank(b.0)));
    sections
}

fn section_rank(key: &str) -> (usize, &str) {
    let preferred = PREFERRED_SECTIONS
        .iter()
        .position(|name| *name == key)
        .unwrap_or(PREFERRED_SECTIONS.len());
    (preferred, key)
}

/// Formats a scalar for display, humanizing byte counters.
fn display_scalar(key: &str, value: &Value) -> String {
    if is_byte_quantity_key(key)
        && let Some(bytes) = value.as_u64()
    {
        return bytes_as_readable_size(bytes);
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// True for keys that carry byte counters in server snapshots.
fn is_byte_quantity_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("bytes") || key.contains("bandwidth")
}
