//! Core types: status snapshots, display formatting, rendering, tracing

pub mod format;
pub mod render;
pub mod snapshot;
pub mod tracing;

pub use format::{bytes_as_readable_size, round2};
pub use render::{JsonRenderer, Render, RenderError, RenderFormat, RenderOptions, TextRenderer};
pub use snapshot::StatusSnapshot;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
