//! Refresh orchestration: fetch both upstreams, derive GDP, commit atomically, re-render.

mod actor;
mod pipeline;

pub use actor::{RefreshHandle, RefreshMessage, spawn};
pub use pipeline::{RefreshOutcome, RefreshPhase, RefreshPipeline};
