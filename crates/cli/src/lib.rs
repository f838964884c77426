//! bloomscope host
//!
//! Runs the engine without a UI: datasets come from files, the catalog or a
//! URL, playback runs on tokio timers, and every published view is logged.

pub mod loader;
pub mod ticker;

pub use loader::{DatasetSource, load_config, load_records};
pub use ticker::TokioScheduler;
