//! Project layer: configuration, file loading and the load/edit cycles.
//!
//! Nothing here knows about editor features: the outline is rebuilt through
//! the [`LoadingHost`] hook, which the IDE layer implements.

pub mod config;
pub mod file_loader;
mod loading;

pub use config::{Config, ConfigError, DEFAULT_INPUT_DELAY_MS};
pub use file_loader::{LoadError, SourceDocument, TURTLE_EXTENSION, load_directory};
pub use loading::{
    ChangeQueue, CycleReport, LoadingHandler, LoadingHost, ProgressSink, Stage, TotalProgress,
};
