//! nflaunch library
//!
//! Core functionality for the Nextflow launcher: template staging, parameters
//! merging, engine configuration scope blocks, and the launch orchestrator.

pub mod cli;
pub mod console;
pub mod engine_config;
pub mod error;
pub mod launcher;
pub mod params;
pub mod templates;

// Re-export main types for convenience
pub use cli::{conda_enabled, Cli, Commands};
pub use engine_config::{conda_block, executor_block, CondaFrontend, ScopeBlock};
pub use error::{NfLaunchError, Result};
pub use launcher::{launch, LaunchOptions, DEFAULT_ENGINE};
pub use params::{merge_params, read_params, render_params, write_params, ParamMap};
pub use templates::{StagePolicy, TemplateStore};
