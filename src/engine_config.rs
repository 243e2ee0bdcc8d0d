//! Engine configuration scope blocks.
//!
//! The Nextflow configuration file is plain text made of named scope blocks
//! (`executor { cpus = 4 }`). The launcher never edits blocks in place; it
//! appends new blocks after whatever the staged template contains.

use crate::error::Result;
use clap::ValueEnum;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Conda frontend the engine should use for per-process environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CondaFrontend {
    Mamba,
    Conda,
}

impl fmt::Display for CondaFrontend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CondaFrontend::Mamba => write!(f, "mamba"),
            CondaFrontend::Conda => write!(f, "conda"),
        }
    }
}

/// A named group of `key = value` settings destined for the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeBlock {
    scope: String,
    settings: Vec<(String, String)>,
}

impl ScopeBlock {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            settings: Vec::new(),
        }
    }

    /// Add a setting rendered verbatim (numbers, booleans the engine parses).
    pub fn set_raw(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.settings.push((key.into(), value.to_string()));
        self
    }

    /// Add a setting rendered as a double-quoted string.
    pub fn set_str(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.settings.push((key.into(), format!("\"{}\"", value)));
        self
    }

    /// Render the block in the engine's scope syntax.
    pub fn render(&self) -> String {
        let mut out = format!("{} {{\n", self.scope);
        for (key, value) in &self.settings {
            out.push_str(&format!("  {} = {}\n", key, value));
        }
        out.push_str("}\n");
        out
    }

    /// Append the rendered block to the configuration file. Existing content
    /// is left untouched; blocks land in call order.
    pub fn append_to(&self, config_path: &Path) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(config_path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// `executor { cpus = N }`
pub fn executor_block(threads: u32) -> ScopeBlock {
    ScopeBlock::new("executor").set_raw("cpus", threads)
}

/// `conda { ... }` for the selected frontend. The mamba frontend additionally
/// sets `useMamba`; both pin the environment cache directory.
pub fn conda_block(frontend: CondaFrontend, prefix: &Path) -> ScopeBlock {
    let block = ScopeBlock::new("conda");
    let block = match frontend {
        CondaFrontend::Mamba => block.set_str("useMamba", "true"),
        CondaFrontend::Conda => block,
    };
    block.set_str("cacheDir", prefix.display())
}
