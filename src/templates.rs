//! Bundled template resolution and staging.
//!
//! The launcher ships a resource root (a `workflow/` directory) containing the
//! default parameters file, the default engine configuration, and the workflow
//! definition itself. The root is an explicit value injected at startup — from
//! the `--resources` flag or the `NFLAUNCH_RESOURCES` environment variable —
//! never an implicit global lookup.

use crate::console;
use crate::error::{NfLaunchError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the default resource root.
pub const RESOURCES_ENV: &str = "NFLAUNCH_RESOURCES";

/// Bundled default parameters file name.
pub const PARAMS_TEMPLATE: &str = "params.yaml";
/// Bundled default engine configuration file name.
pub const ENGINE_CONFIG_TEMPLATE: &str = "nextflow.config";
/// Bundled workflow definition file name.
pub const WORKFLOW_FILE: &str = "workflow.nf";

/// What to do when the staging destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePolicy {
    /// Leave an existing destination untouched; copy only when absent.
    /// Used for the parameters file so user edits survive repeat runs.
    KeepExisting,
    /// Always copy, replacing any existing destination.
    /// Used for the engine configuration so scope blocks appended by a
    /// previous run never accumulate.
    Refresh,
}

/// Read-only locator for the bundled resource root.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Create a store rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the resource root when none was given on the command line.
    ///
    /// Order: `NFLAUNCH_RESOURCES`, then a `workflow/` directory next to the
    /// executable (installed layout), then `./workflow` (source checkout).
    pub fn discover() -> Self {
        if let Ok(dir) = env::var(RESOURCES_ENV) {
            return Self::new(dir);
        }
        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                let candidate = dir.join("workflow");
                if candidate.is_dir() {
                    return Self::new(candidate);
                }
            }
        }
        Self::new("workflow")
    }

    /// The resource root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute-or-relative path of a bundled template, verified to exist.
    pub fn template_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(NfLaunchError::TemplateMissing(path));
        }
        Ok(path)
    }

    /// Path of the bundled workflow definition, verified to exist.
    pub fn workflow_file(&self) -> Result<PathBuf> {
        self.template_path(WORKFLOW_FILE)
    }

    /// Stage a bundled template at `dest` according to `policy`.
    ///
    /// A fresh copy is byte-identical to the template. Returns an error if
    /// the template itself is missing; the destination's parent directory
    /// must already exist.
    pub fn stage(&self, name: &str, dest: &Path, policy: StagePolicy) -> Result<()> {
        let template = self.template_path(name)?;
        if policy == StagePolicy::KeepExisting && dest.exists() {
            debug!("{} already exists, keeping it", dest.display());
            console::msg(&format!(
                "Config file {} already exists. Using existing file.",
                dest.display()
            ));
            return Ok(());
        }
        console::msg(&format!(
            "Copying system default config to {}",
            dest.display()
        ));
        fs::copy(&template, dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with_template(contents: &str) -> (tempfile::TempDir, TemplateStore) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PARAMS_TEMPLATE), contents).unwrap();
        let store = TemplateStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_stage_copies_byte_identical() {
        let (dir, store) = store_with_template("input: null\nthreads: 1\n");
        let dest = dir.path().join("params-copy.yaml");

        store
            .stage(PARAMS_TEMPLATE, &dest, StagePolicy::Refresh)
            .unwrap();

        let template = fs::read(dir.path().join(PARAMS_TEMPLATE)).unwrap();
        let copy = fs::read(&dest).unwrap();
        assert_eq!(template, copy);
    }

    #[test]
    fn test_keep_existing_preserves_destination() {
        let (dir, store) = store_with_template("input: null\n");
        let dest = dir.path().join("params.local.yaml");
        fs::write(&dest, "input: /data/reads\n").unwrap();

        store
            .stage(PARAMS_TEMPLATE, &dest, StagePolicy::KeepExisting)
            .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "input: /data/reads\n");
    }

    #[test]
    fn test_refresh_replaces_destination() {
        let (dir, store) = store_with_template("input: null\n");
        let dest = dir.path().join("params.local.yaml");
        fs::write(&dest, "input: /data/reads\n").unwrap();

        store
            .stage(PARAMS_TEMPLATE, &dest, StagePolicy::Refresh)
            .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "input: null\n");
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path());
        let dest = dir.path().join("out.yaml");

        let err = store
            .stage(PARAMS_TEMPLATE, &dest, StagePolicy::Refresh)
            .unwrap_err();
        assert!(matches!(err, NfLaunchError::TemplateMissing(_)));
    }

    #[test]
    fn test_workflow_file_lookup() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(WORKFLOW_FILE), "workflow { }\n").unwrap();
        let store = TemplateStore::new(dir.path());

        let path = store.workflow_file().unwrap();
        assert!(path.ends_with(WORKFLOW_FILE));

        let missing = TemplateStore::new(dir.path().join("nope"));
        assert!(missing.workflow_file().is_err());
    }
}
