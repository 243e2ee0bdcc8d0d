//! The launch orchestrator.
//!
//! One synchronous routine: stage the two configuration artifacts, merge
//! overrides into the parameters file, append scope blocks to the engine
//! configuration, then hand off to the workflow engine as a direct child
//! process and surface its exit status. The engine is invoked with an explicit
//! argument list — never through a shell — so paths need no quoting and the
//! passthrough arguments reach the engine exactly as given.
//!
//! There are no retries and no timeout: the orchestrator blocks until the
//! engine exits or is killed externally.

use crate::console;
use crate::engine_config::{conda_block, executor_block, CondaFrontend};
use crate::error::{NfLaunchError, Result};
use crate::params::{merge_params, read_params, render_params, write_params, ParamMap};
use crate::templates::{StagePolicy, TemplateStore, ENGINE_CONFIG_TEMPLATE, PARAMS_TEMPLATE};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error};

/// Default workflow engine binary name.
pub const DEFAULT_ENGINE: &str = "nextflow";

/// Everything one launch needs, resolved by the CLI layer.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Engine binary to invoke (normally `nextflow`).
    pub engine: String,
    /// Workflow definition file passed to `<engine> run`.
    pub workflow: PathBuf,
    /// Parameters file to materialize and pass via `-params-file`.
    pub params_file: Option<PathBuf>,
    /// Engine configuration file to materialize and pass via `-c`.
    pub config_file: Option<PathBuf>,
    /// Command-line parameter overrides merged into the parameters file.
    pub overrides: ParamMap,
    /// When set, append `executor { cpus = N }` to the configuration.
    pub threads: Option<u32>,
    /// When true, append a `conda { ... }` block to the configuration.
    pub use_conda: bool,
    /// Which conda frontend the appended block selects.
    pub conda_frontend: CondaFrontend,
    /// Environment cache directory written into the conda block.
    pub conda_prefix: PathBuf,
    /// Passthrough arguments appended verbatim to the engine command line.
    pub extra_args: Vec<String>,
}

impl LaunchOptions {
    pub fn new(workflow: impl Into<PathBuf>) -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            workflow: workflow.into(),
            params_file: None,
            config_file: None,
            overrides: ParamMap::new(),
            threads: None,
            use_conda: false,
            conda_frontend: CondaFrontend::Mamba,
            conda_prefix: PathBuf::from("conda"),
            extra_args: Vec::new(),
        }
    }
}

/// Run the full launch sequence. Returns `Ok(())` only when the engine
/// exited with status zero.
pub fn launch(store: &TemplateStore, opts: &LaunchOptions) -> Result<()> {
    let mut args: Vec<OsString> = Vec::new();

    if let Some(params_path) = &opts.params_file {
        prepare_params_file(store, params_path, &opts.overrides, &mut args)?;
    }

    if let Some(config_path) = &opts.config_file {
        prepare_config_file(store, config_path, opts, &mut args)?;
    }

    for extra in &opts.extra_args {
        args.push(extra.into());
    }

    run_engine(opts, &args)
}

/// Stage the parameters file, merge overrides, rewrite it, and record the
/// `-params-file` argument.
fn prepare_params_file(
    store: &TemplateStore,
    params_path: &Path,
    overrides: &ParamMap,
    args: &mut Vec<OsString>,
) -> Result<()> {
    store.stage(PARAMS_TEMPLATE, params_path, StagePolicy::KeepExisting)?;

    let mut params = read_params(params_path)?;
    merge_params(&mut params, overrides);
    write_params(params_path, &params)?;

    args.push("-params-file".into());
    args.push(params_path.into());

    console::msg_box("Runtime parameters", Some(&render_params(&params)));
    Ok(())
}

/// Stage the engine configuration fresh from the template, append the
/// requested scope blocks, and record the `-c` argument.
///
/// The refresh is deliberate: appending onto a file left over from an earlier
/// run would accumulate duplicate scope blocks with engine-dependent
/// precedence.
fn prepare_config_file(
    store: &TemplateStore,
    config_path: &Path,
    opts: &LaunchOptions,
    args: &mut Vec<OsString>,
) -> Result<()> {
    store.stage(ENGINE_CONFIG_TEMPLATE, config_path, StagePolicy::Refresh)?;

    if let Some(threads) = opts.threads {
        executor_block(threads).append_to(config_path)?;
    }
    if opts.use_conda {
        conda_block(opts.conda_frontend, &opts.conda_prefix).append_to(config_path)?;
    }

    args.push("-c".into());
    args.push(config_path.into());

    let assembled = fs::read_to_string(config_path)?;
    console::msg_box("Launcher configuration", Some(&assembled));
    Ok(())
}

/// Spawn the engine with inherited stdio and block until it exits.
fn run_engine(opts: &LaunchOptions, args: &[OsString]) -> Result<()> {
    let mut command_display = format!("{} run {}", opts.engine, opts.workflow.display());
    for arg in args {
        command_display.push(' ');
        command_display.push_str(&arg.to_string_lossy());
    }
    console::msg_box("Nextflow command", Some(&command_display));

    debug!("spawning workflow engine: {}", command_display);
    let status = Command::new(&opts.engine)
        .arg("run")
        .arg(&opts.workflow)
        .args(args)
        .status()
        .map_err(|source| NfLaunchError::Launch {
            program: opts.engine.clone(),
            source,
        })?;

    if status.success() {
        console::msg("Nextflow finished successfully");
        Ok(())
    } else {
        let status = status.code().unwrap_or(1);
        error!("Error: Nextflow failed (exit status {})", status);
        Err(NfLaunchError::ExternalTool { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Templates live under `templates/`, staged artifacts land in the
    /// tempdir root, so the two never collide.
    fn fixture_store(dir: &Path) -> TemplateStore {
        let root = dir.join("templates");
        fs::create_dir(&root).unwrap();
        fs::write(root.join(PARAMS_TEMPLATE), "input: null\n").unwrap();
        fs::write(root.join(ENGINE_CONFIG_TEMPLATE), "// defaults\n").unwrap();
        TemplateStore::new(root)
    }

    #[test]
    fn test_prepare_params_file_merges_and_records_arg() {
        let dir = tempdir().unwrap();
        let store = fixture_store(dir.path());
        let params_path = dir.path().join("params.yaml");

        let mut overrides = ParamMap::new();
        overrides.insert(
            "input".into(),
            serde_yaml::Value::String("/data/reads".into()),
        );

        let mut args = Vec::new();
        prepare_params_file(&store, &params_path, &overrides, &mut args).unwrap();

        assert_eq!(args[0], OsString::from("-params-file"));
        assert_eq!(args[1], OsString::from(&params_path));

        let written = fs::read_to_string(&params_path).unwrap();
        assert!(written.contains("input: /data/reads"));
    }

    #[test]
    fn test_prepare_config_file_appends_requested_blocks() {
        let dir = tempdir().unwrap();
        let store = fixture_store(dir.path());
        let config_path = dir.path().join("nextflow.config");

        let mut opts = LaunchOptions::new("workflow.nf");
        opts.threads = Some(4);
        opts.use_conda = true;
        opts.conda_frontend = CondaFrontend::Mamba;
        opts.conda_prefix = PathBuf::from("/tmp/envs");

        let mut args = Vec::new();
        prepare_config_file(&store, &config_path, &opts, &mut args).unwrap();

        assert_eq!(args[0], OsString::from("-c"));
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.starts_with("// defaults\n"));
        assert!(contents.contains("cpus = 4"));
        assert!(contents.contains("useMamba = \"true\""));
        assert!(contents.contains("cacheDir = \"/tmp/envs\""));
    }

    #[test]
    fn test_prepare_config_file_refreshes_stale_blocks() {
        let dir = tempdir().unwrap();
        let store = fixture_store(dir.path());
        let config_path = dir.path().join("nextflow.config");

        // Leftovers from a previous invocation must not accumulate.
        fs::write(&config_path, "// defaults\nexecutor {\n  cpus = 99\n}\n").unwrap();

        let mut opts = LaunchOptions::new("workflow.nf");
        opts.threads = Some(2);

        let mut args = Vec::new();
        prepare_config_file(&store, &config_path, &opts, &mut args).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(!contents.contains("cpus = 99"));
        assert_eq!(contents.matches("executor {").count(), 1);
    }

    #[test]
    fn test_launch_unstartable_engine() {
        let dir = tempdir().unwrap();
        let store = fixture_store(dir.path());

        let mut opts = LaunchOptions::new(dir.path().join("workflow.nf"));
        opts.engine = "nflaunch-test-no-such-binary".to_string();

        let err = launch(&store, &opts).unwrap_err();
        assert!(matches!(err, NfLaunchError::Launch { .. }));
    }
}
