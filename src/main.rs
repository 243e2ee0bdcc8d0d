//! nflaunch - Main entry point
//!
//! Thin command-line launcher for a bundled Nextflow pipeline: materialize
//! the runtime configuration, shell out to the engine, surface its status.

use nflaunch::cli::{conda_enabled, Cli, Commands};
use nflaunch::launcher::{launch, LaunchOptions};
use nflaunch::params::ParamMap;
use nflaunch::templates::{StagePolicy, TemplateStore, ENGINE_CONFIG_TEMPLATE, PARAMS_TEMPLATE};
use nflaunch::{console, Result};
use tracing::error;

const CITATION: &str = "\
If you use this pipeline in your work, please cite:

  nflaunch: a thin launcher for Nextflow pipelines
  https://github.com/nflaunch/nflaunch

along with Nextflow itself:

  Di Tommaso, P. et al. Nextflow enables reproducible computational
  workflows. Nature Biotechnology 35, 316-319 (2017).";

/// Initialize the tracing subscriber with appropriate settings
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            // RUST_LOG overrides the default level
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() {
    init_tracing();
    console::msg(&format!("nflaunch version {}", env!("CARGO_PKG_VERSION")));

    let cli = Cli::parse_args();
    if let Err(e) = dispatch(cli) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let store = match &cli.resources {
        Some(root) => TemplateStore::new(root),
        None => TemplateStore::discover(),
    };

    match cli.command {
        Commands::Run {
            input,
            paramsfile,
            configfile,
            threads,
            use_conda,
            no_use_conda,
            conda_frontend,
            conda_prefix,
            engine,
            nf_args,
        } => {
            let workflow = store.workflow_file()?;

            let mut overrides = ParamMap::new();
            overrides.insert("input".to_string(), serde_yaml::Value::String(input));

            let opts = LaunchOptions {
                engine,
                workflow,
                params_file: Some(paramsfile),
                config_file: Some(configfile),
                overrides,
                threads,
                use_conda: conda_enabled(use_conda, no_use_conda),
                conda_frontend,
                conda_prefix: conda_prefix.unwrap_or_else(|| store.root().join("conda")),
                extra_args: nf_args,
            };

            launch(&store, &opts)
        }
        Commands::Config {
            configfile,
            paramsfile,
        } => {
            store.stage(PARAMS_TEMPLATE, &paramsfile, StagePolicy::Refresh)?;
            store.stage(ENGINE_CONFIG_TEMPLATE, &configfile, StagePolicy::Refresh)?;
            Ok(())
        }
        Commands::Citation => {
            println!("{}", CITATION);
            Ok(())
        }
    }
}
