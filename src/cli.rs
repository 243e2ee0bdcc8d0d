use crate::engine_config::CondaFrontend;
use crate::launcher::DEFAULT_ENGINE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nflaunch - a thin launcher for Nextflow workflow pipelines
#[derive(Parser)]
#[command(name = "nflaunch")]
#[command(about = "Materialize pipeline configuration and hand off to Nextflow")]
#[command(version)]
pub struct Cli {
    /// Directory holding the bundled templates (params.yaml, nextflow.config,
    /// workflow.nf).
    ///
    /// Defaults to $NFLAUNCH_RESOURCES, then a workflow/ directory next to
    /// the executable, then ./workflow.
    #[arg(long, global = true)]
    pub resources: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bundled workflow through Nextflow
    #[command(after_help = RUN_EPILOG)]
    Run {
        /// Input file/directory, merged into the parameters file as `input`
        #[arg(long)]
        input: String,

        /// Runtime parameters file (created from the bundled template if absent)
        #[arg(long, default_value = "params.yaml")]
        paramsfile: PathBuf,

        /// Engine configuration file (rewritten from the bundled template each run)
        #[arg(long, default_value = "nextflow.config")]
        configfile: PathBuf,

        /// Number of threads; adds an `executor { cpus = N }` block
        #[arg(long)]
        threads: Option<u32>,

        /// Use conda for workflow processes (default)
        #[arg(long = "use-conda", overrides_with = "no_use_conda")]
        use_conda: bool,

        /// Disable conda for workflow processes
        #[arg(long = "no-use-conda")]
        no_use_conda: bool,

        /// Conda frontend
        #[arg(long, value_enum, default_value_t = CondaFrontend::Mamba)]
        conda_frontend: CondaFrontend,

        /// Conda environment cache directory (default: <resources>/conda)
        #[arg(long)]
        conda_prefix: Option<PathBuf>,

        /// Workflow engine binary to invoke
        #[arg(long, default_value = DEFAULT_ENGINE)]
        engine: String,

        /// Extra arguments passed to the engine verbatim, after `--`
        #[arg(last = true)]
        nf_args: Vec<String>,
    },
    /// Copy the bundled default templates to the given paths
    Config {
        /// Destination for the engine configuration template
        #[arg(long, default_value = "nextflow.config")]
        configfile: PathBuf,

        /// Destination for the parameters template
        #[arg(long, default_value = "params.yaml")]
        paramsfile: PathBuf,
    },
    /// Print the citation for this pipeline
    Citation,
}

const RUN_EPILOG: &str = "\
CLUSTER EXECUTION:
  nflaunch run ... -- -profile [profile],[profile],...
For information on Nextflow config and profiles see:
  https://www.nextflow.io/docs/latest/config.html#config-profiles

RUN EXAMPLES:
  Required:           nflaunch run --input [file]
  Specify threads:    nflaunch run ... --threads [threads]
  Disable conda:      nflaunch run ... --no-use-conda
  Add Nextflow args:  nflaunch run ... -- -resume -with-report report.html";

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

/// Resolve the --use-conda / --no-use-conda pair. Conda is on by default.
pub fn conda_enabled(use_conda: bool, no_use_conda: bool) -> bool {
    use_conda || !no_use_conda
}
