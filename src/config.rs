use std::path::PathBuf;

use anyhow::{bail, Result};

/// Service configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Nextflow executable used for remote pipeline runs
    pub nextflow_bin: String,
    /// Pipeline repository passed to `nextflow run`
    pub pipeline_repository: String,
    /// Directory with locally installed pipeline scripts; overrides the repository
    pub scripts_dir: Option<PathBuf>,
    /// Run stages through a shell instead of a direct argument vector
    pub use_shell: bool,
    /// Shell used in shell mode
    pub shell: String,
    /// Project directory the job runs in
    pub work_dir: PathBuf,
    /// Trace file written by nextflow in the working directory
    pub trace_file: String,
    /// Whether to show detailed logs
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nextflow_bin: "nextflow".to_string(),
            pipeline_repository: "LanguageMachines/PICCL".to_string(),
            scripts_dir: None,
            use_shell: false,
            shell: "/bin/sh".to_string(),
            work_dir: PathBuf::from("."),
            trace_file: "trace.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            nextflow_bin: std::env::var("PICCL_NEXTFLOW").unwrap_or(default.nextflow_bin),
            pipeline_repository: std::env::var("PICCL_REPOSITORY")
                .unwrap_or(default.pipeline_repository),
            scripts_dir: std::env::var("PICCL_SCRIPTS_DIR")
                .ok()
                .map(PathBuf::from)
                .or(default.scripts_dir),
            use_shell: std::env::var("PICCL_USE_SHELL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.use_shell),
            shell: std::env::var("PICCL_SHELL").unwrap_or(default.shell),
            work_dir: std::env::var("PICCL_WORKDIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(default.work_dir),
            trace_file: std::env::var("PICCL_TRACE_FILE").unwrap_or(default.trace_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }

    /// Apply the optional scripts directory passed on the command line
    pub fn with_scripts_dir(mut self, scripts_dir: Option<PathBuf>) -> Self {
        if scripts_dir.is_some() {
            self.scripts_dir = scripts_dir;
        }
        self
    }
}

/// Positional arguments the hosting framework invokes the wrapper with
#[derive(Clone, Debug)]
pub struct Invocation {
    /// Settings file describing the chosen parameters and inputs
    pub settings_file: PathBuf,
    /// Status file progress messages are appended to
    pub status_file: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Root holding `data/int/<lang>` support files
    pub data_root: PathBuf,
    /// Locally installed pipeline scripts
    pub scripts_dir: Option<PathBuf>,
}

pub const USAGE: &str =
    "usage: picclservice-wrapper SETTINGS STATUSFILE INPUTDIR OUTPUTDIR DATAROOT [SCRIPTSDIR]";

impl Invocation {
    /// Parse the argument list, program name excluded
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.len() < 5 || args.len() > 6 {
            bail!("expected 5 or 6 arguments, got {}\n{}", args.len(), USAGE);
        }
        Ok(Self {
            settings_file: PathBuf::from(&args[0]),
            status_file: PathBuf::from(&args[1]),
            input_dir: PathBuf::from(&args[2]),
            output_dir: PathBuf::from(&args[3]),
            data_root: PathBuf::from(&args[4]),
            scripts_dir: args.get(5).map(PathBuf::from),
        })
    }
}
