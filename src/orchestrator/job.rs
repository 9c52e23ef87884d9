//! Job processor - orchestration layer
//!
//! Entry point of one wrapper run. Owns the run lifecycle:
//!
//! 1. **Pre-flight**: load settings, resolve the request, link language
//!    assets, detect the input type
//! 2. **Plan**: hand the request to the pure stage planner
//! 3. **Run**: process the stages in order, stopping at the first failure
//! 4. **Finish**: final status, cleanup of the working directory
//!
//! Every failure ends in the same abort path: an `ERROR:` status line, a
//! diagnostic message, rollback of published links and cleanup unless debug
//! is set.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::{Config, Invocation};
use crate::error::{exit_code, PicclError, Result};
use crate::infrastructure::StageRunner;
use crate::models::{load_run_settings, RunRequest};
use crate::orchestrator::stage_processor;
use crate::services::{
    detect_input_type, resolve_language_assets, Diagnostics, Publisher, StatusWriter, SupportFile,
};
use crate::utils::logging;
use crate::workflow::{plan_stages, StageKind};

/// Directory nextflow keeps its task work in
const NEXTFLOW_WORK_DIR: &str = "work";

/// Run statistics
#[derive(Debug, Default)]
struct RunStats {
    stages_run: usize,
    published: usize,
}

/// One wrapper run
pub struct Orchestrator {
    config: Config,
    invocation: Invocation,
    work_dir: PathBuf,
    status: StatusWriter,
    diagnostics: Diagnostics,
    publisher: Publisher,
    /// Keep intermediate output; known once the settings are loaded
    debug: bool,
}

impl Orchestrator {
    pub fn new(config: Config, invocation: Invocation) -> Self {
        let invocation = Invocation {
            input_dir: absolute(invocation.input_dir),
            output_dir: absolute(invocation.output_dir),
            data_root: absolute(invocation.data_root),
            ..invocation
        };
        let work_dir = absolute(config.work_dir.clone());
        let status = StatusWriter::new(&invocation.status_file);
        let publisher = Publisher::new(&invocation.output_dir);

        Self {
            config,
            invocation,
            work_dir,
            status,
            diagnostics: Diagnostics::stderr(),
            publisher,
            debug: false,
        }
    }

    /// Send diagnostics somewhere other than stderr
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Run the job
    ///
    /// # Returns
    /// The process exit code
    pub async fn run(mut self) -> i32 {
        self.status.report("Starting...", 0);

        match self.execute().await {
            Ok(stats) => {
                if !self.debug {
                    self.cleanup(false);
                }
                self.status.report("All done!", 100);
                logging::print_final_stats(
                    stats.stages_run,
                    stats.published,
                    &self.invocation.output_dir.to_string_lossy(),
                );
                exit_code::SUCCESS
            }
            Err(e) => self.abort(e),
        }
    }

    async fn execute(&mut self) -> Result<RunStats> {
        let settings = load_run_settings(&self.invocation.settings_file).await?;
        let request = RunRequest::from_parameters(&settings.parameters)?;
        self.debug = request.debug;

        fs::create_dir_all(&self.work_dir)?;
        resolve_language_assets(
            request.language,
            &self.invocation.data_root,
            &self.work_dir,
            &self.invocation.input_dir,
        )?;
        let input_type = detect_input_type(&settings.inputs)?;

        let stages = plan_stages(&request, input_type, &self.invocation.input_dir);
        logging::log_startup(request.language, input_type, &stages);
        if stages.is_empty() {
            warn!("No stages selected for this run, nothing to do");
        }

        let runner = StageRunner::new(&self.config, &self.work_dir);
        let mut stats = RunStats::default();

        for (index, spec) in stages.iter().enumerate() {
            logging::log_stage_start(index + 1, stages.len(), spec);
            let (message, percent) = spec.kind.status();
            self.status.report(message, percent);

            let stage_stats = stage_processor::process_stage(
                &runner,
                spec,
                &mut self.publisher,
                &mut self.diagnostics,
            )
            .await?;

            stats.stages_run += 1;
            stats.published += stage_stats.published.len();
        }

        Ok(stats)
    }

    fn abort(&mut self, error: PicclError) -> i32 {
        error!("{}", error);
        if error.is_precondition() {
            info!("Pre-flight check failed, no stage was launched");
        }
        let message = format!("ERROR: {}", error);
        self.status.report(&message, 0);
        self.diagnostics.line(&message);

        self.publisher.rollback();
        if self.debug {
            info!("Debug mode, keeping {}", self.work_dir.display());
        } else {
            self.cleanup(true);
        }
        error.exit_code()
    }

    /// Remove intermediate output
    ///
    /// Stage directories something was published from stay, since the
    /// published links point into them. After a failure nothing stays.
    fn cleanup(&self, failed: bool) {
        remove_dir(&self.work_dir.join(NEXTFLOW_WORK_DIR));

        for file in SupportFile::ALL {
            let link = self.work_dir.join(file.link_name());
            if fs::symlink_metadata(&link).is_ok() {
                if let Err(e) = fs::remove_file(&link) {
                    warn!("Unable to remove {}: {}", link.display(), e);
                }
            }
        }

        for kind in [
            StageKind::Ocr,
            StageKind::Normalization,
            StageKind::Enrichment,
            StageKind::Tokenization,
        ] {
            let dir = absolute(self.work_dir.join(kind.output_dir()));
            if failed || !self.publisher.has_published_from(&dir) {
                remove_dir(&dir);
            }
        }
    }
}

fn remove_dir(dir: &Path) {
    if !dir.is_dir() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!("Unable to remove {}: {}", dir.display(), e);
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
