//! Stage runner - infrastructure layer
//!
//! The only place that spawns external processes. Knows how to launch a
//! pipeline entry point and capture its output, nothing about which stages
//! a run needs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{PicclError, Result};
use crate::utils::logging::truncate_text;
use crate::utils::shell;
use crate::workflow::{StageKind, StageResult, StageSpec};

/// Launcher for external pipeline stages
///
/// Responsibilities:
/// - build the argument vector (or, in shell mode, one quoted command line)
/// - redirect stdout/stderr to per-stage log files
/// - wait for the process and report its exit status
pub struct StageRunner {
    config: Config,
    work_dir: PathBuf,
}

/// Program and arguments for one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl StageCommand {
    /// Rendering with every word shell-quoted
    pub fn to_shell_line(&self) -> String {
        shell::command_line(&self.program, &self.args)
    }
}

impl StageRunner {
    pub fn new(config: &Config, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: config.clone(),
            work_dir: work_dir.into(),
        }
    }

    /// Command that runs `spec` directly
    pub fn pipeline_command(&self, spec: &StageSpec) -> StageCommand {
        let script = spec.kind.script();
        let (program, mut args) = match &self.config.scripts_dir {
            Some(dir) => (dir.join(script).to_string_lossy().into_owned(), Vec::new()),
            None => (
                self.config.nextflow_bin.clone(),
                vec![
                    "run".to_string(),
                    format!("{}/{}", self.config.pipeline_repository, script),
                ],
            ),
        };
        args.extend(spec.args.iter().cloned());
        args.push("-with-trace".to_string());
        StageCommand { program, args }
    }

    /// Command actually spawned, honouring shell mode
    pub fn command(&self, spec: &StageSpec) -> StageCommand {
        let direct = self.pipeline_command(spec);
        if !self.config.use_shell {
            return direct;
        }
        StageCommand {
            program: self.config.shell.clone(),
            args: vec!["-c".to_string(), direct.to_shell_line()],
        }
    }

    /// Run one stage to completion
    ///
    /// A non-zero exit is not an error here; it is reported through
    /// [`StageResult::exit_success`]. Only a process that cannot be started
    /// fails.
    pub async fn run_stage(&self, spec: &StageSpec) -> Result<StageResult> {
        let output_dir = self.work_dir.join(&spec.output_dir);
        fs::create_dir_all(&output_dir)?;

        let stdout_path = self.log_path(spec.kind.stdout_log());
        let stderr_path = self.log_path(spec.kind.stderr_log());
        let stdout = fs::File::create(&stdout_path)?;
        let stderr = fs::File::create(&stderr_path)?;

        let command = self.command(spec);
        debug!("{}: {}", spec.kind, truncate_text(&command.to_shell_line(), 300));

        let spawned = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .await;
        let status = match spawned {
            Ok(status) => status,
            Err(source) => {
                self.discard_logs(spec.kind);
                return Err(PicclError::StageLaunch {
                    stage: spec.kind,
                    source,
                });
            }
        };

        Ok(StageResult {
            stage_name: spec.kind,
            output_directory: output_dir,
            exit_success: status.success(),
            status,
            stdout_log: read_lossy(&stdout_path),
            stderr_log: read_lossy(&stderr_path),
        })
    }

    /// Delete the log files of a stage
    pub fn discard_logs(&self, kind: StageKind) {
        for name in [kind.stdout_log(), kind.stderr_log()] {
            let path = self.log_path(name);
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Unable to remove {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Read and delete the trace file the last stage left behind
    pub fn take_trace(&self) -> Option<String> {
        let path = self.work_dir.join(&self.config.trace_file);
        let trace = fs::read_to_string(&path).ok()?;
        if let Err(e) = fs::remove_file(&path) {
            warn!("Unable to remove {}: {}", path.display(), e);
        }
        Some(trace)
    }

    fn log_path(&self, name: String) -> PathBuf {
        self.work_dir.join(name)
    }
}

fn read_lossy(path: &Path) -> String {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::PublishRule;

    fn spec(kind: StageKind) -> StageSpec {
        StageSpec {
            kind,
            input_dir: PathBuf::from("ocr_output"),
            output_dir: PathBuf::from(kind.output_dir()),
            args: vec![
                "--inputdir".to_string(),
                "ocr_output".to_string(),
                "--inputclass".to_string(),
                "my class; rm -rf /".to_string(),
            ],
            publish: vec![PublishRule::FoliaDocuments],
        }
    }

    #[test]
    fn test_remote_pipeline_command() {
        let runner = StageRunner::new(&Config::default(), "/work");
        let cmd = runner.command(&spec(StageKind::Normalization));
        assert_eq!(cmd.program, "nextflow");
        assert_eq!(cmd.args[..2], ["run", "LanguageMachines/PICCL/ticcl.nf"]);
        assert_eq!(cmd.args.last().map(String::as_str), Some("-with-trace"));
        assert!(cmd.args.contains(&"my class; rm -rf /".to_string()));
    }

    #[test]
    fn test_local_scripts_command() {
        let config = Config::default().with_scripts_dir(Some(PathBuf::from("/opt/piccl")));
        let runner = StageRunner::new(&config, "/work");
        let cmd = runner.command(&spec(StageKind::Ocr));
        assert_eq!(cmd.program, "/opt/piccl/ocr.nf");
        assert_eq!(cmd.args[0], "--inputdir");
    }

    #[test]
    fn test_shell_mode_quotes_every_value() {
        let config = Config {
            use_shell: true,
            ..Config::default()
        };
        let runner = StageRunner::new(&config, "/work");
        let cmd = runner.command(&spec(StageKind::Enrichment));
        assert_eq!(cmd.program, "/bin/sh");
        assert_eq!(cmd.args[0], "-c");
        assert_eq!(
            cmd.args[1],
            "nextflow run LanguageMachines/PICCL/frog.nf --inputdir ocr_output --inputclass 'my class; rm -rf /' -with-trace"
        );
    }

    #[test]
    fn test_run_stage_captures_output() {
        let work = tempfile::tempdir().unwrap();
        let config = Config {
            nextflow_bin: "echo".to_string(),
            use_shell: true,
            ..Config::default()
        };
        let runner = StageRunner::new(&config, work.path());

        let result = tokio_test::block_on(runner.run_stage(&spec(StageKind::Ocr))).unwrap();
        assert!(result.exit_success);
        assert_eq!(result.stage_name, StageKind::Ocr);
        assert!(result.stdout_log.contains("run LanguageMachines/PICCL/ocr.nf"));
        assert!(result.stdout_log.contains("my class; rm -rf /"));
        assert!(result.output_directory.ends_with("ocr_output"));
        assert!(work.path().join("ocr.nextflow.out.log").exists());

        runner.discard_logs(StageKind::Ocr);
        assert!(!work.path().join("ocr.nextflow.out.log").exists());
        assert!(!work.path().join("ocr.nextflow.err.log").exists());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let work = tempfile::tempdir().unwrap();
        let config = Config {
            nextflow_bin: "false".to_string(),
            ..Config::default()
        };
        let runner = StageRunner::new(&config, work.path());
        let result = runner.run_stage(&spec(StageKind::Tokenization)).await.unwrap();
        assert!(!result.exit_success);
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_launch() {
        let work = tempfile::tempdir().unwrap();
        let config = Config {
            nextflow_bin: "/nonexistent/nextflow".to_string(),
            ..Config::default()
        };
        let runner = StageRunner::new(&config, work.path());
        let err = runner.run_stage(&spec(StageKind::Ocr)).await.unwrap_err();
        assert!(matches!(err, PicclError::StageLaunch { stage: StageKind::Ocr, .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(!work.path().join("ocr.nextflow.out.log").exists());
        assert!(!work.path().join("ocr.nextflow.err.log").exists());
    }

    #[test]
    fn test_take_trace() {
        let work = tempfile::tempdir().unwrap();
        let runner = StageRunner::new(&Config::default(), work.path());
        assert!(runner.take_trace().is_none());

        fs::write(work.path().join("trace.txt"), "task_id\tstatus\n1\tCOMPLETED\n").unwrap();
        assert_eq!(runner.take_trace().unwrap(), "task_id\tstatus\n1\tCOMPLETED\n");
        assert!(!work.path().join("trace.txt").exists());
    }
}
