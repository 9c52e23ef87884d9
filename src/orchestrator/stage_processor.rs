//! Single stage processor - orchestration layer
//!
//! Runs one planned stage and deals with everything it leaves behind:
//!
//! 1. **Launch**: hand the [`StageSpec`] to the [`StageRunner`]
//! 2. **Trace**: print and delete the pipeline trace
//! 3. **Logs**: echo them on success, replay them on failure
//! 4. **Publish**: link the declared outputs into the output directory

use std::path::PathBuf;

use tracing::{error, info};

use crate::error::{PicclError, Result};
use crate::infrastructure::StageRunner;
use crate::services::{Diagnostics, Publisher};
use crate::workflow::{StageResult, StageSpec};

/// What one successful stage contributed
#[derive(Debug, Default)]
pub struct StageStats {
    pub published: Vec<PathBuf>,
}

/// Run one stage to completion
///
/// # Returns
/// The links published for this stage. A non-zero exit becomes
/// [`PicclError::StageFailed`] after both logs were replayed.
pub async fn process_stage(
    runner: &StageRunner,
    spec: &StageSpec,
    publisher: &mut Publisher,
    diagnostics: &mut Diagnostics,
) -> Result<StageStats> {
    let result = runner.run_stage(spec).await?;

    if let Some(trace) = runner.take_trace() {
        diagnostics.section(&format!("{} pipeline trace summary", spec.kind), &trace);
    }

    write_logs(&result, diagnostics);
    runner.discard_logs(spec.kind);

    if !result.exit_success {
        error!("{} pipeline failed: {}", spec.kind, result.status);
        return Err(PicclError::StageFailed {
            stage: spec.kind,
            status: result.status.to_string(),
        });
    }

    let published = publisher.publish(&result.output_directory, &spec.publish)?;
    info!("✓ {} finished", spec.kind);

    Ok(StageStats { published })
}

fn write_logs(result: &StageResult, diagnostics: &mut Diagnostics) {
    let logs = [
        (result.stage_name.stdout_log(), &result.stdout_log),
        (result.stage_name.stderr_log(), &result.stderr_log),
    ];
    for (name, content) in logs {
        // a failed stage always shows both logs, empty or not
        if result.exit_success && content.is_empty() {
            continue;
        }
        diagnostics.section(&name, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::workflow::{PublishRule, StageKind};

    fn tokenize_spec() -> StageSpec {
        StageSpec {
            kind: StageKind::Tokenization,
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("tok_outputdir"),
            args: vec!["--outputdir".to_string(), "tok_outputdir".to_string()],
            publish: vec![PublishRule::FoliaDocuments],
        }
    }

    #[tokio::test]
    async fn test_unlaunchable_stage() {
        let work = tempfile::tempdir().unwrap();
        let config = Config {
            nextflow_bin: "/nonexistent/nextflow".to_string(),
            ..Config::default()
        };
        let runner = StageRunner::new(&config, work.path());
        let mut publisher = Publisher::new(work.path().join("output"));
        let (mut diagnostics, output) = Diagnostics::capture();

        let err = process_stage(&runner, &tokenize_spec(), &mut publisher, &mut diagnostics)
            .await
            .unwrap_err();
        assert!(matches!(err, PicclError::StageLaunch { .. }));
        assert!(output.contents().is_empty());
        assert!(publisher.published().is_empty());
        assert!(!work.path().join("tokenize.nextflow.out.log").exists());
        assert!(!work.path().join("tokenize.nextflow.err.log").exists());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_stage_failure() {
        let work = tempfile::tempdir().unwrap();
        let config = Config {
            nextflow_bin: "false".to_string(),
            ..Config::default()
        };
        let runner = StageRunner::new(&config, work.path());
        let mut publisher = Publisher::new(work.path().join("output"));
        let (mut diagnostics, output) = Diagnostics::capture();

        let err = process_stage(&runner, &tokenize_spec(), &mut publisher, &mut diagnostics)
            .await
            .unwrap_err();
        assert!(matches!(err, PicclError::StageFailed { stage: StageKind::Tokenization, .. }));

        // `false` prints nothing, the headers still appear
        let text = output.contents();
        assert!(text.contains("tokenize.nextflow.out.log"));
        assert!(text.contains("tokenize.nextflow.err.log"));
        assert!(!work.path().join("tokenize.nextflow.out.log").exists());
        assert!(!work.path().join("output").exists());
    }

    #[tokio::test]
    async fn test_successful_stage_echoes_logs_and_trace() {
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("trace.txt"), "task_id\tstatus\n").unwrap();
        let config = Config {
            nextflow_bin: "echo".to_string(),
            ..Config::default()
        };
        let runner = StageRunner::new(&config, work.path());
        let mut publisher = Publisher::new(work.path().join("output"));
        let (mut diagnostics, output) = Diagnostics::capture();

        let stats = process_stage(&runner, &tokenize_spec(), &mut publisher, &mut diagnostics)
            .await
            .unwrap();
        assert!(stats.published.is_empty());

        let text = output.contents();
        assert!(text.contains("Tokeniser pipeline trace summary"));
        assert!(text.contains("tokenize.nextflow.out.log"));
        assert!(text.contains("run LanguageMachines/PICCL/tokenize.nf"));
        assert!(!work.path().join("trace.txt").exists());
    }
}
