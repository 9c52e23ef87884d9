//! Logging helpers
//!
//! Installs the tracing subscriber and formats the run banners

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{InputType, Language};
use crate::workflow::StageSpec;

/// Initialise logging on stderr, `RUST_LOG` overrides the default level
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log the run header
pub fn log_startup(language: Language, input_type: InputType, stages: &[StageSpec]) {
    info!("{}", "=".repeat(60));
    info!(
        "PICCL run - language {} ({}), input type {}",
        language.label(),
        language,
        input_type
    );
    let plan: Vec<String> = stages.iter().map(|s| s.kind.to_string()).collect();
    if plan.is_empty() {
        info!("Planned stages: (none)");
    } else {
        info!("Planned stages: {}", plan.join(" -> "));
    }
    info!("{}", "=".repeat(60));
}

/// Log the start of a stage
///
/// # Arguments
/// - `index`: position in the plan, starting at 1
/// - `total`: number of planned stages
pub fn log_stage_start(index: usize, total: usize, stage: &StageSpec) {
    info!("\n{}", "─".repeat(60));
    info!("Stage {}/{}: {} ({})", index, total, stage.kind, stage.kind.script());
    info!("Input: {}", stage.input_dir.display());
    info!("Output: {}", stage.output_dir.display());
    info!("{}", "─".repeat(60));
}

/// Log the final statistics
pub fn print_final_stats(stages_run: usize, published: usize, output_dir: &str) {
    info!("\n{}", "=".repeat(60));
    info!(
        "Finished at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("Stages run: {}", stages_run);
    info!("Files published: {} (in {})", published, output_dir);
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log display
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
