//! Orchestration layer
//!
//! Run lifecycle and stage scheduling. The only layer that owns the status
//! file, the diagnostic channel and the publisher.
//!
//! ## Modules
//!
//! ### `job` - one wrapper run
//! - pre-flight (settings, request, language assets, input type)
//! - plans the stages and runs them in order
//! - status reporting, abort path, cleanup
//!
//! ### `stage_processor` - one stage
//! - launches the stage through the runner
//! - prints the trace, echoes or replays the logs
//! - publishes the declared outputs
//!
//! ## Layering
//!
//! ```text
//! job (Vec<StageSpec>)
//!     ↓
//! stage_processor (one StageSpec)
//!     ↓
//! services (publisher / status / diagnostics)
//!     ↓
//! infrastructure (StageRunner)
//! ```

pub mod job;
pub mod stage_processor;

pub use job::Orchestrator;
pub use stage_processor::{process_stage, StageStats};
