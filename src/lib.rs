//! # PICCL service
//!
//! Wrapper around the PICCL OCR / post-correction / linguistic enrichment
//! pipelines, as invoked by the hosting web service.
//!
//! ## Architecture
//!
//! Four layers, each only depending on the ones below it:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - owns the external processes
//! - `StageRunner` - the only code that spawns a pipeline
//!
//! ### ② Services
//! - `services/` - single capabilities
//! - pre-flight resolution (language assets, input type detection)
//! - `Publisher` with filename normalization
//! - `StatusWriter`, `Diagnostics`, metadata merge
//!
//! ### ③ Workflow
//! - `workflow/` - pure stage planning, `RunRequest` → `Vec<StageSpec>`
//!
//! ### ④ Orchestration
//! - `orchestrator/job` - run lifecycle, abort path, cleanup
//! - `orchestrator/stage_processor` - one stage from launch to publication

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::{Config, Invocation};
pub use error::{PicclError, Result};
pub use infrastructure::StageRunner;
pub use models::{InputType, Language, RunRequest, RunSettings};
pub use orchestrator::Orchestrator;
pub use workflow::{plan_stages, StageKind, StageSpec};
