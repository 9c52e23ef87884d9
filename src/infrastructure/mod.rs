pub mod stage_runner;

pub use stage_runner::{StageCommand, StageRunner};
