pub mod planner;
pub mod stage;

pub use planner::plan_stages;
pub use stage::{PublishRule, StageKind, StageResult, StageSpec, TextClass};
