pub mod input_type;
pub mod language;
pub mod loaders;
pub mod request;
pub mod settings;

pub use input_type::{DocumentFormat, InputType};
pub use language::Language;
pub use loaders::load_run_settings;
pub use request::{EnrichmentOptions, RunRequest};
pub use settings::{InputFile, Parameters, RunSettings};
