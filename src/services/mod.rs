pub mod diagnostics;
pub mod filename_normalizer;
pub mod input_detection;
pub mod language_assets;
pub mod metadata;
pub mod publisher;
pub mod status_writer;

pub use diagnostics::{CapturedOutput, Diagnostics};
pub use filename_normalizer::normalize_filename;
pub use input_detection::detect_input_type;
pub use language_assets::{resolve_language_assets, LanguageAssets, SupportFile};
pub use metadata::{merge_metadata, MergeOutcome};
pub use publisher::Publisher;
pub use status_writer::StatusWriter;
