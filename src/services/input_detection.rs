//! Input type detection
//!
//! The input type follows from the template each file was uploaded under.

use tracing::debug;

use crate::error::{PicclError, Result};
use crate::models::{InputFile, InputType};

/// Determine the single input type of a run
///
/// Tags outside the allow-list (an uploaded lexicon, for instance) are
/// ignored rather than rejected. Two different recognized tags, or none at
/// all, make the run fail.
pub fn detect_input_type(inputs: &[InputFile]) -> Result<InputType> {
    let mut detected: Option<InputType> = None;

    for input in inputs {
        let Some(input_type) = InputType::from_template(&input.inputtemplate) else {
            debug!(
                "Ignoring {} for type detection (template '{}')",
                input.filename, input.inputtemplate
            );
            continue;
        };
        match detected {
            None => detected = Some(input_type),
            Some(existing) if existing == input_type => {}
            Some(existing) => {
                debug!(
                    "Mixed input types: {} ({}) after {}",
                    input.filename, input_type, existing
                );
                return Err(PicclError::UnresolvableInputType);
            }
        }
    }

    detected.ok_or(PicclError::UnresolvableInputType)
}
