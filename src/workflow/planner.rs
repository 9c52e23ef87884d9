//! Stage planning - workflow layer
//!
//! Turns a resolved [`RunRequest`] into the ordered list of stages to run.
//! Pure: no filesystem access, no processes.
//!
//! Stage order:
//! 1. OCR (image input only)
//! 2. TICCL normalization
//! 3. Frog enrichment, or else ucto tokenization

use std::path::{Path, PathBuf};

use crate::models::input_type::{DocumentFormat, InputType};
use crate::models::request::RunRequest;
use crate::workflow::stage::{PublishRule, StageKind, StageSpec, TextClass};

/// Support file links created in the working directory by the pre-flight resolver
pub const LEXICON_LINK: &str = "lexicon.lst";
pub const ALPHABET_LINK: &str = "alphabet.lst";
pub const CONFUSION_LINK: &str = "confusion.lst";

/// Directory and format the next stage reads from
struct Chain {
    dir: PathBuf,
    format: DocumentFormat,
}

/// Plan the stages for a run
///
/// Every stage reads the previous enabled stage's output directory; the
/// first one reads `input_dir`.
pub fn plan_stages(request: &RunRequest, input_type: InputType, input_dir: &Path) -> Vec<StageSpec> {
    let mut stages = Vec::new();
    let mut chain = Chain {
        dir: input_dir.to_path_buf(),
        format: input_type.document_format(),
    };

    let ocr = input_type.requires_ocr();
    let text_class = text_class(request, ocr);

    if ocr {
        let output_dir = PathBuf::from(StageKind::Ocr.output_dir());
        let args = vec![
            "--inputdir".to_string(),
            path_arg(&chain.dir),
            "--outputdir".to_string(),
            path_arg(&output_dir),
            "--inputtype".to_string(),
            input_type.template().to_string(),
            "--language".to_string(),
            // OCR needs the unnormalized code to pick the Fraktur model
            request.language.code().to_string(),
        ];
        stages.push(StageSpec {
            kind: StageKind::Ocr,
            input_dir: chain.dir,
            output_dir: output_dir.clone(),
            args,
            publish: Vec::new(),
        });
        chain = Chain {
            dir: output_dir,
            format: DocumentFormat::Folia,
        };
    }

    if request.enable_normalization {
        let output_dir = PathBuf::from(StageKind::Normalization.output_dir());
        let pdfhandling = if request.reassemble_pages {
            "reassemble"
        } else {
            "single"
        };
        let args = vec![
            "--inputdir".to_string(),
            path_arg(&chain.dir),
            "--inputtype".to_string(),
            chain.format.flag().to_string(),
            "--outputdir".to_string(),
            path_arg(&output_dir),
            "--lexicon".to_string(),
            LEXICON_LINK.to_string(),
            "--alphabet".to_string(),
            ALPHABET_LINK.to_string(),
            "--charconfus".to_string(),
            CONFUSION_LINK.to_string(),
            "--clip".to_string(),
            request.rank_count.to_string(),
            "--distance".to_string(),
            request.edit_distance.to_string(),
            "--pdfhandling".to_string(),
            pdfhandling.to_string(),
            "--inputclass".to_string(),
            text_class.to_string(),
        ];
        stages.push(StageSpec {
            kind: StageKind::Normalization,
            input_dir: chain.dir,
            output_dir: output_dir.clone(),
            args,
            publish: vec![PublishRule::RankedVariants],
        });
        chain = Chain {
            dir: output_dir,
            format: DocumentFormat::Folia,
        };
    }

    if let Some(options) = request.frog {
        let output_dir = PathBuf::from(StageKind::Enrichment.output_dir());
        let mut args = vec![
            "--inputdir".to_string(),
            path_arg(&chain.dir),
            "--inputformat".to_string(),
            chain.format.flag().to_string(),
            "--extension".to_string(),
            chain.format.extension().to_string(),
            "--outputdir".to_string(),
            path_arg(&output_dir),
            "--inputclass".to_string(),
            text_class.to_string(),
            "--outputclass".to_string(),
            text_class.to_string(),
        ];
        if let Some(skip) = options.skip_instruction() {
            args.push("--skip".to_string());
            args.push(skip);
        }
        stages.push(StageSpec {
            kind: StageKind::Enrichment,
            input_dir: chain.dir,
            output_dir,
            args,
            publish: Vec::new(),
        });
    } else if request.enable_tokenization {
        let output_dir = PathBuf::from(StageKind::Tokenization.output_dir());
        let args = vec![
            "--language".to_string(),
            request.language.base().code().to_string(),
            "--inputformat".to_string(),
            chain.format.flag().to_string(),
            "--inputdir".to_string(),
            path_arg(&chain.dir),
            "--extension".to_string(),
            chain.format.extension().to_string(),
            "--outputdir".to_string(),
            path_arg(&output_dir),
            "--inputclass".to_string(),
            text_class.to_string(),
            "--outputclass".to_string(),
            text_class.to_string(),
        ];
        stages.push(StageSpec {
            kind: StageKind::Tokenization,
            input_dir: chain.dir,
            output_dir,
            args,
            publish: Vec::new(),
        });
    }

    // Only the last stage's documents are final
    if let Some(last) = stages.last_mut() {
        last.publish.push(PublishRule::FoliaDocuments);
    }

    stages
}

/// Text class every stage reads and writes
pub fn text_class(request: &RunRequest, ocr: bool) -> TextClass {
    if ocr {
        return TextClass::Ocr;
    }
    match &request.input_class {
        Some(class) => TextClass::Named(class.clone()),
        None => TextClass::Current,
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
