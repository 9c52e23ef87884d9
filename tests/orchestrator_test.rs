//! End-to-end runs against fake pipeline scripts
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use piccl_service::services::Diagnostics;
use piccl_service::{Config, Invocation, Orchestrator};
use tempfile::TempDir;

// Writing an executable while another test forks can make exec fail with
// ETXTBSY, so runs in this file never overlap.
static LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Shared prologue: log the call, parse directories, write a trace
const PROLOGUE: &str = r#"#!/bin/sh
echo "$(basename "$0") $*" >> calls.log
in=""; out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --inputdir) in="$2"; shift ;;
    --outputdir) out="$2"; shift ;;
  esac
  shift
done
mkdir -p "$out"
printf 'task_id\tstatus\n1\tCOMPLETED\n' > trace.txt
"#;

const OCR: &str = r#"
for f in "$in"/*.tif; do
  b=$(basename "$f" .tif)
  echo "<FoLiA/>" > "$out/$b.ocr.folia.xml"
done
echo "ocr stdout"
"#;

const TICCL: &str = r#"
for f in "$in"/*.folia.xml; do
  b=$(basename "$f" .folia.xml)
  cp "$f" "$out/$b.ticcl.folia.xml"
done
echo "variants" > "$out/corpus.wordfreqlist.tsv.clean.ldcalc.ranked"
echo "ticcl stdout"
"#;

const TICCL_FAILING: &str = r#"
echo "ticcl is starting"
echo "ticcl broke down" >&2
exit 3
"#;

const TOKENIZE: &str = r#"
for f in "$in"/*.folia.xml; do
  b=$(basename "$f" .folia.xml)
  cp "$f" "$out/$b.tok.folia.xml"
done
echo "ucto stdout"
"#;

struct Job {
    root: TempDir,
}

impl Job {
    fn new() -> Self {
        let job = Self {
            root: tempfile::tempdir().unwrap(),
        };
        for dir in ["input", "output", "work", "scripts"] {
            fs::create_dir_all(job.path(dir)).unwrap();
        }
        let data = job.path("data/data/int/nld");
        fs::create_dir_all(&data).unwrap();
        for f in ["nld.aspell.dict", "nld.aspell.dict.lc.chars", "nld.aspell.dict.c0.d2.confusion"] {
            fs::write(data.join(f), f).unwrap();
        }
        job
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    fn script(&self, name: &str, body: &str) {
        let path = self.path("scripts").join(name);
        fs::write(&path, format!("{}{}", PROLOGUE, body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn input(&self, name: &str) {
        fs::write(self.path("input").join(name), "image").unwrap();
    }

    fn settings(&self, toml: &str) {
        fs::write(self.path("settings.toml"), toml).unwrap();
    }

    async fn run(&self) -> (i32, String) {
        let config = Config {
            work_dir: self.path("work"),
            ..Config::default()
        }
        .with_scripts_dir(Some(self.path("scripts")));
        let invocation = Invocation {
            settings_file: self.path("settings.toml"),
            status_file: self.path("status"),
            input_dir: self.path("input"),
            output_dir: self.path("output"),
            data_root: self.path("data"),
            scripts_dir: Some(self.path("scripts")),
        };
        let (diagnostics, output) = Diagnostics::capture();
        let code = Orchestrator::new(config, invocation)
            .with_diagnostics(diagnostics)
            .run()
            .await;
        (code, output.contents())
    }

    fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path("output"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path("work/calls.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn status_lines(&self) -> Vec<(String, String)> {
        fs::read_to_string(self.path("status"))
            .unwrap()
            .lines()
            .map(|l| {
                let mut fields = l.split('\t');
                (
                    fields.next().unwrap().to_string(),
                    fields.next().unwrap().to_string(),
                )
            })
            .collect()
    }
}

const DUTCH_TIFF: &str = r#"
[parameters]
lang = "nld"
ticcl = true
rank = 3
distance = 2
tok = true

[[input]]
filename = "page1.tif"
inputtemplate = "tif"

[[input]]
filename = "page2.tif"
inputtemplate = "tif"
"#;

#[tokio::test]
async fn test_dutch_tiff_runs_ocr_ticcl_and_tokenizer() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    job.script("ocr.nf", OCR);
    job.script("ticcl.nf", TICCL);
    job.script("tokenize.nf", TOKENIZE);
    job.input("page1.tif");
    job.input("page2.tif");
    job.settings(DUTCH_TIFF);

    let (code, diagnostics) = job.run().await;
    assert_eq!(code, 0, "diagnostics:\n{}", diagnostics);

    assert_eq!(
        job.output_names(),
        vec![
            "corpus.wordfreqlist.tsv.clean.ldcalc.ranked",
            "page1.tok.folia.xml",
            "page2.tok.folia.xml",
        ]
    );
    let target = fs::read_link(job.path("output/page1.tok.folia.xml")).unwrap();
    assert!(target.is_absolute());
    assert!(target.exists());

    let calls = job.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("ocr.nf --inputdir "));
    assert!(calls[0].contains("--inputtype tif --language nld -with-trace"));
    assert!(calls[1].starts_with("ticcl.nf --inputdir ocr_output --inputtype folia"));
    assert!(calls[1].contains("--clip 3 --distance 2"));
    assert!(calls[1].contains("--inputclass OCR"));
    assert!(calls[2].starts_with("tokenize.nf --language nld --inputformat folia --inputdir ticcl_out"));

    assert!(diagnostics.contains("OCR pipeline trace summary"));
    assert!(diagnostics.contains("TICCL pipeline trace summary"));
    assert!(diagnostics.contains("ucto stdout"));

    let status = job.status_lines();
    let percents: Vec<&str> = status.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(percents, vec!["0%", "1%", "50%", "75%", "100%"]);
    assert_eq!(status[0].1, "Starting...");
    assert_eq!(status[4].1, "All done!");

    let work = job.path("work");
    assert!(!work.join("lexicon.lst").exists());
    assert!(!work.join("trace.txt").exists());
    assert!(!work.join("ticcl.nextflow.out.log").exists());
    assert!(!work.join("ocr_output").exists());
    assert!(work.join("tok_outputdir").exists());
}

#[tokio::test]
async fn test_failing_stage_aborts_and_replays_logs() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    job.script("ocr.nf", OCR);
    job.script("ticcl.nf", TICCL_FAILING);
    job.script("tokenize.nf", TOKENIZE);
    job.input("page1.tif");
    job.settings(DUTCH_TIFF);

    let (code, diagnostics) = job.run().await;
    assert_eq!(code, 1);
    assert!(diagnostics.contains("ticcl is starting"));
    assert!(diagnostics.contains("ticcl broke down"));
    assert!(diagnostics.contains("ERROR: TICCL pipeline failed"));

    let calls = job.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| !c.starts_with("tokenize.nf")));
    assert!(job.output_names().is_empty());

    let status = job.status_lines();
    let (percent, message) = status.last().unwrap();
    assert_eq!(percent, "0%");
    assert!(message.starts_with("ERROR: "));

    assert!(!job.path("work/ocr_output").exists());
    assert!(!job.path("work/ticcl_out").exists());
}

#[tokio::test]
async fn test_debug_keeps_working_directory() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    job.script("ocr.nf", OCR);
    job.script("ticcl.nf", TICCL_FAILING);
    job.input("page1.tif");
    job.settings(&DUTCH_TIFF.replace("tok = true", "tok = true\ndebug = true"));

    let (code, _) = job.run().await;
    assert_eq!(code, 1);
    assert!(job.path("work/ocr_output/page1.ocr.folia.xml").exists());
    assert!(fs::symlink_metadata(job.path("work/lexicon.lst")).is_ok());
}

#[tokio::test]
async fn test_missing_language_data_fails_before_any_stage() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    job.script("ocr.nf", OCR);
    job.input("page1.tif");
    job.settings(&DUTCH_TIFF.replace("\"nld\"", "\"lat\""));

    let (code, diagnostics) = job.run().await;
    assert_eq!(code, 4);
    assert!(diagnostics.contains("Unable to find data files for language 'lat'"));
    assert!(job.calls().is_empty());
    assert!(job.status_lines().last().unwrap().1.starts_with("ERROR: "));
}

#[tokio::test]
async fn test_unrecognized_templates_fail_detection() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    job.script("ocr.nf", OCR);
    job.settings(
        r#"
[parameters]
lang = "nld"

[[input]]
filename = "notes.doc"
inputtemplate = "msword"
"#,
    );

    let (code, diagnostics) = job.run().await;
    assert_eq!(code, 5);
    assert!(diagnostics.contains("Unable to deduce input type"));
    assert!(job.calls().is_empty());
}

#[tokio::test]
async fn test_missing_settings_is_unexpected_error() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    let (code, _) = job.run().await;
    assert_eq!(code, 2);
}

#[tokio::test]
async fn test_nothing_selected_still_succeeds() {
    let _guard = LOCK.lock().await;
    let job = Job::new();
    job.settings(
        r#"
[parameters]
lang = "nld"
ticcl = false

[[input]]
filename = "doc.folia.xml"
inputtemplate = "foliaocr"
"#,
    );

    let (code, _) = job.run().await;
    assert_eq!(code, 0);
    assert!(job.calls().is_empty());
    assert!(job.output_names().is_empty());
    assert_eq!(job.status_lines().last().unwrap().0, "100%");
}
