//! Directory-driven batch mode: every CV in one folder against every JD in another.
//!
//! Each CV is extracted once and its profile reused for all JDs. Pair-level failures are
//! logged and skipped so one bad file never aborts the batch.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::matching::formatter::{render_summary, ScoringResult};
use crate::matching::pipeline::{MatchLabels, MatchingPipeline};
use crate::matching::profile::CandidateProfile;

const EXTRACTED_DIR: &str = "extracted_info";
const RESULTS_DIR: &str = "matching_results";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub cv_dir: PathBuf,
    pub jd_dir: PathBuf,
    pub out_dir: PathBuf,
}

/// One scored pair, as written to `matching_results/<cv>_<jd>.json`.
#[derive(Debug, Serialize)]
pub struct BatchRecord {
    pub cv_name: String,
    pub jd_name: String,
    pub cv_file: String,
    pub jd_file: String,
    pub scored_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ScoringResult,
}

/// Row of the final batch table.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSummary {
    pub cv_name: String,
    pub jd_name: String,
    pub final_score: f64,
    pub result_file: PathBuf,
}

struct ExtractedCv {
    name: String,
    file: String,
    profile: CandidateProfile,
}

struct LoadedJd {
    name: String,
    file: String,
    text: String,
}

pub async fn run_batch(
    pipeline: &MatchingPipeline,
    options: &BatchOptions,
) -> Result<Vec<PairSummary>> {
    let cv_files = list_files(&options.cv_dir, "pdf").await?;
    if cv_files.is_empty() {
        bail!("no PDF files found in {}", options.cv_dir.display());
    }
    let jd_files = list_files(&options.jd_dir, "txt").await?;
    if jd_files.is_empty() {
        bail!("no TXT files found in {}", options.jd_dir.display());
    }
    info!(cvs = cv_files.len(), jds = jd_files.len(), "starting batch");

    let extracted_dir = options.out_dir.join(EXTRACTED_DIR);
    let results_dir = options.out_dir.join(RESULTS_DIR);
    ensure_directory_exists(&extracted_dir).await?;
    ensure_directory_exists(&results_dir).await?;

    let mut cvs = Vec::with_capacity(cv_files.len());
    for path in &cv_files {
        let (name, file) = names_of(path);
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(cv = %file, "failed to read CV: {e}");
                continue;
            }
        };
        match pipeline.extract_profile(&bytes).await {
            Ok(profile) => {
                let target = extracted_dir.join(format!("extracted_{name}.json"));
                if let Err(e) = save_json(&target, &profile).await {
                    warn!(cv = %file, "failed to save extracted profile: {e:#}");
                }
                info!(cv = %file, "profile extracted");
                cvs.push(ExtractedCv { name, file, profile });
            }
            // Cause already logged by the pipeline.
            Err(_) => info!(cv = %file, "skipping CV"),
        }
    }

    let mut jds = Vec::with_capacity(jd_files.len());
    for path in &jd_files {
        let (name, file) = names_of(path);
        match load_jd(path).await {
            Ok(text) => {
                let target = extracted_dir.join(format!("extracted_{name}.txt"));
                if let Err(e) = tokio::fs::write(&target, &text).await {
                    warn!(jd = %file, "failed to write {}: {e}", target.display());
                }
                jds.push(LoadedJd { name, file, text });
            }
            Err(e) => warn!(jd = %file, "skipping JD: {e:#}"),
        }
    }

    let mut summaries = Vec::new();
    for cv in &cvs {
        for jd in &jds {
            let labels = MatchLabels {
                cv: cv.file.clone(),
                jd: jd.file.clone(),
            };
            let result = match pipeline.score_profile(&cv.profile, &jd.text, &labels).await {
                Ok(result) => result,
                Err(_) => {
                    info!(cv = %cv.file, jd = %jd.file, "skipping pair");
                    continue;
                }
            };

            println!("{}", render_summary(&result, pipeline.weights()));

            let result_file = results_dir.join(format!("{}_{}.json", cv.name, jd.name));
            let final_score = result.display_score();
            let record = BatchRecord {
                cv_name: cv.name.clone(),
                jd_name: jd.name.clone(),
                cv_file: cv.file.clone(),
                jd_file: jd.file.clone(),
                scored_at: Utc::now(),
                result,
            };
            if let Err(e) = save_json(&result_file, &record).await {
                warn!(cv = %cv.file, jd = %jd.file, "failed to save result: {e:#}");
                continue;
            }

            summaries.push(PairSummary {
                cv_name: cv.name.clone(),
                jd_name: jd.name.clone(),
                final_score,
                result_file,
            });
        }
    }

    info!(pairs = summaries.len(), "batch complete");
    Ok(summaries)
}

/// Files in `dir` with extension `ext` (case-insensitive), sorted by name.
pub async fn list_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub async fn ensure_directory_exists(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create directory {}", dir.display()))
}

pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn render_batch_table(summaries: &[PairSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<30} {:<30} {:>7}  RESULT FILE", "CV", "JD", "SCORE");
    for row in summaries {
        let _ = writeln!(
            out,
            "{:<30} {:<30} {:>7.1}  {}",
            row.cv_name,
            row.jd_name,
            row.final_score,
            row.result_file.display()
        );
    }
    out
}

async fn load_jd(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8(bytes).context("JD is not valid UTF-8")?;
    let text = text.trim();
    if text.is_empty() {
        bail!("JD file is empty");
    }
    Ok(text.to_string())
}

/// (stem, file name) of a path.
fn names_of(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (stem, file)
}
