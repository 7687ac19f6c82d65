//! Pipeline implementation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use log::{info, warn};

use crate::backend::{SpeechBackend, SynthesisConfig};
use crate::script::ScriptSegment;

/// Outcome of one segment's synthesis attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentStatus {
    Success,
    Failed { reason: String },
}

/// One entry of the run report, in segment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResult {
    pub segment: ScriptSegment,
    pub output_path: Option<PathBuf>,
    pub status: SegmentStatus,
}

/// Ordered, immutable record of every segment's outcome for a run.
///
/// Append-only while the pipeline runs; finalized (counts and timestamps
/// fixed) once it completes or is cancelled.
#[derive(Debug, Clone)]
pub struct SegmentReport {
    pub results: Vec<SegmentResult>,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub started_at: String,
    pub finished_at: String,
}

impl SegmentReport {
    fn finalize(results: Vec<SegmentResult>, cancelled: bool, started_at: String) -> Self {
        let succeeded = results
            .iter()
            .filter(|r| r.status == SegmentStatus::Success)
            .count();
        let failed = results.len() - succeeded;

        Self {
            results,
            succeeded,
            failed,
            cancelled,
            started_at,
            finished_at: Utc::now().to_rfc3339(),
        }
    }

    /// Number of segments attempted.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Output paths of the successful segments, in segment order. Failed
    /// segments never appear here.
    pub fn successful_outputs(&self) -> Vec<PathBuf> {
        self.results
            .iter()
            .filter(|r| r.status == SegmentStatus::Success)
            .filter_map(|r| r.output_path.clone())
            .collect()
    }

    /// Inputs for the combination stage, or `None` when fewer than two
    /// segments succeeded — a single clip makes no meaningful combination,
    /// so callers treat that as a no-op rather than an error.
    pub fn combination_inputs(&self) -> Option<Vec<PathBuf>> {
        let outputs = self.successful_outputs();
        if outputs.len() < 2 { None } else { Some(outputs) }
    }
}

/// Deterministic per-segment file name: base name plus the zero-padded
/// segment index. Unique within a run since indices are.
pub fn segment_filename(base: &str, index: u32, extension: &str) -> String {
    format!("{base}_segment_{index:02}.{extension}")
}

/// Runs segments through a backend in index order, isolating per-segment
/// failures into the report.
pub struct SegmentPipeline<'a> {
    backend: &'a dyn SpeechBackend,
    config: &'a SynthesisConfig,
}

impl<'a> SegmentPipeline<'a> {
    pub fn new(backend: &'a dyn SpeechBackend, config: &'a SynthesisConfig) -> Self {
        Self { backend, config }
    }

    /// Synthesize every segment and return the finalized report.
    pub fn run(&self, segments: &[ScriptSegment]) -> SegmentReport {
        self.run_cancellable(segments, &AtomicBool::new(false))
    }

    /// Like [`run`](Self::run), but stops before the next not-yet-begun
    /// segment once `cancel` is set. Files already written stay intact and
    /// the partial report is still finalized.
    pub fn run_cancellable(
        &self,
        segments: &[ScriptSegment],
        cancel: &AtomicBool,
    ) -> SegmentReport {
        let started_at = Utc::now().to_rfc3339();
        let mut results = Vec::with_capacity(segments.len());
        let mut cancelled = false;

        for segment in segments {
            if cancel.load(Ordering::SeqCst) {
                warn!("cancelled before segment {}", segment.index);
                cancelled = true;
                break;
            }

            let path = self.segment_path(segment.index);
            info!(
                "synthesizing segment {}/{}: {}",
                segment.index,
                segments.len(),
                preview(&segment.text)
            );

            match self.backend.synthesize(&segment.text, &path) {
                Ok(()) => results.push(SegmentResult {
                    segment: segment.clone(),
                    output_path: Some(path),
                    status: SegmentStatus::Success,
                }),
                Err(err) => {
                    warn!("segment {} failed: {err}", segment.index);
                    results.push(SegmentResult {
                        segment: segment.clone(),
                        output_path: None,
                        status: SegmentStatus::Failed {
                            reason: err.to_string(),
                        },
                    });
                }
            }
        }

        SegmentReport::finalize(results, cancelled, started_at)
    }

    fn segment_path(&self, index: u32) -> PathBuf {
        self.config.output_dir.join(segment_filename(
            &self.config.base_name,
            index,
            self.backend.file_extension(),
        ))
    }
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 50;
    let short: String = text.chars().take(MAX_CHARS).collect();
    if short.len() < text.len() {
        format!("{short}...")
    } else {
        short
    }
}
