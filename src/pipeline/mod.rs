//! Segment pipeline orchestration.
//!
//! Feeds segmenter output through the chosen backend one segment at a time,
//! in index order, and collects every outcome into a [`SegmentReport`]. A
//! single segment's failure never aborts the run.

mod runner;

pub use runner::{
    SegmentPipeline, SegmentReport, SegmentResult, SegmentStatus, segment_filename,
};
