//! script-tts CLI entry point.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::warn;

use script_tts_rs::assembler::{AudioAssembler, combined_filename};
use script_tts_rs::backend::{SynthesisConfig, create_backend};
use script_tts_rs::capability;
use script_tts_rs::cli::{Cli, Command, ConvertArgs};
use script_tts_rs::pipeline::{SegmentPipeline, SegmentReport, SegmentStatus};
use script_tts_rs::script::{ScriptError, segment_script};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert(args) => convert(args),
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    init_logging(args.verbose);

    // Fatal pre-flight checks, before any output-directory state is touched.
    if !args.script.is_file() {
        bail!("script file not found: {}", args.script.display());
    }

    let capabilities = capability::probe();
    if !capabilities.supports(args.engine) {
        bail!(
            "the {} engine is not available on this system",
            args.engine.as_str()
        );
    }

    let raw = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script: {}", args.script.display()))?;

    let segments = match segment_script(&raw) {
        Ok(segments) => segments,
        Err(ScriptError::EmptyScript) => {
            // Clean no-op, not an operator error: zero attempts, zero files.
            println!(
                "No synthesizable lines in {}; nothing to do.",
                args.script.display()
            );
            return Ok(());
        }
    };

    let config = SynthesisConfig::from_args(&args);
    println!(
        "Converting {} segments with the {} engine...",
        segments.len(),
        args.engine.as_str()
    );

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let backend = create_backend(&config);
    let pipeline = SegmentPipeline::new(backend.as_ref(), &config);
    let report = pipeline.run(&segments);

    let combined = if args.no_combine {
        None
    } else {
        combine_segments(&report, &config, args.pause_ms)
    };

    print_summary(&report, combined.as_deref());
    Ok(())
}

/// Run the assembler when at least two segments succeeded. Assembly failure
/// degrades the run to "segments only"; the per-segment files are already on
/// disk and stay usable.
fn combine_segments(
    report: &SegmentReport,
    config: &SynthesisConfig,
    pause_ms: u32,
) -> Option<std::path::PathBuf> {
    let outputs = report.combination_inputs()?;

    let target = config.output_dir.join(combined_filename(&config.base_name));
    match AudioAssembler::new(pause_ms).combine(&outputs, &target) {
        Ok(stats) => {
            println!(
                "Combined {} segments into {} ({:.1}s)",
                stats.included,
                target.display(),
                stats.duration_secs
            );
            if stats.skipped > 0 {
                println!(
                    "  {} segment(s) could not be decoded and were left out",
                    stats.skipped
                );
            }
            Some(target)
        }
        Err(err) => {
            warn!("combination failed: {err}");
            println!("Could not combine segments ({err}); per-segment files are kept.");
            None
        }
    }
}

fn print_summary(report: &SegmentReport, combined: Option<&Path>) {
    println!();
    println!(
        "Segments: {} total, {} succeeded, {} failed",
        report.total(),
        report.succeeded,
        report.failed
    );

    for result in &report.results {
        if let SegmentStatus::Failed { reason } = &result.status {
            println!("  segment {:02}: {reason}", result.segment.index);
        }
    }

    if report.cancelled {
        println!("Run was cancelled before all segments were attempted.");
    }

    match combined {
        Some(path) => println!("Combined artifact: {}", path.display()),
        None => println!("No combined artifact produced."),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
