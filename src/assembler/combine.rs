//! Audio assembly implementation.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

/// The combined artifact is always 16-bit PCM mono WAV, whatever the
/// segments were encoded as.
const COMBINED_BITS: u16 = 16;

/// Combined artifact name for a run's base name.
pub fn combined_filename(base: &str) -> String {
    format!("{base}_complete.wav")
}

/// Errors that abort the combination stage. Per-segment decode failures are
/// not here: those are skipped with a warning and counted in
/// [`AssemblyStats::skipped`].
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("audio capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("none of the segment files could be decoded")]
    NoDecodableInput,

    #[error("failed to write combined audio: {0}")]
    Write(#[from] hound::Error),
}

/// What the combination stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyStats {
    pub included: usize,
    pub skipped: usize,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

/// Concatenates segment audio files with silence in between.
///
/// Inputs may mix codecs and sample rates; everything is decoded to mono
/// f32, resampled to the first decoded segment's rate, and exported as one
/// 16-bit PCM WAV.
pub struct AudioAssembler {
    pause_ms: u32,
}

impl AudioAssembler {
    pub fn new(pause_ms: u32) -> Self {
        Self { pause_ms }
    }

    /// Combine `inputs` in order into `output`.
    ///
    /// A segment that fails to decode is skipped with a warning; silence of
    /// the configured duration is inserted only between segments actually
    /// included, so skips never produce doubled pauses.
    pub fn combine(&self, inputs: &[PathBuf], output: &Path) -> Result<AssemblyStats, AssemblyError> {
        let mut target_rate: Option<u32> = None;
        let mut combined: Vec<f32> = Vec::new();
        let mut included = 0usize;
        let mut skipped = 0usize;

        for path in inputs {
            let (samples, rate, channels) = match decode_segment(path) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!("skipping {}: {err}", path.display());
                    skipped += 1;
                    continue;
                }
            };

            let mono = if channels > 1 {
                downmix_to_mono(&samples, channels)
            } else {
                samples
            };

            let rate_out = *target_rate.get_or_insert(rate);
            let mono = resample(&mono, rate, rate_out);

            if included > 0 {
                combined.extend(silence(self.pause_ms, rate_out));
            }
            debug!(
                "appending {} ({} samples at {rate} Hz)",
                path.display(),
                mono.len()
            );
            combined.extend(mono);
            included += 1;
        }

        let Some(sample_rate) = target_rate else {
            return Err(AssemblyError::NoDecodableInput);
        };

        write_mono_wav(output, &combined, sample_rate)?;

        Ok(AssemblyStats {
            included,
            skipped,
            sample_rate,
            duration_secs: combined.len() as f64 / sample_rate as f64,
        })
    }
}

#[derive(Error, Debug)]
enum DecodeError {
    #[error("{0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported wav bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no audio track found")]
    NoTrack,

    #[error("unknown sample rate")]
    UnknownRate,

    #[error("{0}")]
    Codec(String),
}

/// Decode a segment to interleaved f32 samples plus rate and channel count.
/// WAV goes through hound; everything else through the symphonia probe.
fn decode_segment(path: &Path) -> Result<(Vec<f32>, u32, usize), DecodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext == "wav" {
        decode_wav(path)
    } else {
        decode_compressed(path, &ext)
    }
}

fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32, usize), DecodeError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
                .collect::<Result<_, _>>()?,
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
                .collect::<Result<_, _>>()?,
            bits => return Err(DecodeError::UnsupportedBitDepth(bits)),
        },
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
    };

    Ok((samples, spec.sample_rate, spec.channels as usize))
}

fn decode_compressed(path: &Path, ext: &str) -> Result<(Vec<f32>, u32, usize), DecodeError> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = std::fs::File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    hint.with_extension(ext);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let mut format = probed.format;
    let track = format.default_track().ok_or(DecodeError::NoTrack)?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::UnknownRate)?;
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Codec(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::new(decoded.capacity() as u64, *decoded.spec())
                });
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(DecodeError::Codec(e.to_string())),
        }
    }

    Ok((samples, sample_rate, channels))
}

fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear-interpolation resample of mono samples.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f32 / to_rate as f32;
    let target_len = (samples.len() as f32 / ratio).ceil() as usize;
    let mut out = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f32 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos - src_idx as f32;

        let sample = if src_idx + 1 < samples.len() {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < samples.len() {
            samples[src_idx]
        } else {
            0.0
        };
        out.push(sample);
    }

    out
}

/// A silence pad of `pause_ms` at the given rate.
fn silence(pause_ms: u32, sample_rate: u32) -> Vec<f32> {
    let len = (sample_rate as u64 * pause_ms as u64 / 1000) as usize;
    vec![0.0; len]
}

fn write_mono_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: COMBINED_BITS,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()
}
