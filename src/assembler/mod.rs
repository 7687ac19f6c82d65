//! Audio assembly: concatenating successful segment audio, with a silence
//! pad between consecutive clips, into one combined artifact.

mod combine;

pub use combine::{AssemblyError, AssemblyStats, AudioAssembler, combined_filename};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Write a mono 16-bit WAV of `len` samples at `rate`, filled with a
    /// quiet constant value so downmix/resample effects stay visible.
    fn write_test_wav(path: &Path, len: usize, rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..len {
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn write_stereo_wav(path: &Path, frames: usize, rate: u32) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(800i16).unwrap();
            writer.write_sample(1200i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn output_len(path: &Path) -> (usize, u32) {
        let reader = hound::WavReader::open(path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        (reader.len() as usize, spec.sample_rate)
    }

    #[test]
    fn test_combined_duration_is_sum_plus_pauses() {
        let dir = TempDir::new().unwrap();
        let seg1 = dir.path().join("seg1.wav");
        let seg2 = dir.path().join("seg2.wav");
        write_test_wav(&seg1, 22050, 22050); // 1.0 s
        write_test_wav(&seg2, 11025, 22050); // 0.5 s

        let out = dir.path().join("complete.wav");
        let stats = AudioAssembler::new(1000)
            .combine(&[seg1, seg2], &out)
            .unwrap();

        // 1.0 s + 1.0 s pause + 0.5 s, sample-exact.
        let (len, rate) = output_len(&out);
        assert_eq!(rate, 22050);
        assert_eq!(len, 22050 + 22050 + 11025);
        assert_eq!(stats.included, 2);
        assert_eq!(stats.skipped, 0);
        assert!((stats.duration_secs - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_pause_only_between_segments() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| {
                let p = dir.path().join(format!("seg{i}.wav"));
                write_test_wav(&p, 8000, 8000);
                p
            })
            .collect();

        let out = dir.path().join("complete.wav");
        AudioAssembler::new(250).combine(&paths, &out).unwrap();

        // Three 1 s segments, two 0.25 s pauses.
        let (len, _) = output_len(&out);
        assert_eq!(len, 3 * 8000 + 2 * 2000);
    }

    #[test]
    fn test_undecodable_segment_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let seg1 = dir.path().join("seg1.wav");
        let bad = dir.path().join("seg2.wav");
        let seg3 = dir.path().join("seg3.wav");
        write_test_wav(&seg1, 8000, 8000);
        std::fs::write(&bad, b"not really audio").unwrap();
        write_test_wav(&seg3, 8000, 8000);

        let out = dir.path().join("complete.wav");
        let stats = AudioAssembler::new(1000)
            .combine(&[seg1, bad, seg3], &out)
            .unwrap();

        assert_eq!(stats.included, 2);
        assert_eq!(stats.skipped, 1);

        // Exactly one pause between the two survivors.
        let (len, _) = output_len(&out);
        assert_eq!(len, 8000 + 8000 + 8000);
    }

    #[test]
    fn test_mixed_sample_rates_are_normalized_to_first() {
        let dir = TempDir::new().unwrap();
        let seg1 = dir.path().join("seg1.wav");
        let seg2 = dir.path().join("seg2.wav");
        write_test_wav(&seg1, 22050, 22050); // 1 s at 22.05 kHz
        write_test_wav(&seg2, 44100, 44100); // 1 s at 44.1 kHz

        let out = dir.path().join("complete.wav");
        let stats = AudioAssembler::new(1000)
            .combine(&[seg1, seg2], &out)
            .unwrap();

        assert_eq!(stats.sample_rate, 22050);
        let (len, rate) = output_len(&out);
        assert_eq!(rate, 22050);
        // 1 s + 1 s pause + 1 s resampled to the first segment's rate.
        assert_eq!(len, 22050 * 3);
    }

    #[test]
    fn test_stereo_input_is_downmixed() {
        let dir = TempDir::new().unwrap();
        let seg1 = dir.path().join("seg1.wav");
        let seg2 = dir.path().join("seg2.wav");
        write_stereo_wav(&seg1, 4000, 8000); // 0.5 s stereo
        write_test_wav(&seg2, 4000, 8000);

        let out = dir.path().join("complete.wav");
        AudioAssembler::new(0).combine(&[seg1, seg2], &out).unwrap();

        let (len, _) = output_len(&out);
        assert_eq!(len, 4000 + 4000);
    }

    #[test]
    fn test_single_survivor_is_still_exported() {
        // Caller-level policy keeps the assembler from running with fewer
        // than two successes, but decode skips can reduce the set mid-run.
        let dir = TempDir::new().unwrap();
        let seg1 = dir.path().join("seg1.wav");
        let bad = dir.path().join("seg2.wav");
        write_test_wav(&seg1, 8000, 8000);
        std::fs::write(&bad, b"junk").unwrap();

        let out = dir.path().join("complete.wav");
        let stats = AudioAssembler::new(1000)
            .combine(&[seg1, bad], &out)
            .unwrap();

        assert_eq!(stats.included, 1);
        assert_eq!(stats.skipped, 1);
        let (len, _) = output_len(&out);
        assert_eq!(len, 8000);
    }

    #[test]
    fn test_all_inputs_undecodable() {
        let dir = TempDir::new().unwrap();
        let bad1 = dir.path().join("a.wav");
        let bad2 = dir.path().join("b.wav");
        std::fs::write(&bad1, b"junk").unwrap();
        std::fs::write(&bad2, b"more junk").unwrap();

        let out = dir.path().join("complete.wav");
        let result = AudioAssembler::new(1000).combine(&[bad1, bad2], &out);

        assert!(matches!(
            result.unwrap_err(),
            AssemblyError::NoDecodableInput
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_empty_input_list() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("complete.wav");
        let result = AudioAssembler::new(1000).combine(&[], &out);

        assert!(matches!(
            result.unwrap_err(),
            AssemblyError::NoDecodableInput
        ));
    }

    #[test]
    fn test_combined_filename() {
        assert_eq!(combined_filename("greeting"), "greeting_complete.wav");
    }
}
