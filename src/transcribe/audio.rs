//! Audio decoding for inference.
//!
//! Whisper expects 16 kHz mono f32 samples; the downloaded artifact is an
//! mp3. ffmpeg resamples into a temporary WAV file, which is then read with
//! hound and converted.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::transcribe::whisper::WhisperModel;
use crate::StageError;

/// Sample rate Whisper models are trained on.
pub const SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file to 16 kHz mono f32 samples.
pub async fn decode_samples(path: &Path) -> Result<Vec<f32>, StageError> {
    let wav = tempfile::Builder::new()
        .prefix("tubescribe-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| StageError::Transcription(format!("failed to create temp wav: {}", e)))?;

    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(path)
        .arg("-ar")
        .arg(SAMPLE_RATE.to_string())
        .arg("-ac")
        .arg("1")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg(wav.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| StageError::Transcription(format!("failed to invoke ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StageError::Transcription(format!(
            "could not decode audio: {}",
            stderr.trim()
        )));
    }

    let raw = read_wav_samples(wav.path())?;
    Ok(WhisperModel::convert_samples(&raw))
}

/// Read all i16 samples from a WAV file, averaging to mono if needed.
fn read_wav_samples(path: &Path) -> Result<Vec<i16>, StageError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| StageError::Transcription(format!("failed to parse WAV file: {}", e)))?;

    let channels = reader.spec().channels;

    let raw: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StageError::Transcription(format!("failed to read WAV samples: {}", e)))?;

    // ffmpeg is asked for mono, but tolerate stereo anyway.
    let samples = if channels == 2 {
        raw.chunks_exact(2)
            .map(|chunk| {
                let left = chunk[0] as i32;
                let right = chunk[1] as i32;
                ((left + right) / 2) as i16
            })
            .collect()
    } else {
        raw
    };

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn test_read_wav_mono() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, &[1, 2, 3]);
        assert_eq!(read_wav_samples(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_read_wav_stereo_averages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, &[10, 20, -10, -20]);
        assert_eq!(read_wav_samples(&path).unwrap(), vec![15, -15]);
    }

    #[test]
    fn test_read_wav_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"not a wav").expect("write");
        let err = read_wav_samples(&path).unwrap_err();
        assert!(matches!(err, StageError::Transcription(_)));
    }
}
