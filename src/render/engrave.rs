use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use crate::error::Result;

pub const BITS_PER_SAMPLE: u16 = 16;

/// Mono 16-bit integer PCM at `sample_rate`.
pub fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Clip to [-1, 1] and round onto the signed 16-bit range.
pub fn to_pcm_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16)
        .collect()
}

pub fn write_samples<W: Write + Seek>(writer: W, sample_rate: u32, samples: &[f64]) -> Result<()> {
    let mut wav_writer = hound::WavWriter::new(writer, wav_spec(sample_rate))?;
    for sample in to_pcm_i16(samples) {
        wav_writer.write_sample(sample)?;
    }
    wav_writer.finalize()?;
    Ok(())
}

/// Write `samples` as a mono 16-bit WAV file.
pub fn samples(sample_rate: u32, samples: &[f64], filename: &Path) -> Result<()> {
    let file = File::create(filename)?;
    write_samples(BufWriter::new(file), sample_rate, samples)
}

/// The bytes of a complete WAV file.
pub fn encode_wav(sample_rate: u32, samples: &[f64]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_samples(&mut cursor, sample_rate, samples)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_conversion() {
        let pcm = to_pcm_i16(&[0.0, 1.0, -1.0, 0.5, 2.0, -3.0, 1e-6]);
        assert_eq!(pcm, vec![0, 32767, -32767, 16384, 32767, -32767, 0]);
    }

    #[test]
    fn test_encode_header() {
        let signal: Vec<f64> = (0..100).map(|i| (i as f64 / 100.0) - 0.5).collect();
        let bytes = encode_wav(44100, &signal).unwrap();

        let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(reader.len(), 100);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn test_encode_round_trip_samples() {
        let signal = vec![0.25, -0.25, 0.5];
        let bytes = encode_wav(22050, &signal).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, to_pcm_i16(&signal));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let signal: Vec<f64> = (0..512).map(|i| (i as f64 * 0.01).sin() * 0.5).collect();
        assert_eq!(encode_wav(44100, &signal).unwrap(), encode_wav(44100, &signal).unwrap());
    }
}
