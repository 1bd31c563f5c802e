//! Raw PCM from the speech model, repackaged as a browser-playable WAV file.

use crate::error::{VoiceError, VoiceResult};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Sample rate assumed when the PCM MIME type does not carry one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Highest rate accepted from the model; anything above is treated as garbage.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

fn valid_rate(rate: u32) -> bool {
    (1..=MAX_SAMPLE_RATE).contains(&rate)
}

/// Read `rate=` from a MIME type such as `audio/L16;codec=pcm;rate=24000`. Missing, unparsable
/// or out-of-range rates fall back to `DEFAULT_SAMPLE_RATE`.
pub fn pcm_sample_rate(mime_type: &str) -> u32 {
    mime_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("rate"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .filter(|rate| valid_rate(*rate))
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

pub fn is_wav(mime_type: &str) -> bool {
    let base = mime_type.split(';').next().unwrap_or_default().trim();
    ["audio/wav", "audio/wave", "audio/x-wav"]
        .iter()
        .any(|m| base.eq_ignore_ascii_case(m))
}

/// Raw little-endian 16-bit PCM (`audio/L16`, `audio/pcm`).
pub fn is_pcm16(mime_type: &str) -> bool {
    let base = mime_type.split(';').next().unwrap_or_default().trim();
    base.eq_ignore_ascii_case("audio/L16") || base.eq_ignore_ascii_case("audio/pcm")
}

/// Wrap mono 16-bit little-endian PCM in a WAV container. A trailing odd byte is dropped.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32) -> VoiceResult<Vec<u8>> {
    if !valid_rate(sample_rate) {
        return Err(VoiceError::Tts(format!("unsupported sample rate {}", sample_rate)));
    }
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.len()));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for frame in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
