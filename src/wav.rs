//! Canonical 16-bit linear-PCM WAV serialization.
//!
//! The byte layout here is the one bit-exact contract in the crate: a 44-byte
//! header followed by interleaved little-endian 16-bit samples, with the
//! header's chunk sizes exactly matching the payload. `tests/wav.rs` checks
//! the output byte-for-byte.

use std::io::Cursor;

use crate::audio;

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("no channel buffers to encode")]
    NoChannels,
    #[error("channel buffers have mismatched lengths")]
    MismatchedChannels,
    #[error("WAV serialization failed")]
    Wav(#[from] hound::Error),
}

/// Serialize per-channel float buffers into a self-contained WAV container.
///
/// Float samples are converted with [`audio::f32_to_i16`] (clamp, scale by
/// 32767, truncate) and written interleaved, frame by frame.
pub fn encode(channels: &[Vec<f32>], sample_rate: u32) -> Result<Vec<u8>, EncodeError> {
    let first = channels.first().ok_or(EncodeError::NoChannels)?;
    let frame_count = first.len();
    if channels.iter().any(|c| c.len() != frame_count) {
        return Err(EncodeError::MismatchedChannels);
    }

    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for frame in 0..frame_count {
        for channel in channels {
            writer.write_sample(audio::f32_to_i16(channel[frame]))?;
        }
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Size in bytes of an encoded buffer: 44-byte header plus 2 bytes per
/// sample across all channels.
pub fn encoded_size(channel_count: usize, frame_count: usize) -> usize {
    44 + frame_count * channel_count * 2
}
