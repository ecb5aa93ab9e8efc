//! Audio decoding for uploaded assets.
//!
//! This module turns an opaque byte buffer (whatever container the upload or
//! recording path produced) into per-channel f32 samples, and provides the
//! sample-format conversions shared by the encoder and the tests.
//!
//! Decoding goes through symphonia, so the usual upload formats (wav, mp3,
//! m4a, ogg, flac) are all recognized from the byte stream itself.

use std::io::Cursor;

use rodio::Source;

use crate::AudioAsset;

/// The byte stream could not be decoded into samples.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("unrecognized or corrupt audio stream")]
    Unrecognized(#[from] rodio::decoder::DecoderError),
    #[error("audio stream reports no channels")]
    NoChannels,
    #[error("audio stream contains no samples")]
    Empty,
}

/// Decode an audio byte buffer into an [`AudioAsset`].
///
/// The file name and content type are carried through unchanged; they are
/// metadata for the host, not inputs to the decoder. Truncated or
/// unrecognized input fails with [`DecodeError`] rather than producing a
/// partial asset.
pub fn decode(
    bytes: Vec<u8>,
    file_name: &str,
    content_type: &str,
) -> Result<AudioAsset, DecodeError> {
    let decoder = rodio::Decoder::new(Cursor::new(bytes))?;
    let sample_rate = decoder.sample_rate();
    let channel_count = decoder.channels() as usize;
    if channel_count == 0 {
        return Err(DecodeError::NoChannels);
    }

    let interleaved: Vec<f32> = decoder.collect();
    if interleaved.is_empty() {
        return Err(DecodeError::Empty);
    }

    let channels = deinterleave(&interleaved, channel_count);
    log::debug!(
        "decoded {:?}: {} channel(s), {} frames at {} Hz",
        file_name,
        channel_count,
        channels[0].len(),
        sample_rate
    );

    Ok(AudioAsset {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        channels,
        sample_rate,
    })
}

/// Split an interleaved sample stream into per-channel buffers.
///
/// A trailing partial frame (truncated stream) is dropped so all channel
/// buffers stay the same length.
pub fn deinterleave(samples: &[f32], channel_count: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channel_count;
    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frames))
        .collect();
    for frame in samples.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    channels
}

/// Convert a normalized float sample to 16-bit PCM.
///
/// Clamps to `[-1.0, 1.0]`, scales by 32767 and truncates toward zero.
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Convert a 16-bit PCM sample to a normalized float.
pub fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}
