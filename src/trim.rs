//! Extracting a time sub-range of an asset into a new standalone asset.

use crate::selection::Selection;
use crate::wav;
use crate::AudioAsset;

#[derive(thiserror::Error, Debug)]
pub enum TrimError {
    #[error("selection spans zero frames")]
    EmptySelection,
    #[error("no audio asset is loaded")]
    NoAsset,
    #[error("a trim is already in flight for this asset")]
    Busy,
    #[error(transparent)]
    Encode(#[from] wav::EncodeError),
}

/// Result of a trim: the replacement asset plus its WAV serialization,
/// ready for playback, download, or re-submission to transcription.
#[derive(Debug, Clone)]
pub struct TrimOutput {
    pub asset: AudioAsset,
    pub wav_bytes: Vec<u8>,
}

/// Copy the selected range of `asset` into a freshly encoded asset.
///
/// Sample math follows the selection exactly: `start = floor(start_time *
/// rate)`, `end = floor(end_time * rate)`, and the copy covers `end - start`
/// frames per channel. The input asset is never touched; a failed trim
/// leaves it fully usable. This is synchronous CPU work over `channels x
/// frames` samples; hosts with very large assets should run it off the
/// interaction thread.
pub fn trim(asset: &AudioAsset, selection: &Selection) -> Result<TrimOutput, TrimError> {
    let rate = asset.sample_rate as f64;
    let start_sample = (selection.start() * rate).floor() as usize;
    let end_sample = (selection.end() * rate).floor() as usize;
    if end_sample <= start_sample {
        return Err(TrimError::EmptySelection);
    }
    let frame_count = end_sample - start_sample;

    let channels: Vec<Vec<f32>> = asset
        .channels
        .iter()
        .map(|channel| {
            let start = start_sample.min(channel.len());
            let end = end_sample.min(channel.len());
            channel[start..end].to_vec()
        })
        .collect();

    let wav_bytes = wav::encode(&channels, asset.sample_rate)?;
    log::info!(
        "trimmed {:?}: [{:.3}s, {:.3}s] -> {} frames, {} bytes",
        asset.file_name,
        selection.start(),
        selection.end(),
        frame_count,
        wav_bytes.len()
    );

    Ok(TrimOutput {
        asset: AudioAsset {
            file_name: trimmed_file_name(&asset.file_name),
            content_type: asset.content_type.clone(),
            channels,
            sample_rate: asset.sample_rate,
        },
        wav_bytes,
    })
}

/// Derive the output name: `voice.mp3` becomes `voice_trimmed.mp3`. The
/// original extension and content type are kept, matching what the host
/// shows the user for the source file.
fn trimmed_file_name(original: &str) -> String {
    match original.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}_trimmed.{extension}"),
        None => format!("{original}_trimmed"),
    }
}
