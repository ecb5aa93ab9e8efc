pub mod audio;
pub mod playback;
pub mod search;
pub mod selection;
pub mod session;
pub mod tracker;
pub mod transcript;
pub mod trim;
pub mod wav;

/// A decoded audio file held as per-channel floating point samples.
///
/// Samples are normalized to `[-1.0, 1.0]`. The asset is the unit of
/// replacement: trimming never mutates an existing asset, it produces a new
/// one that takes its place for subsequent operations.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    pub file_name: String,
    pub content_type: String,
    /// One sample buffer per channel, all of equal length.
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl AudioAsset {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Duration in seconds, derived from the frame count.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// Format a time position as `mm:ss` for display.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
