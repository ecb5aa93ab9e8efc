//! Asset lifecycle: load, selection, trim, replacement.
//!
//! Decoding and trimming may be run off the interaction thread by the host,
//! so both are modeled as ticketed operations: the session hands out a
//! ticket when the work starts and ignores completions whose ticket is
//! stale. Switching to a new source bumps the generation, releases the
//! previous decoded buffers, and invalidates every outstanding ticket.

use crate::audio::DecodeError;
use crate::selection::{DragEditor, Selection};
use crate::trim::{self, TrimError, TrimOutput};
use crate::AudioAsset;

/// Completion token for a decode started by [`MediaSession::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A trim captured for execution, possibly on another thread.
///
/// Holds its own copy of the asset and selection, so the session can keep
/// serving playback while the copy loop runs.
#[derive(Debug, Clone)]
pub struct TrimRequest {
    asset: AudioAsset,
    selection: Selection,
    generation: u64,
}

impl TrimRequest {
    /// Execute the captured trim. CPU-bound, safe to run anywhere.
    pub fn run(&self) -> Result<TrimOutput, TrimError> {
        trim::trim(&self.asset, &self.selection)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the loaded asset and its trim selection.
#[derive(Debug, Default)]
pub struct MediaSession {
    asset: Option<AudioAsset>,
    editor: Option<DragEditor>,
    generation: u64,
    trim_in_flight: bool,
}

impl MediaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(&self) -> Option<&AudioAsset> {
        self.asset.as_ref()
    }

    /// The selection editor for the loaded asset, if one is loaded.
    pub fn editor(&mut self) -> Option<&mut DragEditor> {
        self.editor.as_mut()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.editor.as_ref().map(DragEditor::selection)
    }

    /// Start loading a new source. The previous asset's buffers are
    /// released immediately and every outstanding decode or trim completion
    /// becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.asset = None;
        self.editor = None;
        self.trim_in_flight = false;
        LoadTicket(self.generation)
    }

    /// Deliver a decode completion. Returns `Ok(true)` when the asset was
    /// installed, `Ok(false)` when the ticket was stale and the result was
    /// dropped. Decode failures propagate so the host can prompt re-upload.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<AudioAsset, DecodeError>,
    ) -> Result<bool, DecodeError> {
        if ticket.0 != self.generation {
            log::debug!("dropping stale decode completion (ticket {})", ticket.0);
            return Ok(false);
        }
        let asset = result?;
        self.editor = Some(DragEditor::new(Selection::full(asset.duration())));
        self.asset = Some(asset);
        Ok(true)
    }

    /// Capture the current asset and selection for trimming. Rejected while
    /// another trim for this asset has not completed.
    pub fn begin_trim(&mut self) -> Result<TrimRequest, TrimError> {
        if self.trim_in_flight {
            return Err(TrimError::Busy);
        }
        let asset = self.asset.clone().ok_or(TrimError::NoAsset)?;
        let selection = *self.selection().ok_or(TrimError::NoAsset)?;
        self.trim_in_flight = true;
        Ok(TrimRequest {
            asset,
            selection,
            generation: self.generation,
        })
    }

    /// Deliver a trim completion. A successful, non-stale trim replaces the
    /// loaded asset with the trimmed one and resets the selection to its
    /// full range. Returns whether the replacement happened.
    pub fn finish_trim(&mut self, generation: u64, output: &TrimOutput) -> bool {
        if generation != self.generation {
            log::debug!("dropping stale trim completion (generation {generation})");
            return false;
        }
        self.trim_in_flight = false;
        self.editor = Some(DragEditor::new(Selection::full(output.asset.duration())));
        self.asset = Some(output.asset.clone());
        true
    }

    /// Clear the in-flight marker after a failed trim; the original asset
    /// and selection stay as they were.
    pub fn abort_trim(&mut self, generation: u64) {
        if generation == self.generation {
            self.trim_in_flight = false;
        }
    }

    /// Convenience path for hosts that trim synchronously on the calling
    /// thread: capture, run, and install in one step.
    pub fn trim_now(&mut self) -> Result<TrimOutput, TrimError> {
        let request = self.begin_trim()?;
        match request.run() {
            Ok(output) => {
                self.finish_trim(request.generation, &output);
                Ok(output)
            }
            Err(err) => {
                self.abort_trim(request.generation);
                Err(err)
            }
        }
    }

    /// Drop the loaded asset and selection, e.g. when the UI unmounts.
    pub fn reset(&mut self) {
        self.begin_load();
    }
}
