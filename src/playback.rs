//! Transcript-playback synchronization.
//!
//! [`SyncSession`] is the state machine between the audio subsystem and the
//! transcript UI. Playback time ticks flow in through
//! [`handle_tick`](SyncSession::handle_tick); position/play/pause commands
//! flow out through an injected [`AudioControl`] capability, so tests can
//! drive the session with a fake controller instead of a real player.
//!
//! The session never renders audio. It only computes intents: the current
//! word and segment index for highlighting and auto-scroll, and seek
//! commands for the controller.

use crate::selection::Selection;
use crate::tracker;
use crate::transcript::{self, Segment, WordToken};

/// Audio-control capability injected into the session.
///
/// `play` may be refused by the platform (for example when no user gesture
/// has happened yet); that refusal is surfaced as
/// [`SeekError::PlaybackRejected`], never swallowed.
pub trait AudioControl {
    fn play(&mut self) -> Result<(), Box<dyn std::error::Error>>;
    fn pause(&mut self);
    fn set_position(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);
}

/// Current playback position and the indices derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
    pub current_word: Option<usize>,
    pub current_segment: Option<usize>,
}

/// UI-visible consequences of a tick. Emitted only when an index actually
/// changes, so repeated identical ticks cannot re-trigger auto-scroll.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEffect {
    WordChanged(Option<usize>),
    SegmentChanged(Option<usize>),
}

#[derive(thiserror::Error, Debug)]
pub enum SeekError {
    #[error("index {0} is out of range")]
    OutOfRange(usize),
    #[error("word {0} has no time anchor to seek to")]
    Unseekable(usize),
    #[error("playback start was rejected")]
    PlaybackRejected(#[source] Box<dyn std::error::Error>),
}

/// Sync state machine over a transcript and an injected audio controller.
pub struct SyncSession<C: AudioControl> {
    control: C,
    words: Vec<WordToken>,
    segments: Vec<Segment>,
    duration: f64,
    state: PlaybackState,
    loop_selection: Option<Selection>,
}

impl<C: AudioControl> SyncSession<C> {
    pub fn new(control: C, duration: f64) -> Self {
        Self {
            control,
            words: Vec::new(),
            segments: Vec::new(),
            duration,
            state: PlaybackState::default(),
            loop_selection: None,
        }
    }

    /// Install a new word list, rebuilding the derived segments.
    pub fn set_words(&mut self, words: Vec<WordToken>) {
        self.segments = transcript::build_segments(&words);
        self.words = words;
        self.state.current_word = None;
        self.state.current_segment = None;
    }

    pub fn words(&self) -> &[WordToken] {
        &self.words
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Replace the duration when the loaded asset changes. Clears the loop
    /// range, which belonged to the previous asset.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        self.loop_selection = None;
    }

    /// Restrict playback to a trim selection: ticks past its end jump back
    /// to its start, and ratio seeks are clamped into it.
    pub fn set_loop_selection(&mut self, selection: Option<Selection>) {
        self.loop_selection = selection;
    }

    /// Feed one playback time tick. Returns the index-change effects the UI
    /// should act on; identical consecutive ticks produce no effects.
    pub fn handle_tick(&mut self, time: f64) -> Vec<TickEffect> {
        let mut time = time;
        if let Some(selection) = self.loop_selection {
            if time >= selection.end() {
                // Loop playback within the selected trim range.
                self.control.set_position(selection.start());
                time = selection.start();
            }
        }
        self.state.current_time = time;
        self.refresh_indices()
    }

    /// Jump to the start of a word and make sure playback is running.
    pub fn seek_to_word(&mut self, index: usize) -> Result<f64, SeekError> {
        let word = self.words.get(index).ok_or(SeekError::OutOfRange(index))?;
        let timing = word.timing.ok_or(SeekError::Unseekable(index))?;
        self.seek(timing.start)
    }

    /// Jump to the start of a segment and make sure playback is running.
    pub fn seek_to_segment(&mut self, index: usize) -> Result<f64, SeekError> {
        let segment = self
            .segments
            .get(index)
            .ok_or(SeekError::OutOfRange(index))?;
        let target = segment.start;
        self.seek(target)
    }

    /// Jump to a progress-bar position. `ratio` is clamped into `[0, 1]`
    /// and, when a loop selection is active, the resulting time is clamped
    /// into the selection.
    pub fn seek_to_ratio(&mut self, ratio: f64) -> Result<f64, SeekError> {
        let mut target = ratio.clamp(0.0, 1.0) * self.duration;
        if let Some(selection) = self.loop_selection {
            target = selection.clamp(target);
        }
        self.seek(target)
    }

    /// Common seek path: position the controller, start playback if paused,
    /// and eagerly refresh the indices so the UI reflects the jump before
    /// the next natural tick.
    fn seek(&mut self, target: f64) -> Result<f64, SeekError> {
        self.control.set_position(target);
        if !self.state.is_playing {
            self.control
                .play()
                .map_err(SeekError::PlaybackRejected)?;
            self.state.is_playing = true;
        }
        self.state.current_time = target;
        self.refresh_indices();
        log::debug!("seek to {target:.3}s");
        Ok(target)
    }

    pub fn play(&mut self) -> Result<(), SeekError> {
        if self.state.is_playing {
            return Ok(());
        }
        self.control
            .play()
            .map_err(SeekError::PlaybackRejected)?;
        self.state.is_playing = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state.is_playing {
            self.control.pause();
            self.state.is_playing = false;
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.control.set_volume(volume.clamp(0.0, 1.0));
    }

    fn refresh_indices(&mut self) -> Vec<TickEffect> {
        let mut effects = Vec::new();
        let time = self.state.current_time;

        let word = tracker::word_index_at(&self.words, time);
        if word != self.state.current_word {
            self.state.current_word = word;
            effects.push(TickEffect::WordChanged(word));
        }

        let segment = tracker::segment_index_at(&self.segments, time);
        if segment != self.state.current_segment {
            self.state.current_segment = segment;
            effects.push(TickEffect::SegmentChanged(segment));
        }

        effects
    }
}
