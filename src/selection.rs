//! Trim range state and drag editing.
//!
//! [`Selection`] is the authoritative value: every mutation either preserves
//! `0 <= start < end <= duration` or is rejected without being applied.
//! [`DragEditor`] layers a high-frequency preview on top for pointer drags;
//! only [`DragEditor::commit`] touches the authoritative value.

use std::time::{Duration, Instant};

/// Minimum interval between preview refreshes during a drag. Pointer events
/// arriving faster than this are coalesced; the final value is still
/// committed in full on release.
pub const DRAG_COALESCE: Duration = Duration::from_millis(16);

/// A time sub-range of a loaded asset, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    start: f64,
    end: f64,
    duration: f64,
}

impl Selection {
    /// Select the full range of an asset.
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration,
            duration,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Length of the selected range in seconds.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Move the start handle. Values below zero are clamped to zero; a value
    /// at or past the current end is rejected and the selection is left
    /// unchanged. Returns whether the update was applied.
    pub fn set_start(&mut self, time: f64) -> bool {
        if !time.is_finite() {
            return false;
        }
        let time = time.max(0.0);
        if time >= self.end {
            return false;
        }
        self.start = time;
        true
    }

    /// Move the end handle. Values past the asset duration are clamped to
    /// the duration; a value at or before the current start is rejected.
    pub fn set_end(&mut self, time: f64) -> bool {
        if !time.is_finite() {
            return false;
        }
        let time = time.min(self.duration);
        if time <= self.start {
            return false;
        }
        self.end = time;
        true
    }

    /// Replace both bounds at once. Applied only when the pair is valid as a
    /// whole; a rejected update leaves the prior range in place.
    pub fn set_range(&mut self, start: f64, end: f64) -> bool {
        if !start.is_finite() || !end.is_finite() {
            return false;
        }
        let start = start.max(0.0);
        let end = end.min(self.duration);
        if start >= end {
            return false;
        }
        self.start = start;
        self.end = end;
        true
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Clamp a time into the selected range.
    pub fn clamp(&self, time: f64) -> f64 {
        time.max(self.start).min(self.end)
    }
}

/// Which selection handle a drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    End,
}

/// Two-layer drag model around a [`Selection`].
///
/// The committed selection only changes on [`commit`](Self::commit); during
/// a drag, [`preview_at`](Self::preview_at) tracks the pointer and exposes a
/// visual range through [`visual`](Self::visual). Preview refreshes are
/// coalesced to one per [`DRAG_COALESCE`], but the latest pointer value is
/// always retained for the commit.
#[derive(Debug, Clone)]
pub struct DragEditor {
    committed: Selection,
    active: Option<Handle>,
    pending: Option<f64>,
    preview: Option<Selection>,
    last_refresh: Option<Instant>,
}

impl DragEditor {
    pub fn new(selection: Selection) -> Self {
        Self {
            committed: selection,
            active: None,
            pending: None,
            preview: None,
            last_refresh: None,
        }
    }

    /// The authoritative selection.
    pub fn selection(&self) -> &Selection {
        &self.committed
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.committed
    }

    /// The range to draw: the live preview while a drag is active, otherwise
    /// the committed selection.
    pub fn visual(&self) -> Selection {
        self.preview.unwrap_or(self.committed)
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin(&mut self, handle: Handle) {
        self.active = Some(handle);
        self.pending = None;
        self.preview = None;
        self.last_refresh = None;
    }

    /// Feed a pointer position (in seconds) into the active drag. Returns
    /// whether the visual preview was refreshed; a `false` return means the
    /// event was coalesced, not lost.
    pub fn preview_at(&mut self, now: Instant, time: f64) -> bool {
        if self.active.is_none() || !time.is_finite() {
            return false;
        }
        self.pending = Some(time);

        if let Some(last) = self.last_refresh {
            if now.duration_since(last) < DRAG_COALESCE {
                return false;
            }
        }
        self.last_refresh = Some(now);

        let mut candidate = self.committed;
        let applied = match self.active {
            Some(Handle::Start) => candidate.set_start(time),
            Some(Handle::End) => candidate.set_end(time),
            None => false,
        };
        if applied {
            self.preview = Some(candidate);
        }
        applied
    }

    /// Convenience wrapper over [`preview_at`](Self::preview_at) using the
    /// current instant.
    pub fn preview(&mut self, time: f64) -> bool {
        self.preview_at(Instant::now(), time)
    }

    /// End the drag, applying the last pointer value to the committed
    /// selection. Returns whether the committed value changed; an invalid
    /// final position leaves the prior selection intact.
    pub fn commit(&mut self) -> bool {
        let handle = match self.active.take() {
            Some(handle) => handle,
            None => return false,
        };
        self.preview = None;
        self.last_refresh = None;

        let applied = match (handle, self.pending.take()) {
            (Handle::Start, Some(time)) => self.committed.set_start(time),
            (Handle::End, Some(time)) => self.committed.set_end(time),
            (_, None) => false,
        };
        applied
    }

    /// Abandon the drag without touching the committed selection.
    pub fn cancel(&mut self) {
        self.active = None;
        self.pending = None;
        self.preview = None;
        self.last_refresh = None;
    }
}
