//! Transcript ingestion and speaker segmentation.
//!
//! The transcription collaborator delivers word tokens in a couple of
//! shapes: a `start`/`end` pair or a single `time` point, an optional
//! `speaker_id`, and `type: "spacing"` markers that only contribute
//! whitespace. Everything is normalized into [`WordToken`] at ingestion so
//! downstream lookups have one timestamp representation to deal with.

use serde::Deserialize;

/// Speaker label used for tokens that carry no attribution.
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// Transcript payload as delivered by the transcription collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<RawWord>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Transcript {
    pub fn tokens(&self) -> Vec<WordToken> {
        self.words.iter().map(WordToken::from_raw).collect()
    }
}

/// A word token exactly as it appears on the wire, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    /// Point-timestamp alternative to `start`/`end`.
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub speaker_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A closed time interval in seconds. Point timestamps become zero-width
/// spans so there is a single representation for containment and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn point(time: f64) -> Self {
        Self {
            start: time,
            end: time,
        }
    }

    /// Inclusive containment on both ends.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Distance from a time to this interval; zero when contained.
    pub fn distance_to(&self, time: f64) -> f64 {
        (self.start - time).max(time - self.end).max(0.0)
    }
}

/// A normalized transcribed token. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    pub text: String,
    pub timing: Option<TimeSpan>,
    pub speaker: Option<String>,
    /// Inter-word spacing marker; contributes only whitespace to rendered
    /// text and never opens a segment.
    pub spacing: bool,
}

impl WordToken {
    pub fn from_raw(raw: &RawWord) -> Self {
        let timing = match (raw.start, raw.end, raw.time) {
            (Some(start), Some(end), _) => Some(TimeSpan::new(start, end)),
            (Some(start), None, _) => Some(TimeSpan::point(start)),
            (None, Some(end), _) => Some(TimeSpan::point(end)),
            (None, None, Some(time)) => Some(TimeSpan::point(time)),
            (None, None, None) => None,
        };
        Self {
            text: raw.text.clone(),
            timing,
            speaker: raw.speaker_id.clone(),
            spacing: raw.kind.as_deref() == Some("spacing"),
        }
    }

    fn speaker_label(&self) -> &str {
        self.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }
}

/// A contiguous run of same-speaker words, derived from the token list.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// Indices of the contributing non-spacing tokens, in order.
    pub word_indices: Vec<usize>,
}

impl Segment {
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }
}

/// Group a token sequence into contiguous same-speaker segments.
///
/// Pure function: the same token list always yields the same segments, so
/// segments can be rebuilt whenever the transcript changes. Spacing tokens
/// append a single space to the open segment's text and never move its
/// boundaries. A speaker change (including to or from the unknown sentinel)
/// closes the outgoing segment at the new word's start time when one is
/// available, else at its own last known end.
pub fn build_segments(words: &[WordToken]) -> Vec<Segment> {
    // Tracks whether the open segment's end came from an actual token end
    // time, as opposed to the placeholder it was opened with.
    struct Open {
        segment: Segment,
        end_known: bool,
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Option<Open> = None;

    for (index, word) in words.iter().enumerate() {
        if word.spacing {
            if let Some(open) = current.as_mut() {
                open.segment.text.push(' ');
            }
            continue;
        }

        let speaker = word.speaker_label();
        let boundary = current
            .as_ref()
            .map(|open| open.segment.speaker != speaker)
            .unwrap_or(true);

        if boundary {
            if let Some(mut outgoing) = current.take() {
                // A segment whose words never carried an end time is closed
                // at the incoming word's start, so `end` is never undefined.
                if !outgoing.end_known {
                    if let Some(timing) = word.timing {
                        outgoing.segment.end = timing.start;
                    }
                }
                segments.push(outgoing.segment);
            }

            let last_end = segments.last().map(|s| s.end);
            let start = word.timing.map(|t| t.start).or(last_end).unwrap_or(0.0);
            current = Some(Open {
                segment: Segment {
                    speaker: speaker.to_string(),
                    start,
                    end: start,
                    text: String::new(),
                    word_indices: Vec::new(),
                },
                end_known: false,
            });
        }

        let open = current.as_mut().expect("segment opened above");
        open.segment.text.push_str(&word.text);
        if let Some(timing) = word.timing {
            open.segment.end = timing.end;
            open.end_known = true;
        }
        open.segment.word_indices.push(index);
    }

    if let Some(open) = current.take() {
        segments.push(open.segment);
    }

    log::trace!(
        "built {} segment(s) from {} token(s)",
        segments.len(),
        words.len()
    );
    segments
}
