//! Mapping a playhead time onto word and segment indices.
//!
//! Containment wins: the first token or segment whose `[start, end]`
//! interval contains the query time is returned. Only when nothing contains
//! the time (gaps between tokens, point timestamps) does the lookup fall
//! back to the nearest anchor, ties going to the first occurrence. Tokens
//! without any timing are treated as infinitely far, so the fallback never
//! picks them over a timed token.
//!
//! Both lookups are linear scans; transcripts are at most a few thousand
//! tokens, so a sorted index has not been worth it.

use crate::transcript::{Segment, TimeSpan, WordToken};

/// Index of the word active at `time`, if any.
pub fn word_index_at(words: &[WordToken], time: f64) -> Option<usize> {
    index_at(words.iter().map(|word| word.timing), time)
}

/// Index of the segment active at `time`, if any.
pub fn segment_index_at(segments: &[Segment], time: f64) -> Option<usize> {
    index_at(segments.iter().map(|segment| Some(segment.span())), time)
}

fn index_at<I>(spans: I, time: f64) -> Option<usize>
where
    I: Iterator<Item = Option<TimeSpan>>,
{
    let mut nearest: Option<(usize, f64)> = None;

    for (index, span) in spans.enumerate() {
        let distance = match span {
            Some(span) if span.contains(time) => return Some(index),
            Some(span) => span.distance_to(time),
            None => f64::INFINITY,
        };
        // Strict comparison keeps the first occurrence on ties.
        if nearest.map(|(_, best)| distance < best).unwrap_or(true) {
            nearest = Some((index, distance));
        }
    }

    nearest.map(|(index, _)| index)
}
