//! Search, speaker filtering, and highlight precedence.

use std::collections::HashSet;

use crate::transcript::{Segment, WordToken};

/// UI-reactive filter inputs. Selects subsets for display; never mutates
/// the transcript data itself.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub search_term: String,
    /// Speaker allow-list. Empty means no filtering.
    pub speakers: HashSet<String>,
}

impl FilterState {
    pub fn matched_words(&self, words: &[WordToken]) -> HashSet<usize> {
        match_words(words, &self.search_term)
    }

    pub fn matched_segments(&self, segments: &[Segment]) -> HashSet<usize> {
        match_segments(segments, &self.search_term)
    }

    pub fn visible_segments(&self, segments: &[Segment]) -> Vec<Segment> {
        filter_by_speakers(segments, &self.speakers)
    }
}

/// Indices of words whose text contains `term`, case-insensitively. An
/// empty term matches nothing.
pub fn match_words(words: &[WordToken], term: &str) -> HashSet<usize> {
    if term.is_empty() {
        return HashSet::new();
    }
    let needle = term.to_lowercase();
    words
        .iter()
        .enumerate()
        .filter(|(_, word)| word.text.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

/// Indices of segments whose aggregated text contains `term`,
/// case-insensitively. An empty term matches nothing.
pub fn match_segments(segments: &[Segment], term: &str) -> HashSet<usize> {
    if term.is_empty() {
        return HashSet::new();
    }
    let needle = term.to_lowercase();
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.text.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

/// Segments attributed to a speaker in the allow-list. An empty allow-list
/// disables filtering and returns every segment.
pub fn filter_by_speakers(segments: &[Segment], speakers: &HashSet<String>) -> Vec<Segment> {
    if speakers.is_empty() {
        return segments.to_vec();
    }
    segments
        .iter()
        .filter(|segment| speakers.contains(&segment.speaker))
        .cloned()
        .collect()
}

/// Visual state of one token, ordered by precedence: the derived ordering
/// makes `Playing` beat `SearchMatch` beat `Dimmed` beat `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Highlight {
    Default,
    /// Speaker-filter active and this token's speaker is filtered out.
    Dimmed,
    SearchMatch,
    Playing,
}

/// Resolve overlapping highlight states for one token.
pub fn highlight_for(is_playing: bool, is_search_match: bool, is_dimmed: bool) -> Highlight {
    if is_playing {
        Highlight::Playing
    } else if is_search_match {
        Highlight::SearchMatch
    } else if is_dimmed {
        Highlight::Dimmed
    } else {
        Highlight::Default
    }
}
