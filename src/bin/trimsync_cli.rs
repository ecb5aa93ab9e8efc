use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use trimsync::playback::{AudioControl, SyncSession};
use trimsync::session::MediaSession;
use trimsync::transcript::{Segment, Transcript};
use trimsync::{audio, format_timestamp};

#[derive(Parser, Debug)]
#[command(
    about = "Line-based JSON driver for the trim and transcript-sync engines",
    version
)]
struct Args {
    /// Optional transcript JSON to preload before reading messages
    #[arg(long)]
    transcript: Option<PathBuf>,
}

/// Message format accepted on stdin, one JSON object per line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InboundMessage {
    /// Decode an audio file and make it the active asset.
    Load { path: PathBuf },
    /// Set the trim selection on the active asset.
    Select { start: f64, end: f64 },
    /// Trim the active asset; optionally write the WAV to a path.
    Trim { output: Option<PathBuf> },
    /// Load a transcript JSON file and build its segments.
    Transcript { path: PathBuf },
    /// Report the current segment list.
    Segments,
    /// Feed one playback time tick.
    Tick { time: f64 },
    SeekWord { index: usize },
    SeekSegment { index: usize },
    SeekRatio { ratio: f64 },
    /// Drop the loaded asset and transcript.
    Reset,
}

#[derive(Debug, Serialize)]
struct SegmentInfo {
    speaker: String,
    start: f64,
    end: f64,
    label: String,
    text: String,
}

impl From<&Segment> for SegmentInfo {
    fn from(segment: &Segment) -> Self {
        Self {
            speaker: segment.speaker.clone(),
            start: segment.start,
            end: segment.end,
            label: format_timestamp(segment.start),
            text: segment.text.clone(),
        }
    }
}

/// Outbound message format, one JSON object per line on stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutboundMessage {
    Ready,
    Loaded {
        file_name: String,
        duration: f64,
        sample_rate: u32,
        channels: usize,
    },
    Selection {
        start: f64,
        end: f64,
    },
    Trimmed {
        file_name: String,
        bytes: usize,
        output: Option<PathBuf>,
    },
    Segments {
        segments: Vec<SegmentInfo>,
    },
    State {
        time: f64,
        is_playing: bool,
        word: Option<usize>,
        segment: Option<usize>,
    },
    Error {
        message: String,
    },
}

/// Controller that only logs the commands the session issues. The CLI has
/// no audio output; the host process owns real playback.
struct LogControl;

impl AudioControl for LogControl {
    fn play(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::debug!("control: play");
        Ok(())
    }

    fn pause(&mut self) {
        log::debug!("control: pause");
    }

    fn set_position(&mut self, seconds: f64) {
        log::debug!("control: set_position {seconds:.3}");
    }

    fn set_volume(&mut self, volume: f32) {
        log::debug!("control: set_volume {volume:.2}");
    }
}

struct App {
    media: MediaSession,
    sync: SyncSession<LogControl>,
}

impl App {
    fn new() -> Self {
        Self {
            media: MediaSession::new(),
            sync: SyncSession::new(LogControl, 0.0),
        }
    }

    fn state_message(&self) -> OutboundMessage {
        let state = self.sync.state();
        OutboundMessage::State {
            time: state.current_time,
            is_playing: state.is_playing,
            word: state.current_word,
            segment: state.current_segment,
        }
    }

    fn load_transcript(&mut self, path: &Path) -> Result<Vec<OutboundMessage>, Box<dyn std::error::Error>> {
        let payload = std::fs::read_to_string(path)?;
        let transcript: Transcript = serde_json::from_str(&payload)?;
        self.sync.set_words(transcript.tokens());
        Ok(vec![OutboundMessage::Segments {
            segments: self.sync.segments().iter().map(SegmentInfo::from).collect(),
        }])
    }

    fn handle(&mut self, message: InboundMessage) -> Vec<OutboundMessage> {
        match message {
            InboundMessage::Load { path } => {
                let ticket = self.media.begin_load();
                let result = std::fs::read(&path)
                    .map_err(|err| err.to_string())
                    .and_then(|bytes| {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "audio".to_string());
                        audio::decode(bytes, &name, &content_type_for(&path))
                            .map_err(|err| err.to_string())
                    });
                match result {
                    Ok(asset) => {
                        let loaded = OutboundMessage::Loaded {
                            file_name: asset.file_name.clone(),
                            duration: asset.duration(),
                            sample_rate: asset.sample_rate,
                            channels: asset.channel_count(),
                        };
                        self.sync.set_duration(asset.duration());
                        match self.media.finish_load(ticket, Ok(asset)) {
                            Ok(_) => vec![loaded],
                            Err(err) => vec![error(err)],
                        }
                    }
                    Err(message) => vec![OutboundMessage::Error { message }],
                }
            }
            InboundMessage::Select { start, end } => {
                let Some(editor) = self.media.editor() else {
                    return vec![text_error("no audio asset is loaded")];
                };
                if !editor.selection_mut().set_range(start, end) {
                    return vec![text_error("selection rejected; prior range kept")];
                }
                let selection = *editor.selection();
                self.sync.set_loop_selection(Some(selection));
                vec![OutboundMessage::Selection {
                    start: selection.start(),
                    end: selection.end(),
                }]
            }
            InboundMessage::Trim { output } => match self.media.trim_now() {
                Ok(trimmed) => {
                    if let Some(path) = &output {
                        if let Err(err) = std::fs::write(path, &trimmed.wav_bytes) {
                            return vec![error(err)];
                        }
                    }
                    self.sync.set_duration(trimmed.asset.duration());
                    vec![OutboundMessage::Trimmed {
                        file_name: trimmed.asset.file_name,
                        bytes: trimmed.wav_bytes.len(),
                        output,
                    }]
                }
                Err(err) => vec![error(err)],
            },
            InboundMessage::Transcript { path } => match self.load_transcript(&path) {
                Ok(messages) => messages,
                Err(err) => vec![error(err)],
            },
            InboundMessage::Segments => vec![OutboundMessage::Segments {
                segments: self.sync.segments().iter().map(SegmentInfo::from).collect(),
            }],
            InboundMessage::Tick { time } => {
                self.sync.handle_tick(time);
                vec![self.state_message()]
            }
            InboundMessage::SeekWord { index } => match self.sync.seek_to_word(index) {
                Ok(_) => vec![self.state_message()],
                Err(err) => vec![error(err)],
            },
            InboundMessage::SeekSegment { index } => match self.sync.seek_to_segment(index) {
                Ok(_) => vec![self.state_message()],
                Err(err) => vec![error(err)],
            },
            InboundMessage::SeekRatio { ratio } => match self.sync.seek_to_ratio(ratio) {
                Ok(_) => vec![self.state_message()],
                Err(err) => vec![error(err)],
            },
            InboundMessage::Reset => {
                self.media.reset();
                self.sync = SyncSession::new(LogControl, 0.0);
                vec![self.state_message()]
            }
        }
    }
}

fn content_type_for(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

fn error(err: impl std::fmt::Display) -> OutboundMessage {
    OutboundMessage::Error {
        message: err.to_string(),
    }
}

fn text_error(message: &str) -> OutboundMessage {
    OutboundMessage::Error {
        message: message.to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut app = App::new();
    if let Some(path) = &args.transcript {
        for message in app.load_transcript(path)? {
            send_message(&message)?;
        }
    }

    send_message(&OutboundMessage::Ready)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<InboundMessage>(&line) {
            Ok(message) => {
                for outbound in app.handle(message) {
                    send_message(&outbound)?;
                }
            }
            Err(err) => {
                send_message(&OutboundMessage::Error {
                    message: format!("failed to parse message: {err}"),
                })?;
            }
        }
    }

    Ok(())
}

fn send_message(message: &OutboundMessage) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, message)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
